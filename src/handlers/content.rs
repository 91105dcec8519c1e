use crate::middleware::{ContentBody, ContentId};
use crate::types::Content;
use crate::{AlphabyteError, router::AlphabyteState};
use axum::{Json, extract::State, http::StatusCode};
use std::future::Future;
use tracing::warn;

/// Run `fut` under the request deadline.
///
/// On expiry the future is dropped, which rolls back any open transaction.
async fn with_deadline<T, F>(
    state: &AlphabyteState,
    op: &'static str,
    fut: F,
) -> Result<T, AlphabyteError>
where
    F: Future<Output = Result<T, AlphabyteError>>,
{
    match tokio::time::timeout(state.request_timeout, fut).await {
        Ok(res) => res,
        Err(_) => {
            warn!(
                op,
                timeout_ms = u64::try_from(state.request_timeout.as_millis()).unwrap_or(u64::MAX),
                "request deadline exceeded"
            );
            Err(AlphabyteError::Timeout { op })
        }
    }
}

/// POST /contents
pub async fn create_content(
    State(state): State<AlphabyteState>,
    ContentBody(content): ContentBody,
) -> Result<(StatusCode, Json<Content>), AlphabyteError> {
    let created = with_deadline(&state, "create content", state.service.create(content)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /contents/{id}
pub async fn get_content(
    State(state): State<AlphabyteState>,
    ContentId(id): ContentId,
) -> Result<Json<Content>, AlphabyteError> {
    let content = with_deadline(&state, "get content", state.service.get(id)).await?;
    Ok(Json(content))
}

/// PUT /contents/{id}
pub async fn update_content(
    State(state): State<AlphabyteState>,
    ContentId(id): ContentId,
    ContentBody(content): ContentBody,
) -> Result<Json<Content>, AlphabyteError> {
    if content.id != id {
        return Err(AlphabyteError::IdMismatch {
            path: id,
            body: content.id,
        });
    }
    let updated = with_deadline(&state, "update content", state.service.update(content)).await?;
    Ok(Json(updated))
}

/// DELETE /contents/{id}
pub async fn delete_content(
    State(state): State<AlphabyteState>,
    ContentId(id): ContentId,
) -> Result<StatusCode, AlphabyteError> {
    with_deadline(&state, "delete content", state.service.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
