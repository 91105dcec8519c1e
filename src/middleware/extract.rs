use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};

use crate::AlphabyteError;
use crate::types::Content;

/// `{id}` path segment. A segment that is not an integer is rejected with
/// the standard error body instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ContentId(pub i64);

impl<S> FromRequestParts<S> for ContentId
where
    S: Send + Sync,
{
    type Rejection = AlphabyteError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

/// JSON request body holding a [`Content`] aggregate.
pub struct ContentBody(pub Content);

impl<S> FromRequest<S> for ContentBody
where
    S: Send + Sync,
{
    type Rejection = AlphabyteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(content) = Json::<Content>::from_request(req, state).await?;
        Ok(Self(content))
    }
}
