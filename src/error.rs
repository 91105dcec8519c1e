use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Primary SQLite result code for `SQLITE_CANTOPEN`; extended codes keep it
/// in the low byte.
const SQLITE_CANTOPEN: i32 = 14;

/// Whether a storage call was part of a read or a write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Debug, ThisError)]
pub enum AlphabyteError {
    #[error("storage unreachable during {op}: {source}")]
    Connectivity {
        op: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("content {id} already exists")]
    Conflict { id: i64 },

    #[error("content {id} not found")]
    NotFound { id: i64 },

    #[error("failed to {op}: {source}")]
    WriteFailure {
        op: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("failed to {op}: {source}")]
    ReadFailure {
        op: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("{op} timed out")]
    Timeout { op: &'static str },

    #[error("path id {path} does not match body id {body}")]
    IdMismatch { path: i64, body: i64 },

    /// The request could not be turned into arguments (bad path, bad body).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl AlphabyteError {
    /// Classify a raw sqlx error raised while performing `op`.
    ///
    /// Key collisions are not recognised here; the insert path checks
    /// [`is_unique_violation`] itself since only it knows the id.
    pub fn from_sqlx(op: &'static str, access: Access, err: SqlxError) -> Self {
        if is_connectivity(&err) {
            return AlphabyteError::Connectivity { op, source: err };
        }
        match access {
            Access::Read => AlphabyteError::ReadFailure { op, source: err },
            Access::Write => AlphabyteError::WriteFailure { op, source: err },
        }
    }

    /// Stable machine-readable discriminant, also used as the response `code`.
    pub fn code(&self) -> &'static str {
        match self {
            AlphabyteError::Connectivity { .. } => "CONNECTIVITY",
            AlphabyteError::Conflict { .. } => "CONFLICT",
            AlphabyteError::NotFound { .. } => "NOT_FOUND",
            AlphabyteError::WriteFailure { .. } => "WRITE_FAILURE",
            AlphabyteError::ReadFailure { .. } => "READ_FAILURE",
            AlphabyteError::Timeout { .. } => "TIMEOUT",
            AlphabyteError::IdMismatch { .. } => "INVALID_ARGUMENT",
            AlphabyteError::Rejected { status, .. } => match *status {
                StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
                _ => "INVALID_ARGUMENT",
            },
            AlphabyteError::Config(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AlphabyteError::Connectivity { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AlphabyteError::Conflict { .. } => StatusCode::CONFLICT,
            AlphabyteError::NotFound { .. } => StatusCode::NOT_FOUND,
            AlphabyteError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AlphabyteError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            AlphabyteError::Rejected { status, .. } => *status,
            AlphabyteError::WriteFailure { .. }
            | AlphabyteError::ReadFailure { .. }
            | AlphabyteError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn is_unique_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db_err) if db_err.is_unique_violation())
}

fn is_connectivity(err: &SqlxError) -> bool {
    match err {
        SqlxError::Database(db_err) => db_err.code().is_some_and(|code| is_cantopen_code(&code)),
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => true,
        _ => false,
    }
}

fn is_cantopen_code(code: &str) -> bool {
    code.parse::<i32>()
        .is_ok_and(|c| c & 0xff == SQLITE_CANTOPEN)
}

impl From<JsonRejection> for AlphabyteError {
    fn from(rejection: JsonRejection) -> Self {
        AlphabyteError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AlphabyteError {
    fn from(rejection: PathRejection) -> Self {
        AlphabyteError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AlphabyteError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            // Engine detail stays in the logs.
            AlphabyteError::WriteFailure { op, .. } | AlphabyteError::ReadFailure { op, .. } => {
                format!("failed to {op}")
            }
            AlphabyteError::Connectivity { .. } => "Storage is unavailable.".to_string(),
            AlphabyteError::Config(_) => "An internal server error occurred.".to_string(),
            other => other.to_string(),
        };
        let body = ApiErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
