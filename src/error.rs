use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

const UNDEFINED_TABLE: &str = "42P01";
const UNIQUE_VIOLATION: &str = "23505";
const VALIDATION_CODES: &[&str] = &["23502", UNIQUE_VIOLATION, "23514", "22P02", "22001"];

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Outcome of a failed data-access call, tagged by kind so callers can branch
/// without inspecting message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    SchemaMissing(String),

    #[error("{0}")]
    ValidationFailed(String),
}

impl DataError {
    pub fn not_found(entity: &str) -> Self {
        DataError::NotFound(format!("{entity} not found"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DataError::NotFound(_) => "not_found",
            DataError::Transport(_) => "transport_failure",
            DataError::SchemaMissing(_) => "schema_missing",
            DataError::ValidationFailed(_) => "validation_failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DataError::NotFound(m)
            | DataError::Transport(m)
            | DataError::SchemaMissing(m)
            | DataError::ValidationFailed(m) => m,
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DataError::NotFound("row not found".into()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code();
                match code.as_deref() {
                    Some(UNDEFINED_TABLE) => {
                        warn!(error = %db_err, "table missing; run the migrations");
                        DataError::SchemaMissing(db_err.message().to_string())
                    }
                    Some(c) if VALIDATION_CODES.contains(&c) => {
                        DataError::ValidationFailed(db_err.message().to_string())
                    }
                    _ => DataError::Transport(db_err.message().to_string()),
                }
            }
            other => DataError::Transport(other.to_string()),
        }
    }
}

/// Error returned by HTTP handlers; renders the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{message}")]
    InvalidForm {
        message: String,
        fields: serde_json::Value,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Data(e) => {
                let status = match e {
                    DataError::NotFound(_) => StatusCode::NOT_FOUND,
                    DataError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
                    DataError::SchemaMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
                    DataError::Transport(_) => StatusCode::BAD_GATEWAY,
                };
                (status, e.kind())
            }
            AppError::InvalidForm { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                "An internal error occurred".to_string()
            }
            other => {
                if status.is_server_error() {
                    error!(error = %other, kind, "request failed");
                }
                other.to_string()
            }
        };

        let mut body = json!({
            "data": null,
            "success": false,
            "error": message,
            "kind": kind,
        });
        if let AppError::InvalidForm { fields, .. } = self {
            body["fields"] = fields;
        }

        (status, Json(body)).into_response()
    }
}
