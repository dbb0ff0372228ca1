use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use glossary_sdk::GlossaryError;
use http::StatusCode;
use serde_json::json;

/// Everything a handler can answer with besides success.
///
/// Bodies are always JSON with an `error` field.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Upstream(#[from] GlossaryError),

    #[error("{0}")]
    BadRequest(String),

    /// `AddTerm` answered `success = false`.
    #[error("{0}")]
    AddRejected(String),

    /// `DeleteTerm` answered `success = false`.
    #[error("{0}")]
    DeleteRejected(String),
}

impl GatewayError {
    pub fn no_data() -> Self {
        Self::BadRequest("No data provided".to_owned())
    }

    pub fn invalid_param(name: &str, raw: &str) -> Self {
        Self::BadRequest(format!("invalid value for '{name}': '{raw}' is not an integer"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upstream(GlossaryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(GlossaryError::NotFound(_)) | Self::DeleteRejected(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Upstream(GlossaryError::Validation(_))
            | Self::BadRequest(_)
            | Self::AddRejected(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(GlossaryError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::AddRejected(message) | Self::DeleteRejected(message) => {
                json!({ "success": false, "error": message })
            }
            Self::Upstream(GlossaryError::Internal(message)) => {
                // Log the upstream details, keep the client message generic
                tracing::error!(error = %message, "glossary service failure");
                json!({ "error": "Unexpected failure in the glossary service" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
