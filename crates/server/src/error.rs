use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service overloaded, please try again later")]
    ServiceOverloaded,

    #[error(transparent)]
    Render(#[from] dossier::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Render(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Render(e) => {
                tracing::error!("Render failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceOverloaded => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
