use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bystander::GuidanceError;
use serde_json::json;
use std::any::Any;
use tracing::{error, warn};

const GENERATION_FAILED_PREFIX: &str = "เกิดข้อผิดพลาดในการสร้างคำแนะนำ";

/// A custom error type for the server application.
///
/// Every variant renders as a JSON body `{"error": <message>}`.
#[derive(Debug)]
pub enum AppError {
    /// The request body is missing, malformed or fails validation.
    BadRequest(String),
    /// Errors originating from the `bystander` guidance service.
    Guidance(GuidanceError),
}

impl From<GuidanceError> for AppError {
    fn from(err: GuidanceError) -> Self {
        AppError::Guidance(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Guidance(err) => {
                error!("GuidanceError: {:?}", err);
                match err {
                    GuidanceError::InvalidInput(_) => (
                        StatusCode::BAD_REQUEST,
                        "'sentence' ต้องเป็นสตริงที่ไม่ว่างเปล่า".to_string(),
                    ),
                    GuidanceError::Provider { user_message, .. } => {
                        (StatusCode::BAD_GATEWAY, user_message)
                    }
                }
            }
        };

        error_body(status_code, error_message)
    }
}

/// Renders a handler panic as a 500 `{"error": ...}` carrying the panic message.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {detail}");
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{GENERATION_FAILED_PREFIX}: {detail}"),
    )
}

fn error_body(status_code: StatusCode, message: String) -> Response {
    (status_code, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use bystander::ProviderError;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_renders_server_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], format!("{GENERATION_FAILED_PREFIX}: boom"));
    }

    #[tokio::test]
    async fn test_provider_failure_uses_carried_message() {
        let err = AppError::Guidance(GuidanceError::Provider {
            source: ProviderError::UnexpectedStructure,
            user_message: "ข้อความ 1669".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "ข้อความ 1669");
    }
}
