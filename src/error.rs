use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Request-path failures, all handled at the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error("upstream request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("unexpected upstream payload: {0}")]
    UnexpectedPayload(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        let err = GatewayError::MissingConfig("GOOGLE_DRIVE_API_KEY");
        assert_eq!(
            err.to_string(),
            "missing configuration: GOOGLE_DRIVE_API_KEY is not set"
        );

        let err = GatewayError::UpstreamStatus(StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "upstream returned status 403 Forbidden");
    }

    #[test]
    fn into_response_is_json_500() {
        let response = GatewayError::UnexpectedPayload("not json".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
