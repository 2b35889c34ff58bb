use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid or missing input).
    BadRequest(String),
    /// Declared file type is not PDF or DOCX.
    UnsupportedMediaType(String),
    /// Supported file type, but the content could not be read.
    DocumentParseError(String),
    /// Missing or invalid credential for the model provider.
    UpstreamConfigError(String),
    /// Network/auth/quota failure while calling the model.
    ModelInvocationError(String),
    /// The model replied but its output could not be coerced to JSON.
    /// Carries the raw response text for server-side diagnosis.
    MalformedAnalysisResponse {
        /// The raw model output, logged but never shown to the client.
        raw: String,
    },
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            AppError::DocumentParseError(msg) => write!(f, "Document parse error: {}", msg),
            AppError::UpstreamConfigError(msg) => write!(f, "Upstream config error: {}", msg),
            AppError::ModelInvocationError(msg) => write!(f, "Model invocation error: {}", msg),
            AppError::MalformedAnalysisResponse { .. } => {
                write!(f, "Malformed analysis response")
            }
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and a
    /// `{"success": false, "message": ..., "code": ...}` JSON body. Internal
    /// diagnostic detail is logged server-side and never sent to the client.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnsupportedMediaType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported file type. Only PDF and DOCX are allowed.".to_string(),
            ),
            AppError::DocumentParseError(msg) => {
                tracing::warn!("Document parse error: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The uploaded document appears to be corrupted or uses features we do not support. Please upload a different file.".to_string(),
                )
            }
            AppError::UpstreamConfigError(msg) => {
                tracing::error!("Upstream config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is misconfigured. Please contact the operator.".to_string(),
                )
            }
            AppError::ModelInvocationError(msg) => {
                tracing::error!("Model invocation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to analyze document".to_string(),
                )
            }
            AppError::MalformedAnalysisResponse { raw } => {
                // Raw model output goes to the log only, for offline diagnosis
                tracing::error!("Failed to parse model response: {}", raw);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to parse contract analysis. Please try again.".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.clone().into_response();
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::ModelInvocationError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    /// Renders an error the way the framework would and decodes the body.
    async fn response_parts(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_status_code_per_variant() {
        let cases = [
            (
                AppError::BadRequest("Contract doc is required!".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::UnsupportedMediaType("image/png".to_string()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AppError::DocumentParseError("bad xref table".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::UpstreamConfigError("GOOGLE_API_KEY missing".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::ModelInvocationError("429 quota exceeded".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::MalformedAnalysisResponse {
                    raw: "no json here".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::InternalError("task join failure".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, _) = response_parts(error).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) =
            response_parts(AppError::UnsupportedMediaType("image/png".to_string())).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 415);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Only PDF and DOCX"));
    }

    #[tokio::test]
    async fn test_malformed_response_body_hides_raw_text() {
        let (status, body) = response_parts(AppError::MalformedAnalysisResponse {
            raw: "I cannot process this request.".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);
        // Raw model output stays in the log, never in the response body
        assert!(!body.to_string().contains("cannot process"));
    }

    #[tokio::test]
    async fn test_context_wrapper_keeps_source_status() {
        let inner: Result<(), AppError> =
            Err(AppError::DocumentParseError("truncated stream".to_string()));
        let error = inner.context("extracting uploaded contract").unwrap_err();
        let (status, body) = response_parts(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);
        // Context strings are diagnostic only
        assert!(!body.to_string().contains("extracting uploaded contract"));
    }

    #[test]
    fn test_error_display() {
        let error = AppError::ModelInvocationError("Connection timeout".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Model invocation error"));
        assert!(display.contains("Connection timeout"));

        let error = AppError::UnsupportedMediaType("image/png".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Unsupported media type"));
        assert!(display.contains("image/png"));
    }

    #[test]
    fn test_malformed_response_hides_raw_text() {
        let error = AppError::MalformedAnalysisResponse {
            raw: "I cannot process this request.".to_string(),
        };
        // Raw model output must never leak through Display
        let display = format!("{}", error);
        assert!(!display.contains("cannot process"));
    }

    #[test]
    fn test_context_chain_display() {
        let inner: Result<(), AppError> =
            Err(AppError::DocumentParseError("bad xref table".to_string()));
        let err = inner.context("extracting uploaded contract").unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("extracting uploaded contract"));
        assert!(display.contains("bad xref table"));
    }
}
