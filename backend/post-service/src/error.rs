/// Error types for Post Service
///
/// Every failure surfaced by the service is one of four kinds: validation (400),
/// authorization (401/403), not found (404), or unexpected (500). Unexpected
/// errors are logged with full detail and rendered with a generic message only.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Generic message used when no operation context was attached to a 500.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Identity lookup failed
    #[error("Identity lookup failed: {0}")]
    Identity(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// An unexpected failure with the client-facing message for the operation
    #[error("{message}: {source}")]
    Unexpected {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }

    /// True for errors that map to a 5xx response.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Identity(_)
                | AppError::Internal(_)
                | AppError::Unexpected { .. }
        )
    }

    /// Returns a mapper that tags unexpected errors with an operation-specific
    /// client message. Client errors pass through untouched.
    ///
    /// ```ignore
    /// service.create_post(user_id, content, image)
    ///     .await
    ///     .map_err(AppError::during("Error creating post"))?;
    /// ```
    pub fn during(message: &'static str) -> impl FnOnce(AppError) -> AppError {
        move |err| {
            if err.is_unexpected() && !matches!(err, AppError::Unexpected { .. }) {
                AppError::Unexpected {
                    message,
                    source: Box::new(err),
                }
            } else {
                err
            }
        }
    }

    /// Message safe to return to the caller.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Unexpected { message, .. } => (*message).to_string(),
            err if err.is_unexpected() => INTERNAL_MESSAGE.to_string(),
            err => err.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Identity(_)
            | AppError::Internal(_)
            | AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_unexpected() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.client_message(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());
        AppError::Validation(message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_their_status() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::post_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unexpected_errors_hide_detail() {
        let err = AppError::Internal("connection reset by peer".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");

        let tagged = AppError::during("Error creating post")(err);
        assert_eq!(tagged.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(tagged.client_message(), "Error creating post");
        assert!(tagged.to_string().contains("connection reset by peer"));
    }

    #[test]
    fn during_leaves_client_errors_alone() {
        let err = AppError::during("Error updating post")(AppError::post_not_found());
        assert_eq!(err.client_message(), "Post not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
