use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::foundation::error::AfficheError;

/// User-facing API failure, mapped onto a small set of stable messages.
/// Upstream detail rides along for diagnostics only.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Distinguished duplicate-subscription case: a soft rejection with its
    /// own message, not the generic failure.
    AlreadySubscribed,
    NotFound(String),
    /// A provider credential is missing from the environment.
    Config(String),
    Upstream {
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl ApiError {
    pub fn upstream(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self::Upstream {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::AlreadySubscribed => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Config(_) | ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Config(msg) => {
                msg.clone()
            }
            ApiError::AlreadySubscribed => "Email is already subscribed".to_string(),
            ApiError::Upstream { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.message() });
        if let ApiError::Upstream { details: Some(details), .. } = &self {
            body["details"] = details.clone();
        }
        (status, Json(body)).into_response()
    }
}

impl From<AfficheError> for ApiError {
    fn from(err: AfficheError) -> Self {
        match err {
            AfficheError::Validation(msg) => ApiError::BadRequest(msg),
            AfficheError::External(msg) => ApiError::upstream(msg, None),
            other => ApiError::upstream("An error occurred", Some(json!(other.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_subscription_is_a_soft_rejection() {
        let err = ApiError::AlreadySubscribed;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Email is already subscribed");
    }

    #[test]
    fn missing_config_is_a_500_class_error() {
        let err = ApiError::Config("API key is not set".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_become_bad_requests() {
        let err: ApiError = AfficheError::validation("title must be set").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("title"));
    }
}
