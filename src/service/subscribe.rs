use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::service::{error::ApiError, routes::AppState};

#[derive(Debug, serde::Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email_address: String,
}

#[derive(Debug, serde::Serialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub data: Value,
}

/// Forward an email-capture signup to the mailing-list provider.
///
/// Success returns the provider's subscriber record verbatim. A
/// "Member Exists" rejection from the provider is surfaced as the
/// distinguished already-subscribed message; everything else maps to the
/// generic failure with upstream detail attached.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    if req.email_address.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".into()));
    }

    let Some((api_key, server_prefix, audience_id)) = state.config.mailchimp() else {
        return Err(ApiError::Config("API key is not set".into()));
    };

    let url = format!(
        "https://{server_prefix}.api.mailchimp.com/3.0/lists/{audience_id}/members"
    );
    tracing::debug!(email = %req.email_address, "subscribing to mailing list");

    let resp = state
        .http
        .post(&url)
        .basic_auth("anystring", Some(api_key))
        .json(&json!({
            "email_address": req.email_address,
            "status": "subscribed",
        }))
        .send()
        .await
        .map_err(|e| ApiError::upstream("An error occurred", Some(json!(e.to_string()))))?;

    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(Json(SubscribeResponse {
            message: "Success".into(),
            data: body,
        }));
    }

    Err(map_list_error(&body))
}

/// Classify a provider error body.
pub fn map_list_error(body: &Value) -> ApiError {
    if body.get("title").and_then(Value::as_str) == Some("Member Exists") {
        return ApiError::AlreadySubscribed;
    }
    ApiError::upstream("An error occurred", Some(body.clone()))
}
