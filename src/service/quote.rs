use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::service::{error::ApiError, routes::AppState};

const QUOTE_URL: &str = "https://api.api-ninjas.com/v1/quotes?category=inspirational";

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct QuoteResponse {
    pub content: String,
    pub author: String,
}

/// Fetch one inspirational quote from the third-party source.
pub async fn quote(State(state): State<AppState>) -> Result<Json<QuoteResponse>, ApiError> {
    let Some(api_key) = state.config.api_ninjas_key.as_deref() else {
        return Err(ApiError::Config("API key is not set".into()));
    };

    let resp = state
        .http
        .get(QUOTE_URL)
        .header("X-Api-Key", api_key)
        .send()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch quote", Some(json!(e.to_string()))))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        return Err(ApiError::upstream(
            "Failed to fetch quote",
            Some(json!(format!("HTTP error! status: {status}"))),
        ));
    }

    let body: Value = resp
        .json()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch quote", Some(json!(e.to_string()))))?;

    parse_quote(&body).map(Json).ok_or_else(|| {
        ApiError::upstream("Failed to fetch quote", Some(json!("No quote received from API")))
    })
}

/// Extract the first quote from the provider's response array.
pub fn parse_quote(body: &Value) -> Option<QuoteResponse> {
    let first = body.as_array()?.first()?;
    Some(QuoteResponse {
        content: first.get("quote")?.as_str()?.to_string(),
        author: first.get("author")?.as_str()?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_quote_is_taken() {
        let body = json!([
            { "quote": "Stay curious.", "author": "Anon" },
            { "quote": "Second", "author": "Other" },
        ]);
        let got = parse_quote(&body).unwrap();
        assert_eq!(got.content, "Stay curious.");
        assert_eq!(got.author, "Anon");
    }

    #[test]
    fn empty_or_malformed_bodies_yield_none() {
        assert!(parse_quote(&json!([])).is_none());
        assert!(parse_quote(&json!({ "quote": "not an array" })).is_none());
        assert!(parse_quote(&json!([{ "author": "missing quote" }])).is_none());
    }
}
