use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::service::{error::ApiError, routes::AppState};

#[derive(Debug, serde::Deserialize)]
pub struct GeocodeQuery {
    pub query: Option<String>,
    pub autocomplete: Option<String>,
}

/// One autocomplete suggestion.
#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub place_id: String,
    pub description: String,
}

/// A fully resolved place.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct ResolvedLocation {
    pub formatted: String,
    pub lat: f64,
    pub lng: f64,
    pub components: Value,
}

/// Pass-through proxy to the maps provider. With `autocomplete` set the
/// free-text query returns ordered suggestions; otherwise the query is
/// treated as a place id and resolved to a formatted address plus
/// coordinates.
pub async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Response, ApiError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".into()))?;

    let Some(api_key) = state.config.google_maps_api_key.as_deref() else {
        return Err(ApiError::Config("API key is not set".into()));
    };

    if params.autocomplete.is_some() {
        tracing::debug!(%query, "autocomplete request");
        let body = maps_get(
            &state,
            "https://maps.googleapis.com/maps/api/place/autocomplete/json",
            &[("input", query), ("key", api_key)],
        )
        .await?;
        return Ok(Json(parse_predictions(&body)).into_response());
    }

    tracing::debug!(%query, "geocode request");
    let body = maps_get(
        &state,
        "https://maps.googleapis.com/maps/api/geocode/json",
        &[("place_id", query), ("key", api_key)],
    )
    .await?;

    match parse_geocode(&body) {
        Some(resolved) => Ok(Json(resolved).into_response()),
        None => Err(ApiError::NotFound("Location not found".into())),
    }
}

async fn maps_get(state: &AppState, url: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
    let resp = state
        .http
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| {
            ApiError::upstream("Failed to process location request", Some(json!(e.to_string())))
        })?;
    resp.json().await.map_err(|e| {
        ApiError::upstream("Failed to process location request", Some(json!(e.to_string())))
    })
}

/// Extract ordered suggestions from an autocomplete response body.
pub fn parse_predictions(body: &Value) -> Vec<Suggestion> {
    body.get("predictions")
        .and_then(Value::as_array)
        .map(|preds| {
            preds
                .iter()
                .filter_map(|p| {
                    Some(Suggestion {
                        place_id: p.get("place_id")?.as_str()?.to_string(),
                        description: p.get("description")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the first geocoding result, if any.
pub fn parse_geocode(body: &Value) -> Option<ResolvedLocation> {
    let result = body.get("results")?.as_array()?.first()?;
    let location = result.get("geometry")?.get("location")?;
    Some(ResolvedLocation {
        formatted: result.get("formatted_address")?.as_str()?.to_string(),
        lat: location.get("lat")?.as_f64()?,
        lng: location.get("lng")?.as_f64()?,
        components: result
            .get("address_components")
            .cloned()
            .unwrap_or(Value::Null),
    })
}
