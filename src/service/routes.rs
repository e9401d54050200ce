use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    assets::{decode, fetch::AssetFetcher, logos::LogoSet, palette},
    foundation::core::{Palette, QualityTier},
    foundation::error::AfficheResult,
    poster::{
        compose::{self, RenderOptions},
        inputs::PosterInputs,
        preview::PreviewSlot,
    },
    service::{config::ServiceConfig, error::ApiError, geocode, quote, subscribe},
    text::font::FontLibrary,
};

const GENERATION_HEADER: &str = "x-render-generation";
const DOWNLOAD_READY_HEADER: &str = "x-download-ready";

/// Shared state for the companion API. Fonts are loaded once at startup;
/// the preview slot is the only mutable piece.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub http: reqwest::Client,
    pub fetcher: AssetFetcher,
    pub fonts: Arc<FontLibrary>,
    pub preview: Arc<PreviewSlot>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let fonts = FontLibrary::load_dir(&config.fonts_dir);
        if fonts.is_empty() {
            tracing::warn!(dir = %config.fonts_dir.display(), "no font faces loaded, posters will render without text");
        }
        Self {
            fetcher: AssetFetcher::new(config.assets_root.clone()),
            config: Arc::new(config),
            http: reqwest::Client::new(),
            fonts: Arc::new(fonts),
            preview: Arc::new(PreviewSlot::new()),
        }
    }
}

/// A poster render request: the text fields, an optional image source
/// identifier, and the output tier.
#[derive(Debug, serde::Deserialize)]
pub struct PosterRequest {
    pub inputs: PosterInputs,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub quality: QualityTier,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/poster", post(render_poster))
        .route("/api/preview", get(current_preview))
        .route("/api/subscribe", post(subscribe::subscribe))
        .route("/api/geocode", get(geocode::geocode))
        .route("/api/quote", get(quote::quote))
        .with_state(state)
}

/// Bind and serve the companion API until the process is stopped.
pub async fn serve(listen: SocketAddr, config: ServiceConfig) -> AfficheResult<()> {
    let state = AppState::new(config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("bind {listen}"))?;
    tracing::info!(%listen, "affiche api listening");
    axum::serve(listener, app).await.context("serve api")?;
    Ok(())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Render a poster. Preview renders publish into the preview slot (newer
/// requests supersede unfinished older ones); export renders validate the
/// full field set and answer with a downloadable attachment. The response
/// body is always the encoded PNG.
pub async fn render_poster(
    State(state): State<AppState>,
    Json(req): Json<PosterRequest>,
) -> Result<Response, ApiError> {
    // Claim the generation before any awaits so a newer request supersedes
    // this one even while it is still loading assets.
    let ticket = match req.quality {
        QualityTier::Preview => Some(state.preview.begin()),
        _ => None,
    };

    let image = match &req.image {
        Some(source) => {
            let bytes = state.fetcher.fetch(source).await.map_err(|err| {
                tracing::warn!(%source, %err, "image source unavailable");
                ApiError::BadRequest(
                    "Failed to load the image. Please try again with a different file.".into(),
                )
            })?;
            Some(decode::decode_image(&bytes).map_err(|err| {
                tracing::warn!(%source, %err, "image decode failed");
                ApiError::BadRequest(
                    "Failed to load the image. Please try again with a different file.".into(),
                )
            })?)
        }
        None => None,
    };

    let extracted = match &image {
        Some(img) => palette::extract_palette(img, palette::DEFAULT_PALETTE_SIZE)?,
        None => Palette::default(),
    };

    let logos = LogoSet::prepare(&req.inputs.logos, &state.fetcher).await;

    if req.quality != QualityTier::Preview {
        let action = compose::export(
            &req.inputs,
            &extracted,
            req.quality,
            image.as_ref(),
            &logos,
            &state.fonts,
        )?;
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        let disposition = format!("attachment; filename=\"{}\"", action.file_name);
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| ApiError::upstream("An error occurred", Some(json!(e.to_string()))))?,
        );
        return Ok((headers, action.png).into_response());
    }

    let image_available = image.is_some();
    let rendered = compose::render(
        &req.inputs,
        &extracted,
        RenderOptions { quality: QualityTier::Preview },
        image.as_ref(),
        &logos,
        &state.fonts,
    )?;
    let png = rendered.to_png()?;

    let mut published = false;
    if let Some(ticket) = ticket {
        published = state.preview.publish(ticket, rendered, image_available);
        if !published {
            tracing::debug!(
                generation = ticket.generation(),
                "stale preview render discarded"
            );
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(
        GENERATION_HEADER,
        HeaderValue::from_str(&state.preview.snapshot().generation.to_string())
            .unwrap_or(HeaderValue::from_static("0")),
    );
    headers.insert(
        DOWNLOAD_READY_HEADER,
        HeaderValue::from_static(if image_available && published { "true" } else { "false" }),
    );
    Ok((headers, png).into_response())
}

/// Serve the currently published preview, if any.
pub async fn current_preview(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snap = state.preview.snapshot();
    let Some(poster) = snap.poster else {
        return Err(ApiError::NotFound("No preview available".into()));
    };
    let png = poster.to_png()?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(
        GENERATION_HEADER,
        HeaderValue::from_str(&snap.generation.to_string())
            .unwrap_or(HeaderValue::from_static("0")),
    );
    headers.insert(
        DOWNLOAD_READY_HEADER,
        HeaderValue::from_static(if snap.download_ready { "true" } else { "false" }),
    );
    Ok((headers, png).into_response())
}
