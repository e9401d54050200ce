//! Affiche composes photo posters: one fixed, hand-tuned template that
//! lays out an uploaded photograph, its extracted color palette, free-text
//! fields, and a row of logos onto a 2:3 canvas, at preview or export
//! resolution, with pixel-identical geometry across tiers.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: decode the upload, extract the palette, load the logo
//!    set (`PreparedImage`, `Palette`, `LogoSet`); all IO happens here.
//! 2. **Compose**: `poster::compose::render` draws the template onto a
//!    premultiplied RGBA8 `Surface` in a fixed order; pure and
//!    deterministic for a given input.
//! 3. **Publish**: preview output lands in the generation-gated
//!    `PreviewSlot`; export output is encoded to a downloadable PNG.
//!
//! The companion `service` module proxies the mailing-list, geocoding and
//! quote providers and exposes the render pipeline over HTTP.
#![forbid(unsafe_code)]

pub mod assets;
pub mod foundation;
pub mod layout;
pub mod poster;
pub mod raster;
pub mod service;
pub mod text;

pub use assets::decode::{PreparedImage, decode_image};
pub use assets::fetch::{AssetFetcher, normalize_rel_path};
pub use assets::logos::{LogoRef, LogoSet};
pub use assets::palette::{DEFAULT_PALETTE_SIZE, extract_palette};
pub use foundation::core::{Canvas, Palette, QualityTier, Rgb8, Rgba8};
pub use foundation::error::{AfficheError, AfficheResult};
pub use layout::fit::{CropRect, cover_crop};
pub use layout::wrap::{Overflow, break_word, wrap_text, wrap_text_with};
pub use poster::compose::{
    DownloadAction, EXPORT_FILE_NAME, RenderOptions, RenderedPoster, export, render,
};
pub use poster::inputs::{PosterInputs, capitalize_words};
pub use poster::preview::{PreviewSlot, PreviewSnapshot, RenderTicket};
pub use poster::template::{RegionKind, Regions};
pub use service::config::ServiceConfig;
pub use text::font::{FontLibrary, FontStyle};
