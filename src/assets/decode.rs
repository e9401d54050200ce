use std::sync::Arc;

use anyhow::Context;

use crate::{foundation::error::AfficheResult, raster::blend};

/// Decoded raster image in premultiplied RGBA8 form. The decoded upload is
/// owned by the upload handler and shared read-only with every render.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Pixel at (x, y); coordinates are clamped to the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> blend::PremulRgba8 {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let d = &self.rgba8_premul;
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// A byte stream that is not a supported image format fails here with the
/// decoder's diagnostic attached; callers surface that as an upload error
/// and leave prior state untouched.
pub fn decode_image(bytes: &[u8]) -> AfficheResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    blend::premultiply_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}
