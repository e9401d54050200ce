use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Palette, Rgb8},
    foundation::error::{AfficheError, AfficheResult},
    raster::blend,
};

/// Number of representative colors requested from the quantizer.
pub const DEFAULT_PALETTE_SIZE: u8 = 5;

/// Sampling quality passed to the quantizer (1 is exhaustive, 10 samples
/// every tenth pixel).
const QUANTIZER_QUALITY: u8 = 10;

/// Extract an ordered palette from a decoded image.
///
/// The quantizer is an external collaborator invoked as a black box over
/// straight-alpha pixels; the first returned color is the dominant one.
/// The result is truncated to `count` entries, the quantizer being free to
/// return a handful more or fewer depending on the image.
pub fn extract_palette(image: &PreparedImage, count: u8) -> AfficheResult<Palette> {
    let mut straight = Vec::with_capacity(image.rgba8_premul.len());
    for px in image.rgba8_premul.chunks_exact(4) {
        straight.extend_from_slice(&blend::unpremultiply([px[0], px[1], px[2], px[3]]));
    }

    let want = count.clamp(2, 255);
    let colors = color_thief::get_palette(
        &straight,
        color_thief::ColorFormat::Rgba,
        QUANTIZER_QUALITY,
        want,
    )
    .map_err(|e| AfficheError::asset(format!("palette extraction failed: {e:?}")))?;

    Ok(Palette(
        colors
            .into_iter()
            .take(count as usize)
            .map(|c| Rgb8::new(c.r, c.g, c.b))
            .collect(),
    ))
}
