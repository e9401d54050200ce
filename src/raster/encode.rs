use std::io::Cursor;

use anyhow::Context;

use crate::{
    foundation::error::{AfficheError, AfficheResult},
    raster::blend,
};

/// Encode a premultiplied RGBA8 buffer as a PNG byte stream.
///
/// PNG carries straight alpha, so pixels are unpremultiplied first.
pub fn encode_png(width: u32, height: u32, rgba8_premul: &[u8]) -> AfficheResult<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| AfficheError::layout("png dimensions overflow"))?;
    if rgba8_premul.len() != expected {
        return Err(AfficheError::layout(format!(
            "png buffer length {} does not match {width}x{height}",
            rgba8_premul.len()
        )));
    }

    let mut straight = Vec::with_capacity(rgba8_premul.len());
    for px in rgba8_premul.chunks_exact(4) {
        straight.extend_from_slice(&blend::unpremultiply([px[0], px[1], px[2], px[3]]));
    }

    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| AfficheError::layout("png buffer construction failed"))?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .context("encode poster png")?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_valid_png_signature() {
        let data = vec![255u8; 2 * 2 * 4];
        let png = encode_png(2, 2, &data).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        assert!(encode_png(2, 2, &[0u8; 3]).is_err());
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut data = Vec::new();
        for i in 0..16u32 {
            data.extend_from_slice(&[(i * 16) as u8, 7, 9, 255]);
        }
        let a = encode_png(4, 4, &data).unwrap();
        let b = encode_png(4, 4, &data).unwrap();
        assert_eq!(a, b);
    }
}
