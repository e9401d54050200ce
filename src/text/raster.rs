use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};

use crate::{
    foundation::core::Rgba8,
    raster::{blend, surface::Surface},
    text::font::{FontLibrary, FontStyle},
};

/// Resolved text styling for one draw call.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub style: FontStyle,
    pub size: f64,
}

impl TextStyle {
    pub fn new(style: FontStyle, size: f64) -> Self {
        Self { style, size }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Alphabetic,
}

/// Advance width of `text` in pixels, kerning included. An unresolvable
/// style measures zero so layout still proceeds without fonts.
pub fn measure(fonts: &FontLibrary, style: &TextStyle, text: &str) -> f64 {
    let Some(font) = fonts.resolve(style.style) else {
        return 0.0;
    };
    line_width(font, style.size, text)
}

/// Draw one line of text. The anchor `(x, y)` is interpreted through
/// `halign` and `baseline` the way a 2D canvas context interprets
/// `textAlign`/`textBaseline`. Without any loaded font this is a no-op;
/// availability wins over fidelity.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    surface: &mut Surface,
    fonts: &FontLibrary,
    style: &TextStyle,
    text: &str,
    x: f64,
    y: f64,
    halign: HAlign,
    baseline: Baseline,
    color: Rgba8,
) {
    let Some(font) = fonts.resolve(style.style) else {
        tracing::debug!("no font face loaded, skipping text draw");
        return;
    };

    let scale = PxScale::from(style.size as f32);
    let scaled = font.as_scaled(scale);

    let width = line_width(font, style.size, text);
    let origin_x = match halign {
        HAlign::Left => x,
        HAlign::Center => x - width / 2.0,
        HAlign::Right => x - width,
    };

    let ascent = f64::from(scaled.ascent());
    let descent = f64::from(scaled.descent());
    let baseline_y = match baseline {
        Baseline::Top => y + ascent,
        Baseline::Middle => y + (ascent + descent) / 2.0,
        Baseline::Alphabetic => y,
    };

    let mut cursor = origin_x as f32;
    let mut prev = None;
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        let id = glyph.id;
        if let Some(p) = prev {
            cursor += scaled.kern(p, id);
        }
        glyph.position = point(cursor, baseline_y as f32);
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let alpha = (coverage * f32::from(color.a)).round().clamp(0.0, 255.0) as u8;
                if alpha == 0 {
                    return;
                }
                let px = blend::premultiply([color.r, color.g, color.b, alpha]);
                surface.blend_pixel(
                    i64::from(bounds.min.x as i32) + i64::from(gx),
                    i64::from(bounds.min.y as i32) + i64::from(gy),
                    px,
                );
            });
        }
        cursor += scaled.h_advance(id);
        prev = Some(id);
    }
}

fn line_width(font: &FontArc, size: f64, text: &str) -> f64 {
    let scaled = font.as_scaled(PxScale::from(size as f32));
    let mut width = 0.0f32;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    f64::from(width)
}
