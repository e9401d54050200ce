use crate::foundation::error::{AfficheError, AfficheResult};

pub use kurbo::{Point, Rect, Vec2};

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> AfficheResult<Self> {
        if width == 0 || height == 0 {
            return Err(AfficheError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

/// Named output-resolution preset. All tiers share the 2:3 poster aspect and
/// one layout algorithm; only the absolute pixel scale differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Preview,
    Low,
    High,
}

impl QualityTier {
    pub fn canvas(self) -> Canvas {
        match self {
            QualityTier::Preview => Canvas {
                width: 800,
                height: 1200,
            },
            QualityTier::Low => Canvas {
                width: 1500,
                height: 2250,
            },
            QualityTier::High => Canvas {
                width: 6000,
                height: 9000,
            },
        }
    }
}

/// Straight (non-premultiplied) 8-bit RGB triple, the palette unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn opaque(self) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a: 255,
        }
    }
}

/// Straight 8-bit RGBA color used by all draw calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Ordered sequence of representative colors extracted from an image.
/// Index 0 is the dominant color; an empty palette means "no accent
/// available" and consumers fall back to neutral colors.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Rgb8>);

impl Palette {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[Rgb8] {
        &self.0
    }

    /// Dominant color, if any has been extracted.
    pub fn dominant(&self) -> Option<Rgb8> {
        self.0.first().copied()
    }

    /// Accent color used by surrounding UI affordances; later palette
    /// entries are preferred over the dominant background color.
    pub fn accent(&self) -> Option<Rgb8> {
        self.0.get(1).copied().or_else(|| self.dominant())
    }

    /// CSS gradient string for the page background, with a neutral
    /// two-stop fallback when no palette is available.
    pub fn css_gradient(&self, opacity: f64) -> String {
        if self.0.is_empty() {
            return format!(
                "linear-gradient(135deg, rgba(245, 247, 250, {opacity}) 0%, rgba(195, 207, 226, {opacity}) 100%)"
            );
        }
        let last = self.0.len().saturating_sub(1).max(1) as f64;
        let stops = self
            .0
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let pct = (i as f64 / last) * 100.0;
                format!("rgba({},{},{}, {opacity}) {pct:.0}%", c.r, c.g, c.b)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("linear-gradient(135deg, {stops})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(800, 1200).is_ok());
    }

    #[test]
    fn tiers_share_the_poster_aspect() {
        for tier in [QualityTier::Preview, QualityTier::Low, QualityTier::High] {
            let c = tier.canvas();
            assert_eq!(c.width * 3, c.height * 2, "{tier:?} is not 2:3");
        }
    }

    #[test]
    fn empty_palette_has_no_accent_and_neutral_gradient() {
        let p = Palette::default();
        assert!(p.accent().is_none());
        assert!(p.css_gradient(0.5).contains("rgba(245, 247, 250, 0.5)"));
    }

    #[test]
    fn accent_prefers_second_entry() {
        let p = Palette(vec![Rgb8::new(1, 2, 3), Rgb8::new(9, 8, 7)]);
        assert_eq!(p.accent(), Some(Rgb8::new(9, 8, 7)));
        assert_eq!(p.dominant(), Some(Rgb8::new(1, 2, 3)));
    }

    #[test]
    fn tier_serde_is_lowercase() {
        let s = serde_json::to_string(&QualityTier::High).unwrap();
        assert_eq!(s, "\"high\"");
        let de: QualityTier = serde_json::from_str("\"preview\"").unwrap();
        assert_eq!(de, QualityTier::Preview);
    }
}
