use kurbo::Rect;

use crate::{
    assets::{decode, decode::PreparedImage, fetch::AssetFetcher},
    foundation::core::{Canvas, Rgba8},
    foundation::error::AfficheResult,
    layout::fit::CropRect,
    raster::surface::Surface,
    text::{
        font::{FontLibrary, FontStyle},
        raster::{self, Baseline, HAlign, TextStyle},
    },
};

/// Bottom edge of the logo row as a fraction of canvas height.
const LOGO_BOTTOM_FRAC: f64 = 0.98;
/// Spacing between logo slots as a fraction of canvas width.
const LOGO_SPACING_FRAC: f64 = 0.02;
/// Placeholder label font size as a fraction of canvas height.
const LOGO_LABEL_FRAC: f64 = 0.02;

const PLACEHOLDER_FILL: Rgba8 = Rgba8::new(0xCC, 0xCC, 0xCC, 255);
const PLACEHOLDER_LABEL: Rgba8 = Rgba8::new(0x66, 0x66, 0x66, 255);

fn default_width_frac() -> f64 {
    0.04
}

fn default_height_frac() -> f64 {
    0.010
}

/// One logo reference: an image-source identifier plus its fixed slot size
/// expressed as canvas fractions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoRef {
    pub source: String,
    #[serde(default = "default_width_frac")]
    pub width_frac: f64,
    #[serde(default = "default_height_frac")]
    pub height_frac: f64,
}

impl LogoRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width_frac: default_width_frac(),
            height_frac: default_height_frac(),
        }
    }
}

/// Pixel slots for the logo row. All slots are fixed before any load is
/// attempted: total group width is the sum of per-logo widths plus
/// inter-logo spacing, centered horizontally, each logo bottom-aligned.
/// A failed load therefore cannot shift a sibling.
pub fn compute_slots(canvas: Canvas, refs: &[LogoRef]) -> Vec<Rect> {
    let w = canvas.w();
    let h = canvas.h();
    let spacing = w * LOGO_SPACING_FRAC;
    let bottom = h * LOGO_BOTTOM_FRAC;

    let total: f64 = refs.iter().map(|r| r.width_frac * w).sum::<f64>()
        + spacing * refs.len().saturating_sub(1) as f64;

    let mut x = (w - total) / 2.0;
    let mut slots = Vec::with_capacity(refs.len());
    for r in refs {
        let slot_w = r.width_frac * w;
        let slot_h = r.height_frac * h;
        slots.push(Rect::new(x, bottom - slot_h, x + slot_w, bottom));
        x += slot_w + spacing;
    }
    slots
}

/// Bounding box of the whole logo row (empty refs give a zero-width rect
/// on the bottom anchor line).
pub fn row_bounds(canvas: Canvas, refs: &[LogoRef]) -> Rect {
    let slots = compute_slots(canvas, refs);
    let bottom = canvas.h() * LOGO_BOTTOM_FRAC;
    let mut bounds = Rect::new(canvas.w() / 2.0, bottom, canvas.w() / 2.0, bottom);
    for slot in slots {
        bounds = bounds.union(slot);
    }
    bounds
}

/// One attempted logo: either its decoded image or the fallback marker.
#[derive(Clone, Debug)]
pub struct PreparedLogo {
    pub image: Option<PreparedImage>,
}

impl PreparedLogo {
    pub fn is_fallback(&self) -> bool {
        self.image.is_none()
    }
}

/// The prepared logo set. Preparation is the join of N independent
/// load-or-fallback tasks; it completes only once every reference has
/// either decoded or been marked as a fallback, and it never fails as a
/// whole. Entries keep input order regardless of completion order.
#[derive(Clone, Debug, Default)]
pub struct LogoSet {
    logos: Vec<PreparedLogo>,
}

impl LogoSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub async fn prepare(refs: &[LogoRef], fetcher: &AssetFetcher) -> Self {
        let tasks = refs.iter().map(|r| load_one(r, fetcher));
        let logos = futures::future::join_all(tasks).await;
        Self { logos }
    }

    pub fn len(&self) -> usize {
        self.logos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PreparedLogo> {
        self.logos.get(idx)
    }
}

async fn load_one(logo: &LogoRef, fetcher: &AssetFetcher) -> PreparedLogo {
    let image = match fetcher.fetch(&logo.source).await {
        Ok(bytes) => match decode::decode_image(&bytes) {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(source = %logo.source, %err, "logo decode failed, using placeholder");
                None
            }
        },
        Err(err) => {
            tracing::warn!(source = %logo.source, %err, "logo fetch failed, using placeholder");
            None
        }
    };
    PreparedLogo { image }
}

/// Draw the logo row into its precomputed slots, left to right by input
/// index. Loaded logos are stretched to their slot; failures draw a neutral
/// box with a centered "Logo" label so the layout never collapses.
pub fn draw_row(
    surface: &mut Surface,
    canvas: Canvas,
    refs: &[LogoRef],
    set: &LogoSet,
    fonts: &FontLibrary,
) -> AfficheResult<()> {
    let slots = compute_slots(canvas, refs);
    let label_style = TextStyle::new(FontStyle::Regular, canvas.h() * LOGO_LABEL_FRAC);

    for (idx, slot) in slots.iter().enumerate() {
        match set.get(idx).and_then(|l| l.image.as_ref()) {
            Some(image) => {
                let crop = CropRect {
                    x: 0.0,
                    y: 0.0,
                    width: f64::from(image.width),
                    height: f64::from(image.height),
                };
                surface.draw_image(image, crop, *slot)?;
            }
            None => {
                surface.fill_rect(*slot, PLACEHOLDER_FILL);
                raster::draw(
                    surface,
                    fonts,
                    &label_style,
                    "Logo",
                    slot.center().x,
                    slot.center().y,
                    HAlign::Center,
                    Baseline::Middle,
                    PLACEHOLDER_LABEL,
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas { width: 800, height: 1200 }
    }

    fn refs() -> Vec<LogoRef> {
        vec![
            LogoRef { source: "logos/a.png".into(), width_frac: 0.02, height_frac: 0.010 },
            LogoRef { source: "logos/b.png".into(), width_frac: 0.08, height_frac: 0.010 },
            LogoRef { source: "logos/c.png".into(), width_frac: 0.04, height_frac: 0.010 },
        ]
    }

    #[test]
    fn slots_are_centered_as_a_group() {
        let slots = compute_slots(canvas(), &refs());
        assert_eq!(slots.len(), 3);
        // widths 16 + 64 + 32 plus two 16px gaps = 144; centered start at 328.
        assert!((slots[0].x0 - 328.0).abs() < 1e-9);
        assert!((slots[2].x1 - 472.0).abs() < 1e-9);
        for slot in &slots {
            assert!((slot.y1 - 1176.0).abs() < 1e-9, "bottom-aligned at 0.98h");
        }
    }

    #[test]
    fn slot_positions_do_not_depend_on_load_outcome() {
        // Slots are a pure function of the references; the prepared set is
        // not consulted.
        let before = compute_slots(canvas(), &refs());
        let after = compute_slots(canvas(), &refs());
        assert_eq!(before, after);
    }

    #[test]
    fn empty_row_bounds_sit_on_the_anchor_line() {
        let b = row_bounds(canvas(), &[]);
        assert_eq!(b.width(), 0.0);
        assert!((b.y1 - 1176.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unreachable_sources_become_fallbacks() {
        let fetcher = AssetFetcher::new("/nonexistent-root");
        let set = LogoSet::prepare(&refs(), &fetcher).await;
        assert_eq!(set.len(), 3);
        assert!(set.get(0).unwrap().is_fallback());
        assert!(set.get(2).unwrap().is_fallback());
    }

    #[tokio::test]
    async fn fallback_draws_placeholder_in_precomputed_slot() {
        let fetcher = AssetFetcher::new("/nonexistent-root");
        let refs = refs();
        let set = LogoSet::prepare(&refs, &fetcher).await;

        let mut surface = Surface::new(canvas()).unwrap();
        draw_row(&mut surface, canvas(), &refs, &set, &FontLibrary::empty()).unwrap();

        let slots = compute_slots(canvas(), &refs);
        let c = slots[1].center();
        assert_eq!(
            surface.pixel(c.x as u32, c.y as u32).unwrap(),
            [0xCC, 0xCC, 0xCC, 255]
        );
        // Outside the row nothing is painted.
        assert_eq!(surface.pixel(10, 10).unwrap(), [0, 0, 0, 0]);
    }
}
