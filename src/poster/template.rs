use kurbo::Rect;

use crate::{
    assets::logos::{self, LogoRef},
    foundation::core::{Canvas, Rgba8},
};

// The poster is one fixed, hand-tuned template. Every coordinate below is a
// fraction of canvas width or height, so the same layout reproduces at any
// quality tier.

pub const BACKGROUND: Rgba8 = Rgba8::new(0xF6, 0xF1, 0xE5, 255);
pub const INK: Rgba8 = Rgba8::new(0x00, 0x00, 0x00, 255);
pub const CREDIT_INK: Rgba8 = Rgba8::new(0x33, 0x33, 0x33, 255);
pub const LOCATION_INK: Rgba8 = Rgba8::new(0x55, 0x55, 0x55, 255);
pub const PLACEHOLDER_BORDER: Rgba8 = Rgba8::new(0xCC, 0xCC, 0xCC, 255);
pub const PLACEHOLDER_GLYPH: Rgba8 = Rgba8::new(0xAA, 0xAA, 0xAA, 255);

/// Title rule vertical position (h) and horizontal extent (w).
pub const RULE_Y: f64 = 0.015;
pub const RULE_X0: f64 = 0.03;
pub const RULE_X1: f64 = 0.97;
pub const RULE_THICKNESS: f64 = 0.002;

/// Year, right-aligned at the rule's trailing edge (h).
pub const YEAR_DROP: f64 = 0.017;
pub const YEAR_SIZE: f64 = 0.02;

/// Title text, below the rule (h except TITLE_X).
pub const TITLE_DROP: f64 = 0.05;
pub const TITLE_SIZE: f64 = 0.05;
pub const TITLE_X: f64 = 0.025;

/// Near-square image area (w except IMAGE_DROP).
pub const IMAGE_DROP: f64 = 0.055;
pub const IMAGE_W: f64 = 0.95;
pub const IMAGE_X: f64 = 0.025;

/// Upload placeholder drawn when no image is available.
pub const PLACEHOLDER_X: f64 = 0.05;
pub const PLACEHOLDER_W: f64 = 0.9;
pub const PLUS_SIZE: f64 = 0.05;
pub const PLUS_STROKE: f64 = 0.01;
pub const CAPTION_SIZE: f64 = 0.035;
pub const CAPTION_DROP: f64 = 0.02;
pub const CAPTION_TEXT: &str = "Drag image here or click to upload";

/// Palette band. The band deliberately overlaps the image area's bottom
/// margin (negative offset); the swatches themselves are centered inside
/// the band and land just below the image edge. Intentional tight
/// stacking, not a bug.
pub const PALETTE_BAND_OFFSET: f64 = -0.03;
pub const PALETTE_BAND_H: f64 = 0.1;
pub const SWATCH_H_RATIO: f64 = 0.2;
pub const STRIP_X: f64 = 0.025;
pub const STRIP_W: f64 = 0.95;

/// Text block under the palette band.
pub const TEXT_X: f64 = 0.025;
pub const TEXT_TOP_OFFSET: f64 = -0.025;
pub const CREDIT_SIZE: f64 = 0.0225;
pub const CREDIT_GAP: f64 = 0.04;
pub const LOCATION_BACKUP: f64 = -0.015;
pub const LOCATION_SIZE: f64 = 0.0125;
pub const COORDS_DROP: f64 = 0.015;
pub const COORDS_SIZE: f64 = 0.01;
pub const AFTER_LOCATION_GAP: f64 = 0.04;
pub const QUOTE_BACKUP: f64 = -0.01;
pub const QUOTE_SIZE: f64 = 0.0125;
pub const QUOTE_MAX_W: f64 = 0.9;
pub const QUOTE_LINE_H: f64 = 0.015;

/// Bottom of the text block, which is also where the logo row begins.
pub const TEXT_BLOCK_BOTTOM: f64 = 0.97;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    TitleRule,
    TitleText,
    ImageArea,
    PaletteStrip,
    TextBlock,
    LogoRow,
}

/// The six named layout regions, computed top to bottom, each origin
/// derived from the bottom edge of the previous region plus its fixed
/// fractional gap. Regions never overlap by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Regions {
    pub title_rule: Rect,
    pub title_text: Rect,
    pub image_area: Rect,
    pub palette_strip: Rect,
    pub text_block: Rect,
    pub logo_row: Rect,
}

impl Regions {
    pub fn compute(canvas: Canvas, logos: &[LogoRef]) -> Self {
        let w = canvas.w();
        let h = canvas.h();

        let rule_y = RULE_Y * h;
        let title_rule = Rect::new(
            RULE_X0 * w,
            rule_y,
            RULE_X1 * w,
            rule_y + YEAR_DROP * h + (YEAR_SIZE * h) / 2.0,
        );

        let title_top = rule_y + TITLE_DROP * h;
        let title_text = Rect::new(TITLE_X * w, title_top, (1.0 - TITLE_X) * w, title_top + TITLE_SIZE * h);

        let image_top = title_top + IMAGE_DROP * h;
        let image_side = IMAGE_W * w;
        let image_area = Rect::new(IMAGE_X * w, image_top, IMAGE_X * w + image_side, image_top + image_side);

        let band_top = image_area.y1 + PALETTE_BAND_OFFSET * h;
        let band_h = PALETTE_BAND_H * h;
        let swatch_h = band_h * SWATCH_H_RATIO;
        let swatch_top = band_top + (band_h - swatch_h) / 2.0;
        let palette_strip = Rect::new(STRIP_X * w, swatch_top, (STRIP_X + STRIP_W) * w, swatch_top + swatch_h);

        let text_top = band_top + band_h + TEXT_TOP_OFFSET * h;
        let text_block = Rect::new(TEXT_X * w, text_top, (STRIP_X + STRIP_W) * w, TEXT_BLOCK_BOTTOM * h);

        let logo_row = logos::row_bounds(canvas, logos);

        Self {
            title_rule,
            title_text,
            image_area,
            palette_strip,
            text_block,
            logo_row,
        }
    }

    pub fn named(&self) -> [(RegionKind, Rect); 6] {
        [
            (RegionKind::TitleRule, self.title_rule),
            (RegionKind::TitleText, self.title_text),
            (RegionKind::ImageArea, self.image_area),
            (RegionKind::PaletteStrip, self.palette_strip),
            (RegionKind::TextBlock, self.text_block),
            (RegionKind::LogoRow, self.logo_row),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::QualityTier;

    fn overlap_area(a: Rect, b: Rect) -> f64 {
        let r = a.intersect(b);
        if r.width() <= 0.0 || r.height() <= 0.0 {
            0.0
        } else {
            r.width() * r.height()
        }
    }

    fn sample_logos() -> Vec<LogoRef> {
        vec![LogoRef::new("logos/a.png"), LogoRef::new("logos/b.png")]
    }

    #[test]
    fn regions_do_not_overlap_and_stay_in_bounds() {
        for tier in [QualityTier::Preview, QualityTier::Low, QualityTier::High] {
            let canvas = tier.canvas();
            let regions = Regions::compute(canvas, &sample_logos());
            let named = regions.named();

            let bounds = Rect::new(0.0, 0.0, canvas.w(), canvas.h());
            for (kind, rect) in named {
                assert!(
                    bounds.contains(rect.origin()) && rect.x1 <= bounds.x1 && rect.y1 <= bounds.y1,
                    "{kind:?} escapes the canvas at {tier:?}: {rect:?}"
                );
            }
            for i in 0..named.len() {
                for j in (i + 1)..named.len() {
                    let area = overlap_area(named[i].1, named[j].1);
                    assert!(
                        area < 1e-6,
                        "{:?} overlaps {:?} by {area} at {tier:?}",
                        named[i].0,
                        named[j].0
                    );
                }
            }
        }
    }

    #[test]
    fn regions_are_ordered_top_to_bottom() {
        let regions = Regions::compute(QualityTier::Preview.canvas(), &sample_logos());
        let named = regions.named();
        for pair in named.windows(2) {
            assert!(
                pair[0].1.y0 <= pair[1].1.y0,
                "{:?} starts below {:?}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn fractional_boxes_match_across_quality_tiers() {
        let logos = sample_logos();
        let a = QualityTier::Preview.canvas();
        let b = QualityTier::Low.canvas();
        let ra = Regions::compute(a, &logos);
        let rb = Regions::compute(b, &logos);

        for ((kind, rect_a), (_, rect_b)) in ra.named().into_iter().zip(rb.named()) {
            let fa = [
                rect_a.x0 / a.w(),
                rect_a.y0 / a.h(),
                rect_a.x1 / a.w(),
                rect_a.y1 / a.h(),
            ];
            let fb = [
                rect_b.x0 / b.w(),
                rect_b.y0 / b.h(),
                rect_b.x1 / b.w(),
                rect_b.y1 / b.h(),
            ];
            for (va, vb) in fa.iter().zip(fb.iter()) {
                assert!((va - vb).abs() < 1e-9, "{kind:?} drifts between tiers");
            }
        }
    }

    #[test]
    fn palette_band_overlaps_image_margin_but_swatches_do_not() {
        let canvas = QualityTier::Preview.canvas();
        let regions = Regions::compute(canvas, &[]);
        let band_top = regions.image_area.y1 + PALETTE_BAND_OFFSET * canvas.h();
        assert!(band_top < regions.image_area.y1, "band offset must stay negative");
        assert!(regions.palette_strip.y0 >= regions.image_area.y1);
    }
}
