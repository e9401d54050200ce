use crate::foundation::error::{AfficheError, AfficheResult};

/// Crop rectangle in source-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute the source crop that fills `target_w x target_h` with cover
/// semantics: aspect-preserving, center-cropped, no letterboxing.
///
/// The returned rectangle is always fully contained in the source and its
/// aspect ratio equals the target's. Non-positive dimensions on either side
/// are a caller bug and fail loudly.
pub fn cover_crop(
    source_w: f64,
    source_h: f64,
    target_w: f64,
    target_h: f64,
) -> AfficheResult<CropRect> {
    if !(source_w > 0.0 && source_h > 0.0 && target_w > 0.0 && target_h > 0.0) {
        return Err(AfficheError::layout(format!(
            "cover_crop requires positive dimensions (source {source_w}x{source_h}, target {target_w}x{target_h})"
        )));
    }

    let source_aspect = source_w / source_h;
    let target_aspect = target_w / target_h;

    let crop = if source_aspect > target_aspect {
        // Source is relatively wider: keep full height, slice a centered width.
        let width = source_h * target_aspect;
        CropRect {
            x: (source_w - width) / 2.0,
            y: 0.0,
            width,
            height: source_h,
        }
    } else {
        // Source is relatively taller: keep full width, slice a centered height.
        let height = source_w / target_aspect;
        CropRect {
            x: 0.0,
            y: (source_h - height) / 2.0,
            width: source_w,
            height,
        }
    };

    Ok(crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_invariants(sw: f64, sh: f64, tw: f64, th: f64) {
        let c = cover_crop(sw, sh, tw, th).unwrap();
        assert!(c.x >= -EPS, "x {} for {sw}x{sh} -> {tw}x{th}", c.x);
        assert!(c.y >= -EPS, "y {} for {sw}x{sh} -> {tw}x{th}", c.y);
        assert!(c.x + c.width <= sw + EPS);
        assert!(c.y + c.height <= sh + EPS);
        let crop_aspect = c.width / c.height;
        let target_aspect = tw / th;
        assert!(
            (crop_aspect - target_aspect).abs() < 1e-6,
            "aspect {crop_aspect} vs {target_aspect}"
        );
    }

    #[test]
    fn wider_source_keeps_full_height() {
        let c = cover_crop(400.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!(c.height, 100.0);
        assert_eq!(c.width, 100.0);
        assert_eq!(c.x, 150.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn taller_source_keeps_full_width() {
        let c = cover_crop(100.0, 400.0, 100.0, 100.0).unwrap();
        assert_eq!(c.width, 100.0);
        assert_eq!(c.height, 100.0);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 150.0);
    }

    #[test]
    fn matching_aspect_is_full_source() {
        let c = cover_crop(200.0, 300.0, 20.0, 30.0).unwrap();
        assert_eq!(c, CropRect { x: 0.0, y: 0.0, width: 200.0, height: 300.0 });
    }

    #[test]
    fn crop_is_contained_across_a_size_grid() {
        let sizes = [1.0, 7.0, 99.0, 640.0, 1080.0, 6000.0];
        for &sw in &sizes {
            for &sh in &sizes {
                for &tw in &sizes {
                    for &th in &sizes {
                        assert_invariants(sw, sh, tw, th);
                    }
                }
            }
        }
    }

    #[test]
    fn zero_area_inputs_are_rejected() {
        assert!(cover_crop(0.0, 10.0, 10.0, 10.0).is_err());
        assert!(cover_crop(10.0, 10.0, 10.0, 0.0).is_err());
        assert!(cover_crop(-5.0, 10.0, 10.0, 10.0).is_err());
    }
}
