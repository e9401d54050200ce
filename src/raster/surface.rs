use kurbo::{Point, Rect};

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Canvas, Rgba8},
    foundation::error::{AfficheError, AfficheResult},
    layout::fit::CropRect,
    raster::blend::{self, PremulRgba8},
};

/// CPU drawing surface backing one render. Pixels are row-major
/// premultiplied RGBA8. A surface is exclusively owned by the render that
/// created it; renders never interleave draw calls on a shared surface.
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> AfficheResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(AfficheError::layout("surface dimensions must be > 0"));
        }
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| AfficheError::layout("surface dimensions overflow"))?;
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Blend one premultiplied pixel over the surface; out-of-bounds
    /// coordinates are clipped.
    pub fn blend_pixel(&mut self, x: i64, y: i64, src: PremulRgba8) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let dst = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
        let out = blend::over(dst, src, 1.0);
        self.data[i..i + 4].copy_from_slice(&out);
    }

    /// Flood the whole surface with one color.
    pub fn fill(&mut self, color: Rgba8) {
        let px = blend::premultiply([color.r, color.g, color.b, color.a]);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let px = blend::premultiply([color.r, color.g, color.b, color.a]);
        let (x0, y0, x1, y1) = self.clip_rect(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * (self.width as usize) + x) * 4;
                let dst = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
                let out = blend::over(dst, px, 1.0);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }

    /// Stroke a rectangle outline with the given edge thickness, drawn
    /// inward from the rectangle bounds.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: f64, color: Rgba8) {
        let t = thickness.max(1.0);
        let top = Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + t);
        let bottom = Rect::new(rect.x0, rect.y1 - t, rect.x1, rect.y1);
        let left = Rect::new(rect.x0, rect.y0 + t, rect.x0 + t, rect.y1 - t);
        let right = Rect::new(rect.x1 - t, rect.y0 + t, rect.x1, rect.y1 - t);
        for side in [top, bottom, left, right] {
            self.fill_rect(side, color);
        }
    }

    /// Stroke a straight segment of the given thickness. Axis-aligned
    /// segments take the exact fill path; anything else rasterizes by
    /// distance to the segment.
    pub fn stroke_line(&mut self, from: Point, to: Point, thickness: f64, color: Rgba8) {
        let half = (thickness / 2.0).max(0.5);
        if (from.y - to.y).abs() < f64::EPSILON {
            let (xa, xb) = if from.x <= to.x { (from.x, to.x) } else { (to.x, from.x) };
            self.fill_rect(Rect::new(xa, from.y - half, xb, from.y + half), color);
            return;
        }
        if (from.x - to.x).abs() < f64::EPSILON {
            let (ya, yb) = if from.y <= to.y { (from.y, to.y) } else { (to.y, from.y) };
            self.fill_rect(Rect::new(from.x - half, ya, from.x + half, yb), color);
            return;
        }

        let px = blend::premultiply([color.r, color.g, color.b, color.a]);
        let bounds = Rect::new(
            from.x.min(to.x) - half,
            from.y.min(to.y) - half,
            from.x.max(to.x) + half,
            from.y.max(to.y) + half,
        );
        let (x0, y0, x1, y1) = self.clip_rect(bounds);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        for y in y0..y1 {
            for x in x0..x1 {
                let cx = x as f64 + 0.5;
                let cy = y as f64 + 0.5;
                let t = (((cx - from.x) * dx + (cy - from.y) * dy) / len_sq).clamp(0.0, 1.0);
                let qx = from.x + t * dx;
                let qy = from.y + t * dy;
                let dist_sq = (cx - qx).powi(2) + (cy - qy).powi(2);
                if dist_sq <= half * half {
                    self.blend_pixel(x as i64, y as i64, px);
                }
            }
        }
    }

    /// Draw a crop of `image` into `dst`, bilinear-resampled. The crop is
    /// expected to come from the cover-crop calculator and must lie inside
    /// the source image.
    pub fn draw_image(&mut self, image: &PreparedImage, crop: CropRect, dst: Rect) -> AfficheResult<()> {
        if crop.width <= 0.0 || crop.height <= 0.0 {
            return Err(AfficheError::layout("draw_image crop must have positive area"));
        }
        if crop.x < 0.0
            || crop.y < 0.0
            || crop.x + crop.width > f64::from(image.width) + 1e-6
            || crop.y + crop.height > f64::from(image.height) + 1e-6
        {
            return Err(AfficheError::layout(
                "draw_image crop exceeds source image bounds",
            ));
        }

        let dst_w = dst.width();
        let dst_h = dst.height();
        if dst_w <= 0.0 || dst_h <= 0.0 {
            return Ok(());
        }

        let (x0, y0, x1, y1) = self.clip_rect(dst);
        for y in y0..y1 {
            for x in x0..x1 {
                // Map the destination pixel center back into crop space.
                let u = (x as f64 + 0.5 - dst.x0) / dst_w;
                let v = (y as f64 + 0.5 - dst.y0) / dst_h;
                let sx = crop.x + u * crop.width - 0.5;
                let sy = crop.y + v * crop.height - 0.5;
                let px = sample_bilinear(image, sx, sy);
                let i = (y * (self.width as usize) + x) * 4;
                let dst_px =
                    [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
                let out = blend::over(dst_px, px, 1.0);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
        Ok(())
    }

    fn clip_rect(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let x0 = rect.x0.floor().max(0.0) as usize;
        let y0 = rect.y0.floor().max(0.0) as usize;
        let x1 = rect.x1.ceil().clamp(0.0, f64::from(self.width)) as usize;
        let y1 = rect.y1.ceil().clamp(0.0, f64::from(self.height)) as usize;
        (x0.min(x1), y0.min(y1), x1, y1)
    }
}

fn sample_bilinear(image: &PreparedImage, sx: f64, sy: f64) -> PremulRgba8 {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let fx = sx.floor();
    let fy = sy.floor();
    let tx = sx - fx;
    let ty = sy - fy;

    let x0 = fx as u32;
    let y0 = fy as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - tx) + f64::from(p10[c]) * tx;
        let bot = f64::from(p01[c]) * (1.0 - tx) + f64::from(p11[c]) * tx;
        out[c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas { width: w, height: h }
    }

    fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for _ in 0..w * h {
            data.extend_from_slice(&rgba);
        }
        PreparedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(data),
        }
    }

    #[test]
    fn new_rejects_zero_area() {
        assert!(Surface::new(canvas(0, 5)).is_err());
        assert!(Surface::new(canvas(5, 5)).is_ok());
    }

    #[test]
    fn fill_rect_is_clipped_to_bounds() {
        let mut s = Surface::new(canvas(4, 4)).unwrap();
        s.fill_rect(Rect::new(-10.0, -10.0, 100.0, 100.0), Rgba8::new(255, 0, 0, 255));
        assert_eq!(s.pixel(0, 0).unwrap(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(3, 3).unwrap(), [255, 0, 0, 255]);
    }

    #[test]
    fn fill_rect_leaves_outside_untouched() {
        let mut s = Surface::new(canvas(4, 4)).unwrap();
        s.fill(Rgba8::new(0, 0, 255, 255));
        s.fill_rect(Rect::new(1.0, 1.0, 3.0, 3.0), Rgba8::new(255, 0, 0, 255));
        assert_eq!(s.pixel(0, 0).unwrap(), [0, 0, 255, 255]);
        assert_eq!(s.pixel(1, 1).unwrap(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 2).unwrap(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(3, 3).unwrap(), [0, 0, 255, 255]);
    }

    #[test]
    fn stroke_rect_draws_border_only() {
        let mut s = Surface::new(canvas(6, 6)).unwrap();
        s.stroke_rect(Rect::new(0.0, 0.0, 6.0, 6.0), 1.0, Rgba8::new(9, 9, 9, 255));
        assert_eq!(s.pixel(0, 0).unwrap(), [9, 9, 9, 255]);
        assert_eq!(s.pixel(5, 5).unwrap(), [9, 9, 9, 255]);
        assert_eq!(s.pixel(3, 3).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn horizontal_line_fills_a_band() {
        let mut s = Surface::new(canvas(8, 8)).unwrap();
        s.stroke_line(
            Point::new(0.0, 4.0),
            Point::new(8.0, 4.0),
            2.0,
            Rgba8::new(1, 2, 3, 255),
        );
        assert_eq!(s.pixel(4, 3).unwrap(), [1, 2, 3, 255]);
        assert_eq!(s.pixel(4, 4).unwrap(), [1, 2, 3, 255]);
        assert_eq!(s.pixel(4, 1).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_fills_destination_with_source_color() {
        let mut s = Surface::new(canvas(10, 10)).unwrap();
        let img = solid_image(20, 20, [10, 200, 30, 255]);
        let crop = CropRect { x: 0.0, y: 0.0, width: 20.0, height: 20.0 };
        s.draw_image(&img, crop, Rect::new(2.0, 2.0, 8.0, 8.0)).unwrap();
        assert_eq!(s.pixel(5, 5).unwrap(), [10, 200, 30, 255]);
        assert_eq!(s.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_rejects_out_of_bounds_crop() {
        let mut s = Surface::new(canvas(10, 10)).unwrap();
        let img = solid_image(4, 4, [1, 1, 1, 255]);
        let crop = CropRect { x: 2.0, y: 0.0, width: 4.0, height: 4.0 };
        assert!(s.draw_image(&img, crop, Rect::new(0.0, 0.0, 4.0, 4.0)).is_err());
    }
}
