use kurbo::{Point, Rect};

use crate::{
    assets::{decode::PreparedImage, logos, logos::LogoSet},
    foundation::core::{Palette, QualityTier},
    foundation::error::AfficheResult,
    layout::{fit, wrap},
    poster::inputs::{PosterInputs, capitalize_words},
    poster::template::{self, Regions},
    raster::{encode, surface::Surface},
    text::{
        font::{FontLibrary, FontStyle},
        raster::{self as text, Baseline, HAlign, TextStyle},
    },
};

/// Explicit render configuration. The quality tier affects output pixel
/// dimensions only; one layout algorithm serves every tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub quality: QualityTier,
}

/// Immutable composited output buffer (premultiplied RGBA8).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPoster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RenderedPoster {
    pub fn to_png(&self) -> AfficheResult<Vec<u8>> {
        encode::encode_png(self.width, self.height, &self.data)
    }
}

/// Deterministic export file name.
pub const EXPORT_FILE_NAME: &str = "poster.png";

/// A client-side save action: the encoded file plus its download name.
#[derive(Clone, Debug)]
pub struct DownloadAction {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Composite one poster.
///
/// Pure and synchronous: all IO (image decode, logo fetch, font load) is
/// front-loaded by the caller, so identical arguments produce byte-identical
/// output. `image = None` renders the upload placeholder instead of
/// failing, and an empty palette simply draws zero swatches.
pub fn render(
    inputs: &PosterInputs,
    palette: &Palette,
    options: RenderOptions,
    image: Option<&PreparedImage>,
    logos: &LogoSet,
    fonts: &FontLibrary,
) -> AfficheResult<RenderedPoster> {
    inputs.validate()?;

    let canvas = options.quality.canvas();
    let regions = Regions::compute(canvas, &inputs.logos);
    let mut surface = Surface::new(canvas)?;
    let w = canvas.w();
    let h = canvas.h();

    surface.fill(template::BACKGROUND);

    draw_title_rule(&mut surface, fonts, inputs, w, h);
    draw_title(&mut surface, fonts, inputs, &regions);
    draw_image_area(&mut surface, fonts, image, &regions, w, h)?;
    draw_palette_strip(&mut surface, palette, &regions);
    draw_text_block(&mut surface, fonts, inputs, &regions, w, h);
    logos::draw_row(&mut surface, canvas, &inputs.logos, logos, fonts)?;

    Ok(RenderedPoster {
        width: canvas.width,
        height: canvas.height,
        data: surface.into_data(),
    })
}

/// Validate, render at the requested tier, and encode the downloadable
/// file. Export never touches preview state.
pub fn export(
    inputs: &PosterInputs,
    palette: &Palette,
    quality: QualityTier,
    image: Option<&PreparedImage>,
    logos: &LogoSet,
    fonts: &FontLibrary,
) -> AfficheResult<DownloadAction> {
    inputs.validate_for_export(image.is_some())?;
    let rendered = render(inputs, palette, RenderOptions { quality }, image, logos, fonts)?;
    Ok(DownloadAction {
        file_name: EXPORT_FILE_NAME.to_string(),
        png: rendered.to_png()?,
    })
}

fn draw_title_rule(surface: &mut Surface, fonts: &FontLibrary, inputs: &PosterInputs, w: f64, h: f64) {
    let rule_y = template::RULE_Y * h;
    surface.stroke_line(
        Point::new(template::RULE_X0 * w, rule_y),
        Point::new(template::RULE_X1 * w, rule_y),
        template::RULE_THICKNESS * h,
        template::INK,
    );

    text::draw(
        surface,
        fonts,
        &TextStyle::new(FontStyle::Regular, template::YEAR_SIZE * h),
        &inputs.year,
        template::RULE_X1 * w,
        rule_y + template::YEAR_DROP * h,
        HAlign::Right,
        Baseline::Middle,
        template::INK,
    );
}

fn draw_title(surface: &mut Surface, fonts: &FontLibrary, inputs: &PosterInputs, regions: &Regions) {
    text::draw(
        surface,
        fonts,
        &TextStyle::new(FontStyle::Bold, regions.title_text.height()),
        &capitalize_words(&inputs.title),
        regions.title_text.x0,
        regions.title_text.y0,
        HAlign::Left,
        Baseline::Top,
        template::INK,
    );
}

fn draw_image_area(
    surface: &mut Surface,
    fonts: &FontLibrary,
    image: Option<&PreparedImage>,
    regions: &Regions,
    w: f64,
    h: f64,
) -> AfficheResult<()> {
    let area = regions.image_area;

    let Some(image) = image else {
        // Upload placeholder: light border, centered plus glyph, caption.
        let border = Rect::new(
            template::PLACEHOLDER_X * w,
            area.y0,
            (template::PLACEHOLDER_X + template::PLACEHOLDER_W) * w,
            area.y0 + template::PLACEHOLDER_W * w,
        );
        surface.stroke_rect(border, template::RULE_THICKNESS * h, template::PLACEHOLDER_BORDER);

        let cx = 0.5 * w;
        let cy = area.y0 + 0.45 * w;
        let plus = template::PLUS_SIZE * h;
        let stroke = template::PLUS_STROKE * h;
        surface.stroke_line(
            Point::new(cx, cy - plus),
            Point::new(cx, cy + plus),
            stroke,
            template::PLACEHOLDER_GLYPH,
        );
        surface.stroke_line(
            Point::new(cx - plus, cy),
            Point::new(cx + plus, cy),
            stroke,
            template::PLACEHOLDER_GLYPH,
        );

        text::draw(
            surface,
            fonts,
            &TextStyle::new(FontStyle::Regular, template::CAPTION_SIZE * h),
            template::CAPTION_TEXT,
            cx,
            cy + plus + template::CAPTION_DROP * h,
            HAlign::Center,
            Baseline::Top,
            template::PLACEHOLDER_GLYPH,
        );
        return Ok(());
    };

    let crop = fit::cover_crop(
        f64::from(image.width),
        f64::from(image.height),
        area.width(),
        area.height(),
    )?;
    surface.draw_image(image, crop, area)
}

fn draw_palette_strip(surface: &mut Surface, palette: &Palette, regions: &Regions) {
    let strip = regions.palette_strip;
    let n = palette.len();
    if n == 0 {
        return;
    }

    // Equal-width swatches spanning the strip edge to edge, no gaps.
    let swatch_w = strip.width() / n as f64;
    for (i, color) in palette.colors().iter().enumerate() {
        let x0 = strip.x0 + i as f64 * swatch_w;
        surface.fill_rect(Rect::new(x0, strip.y0, x0 + swatch_w, strip.y1), color.opaque());
    }
}

fn draw_text_block(
    surface: &mut Surface,
    fonts: &FontLibrary,
    inputs: &PosterInputs,
    regions: &Regions,
    w: f64,
    h: f64,
) {
    let x = regions.text_block.x0;
    let mut y = regions.text_block.y0;

    // Photographer credit.
    text::draw(
        surface,
        fonts,
        &TextStyle::new(FontStyle::Bold, template::CREDIT_SIZE * h),
        &format!("Shot by {}", capitalize_words(&inputs.photographer_name)),
        x,
        y,
        HAlign::Left,
        Baseline::Top,
        template::CREDIT_INK,
    );
    y += template::CREDIT_GAP * h;

    // Location, optionally followed by a coordinates line.
    let (address, coords) = inputs.location_lines();
    y += template::LOCATION_BACKUP * h;
    text::draw(
        surface,
        fonts,
        &TextStyle::new(FontStyle::Regular, template::LOCATION_SIZE * h),
        &capitalize_words(address),
        x,
        y,
        HAlign::Left,
        Baseline::Top,
        template::LOCATION_INK,
    );
    y += template::COORDS_DROP * h;
    if let Some(coords) = coords {
        text::draw(
            surface,
            fonts,
            &TextStyle::new(FontStyle::Regular, template::COORDS_SIZE * h),
            coords,
            x,
            y,
            HAlign::Left,
            Baseline::Top,
            template::LOCATION_INK,
        );
    }
    y += template::AFTER_LOCATION_GAP * h;

    // Quote, word-wrapped to the block width.
    y += template::QUOTE_BACKUP * h;
    let quote_style = TextStyle::new(FontStyle::Regular, template::QUOTE_SIZE * h);
    let mut measure = |s: &str| text::measure(fonts, &quote_style, s);
    let mut draw = |line: &str, lx: f64, ly: f64| {
        text::draw(
            surface,
            fonts,
            &quote_style,
            line,
            lx,
            ly,
            HAlign::Left,
            Baseline::Top,
            template::CREDIT_INK,
        );
    };
    wrap::wrap_text(
        &inputs.quote_text,
        x,
        y,
        template::QUOTE_MAX_W * w,
        template::QUOTE_LINE_H * h,
        &mut measure,
        &mut draw,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgb8;

    fn inputs() -> PosterInputs {
        PosterInputs {
            title: "Sunset".into(),
            year: "2024".into(),
            photographer_name: "John Doe".into(),
            location_text: "New York, NY".into(),
            quote_text: "Light is the first of painters.".into(),
            logos: vec![],
        }
    }

    #[test]
    fn render_without_image_or_palette_succeeds() {
        let rendered = render(
            &inputs(),
            &Palette::default(),
            RenderOptions { quality: QualityTier::Preview },
            None,
            &LogoSet::empty(),
            &FontLibrary::empty(),
        )
        .unwrap();
        assert_eq!((rendered.width, rendered.height), (800, 1200));
    }

    #[test]
    fn render_rejects_invalid_inputs() {
        let mut bad = inputs();
        bad.title = String::new();
        let err = render(
            &bad,
            &Palette::default(),
            RenderOptions::default(),
            None,
            &LogoSet::empty(),
            &FontLibrary::empty(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn export_is_refused_without_an_image() {
        let err = export(
            &inputs(),
            &Palette(vec![Rgb8::new(1, 2, 3)]),
            QualityTier::Low,
            None,
            &LogoSet::empty(),
            &FontLibrary::empty(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn export_names_the_file_deterministically() {
        let img = crate::assets::decode::PreparedImage {
            width: 8,
            height: 8,
            rgba8_premul: std::sync::Arc::new(vec![255u8; 8 * 8 * 4]),
        };
        let action = export(
            &inputs(),
            &Palette(vec![Rgb8::new(1, 2, 3)]),
            QualityTier::Preview,
            Some(&img),
            &LogoSet::empty(),
            &FontLibrary::empty(),
        )
        .unwrap();
        assert_eq!(action.file_name, "poster.png");
        assert!(!action.png.is_empty());
    }
}
