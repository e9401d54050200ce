use std::path::Path;

use ab_glyph::FontArc;

/// The four face slots the poster template uses. Weights beyond these map
/// onto the nearest loaded face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

const FACE_STEMS: [(FontStyle, &str); 4] = [
    (FontStyle::Regular, "Inter-Regular"),
    (FontStyle::Bold, "Inter-Bold"),
    (FontStyle::Italic, "Inter-Italic"),
    (FontStyle::BoldItalic, "Inter-BoldItalic"),
];

/// Process-wide font set, loaded once at startup from a fonts directory.
///
/// A face that fails to load is logged and resolves to the nearest loaded
/// face instead; rendering proceeds with whatever is available rather than
/// failing. An entirely empty library still renders (text is skipped).
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    regular: Option<FontArc>,
    bold: Option<FontArc>,
    italic: Option<FontArc>,
    bold_italic: Option<FontArc>,
}

impl FontLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the fixed face set from `dir`, probing `.ttf` then `.otf` per
    /// stem. Missing or unparsable faces are warnings, never errors.
    pub fn load_dir(dir: &Path) -> Self {
        let mut lib = Self::empty();
        for (style, stem) in FACE_STEMS {
            match load_face(dir, stem) {
                Some(font) => *lib.slot_mut(style) = Some(font),
                None => {
                    tracing::warn!(stem, dir = %dir.display(), "font face unavailable, using fallback")
                }
            }
        }
        lib
    }

    pub fn loaded_count(&self) -> usize {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded_count() == 0
    }

    /// Resolve a style to a usable face: the requested one, then regular,
    /// then any loaded face.
    pub fn resolve(&self, style: FontStyle) -> Option<&FontArc> {
        self.slot(style)
            .or(self.regular.as_ref())
            .or(self.bold.as_ref())
            .or(self.italic.as_ref())
            .or(self.bold_italic.as_ref())
    }

    fn slot(&self, style: FontStyle) -> Option<&FontArc> {
        match style {
            FontStyle::Regular => self.regular.as_ref(),
            FontStyle::Bold => self.bold.as_ref(),
            FontStyle::Italic => self.italic.as_ref(),
            FontStyle::BoldItalic => self.bold_italic.as_ref(),
        }
    }

    fn slot_mut(&mut self, style: FontStyle) -> &mut Option<FontArc> {
        match style {
            FontStyle::Regular => &mut self.regular,
            FontStyle::Bold => &mut self.bold,
            FontStyle::Italic => &mut self.italic,
            FontStyle::BoldItalic => &mut self.bold_italic,
        }
    }
}

fn load_face(dir: &Path, stem: &str) -> Option<FontArc> {
    for ext in ["ttf", "otf"] {
        let path = dir.join(format!("{stem}.{ext}"));
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match FontArc::try_from_vec(bytes) {
            Ok(font) => return Some(font),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to parse font face");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_library_resolves_nothing() {
        let lib = FontLibrary::empty();
        assert!(lib.is_empty());
        assert!(lib.resolve(FontStyle::Bold).is_none());
    }

    #[test]
    fn missing_directory_yields_empty_library() {
        let lib = FontLibrary::load_dir(Path::new("/definitely/not/a/fonts/dir"));
        assert_eq!(lib.loaded_count(), 0);
    }
}
