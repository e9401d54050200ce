use crate::{
    assets::logos::LogoRef,
    foundation::error::{AfficheError, AfficheResult},
};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 16;
/// Maximum quote length in characters.
pub const QUOTE_MAX_CHARS: usize = 385;

/// The render request payload: plain-text fields plus logo references.
/// Values are stored verbatim; display capitalization happens at render
/// time and never mutates the stored strings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PosterInputs {
    pub title: String,
    pub year: String,
    pub photographer_name: String,
    /// Human-readable address, optionally followed by a second coordinates
    /// line separated by a line break.
    pub location_text: String,
    pub quote_text: String,
    #[serde(default)]
    pub logos: Vec<LogoRef>,
}

impl PosterInputs {
    /// Field-shape validation applied to every render request.
    pub fn validate(&self) -> AfficheResult<()> {
        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > TITLE_MAX_CHARS {
            return Err(AfficheError::validation(format!(
                "title must be 1..={TITLE_MAX_CHARS} characters"
            )));
        }
        if self.quote_text.chars().count() > QUOTE_MAX_CHARS {
            return Err(AfficheError::validation(format!(
                "quote must be at most {QUOTE_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// Export refuses to run until every field is filled and an image has
    /// been uploaded; no partial side effects occur on failure.
    pub fn validate_for_export(&self, image_available: bool) -> AfficheResult<()> {
        self.validate()?;
        if !image_available {
            return Err(AfficheError::validation(
                "upload an image before downloading",
            ));
        }
        let required = [
            ("title", &self.title),
            ("year", &self.year),
            ("photographer name", &self.photographer_name),
            ("location", &self.location_text),
            ("quote", &self.quote_text),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AfficheError::validation(format!(
                    "please complete all fields before proceeding ({name} is empty)"
                )));
            }
        }
        Ok(())
    }

    /// Address line and the optional coordinates line below it.
    pub fn location_lines(&self) -> (&str, Option<&str>) {
        match self.location_text.split_once('\n') {
            Some((addr, coords)) => (addr, Some(coords)),
            None => (self.location_text.as_str(), None),
        }
    }
}

/// Uppercase the first letter of every whitespace-separated word, leaving
/// the rest of each word untouched.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_inputs() -> PosterInputs {
        PosterInputs {
            title: "Sunset".into(),
            year: "2024".into(),
            photographer_name: "john doe".into(),
            location_text: "New York, NY\n40.7128 N, 74.0060 W".into(),
            quote_text: "A quote.".into(),
            logos: vec![],
        }
    }

    #[test]
    fn capitalizes_each_word_without_touching_the_rest() {
        assert_eq!(capitalize_words("john doe"), "John Doe");
        assert_eq!(capitalize_words("new york, ny"), "New York, Ny");
        assert_eq!(capitalize_words("McRae"), "McRae");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn title_length_is_bounded() {
        let mut inputs = full_inputs();
        inputs.title = String::new();
        assert!(inputs.validate().is_err());
        inputs.title = "x".repeat(17);
        assert!(inputs.validate().is_err());
        inputs.title = "x".repeat(16);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn quote_length_is_bounded() {
        let mut inputs = full_inputs();
        inputs.quote_text = "q".repeat(QUOTE_MAX_CHARS + 1);
        assert!(inputs.validate().is_err());
        inputs.quote_text = "q".repeat(QUOTE_MAX_CHARS);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn export_requires_every_field_and_an_image() {
        let inputs = full_inputs();
        assert!(inputs.validate_for_export(true).is_ok());
        assert!(inputs.validate_for_export(false).is_err());

        let mut missing = full_inputs();
        missing.photographer_name = "   ".into();
        assert!(missing.validate_for_export(true).is_err());
    }

    #[test]
    fn location_splits_on_embedded_line_break() {
        let inputs = full_inputs();
        let (addr, coords) = inputs.location_lines();
        assert_eq!(addr, "New York, NY");
        assert_eq!(coords, Some("40.7128 N, 74.0060 W"));

        let mut plain = full_inputs();
        plain.location_text = "Berlin".into();
        assert_eq!(plain.location_lines(), ("Berlin", None));
    }

    #[test]
    fn inputs_roundtrip_through_json() {
        let inputs = full_inputs();
        let s = serde_json::to_string(&inputs).unwrap();
        let de: PosterInputs = serde_json::from_str(&s).unwrap();
        assert_eq!(de, inputs);
    }
}
