use std::path::PathBuf;

/// Process-wide environment configuration for the companion API.
///
/// Every credential is optional at startup; an endpoint whose provider key
/// is absent answers with a structured error instead of crashing the
/// process.
#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    pub mailchimp_api_key: Option<String>,
    pub mailchimp_server_prefix: Option<String>,
    pub mailchimp_audience_id: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub api_ninjas_key: Option<String>,
    /// Root directory for relative image/logo sources.
    pub assets_root: PathBuf,
    /// Directory holding the fixed font face files.
    pub fonts_dir: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            mailchimp_api_key: env_nonempty("MAILCHIMP_API_KEY"),
            mailchimp_server_prefix: env_nonempty("MAILCHIMP_SERVER_PREFIX"),
            mailchimp_audience_id: env_nonempty("MAILCHIMP_AUDIENCE_ID"),
            google_maps_api_key: env_nonempty("GOOGLE_MAPS_API_KEY"),
            api_ninjas_key: env_nonempty("API_NINJAS_KEY"),
            assets_root: PathBuf::from("."),
            fonts_dir: PathBuf::from("fonts"),
        }
    }

    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }

    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// All three mailing-list settings, or None if any is missing.
    pub fn mailchimp(&self) -> Option<(&str, &str, &str)> {
        match (
            self.mailchimp_api_key.as_deref(),
            self.mailchimp_server_prefix.as_deref(),
            self.mailchimp_audience_id.as_deref(),
        ) {
            (Some(key), Some(prefix), Some(audience)) => Some((key, prefix, audience)),
            _ => None,
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailchimp_requires_all_three_settings() {
        let mut config = ServiceConfig::default();
        assert!(config.mailchimp().is_none());

        config.mailchimp_api_key = Some("key".into());
        config.mailchimp_server_prefix = Some("us1".into());
        assert!(config.mailchimp().is_none());

        config.mailchimp_audience_id = Some("list".into());
        assert_eq!(config.mailchimp(), Some(("key", "us1", "list")));
    }
}
