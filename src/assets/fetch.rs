use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{AfficheError, AfficheResult};

/// Resolves image-source identifiers to raw bytes. HTTP(S) identifiers are
/// fetched over the network; everything else is read from the asset root.
#[derive(Clone, Debug)]
pub struct AssetFetcher {
    root: PathBuf,
    http: reqwest::Client,
}

impl AssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn fetch(&self, source: &str) -> AfficheResult<Vec<u8>> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let resp = self
                .http
                .get(source)
                .send()
                .await
                .with_context(|| format!("fetch '{source}'"))?;
            let resp = resp
                .error_for_status()
                .with_context(|| format!("fetch '{source}'"))?;
            let bytes = resp
                .bytes()
                .await
                .with_context(|| format!("read body of '{source}'"))?;
            return Ok(bytes.to_vec());
        }

        let norm = normalize_rel_path(source)?;
        let path = self.root.join(Path::new(&norm));
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(AfficheError::from)
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> AfficheResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(AfficheError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(AfficheError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AfficheError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AfficheError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize_rel_path("./logos//a.png").unwrap(), "logos/a.png");
        assert_eq!(normalize_rel_path("logos\\a.png").unwrap(), "logos/a.png");
    }

    #[test]
    fn normalize_rejects_escapes() {
        assert!(normalize_rel_path("/etc/passwd").is_err());
        assert!(normalize_rel_path("../x.png").is_err());
        assert!(normalize_rel_path("a/../x.png").is_err());
        assert!(normalize_rel_path("").is_err());
        assert!(normalize_rel_path("./.").is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let fetcher = AssetFetcher::new(std::env::temp_dir());
        assert!(fetcher.fetch("no/such/asset.png").await.is_err());
    }
}
