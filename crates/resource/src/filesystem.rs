//! Filesystem-based resource provider.
//!
//! References are resolved relative to a base directory and must stay inside
//! it: absolute paths and `..` components are rejected.

use async_trait::async_trait;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

const FILE_SCHEME: &str = "file://";

/// Loads image files from below `base_path`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves a reference below the base directory, or `None` if it would escape it.
    fn resolve_path_safe(&self, src: &str) -> Option<PathBuf> {
        let relative = src.strip_prefix(FILE_SCHEME).unwrap_or(src);
        let relative = Path::new(relative);
        if relative.is_absolute() || relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }

        let full_path = self.base_path.join(relative);
        match (full_path.canonicalize(), &self.canonical_base) {
            // Symlinks may still point outside the base.
            (Ok(canonical), Some(base)) => canonical.starts_with(base).then_some(canonical),
            _ => Some(full_path),
        }
    }
}

#[async_trait]
impl ResourceProvider for FilesystemResourceProvider {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve_path_safe(src)
            .ok_or_else(|| ResourceError::InvalidPath(src.to_string()))?;

        log::debug!("Reading '{}' from {}", src, full_path.display());
        tokio::fs::read(&full_path).await.map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(src.to_string())
            } else {
                ResourceError::Io(format!("{}: {}", src, e))
            }
        })
    }

    fn handles(&self, src: &str) -> bool {
        !src.is_empty() && (src.starts_with(FILE_SCHEME) || !src.contains("://"))
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("portrait.jpg"), b"jpeg").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        let data = provider.load("portrait.jpg").await.unwrap();
        assert_eq!(&*data, b"jpeg");
    }

    #[tokio::test]
    async fn strips_file_scheme() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/sig.png"), b"png").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        let data = provider.load("file://img/sig.png").await.unwrap();
        assert_eq!(&*data, b"png");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        let result = provider.load("nonexistent.png").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn blocks_path_traversal() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        for src in ["../../../etc/passwd", "foo/../../bar", "./../secret", "/etc/passwd"] {
            let result = provider.load(src).await;
            assert!(matches!(result, Err(ResourceError::InvalidPath(_))), "{src} was not rejected");
        }
    }

    #[test]
    fn handles_paths_but_not_urls() {
        let provider = FilesystemResourceProvider::new(".");
        assert!(provider.handles("assets/portrait.jpg"));
        assert!(provider.handles("file://assets/portrait.jpg"));
        assert!(!provider.handles("https://example.com/portrait.jpg"));
        assert!(!provider.handles(""));
    }
}
