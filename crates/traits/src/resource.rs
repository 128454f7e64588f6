//! ResourceProvider trait for abstracting asset loading.
//!
//! Documents reference images by URL, filesystem path or `data:` URI. The
//! renderer resolves those references through this trait so that it never
//! needs to know where the bytes actually live.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request for '{src}' failed with HTTP status {status}")]
    Http { src: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid resource path '{0}'")]
    InvalidPath(String),

    #[error("Could not decode resource '{src}': {message}")]
    Decode { src: String, message: String },
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads the raw bytes behind a resource reference.
///
/// Implementations must be cheap to share between concurrent renders; the
/// renderer calls `load` for every image of a document at once.
#[async_trait]
pub trait ResourceProvider: Send + Sync + Debug {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError>;

    /// Whether this provider understands the reference at all. Composite
    /// providers use this to pick a delegate.
    fn handles(&self, src: &str) -> bool {
        !src.is_empty()
    }

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A resource provider backed by a map, pre-populated before use.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for test fixtures.
    pub fn with(self, src: impl Into<String>, data: Vec<u8>) -> Self {
        self.add(src, data);
        self
    }

    /// Stores `data` under `src`, replacing any earlier entry.
    pub fn add(&self, src: impl Into<String>, data: Vec<u8>) {
        self.add_shared(src, Arc::new(data));
    }

    pub fn add_shared(&self, src: impl Into<String>, data: SharedResourceData) {
        if let Ok(mut resources) = self.resources.write() {
            resources.insert(src.into(), data);
        }
    }

    /// Returns `None` if the resource doesn't exist.
    pub fn remove(&self, src: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(src)
    }

    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResourceProvider for InMemoryResourceProvider {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::Io("resource store lock poisoned".to_string()))?;
        resources
            .get(src)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(src.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_and_load() {
        let provider = InMemoryResourceProvider::new();
        provider.add("portrait.jpg", b"jpeg bytes".to_vec());

        let data = provider.load("portrait.jpg").await.unwrap();
        assert_eq!(&*data, b"jpeg bytes");
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let provider = InMemoryResourceProvider::new();
        let result = provider.load("nonexistent.png").await;
        assert_eq!(result, Err(ResourceError::NotFound("nonexistent.png".to_string())));
    }

    #[tokio::test]
    async fn overwrite_replaces_data() {
        let provider = InMemoryResourceProvider::new()
            .with("logo.png", b"original".to_vec())
            .with("logo.png", b"updated".to_vec());

        assert_eq!(&*provider.load("logo.png").await.unwrap(), b"updated");
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn add_shared_keeps_the_same_allocation() {
        let provider = InMemoryResourceProvider::new();
        let shared = Arc::new(vec![1, 2, 3]);
        provider.add_shared("shared.bin", Arc::clone(&shared));

        let loaded = provider.load("shared.bin").await.unwrap();
        assert!(Arc::ptr_eq(&loaded, &shared));
    }

    #[test]
    fn remove_returns_data() {
        let provider = InMemoryResourceProvider::new();
        provider.add("a.png", b"data".to_vec());

        assert_eq!(provider.remove("a.png").as_deref().map(Vec::as_slice), Some(&b"data"[..]));
        assert!(provider.remove("a.png").is_none());
        assert!(provider.is_empty());
    }

    #[test]
    fn error_messages_name_the_source() {
        let err = ResourceError::Http {
            src: "https://example.com/a.png".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("https://example.com/a.png"));
        assert!(err.to_string().contains("404"));

        let err = ResourceError::Decode {
            src: "data:image/png;base64,@@".to_string(),
            message: "invalid byte".to_string(),
        };
        assert!(err.to_string().contains("invalid byte"));
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ResourceError = io_err.into();
        assert!(matches!(err, ResourceError::Io(ref msg) if msg.contains("denied")));
    }
}
