use async_trait::async_trait;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;
use std::time::Duration;

use crate::{DataUriProvider, FilesystemResourceProvider, HttpResourceProvider};

/// Routes each reference to the first delegate that handles it.
#[derive(Debug, Default, Clone)]
pub struct CompositeResourceProvider {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl CompositeResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard stack: data URIs, HTTP(S), then files below `asset_root`.
    pub fn standard(asset_root: impl AsRef<std::path::Path>, http_timeout: Duration) -> Result<Self, ResourceError> {
        Ok(Self::new()
            .with_provider(Arc::new(DataUriProvider::new()))
            .with_provider(Arc::new(HttpResourceProvider::new(http_timeout)?))
            .with_provider(Arc::new(FilesystemResourceProvider::new(asset_root))))
    }

    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl ResourceProvider for CompositeResourceProvider {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.handles(src))
            .ok_or_else(|| ResourceError::InvalidPath(src.to_string()))?;
        log::trace!("Loading '{}' through {}", src, provider.name());
        provider.load(src).await
    }

    fn handles(&self, src: &str) -> bool {
        self.providers.iter().any(|p| p.handles(src))
    }

    fn name(&self) -> &'static str {
        "CompositeResourceProvider"
    }
}
