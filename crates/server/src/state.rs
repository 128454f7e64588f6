use crate::config::ServerConfig;
use dossier::DocumentRenderer;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<DocumentRenderer>,

    /// Caps simultaneous renders so a burst cannot exhaust memory.
    pub render_permits: Arc<Semaphore>,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(renderer: DocumentRenderer, config: ServerConfig) -> Self {
        let render_permits = Arc::new(Semaphore::new(config.max_concurrent_renders.max(1)));
        Self {
            renderer: Arc::new(renderer),
            render_permits,
            config: Arc::new(config),
        }
    }
}
