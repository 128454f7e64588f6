use crate::compose::ComposeError;
use crate::fonts::FontLoadError;
use crate::model::InvalidPayloadError;
use dossier_layout::LayoutError;
use dossier_traits::ResourceError;
use thiserror::Error;

/// Failure while turning a laid-out tree into PDF bytes.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] dossier_render_lopdf::RenderError),
}

/// A comprehensive error type for the entire document generation pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Font(#[from] FontLoadError),

    #[error(transparent)]
    InvalidPayload(#[from] InvalidPayloadError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Resource setup failed: {0}")]
    Resource(#[from] ResourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Error::Render(RenderError::Layout(err))
    }
}

impl From<dossier_render_lopdf::RenderError> for Error {
    fn from(err: dossier_render_lopdf::RenderError) -> Self {
        Error::Render(RenderError::Pdf(err))
    }
}

impl From<ComposeError> for Error {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::InvalidPayload(e) => Error::InvalidPayload(e),
        }
    }
}

impl Error {
    /// Whether the caller sent something unusable, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidPayload(_))
    }
}
