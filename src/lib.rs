//! CV and cover-letter PDF generation.
//!
//! A request is parsed into the typed [`model`], composed into a layout tree
//! by [`compose`], and laid out and serialized by [`render::DocumentRenderer`].
//!
//! ```no_run
//! # async fn run() -> Result<(), dossier::Error> {
//! let renderer = dossier::DocumentRenderer::from_config(&dossier::EngineConfig::from_env())?;
//! let pdf = renderer.render_cv(&dossier::CvRequest::sample()).await?;
//! assert!(pdf.starts_with(b"%PDF-"));
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod fonts;
pub mod icons;
pub mod model;
pub mod render;
pub mod theme;

pub use compose::{compose_cover_letter, compose_cv, ComposeError, CvOptions, LetterOptions};
pub use self::config::EngineConfig;
pub use error::{Error, RenderError};
pub use fonts::{ensure_fonts_registered, ensure_fonts_registered_with, FontLoadError};
pub use model::{CVData, CoverLetterData, CoverLetterRequest, CvRequest, InvalidPayloadError};
pub use render::{to_base64, AssetFetchWarning, DocumentRenderer};

pub use dossier_idf::IRNode;
pub use dossier_render_lopdf::DocumentInfo;
