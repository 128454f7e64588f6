//! Turns a composed layout tree into PDF bytes.
//!
//! Images are the only I/O: every distinct source is fetched concurrently
//! and any that cannot be loaded or decoded is dropped from the document
//! with a warning. Fonts come from the process-wide registration.

use crate::compose::{compose_cover_letter, compose_cv, CvOptions, LetterOptions};
use crate::config::EngineConfig;
use crate::error::{Error, RenderError};
use crate::fonts::ensure_fonts_registered_with;
use crate::model::{CoverLetterRequest, CvRequest};
use crate::theme::{cv_theme, letter_theme};
use base64::Engine as _;
use dossier_idf::IRNode;
use dossier_layout::{FontLibrary, LayoutConfig, LayoutEngine};
use dossier_render_lopdf::{DecodedImage, DocumentInfo, ImageSet, PdfWriter};
use dossier_resource::CompositeResourceProvider;
use dossier_style::PageLayout;
use dossier_traits::ResourceProvider;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// An image that was left out of the document. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Image '{source_ref}' omitted: {reason}")]
pub struct AssetFetchWarning {
    pub source_ref: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    resources: Arc<dyn ResourceProvider>,
    fonts: Arc<FontLibrary>,
    font_family: String,
}

impl DocumentRenderer {
    pub fn new(resources: Arc<dyn ResourceProvider>, fonts: Arc<FontLibrary>, font_family: impl Into<String>) -> Self {
        Self {
            resources,
            fonts,
            font_family: font_family.into(),
        }
    }

    /// Registers the configured font (once per process) and wires up the
    /// standard http/file/data image providers.
    pub fn from_config(config: &EngineConfig) -> Result<Self, Error> {
        let fonts = ensure_fonts_registered_with(config)?;
        let resources = CompositeResourceProvider::standard(&config.asset_root, config.http_timeout())?;
        Ok(Self::new(Arc::new(resources), Arc::clone(fonts), config.font_family.clone()))
    }

    pub async fn render(&self, tree: &IRNode, page: PageLayout, info: DocumentInfo) -> Result<Vec<u8>, RenderError> {
        let (images, warnings) = self.load_images(tree).await;
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        let engine = LayoutEngine::new(
            Arc::clone(&self.fonts),
            LayoutConfig {
                page,
                default_font_family: self.font_family.clone(),
                ..LayoutConfig::default()
            },
        );
        let pages = engine.paginate(tree, &images.metrics())?;
        log::debug!("Laid out '{}' on {} page(s)", info.title, pages.len());

        Ok(PdfWriter::write(&pages, &self.fonts, &images, &info)?)
    }

    /// [`render`](Self::render), encoded as standard padded base64.
    pub async fn render_base64(&self, tree: &IRNode, page: PageLayout, info: DocumentInfo) -> Result<String, RenderError> {
        Ok(to_base64(&self.render(tree, page, info).await?))
    }

    pub async fn render_cv(&self, request: &CvRequest) -> Result<Vec<u8>, Error> {
        let options = CvOptions {
            portrait_url: request.portrait_url.clone(),
            creation_date: request.creation_date.clone(),
        };
        let tree = compose_cv(&request.data, &options)?;
        let info = DocumentInfo {
            title: format!("CV {}", request.data.full_name.trim()),
            creation_date: pdf_creation_date(request.creation_date.as_deref()),
            ..DocumentInfo::default()
        };
        Ok(self.render(&tree, cv_theme().page_layout, info).await?)
    }

    pub async fn render_cover_letter(&self, request: &CoverLetterRequest) -> Result<Vec<u8>, Error> {
        let options = LetterOptions {
            signature_url: request.signature_url.clone(),
        };
        let tree = compose_cover_letter(&request.data, &options)?;
        let info = DocumentInfo {
            title: format!("Cover letter {}", request.data.applicant.full_name.trim()),
            creation_date: pdf_creation_date(None),
            ..DocumentInfo::default()
        };
        Ok(self.render(&tree, letter_theme().page_layout, info).await?)
    }

    async fn load_images(&self, tree: &IRNode) -> (ImageSet, Vec<AssetFetchWarning>) {
        let sources: BTreeSet<&str> = tree.image_sources().into_iter().filter(|s| !s.trim().is_empty()).collect();
        let fetches = sources.into_iter().map(|src| async move {
            let bytes = self.resources.load(src).await.map_err(|e| AssetFetchWarning {
                source_ref: src.to_string(),
                reason: e.to_string(),
            })?;
            DecodedImage::decode(src, &bytes)
                .map(|image| (src.to_string(), image))
                .map_err(|e| AssetFetchWarning {
                    source_ref: src.to_string(),
                    reason: e.to_string(),
                })
        });

        let mut images = ImageSet::new();
        let mut warnings = Vec::new();
        for result in join_all(fetches).await {
            match result {
                Ok((src, image)) => images.insert(src, image),
                Err(warning) => warnings.push(warning),
            }
        }
        (images, warnings)
    }
}

/// PDF `CreationDate` value. An override is used when it parses as a date;
/// otherwise the document carries the current local time.
pub fn pdf_creation_date(creation_date: Option<&str>) -> Option<String> {
    match creation_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => ["%Y-%m-%d", "%d %B %Y", "%d.%m.%Y"]
            .iter()
            .find_map(|format| chrono::NaiveDate::parse_from_str(raw, format).ok())
            .map(|date| date.format("D:%Y%m%d000000Z").to_string()),
        None => Some(chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    }
}

pub fn to_base64(pdf: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(pdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_traits::InMemoryResourceProvider;

    #[test]
    fn creation_date_overrides_are_parsed() {
        assert_eq!(pdf_creation_date(Some("2026-01-05")).as_deref(), Some("D:20260105000000Z"));
        assert_eq!(pdf_creation_date(Some("5 January 2026")).as_deref(), Some("D:20260105000000Z"));
        assert_eq!(pdf_creation_date(Some("05.01.2026")).as_deref(), Some("D:20260105000000Z"));
        assert_eq!(pdf_creation_date(Some("sometime")), None);
        assert!(pdf_creation_date(None).is_some_and(|d| d.starts_with("D:") && d.len() == 16));
    }

    #[test]
    fn base64_round_trips_the_header() {
        assert_eq!(to_base64(b"%PDF-"), "JVBERi0=");
    }

    #[tokio::test]
    async fn unreadable_images_become_warnings() {
        let provider = InMemoryResourceProvider::new().with("broken.png", b"not an image".to_vec());
        let renderer = DocumentRenderer::new(Arc::new(provider), Arc::new(FontLibrary::new()), "Inter");
        let tree = IRNode::Root(vec![
            IRNode::Image { meta: Default::default(), src: "broken.png".into() },
            IRNode::Image { meta: Default::default(), src: "missing.png".into() },
            IRNode::Image { meta: Default::default(), src: "missing.png".into() },
        ]);

        let (images, warnings) = renderer.load_images(&tree).await;
        assert!(images.is_empty());
        let mut sources: Vec<&str> = warnings.iter().map(|w| w.source_ref.as_str()).collect();
        sources.sort();
        assert_eq!(sources, vec!["broken.png", "missing.png"]);
    }
}
