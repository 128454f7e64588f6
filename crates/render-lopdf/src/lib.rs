//! PDF serializer for laid-out pages, built on lopdf.
//!
//! Fonts are embedded as subset Type0 fonts, images as XObjects and links as
//! URI annotations. Output depends only on the input pages and metadata.

mod annotations;
mod error;
mod fonts;
mod images;
mod painter;
mod path;
mod subset;
mod writer;

pub use annotations::{create_link_annotations, info_dictionary};
pub use error::RenderError;
pub use fonts::{collect_glyph_usage, embed_fonts, to_unicode_cmap, GlyphUsage};
pub use images::{embed_images, DecodedImage, ImageData, ImageSet};
pub use painter::LinkArea;
pub use path::{parse_path, PathSegment, ViewBox};
pub use writer::{text_string, PdfObjectWriter};

use dossier_layout::{FontLibrary, LayoutElement, LayoutPage};
use lopdf::{dictionary, Object};
use painter::PageContext;

pub const PDF_VERSION: &str = "1.7";

/// Document-level metadata written to the Info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// Preformatted PDF date (`D:YYYYMMDDHHmmSS...`).
    pub creation_date: Option<String>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            producer: format!("dossier {}", env!("CARGO_PKG_VERSION")),
            creation_date: None,
        }
    }
}

/// Serializes laid-out pages into a complete PDF file.
pub struct PdfWriter;

impl PdfWriter {
    pub fn write(
        pages: &[LayoutPage],
        fonts: &FontLibrary,
        images: &ImageSet,
        info: &DocumentInfo,
    ) -> Result<Vec<u8>, RenderError> {
        if pages.is_empty() {
            return Err(RenderError::Pdf("document has no pages".to_string()));
        }
        let mut writer = PdfObjectWriter::new(PDF_VERSION);

        let usage = collect_glyph_usage(pages);
        let (font_dict, embedded_fonts) = embed_fonts(&mut writer, fonts, &usage)?;

        let used_images = pages.iter().flat_map(|page| {
            page.elements.iter().filter_map(|el| match &el.element {
                LayoutElement::Image(image) => Some(image.src.as_str()),
                _ => None,
            })
        });
        let (xobject_dict, image_names) = embed_images(&mut writer, images, used_images)?;

        writer.set_resources(dictionary! {
            "Font" => font_dict,
            "XObject" => xobject_dict,
        });

        for (index, page) in pages.iter().enumerate() {
            let mut ctx = PageContext::new(page.height, &embedded_fonts, &image_names);
            for el in &page.elements {
                ctx.draw_element(el)?;
            }
            let (content, links) = ctx.finish();
            let content_id = writer.buffer_content_stream(content)?;

            let page_id = writer.new_object_id();
            let annots = create_link_annotations(&mut writer, &links);
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
                "Resources" => writer.resources_id,
                "Contents" => content_id,
            };
            if !annots.is_empty() {
                page_dict.set(
                    "Annots",
                    annots.into_iter().map(Object::Reference).collect::<Vec<_>>(),
                );
            }
            writer.buffer_object_at_id(page_id, page_dict);
            writer.add_page(page_id);
            log::debug!("Wrote page {} with {} link(s)", index + 1, links.len());
        }

        writer.set_info(info_dictionary(&info.title, &info.producer, info.creation_date.as_deref()));
        writer.finish()
    }
}
