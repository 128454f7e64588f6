use dossier_style::dimension::{Margins, PageSize};
use dossier_style::stylesheet::PageLayout;
use dossier_types::geometry::Rect;

/// Page geometry and the family used when a node names none.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page: PageLayout,
    pub default_font_family: String,
    /// Hard stop for documents that never finish paginating.
    pub max_pages: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: PageLayout {
                size: PageSize::A4,
                margins: Margins::all(40.0),
            },
            default_font_family: "sans-serif".to_string(),
            max_pages: 500,
        }
    }
}

impl LayoutConfig {
    pub fn page_size(&self) -> (f32, f32) {
        self.page.size.dimensions_pt()
    }

    /// The printable area inside the page margins.
    pub fn content_rect(&self) -> Rect {
        let (width, height) = self.page_size();
        let m = &self.page.margins;
        Rect::new(
            m.left,
            m.top,
            (width - m.horizontal()).max(1.0),
            (height - m.vertical()).max(1.0),
        )
    }
}
