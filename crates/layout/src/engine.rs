use crate::config::LayoutConfig;
use crate::fonts::FontLibrary;
use crate::images::ImageMetrics;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState, PageBuffer};
use crate::nodes::{BlockNode, RenderNode};
use crate::style::ComputedStyle;
use crate::{LayoutError, LayoutPage};
use dossier_idf::{IRNode, NodeMetadata};
use dossier_types::geometry::BoxConstraints;
use std::sync::Arc;
use std::time::Instant;

/// Turns IDF trees into positioned pages.
///
/// The engine is immutable once built and may be shared between threads;
/// every call to [`LayoutEngine::paginate`] works on its own render tree.
pub struct LayoutEngine {
    fonts: Arc<FontLibrary>,
    config: LayoutConfig,
    default_style: Arc<ComputedStyle>,
}

impl LayoutEngine {
    pub fn new(fonts: Arc<FontLibrary>, config: LayoutConfig) -> Self {
        let mut default_style = ComputedStyle::default();
        default_style.text.font_family = Arc::new(config.default_font_family.clone());
        Self {
            fonts,
            config,
            default_style: Arc::new(default_style),
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn get_default_style(&self) -> Arc<ComputedStyle> {
        Arc::clone(&self.default_style)
    }

    pub fn compute_style(&self, meta: &NodeMetadata, parent_style: &Arc<ComputedStyle>) -> Arc<ComputedStyle> {
        if meta.style_sets.is_empty() && meta.style_override.is_none() {
            return Arc::new(parent_style.inherited());
        }
        Arc::new(ComputedStyle::compute(
            parent_style,
            &meta.style_sets,
            meta.style_override.as_ref(),
        ))
    }

    /// Resolves styles, shapes text and drops unavailable images.
    pub fn build_render_tree(&self, ir_root: &IRNode, images: &ImageMetrics) -> Result<RenderNode, LayoutError> {
        let start = Instant::now();
        let default_style = self.get_default_style();
        let root = match ir_root {
            IRNode::Root(_) => RenderNode::build(ir_root, self, &default_style, images)?,
            other => {
                let children = RenderNode::build(other, self, &default_style, images)?
                    .into_iter()
                    .collect();
                Some(RenderNode::Block(BlockNode::new_from_children(children, default_style)))
            }
        };
        log::trace!("Built render tree in {:?}", start.elapsed());
        root.ok_or_else(|| LayoutError::Generic("document root produced no render node".to_string()))
    }

    /// Lays the document out page by page.
    pub fn paginate(&self, ir_root: &IRNode, images: &ImageMetrics) -> Result<Vec<LayoutPage>, LayoutError> {
        let root_node = self.build_render_tree(ir_root, images)?;
        let pages = PaginationIterator {
            engine: self,
            root_node: &root_node,
            current_state: None,
            page_count: 0,
            finished: false,
        }
        .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Paginated document into {} page(s)", pages.len());
        Ok(pages)
    }
}

struct PaginationIterator<'a> {
    engine: &'a LayoutEngine,
    root_node: &'a RenderNode,
    current_state: Option<NodeState>,
    page_count: usize,
    finished: bool,
}

impl Iterator for PaginationIterator<'_> {
    type Item = Result<LayoutPage, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let max_pages = self.engine.config.max_pages;
        self.page_count += 1;
        if self.page_count > max_pages {
            self.finished = true;
            return Some(Err(LayoutError::RunawayPagination(max_pages)));
        }

        let start = Instant::now();
        let (page_width, page_height) = self.engine.config.page_size();
        let bounds = self.engine.config.content_rect();

        let mut page = PageBuffer::new();
        let layout_res = {
            let mut ctx = LayoutContext::new(bounds, &mut page);
            let constraints = BoxConstraints::tight_width(bounds.width);
            self.root_node.layout(&mut ctx, constraints, self.current_state.take())
        };

        let result = match layout_res {
            Ok(LayoutResult::Finished) => {
                self.finished = true;
                Ok(())
            }
            Ok(LayoutResult::Break(next)) => {
                self.current_state = match next {
                    NodeState::Atomic => None,
                    state => Some(state),
                };
                Ok(())
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        };
        log::trace!("Laid out page {} in {:?}", self.page_count, start.elapsed());

        Some(result.map(|()| LayoutPage {
            width: page_width,
            height: page_height,
            elements: page.elements,
        }))
    }
}
