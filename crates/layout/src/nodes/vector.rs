use super::RenderNode;
use crate::engine::LayoutEngine;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::style::ComputedStyle;
use crate::{LayoutElement, LayoutError, VectorElement};
use dossier_idf::IRNode;
use dossier_types::geometry::{BoxConstraints, Rect, Size};
use std::sync::Arc;

/// Icons without an explicit size are drawn at this edge length.
const DEFAULT_SIZE: f32 = 12.0;

/// A filled vector glyph, tinted with the node's text color.
#[derive(Debug, Clone)]
pub struct VectorNode {
    style: Arc<ComputedStyle>,
    view_box: String,
    paths: Arc<Vec<String>>,
}

impl VectorNode {
    pub fn new(style: Arc<ComputedStyle>, view_box: String, paths: Vec<String>) -> Self {
        Self {
            style,
            view_box,
            paths: Arc::new(paths),
        }
    }

    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        parent_style: &Arc<ComputedStyle>,
    ) -> Result<RenderNode, LayoutError> {
        match node {
            IRNode::Vector { meta, glyph } => Ok(RenderNode::Vector(Self::new(
                engine.compute_style(meta, parent_style),
                glyph.view_box.clone(),
                glyph.paths.clone(),
            ))),
            _ => Err(LayoutError::Generic(format!("'{}' is not a vector", node.kind()))),
        }
    }

    fn size(&self) -> Size {
        Size::new(
            self.style.definite_width(f32::INFINITY).unwrap_or(DEFAULT_SIZE),
            self.style.definite_height().unwrap_or(DEFAULT_SIZE),
        )
    }
}

impl LayoutNode for VectorNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        Size::new(constraints.max_width, self.size().height)
    }

    fn max_content_width(&self) -> f32 {
        self.size().width
    }

    fn min_content_width(&self) -> f32 {
        self.size().width
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        _constraints: BoxConstraints,
        _break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let size = self.size();
        if !ctx.fits(size.height) && ctx.page_has_content() {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }
        ctx.push_element(
            Rect::new(ctx.x(), ctx.cursor_y(), size.width, size.height),
            LayoutElement::Vector(VectorElement {
                view_box: self.view_box.clone(),
                paths: Arc::clone(&self.paths),
                color: self.style.text.color,
            }),
        );
        ctx.advance_cursor(size.height);
        Ok(LayoutResult::Finished)
    }

    fn stretches(&self) -> bool {
        false
    }
}
