//! The render tree: IDF nodes resolved into styled, pre-shaped layout nodes.

pub mod block;
pub mod flex;
pub mod image;
pub mod page_break;
pub mod paragraph;
pub mod vector;

use crate::engine::LayoutEngine;
use crate::images::ImageMetrics;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::painting::box_painter::create_background_and_borders;
use crate::style::ComputedStyle;
use crate::{LayoutElement, LayoutError, LinkElement};
use dossier_idf::IRNode;
use dossier_style::flex::{AlignItems, FlexDirection};
use dossier_types::geometry::{BoxConstraints, Rect, Size};
use std::sync::Arc;

pub use block::BlockNode;
pub use flex::FlexNode;
pub use image::ImageNode;
pub use page_break::PageBreakNode;
pub use paragraph::ParagraphNode;
pub use vector::VectorNode;

#[derive(Debug)]
pub enum RenderNode {
    Block(BlockNode),
    Flex(FlexNode),
    Paragraph(ParagraphNode),
    Image(ImageNode),
    Vector(VectorNode),
    PageBreak(PageBreakNode),
}

impl RenderNode {
    /// Builds the render node for `node`. Images whose source could not be
    /// loaded produce `None` and are left out of the document.
    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        parent_style: &Arc<ComputedStyle>,
        images: &ImageMetrics,
    ) -> Result<Option<RenderNode>, LayoutError> {
        let node = match node {
            IRNode::Root(_) | IRNode::Block { .. } | IRNode::Link { .. } => {
                BlockNode::build(node, engine, parent_style, images)?
            }
            IRNode::FlexContainer { meta, .. } => {
                let style = engine.compute_style(meta, parent_style);
                match style.flex.direction {
                    FlexDirection::Column => BlockNode::build(node, engine, parent_style, images)?,
                    FlexDirection::Row => FlexNode::build(node, engine, style, images)?,
                }
            }
            IRNode::Paragraph { .. } | IRNode::Heading { .. } => {
                ParagraphNode::build(node, engine, parent_style)?
            }
            IRNode::Image { .. } => match ImageNode::build(node, engine, parent_style, images)? {
                Some(image) => image,
                None => return Ok(None),
            },
            IRNode::Vector { .. } => VectorNode::build(node, engine, parent_style)?,
            IRNode::PageBreak => PageBreakNode::build(),
        };
        Ok(Some(node))
    }

    fn as_node(&self) -> &dyn LayoutNode {
        match self {
            RenderNode::Block(node) => node,
            RenderNode::Flex(node) => node,
            RenderNode::Paragraph(node) => node,
            RenderNode::Image(node) => node,
            RenderNode::Vector(node) => node,
            RenderNode::PageBreak(node) => node,
        }
    }
}

impl LayoutNode for RenderNode {
    fn style(&self) -> &ComputedStyle {
        self.as_node().style()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        self.as_node().measure(constraints)
    }

    fn max_content_width(&self) -> f32 {
        self.as_node().max_content_width()
    }

    fn min_content_width(&self) -> f32 {
        self.as_node().min_content_width()
    }

    fn leading_height(&self, constraints: BoxConstraints) -> f32 {
        self.as_node().leading_height(constraints)
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        self.as_node().layout(ctx, constraints, break_state)
    }

    fn is_page_break(&self) -> bool {
        self.as_node().is_page_break()
    }

    fn keeps_with_next(&self) -> bool {
        self.as_node().keeps_with_next()
    }

    fn stretches(&self) -> bool {
        self.as_node().stretches()
    }
}

pub(crate) fn build_children(
    children: &[IRNode],
    engine: &LayoutEngine,
    style: &Arc<ComputedStyle>,
    images: &ImageMetrics,
) -> Result<Vec<RenderNode>, LayoutError> {
    let mut built = Vec::with_capacity(children.len());
    for child in children {
        if let Some(node) = RenderNode::build(child, engine, style, images)? {
            built.push(node);
        }
    }
    Ok(built)
}

/// Left offset (margin included) and border-box width of a block-level
/// child inside a content box of `content_width`.
pub(crate) fn resolve_child_width(child: &dyn LayoutNode, content_width: f32, align: AlignItems) -> (f32, f32) {
    let style = child.style();
    let margin = style.box_model.margin;
    let available = (content_width - margin.horizontal()).max(0.0);
    let width = match style.definite_width(content_width) {
        Some(width) => width,
        None if align == AlignItems::Stretch && child.stretches() => available,
        None => child.max_content_width().min(available),
    };
    (margin.left + align.offset(available - width), width)
}

/// Final border-box height given the natural height of the content.
pub(crate) fn resolve_height(style: &ComputedStyle, constraints: BoxConstraints, natural: f32) -> f32 {
    let height = style
        .definite_height()
        .unwrap_or(natural)
        .max(style.box_model.min_height);
    constraints.constrain_height(height)
}

/// Border-box width of a container: its definite width, or the sum of its
/// insets and the content width reported by `content`.
pub(crate) fn intrinsic_width(style: &ComputedStyle, content: impl FnOnce() -> f32) -> f32 {
    match style.definite_width(f32::INFINITY) {
        Some(width) => width,
        None => content() + style.horizontal_insets(),
    }
}

/// Bookkeeping for one box on one page: where it started and which page
/// elements belong to it.
pub(crate) struct BoxFrame {
    start_elements: usize,
    start_y: f32,
    is_continuation: bool,
}

impl BoxFrame {
    pub(crate) fn open(ctx: &mut LayoutContext, style: &ComputedStyle, is_continuation: bool) -> Self {
        let frame = Self {
            start_elements: ctx.element_count(),
            start_y: ctx.cursor_y(),
            is_continuation,
        };
        if !is_continuation {
            ctx.advance_cursor(style.inset_top());
        }
        frame
    }

    /// Drops everything placed since `open` and rewinds the cursor.
    pub(crate) fn abandon(self, ctx: &mut LayoutContext) {
        ctx.truncate(self.start_elements);
        ctx.set_cursor_y(self.start_y);
    }

    /// Adds bottom insets, applies height constraints when the box is whole,
    /// and paints the decorations beneath the box's content.
    pub(crate) fn close(
        self,
        ctx: &mut LayoutContext,
        style: &ComputedStyle,
        constraints: BoxConstraints,
        finished: bool,
        href: Option<&str>,
    ) {
        let mut end_y = ctx.cursor_y();
        if finished {
            end_y += style.inset_bottom();
            if !self.is_continuation {
                end_y = self.start_y + resolve_height(style, constraints, end_y - self.start_y);
            }
        }
        ctx.set_cursor_y(end_y);

        let bounds = Rect::new(ctx.x(), self.start_y, ctx.width(), end_y - self.start_y);
        if style.has_box_decoration() {
            let decorations = create_background_and_borders(bounds, style, !self.is_continuation, finished);
            ctx.insert_elements(self.start_elements, decorations);
        }
        if let Some(href) = href {
            if !bounds.is_empty() {
                ctx.push_element(
                    bounds,
                    LayoutElement::Link(LinkElement {
                        href: href.to_string(),
                    }),
                );
            }
        }
    }
}
