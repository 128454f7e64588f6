use super::{build_children, intrinsic_width, resolve_child_width, resolve_height, BoxFrame, RenderNode};
use crate::engine::LayoutEngine;
use crate::images::ImageMetrics;
use crate::interface::{BlockState, LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::style::ComputedStyle;
use crate::LayoutError;
use dossier_idf::IRNode;
use dossier_types::geometry::{BoxConstraints, Size};
use std::sync::Arc;

/// A vertical stack of children: plain blocks, column flex containers,
/// link boxes and the document root.
#[derive(Debug)]
pub struct BlockNode {
    pub id: Option<String>,
    pub children: Vec<RenderNode>,
    pub style: Arc<ComputedStyle>,
    pub href: Option<String>,
}

enum Outcome {
    Finished,
    Split(BlockState),
    /// Nothing of this block was placed; move it to the next page whole.
    Abandon,
}

impl BlockNode {
    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        parent_style: &Arc<ComputedStyle>,
        images: &ImageMetrics,
    ) -> Result<RenderNode, LayoutError> {
        let (id, style, children_ir, href) = match node {
            IRNode::Root(children) => (None, Arc::clone(parent_style), children, None),
            IRNode::Block { meta, children } | IRNode::FlexContainer { meta, children } => {
                (meta.id.clone(), engine.compute_style(meta, parent_style), children, None)
            }
            IRNode::Link { meta, href, children } => (
                meta.id.clone(),
                engine.compute_style(meta, parent_style),
                children,
                Some(href.clone()),
            ),
            _ => return Err(LayoutError::Generic(format!("'{}' is not a block node", node.kind()))),
        };

        let children = build_children(children_ir, engine, &style, images)?;
        Ok(RenderNode::Block(Self {
            id,
            children,
            style,
            href,
        }))
    }

    pub fn new_from_children(children: Vec<RenderNode>, style: Arc<ComputedStyle>) -> Self {
        Self {
            id: None,
            children,
            style,
            href: None,
        }
    }

    fn content_width(&self, width: f32) -> f32 {
        (width - self.style.horizontal_insets()).max(0.0)
    }

    fn gap(&self) -> f32 {
        self.style.flex.row_gap
    }

    fn flow_children(&self) -> impl Iterator<Item = &RenderNode> {
        self.children.iter().filter(|c| !c.is_page_break())
    }

    fn layout_flow(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let (start_index, mut child_resume_state, is_continuation) = match break_state {
            None | Some(NodeState::Atomic) => (0, None, false),
            Some(state) => {
                let block_state = state.as_block()?;
                (block_state.child_index, block_state.child_state.map(|b| *b), true)
            }
        };

        let frame = BoxFrame::open(ctx, &self.style, is_continuation);
        let content_x = ctx.x() + self.style.inset_left();
        let content_width = self.content_width(ctx.width());
        let align = self.style.flex.align_items;
        let gap = self.gap();

        let mut outcome = Outcome::Finished;
        let end_y = {
            let mut column = ctx.column(content_x, content_width, self.style.inset_bottom());
            let mut placed_any = false;

            for (i, child) in self.children.iter().enumerate().skip(start_index) {
                let resume = if i == start_index { child_resume_state.take() } else { None };
                let at_page_top = is_continuation && i == start_index;

                if child.is_page_break() {
                    let has_more = i + 1 < self.children.len();
                    if has_more && column.page_has_content() {
                        outcome = Outcome::Split(BlockState {
                            child_index: i + 1,
                            child_state: None,
                        });
                        break;
                    }
                    continue;
                }

                let before_child_y = column.cursor_y();
                let margin = child.style().box_model.margin;
                if resume.is_none() {
                    if placed_any {
                        column.advance_cursor(gap);
                    }
                    if !at_page_top {
                        column.advance_cursor(margin.top);
                    }
                }

                let (offset, child_width) = resolve_child_width(child, content_width, align);
                let child_constraints = BoxConstraints::tight_width(child_width);

                let mut moves_to_next_page = false;
                if resume.is_none() && child.keeps_with_next() && column.is_breakable() && column.page_has_content() {
                    if let Some(next) = self.children.get(i + 1).filter(|n| !n.is_page_break()) {
                        let (_, next_width) = resolve_child_width(next, content_width, align);
                        let needed = child.measure(child_constraints).height
                            + margin.bottom
                            + gap
                            + next.style().box_model.margin.top
                            + next.leading_height(BoxConstraints::tight_width(next_width));
                        moves_to_next_page = !column.fits(needed);
                    }
                }

                let result = if moves_to_next_page {
                    LayoutResult::Break(NodeState::Atomic)
                } else {
                    let mut child_ctx = column.column(content_x + offset, child_width, 0.0);
                    let result = child.layout(&mut child_ctx, child_constraints, resume)?;
                    let child_end = child_ctx.cursor_y();
                    column.set_cursor_y(child_end);
                    result
                };

                match result {
                    LayoutResult::Finished => {
                        column.advance_cursor(margin.bottom);
                        placed_any = true;
                    }
                    LayoutResult::Break(NodeState::Atomic) => {
                        column.set_cursor_y(before_child_y);
                        outcome = if !placed_any && !is_continuation {
                            Outcome::Abandon
                        } else {
                            Outcome::Split(BlockState {
                                child_index: i,
                                child_state: None,
                            })
                        };
                        break;
                    }
                    LayoutResult::Break(state) => {
                        outcome = Outcome::Split(BlockState {
                            child_index: i,
                            child_state: Some(Box::new(state)),
                        });
                        break;
                    }
                }
            }
            column.cursor_y()
        };
        ctx.set_cursor_y(end_y);

        match outcome {
            Outcome::Abandon => {
                frame.abandon(ctx);
                Ok(LayoutResult::Break(NodeState::Atomic))
            }
            Outcome::Finished => {
                frame.close(ctx, &self.style, constraints, true, self.href.as_deref());
                Ok(LayoutResult::Finished)
            }
            Outcome::Split(state) => {
                frame.close(ctx, &self.style, constraints, false, self.href.as_deref());
                Ok(LayoutResult::Break(NodeState::Block(state)))
            }
        }
    }
}

impl LayoutNode for BlockNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        let width = constraints.max_width;
        let content_width = self.content_width(width);
        let align = self.style.flex.align_items;

        let mut total_content_height: f32 = 0.0;
        for (i, child) in self.flow_children().enumerate() {
            if i > 0 {
                total_content_height += self.gap();
            }
            let (_, child_width) = resolve_child_width(child, content_width, align);
            let margin = child.style().box_model.margin;
            total_content_height +=
                margin.vertical() + child.measure(BoxConstraints::tight_width(child_width)).height;
        }

        let natural = total_content_height + self.style.vertical_insets();
        Size::new(width, resolve_height(&self.style, constraints, natural))
    }

    fn max_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || {
            self.flow_children()
                .map(|c| c.max_content_width() + c.style().box_model.margin.horizontal())
                .fold(0.0, f32::max)
        })
    }

    fn min_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || {
            self.flow_children()
                .map(|c| c.min_content_width() + c.style().box_model.margin.horizontal())
                .fold(0.0, f32::max)
        })
    }

    fn leading_height(&self, constraints: BoxConstraints) -> f32 {
        let content_width = self.content_width(constraints.max_width);
        match self.flow_children().next() {
            Some(first) => {
                let (_, child_width) = resolve_child_width(first, content_width, self.style.flex.align_items);
                self.style.inset_top()
                    + first.style().box_model.margin.top
                    + first.leading_height(BoxConstraints::tight_width(child_width))
            }
            None => self.measure(constraints).height,
        }
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let fresh = matches!(break_state, None | Some(NodeState::Atomic));
        if fresh && self.style.keeps_together() && ctx.is_breakable() {
            let height = self.measure(constraints).height;
            if !ctx.fits(height) {
                if ctx.page_has_content() {
                    return Ok(LayoutResult::Break(NodeState::Atomic));
                }
                // Taller than a whole page: fall back to splitting.
                return self.layout_flow(ctx, constraints, None);
            }
            let (x, y, width) = (ctx.x(), ctx.cursor_y(), ctx.width());
            let mut frame = ctx.unbreakable(x, y, width);
            self.layout_flow(&mut frame, constraints, None)?;
            let end_y = frame.cursor_y();
            ctx.set_cursor_y(end_y);
            return Ok(LayoutResult::Finished);
        }
        self.layout_flow(ctx, constraints, break_state)
    }
}
