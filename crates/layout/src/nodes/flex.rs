use super::{build_children, intrinsic_width, resolve_height, BoxFrame, RenderNode};
use crate::algorithms::flex_solver::{container_style_to_taffy, item_style_to_taffy};
use crate::engine::LayoutEngine;
use crate::images::ImageMetrics;
use crate::interface::{FlexState, LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::style::ComputedStyle;
use crate::LayoutError;
use dossier_idf::IRNode;
use dossier_style::flex::AlignItems;
use dossier_types::geometry::{BoxConstraints, Size};
use std::sync::Arc;
use taffy::style::AvailableSpace;
use taffy::TaffyTree;

const EPSILON: f32 = 0.01;

/// A row flex container. Taffy places the items; each wrapped line is laid
/// out as one unbreakable unit and pages break between lines.
#[derive(Debug)]
pub struct FlexNode {
    pub id: Option<String>,
    pub children: Vec<RenderNode>,
    pub style: Arc<ComputedStyle>,
}

/// Item boxes relative to the container's content box, in item order.
#[derive(Debug, Clone, Default)]
struct FlexLayoutOutput {
    size: Size,
    child_layouts: Vec<taffy::Layout>,
}

/// Items whose margin boxes overlap vertically, i.e. one wrapped line.
#[derive(Debug, Clone, PartialEq)]
struct FlexLine {
    items: Vec<usize>,
    top: f32,
    bottom: f32,
}

impl FlexNode {
    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        style: Arc<ComputedStyle>,
        images: &ImageMetrics,
    ) -> Result<RenderNode, LayoutError> {
        let (meta, children_ir) = match node {
            IRNode::FlexContainer { meta, children } => (meta, children),
            _ => return Err(LayoutError::Generic(format!("'{}' is not a flex container", node.kind()))),
        };
        let children = build_children(children_ir, engine, &style, images)?
            .into_iter()
            .filter(|c| !c.is_page_break())
            .collect();
        Ok(RenderNode::Flex(Self {
            id: meta.id.clone(),
            children,
            style,
        }))
    }

    fn content_width(&self, width: f32) -> f32 {
        (width - self.style.horizontal_insets()).max(0.0)
    }

    /// Runs taffy over the items. `content_width` of `None` sizes the row to
    /// its content under `available`.
    fn compute_flex_layout(
        &self,
        content_width: Option<f32>,
        available: AvailableSpace,
    ) -> Result<FlexLayoutOutput, LayoutError> {
        let mut taffy = TaffyTree::<usize>::new();
        let mut child_nodes = Vec::with_capacity(self.children.len());
        for (i, child) in self.children.iter().enumerate() {
            let node = taffy
                .new_leaf_with_context(item_style_to_taffy(child.style()), i)
                .map_err(|e| LayoutError::Generic(format!("Taffy new_leaf error: {:?}", e)))?;
            child_nodes.push(node);
        }

        let root = taffy
            .new_with_children(container_style_to_taffy(&self.style, content_width), &child_nodes)
            .map_err(|e| LayoutError::Generic(format!("Taffy new_with_children error: {:?}", e)))?;

        let available_space = taffy::geometry::Size {
            width: content_width.map_or(available, AvailableSpace::Definite),
            height: AvailableSpace::MaxContent,
        };

        taffy
            .compute_layout_with_measure(root, available_space, |known, available, _node, context, _style| {
                let Some(index) = context else {
                    return taffy::geometry::Size::ZERO;
                };
                let child = &self.children[*index];
                let width = known.width.unwrap_or_else(|| match available.width {
                    AvailableSpace::MinContent => child.min_content_width(),
                    AvailableSpace::MaxContent => child.max_content_width(),
                    AvailableSpace::Definite(space) => {
                        child.max_content_width().min(space.max(child.min_content_width()))
                    }
                });
                let height = known
                    .height
                    .unwrap_or_else(|| child.measure(BoxConstraints::tight_width(width)).height);
                taffy::geometry::Size { width, height }
            })
            .map_err(|e| LayoutError::Generic(format!("Taffy layout error: {:?}", e)))?;

        let root_layout = taffy
            .layout(root)
            .map_err(|_| LayoutError::Generic("Taffy layout missing".into()))?;
        let size = Size::new(root_layout.size.width, root_layout.size.height);

        let mut child_layouts = Vec::with_capacity(child_nodes.len());
        for &id in &child_nodes {
            let layout = taffy
                .layout(id)
                .map_err(|_| LayoutError::Generic("Taffy child layout missing".into()))?;
            child_layouts.push(*layout);
        }

        Ok(FlexLayoutOutput { size, child_layouts })
    }

    /// Layout for contexts that cannot report errors; a failed solve leaves
    /// the row empty.
    fn layout_or_empty(&self, content_width: Option<f32>, available: AvailableSpace) -> FlexLayoutOutput {
        self.compute_flex_layout(content_width, available).unwrap_or_else(|e| {
            log::warn!("Flex layout failed, treating the row as empty: {}", e);
            FlexLayoutOutput::default()
        })
    }

    /// Groups items into lines by overlapping margin boxes.
    fn lines(&self, output: &FlexLayoutOutput) -> Vec<FlexLine> {
        let mut lines: Vec<FlexLine> = Vec::new();
        for (index, layout) in output.child_layouts.iter().enumerate() {
            let margin = self.children[index].style().box_model.margin;
            let top = layout.location.y - margin.top;
            let bottom = layout.location.y + layout.size.height + margin.bottom;
            match lines.last_mut() {
                Some(line) if top < line.bottom - EPSILON => {
                    line.items.push(index);
                    line.top = line.top.min(top);
                    line.bottom = line.bottom.max(bottom);
                }
                _ => lines.push(FlexLine {
                    items: vec![index],
                    top,
                    bottom,
                }),
            }
        }
        lines
    }

    fn layout_lines(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let (start_line, is_continuation) = match break_state {
            None | Some(NodeState::Atomic) => (0, false),
            Some(state) => (state.as_flex()?.line_index, true),
        };

        let content_width = self.content_width(ctx.width());
        let output = self.compute_flex_layout(Some(content_width), AvailableSpace::Definite(content_width))?;
        let lines = self.lines(&output);

        let frame = BoxFrame::open(ctx, &self.style, is_continuation);
        let content_x = ctx.x() + self.style.inset_left();
        let stretch = self.style.flex.align_items == AlignItems::Stretch;

        let mut split_at: Option<usize> = None;
        let mut abandon = false;
        let end_y = {
            let mut column = ctx.column(content_x, content_width, self.style.inset_bottom());
            let origin = column.cursor_y();
            let base = lines.get(start_line).map_or(0.0, |line| line.top);
            let mut placed_bottom = base;
            for (line_index, line) in lines.iter().enumerate().skip(start_line) {
                if !column.fits(line.bottom - placed_bottom) && column.page_has_content() {
                    if line_index == start_line && !is_continuation {
                        abandon = true;
                    } else {
                        split_at = Some(line_index);
                    }
                    break;
                }

                for &index in &line.items {
                    let item = &self.children[index];
                    let layout = &output.child_layouts[index];
                    let item_constraints = if stretch && item.style().definite_height().is_none() {
                        BoxConstraints::stretched(layout.size.width, layout.size.height)
                    } else {
                        BoxConstraints::tight_width(layout.size.width)
                    };
                    let y = origin + layout.location.y - base;
                    let mut item_ctx = column.unbreakable(content_x + layout.location.x, y, layout.size.width);
                    item.layout(&mut item_ctx, item_constraints, None)?;
                }
                placed_bottom = line.bottom;
                column.set_cursor_y(origin + line.bottom - base);
            }
            column.cursor_y()
        };
        ctx.set_cursor_y(end_y);

        if abandon {
            frame.abandon(ctx);
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }
        match split_at {
            Some(line_index) => {
                frame.close(ctx, &self.style, constraints, false, None);
                Ok(LayoutResult::Break(NodeState::Flex(FlexState { line_index })))
            }
            None => {
                frame.close(ctx, &self.style, constraints, true, None);
                Ok(LayoutResult::Finished)
            }
        }
    }
}

impl LayoutNode for FlexNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        let width = constraints.max_width;
        let content_width = self.content_width(width);
        let output = self.layout_or_empty(Some(content_width), AvailableSpace::Definite(content_width));
        let natural = output.size.height + self.style.vertical_insets();
        Size::new(width, resolve_height(&self.style, constraints, natural))
    }

    fn max_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || self.layout_or_empty(None, AvailableSpace::MaxContent).size.width)
    }

    fn min_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || self.layout_or_empty(None, AvailableSpace::MinContent).size.width)
    }

    fn leading_height(&self, constraints: BoxConstraints) -> f32 {
        let content_width = self.content_width(constraints.max_width);
        let output = self.layout_or_empty(Some(content_width), AvailableSpace::Definite(content_width));
        match self.lines(&output).first() {
            Some(line) => self.style.inset_top() + line.bottom,
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
        if fresh && self.style.keeps_together() && ctx.is_breakable() && ctx.page_has_content() {
            let height = self.measure(constraints).height;
            if !ctx.fits(height) {
                return Ok(LayoutResult::Break(NodeState::Atomic));
            }
        }
        self.layout_lines(ctx, constraints, break_state)
    }
}
