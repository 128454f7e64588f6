use super::RenderNode;
use crate::engine::LayoutEngine;
use crate::images::ImageMetrics;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::painting::box_painter::create_background_and_borders;
use crate::style::ComputedStyle;
use crate::{ImageElement, LayoutElement, LayoutError};
use dossier_idf::IRNode;
use dossier_types::geometry::{BoxConstraints, Rect, Size};
use std::sync::Arc;

/// CSS pixels to points.
const PX_TO_PT: f32 = 0.75;

#[derive(Debug, Clone)]
pub struct ImageNode {
    pub id: Option<String>,
    pub src: String,
    style: Arc<ComputedStyle>,
    /// Intrinsic size in points.
    intrinsic: Size,
}

impl ImageNode {
    /// Returns `None` when the image is not in `images`, i.e. it failed to load.
    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        parent_style: &Arc<ComputedStyle>,
        images: &ImageMetrics,
    ) -> Result<Option<RenderNode>, LayoutError> {
        let (meta, src) = match node {
            IRNode::Image { meta, src } => (meta, src),
            _ => return Err(LayoutError::Generic(format!("'{}' is not an image", node.kind()))),
        };

        let Some(pixels) = images.get(src) else {
            log::debug!("Omitting image '{}': not available", src);
            return Ok(None);
        };

        Ok(Some(RenderNode::Image(Self {
            id: meta.id.clone(),
            src: src.clone(),
            style: engine.compute_style(meta, parent_style),
            intrinsic: Size::new(pixels.width * PX_TO_PT, pixels.height * PX_TO_PT),
        })))
    }

    fn aspect_ratio(&self) -> f32 {
        if self.intrinsic.width > 0.0 {
            self.intrinsic.height / self.intrinsic.width
        } else {
            1.0
        }
    }

    /// Preferred border-box width: definite, derived from a definite height, or intrinsic.
    fn preferred_width(&self) -> f32 {
        if let Some(width) = self.style.definite_width(f32::INFINITY) {
            return width;
        }
        match self.style.definite_height() {
            Some(height) if self.aspect_ratio() > 0.0 => height / self.aspect_ratio(),
            _ => self.intrinsic.width,
        }
    }

    fn height_for(&self, width: f32) -> f32 {
        self.style
            .definite_height()
            .unwrap_or_else(|| width * self.aspect_ratio())
    }
}

impl LayoutNode for ImageNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        let width = constraints.max_width;
        Size::new(width, constraints.constrain_height(self.height_for(width)))
    }

    fn max_content_width(&self) -> f32 {
        self.preferred_width()
    }

    fn min_content_width(&self) -> f32 {
        self.preferred_width()
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        _break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let size = self.measure(constraints);
        if !ctx.fits(size.height) && ctx.page_has_content() {
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }

        let bounds = Rect::new(ctx.x(), ctx.cursor_y(), size.width, size.height);
        for decoration in create_background_and_borders(bounds, &self.style, true, true) {
            ctx.push_element(decoration.rect(), decoration.element);
        }

        let image_rect = Rect::new(
            bounds.x + self.style.border_left_width(),
            bounds.y + self.style.border_top_width(),
            (bounds.width - self.style.border_left_width() - self.style.border_right_width()).max(0.0),
            (bounds.height - self.style.border_top_width() - self.style.border_bottom_width()).max(0.0),
        );
        let inset = self.style.border_left_width();
        ctx.push_element(
            image_rect,
            LayoutElement::Image(ImageElement {
                src: self.src.clone(),
                corner_radius: (self.style.border.radius - inset).max(0.0),
            }),
        );
        ctx.advance_cursor(size.height);
        Ok(LayoutResult::Finished)
    }

    fn stretches(&self) -> bool {
        false
    }
}
