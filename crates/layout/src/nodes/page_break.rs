use super::RenderNode;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState};
use crate::style::ComputedStyle;
use crate::LayoutError;
use dossier_types::geometry::{BoxConstraints, Size};

/// A forced break. The parent block ends the page when it reaches one,
/// unless nothing has been placed on the page yet.
#[derive(Debug, Clone, Default)]
pub struct PageBreakNode {
    style: ComputedStyle,
}

impl PageBreakNode {
    pub fn build() -> RenderNode {
        RenderNode::PageBreak(Self::default())
    }
}

impl LayoutNode for PageBreakNode {
    fn style(&self) -> &ComputedStyle {
        &self.style
    }

    fn measure(&self, _constraints: BoxConstraints) -> Size {
        Size::zero()
    }

    fn max_content_width(&self) -> f32 {
        0.0
    }

    fn min_content_width(&self) -> f32 {
        0.0
    }

    fn layout(
        &self,
        _ctx: &mut LayoutContext,
        _constraints: BoxConstraints,
        _break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        Ok(LayoutResult::Finished)
    }

    fn is_page_break(&self) -> bool {
        true
    }
}
