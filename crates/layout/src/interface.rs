use crate::algorithms::pagination::check_child_fit;
use crate::{ComputedStyle, LayoutElement, LayoutError, PositionedElement};
use dossier_types::geometry::{BoxConstraints, Rect, Size};
use std::fmt::Debug;

// --- State Definitions (Type-Safe) ---

#[derive(Debug, Clone, PartialEq)]
pub struct BlockState {
    pub child_index: usize,
    pub child_state: Option<Box<NodeState>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlexState {
    pub line_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphState {
    pub line_index: usize,
}

/// Where a node stopped on the previous page.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Block(BlockState),
    Flex(FlexState),
    Paragraph(ParagraphState),
    /// Nothing of the node was kept; lay it out again from the start.
    Atomic,
}

impl NodeState {
    pub fn as_block(self) -> Result<BlockState, LayoutError> {
        match self {
            NodeState::Block(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Block", self.variant_name())),
        }
    }

    pub fn as_flex(self) -> Result<FlexState, LayoutError> {
        match self {
            NodeState::Flex(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Flex", self.variant_name())),
        }
    }

    pub fn as_paragraph(self) -> Result<ParagraphState, LayoutError> {
        match self {
            NodeState::Paragraph(s) => Ok(s),
            _ => Err(LayoutError::StateMismatch("Paragraph", self.variant_name())),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            NodeState::Block(_) => "Block",
            NodeState::Flex(_) => "Flex",
            NodeState::Paragraph(_) => "Paragraph",
            NodeState::Atomic => "Atomic",
        }
    }
}

// --- Context ---

/// Elements collected for the page currently being filled.
#[derive(Debug, Default)]
pub struct PageBuffer {
    pub elements: Vec<PositionedElement>,
}

impl PageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any visible content (text, image, vector) was placed.
    /// Box backgrounds alone do not count.
    pub fn has_content(&self) -> bool {
        self.elements.iter().any(|el| {
            matches!(
                el.element,
                LayoutElement::Text(_) | LayoutElement::Image(_) | LayoutElement::Vector(_)
            )
        })
    }
}

/// A vertical frame on the current page. All coordinates are absolute page
/// points; `limit_y` is the lowest y content may reach before breaking.
pub struct LayoutContext<'a> {
    x: f32,
    width: f32,
    cursor_y: f32,
    limit_y: f32,
    page: &'a mut PageBuffer,
}

impl<'a> LayoutContext<'a> {
    pub fn new(bounds: Rect, page: &'a mut PageBuffer) -> Self {
        Self {
            x: bounds.x,
            width: bounds.width,
            cursor_y: bounds.y,
            limit_y: bounds.bottom(),
            page,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor_y = y;
    }

    pub fn advance_cursor(&mut self, dy: f32) {
        self.cursor_y += dy;
    }

    pub fn available_height(&self) -> f32 {
        (self.limit_y - self.cursor_y).max(0.0)
    }

    /// `false` when `height` would cross the frame's lower limit.
    pub fn fits(&self, height: f32) -> bool {
        !check_child_fit(self.cursor_y, height, self.limit_y).should_break
    }

    pub fn is_breakable(&self) -> bool {
        self.limit_y.is_finite()
    }

    pub fn page_has_content(&self) -> bool {
        self.page.has_content()
    }

    pub fn element_count(&self) -> usize {
        self.page.elements.len()
    }

    pub fn push_element(&mut self, rect: Rect, element: LayoutElement) {
        self.page.elements.push(PositionedElement::new(rect, element));
    }

    /// Inserts elements at `index` so they paint beneath everything after it.
    pub fn insert_elements(&mut self, index: usize, elements: Vec<PositionedElement>) {
        let index = index.min(self.page.elements.len());
        self.page.elements.splice(index..index, elements);
    }

    /// Discards everything pushed after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.page.elements.truncate(len);
    }

    /// A narrower frame sharing this frame's cursor. `reserve_bottom` keeps
    /// room for a parent's bottom padding and border.
    pub fn column<'child>(&'child mut self, x: f32, width: f32, reserve_bottom: f32) -> LayoutContext<'child> {
        LayoutContext {
            x,
            width,
            cursor_y: self.cursor_y,
            limit_y: self.limit_y - reserve_bottom,
            page: &mut *self.page,
        }
    }

    /// A frame starting at `(x, y)` that never breaks.
    pub fn unbreakable<'child>(&'child mut self, x: f32, y: f32, width: f32) -> LayoutContext<'child> {
        LayoutContext {
            x,
            width,
            cursor_y: y,
            limit_y: f32::INFINITY,
            page: &mut *self.page,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutResult {
    Finished,
    Break(NodeState),
}

/// A node of the render tree.
///
/// `layout` places the node's border box at `ctx.x()` and `ctx.cursor_y()`
/// with the border-box width `constraints.max_width`, and leaves the cursor
/// at the bottom edge of what it placed. Margins belong to the parent.
pub trait LayoutNode: Debug + Send + Sync {
    fn style(&self) -> &ComputedStyle;

    /// Border-box size when laid out without page breaks.
    fn measure(&self, constraints: BoxConstraints) -> Size;

    /// Preferred border-box width with unlimited room.
    fn max_content_width(&self) -> f32;

    /// Narrowest border-box width that avoids overflow.
    fn min_content_width(&self) -> f32;

    /// Height of the first unbreakable piece, used to keep headings with
    /// what follows them.
    fn leading_height(&self, constraints: BoxConstraints) -> f32 {
        self.measure(constraints).height
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError>;

    fn is_page_break(&self) -> bool {
        false
    }

    /// Headings ask their parent not to leave them alone at a page bottom.
    fn keeps_with_next(&self) -> bool {
        false
    }

    /// Whether the node fills the cross axis when its parent stretches.
    /// Replaced content (images, icons) keeps its own width.
    fn stretches(&self) -> bool {
        true
    }
}
