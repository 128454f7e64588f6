//! Intermediate Document Format (IDF)
//! The in-memory layout tree produced by the document composers and consumed
//! by the layout engine. Nodes carry content and style references only; no
//! geometry is resolved at this stage.

use dossier_style::stylesheet::ElementStyle;
use std::sync::Arc;

// --- Shared Types ---

/// A string type for the document.
pub type TextStr = String;

/// A common metadata structure for all block-level `IRNode`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    /// Stable identifier, used to address a node from tests and diagnostics.
    pub id: Option<TextStr>,
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
}

impl NodeMetadata {
    pub fn styled(style: &Arc<ElementStyle>) -> Self {
        Self {
            id: None,
            style_sets: vec![Arc::clone(style)],
            style_override: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<TextStr>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_style(mut self, style: &Arc<ElementStyle>) -> Self {
        self.style_sets.push(Arc::clone(style));
        self
    }

    pub fn with_override(mut self, style: ElementStyle) -> Self {
        self.style_override = Some(style);
        self
    }
}

/// A common metadata structure for all `InlineNode`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineMetadata {
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
}

impl InlineMetadata {
    pub fn styled(style: &Arc<ElementStyle>) -> Self {
        Self {
            style_sets: vec![Arc::clone(style)],
            style_override: None,
        }
    }
}

/// Vector artwork drawn as filled paths, described in its own coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorGlyph {
    /// SVG-style `"min-x min-y width height"`.
    pub view_box: TextStr,
    /// SVG path data strings, each filled with the node's `color`.
    pub paths: Vec<TextStr>,
}

// --- Main Node Enums ---

/// Represents a block-level element in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    /// The root of a document, containing other block nodes.
    Root(Vec<IRNode>),
    /// A generic block container; children stack vertically.
    Block {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    /// A container for flexible box layout.
    FlexContainer {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    /// A paragraph, containing only inline content.
    Paragraph {
        meta: NodeMetadata,
        children: Vec<InlineNode>,
    },
    /// A heading, with a level and inline content.
    Heading {
        meta: NodeMetadata,
        level: u8,
        children: Vec<InlineNode>,
    },
    /// A raster image referenced by URL or path.
    Image { meta: NodeMetadata, src: TextStr },
    /// An inline vector glyph, such as an icon.
    Vector { meta: NodeMetadata, glyph: VectorGlyph },
    /// A clickable region wrapping block content.
    Link {
        meta: NodeMetadata,
        href: TextStr,
        children: Vec<IRNode>,
    },
    /// A hard page break.
    PageBreak,
}

impl IRNode {
    /// Returns a reference to the metadata if the node type supports it.
    pub fn meta(&self) -> Option<&NodeMetadata> {
        match self {
            IRNode::Block { meta, .. }
            | IRNode::FlexContainer { meta, .. }
            | IRNode::Paragraph { meta, .. }
            | IRNode::Heading { meta, .. }
            | IRNode::Image { meta, .. }
            | IRNode::Vector { meta, .. }
            | IRNode::Link { meta, .. } => Some(meta),
            IRNode::Root(_) | IRNode::PageBreak => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.meta().and_then(|m| m.id.as_deref())
    }

    pub fn style_sets(&self) -> &[Arc<ElementStyle>] {
        self.meta().map(|m| m.style_sets.as_slice()).unwrap_or(&[])
    }

    pub fn style_override(&self) -> Option<&ElementStyle> {
        self.meta().and_then(|m| m.style_override.as_ref())
    }

    /// Returns a string identifier for the node type, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            IRNode::Root(_) => "root",
            IRNode::Block { .. } => "block",
            IRNode::FlexContainer { .. } => "flex-container",
            IRNode::Paragraph { .. } => "paragraph",
            IRNode::Heading { .. } => "heading",
            IRNode::Image { .. } => "image",
            IRNode::Vector { .. } => "vector",
            IRNode::Link { .. } => "link",
            IRNode::PageBreak => "page-break",
        }
    }

    /// Block-level children, empty for leaf nodes.
    pub fn children(&self) -> &[IRNode] {
        match self {
            IRNode::Root(children)
            | IRNode::Block { children, .. }
            | IRNode::FlexContainer { children, .. }
            | IRNode::Link { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first, pre-order traversal over this node and all block descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a IRNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Collects every node (including `self`) matching `predicate`.
    pub fn find_all<'a>(&'a self, predicate: impl Fn(&IRNode) -> bool) -> Vec<&'a IRNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if predicate(node) {
                found.push(node);
            }
        });
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&IRNode> {
        self.find_all(|node| node.id() == Some(id)).into_iter().next()
    }

    /// The concatenated text of this node's subtree, blocks separated by newlines.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            IRNode::Paragraph { children, .. } | IRNode::Heading { children, .. } => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for inline in children {
                    inline.collect_text(out);
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Image sources referenced anywhere in the subtree, in document order.
    pub fn image_sources(&self) -> Vec<&str> {
        let mut sources = Vec::new();
        self.walk(&mut |node| {
            if let IRNode::Image { src, .. } = node {
                sources.push(src.as_str());
            }
        });
        sources
    }
}

/// Represents an inline-level element within a block like a `Paragraph`.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    /// A run of plain text.
    Text(TextStr),
    /// A styled `<span>`.
    StyledSpan {
        meta: InlineMetadata,
        children: Vec<InlineNode>,
    },
    /// A hyperlink `<a>`.
    Hyperlink {
        meta: InlineMetadata,
        href: TextStr,
        children: Vec<InlineNode>,
    },
    /// A forced line break.
    LineBreak,
}

impl InlineNode {
    pub fn text(text: impl Into<TextStr>) -> Self {
        InlineNode::Text(text.into())
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            InlineNode::Text(text) => out.push_str(text),
            InlineNode::StyledSpan { children, .. } | InlineNode::Hyperlink { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            InlineNode::LineBreak => out.push('\n'),
        }
    }
}
