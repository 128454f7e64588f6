use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("No font registered for family '{0}'.")]
    FontNotFound(String),
    #[error("Font data for '{0}' could not be parsed for shaping.")]
    FontUnusable(String),
    #[error("State mismatch: Expected state for {0}, got {1}.")]
    StateMismatch(&'static str, &'static str),
    #[error("Pagination did not make progress after {0} pages.")]
    RunawayPagination(usize),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub(crate) mod engine;
pub use self::engine::LayoutEngine;

mod elements;
pub mod algorithms;
pub mod config;
pub mod fonts;
pub mod images;
pub mod interface;
pub mod nodes;
pub mod painting;
pub mod style;
pub mod text;

pub use self::config::LayoutConfig;
pub use self::elements::{
    ImageElement, LayoutElement, LayoutPage, LinkElement, PositionedElement, PositionedGlyph,
    RectElement, TextElement, VectorElement,
};
pub use self::fonts::{FontError, FontFace, FontLibrary, FontMetrics};
pub use self::images::ImageMetrics;
pub use self::style::ComputedStyle;

// Geometry types shared with the node implementations
pub use dossier_types::geometry::{BoxConstraints, Rect, Size};

pub use self::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState};

#[cfg(test)]
mod layout_test;
#[cfg(test)]
mod test_utils;
