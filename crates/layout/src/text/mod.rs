//! Inline text: flattening styled inline trees, shaping and line breaking.

pub mod builder;
pub mod shaper;
pub mod wrapper;

pub use builder::{collect_inlines, InlineContent, TextSpan};
pub use shaper::{shape_spans, FragmentKind, ShapedFragment, ShapedText, SpanMetrics};
pub use wrapper::{break_lines, Line};
