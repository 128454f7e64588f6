pub mod border;
pub mod dimension;
pub mod flex;
pub mod font;
pub mod stylesheet;
pub mod text;

pub use border::{Border, BorderStyle};
pub use dimension::{Dimension, Margins, PageSize};
pub use flex::{AlignItems, FlexDirection, FlexWrap, JustifyContent};
pub use font::{FontStyle, FontWeight};
pub use stylesheet::{BreakInside, ElementStyle, PageLayout};
pub use text::{TextAlign, TextDecoration, TextTransform};
