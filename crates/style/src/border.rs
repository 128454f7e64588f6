use dossier_types::Color;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    None,
}

/// A single border edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Border {
    pub width: f32,
    #[serde(default)]
    pub style: BorderStyle,
    pub color: Color,
}

impl Border {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            style: BorderStyle::Solid,
            color,
        }
    }

    /// The width that actually takes up space; `style: none` borders collapse to zero.
    pub fn effective_width(&self) -> f32 {
        match self.style {
            BorderStyle::Solid => self.width.max(0.0),
            BorderStyle::None => 0.0,
        }
    }
}

impl Eq for Border {}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.style.hash(state);
        self.color.hash(state);
    }
}
