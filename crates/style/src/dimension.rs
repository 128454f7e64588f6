//! Defines primitives for size, position, and spacing.
use serde::{de, Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Pt(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Dimension {
    /// Resolves the dimension against the containing block's size.
    /// `Auto` has no definite value and resolves to `None`.
    pub fn resolve(&self, container: f32) -> Option<f32> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) if container.is_finite() => Some(container * p / 100.0),
            Dimension::Percent(_) | Dimension::Auto => None,
        }
    }
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Dimension::Pt(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Percent(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Auto => {
                2u8.hash(state);
            }
        }
    }
}

impl Eq for Dimension {}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Hash for Margins {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.bottom.to_bits().hash(state);
        self.left.to_bits().hash(state);
    }
}

impl Eq for Margins {}

impl Margins {
    pub const ZERO: Margins = Margins {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn x(value: f32) -> Self {
        Self::new(0.0, value, 0.0, value)
    }

    pub fn y(value: f32) -> Self {
        Self::new(value, 0.0, value, 0.0)
    }

    pub fn top(value: f32) -> Self {
        Self::new(value, 0.0, 0.0, 0.0)
    }

    pub fn bottom(value: f32) -> Self {
        Self::new(0.0, 0.0, value, 0.0)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 point values)
    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(|part| {
                let number = part.strip_suffix("pt").unwrap_or(part);
                number
                    .parse::<f32>()
                    .map_err(|e| format!("Invalid length '{}': {}", part, e))
            })
            .collect::<Result<Vec<f32>, String>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins::new(*y, *x, *y, *x)),
            [top, right, bottom, left] => Ok(Margins::new(*top, *right, *bottom, *left)),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginsDef {
            Str(String),
            Num(f32),
            Map {
                #[serde(default)]
                top: f32,
                #[serde(default)]
                right: f32,
                #[serde(default)]
                bottom: f32,
                #[serde(default)]
                left: f32,
            },
        }

        match MarginsDef::deserialize(deserializer)? {
            MarginsDef::Str(s) => Margins::parse_shorthand(&s).map_err(de::Error::custom),
            MarginsDef::Num(n) => Ok(Margins::all(n)),
            MarginsDef::Map {
                top,
                right,
                bottom,
                left,
            } => Ok(Margins::new(top, right, bottom, left)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_resolves_against_container() {
        assert_eq!(Dimension::Percent(48.0).resolve(200.0), Some(96.0));
        assert_eq!(Dimension::Pt(12.0).resolve(200.0), Some(12.0));
        assert_eq!(Dimension::Auto.resolve(200.0), None);
        assert_eq!(Dimension::Percent(50.0).resolve(f32::INFINITY), None);
    }

    #[test]
    fn margins_accept_shorthand_and_maps() {
        let m: Margins = serde_json::from_str("\"4 8\"").unwrap();
        assert_eq!(m, Margins::new(4.0, 8.0, 4.0, 8.0));
        let m: Margins = serde_json::from_str("{\"top\": 2}").unwrap();
        assert_eq!(m, Margins::top(2.0));
        let m: Margins = serde_json::from_str("6").unwrap();
        assert_eq!(m, Margins::all(6.0));
    }
}
