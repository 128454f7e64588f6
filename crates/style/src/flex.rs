//! Flexbox properties.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
}

impl AlignItems {
    /// Cross-axis offset of an item that leaves `free` space in its line.
    pub fn offset(self, free: f32) -> f32 {
        let free = free.max(0.0);
        match self {
            AlignItems::Center => free / 2.0,
            AlignItems::FlexEnd => free,
            AlignItems::Stretch | AlignItems::FlexStart => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_offsets() {
        assert_eq!(AlignItems::Center.offset(10.0), 5.0);
        assert_eq!(AlignItems::FlexEnd.offset(10.0), 10.0);
        assert_eq!(AlignItems::Stretch.offset(10.0), 0.0);
        assert_eq!(AlignItems::Center.offset(-4.0), 0.0);
    }

    #[test]
    fn names_are_kebab_case() {
        let justify: JustifyContent = serde_json::from_str("\"space-between\"").unwrap();
        assert_eq!(justify, JustifyContent::SpaceBetween);
        let wrap: FlexWrap = serde_json::from_str("\"no-wrap\"").unwrap();
        assert_eq!(wrap, FlexWrap::NoWrap);
    }
}
