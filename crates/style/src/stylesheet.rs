//! Defines the declarative style record attached to document nodes.

use super::border::Border;
use super::dimension::{Dimension, Margins, PageSize};
use super::flex::{AlignItems, FlexDirection, FlexWrap, JustifyContent};
use super::font::{FontStyle, FontWeight};
use super::text::{TextAlign, TextDecoration, TextTransform};
use dossier_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub margins: Margins,
}

/// Whether the layout engine may split a box across a page boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BreakInside {
    #[default]
    Auto,
    /// Keep the box on one page; move it whole to the next page when it does not fit.
    Avoid,
}

#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    // Font & Text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Line height as a multiple of the font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    /// Extra space after every character, in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    // Box Model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_inside: Option<BreakInside>,

    // Flexbox Container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<FlexDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_wrap: Option<FlexWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_gap: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<f32>,

    // Flexbox Item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_grow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_shrink: Option<f32>,
}

macro_rules! overlay_fields {
    ($target:ident, $source:ident, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field.clone();
            }
        )+
    };
}

impl ElementStyle {
    /// Copies every property that `other` sets over the corresponding property of `self`.
    pub fn overlay(&mut self, other: &ElementStyle) {
        overlay_fields!(
            self, other,
            font_family, font_size, font_weight, font_style, line_height, text_align, color,
            text_decoration, text_transform, letter_spacing,
            background_color, border, border_top, border_right, border_bottom, border_left,
            border_radius, margin, padding, width, height, min_height, break_inside,
            flex_direction, flex_wrap, justify_content, align_items, row_gap, column_gap,
            flex_grow, flex_shrink,
        );
    }

    /// Returns `self` with `other` layered on top.
    pub fn merged(&self, other: &ElementStyle) -> ElementStyle {
        let mut merged = self.clone();
        merged.overlay(other);
        merged
    }

    /// Sets `gap` shorthand (row and column gap).
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.row_gap = Some(gap);
        self.column_gap = Some(gap);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_only_replaces_set_properties() {
        let mut base = ElementStyle {
            font_size: Some(10.0),
            color: Some(Color::BLACK),
            ..Default::default()
        };
        base.overlay(&ElementStyle {
            font_size: Some(14.0),
            ..Default::default()
        });
        assert_eq!(base.font_size, Some(14.0));
        assert_eq!(base.color, Some(Color::BLACK));
    }

    #[test]
    fn gap_shorthand_sets_both_axes() {
        let style = ElementStyle::default().with_gap(6.0);
        assert_eq!(style.row_gap, Some(6.0));
        assert_eq!(style.column_gap, Some(6.0));
    }
}
