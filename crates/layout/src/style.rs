//! Resolution of declarative `ElementStyle` records into concrete values.

use dossier_style::border::Border;
use dossier_style::dimension::{Dimension, Margins};
use dossier_style::flex::{AlignItems, FlexDirection, FlexWrap, JustifyContent};
use dossier_style::font::{FontStyle, FontWeight};
use dossier_style::stylesheet::{BreakInside, ElementStyle};
use dossier_style::text::{TextAlign, TextDecoration, TextTransform};
use dossier_types::Color;
use std::sync::Arc;

// Grouped Style Structures

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxModel {
    pub margin: Margins,
    pub padding: Margins,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub min_height: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderModel {
    pub top: Option<Border>,
    pub right: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextModel {
    pub font_family: Arc<String>,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    /// Multiple of the font size.
    pub line_height: f32,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub letter_spacing: f32,
    pub color: Color,
}

impl Default for TextModel {
    fn default() -> Self {
        Self {
            font_family: Arc::new("sans-serif".to_string()),
            font_size: 10.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            line_height: 1.4,
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            letter_spacing: 0.0,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlexModel {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub row_gap: f32,
    pub column_gap: f32,
    // Item properties
    pub grow: f32,
    pub shrink: f32,
}

impl Default for FlexModel {
    fn default() -> Self {
        Self {
            direction: FlexDirection::Row,
            wrap: FlexWrap::NoWrap,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            row_gap: 0.0,
            column_gap: 0.0,
            grow: 0.0,
            shrink: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiscModel {
    pub background_color: Option<Color>,
    pub break_inside: BreakInside,
}

/// Fully resolved style of one node. Text properties are inherited from the
/// parent; box, border, flex and misc properties are not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComputedStyle {
    pub box_model: BoxModel,
    pub border: BorderModel,
    pub text: TextModel,
    pub flex: FlexModel,
    pub misc: MiscModel,
}

impl ComputedStyle {
    /// Cascades `style_sets` (in order) and then `style_override` on top of the parent.
    pub fn compute(
        parent: &ComputedStyle,
        style_sets: &[Arc<ElementStyle>],
        style_override: Option<&ElementStyle>,
    ) -> ComputedStyle {
        if style_sets.is_empty() && style_override.is_none() {
            return parent.inherited();
        }

        let mut declared = ElementStyle::default();
        for set in style_sets {
            declared.overlay(set);
        }
        if let Some(over) = style_override {
            declared.overlay(over);
        }

        let mut computed = parent.inherited();
        computed.apply(&declared);
        computed
    }

    /// A style carrying only the inheritable (text) properties of `self`.
    pub fn inherited(&self) -> ComputedStyle {
        ComputedStyle {
            text: self.text.clone(),
            ..ComputedStyle::default()
        }
    }

    fn apply(&mut self, s: &ElementStyle) {
        let text = &mut self.text;
        if let Some(family) = &s.font_family {
            text.font_family = Arc::new(family.clone());
        }
        if let Some(size) = s.font_size {
            text.font_size = size;
        }
        if let Some(weight) = s.font_weight {
            text.font_weight = weight;
        }
        if let Some(style) = s.font_style {
            text.font_style = style;
        }
        if let Some(line_height) = s.line_height {
            text.line_height = line_height;
        }
        if let Some(align) = s.text_align {
            text.text_align = align;
        }
        if let Some(color) = s.color {
            text.color = color;
        }
        if let Some(decoration) = s.text_decoration {
            text.text_decoration = decoration;
        }
        if let Some(transform) = s.text_transform {
            text.text_transform = transform;
        }
        if let Some(spacing) = s.letter_spacing {
            text.letter_spacing = spacing;
        }

        let box_model = &mut self.box_model;
        if let Some(margin) = s.margin {
            box_model.margin = margin;
        }
        if let Some(padding) = s.padding {
            box_model.padding = padding;
        }
        box_model.width = s.width.or(box_model.width);
        box_model.height = s.height.or(box_model.height);
        if let Some(min_height) = s.min_height {
            box_model.min_height = min_height;
        }

        let border = &mut self.border;
        if let Some(all) = &s.border {
            border.top = Some(all.clone());
            border.right = Some(all.clone());
            border.bottom = Some(all.clone());
            border.left = Some(all.clone());
        }
        for (side, value) in [
            (&mut border.top, &s.border_top),
            (&mut border.right, &s.border_right),
            (&mut border.bottom, &s.border_bottom),
            (&mut border.left, &s.border_left),
        ] {
            if value.is_some() {
                *side = value.clone();
            }
        }
        if let Some(radius) = s.border_radius {
            border.radius = radius;
        }

        let flex = &mut self.flex;
        if let Some(direction) = s.flex_direction {
            flex.direction = direction;
        }
        if let Some(wrap) = s.flex_wrap {
            flex.wrap = wrap;
        }
        if let Some(justify) = s.justify_content {
            flex.justify_content = justify;
        }
        if let Some(align) = s.align_items {
            flex.align_items = align;
        }
        if let Some(gap) = s.row_gap {
            flex.row_gap = gap;
        }
        if let Some(gap) = s.column_gap {
            flex.column_gap = gap;
        }
        if let Some(grow) = s.flex_grow {
            flex.grow = grow;
        }
        if let Some(shrink) = s.flex_shrink {
            flex.shrink = shrink;
        }

        if let Some(color) = s.background_color {
            self.misc.background_color = Some(color);
        }
        if let Some(break_inside) = s.break_inside {
            self.misc.break_inside = break_inside;
        }
    }

    /// Absolute line height in points.
    pub fn line_height(&self) -> f32 {
        self.text.font_size * self.text.line_height
    }

    pub fn border_top_width(&self) -> f32 {
        self.border.top.as_ref().map_or(0.0, Border::effective_width)
    }

    pub fn border_right_width(&self) -> f32 {
        self.border.right.as_ref().map_or(0.0, Border::effective_width)
    }

    pub fn border_bottom_width(&self) -> f32 {
        self.border.bottom.as_ref().map_or(0.0, Border::effective_width)
    }

    pub fn border_left_width(&self) -> f32 {
        self.border.left.as_ref().map_or(0.0, Border::effective_width)
    }

    /// Border plus padding on the left edge.
    pub fn inset_left(&self) -> f32 {
        self.border_left_width() + self.box_model.padding.left
    }

    pub fn inset_right(&self) -> f32 {
        self.border_right_width() + self.box_model.padding.right
    }

    pub fn inset_top(&self) -> f32 {
        self.border_top_width() + self.box_model.padding.top
    }

    pub fn inset_bottom(&self) -> f32 {
        self.border_bottom_width() + self.box_model.padding.bottom
    }

    pub fn horizontal_insets(&self) -> f32 {
        self.inset_left() + self.inset_right()
    }

    pub fn vertical_insets(&self) -> f32 {
        self.inset_top() + self.inset_bottom()
    }

    pub fn has_box_decoration(&self) -> bool {
        self.misc.background_color.is_some()
            || self.border_top_width() > 0.0
            || self.border_right_width() > 0.0
            || self.border_bottom_width() > 0.0
            || self.border_left_width() > 0.0
    }

    pub fn keeps_together(&self) -> bool {
        self.misc.break_inside == BreakInside::Avoid
    }

    /// The definite border-box width for this node inside a container of `container_width`.
    pub fn definite_width(&self, container_width: f32) -> Option<f32> {
        self.box_model.width.and_then(|w| w.resolve(container_width))
    }

    pub fn definite_height(&self) -> Option<f32> {
        self.box_model.height.and_then(|h| h.resolve(f32::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_properties_inherit_box_properties_do_not() {
        let parent_decl = ElementStyle {
            font_size: Some(14.0),
            color: Some(Color::rgb(1, 2, 3)),
            padding: Some(Margins::all(8.0)),
            ..Default::default()
        };
        let parent = ComputedStyle::compute(&ComputedStyle::default(), &[Arc::new(parent_decl)], None);
        let child = ComputedStyle::compute(&parent, &[], None);

        assert_eq!(child.text.font_size, 14.0);
        assert_eq!(child.text.color, Color::rgb(1, 2, 3));
        assert_eq!(child.box_model.padding, Margins::ZERO);
    }

    #[test]
    fn side_border_overrides_shorthand() {
        let decl = ElementStyle {
            border: Some(Border::solid(1.0, Color::BLACK)),
            border_top: Some(Border::solid(3.0, Color::WHITE)),
            ..Default::default()
        };
        let style = ComputedStyle::compute(&ComputedStyle::default(), &[Arc::new(decl)], None);
        assert_eq!(style.border_top_width(), 3.0);
        assert_eq!(style.border_left_width(), 1.0);
        assert!(style.has_box_decoration());
    }

    #[test]
    fn override_wins_over_style_sets() {
        let set = Arc::new(ElementStyle {
            font_size: Some(9.0),
            ..Default::default()
        });
        let over = ElementStyle {
            font_size: Some(12.0),
            ..Default::default()
        };
        let style = ComputedStyle::compute(&ComputedStyle::default(), &[set], Some(&over));
        assert_eq!(style.text.font_size, 12.0);
        assert!((style.line_height() - 12.0 * 1.4).abs() < 1e-4);
    }
}
