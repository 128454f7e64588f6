//! Mapping of computed styles onto `taffy` flexbox styles.
//!
//! Flex containers hand their items to taffy as measured leaves. Padding and
//! borders stay with the render nodes: an item's measure function already
//! reports its border box, and the container lays out its content box.

use crate::style::ComputedStyle;
use dossier_style::dimension::{Dimension, Margins};
use dossier_style::flex::{AlignItems, FlexDirection, FlexWrap, JustifyContent};
use taffy::style::{LengthPercentage, LengthPercentageAuto};

/// Style of a flex item leaf: size, margins and grow/shrink factors.
pub fn item_style_to_taffy(style: &ComputedStyle) -> taffy::style::Style {
    taffy::style::Style {
        display: taffy::style::Display::Flex,
        box_sizing: taffy::style::BoxSizing::BorderBox,
        size: taffy::geometry::Size {
            width: to_taffy_dimension(style.box_model.width),
            height: to_taffy_dimension(style.box_model.height),
        },
        min_size: taffy::geometry::Size {
            width: taffy::style::Dimension::auto(),
            height: taffy::style::Dimension::length(style.box_model.min_height),
        },
        margin: to_taffy_margin(&style.box_model.margin),
        flex_grow: style.flex.grow,
        flex_shrink: style.flex.shrink,
        flex_basis: taffy::style::Dimension::auto(),
        ..Default::default()
    }
}

/// Style of the container root, sized to the content box it lays out into.
/// `None` leaves the width to the items (intrinsic sizing).
pub fn container_style_to_taffy(style: &ComputedStyle, content_width: Option<f32>) -> taffy::style::Style {
    taffy::style::Style {
        display: taffy::style::Display::Flex,
        box_sizing: taffy::style::BoxSizing::BorderBox,
        size: taffy::geometry::Size {
            width: content_width.map_or(taffy::style::Dimension::auto(), taffy::style::Dimension::length),
            height: taffy::style::Dimension::auto(),
        },
        gap: taffy::geometry::Size {
            width: LengthPercentage::length(style.flex.column_gap),
            height: LengthPercentage::length(style.flex.row_gap),
        },
        align_items: Some(to_taffy_align_items(style.flex.align_items)),
        justify_content: Some(to_taffy_justify_content(style.flex.justify_content)),
        flex_direction: to_taffy_flex_direction(style.flex.direction),
        flex_wrap: to_taffy_flex_wrap(style.flex.wrap),
        ..Default::default()
    }
}

pub fn to_taffy_dimension(d: Option<Dimension>) -> taffy::style::Dimension {
    match d {
        Some(Dimension::Pt(v)) => taffy::style::Dimension::length(v),
        Some(Dimension::Percent(v)) => taffy::style::Dimension::percent(v / 100.0),
        Some(Dimension::Auto) | None => taffy::style::Dimension::auto(),
    }
}

pub fn to_taffy_margin(m: &Margins) -> taffy::geometry::Rect<LengthPercentageAuto> {
    taffy::geometry::Rect {
        left: LengthPercentageAuto::length(m.left),
        right: LengthPercentageAuto::length(m.right),
        top: LengthPercentageAuto::length(m.top),
        bottom: LengthPercentageAuto::length(m.bottom),
    }
}

pub fn to_taffy_align_items(a: AlignItems) -> taffy::style::AlignItems {
    match a {
        AlignItems::Stretch => taffy::style::AlignItems::Stretch,
        AlignItems::FlexStart => taffy::style::AlignItems::FlexStart,
        AlignItems::FlexEnd => taffy::style::AlignItems::FlexEnd,
        AlignItems::Center => taffy::style::AlignItems::Center,
    }
}

pub fn to_taffy_justify_content(j: JustifyContent) -> taffy::style::JustifyContent {
    match j {
        JustifyContent::FlexStart => taffy::style::JustifyContent::FlexStart,
        JustifyContent::FlexEnd => taffy::style::JustifyContent::FlexEnd,
        JustifyContent::Center => taffy::style::JustifyContent::Center,
        JustifyContent::SpaceBetween => taffy::style::JustifyContent::SpaceBetween,
    }
}

pub fn to_taffy_flex_direction(f: FlexDirection) -> taffy::style::FlexDirection {
    match f {
        FlexDirection::Row => taffy::style::FlexDirection::Row,
        FlexDirection::Column => taffy::style::FlexDirection::Column,
    }
}

pub fn to_taffy_flex_wrap(f: FlexWrap) -> taffy::style::FlexWrap {
    match f {
        FlexWrap::NoWrap => taffy::style::FlexWrap::NoWrap,
        FlexWrap::Wrap => taffy::style::FlexWrap::Wrap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_widths_become_fractions() {
        assert_eq!(
            to_taffy_dimension(Some(Dimension::Percent(48.0))),
            taffy::style::Dimension::percent(0.48)
        );
        assert_eq!(to_taffy_dimension(Some(Dimension::Pt(12.0))), taffy::style::Dimension::length(12.0));
        assert_eq!(to_taffy_dimension(None), taffy::style::Dimension::auto());
    }

    #[test]
    fn items_carry_margins_and_factors() {
        let mut style = ComputedStyle::default();
        style.box_model.margin = Margins {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        style.flex.grow = 1.0;
        style.flex.shrink = 0.0;

        let item = item_style_to_taffy(&style);
        assert_eq!(item.margin.left, LengthPercentageAuto::length(4.0));
        assert_eq!(item.margin.bottom, LengthPercentageAuto::length(3.0));
        assert_eq!(item.flex_grow, 1.0);
        assert_eq!(item.flex_shrink, 0.0);
    }

    #[test]
    fn container_uses_gaps_and_alignment() {
        let mut style = ComputedStyle::default();
        style.flex.column_gap = 8.0;
        style.flex.row_gap = 4.0;
        style.flex.wrap = FlexWrap::Wrap;
        style.flex.justify_content = JustifyContent::SpaceBetween;

        let root = container_style_to_taffy(&style, Some(300.0));
        assert_eq!(root.size.width, taffy::style::Dimension::length(300.0));
        assert_eq!(root.gap.width, LengthPercentage::length(8.0));
        assert_eq!(root.gap.height, LengthPercentage::length(4.0));
        assert_eq!(root.flex_wrap, taffy::style::FlexWrap::Wrap);
        assert_eq!(root.justify_content, Some(taffy::style::JustifyContent::SpaceBetween));
        assert_eq!(container_style_to_taffy(&style, None).size.width, taffy::style::Dimension::auto());
    }
}
