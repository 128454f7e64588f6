use crate::elements::RectElement;
use crate::style::ComputedStyle;
use crate::{LayoutElement, PositionedElement};
use dossier_style::border::Border;
use dossier_types::geometry::Rect;
use dossier_types::Color;

/// Generates background and border elements for a box occupying `bounds`
/// (absolute page coordinates, border box).
///
/// A box split across pages omits the top edge on its continuation and the
/// bottom edge before the break. Rounded boxes with one uniform border (or
/// none) become a single rounded rectangle; everything else is drawn as a
/// background plus one filled rectangle per edge.
pub fn create_background_and_borders(
    bounds: Rect,
    style: &ComputedStyle,
    draw_top: bool,
    draw_bottom: bool,
) -> Vec<PositionedElement> {
    let mut elements = Vec::new();
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return elements;
    }

    if style.border.radius > 0.0 && draw_top && draw_bottom {
        if let Some(stroke) = uniform_border(style) {
            if style.misc.background_color.is_some() || stroke.is_some() {
                elements.push(PositionedElement::new(
                    bounds,
                    LayoutElement::Rectangle(RectElement {
                        fill: style.misc.background_color,
                        stroke,
                        corner_radius: style.border.radius,
                    }),
                ));
            }
            return elements;
        }
    }

    let border_top = if draw_top { style.border_top_width() } else { 0.0 };
    let border_bottom = if draw_bottom { style.border_bottom_width() } else { 0.0 };
    let border_left = style.border_left_width();
    let border_right = style.border_right_width();

    // 1. Draw Background
    if let Some(color) = style.misc.background_color {
        let bg_rect = Rect::new(
            bounds.x + border_left,
            bounds.y + border_top,
            bounds.width - border_left - border_right,
            bounds.height - border_top - border_bottom,
        );
        if !bg_rect.is_empty() {
            elements.push(filled(bg_rect, color));
        }
    }

    // 2. Draw Borders
    let mut draw_border = |border: &Option<Border>, rect: Rect| {
        if let Some(border) = border {
            if border.effective_width() > 0.0 && !rect.is_empty() {
                elements.push(filled(rect, border.color));
            }
        }
    };

    if draw_top {
        draw_border(
            &style.border.top,
            Rect::new(bounds.x, bounds.y, bounds.width, border_top),
        );
    }
    if draw_bottom {
        draw_border(
            &style.border.bottom,
            Rect::new(bounds.x, bounds.bottom() - border_bottom, bounds.width, border_bottom),
        );
    }
    draw_border(
        &style.border.left,
        Rect::new(bounds.x, bounds.y, border_left, bounds.height),
    );
    draw_border(
        &style.border.right,
        Rect::new(bounds.right() - border_right, bounds.y, border_right, bounds.height),
    );

    elements
}

fn filled(rect: Rect, color: Color) -> PositionedElement {
    PositionedElement::new(
        rect,
        LayoutElement::Rectangle(RectElement {
            fill: Some(color),
            stroke: None,
            corner_radius: 0.0,
        }),
    )
}

/// `Some(stroke)` when all four edges agree; the inner `None` means no border at all.
fn uniform_border(style: &ComputedStyle) -> Option<Option<(f32, Color)>> {
    let edges = [&style.border.top, &style.border.right, &style.border.bottom, &style.border.left];
    let visible: Vec<&Border> = edges
        .iter()
        .filter_map(|edge| edge.as_ref())
        .filter(|border| border.effective_width() > 0.0)
        .collect();

    match visible.first() {
        None => Some(None),
        Some(first) if visible.len() == 4 && visible.iter().all(|b| b.width == first.width && b.color == first.color) => {
            Some(Some((first.width, first.color)))
        }
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_of(el: &PositionedElement) -> &RectElement {
        match &el.element {
            LayoutElement::Rectangle(r) => r,
            other => panic!("expected rectangle, got {:?}", other),
        }
    }

    #[test]
    fn rounded_uniform_border_is_one_element() {
        let mut style = ComputedStyle::default();
        let border = Some(Border::solid(1.0, Color::rgb(229, 231, 235)));
        style.border.top = border.clone();
        style.border.right = border.clone();
        style.border.bottom = border.clone();
        style.border.left = border;
        style.border.radius = 6.0;
        style.misc.background_color = Some(Color::WHITE);

        let elements = create_background_and_borders(Rect::new(0.0, 0.0, 100.0, 50.0), &style, true, true);
        assert_eq!(elements.len(), 1);
        let rect = rect_of(&elements[0]);
        assert_eq!(rect.corner_radius, 6.0);
        assert_eq!(rect.stroke, Some((1.0, Color::rgb(229, 231, 235))));
        assert_eq!(rect.fill, Some(Color::WHITE));
    }

    #[test]
    fn split_box_omits_bottom_edge() {
        let mut style = ComputedStyle::default();
        style.border.bottom = Some(Border::solid(2.0, Color::BLACK));
        style.border.left = Some(Border::solid(3.0, Color::BLACK));

        let elements = create_background_and_borders(Rect::new(10.0, 10.0, 100.0, 50.0), &style, true, false);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].rect(), Rect::new(10.0, 10.0, 3.0, 50.0));
    }

    #[test]
    fn plain_box_paints_nothing() {
        let style = ComputedStyle::default();
        assert!(create_background_and_borders(Rect::new(0.0, 0.0, 10.0, 10.0), &style, true, true).is_empty());
    }
}
