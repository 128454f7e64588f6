//! Fixed style tokens for both document kinds.
//!
//! Every token is an `Arc<ElementStyle>` built once per process; composers
//! attach them to nodes by reference.

mod cv;
mod letter;

pub use cv::{cv_theme, CvTheme};
pub use letter::{letter_theme, LetterTheme};

use dossier_style::{Border, ElementStyle, FontWeight, Margins};
use dossier_types::Color;
use std::sync::Arc;

pub const ACCENT: Color = Color::from_u32(0x2563EB);
pub const TEXT: Color = Color::from_u32(0x111827);
pub const MUTED: Color = Color::from_u32(0x6B7280);
pub const BORDER: Color = Color::from_u32(0xE5E7EB);

/// Edge length of inline link icons, in points.
pub const LINK_ICON_SIZE: f32 = 9.0;
/// Edge length of contact row icons, in points.
pub const CONTACT_ICON_SIZE: f32 = 10.0;

pub(crate) fn token(style: ElementStyle) -> Arc<ElementStyle> {
    Arc::new(style)
}

pub(crate) fn text(size: f32) -> ElementStyle {
    ElementStyle {
        font_size: Some(size),
        ..ElementStyle::default()
    }
}

pub(crate) fn semibold(size: f32) -> ElementStyle {
    ElementStyle {
        font_weight: Some(FontWeight::SemiBold),
        ..text(size)
    }
}

pub(crate) fn muted(size: f32) -> ElementStyle {
    ElementStyle {
        color: Some(MUTED),
        ..text(size)
    }
}

pub(crate) fn row(gap: f32) -> ElementStyle {
    ElementStyle {
        flex_direction: Some(dossier_style::FlexDirection::Row),
        align_items: Some(dossier_style::AlignItems::Center),
        ..ElementStyle::default()
    }
    .with_gap(gap)
}

pub(crate) fn wrapping_row(column_gap: f32, row_gap: f32) -> ElementStyle {
    ElementStyle {
        flex_wrap: Some(dossier_style::FlexWrap::Wrap),
        row_gap: Some(row_gap),
        column_gap: Some(column_gap),
        ..row(0.0)
    }
}

/// Full-width 1pt rule with vertical margin.
pub(crate) fn divider(margin: f32) -> ElementStyle {
    ElementStyle {
        border_top: Some(Border::solid(1.0, BORDER)),
        margin: Some(Margins::y(margin)),
        ..ElementStyle::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_hex_values() {
        assert_eq!((ACCENT.r, ACCENT.g, ACCENT.b), (0x25, 0x63, 0xEB));
        assert_eq!((TEXT.r, TEXT.g, TEXT.b), (0x11, 0x18, 0x27));
        assert_eq!((MUTED.r, MUTED.g, MUTED.b), (0x6B, 0x72, 0x80));
        assert_eq!((BORDER.r, BORDER.g, BORDER.b), (0xE5, 0xE7, 0xEB));
    }

    #[test]
    fn font_sizes_stay_in_range() {
        let cv = cv_theme();
        let letter = letter_theme();
        for style in cv.all().into_iter().chain(letter.all()) {
            if let Some(size) = style.font_size {
                assert!((8.0..=22.0).contains(&size), "font size {} out of range", size);
            }
        }
    }

    #[test]
    fn tokens_are_built_once() {
        assert!(Arc::ptr_eq(&cv_theme().name, &cv_theme().name));
        assert!(Arc::ptr_eq(&letter_theme().body, &letter_theme().body));
    }
}
