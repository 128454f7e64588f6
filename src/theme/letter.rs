use super::{divider, muted, row, semibold, text, token, wrapping_row, MUTED, TEXT};
use dossier_style::{
    AlignItems, BreakInside, Dimension, ElementStyle, JustifyContent, Margins, PageLayout, PageSize,
    TextAlign,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub struct LetterTheme {
    pub page_layout: PageLayout,
    pub page: Arc<ElementStyle>,
    pub header: Arc<ElementStyle>,
    pub header_main: Arc<ElementStyle>,
    pub name: Arc<ElementStyle>,
    pub address: Arc<ElementStyle>,
    pub contact_row: Arc<ElementStyle>,
    pub contact_item: Arc<ElementStyle>,
    pub contact_link: Arc<ElementStyle>,
    pub date: Arc<ElementStyle>,
    pub divider: Arc<ElementStyle>,
    pub recipient: Arc<ElementStyle>,
    pub recipient_company: Arc<ElementStyle>,
    pub recipient_line: Arc<ElementStyle>,
    pub subject_row: Arc<ElementStyle>,
    pub subject: Arc<ElementStyle>,
    pub secondary_subject: Arc<ElementStyle>,
    pub body: Arc<ElementStyle>,
    pub closing: Arc<ElementStyle>,
    pub signature: Arc<ElementStyle>,
    pub signature_name: Arc<ElementStyle>,
}

impl LetterTheme {
    fn new() -> Self {
        Self {
            page_layout: PageLayout {
                size: PageSize::A4,
                margins: Margins::new(56.0, 60.0, 48.0, 60.0),
            },
            page: token(ElementStyle {
                color: Some(TEXT),
                line_height: Some(1.45),
                ..text(10.5)
            }),
            header: token(ElementStyle {
                justify_content: Some(JustifyContent::SpaceBetween),
                align_items: Some(AlignItems::FlexStart),
                ..row(16.0)
            }),
            header_main: token(ElementStyle {
                flex_grow: Some(1.0),
                flex_shrink: Some(1.0),
                ..ElementStyle::default()
            }),
            name: token(semibold(18.0)),
            address: token(muted(9.0)),
            contact_row: token(ElementStyle {
                margin: Some(Margins::top(6.0)),
                ..wrapping_row(10.0, 4.0)
            }),
            contact_item: token(muted(9.0)),
            contact_link: token(row(3.0)),
            date: token(ElementStyle {
                text_align: Some(TextAlign::Right),
                flex_shrink: Some(0.0),
                ..muted(10.0)
            }),
            divider: token(divider(14.0)),
            recipient: token(ElementStyle {
                margin: Some(Margins::bottom(22.0)),
                ..ElementStyle::default()
            }),
            recipient_company: token(semibold(10.5)),
            recipient_line: token(text(10.5)),
            subject_row: token(ElementStyle {
                break_inside: Some(BreakInside::Avoid),
                margin: Some(Margins::bottom(4.0)),
                ..row(6.0)
            }),
            subject: token(semibold(12.0)),
            secondary_subject: token(ElementStyle {
                color: Some(MUTED),
                ..text(10.0)
            }),
            body: token(ElementStyle {
                margin: Some(Margins::bottom(10.0)),
                ..text(10.5)
            }),
            closing: token(ElementStyle {
                margin: Some(Margins::top(14.0)),
                break_inside: Some(BreakInside::Avoid),
                ..ElementStyle::default()
            }),
            signature: token(ElementStyle {
                height: Some(Dimension::Pt(42.0)),
                margin: Some(Margins::y(6.0)),
                ..ElementStyle::default()
            }),
            signature_name: token(semibold(10.5)),
        }
    }

    pub fn all(&self) -> Vec<&Arc<ElementStyle>> {
        vec![
            &self.page, &self.header, &self.header_main, &self.name, &self.address, &self.contact_row,
            &self.contact_item, &self.contact_link, &self.date, &self.divider, &self.recipient,
            &self.recipient_company, &self.recipient_line, &self.subject_row, &self.subject,
            &self.secondary_subject, &self.body, &self.closing, &self.signature, &self.signature_name,
        ]
    }
}

static LETTER_THEME: Lazy<LetterTheme> = Lazy::new(LetterTheme::new);

pub fn letter_theme() -> &'static LetterTheme {
    &LETTER_THEME
}
