use super::{divider, muted, row, semibold, text, token, wrapping_row, ACCENT, BORDER, MUTED, TEXT};
use dossier_style::{
    Border, BreakInside, Dimension, ElementStyle, JustifyContent, Margins, PageLayout, PageSize,
    TextTransform, AlignItems,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub struct CvTheme {
    pub page_layout: PageLayout,
    pub page: Arc<ElementStyle>,
    pub header: Arc<ElementStyle>,
    pub header_main: Arc<ElementStyle>,
    pub name: Arc<ElementStyle>,
    pub title: Arc<ElementStyle>,
    pub contact_row: Arc<ElementStyle>,
    pub contact_item: Arc<ElementStyle>,
    pub contact_link: Arc<ElementStyle>,
    pub portrait: Arc<ElementStyle>,
    pub section: Arc<ElementStyle>,
    pub section_title: Arc<ElementStyle>,
    pub body: Arc<ElementStyle>,
    pub muted: Arc<ElementStyle>,
    pub entry: Arc<ElementStyle>,
    pub company: Arc<ElementStyle>,
    pub role: Arc<ElementStyle>,
    pub meta_row: Arc<ElementStyle>,
    pub bullet_row: Arc<ElementStyle>,
    pub bullet_marker: Arc<ElementStyle>,
    pub bullet_content: Arc<ElementStyle>,
    pub skills_row: Arc<ElementStyle>,
    pub skill_label: Arc<ElementStyle>,
    pub title_row: Arc<ElementStyle>,
    pub all_projects_link: Arc<ElementStyle>,
    pub card_grid: Arc<ElementStyle>,
    pub card: Arc<ElementStyle>,
    pub card_thumbnail: Arc<ElementStyle>,
    pub card_title: Arc<ElementStyle>,
    pub divider: Arc<ElementStyle>,
    pub footer: Arc<ElementStyle>,
}

impl CvTheme {
    fn new() -> Self {
        Self {
            page_layout: PageLayout {
                size: PageSize::A4,
                margins: Margins::new(36.0, 40.0, 36.0, 40.0),
            },
            page: token(ElementStyle {
                color: Some(TEXT),
                line_height: Some(1.35),
                ..text(10.0)
            }),
            header: token(ElementStyle {
                justify_content: Some(JustifyContent::SpaceBetween),
                align_items: Some(AlignItems::FlexStart),
                margin: Some(Margins::bottom(10.0)),
                ..row(16.0)
            }),
            header_main: token(ElementStyle {
                flex_grow: Some(1.0),
                flex_shrink: Some(1.0),
                ..ElementStyle::default()
            }),
            name: token(ElementStyle {
                line_height: Some(1.15),
                ..semibold(22.0)
            }),
            title: token(ElementStyle {
                color: Some(ACCENT),
                margin: Some(Margins::top(2.0)),
                ..text(12.0)
            }),
            contact_row: token(ElementStyle {
                margin: Some(Margins::top(8.0)),
                ..wrapping_row(12.0, 4.0)
            }),
            contact_item: token(muted(9.0)),
            contact_link: token(row(3.0)),
            portrait: token(ElementStyle {
                width: Some(Dimension::Pt(76.0)),
                height: Some(Dimension::Pt(76.0)),
                border_radius: Some(38.0),
                ..ElementStyle::default()
            }),
            section: token(ElementStyle {
                margin: Some(Margins::top(14.0)),
                ..ElementStyle::default()
            }),
            section_title: token(ElementStyle {
                text_transform: Some(TextTransform::Uppercase),
                letter_spacing: Some(1.2),
                color: Some(MUTED),
                margin: Some(Margins::bottom(6.0)),
                ..semibold(9.0)
            }),
            body: token(text(10.0)),
            muted: token(muted(9.0)),
            entry: token(ElementStyle {
                margin: Some(Margins::bottom(10.0)),
                break_inside: Some(BreakInside::Avoid),
                ..ElementStyle::default()
            }),
            company: token(semibold(12.0)),
            role: token(text(10.0)),
            meta_row: token(ElementStyle {
                margin: Some(Margins::y(2.0)),
                ..row(4.0)
            }),
            bullet_row: token(ElementStyle {
                align_items: Some(AlignItems::FlexStart),
                margin: Some(Margins::top(3.0)),
                ..row(0.0)
            }),
            bullet_marker: token(ElementStyle {
                width: Some(Dimension::Pt(10.0)),
                flex_shrink: Some(0.0),
                color: Some(ACCENT),
                ..text(10.0)
            }),
            bullet_content: token(ElementStyle {
                flex_grow: Some(1.0),
                flex_shrink: Some(1.0),
                ..text(10.0)
            }),
            skills_row: token(wrapping_row(14.0, 4.0)),
            skill_label: token(semibold(10.0)),
            title_row: token(ElementStyle {
                justify_content: Some(JustifyContent::SpaceBetween),
                ..row(8.0)
            }),
            all_projects_link: token(ElementStyle {
                color: Some(ACCENT),
                ..text(9.0)
            }),
            card_grid: token(ElementStyle {
                justify_content: Some(JustifyContent::SpaceBetween),
                align_items: Some(AlignItems::Stretch),
                ..wrapping_row(12.0, 10.0)
            }),
            card: token(ElementStyle {
                width: Some(Dimension::Percent(48.0)),
                border: Some(Border::solid(1.0, BORDER)),
                border_radius: Some(6.0),
                padding: Some(Margins::all(10.0)),
                break_inside: Some(BreakInside::Avoid),
                ..ElementStyle::default()
            }),
            card_thumbnail: token(ElementStyle {
                width: Some(Dimension::Percent(100.0)),
                border_radius: Some(4.0),
                margin: Some(Margins::bottom(6.0)),
                ..ElementStyle::default()
            }),
            card_title: token(semibold(11.0)),
            divider: token(divider(10.0)),
            footer: token(ElementStyle {
                border_top: Some(Border::solid(1.0, BORDER)),
                padding: Some(Margins::top(6.0)),
                margin: Some(Margins::top(18.0)),
                ..muted(8.0)
            }),
        }
    }

    /// Every token, for checks over the whole set.
    pub fn all(&self) -> Vec<&Arc<ElementStyle>> {
        vec![
            &self.page, &self.header, &self.header_main, &self.name, &self.title, &self.contact_row,
            &self.contact_item, &self.contact_link, &self.portrait, &self.section, &self.section_title,
            &self.body, &self.muted, &self.entry, &self.company, &self.role, &self.meta_row,
            &self.bullet_row, &self.bullet_marker, &self.bullet_content, &self.skills_row,
            &self.skill_label, &self.title_row, &self.all_projects_link, &self.card_grid, &self.card,
            &self.card_thumbnail, &self.card_title, &self.divider, &self.footer,
        ]
    }
}

static CV_THEME: Lazy<CvTheme> = Lazy::new(CvTheme::new);

pub fn cv_theme() -> &'static CvTheme {
    &CV_THEME
}
