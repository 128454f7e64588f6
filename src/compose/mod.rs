//! Document composers: pure functions from the document model to a layout tree.
//!
//! The small widget functions below are shared by both composers; each
//! returns a finished [`IRNode`].

mod cover_letter;
mod cv;

pub use cover_letter::{compose_cover_letter, LetterOptions};
pub use cv::{compose_cv, status_date, CvOptions, ALL_PROJECTS_URL};

use crate::icons::{icon_link, IconKind};
use crate::model::{InvalidPayloadError, SocialLink};
use dossier_idf::{IRNode, InlineMetadata, InlineNode, NodeMetadata};
use dossier_style::ElementStyle;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    InvalidPayload(#[from] InvalidPayloadError),
}

pub(crate) fn paragraph(style: &Arc<ElementStyle>, text: impl Into<String>) -> IRNode {
    IRNode::Paragraph {
        meta: NodeMetadata::styled(style),
        children: vec![InlineNode::text(text)],
    }
}

pub(crate) fn heading(style: &Arc<ElementStyle>, text: impl Into<String>) -> IRNode {
    IRNode::Heading {
        meta: NodeMetadata::styled(style),
        level: 2,
        children: vec![InlineNode::text(text)],
    }
}

pub(crate) fn block(meta: NodeMetadata, children: Vec<IRNode>) -> IRNode {
    IRNode::Block { meta, children }
}

pub(crate) fn flex(meta: NodeMetadata, children: Vec<IRNode>) -> IRNode {
    IRNode::FlexContainer { meta, children }
}

/// Inline text that links to `href`.
pub(crate) fn hyperlink(href: &str, text: impl Into<String>) -> InlineNode {
    InlineNode::Hyperlink {
        meta: InlineMetadata::default(),
        href: href.to_string(),
        children: vec![InlineNode::text(text)],
    }
}

/// Inline text in its own style, e.g. a bold label inside a sentence.
pub(crate) fn span(style: &Arc<ElementStyle>, text: impl Into<String>) -> InlineNode {
    InlineNode::StyledSpan {
        meta: InlineMetadata::styled(style),
        children: vec![InlineNode::text(text)],
    }
}

/// `a, b, c` from the non-blank entries.
pub(crate) fn comma_joined(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `example.com/path` for display, without scheme and trailing slash.
pub(crate) fn display_url(url: &str) -> &str {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.trim_end_matches('/')
}

/// Styles used by the contact row of either document kind.
pub(crate) struct ContactStyles<'a> {
    pub row: &'a Arc<ElementStyle>,
    pub item: &'a Arc<ElementStyle>,
    pub link: &'a Arc<ElementStyle>,
    pub icon_size: f32,
}

/// Links shown after the plain contact items.
pub(crate) struct ContactLinks<'a> {
    pub website: Option<&'a str>,
    pub linktree: Option<&'a str>,
    pub socials: &'a [SocialLink],
}

/// A link entry: optional icon link, then the label as linked text.
fn contact_link(styles: &ContactStyles<'_>, kind: IconKind, href: &str, label: &str) -> IRNode {
    let mut children = Vec::with_capacity(2);
    if let Some(icon) = kind.icon() {
        children.push(icon_link(icon, href, styles.icon_size));
    }
    children.push(IRNode::Paragraph {
        meta: NodeMetadata::styled(styles.item),
        children: vec![hyperlink(href, label)],
    });
    flex(NodeMetadata::styled(styles.link), children)
}

/// Horizontal, wrapping row of contact details. Blank items are skipped.
pub(crate) fn contact_row(styles: &ContactStyles<'_>, texts: &[&str], links: &ContactLinks<'_>) -> IRNode {
    let mut children: Vec<IRNode> = texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| paragraph(styles.item, t))
        .collect();

    if let Some(website) = links.website {
        children.push(contact_link(styles, IconKind::Globe, website, display_url(website)));
    }
    if let Some(linktree) = links.linktree {
        children.push(contact_link(styles, IconKind::Linktree, linktree, "Linktree"));
    }
    for social in links.socials {
        let (label, url) = (social.label.trim(), social.url.trim());
        if url.is_empty() {
            continue;
        }
        let label = if label.is_empty() { display_url(url) } else { label };
        children.push(contact_link(styles, IconKind::classify(label), url, label));
    }

    flex(NodeMetadata::styled(styles.row).with_id("contact-row"), children)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{cv_theme, CONTACT_ICON_SIZE};
    use test_helpers::count_kind;

    fn styles() -> ContactStyles<'static> {
        let theme = cv_theme();
        ContactStyles {
            row: &theme.contact_row,
            item: &theme.contact_item,
            link: &theme.contact_link,
            icon_size: CONTACT_ICON_SIZE,
        }
    }

    #[test]
    fn unknown_socials_keep_text_but_have_no_icons() {
        let socials = vec![SocialLink { label: "Mastodon".into(), url: "https://social.example/@j".into() }];
        let links = ContactLinks { website: None, linktree: None, socials: &socials };
        let row = contact_row(&styles(), &["j@x.com", "+1", "Berlin"], &links);

        assert_eq!(count_kind(&row, "vector"), 0);
        let text = row.text_content();
        for expected in ["j@x.com", "+1", "Berlin", "Mastodon"] {
            assert!(text.contains(expected), "missing {} in {}", expected, text);
        }
    }

    #[test]
    fn known_links_get_icons() {
        let socials = vec![
            SocialLink { label: "LinkedIn".into(), url: "https://linkedin.com/in/j".into() },
            SocialLink { label: "".into(), url: " ".into() },
        ];
        let links = ContactLinks {
            website: Some("https://www.example.com/"),
            linktree: Some("https://linktr.ee/j"),
            socials: &socials,
        };
        let row = contact_row(&styles(), &["", "j@x.com"], &links);
        assert_eq!(count_kind(&row, "vector"), 3);
        assert_eq!(count_kind(&row, "link"), 3);
        assert!(row.text_content().contains("example.com"));
        assert_eq!(row.children().len(), 4);
    }

    #[test]
    fn display_url_strips_scheme() {
        assert_eq!(display_url("https://www.example.com/"), "example.com");
        assert_eq!(display_url("http://a.b/c"), "a.b/c");
        assert_eq!(display_url("plain"), "plain");
    }

    #[test]
    fn comma_join_skips_blank_entries() {
        let items = vec!["English".to_string(), " ".to_string(), "German ".to_string()];
        assert_eq!(comma_joined(&items), "English, German");
    }
}
