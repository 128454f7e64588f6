//! Static table of vector icons drawn inline as filled paths.
//!
//! All icons share a 24x24 coordinate system and are tinted with the color
//! of the node they are placed in.

use dossier_idf::{IRNode, NodeMetadata, VectorGlyph};
use dossier_style::{Dimension, ElementStyle};
use dossier_types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconData {
    pub view_box: &'static str,
    pub paths: &'static [&'static str],
}

const VIEW_BOX: &str = "0 0 24 24";

static LINKTREE: IconData = IconData {
    view_box: VIEW_BOX,
    paths: &[
        "M12 2 7 7l1.7 1.7 2.1-2.1V12h2.4V6.6l2.1 2.1L17 7z",
        "M3 10.8h5.2v2.4H3zm12.8 0H21v2.4h-5.2z",
        "M10.8 14h2.4v8h-2.4z",
    ],
};

static LINKEDIN: IconData = IconData {
    view_box: VIEW_BOX,
    paths: &[
        "M4 9h3.6v11H4z",
        "M5.8 3.2a2 2 0 1 1 0 4a2 2 0 1 1 0-4z",
        "M9.8 9h3.4v1.6c.6-1 1.9-1.9 3.7-1.9 2.8 0 3.7 1.8 3.7 4.8V20H17v-5.8c0-1.5-.4-2.5-1.8-2.5s-2 1-2 2.5V20H9.8z",
    ],
};

static GITHUB: IconData = IconData {
    view_box: VIEW_BOX,
    paths: &[
        "M8.6 17.6 3 12l5.6-5.6 1.7 1.7L6.4 12l3.9 3.9z",
        "M15.4 17.6 21 12l-5.6-5.6-1.7 1.7 3.9 3.9-3.9 3.9z",
    ],
};

static EXTERNAL: IconData = IconData {
    view_box: VIEW_BOX,
    paths: &[
        "M14 3h7v7h-2V6.4l-8.3 8.3-1.4-1.4L17.6 5H14z",
        "M5 5h6v2H7v10h10v-4h2v6H5z",
    ],
};

static GLOBE: IconData = IconData {
    view_box: VIEW_BOX,
    paths: &[
        "M12 2a10 10 0 1 0 0 20a10 10 0 1 0 0-20zm0 2a8 8 0 1 1 0 16a8 8 0 1 1 0-16z",
        "M11 3h2v18h-2z",
        "M3 11h18v2H3z",
    ],
};

/// Looks up an icon by its symbolic name. Unknown names yield `None`.
pub fn get_icon(name: &str) -> Option<&'static IconData> {
    match name {
        "linktree" => Some(&LINKTREE),
        "linkedin" => Some(&LINKEDIN),
        "github" => Some(&GITHUB),
        "external" => Some(&EXTERNAL),
        "globe" => Some(&GLOBE),
        _ => None,
    }
}

/// Icon kinds a free-text link label can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Linktree,
    LinkedIn,
    GitHub,
    Globe,
    External,
    Unknown,
}

impl IconKind {
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("linkedin") {
            IconKind::LinkedIn
        } else if label.contains("github") {
            IconKind::GitHub
        } else if label.contains("linktr") {
            IconKind::Linktree
        } else if ["web", "site", "portfolio"].iter().any(|k| label.contains(k)) {
            IconKind::Globe
        } else {
            IconKind::Unknown
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            IconKind::Linktree => Some("linktree"),
            IconKind::LinkedIn => Some("linkedin"),
            IconKind::GitHub => Some("github"),
            IconKind::Globe => Some("globe"),
            IconKind::External => Some("external"),
            IconKind::Unknown => None,
        }
    }

    pub fn icon(self) -> Option<&'static IconData> {
        self.name().and_then(get_icon)
    }
}

/// A square vector node of edge length `size`.
pub fn icon_node(icon: &IconData, size: f32, color: Color) -> IRNode {
    let style = ElementStyle {
        width: Some(Dimension::Pt(size)),
        height: Some(Dimension::Pt(size)),
        color: Some(color),
        ..ElementStyle::default()
    };
    IRNode::Vector {
        meta: NodeMetadata::default().with_override(style),
        glyph: VectorGlyph {
            view_box: icon.view_box.to_string(),
            paths: icon.paths.iter().map(|p| p.to_string()).collect(),
        },
    }
}

/// An icon in the accent color, wrapped in a clickable link to `href`.
pub fn icon_link(icon: &IconData, href: &str, size: f32) -> IRNode {
    icon_link_with(NodeMetadata::default(), icon, href, size)
}

/// [`icon_link`] on top of caller-supplied metadata, e.g. to give it an id.
pub fn icon_link_with(meta: NodeMetadata, icon: &IconData, href: &str, size: f32) -> IRNode {
    IRNode::Link {
        meta: meta.with_override(ElementStyle {
            width: Some(Dimension::Pt(size)),
            ..ElementStyle::default()
        }),
        href: href.to_string(),
        children: vec![icon_node(icon, size, crate::theme::ACCENT)],
    }
}
