use crate::test_utils::test_engine;
use crate::{FontLibrary, ImageMetrics, LayoutConfig, LayoutElement, LayoutEngine, LayoutError, LayoutPage};
use dossier_idf::{IRNode, InlineMetadata, InlineNode, NodeMetadata, VectorGlyph};
use dossier_style::dimension::Dimension;
use dossier_style::flex::AlignItems;
use dossier_style::stylesheet::{BreakInside, ElementStyle};
use dossier_style::text::TextAlign;
use std::sync::Arc;

macro_rules! engine_or_skip {
    () => {
        match test_engine() {
            Some(engine) => engine,
            None => {
                eprintln!("skipping: no system font available");
                return;
            }
        }
    };
}

fn para(text: &str) -> IRNode {
    IRNode::Paragraph {
        meta: NodeMetadata::default(),
        children: vec![InlineNode::text(text)],
    }
}

fn styled_para(text: &str, style: ElementStyle) -> IRNode {
    IRNode::Paragraph {
        meta: NodeMetadata::default().with_override(style),
        children: vec![InlineNode::text(text)],
    }
}

fn spacer(min_height: f32) -> IRNode {
    styled_para(
        "spacer",
        ElementStyle {
            min_height: Some(min_height),
            ..Default::default()
        },
    )
}

fn all_text(pages: &[LayoutPage]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|p| p.text_lines().into_iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn single_paragraph_fits_one_page() {
    let engine = engine_or_skip!();
    let pages = engine
        .paginate(&IRNode::Root(vec![para("Jane Doe")]), &ImageMetrics::new())
        .unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].text_lines(), vec!["Jane Doe"]);

    let text = pages[0].elements.first().unwrap();
    let content = engine.config().content_rect();
    assert!((text.x - content.x).abs() < 1e-3);
    assert!((text.y - content.y).abs() < 1e-3);
}

#[test]
fn page_break_starts_new_page() {
    let engine = engine_or_skip!();
    let tree = IRNode::Root(vec![para("one"), IRNode::PageBreak, para("two")]);
    let pages = engine.paginate(&tree, &ImageMetrics::new()).unwrap();
    assert_eq!(all_text(&pages), vec![vec!["one"], vec!["two"]]);
}

#[test]
fn leading_and_trailing_page_breaks_are_ignored() {
    let engine = engine_or_skip!();
    let tree = IRNode::Root(vec![IRNode::PageBreak, para("one"), IRNode::PageBreak]);
    let pages = engine.paginate(&tree, &ImageMetrics::new()).unwrap();
    assert_eq!(pages.len(), 1);
}

#[test]
fn long_document_flows_onto_more_pages_in_order() {
    let engine = engine_or_skip!();
    let children: Vec<IRNode> = (0..120).map(|i| para(&format!("Line {}", i))).collect();
    let pages = engine.paginate(&IRNode::Root(children), &ImageMetrics::new()).unwrap();
    assert!(pages.len() >= 2, "expected overflow, got {} page(s)", pages.len());

    let content = engine.config().content_rect();
    let mut seen = Vec::new();
    for page in &pages {
        for el in &page.elements {
            assert!(el.y >= content.y - 1e-3);
            assert!(el.y + el.height <= content.bottom() + 0.01);
        }
        seen.extend(page.text_lines().into_iter().map(str::to_string));
    }
    let expected: Vec<String> = (0..120).map(|i| format!("Line {}", i)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn keep_together_block_moves_whole() {
    let engine = engine_or_skip!();
    let kept = IRNode::Block {
        meta: NodeMetadata::default().with_override(ElementStyle {
            break_inside: Some(BreakInside::Avoid),
            ..Default::default()
        }),
        children: (0..5).map(|i| para(&format!("kept {}", i))).collect(),
    };
    let pages = engine
        .paginate(&IRNode::Root(vec![spacer(700.0), kept]), &ImageMetrics::new())
        .unwrap();

    let text = all_text(&pages);
    assert_eq!(text.len(), 2);
    assert_eq!(text[0], vec!["spacer"]);
    assert_eq!(text[1].len(), 5);
}

#[test]
fn heading_stays_with_following_content() {
    let engine = engine_or_skip!();
    let tree = IRNode::Root(vec![
        spacer(740.0),
        IRNode::Heading {
            meta: NodeMetadata::default(),
            level: 2,
            children: vec![InlineNode::text("Experience")],
        },
        para("Entry"),
    ]);
    let pages = engine.paginate(&tree, &ImageMetrics::new()).unwrap();
    let text = all_text(&pages);
    assert_eq!(text[0], vec!["spacer"]);
    assert_eq!(text[1], vec!["Experience", "Entry"]);
}

#[test]
fn unavailable_images_are_omitted() {
    let engine = engine_or_skip!();
    let sized = ElementStyle {
        width: Some(Dimension::Pt(80.0)),
        height: Some(Dimension::Pt(80.0)),
        ..Default::default()
    };
    let tree = IRNode::Root(vec![
        IRNode::Image {
            meta: NodeMetadata::default(),
            src: "missing.png".into(),
        },
        IRNode::Image {
            meta: NodeMetadata::default().with_override(sized),
            src: "portrait.jpg".into(),
        },
    ]);
    let mut images = ImageMetrics::new();
    images.insert("portrait.jpg", 200, 200);

    let pages = engine.paginate(&tree, &images).unwrap();
    let placed: Vec<_> = pages[0]
        .elements
        .iter()
        .filter_map(|el| match &el.element {
            LayoutElement::Image(image) => Some((image.src.as_str(), el.width, el.height)),
            _ => None,
        })
        .collect();
    assert_eq!(placed, vec![("portrait.jpg", 80.0, 80.0)]);
}

#[test]
fn link_blocks_and_inline_links_emit_annotations() {
    let engine = engine_or_skip!();
    let tree = IRNode::Root(vec![
        IRNode::Link {
            meta: NodeMetadata::default(),
            href: "https://example.com/card".into(),
            children: vec![para("Project")],
        },
        IRNode::Paragraph {
            meta: NodeMetadata::default(),
            children: vec![
                InlineNode::text("see "),
                InlineNode::Hyperlink {
                    meta: InlineMetadata::default(),
                    href: "https://example.com/inline".into(),
                    children: vec![InlineNode::text("site")],
                },
            ],
        },
    ]);
    let pages = engine.paginate(&tree, &ImageMetrics::new()).unwrap();
    let links: Vec<_> = pages[0].links().map(|(el, href)| (href.to_string(), el.width)).collect();
    assert_eq!(links.len(), 2);

    let content = engine.config().content_rect();
    assert_eq!(links[0].0, "https://example.com/card");
    assert!((links[0].1 - content.width).abs() < 1e-3);
    assert_eq!(links[1].0, "https://example.com/inline");
    assert!(links[1].1 < content.width / 2.0);
}

#[test]
fn row_places_icon_beside_text() {
    let engine = engine_or_skip!();
    let row = IRNode::FlexContainer {
        meta: NodeMetadata::default().with_override(ElementStyle {
            align_items: Some(AlignItems::Center),
            column_gap: Some(4.0),
            ..Default::default()
        }),
        children: vec![
            IRNode::Vector {
                meta: NodeMetadata::default(),
                glyph: VectorGlyph {
                    view_box: "0 0 24 24".into(),
                    paths: vec!["M0 0H24V24H0Z".into()],
                },
            },
            para("Berlin"),
        ],
    };
    let pages = engine.paginate(&IRNode::Root(vec![row]), &ImageMetrics::new()).unwrap();
    let elements = &pages[0].elements;
    let icon = elements
        .iter()
        .find(|el| matches!(el.element, LayoutElement::Vector(_)))
        .unwrap();
    let text = elements
        .iter()
        .find(|el| matches!(el.element, LayoutElement::Text(_)))
        .unwrap();

    assert_eq!(icon.width, 12.0);
    assert!((text.x - (icon.x + 16.0)).abs() < 1e-3);
    let icon_center = icon.y + icon.height / 2.0;
    let text_center = text.y + text.height / 2.0;
    assert!((icon_center - text_center).abs() < 1e-3);
}

#[test]
fn right_aligned_text_ends_at_content_edge() {
    let engine = engine_or_skip!();
    let tree = IRNode::Root(vec![styled_para(
        "19 October 2026",
        ElementStyle {
            text_align: Some(TextAlign::Right),
            ..Default::default()
        },
    )]);
    let pages = engine.paginate(&tree, &ImageMetrics::new()).unwrap();
    let text = &pages[0].elements[0];
    assert!((text.x + text.width - engine.config().content_rect().right()).abs() < 0.01);
}

#[test]
fn missing_fonts_fail_layout() {
    let engine = LayoutEngine::new(Arc::new(FontLibrary::new()), LayoutConfig::default());
    let result = engine.paginate(&IRNode::Root(vec![para("x")]), &ImageMetrics::new());
    assert!(matches!(result, Err(LayoutError::FontNotFound(_))));
}

#[test]
fn empty_document_is_one_blank_page() {
    let engine = LayoutEngine::new(Arc::new(FontLibrary::new()), LayoutConfig::default());
    let pages = engine.paginate(&IRNode::Root(Vec::new()), &ImageMetrics::new()).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].elements.is_empty());
}
