use crate::style::ComputedStyle;
use dossier_idf::{InlineMetadata, InlineNode};
use std::sync::Arc;

/// A run of text sharing one style and one link target.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// Text with the style's text-transform already applied.
    pub text: String,
    pub style: Arc<ComputedStyle>,
    /// Index into `InlineContent::links`.
    pub link: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct InlineContent {
    pub spans: Vec<TextSpan>,
    pub links: Vec<String>,
}

impl InlineContent {
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// Flattens an inline tree into styled spans. Adjacent text with the same
/// style and link is merged into one span.
pub fn collect_inlines(inlines: &[InlineNode], parent_style: &Arc<ComputedStyle>) -> InlineContent {
    let mut content = InlineContent::default();
    process_inlines(inlines, parent_style, None, &mut content);
    content
}

fn process_inlines(
    inlines: &[InlineNode],
    parent_style: &Arc<ComputedStyle>,
    current_link: Option<usize>,
    content: &mut InlineContent,
) {
    for node in inlines {
        match node {
            InlineNode::Text(text) => {
                let text = parent_style.text.text_transform.apply(text);
                if let Some(last) = content.spans.last_mut() {
                    if Arc::ptr_eq(&last.style, parent_style) && last.link == current_link && last.text != "\n" {
                        last.text.push_str(&text);
                        continue;
                    }
                }
                content.spans.push(TextSpan {
                    text,
                    style: Arc::clone(parent_style),
                    link: current_link,
                });
            }
            InlineNode::StyledSpan { meta, children } => {
                let style = resolve_meta_style(meta, parent_style);
                process_inlines(children, &style, current_link, content);
            }
            InlineNode::Hyperlink { meta, href, children } => {
                let style = resolve_meta_style(meta, parent_style);
                content.links.push(href.clone());
                let link = Some(content.links.len() - 1);
                process_inlines(children, &style, link, content);
            }
            InlineNode::LineBreak => {
                content.spans.push(TextSpan {
                    text: "\n".to_string(),
                    style: Arc::clone(parent_style),
                    link: current_link,
                });
            }
        }
    }
}

fn resolve_meta_style(meta: &InlineMetadata, parent_style: &Arc<ComputedStyle>) -> Arc<ComputedStyle> {
    if meta.style_sets.is_empty() && meta.style_override.is_none() {
        return Arc::clone(parent_style);
    }
    Arc::new(ComputedStyle::compute(
        parent_style,
        &meta.style_sets,
        meta.style_override.as_ref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_style::font::FontWeight;
    use dossier_style::stylesheet::ElementStyle;
    use dossier_style::text::TextTransform;

    #[test]
    fn merges_plain_text_and_splits_styled_spans() {
        let bold = Arc::new(ElementStyle {
            font_weight: Some(FontWeight::SemiBold),
            ..Default::default()
        });
        let inlines = vec![
            InlineNode::StyledSpan {
                meta: InlineMetadata::styled(&bold),
                children: vec![InlineNode::text("Frontend:")],
            },
            InlineNode::text(" React,"),
            InlineNode::text(" Vue"),
        ];
        let base = Arc::new(ComputedStyle::default());
        let content = collect_inlines(&inlines, &base);

        assert_eq!(content.spans.len(), 2);
        assert_eq!(content.spans[0].text, "Frontend:");
        assert_eq!(content.spans[0].style.text.font_weight, FontWeight::SemiBold);
        assert_eq!(content.spans[1].text, " React, Vue");
    }

    #[test]
    fn hyperlinks_are_indexed_and_transform_applies() {
        let upper = Arc::new(ElementStyle {
            text_transform: Some(TextTransform::Uppercase),
            ..Default::default()
        });
        let inlines = vec![
            InlineNode::text("see "),
            InlineNode::Hyperlink {
                meta: InlineMetadata::styled(&upper),
                href: "https://example.com".into(),
                children: vec![InlineNode::text("site")],
            },
            InlineNode::LineBreak,
            InlineNode::text("next"),
        ];
        let base = Arc::new(ComputedStyle::default());
        let content = collect_inlines(&inlines, &base);

        assert_eq!(content.links, vec!["https://example.com".to_string()]);
        let texts: Vec<_> = content.spans.iter().map(|s| (s.text.as_str(), s.link)).collect();
        assert_eq!(
            texts,
            vec![("see ", None), ("SITE", Some(0)), ("\n", None), ("next", None)]
        );
    }
}
