use super::{intrinsic_width, resolve_height, BoxFrame, RenderNode};
use crate::engine::LayoutEngine;
use crate::interface::{LayoutContext, LayoutNode, LayoutResult, NodeState, ParagraphState};
use crate::style::ComputedStyle;
use crate::text::{break_lines, collect_inlines, shape_spans, Line, ShapedText};
use crate::{LayoutElement, LayoutError, LinkElement, RectElement, TextElement};
use dossier_idf::IRNode;
use dossier_style::text::{TextAlign, TextDecoration};
use dossier_types::geometry::{BoxConstraints, Rect, Size};
use std::sync::Arc;

/// Block of inline text, shaped once at build time. Pages break between lines.
#[derive(Debug, Clone)]
pub struct ParagraphNode {
    pub id: Option<String>,
    style: Arc<ComputedStyle>,
    text: ShapedText,
    is_heading: bool,
    max_line_width: f32,
}

impl ParagraphNode {
    pub fn build(
        node: &IRNode,
        engine: &LayoutEngine,
        parent_style: &Arc<ComputedStyle>,
    ) -> Result<RenderNode, LayoutError> {
        let (meta, inlines, is_heading) = match node {
            IRNode::Paragraph { meta, children } => (meta, children, false),
            IRNode::Heading { meta, children, .. } => (meta, children, true),
            _ => return Err(LayoutError::Generic(format!("'{}' is not a paragraph", node.kind()))),
        };

        let style = engine.compute_style(meta, parent_style);
        let text = shape_spans(engine.fonts(), collect_inlines(inlines, &style))?;
        let max_line_width = break_lines(&text, f32::INFINITY)
            .iter()
            .map(|line| line.width)
            .fold(0.0, f32::max);

        Ok(RenderNode::Paragraph(Self {
            id: meta.id.clone(),
            style,
            text,
            is_heading,
            max_line_width,
        }))
    }

    fn content_width(&self, width: f32) -> f32 {
        (width - self.style.horizontal_insets()).max(0.0)
    }

    fn draw_line(&self, ctx: &mut LayoutContext, line: &Line, content_width: f32) {
        let slack = (content_width - line.width).max(0.0);
        let mut x = ctx.x()
            + match self.style.text.text_align {
                TextAlign::Left => 0.0,
                TextAlign::Center => slack / 2.0,
                TextAlign::Right => slack,
            };
        let top = ctx.cursor_y();

        let fragments = &self.text.fragments;
        let mut k = 0;
        while k < line.fragments.len() {
            let span_index = fragments[line.fragments[k]].span;
            let mut glyphs = Vec::new();
            let mut content = String::new();
            let mut width = 0.0;
            while k < line.fragments.len() && fragments[line.fragments[k]].span == span_index {
                let fragment = &fragments[line.fragments[k]];
                glyphs.extend(fragment.glyphs.iter().cloned());
                content.push_str(&fragment.text);
                width += fragment.width;
                k += 1;
            }
            if glyphs.is_empty() {
                continue;
            }

            let span = &self.text.spans[span_index];
            let text_style = &span.style.text;
            let rect = Rect::new(x, top, width, line.height);
            ctx.push_element(
                rect,
                LayoutElement::Text(TextElement {
                    face_id: span.face_id,
                    font_size: text_style.font_size,
                    color: text_style.color,
                    synthetic_bold: span.synthetic_bold,
                    baseline: line.baseline,
                    glyphs,
                    content,
                }),
            );

            if text_style.text_decoration == TextDecoration::Underline {
                let thickness = (text_style.font_size * 0.06).max(0.5);
                ctx.push_element(
                    Rect::new(x, top + line.baseline + text_style.font_size * 0.1, width, thickness),
                    LayoutElement::Rectangle(RectElement {
                        fill: Some(text_style.color),
                        stroke: None,
                        corner_radius: 0.0,
                    }),
                );
            }
            if let Some(href) = span.link.and_then(|l| self.text.links.get(l)) {
                ctx.push_element(rect, LayoutElement::Link(LinkElement { href: href.clone() }));
            }
            x += width;
        }
    }
}

impl LayoutNode for ParagraphNode {
    fn style(&self) -> &ComputedStyle {
        self.style.as_ref()
    }

    fn measure(&self, constraints: BoxConstraints) -> Size {
        let width = constraints.max_width;
        let lines = break_lines(&self.text, self.content_width(width));
        let natural = lines.iter().map(|l| l.height).sum::<f32>() + self.style.vertical_insets();
        Size::new(width, resolve_height(&self.style, constraints, natural))
    }

    fn max_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || self.max_line_width)
    }

    fn min_content_width(&self) -> f32 {
        intrinsic_width(&self.style, || self.text.longest_word_width())
    }

    fn leading_height(&self, constraints: BoxConstraints) -> f32 {
        let lines = break_lines(&self.text, self.content_width(constraints.max_width));
        match lines.first() {
            Some(line) => self.style.inset_top() + line.height,
            None => self.measure(constraints).height,
        }
    }

    fn layout(
        &self,
        ctx: &mut LayoutContext,
        constraints: BoxConstraints,
        break_state: Option<NodeState>,
    ) -> Result<LayoutResult, LayoutError> {
        let (start_line, is_continuation) = match break_state {
            None | Some(NodeState::Atomic) => (0, false),
            Some(state) => (state.as_paragraph()?.line_index, true),
        };

        if !is_continuation && self.style.keeps_together() && ctx.page_has_content() {
            let height = self.measure(constraints).height;
            if !ctx.fits(height) {
                return Ok(LayoutResult::Break(NodeState::Atomic));
            }
        }

        let frame = BoxFrame::open(ctx, &self.style, is_continuation);
        let content_x = ctx.x() + self.style.inset_left();
        let content_width = self.content_width(ctx.width());
        let lines = break_lines(&self.text, content_width);

        let mut split_at: Option<usize> = None;
        let mut abandon = false;
        let end_y = {
            let mut column = ctx.column(content_x, content_width, self.style.inset_bottom());
            for (line_index, line) in lines.iter().enumerate().skip(start_line) {
                if !column.fits(line.height) && column.page_has_content() {
                    if line_index == start_line && !is_continuation {
                        abandon = true;
                    } else {
                        split_at = Some(line_index);
                    }
                    break;
                }
                self.draw_line(&mut column, line, content_width);
                column.advance_cursor(line.height);
            }
            column.cursor_y()
        };
        ctx.set_cursor_y(end_y);

        if abandon {
            frame.abandon(ctx);
            return Ok(LayoutResult::Break(NodeState::Atomic));
        }
        match split_at {
            Some(line_index) => {
                frame.close(ctx, &self.style, constraints, false, None);
                Ok(LayoutResult::Break(NodeState::Paragraph(ParagraphState { line_index })))
            }
            None => {
                frame.close(ctx, &self.style, constraints, true, None);
                Ok(LayoutResult::Finished)
            }
        }
    }

    fn keeps_with_next(&self) -> bool {
        self.is_heading
    }
}
