//! Turns the positioned elements of one page into a content stream.

use crate::error::RenderError;
use crate::fonts::EmbeddedFont;
use crate::path::{parse_path, PathSegment, ViewBox};
use dossier_layout::{
    ImageElement, LayoutElement, PositionedElement, RectElement, TextElement, VectorElement,
};
use dossier_types::{Color, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::BTreeMap;

/// Bezier approximation constant for quarter circles.
const KAPPA: f32 = 0.5523;

/// Stroke width applied to synthetic bold text, relative to the font size.
const SYNTHETIC_BOLD_STROKE: f32 = 0.025;

/// A clickable area in PDF user space (bottom-left origin).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    pub rect: [f32; 4],
    pub href: String,
}

#[derive(Default, Clone, PartialEq)]
struct GraphicsState {
    font: Option<(usize, f32)>,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
    render_mode: i64,
}

pub(crate) struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    fonts: &'a BTreeMap<usize, EmbeddedFont>,
    images: &'a BTreeMap<String, String>,
    links: Vec<LinkArea>,
}

fn color_operands(color: Color) -> Vec<Object> {
    color.to_unit_rgb().iter().map(|c| Object::Real(*c)).collect()
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        page_height: f32,
        fonts: &'a BTreeMap<usize, EmbeddedFont>,
        images: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: GraphicsState::default(),
            saved: Vec::new(),
            fonts,
            images,
            links: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> (Content, Vec<LinkArea>) {
        (self.content, self.links)
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    /// PDF y coordinate of the bottom edge of a top-left based rect.
    fn pdf_bottom(&self, rect: &Rect) -> f32 {
        self.page_height - (rect.y + rect.height)
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
        self.op("q", vec![]);
    }

    fn restore(&mut self) {
        self.op("Q", vec![]);
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            self.op("rg", color_operands(color));
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color != Some(color) {
            self.op("RG", color_operands(color));
            self.state.stroke_color = Some(color);
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if self.state.line_width != Some(width) {
            self.op("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Rectangle(rect) => self.draw_rect(rect, el),
            LayoutElement::Text(text) => self.draw_text(text, el)?,
            LayoutElement::Image(image) => self.draw_image(image, el)?,
            LayoutElement::Vector(vector) => self.draw_vector(vector, el),
            LayoutElement::Link(link) => {
                let bottom = self.pdf_bottom(&el.rect());
                self.links.push(LinkArea {
                    rect: [el.x, bottom, el.x + el.width, bottom + el.height],
                    href: link.href.clone(),
                });
            }
        }
        Ok(())
    }

    /// Appends a rectangle path, rounded when `radius` is positive.
    fn rect_path(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        if r <= 0.0 {
            self.op("re", vec![x.into(), y.into(), w.into(), h.into()]);
            return;
        }
        let k = r * KAPPA;
        let (x1, y1) = (x + w, y + h);
        self.op("m", vec![(x + r).into(), y.into()]);
        self.op("l", vec![(x1 - r).into(), y.into()]);
        self.op("c", vec![(x1 - r + k).into(), y.into(), x1.into(), (y + r - k).into(), x1.into(), (y + r).into()]);
        self.op("l", vec![x1.into(), (y1 - r).into()]);
        self.op("c", vec![x1.into(), (y1 - r + k).into(), (x1 - r + k).into(), y1.into(), (x1 - r).into(), y1.into()]);
        self.op("l", vec![(x + r).into(), y1.into()]);
        self.op("c", vec![(x + r - k).into(), y1.into(), x.into(), (y1 - r + k).into(), x.into(), (y1 - r).into()]);
        self.op("l", vec![x.into(), (y + r).into()]);
        self.op("c", vec![x.into(), (y + r - k).into(), (x + r - k).into(), y.into(), (x + r).into(), y.into()]);
        self.op("h", vec![]);
    }

    fn draw_rect(&mut self, rect: &RectElement, el: &PositionedElement) {
        if el.width <= 0.0 || el.height <= 0.0 {
            return;
        }
        let bottom = self.pdf_bottom(&el.rect());
        let operator = match (rect.fill, rect.stroke) {
            (None, None) => return,
            (Some(fill), None) => {
                self.set_fill_color(fill);
                self.rect_path(el.x, bottom, el.width, el.height, rect.corner_radius);
                "f"
            }
            (fill, Some((width, color))) => {
                if let Some(fill) = fill {
                    self.set_fill_color(fill);
                }
                self.set_stroke_color(color);
                self.set_line_width(width);
                let inset = width / 2.0;
                self.rect_path(
                    el.x + inset,
                    bottom + inset,
                    (el.width - width).max(0.0),
                    (el.height - width).max(0.0),
                    (rect.corner_radius - inset).max(0.0),
                );
                if fill.is_some() { "B" } else { "S" }
            }
        };
        self.op(operator, vec![]);
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) -> Result<(), RenderError> {
        if text.glyphs.is_empty() || text.font_size <= 0.0 {
            return Ok(());
        }
        let fonts = self.fonts;
        let font = fonts
            .get(&text.face_id)
            .ok_or_else(|| RenderError::MissingResource(format!("font face {}", text.face_id)))?;
        let size = text.font_size;

        self.op("BT", vec![]);
        if self.state.font != Some((text.face_id, size)) {
            self.op("Tf", vec![Object::Name(font.resource_name.as_bytes().to_vec()), size.into()]);
            self.state.font = Some((text.face_id, size));
        }
        self.set_fill_color(text.color);
        let render_mode = if text.synthetic_bold { 2 } else { 0 };
        if text.synthetic_bold {
            self.set_stroke_color(text.color);
            self.set_line_width(size * SYNTHETIC_BOLD_STROKE);
        }
        if self.state.render_mode != render_mode {
            self.op("Tr", vec![render_mode.into()]);
            self.state.render_mode = render_mode;
        }

        let baseline = self.page_height - (el.y + text.baseline);
        self.op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), el.x.into(), baseline.into()]);

        // Glyphs are grouped into TJ runs sharing one vertical offset.
        let mut rise = 0.0f32;
        let mut run: Vec<Object> = Vec::new();
        let mut codes: Vec<u8> = Vec::new();
        for glyph in &text.glyphs {
            if glyph.y_offset != rise {
                flush_codes(&mut run, &mut codes);
                if !run.is_empty() {
                    self.op("TJ", vec![Object::Array(std::mem::take(&mut run))]);
                }
                self.op("Ts", vec![glyph.y_offset.into()]);
                rise = glyph.y_offset;
            }

            if glyph.x_offset != 0.0 {
                flush_codes(&mut run, &mut codes);
                run.push(Object::Real(-glyph.x_offset * 1000.0 / size));
            }
            codes.extend_from_slice(&glyph.id.to_be_bytes());

            let natural = font.widths.get(glyph.id);
            let adjustment = natural + (glyph.x_offset - glyph.advance) * 1000.0 / size;
            if adjustment.abs() > 0.01 {
                flush_codes(&mut run, &mut codes);
                run.push(Object::Real(adjustment));
            }
        }
        flush_codes(&mut run, &mut codes);
        if !run.is_empty() {
            self.op("TJ", vec![Object::Array(run)]);
        }
        if rise != 0.0 {
            self.op("Ts", vec![0.into()]);
        }
        self.op("ET", vec![]);
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) -> Result<(), RenderError> {
        let name = self
            .images
            .get(&image.src)
            .ok_or_else(|| RenderError::MissingResource(format!("image '{}'", image.src)))?
            .clone();
        let bottom = self.pdf_bottom(&el.rect());

        self.save();
        if image.corner_radius > 0.0 {
            self.rect_path(el.x, bottom, el.width, el.height, image.corner_radius);
            self.op("W", vec![]);
            self.op("n", vec![]);
        }
        self.op(
            "cm",
            vec![el.width.into(), 0.into(), 0.into(), el.height.into(), el.x.into(), bottom.into()],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.restore();
        Ok(())
    }

    fn draw_vector(&mut self, vector: &VectorElement, el: &PositionedElement) {
        let Some(view_box) = ViewBox::parse(&vector.view_box) else {
            log::warn!("Skipping vector with invalid viewBox '{}'", vector.view_box);
            return;
        };
        let (scale, dx, dy) = view_box.fit(el.width, el.height);

        self.save();
        self.set_fill_color(vector.color);
        let tx = el.x + dx;
        let ty = self.page_height - el.y - dy;
        self.op("cm", vec![scale.into(), 0.into(), 0.into(), (-scale).into(), tx.into(), ty.into()]);
        for data in vector.paths.iter() {
            let segments = parse_path(data);
            if segments.is_empty() {
                continue;
            }
            for segment in segments {
                match segment {
                    PathSegment::MoveTo(x, y) => self.op("m", vec![x.into(), y.into()]),
                    PathSegment::LineTo(x, y) => self.op("l", vec![x.into(), y.into()]),
                    PathSegment::CurveTo(x1, y1, x2, y2, x, y) => self.op(
                        "c",
                        vec![x1.into(), y1.into(), x2.into(), y2.into(), x.into(), y.into()],
                    ),
                    PathSegment::Close => self.op("h", vec![]),
                }
            }
            self.op("f", vec![]);
        }
        self.restore();
    }
}

fn flush_codes(run: &mut Vec<Object>, codes: &mut Vec<u8>) {
    if !codes.is_empty() {
        run.push(Object::String(std::mem::take(codes), StringFormat::Hexadecimal));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::GlyphWidths;
    use dossier_layout::{LinkElement, PositionedGlyph};
    use std::sync::Arc;

    fn element(x: f32, y: f32, w: f32, h: f32, element: LayoutElement) -> PositionedElement {
        PositionedElement::new(Rect::new(x, y, w, h), element)
    }

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn filled_rect_is_flipped_to_pdf_space() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(800.0, &fonts, &images);
        let rect = RectElement { fill: Some(Color::WHITE), stroke: None, corner_radius: 0.0 };
        ctx.draw_element(&element(10.0, 20.0, 100.0, 30.0, LayoutElement::Rectangle(rect))).unwrap();
        let (content, _) = ctx.finish();

        assert_eq!(operators(&content), vec!["rg", "re", "f"]);
        let re = &content.operations[1];
        assert_eq!(re.operands[1], Object::Real(750.0));
    }

    #[test]
    fn rounded_stroked_rect_uses_curves() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(800.0, &fonts, &images);
        let rect = RectElement {
            fill: Some(Color::WHITE),
            stroke: Some((1.0, Color::BLACK)),
            corner_radius: 6.0,
        };
        ctx.draw_element(&element(0.0, 0.0, 50.0, 50.0, LayoutElement::Rectangle(rect))).unwrap();
        let (content, _) = ctx.finish();
        let ops = operators(&content);
        assert_eq!(ops.iter().filter(|op| **op == "c").count(), 4);
        assert_eq!(ops.last(), Some(&"B"));
    }

    #[test]
    fn links_are_collected_not_painted() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let link = LinkElement { href: "https://example.com".into() };
        ctx.draw_element(&element(5.0, 10.0, 20.0, 10.0, LayoutElement::Link(link))).unwrap();
        let (content, links) = ctx.finish();
        assert!(content.operations.is_empty());
        assert_eq!(
            links,
            vec![LinkArea { rect: [5.0, 80.0, 25.0, 90.0], href: "https://example.com".into() }]
        );
    }

    #[test]
    fn text_emits_glyph_ids_and_synthetic_bold() {
        let mut fonts = BTreeMap::new();
        fonts.insert(
            0,
            EmbeddedFont {
                resource_name: "F0".into(),
                widths: GlyphWidths::from_map(BTreeMap::from([(3, 500.0), (4, 600.0)])),
            },
        );
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let glyph = |id: u16, advance: f32| PositionedGlyph {
            id,
            advance,
            x_offset: 0.0,
            y_offset: 0.0,
            text: String::new(),
        };
        let text = TextElement {
            face_id: 0,
            font_size: 10.0,
            color: Color::BLACK,
            synthetic_bold: true,
            baseline: 8.0,
            glyphs: vec![glyph(3, 5.0), glyph(4, 7.0)],
            content: "ab".into(),
        };
        ctx.draw_element(&element(0.0, 0.0, 12.0, 10.0, LayoutElement::Text(text))).unwrap();
        let (content, _) = ctx.finish();

        let ops = operators(&content);
        assert_eq!(ops, vec!["BT", "Tf", "rg", "RG", "w", "Tr", "Tm", "TJ", "ET"]);
        let tj = &content.operations[7].operands[0];
        match tj {
            Object::Array(items) => {
                assert_eq!(items[0], Object::String(vec![0, 3, 0, 4], StringFormat::Hexadecimal));
                // 600 - 7 * 1000 / 10
                assert_eq!(items[1], Object::Real(-100.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_font_is_an_error() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let text = TextElement {
            face_id: 7,
            font_size: 10.0,
            color: Color::BLACK,
            synthetic_bold: false,
            baseline: 8.0,
            glyphs: vec![PositionedGlyph { id: 1, advance: 1.0, x_offset: 0.0, y_offset: 0.0, text: "a".into() }],
            content: "a".into(),
        };
        let result = ctx.draw_element(&element(0.0, 0.0, 1.0, 1.0, LayoutElement::Text(text)));
        assert!(matches!(result, Err(RenderError::MissingResource(_))));
    }

    #[test]
    fn vectors_are_scaled_into_their_box_and_filled() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let vector = VectorElement {
            view_box: "0 0 24 24".into(),
            paths: Arc::new(vec!["M0 0h24v24H0z".into(), "garbage".into()]),
            color: Color::from_u32(0x2563EB),
        };
        ctx.draw_element(&element(10.0, 10.0, 12.0, 12.0, LayoutElement::Vector(vector))).unwrap();
        let (content, _) = ctx.finish();
        let ops = operators(&content);
        assert_eq!(ops.first(), Some(&"q"));
        assert_eq!(ops.last(), Some(&"Q"));
        assert_eq!(ops.iter().filter(|op| **op == "f").count(), 1);

        let cm = content.operations.iter().find(|op| op.operator == "cm").unwrap();
        assert_eq!(cm.operands[0], Object::Real(0.5));
        assert_eq!(cm.operands[3], Object::Real(-0.5));
        assert_eq!(cm.operands[5], Object::Real(90.0));
    }

    #[test]
    fn rounded_images_are_clipped() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::from([("me.png".to_string(), "Im0".to_string())]);
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let image = ImageElement { src: "me.png".into(), corner_radius: 20.0 };
        ctx.draw_element(&element(0.0, 0.0, 40.0, 40.0, LayoutElement::Image(image))).unwrap();
        let (content, _) = ctx.finish();
        let ops = operators(&content);
        assert!(ops.contains(&"W"));
        assert_eq!(&ops[ops.len() - 3..], &["cm", "Do", "Q"]);
    }

    #[test]
    fn fill_color_is_restored_after_q() {
        let fonts = BTreeMap::new();
        let images = BTreeMap::new();
        let mut ctx = PageContext::new(100.0, &fonts, &images);
        let red = Color::rgb(255, 0, 0);
        let rect = |fill| LayoutElement::Rectangle(RectElement { fill: Some(fill), stroke: None, corner_radius: 0.0 });
        ctx.draw_element(&element(0.0, 0.0, 5.0, 5.0, rect(red))).unwrap();
        let vector = VectorElement {
            view_box: "0 0 1 1".into(),
            paths: Arc::new(vec!["M0 0h1v1z".into()]),
            color: Color::BLACK,
        };
        ctx.draw_element(&element(0.0, 0.0, 5.0, 5.0, LayoutElement::Vector(vector))).unwrap();
        ctx.draw_element(&element(0.0, 0.0, 5.0, 5.0, rect(red))).unwrap();
        let (content, _) = ctx.finish();
        // red, black (inside q/Q), red again is not re-emitted
        assert_eq!(operators(&content).iter().filter(|op| **op == "rg").count(), 2);
    }
}
