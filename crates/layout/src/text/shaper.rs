use crate::elements::PositionedGlyph;
use crate::fonts::FontLibrary;
use crate::style::ComputedStyle;
use crate::text::builder::{InlineContent, TextSpan};
use crate::LayoutError;
use rustybuzz::{Feature, UnicodeBuffer};
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};
use ttf_parser::Tag;

// Reuse buffer to avoid allocations in the tight loop
thread_local! {
    static SCRATCH_BUFFER: RefCell<Option<UnicodeBuffer>> = RefCell::new(Some(UnicodeBuffer::new()));
}

fn features() -> &'static [Feature] {
    static FEATURES: OnceLock<Vec<Feature>> = OnceLock::new();
    FEATURES.get_or_init(|| {
        vec![
            Feature::new(Tag::from_bytes(b"liga"), 1, ..),
            Feature::new(Tag::from_bytes(b"kern"), 1, ..),
        ]
    })
}

/// Font and line metrics shared by every fragment of one span.
#[derive(Debug, Clone)]
pub struct SpanMetrics {
    pub style: Arc<ComputedStyle>,
    pub face_id: usize,
    pub synthetic_bold: bool,
    pub ascent: f32,
    pub descent: f32,
    pub link: Option<usize>,
}

impl SpanMetrics {
    pub fn line_height(&self) -> f32 {
        self.style.line_height()
    }

    /// Distance from the top of a line box of this span's line height to its
    /// baseline, centering the glyph extent in the line (half-leading).
    pub fn baseline_offset(&self) -> f32 {
        let half_leading = (self.line_height() - (self.ascent + self.descent)) / 2.0;
        half_leading + self.ascent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Word,
    Space,
    Newline,
}

/// The smallest unit handed to the line breaker.
#[derive(Debug, Clone)]
pub struct ShapedFragment {
    pub kind: FragmentKind,
    pub span: usize,
    pub text: String,
    pub glyphs: Vec<PositionedGlyph>,
    pub width: f32,
}

/// A paragraph's content, shaped once and re-broken for any width.
#[derive(Debug, Clone, Default)]
pub struct ShapedText {
    pub spans: Vec<SpanMetrics>,
    pub fragments: Vec<ShapedFragment>,
    pub links: Vec<String>,
}

impl ShapedText {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Width of the widest run of words that cannot be broken apart.
    pub fn longest_word_width(&self) -> f32 {
        let mut longest: f32 = 0.0;
        let mut current = 0.0;
        for fragment in &self.fragments {
            if fragment.kind == FragmentKind::Word {
                current += fragment.width;
                longest = longest.max(current);
            } else {
                current = 0.0;
            }
        }
        longest
    }
}

/// Shapes every span of `content`. Words, single collapsed spaces and forced
/// breaks become separate fragments so lines can be broken between them.
pub fn shape_spans(fonts: &FontLibrary, content: InlineContent) -> Result<ShapedText, LayoutError> {
    let mut shaped = ShapedText {
        links: content.links,
        ..ShapedText::default()
    };

    for span in content.spans {
        let span_index = shaped.spans.len();
        let (metrics, fragments) = shape_span(fonts, span, span_index)?;
        shaped.spans.push(metrics);
        shaped.fragments.extend(fragments);
    }
    Ok(shaped)
}

fn shape_span(
    fonts: &FontLibrary,
    span: TextSpan,
    span_index: usize,
) -> Result<(SpanMetrics, Vec<ShapedFragment>), LayoutError> {
    let text_style = &span.style.text;
    let resolved = fonts
        .resolve(&text_style.font_family, text_style.font_weight, text_style.font_style)
        .ok_or_else(|| LayoutError::FontNotFound(text_style.font_family.to_string()))?;
    let face = resolved
        .face
        .shaping_face(resolved.weight)
        .ok_or_else(|| LayoutError::FontUnusable(resolved.face.postscript_name().to_string()))?;

    let font_size = text_style.font_size;
    let scale = resolved.face.scale(font_size);
    let letter_spacing = text_style.letter_spacing;

    let metrics = SpanMetrics {
        face_id: resolved.face.id(),
        synthetic_bold: resolved.face.needs_synthetic_bold(resolved.weight),
        ascent: resolved.face.ascent(font_size),
        descent: resolved.face.descent(font_size),
        link: span.link,
        style: Arc::clone(&span.style),
    };

    let mut fragments = Vec::new();
    let mut space: Option<ShapedFragment> = None;
    for (kind, piece) in split_fragments(&span.text) {
        let fragment = match kind {
            FragmentKind::Newline => ShapedFragment {
                kind,
                span: span_index,
                text: String::new(),
                glyphs: Vec::new(),
                width: 0.0,
            },
            FragmentKind::Space => space
                .get_or_insert_with(|| shape_piece(&face, " ", kind, span_index, scale, letter_spacing))
                .clone(),
            FragmentKind::Word => shape_piece(&face, piece, kind, span_index, scale, letter_spacing),
        };
        fragments.push(fragment);
    }
    Ok((metrics, fragments))
}

fn shape_piece(
    face: &rustybuzz::Face<'_>,
    text: &str,
    kind: FragmentKind,
    span: usize,
    scale: f32,
    letter_spacing: f32,
) -> ShapedFragment {
    let mut buffer = SCRATCH_BUFFER.with(|b| b.borrow_mut().take().unwrap_or_else(UnicodeBuffer::new));
    buffer.push_str(text);
    buffer.guess_segment_properties();

    let glyph_buffer = rustybuzz::shape(face, features(), buffer);
    let infos = glyph_buffer.glyph_infos();
    let positions = glyph_buffer.glyph_positions();

    let mut glyphs = Vec::with_capacity(infos.len());
    let mut width = 0.0;
    for (i, (info, pos)) in infos.iter().zip(positions.iter()).enumerate() {
        let cluster = info.cluster as usize;
        let starts_cluster = i == 0 || infos[i - 1].cluster != info.cluster;
        let source = if starts_cluster {
            let end = infos[i + 1..]
                .iter()
                .map(|next| next.cluster as usize)
                .find(|&c| c > cluster)
                .unwrap_or(text.len());
            text.get(cluster..end).unwrap_or_default().to_string()
        } else {
            String::new()
        };

        let advance = pos.x_advance as f32 * scale + letter_spacing;
        glyphs.push(PositionedGlyph {
            id: info.glyph_id as u16,
            advance,
            x_offset: pos.x_offset as f32 * scale,
            y_offset: pos.y_offset as f32 * scale,
            text: source,
        });
        width += advance;
    }

    let recycled_buffer = glyph_buffer.clear();
    SCRATCH_BUFFER.with(|b| *b.borrow_mut() = Some(recycled_buffer));

    ShapedFragment {
        kind,
        span,
        text: text.to_string(),
        glyphs,
        width,
    }
}

/// Splits text into words, whitespace runs and forced line breaks.
fn split_fragments(text: &str) -> Vec<(FragmentKind, &str)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<FragmentKind> = None;

    for (index, ch) in text.char_indices() {
        let kind = match ch {
            '\n' => FragmentKind::Newline,
            c if c.is_whitespace() => FragmentKind::Space,
            _ => FragmentKind::Word,
        };
        if let Some(open) = current {
            if open != kind || kind == FragmentKind::Newline {
                pieces.push((open, &text[start..index]));
                start = index;
            }
        }
        current = Some(kind);
    }
    if let Some(open) = current {
        pieces.push((open, &text[start..]));
    }
    pieces
}
