use crate::text::shaper::{FragmentKind, ShapedText};

const EPSILON: f32 = 0.01;

/// One line of a broken paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Fragment indices in visual order; leading and trailing spaces are dropped.
    pub fragments: Vec<usize>,
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub baseline: f32,
}

#[derive(Default)]
struct LineBuilder {
    fragments: Vec<usize>,
    width: f32,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, text: &ShapedText, index: usize) {
        self.fragments.push(index);
        self.width += text.fragments[index].width;
    }

    /// `fallback_span` sizes a line that holds no fragments, i.e. a blank
    /// line produced by consecutive breaks.
    fn finish(&mut self, text: &ShapedText, fallback_span: Option<usize>) -> Line {
        let fragments = std::mem::take(&mut self.fragments);
        let width = std::mem::take(&mut self.width);

        let mut spans: Vec<usize> = fragments.iter().map(|&i| text.fragments[i].span).collect();
        if spans.is_empty() {
            spans.extend(fallback_span);
        }

        let mut height: f32 = 0.0;
        let mut baseline: f32 = 0.0;
        for span in spans {
            let metrics = &text.spans[span];
            height = height.max(metrics.line_height());
            baseline = baseline.max(metrics.baseline_offset());
        }

        Line {
            fragments,
            width,
            height,
            baseline,
        }
    }
}

/// Greedy line breaking at spaces. Words glued together without a space
/// (for example across a style change) never break apart, and a word wider
/// than `max_width` gets a line of its own.
pub fn break_lines(text: &ShapedText, max_width: f32) -> Vec<Line> {
    let fragments = &text.fragments;
    let mut lines = Vec::new();
    let mut current = LineBuilder::default();
    let mut pending_spaces: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < fragments.len() {
        match fragments[i].kind {
            FragmentKind::Newline => {
                lines.push(current.finish(text, Some(fragments[i].span)));
                pending_spaces.clear();
                i += 1;
            }
            FragmentKind::Space => {
                if !current.is_empty() {
                    pending_spaces.push(i);
                }
                i += 1;
            }
            FragmentKind::Word => {
                let start = i;
                let mut word_width = 0.0;
                while i < fragments.len() && fragments[i].kind == FragmentKind::Word {
                    word_width += fragments[i].width;
                    i += 1;
                }
                let space_width: f32 = pending_spaces.iter().map(|&s| fragments[s].width).sum();

                if !current.is_empty() && current.width + space_width + word_width > max_width + EPSILON {
                    lines.push(current.finish(text, None));
                    pending_spaces.clear();
                }
                for space in pending_spaces.drain(..) {
                    current.push(text, space);
                }
                for word in start..i {
                    current.push(text, word);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current.finish(text, None));
    }
    lines
}
