//! SVG path data and `viewBox` parsing for vector icons.
//!
//! `svgtypes` resolves relative, shorthand and arc commands; quadratics are
//! raised to cubics here so every segment maps onto a PDF path operator.
//! Parsing stops at the first malformed segment and keeps everything before it.

use std::str::FromStr;
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    CurveTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// A parsed `viewBox`: origin and size of the artwork's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn parse(value: &str) -> Option<Self> {
        let parsed = svgtypes::ViewBox::from_str(value).ok()?;
        let view_box = Self {
            min_x: parsed.x as f32,
            min_y: parsed.y as f32,
            width: parsed.w as f32,
            height: parsed.h as f32,
        };
        (view_box.width > 0.0 && view_box.height > 0.0).then_some(view_box)
    }

    /// Uniform scale and offset that fit this box centered into `width` x `height`.
    pub fn fit(&self, width: f32, height: f32) -> (f32, f32, f32) {
        let scale = (width / self.width).min(height / self.height);
        let dx = (width - self.width * scale) / 2.0 - self.min_x * scale;
        let dy = (height - self.height * scale) / 2.0 - self.min_y * scale;
        (scale, dx, dy)
    }
}

/// Parses SVG path data (`M L H V C S Q T A Z`, absolute and relative).
pub fn parse_path(data: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current = (0.0_f32, 0.0_f32);
    let mut start = current;

    for segment in SimplifyingPathParser::from(data) {
        let segment = match segment {
            Ok(segment) => segment,
            Err(e) => {
                log::debug!("Stopped parsing path data: {}", e);
                break;
            }
        };
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                current = (x as f32, y as f32);
                start = current;
                segments.push(PathSegment::MoveTo(current.0, current.1));
            }
            SimplePathSegment::LineTo { x, y } => {
                current = (x as f32, y as f32);
                segments.push(PathSegment::LineTo(current.0, current.1));
            }
            SimplePathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                current = (x as f32, y as f32);
                segments.push(PathSegment::CurveTo(
                    x1 as f32, y1 as f32, x2 as f32, y2 as f32, current.0, current.1,
                ));
            }
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let (x0, y0) = current;
                let (qx, qy) = (x1 as f32, y1 as f32);
                let (x, y) = (x as f32, y as f32);
                segments.push(PathSegment::CurveTo(
                    x0 + 2.0 / 3.0 * (qx - x0),
                    y0 + 2.0 / 3.0 * (qy - y0),
                    x + 2.0 / 3.0 * (qx - x),
                    y + 2.0 / 3.0 * (qy - y),
                    x,
                    y,
                ));
                current = (x, y);
            }
            SimplePathSegment::ClosePath => {
                current = start;
                segments.push(PathSegment::Close);
            }
        }
    }

    segments
}
