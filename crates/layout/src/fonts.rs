//! Font library used by the layout engine and the PDF writer.
//!
//! A `FontLibrary` maps logical `(family, weight, style)` requests onto parsed
//! font faces. Several weights may point at the same physical face: for a
//! variable font the requested weight is applied to the `wght` axis while
//! shaping, so metrics follow the interpolated instance.
//!
//! The library is assembled once and then shared read-only; nothing in here
//! mutates after registration.

use dossier_style::font::{FontStyle, FontWeight};
use rustybuzz::Variation;
use std::sync::Arc;
use thiserror::Error;
use ttf_parser::{GlyphId, Tag};

const WGHT: Tag = Tag::from_bytes(b"wght");

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("font data could not be parsed: {0}")]
    Parse(String),
}

/// Face-level metrics in font units, as needed for line boxes and the PDF font descriptor.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    pub italic_angle: f32,
    pub is_fixed_pitch: bool,
    /// The weight the face renders at without variation coordinates.
    pub default_weight: u16,
}

/// A parsed font program with the metadata needed for shaping and embedding.
pub struct FontFace {
    id: usize,
    postscript_name: String,
    data: Arc<Vec<u8>>,
    index: u32,
    metrics: FontMetrics,
    weight_axis: Option<(f32, f32)>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id)
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .field("variable", &self.weight_axis.is_some())
            .finish()
    }
}

impl FontFace {
    pub fn parse(id: usize, data: Arc<Vec<u8>>, index: u32) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, index).map_err(|e| FontError::Parse(e.to_string()))?;

        let global_bbox = face.global_bounding_box();
        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [global_bbox.x_min, global_bbox.y_min, global_bbox.x_max, global_bbox.y_max],
            italic_angle: face.italic_angle(),
            is_fixed_pitch: face.is_monospaced(),
            default_weight: face.weight().to_number(),
        };

        let weight_axis = face
            .variation_axes()
            .into_iter()
            .find(|axis| axis.tag == WGHT)
            .map(|axis| (axis.min_value, axis.max_value));

        let postscript_name = extract_postscript_name(&face).unwrap_or_else(|| format!("DossierFont{}", id));

        log::debug!(
            "Parsed font face '{}' ({} bytes, variable: {})",
            postscript_name,
            data.len(),
            weight_axis.is_some()
        );

        Ok(Self {
            id,
            postscript_name,
            data,
            index,
            metrics,
            weight_axis,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn is_variable(&self) -> bool {
        self.weight_axis.is_some()
    }

    /// Creates a shaping view over the font data with the weight axis set.
    /// This is cheap (parsing header) and avoids self-referential struct issues.
    pub fn shaping_face(&self, weight: u16) -> Option<rustybuzz::Face<'_>> {
        let mut face = rustybuzz::Face::from_slice(&self.data, self.index)?;
        if let Some((min, max)) = self.weight_axis {
            face.set_variations(&[Variation {
                tag: WGHT,
                value: (weight as f32).clamp(min, max),
            }]);
        }
        Some(face)
    }

    /// Advance of a glyph in the face's default instance, in font units.
    pub fn default_advance(&self, glyph: u16) -> Option<u16> {
        ttf_parser::Face::parse(&self.data, self.index)
            .ok()?
            .glyph_hor_advance(GlyphId(glyph))
    }

    /// Embedded font programs render the default instance, so heavier weights
    /// than the default must be emboldened by the renderer.
    pub fn needs_synthetic_bold(&self, weight: u16) -> bool {
        weight >= FontWeight::EMPHASIS && self.metrics.default_weight < FontWeight::EMPHASIS
    }

    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.metrics.units_per_em.max(1) as f32
    }

    pub fn ascent(&self, font_size: f32) -> f32 {
        self.metrics.ascender as f32 * self.scale(font_size)
    }

    /// Distance below the baseline, as a positive number.
    pub fn descent(&self, font_size: f32) -> f32 {
        -(self.metrics.descender as f32) * self.scale(font_size)
    }
}

/// Extracts the PostScript name from font data using ttf-parser.
/// Tries the full name and family name as fallbacks.
fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let lookup = |name_id: u16| {
        face.names()
            .into_iter()
            .find(|n| n.name_id == name_id)
            .and_then(|n| n.to_string())
    };

    lookup(ttf_parser::name_id::POST_SCRIPT_NAME)
        .or_else(|| lookup(ttf_parser::name_id::FULL_NAME))
        .or_else(|| lookup(ttf_parser::name_id::FAMILY))
        .map(|name| name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect::<String>())
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Clone)]
struct FontVariant {
    weight: u16,
    style: FontStyle,
    face: Arc<FontFace>,
}

#[derive(Debug, Clone)]
struct FontFamily {
    name: String,
    variants: Vec<FontVariant>,
}

/// A face chosen for a text run, together with the weight to shape it at.
#[derive(Debug, Clone)]
pub struct ResolvedFont<'a> {
    pub face: &'a Arc<FontFace>,
    pub weight: u16,
}

#[derive(Debug, Default)]
pub struct FontLibrary {
    families: Vec<FontFamily>,
    faces: Vec<Arc<FontFace>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a font program and adds it to the set of embeddable faces.
    pub fn load_face(&mut self, data: Vec<u8>) -> Result<Arc<FontFace>, FontError> {
        let face = Arc::new(FontFace::parse(self.faces.len(), Arc::new(data), 0)?);
        self.faces.push(Arc::clone(&face));
        Ok(face)
    }

    /// Maps `(family, weight, style)` to an already loaded face.
    /// Registering the same triple again replaces the earlier mapping.
    pub fn register(&mut self, family: &str, weight: FontWeight, style: FontStyle, face: &Arc<FontFace>) {
        let weight = weight.numeric_value();
        let key = family.to_lowercase();
        let index = match self.families.iter().position(|f| f.name == key) {
            Some(index) => index,
            None => {
                self.families.push(FontFamily {
                    name: key,
                    variants: Vec::new(),
                });
                self.families.len() - 1
            }
        };

        let variants = &mut self.families[index].variants;
        variants.retain(|v| !(v.weight == weight && v.style == style));
        variants.push(FontVariant {
            weight,
            style,
            face: Arc::clone(face),
        });
        log::debug!("Registered '{}' weight {} -> face '{}'", family, weight, face.postscript_name());
    }

    pub fn has_family(&self, family: &str) -> bool {
        let key = family.to_lowercase();
        self.families.iter().any(|f| f.name == key)
    }

    /// All registered `(family, weight)` pairs, in registration order.
    pub fn registrations(&self) -> Vec<(String, u16)> {
        self.families
            .iter()
            .flat_map(|f| f.variants.iter().map(|v| (f.name.clone(), v.weight)))
            .collect()
    }

    /// Every distinct face, as needed for embedding.
    pub fn faces(&self) -> &[Arc<FontFace>] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Resolves a request to a face. Unknown families fall back to the first
    /// registered family; within a family the closest weight wins, preferring
    /// a matching style.
    pub fn resolve(&self, family: &str, weight: FontWeight, style: FontStyle) -> Option<ResolvedFont<'_>> {
        let key = family.to_lowercase();
        let family = self
            .families
            .iter()
            .find(|f| f.name == key)
            .or_else(|| self.families.first())?;

        let requested = weight.numeric_value();
        let variant = family.variants.iter().min_by_key(|v| {
            let style_penalty = if v.style == style { 0 } else { 1000 };
            style_penalty + weight.distance(v.weight)
        })?;

        let weight = if variant.face.is_variable() { requested } else { variant.weight };
        Some(ResolvedFont {
            face: &variant.face,
            weight,
        })
    }
}
