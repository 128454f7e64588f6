//! Embeds the faces used by a document as Type0 / CID fonts.
//!
//! Text is written as 2-byte glyph ids (`Identity-H`), so any glyph the
//! shaper produced can be shown. The `ToUnicode` map carries the source
//! text of each glyph to keep the document searchable and extractable.

use crate::error::RenderError;
use crate::subset::{has_glyf_outlines, subset_glyf_font};
use crate::writer::PdfObjectWriter;
use dossier_layout::{FontFace, FontLibrary, LayoutElement, LayoutPage};
use lopdf::{dictionary, Dictionary, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::Arc;

/// Glyph usage for one face across the whole document.
#[derive(Debug, Default)]
pub struct GlyphUsage {
    /// Glyph id to the text it stands for (first occurrence wins).
    glyphs: BTreeMap<u16, String>,
}

impl GlyphUsage {
    pub fn record(&mut self, glyph: u16, text: &str) {
        let entry = self.glyphs.entry(glyph).or_default();
        if entry.is_empty() && !text.is_empty() {
            *entry = text.to_string();
        }
    }

    pub fn glyph_ids(&self) -> BTreeSet<u16> {
        self.glyphs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Collects, per face id, which glyphs the pages draw.
pub fn collect_glyph_usage(pages: &[LayoutPage]) -> BTreeMap<usize, GlyphUsage> {
    let mut usage: BTreeMap<usize, GlyphUsage> = BTreeMap::new();
    for page in pages {
        for el in &page.elements {
            if let LayoutElement::Text(text) = &el.element {
                let face_usage = usage.entry(text.face_id).or_default();
                for glyph in &text.glyphs {
                    face_usage.record(glyph.id, &glyph.text);
                }
            }
        }
    }
    usage
}

/// The resource name (`/F0`, `/F1`, ...) a face is referenced by in content streams.
pub fn font_resource_name(face_id: usize) -> String {
    format!("F{}", face_id)
}

/// Widths in glyph-space units (1/1000 em) of a face's default instance.
pub struct GlyphWidths {
    widths: BTreeMap<u16, f32>,
}

impl GlyphWidths {
    pub fn for_face(face: &FontFace, glyphs: impl IntoIterator<Item = u16>) -> Self {
        let units = face.metrics().units_per_em.max(1) as f32;
        let widths = glyphs
            .into_iter()
            .map(|gid| {
                let advance = face.default_advance(gid).unwrap_or(0) as f32;
                (gid, advance * 1000.0 / units)
            })
            .collect();
        Self { widths }
    }

    pub fn from_map(widths: BTreeMap<u16, f32>) -> Self {
        Self { widths }
    }

    pub fn get(&self, glyph: u16) -> f32 {
        self.widths.get(&glyph).copied().unwrap_or(0.0)
    }

    /// `[gid [w]]` runs, one entry per glyph.
    fn to_w_array(&self) -> Vec<Object> {
        let mut array = Vec::with_capacity(self.widths.len() * 2);
        for (&gid, &width) in &self.widths {
            array.push(Object::Integer(gid as i64));
            array.push(Object::Array(vec![Object::Integer(width.round() as i64)]));
        }
        array
    }
}

/// Per-face information the page painter needs.
pub struct EmbeddedFont {
    pub resource_name: String,
    pub widths: GlyphWidths,
}

/// Writes font objects for every used face and returns the `/Font`
/// resource dictionary together with painter-side metrics.
pub fn embed_fonts(
    writer: &mut PdfObjectWriter,
    library: &FontLibrary,
    usage: &BTreeMap<usize, GlyphUsage>,
) -> Result<(Dictionary, BTreeMap<usize, EmbeddedFont>), RenderError> {
    let mut font_dict = Dictionary::new();
    let mut embedded = BTreeMap::new();

    for (&face_id, glyphs) in usage {
        let face = library
            .faces()
            .get(face_id)
            .ok_or_else(|| RenderError::MissingResource(format!("font face {}", face_id)))?;
        let widths = GlyphWidths::for_face(face, glyphs.glyph_ids());
        let font_id = write_type0_font(writer, face, glyphs, &widths)?;

        let resource_name = font_resource_name(face_id);
        font_dict.set(resource_name.as_bytes(), font_id);
        log::debug!(
            "Embedded font '{}' as /{} with {} glyph(s)",
            face.postscript_name(),
            resource_name,
            glyphs.len()
        );
        embedded.insert(face_id, EmbeddedFont { resource_name, widths });
    }

    Ok((font_dict, embedded))
}

/// Six uppercase letters derived from the glyph set, as PDF subset tags require.
fn subset_tag(face: &FontFace, glyphs: &GlyphUsage) -> String {
    let mut hash: u32 = 0x811C_9DC5;
    for gid in glyphs.glyphs.keys() {
        for byte in gid.to_be_bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
    }
    hash ^= face.id() as u32;
    (0..6)
        .map(|i| (b'A' + ((hash >> (i * 5)) % 26) as u8) as char)
        .collect()
}

fn write_type0_font(
    writer: &mut PdfObjectWriter,
    face: &Arc<FontFace>,
    glyphs: &GlyphUsage,
    widths: &GlyphWidths,
) -> Result<ObjectId, RenderError> {
    let data = face.data();
    let is_truetype = has_glyf_outlines(data);
    let base_font = format!("{}+{}", subset_tag(face, glyphs), face.postscript_name());

    let (program_key, program_id, cid_subtype) = if is_truetype {
        let program = subset_glyf_font(data, &glyphs.glyph_ids()).map_err(|e| RenderError::Font {
            font: face.postscript_name().to_string(),
            reason: e.to_string(),
        })?;
        let length = program.len() as i64;
        let id = writer.buffer_stream(dictionary! { "Length1" => length }, program)?;
        ("FontFile2", id, "CIDFontType2")
    } else {
        let id = writer.buffer_stream(dictionary! { "Subtype" => "OpenType" }, data.to_vec())?;
        ("FontFile3", id, "CIDFontType0")
    };

    let metrics = face.metrics();
    let units = metrics.units_per_em.max(1) as f32;
    let scaled = |v: i16| Object::Integer((v as f32 * 1000.0 / units).round() as i64);
    let mut flags = 32; // nonsymbolic
    if metrics.is_fixed_pitch {
        flags |= 1;
    }
    let descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_font.clone().into_bytes()),
        "Flags" => flags,
        "FontBBox" => metrics.bbox.iter().map(|v| scaled(*v)).collect::<Vec<_>>(),
        "ItalicAngle" => metrics.italic_angle,
        "Ascent" => scaled(metrics.ascender),
        "Descent" => scaled(metrics.descender),
        "CapHeight" => scaled(metrics.cap_height),
        "StemV" => 80,
        program_key => program_id,
    };
    let descriptor_id = writer.buffer_object(descriptor);

    let mut cid_font = dictionary! {
        "Type" => "Font",
        "Subtype" => cid_subtype,
        "BaseFont" => Object::Name(base_font.clone().into_bytes()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 0,
        "W" => widths.to_w_array(),
    };
    if is_truetype {
        cid_font.set("CIDToGIDMap", "Identity");
    }
    let cid_font_id = writer.buffer_object(cid_font);

    let to_unicode_id = writer.buffer_stream(dictionary! {}, to_unicode_cmap(glyphs).into_bytes())?;

    Ok(writer.buffer_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(base_font.into_bytes()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    }))
}

fn utf16_hex(text: &str) -> String {
    text.encode_utf16().fold(String::new(), |mut out, unit| {
        let _ = write!(out, "{:04X}", unit);
        out
    })
}

/// A `ToUnicode` CMap mapping each glyph id to its source text.
pub fn to_unicode_cmap(glyphs: &GlyphUsage) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(u16, &str)> = glyphs
        .glyphs
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(gid, text)| (*gid, text.as_str()))
        .collect();
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, text) in chunk {
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, utf16_hex(text));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
