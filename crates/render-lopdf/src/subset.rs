//! Glyph subsetting for TrueType (`glyf`) font programs.
//!
//! Glyph ids are preserved so the PDF can keep an identity CID-to-GID map:
//! unused glyphs simply become empty outlines. Variation and OpenType layout
//! tables are dropped, since the embedded program only ever renders the
//! default instance through explicit glyph ids.

use std::collections::BTreeSet;

const DROPPED_TABLES: &[&[u8; 4]] = &[
    b"fvar", b"gvar", b"avar", b"cvar", b"HVAR", b"VVAR", b"MVAR", b"STAT", b"GSUB", b"GPOS", b"GDEF",
    b"BASE", b"JSTF", b"DSIG", b"kern", b"hdmx", b"VDMX", b"LTSH", b"meta",
];

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetError {
    Truncated(&'static str),
    MissingTable(&'static str),
}

impl std::fmt::Display for SubsetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubsetError::Truncated(what) => write!(f, "font data truncated in {}", what),
            SubsetError::MissingTable(tag) => write!(f, "font has no '{}' table", tag),
        }
    }
}

struct TableRecord {
    tag: [u8; 4],
    offset: usize,
    length: usize,
}

fn read_u16(data: &[u8], at: usize, what: &'static str) -> Result<u16, SubsetError> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or(SubsetError::Truncated(what))
}

fn read_u32(data: &[u8], at: usize, what: &'static str) -> Result<u32, SubsetError> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(SubsetError::Truncated(what))
}

fn read_tables(data: &[u8]) -> Result<Vec<TableRecord>, SubsetError> {
    let num_tables = read_u16(data, 4, "offset table")? as usize;
    (0..num_tables)
        .map(|i| {
            let record = 12 + i * 16;
            let tag = data
                .get(record..record + 4)
                .ok_or(SubsetError::Truncated("table directory"))?;
            Ok(TableRecord {
                tag: [tag[0], tag[1], tag[2], tag[3]],
                offset: read_u32(data, record + 8, "table directory")? as usize,
                length: read_u32(data, record + 12, "table directory")? as usize,
            })
        })
        .collect()
}

fn table<'a>(data: &'a [u8], tables: &[TableRecord], tag: &'static str) -> Result<&'a [u8], SubsetError> {
    let record = tables
        .iter()
        .find(|t| t.tag.as_slice() == tag.as_bytes())
        .ok_or(SubsetError::MissingTable(tag))?;
    data.get(record.offset..record.offset + record.length)
        .ok_or(SubsetError::Truncated(tag))
}

/// Whether the program stores TrueType outlines (and can be subset here).
pub fn has_glyf_outlines(data: &[u8]) -> bool {
    read_tables(data)
        .map(|tables| tables.iter().any(|t| &t.tag == b"glyf"))
        .unwrap_or(false)
}

fn component_glyphs(glyph: &[u8]) -> Result<Vec<u16>, SubsetError> {
    let mut components = Vec::new();
    if glyph.len() < 10 || (read_u16(glyph, 0, "glyph header")? as i16) >= 0 {
        return Ok(components);
    }

    let mut at = 10;
    loop {
        let flags = read_u16(glyph, at, "composite glyph")?;
        components.push(read_u16(glyph, at + 2, "composite glyph")?);
        at += 4;
        at += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            at += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            at += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            at += 8;
        }
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(components)
}

fn glyph_slice<'a>(glyf: &'a [u8], offsets: &[usize], gid: usize) -> &'a [u8] {
    let (start, end) = (offsets[gid], offsets[gid + 1]);
    if start >= end {
        return &[];
    }
    glyf.get(start..end).unwrap_or(&[])
}

fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Builds a font program containing only `keep` (plus `.notdef` and
/// composite components). Glyph ids are unchanged.
pub fn subset_glyf_font(data: &[u8], keep: &BTreeSet<u16>) -> Result<Vec<u8>, SubsetError> {
    let tables = read_tables(data)?;
    let head = table(data, &tables, "head")?;
    let maxp = table(data, &tables, "maxp")?;
    let loca = table(data, &tables, "loca")?;
    let glyf = table(data, &tables, "glyf")?;

    let num_glyphs = read_u16(maxp, 4, "maxp")? as usize;
    let long_offsets = read_u16(head, 50, "head")? != 0;
    let offsets: Vec<usize> = (0..=num_glyphs)
        .map(|i| {
            if long_offsets {
                read_u32(loca, i * 4, "loca").map(|o| o as usize)
            } else {
                read_u16(loca, i * 2, "loca").map(|o| o as usize * 2)
            }
        })
        .collect::<Result<_, _>>()?;
    let glyph_data = |gid: usize| glyph_slice(glyf, &offsets, gid);

    let mut kept = BTreeSet::new();
    let mut pending: Vec<u16> = keep.iter().copied().chain(std::iter::once(0)).collect();
    while let Some(gid) = pending.pop() {
        if (gid as usize) >= num_glyphs || !kept.insert(gid) {
            continue;
        }
        pending.extend(component_glyphs(glyph_data(gid as usize))?);
    }

    let mut new_glyf = Vec::new();
    let mut new_loca = Vec::with_capacity((num_glyphs + 1) * 4);
    for gid in 0..num_glyphs {
        new_loca.extend_from_slice(&(new_glyf.len() as u32).to_be_bytes());
        if kept.contains(&(gid as u16)) {
            new_glyf.extend_from_slice(glyph_data(gid));
            while new_glyf.len() % 4 != 0 {
                new_glyf.push(0);
            }
        }
    }
    new_loca.extend_from_slice(&(new_glyf.len() as u32).to_be_bytes());

    let mut new_head = head.to_vec();
    if new_head.len() >= 52 {
        new_head[8..12].copy_from_slice(&[0, 0, 0, 0]);
        new_head[50..52].copy_from_slice(&1u16.to_be_bytes());
    }

    let mut out_tables: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    for record in &tables {
        if DROPPED_TABLES.iter().any(|t| **t == record.tag) {
            continue;
        }
        let bytes = match &record.tag {
            b"glyf" => new_glyf.clone(),
            b"loca" => new_loca.clone(),
            b"head" => new_head.clone(),
            _ => data
                .get(record.offset..record.offset + record.length)
                .ok_or(SubsetError::Truncated("table"))?
                .to_vec(),
        };
        out_tables.push((record.tag, bytes));
    }
    out_tables.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(write_sfnt(&out_tables))
}

fn write_sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while (1u16 << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = 12 + tables.len() * 16;
    let mut body = Vec::new();
    for (tag, bytes) in tables {
        out.extend_from_slice(tag);
        out.extend_from_slice(&table_checksum(bytes).to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());

        body.extend_from_slice(bytes);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + tables.len() * 16 + body.len();
    }
    out.extend_from_slice(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_font() -> Option<Vec<u8>> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let query = fontdb::Query {
            families: &[fontdb::Family::Name("DejaVu Sans"), fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        let id = db.query(&query)?;
        let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
        (index == 0 && has_glyf_outlines(&bytes)).then_some(bytes)
    }

    #[test]
    fn composite_components_are_listed() {
        // numberOfContours = -1, bbox, then one component (flags 0, glyph 7, byte args)
        let glyph = [0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0x00, 0x00, 0x00, 0x07, 0, 0];
        assert_eq!(component_glyphs(&glyph).unwrap(), vec![7]);
        assert!(component_glyphs(&[]).unwrap().is_empty());
    }

    #[test]
    fn checksum_pads_the_last_word() {
        assert_eq!(table_checksum(&[0, 0, 0, 1, 1]), 1 + 0x0100_0000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(subset_glyf_font(&[0, 1, 0, 0], &BTreeSet::new()).is_err());
        assert!(!has_glyf_outlines(b"not a font"));
    }

    #[test]
    fn subset_stays_parseable_and_keeps_requested_glyphs() {
        let Some(font) = system_font() else {
            eprintln!("skipping: no TrueType system font available");
            return;
        };
        let face = ttf_parser::Face::parse(&font, 0).unwrap();
        let a = face.glyph_index('A').unwrap().0;
        let num_glyphs = face.number_of_glyphs();

        let subset = subset_glyf_font(&font, &BTreeSet::from([a])).unwrap();
        assert!(subset.len() < font.len());

        let parsed = ttf_parser::Face::parse(&subset, 0).unwrap();
        assert_eq!(parsed.number_of_glyphs(), num_glyphs);
        let mut sink = NullOutline;
        assert!(parsed.outline_glyph(ttf_parser::GlyphId(a), &mut sink).is_some());
        let b = face.glyph_index('B').unwrap();
        assert!(parsed.outline_glyph(b, &mut sink).is_none());
    }

    struct NullOutline;

    impl ttf_parser::OutlineBuilder for NullOutline {
        fn move_to(&mut self, _: f32, _: f32) {}
        fn line_to(&mut self, _: f32, _: f32) {}
        fn quad_to(&mut self, _: f32, _: f32, _: f32, _: f32) {}
        fn curve_to(&mut self, _: f32, _: f32, _: f32, _: f32, _: f32, _: f32) {}
        fn close(&mut self) {}
    }
}
