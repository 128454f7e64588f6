use dossier::fonts::font_library_from_bytes;
use dossier::DocumentRenderer;
use dossier_layout::FontLibrary;
use dossier_traits::ResourceProvider;
use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Loads a TrueType system font, registered the way the engine registers its own.
pub fn system_fonts() -> Option<Arc<FontLibrary>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::Name("DejaVu Sans"), fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    let id = db.query(&query)?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    if index != 0 {
        return None;
    }
    font_library_from_bytes(bytes, "Inter", Path::new("system")).ok().map(Arc::new)
}

/// A renderer over `resources`, or `None` when the machine has no usable font.
pub fn renderer(resources: impl ResourceProvider + 'static) -> Option<DocumentRenderer> {
    let Some(fonts) = system_fonts() else {
        eprintln!("skipping: no system font available");
        return None;
    };
    Some(DocumentRenderer::new(Arc::new(resources), fonts, "Inter"))
}

/// A 2x2 opaque PNG.
pub fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    let image = image::RgbImage::from_pixel(2, 2, image::Rgb([30, 60, 90]));
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Glyph id to text, merged from every `ToUnicode` CMap in the file.
    fn glyph_map(&self) -> BTreeMap<u16, String> {
        let mut map = BTreeMap::new();
        for object in self.doc.objects.values() {
            let Object::Stream(stream) = object else { continue };
            let data = stream.decompressed_content().unwrap_or_else(|_| stream.content.clone());
            let text = String::from_utf8_lossy(&data);
            if !text.contains("beginbfchar") {
                continue;
            }
            for line in text.lines() {
                let parts: Vec<&str> = line.split_whitespace().collect();
                let [gid, unicode] = parts.as_slice() else { continue };
                let (Some(gid), Some(unicode)) = (hex(gid), hex(unicode)) else { continue };
                let Ok(gid) = u16::from_str_radix(gid, 16) else { continue };
                let units: Vec<u16> = unicode
                    .as_bytes()
                    .chunks(4)
                    .filter_map(|c| u16::from_str_radix(std::str::from_utf8(c).ok()?, 16).ok())
                    .collect();
                map.insert(gid, String::from_utf16_lossy(&units));
            }
        }
        map
    }

    /// Text of one page, one line per text object.
    pub fn page_text(&self, page: u32) -> String {
        let map = self.glyph_map();
        let Some(page_id) = self.doc.get_pages().get(&page).copied() else {
            return String::new();
        };
        let Ok(content) = self.doc.get_page_content(page_id) else {
            return String::new();
        };
        let Ok(content) = Content::decode(&content) else {
            return String::new();
        };

        let mut out = String::new();
        for op in content.operations {
            match op.operator.as_str() {
                "TJ" => {
                    for item in op.operands.iter().filter_map(|o| o.as_array().ok()).flatten() {
                        if let Object::String(bytes, _) = item {
                            for pair in bytes.chunks(2) {
                                let gid = u16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)]);
                                out.push_str(map.get(&gid).map(String::as_str).unwrap_or(""));
                            }
                        }
                    }
                }
                "ET" => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    pub fn text(&self) -> String {
        (1..=self.page_count() as u32).map(|p| self.page_text(p)).collect::<Vec<_>>().join("\n")
    }

    /// Whitespace-insensitive containment, since word spacing may be positional.
    pub fn contains_text(&self, needle: &str) -> bool {
        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        squash(&self.text()).contains(&squash(needle))
    }

    /// `URI` targets of the link annotations on a page.
    pub fn link_targets(&self, page: u32) -> Vec<String> {
        let Some(page_id) = self.doc.get_pages().get(&page).copied() else {
            return Vec::new();
        };
        let Ok(page) = self.doc.get_dictionary(page_id) else {
            return Vec::new();
        };
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            return Vec::new();
        };
        annots
            .iter()
            .filter_map(|a| self.doc.get_dictionary(a.as_reference().ok()?).ok())
            .filter_map(|a| a.get(b"A").ok()?.as_dict().ok()?.get(b"URI").ok()?.as_str().ok())
            .map(|uri| String::from_utf8_lossy(uri).into_owned())
            .collect()
    }

    pub fn all_link_targets(&self) -> Vec<String> {
        (1..=self.page_count() as u32).flat_map(|p| self.link_targets(p)).collect()
    }

    /// Color image XObjects; soft masks are not counted.
    pub fn image_count(&self) -> usize {
        self.doc
            .objects
            .values()
            .filter_map(|o| o.as_stream().ok())
            .filter(|s| {
                s.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice())
                    && s.dict.get(b"ColorSpace").and_then(Object::as_name).ok() != Some(b"DeviceGray".as_slice())
            })
            .count()
    }
}

fn hex(token: &str) -> Option<&str> {
    token.strip_prefix('<')?.strip_suffix('>')
}
