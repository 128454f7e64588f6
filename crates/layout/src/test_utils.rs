use crate::fonts::FontLibrary;
use dossier_style::font::{FontStyle, FontWeight};

/// Finds a sans-serif system font so tests can shape real text.
/// Returns `None` on machines without any installed fonts.
pub fn system_font_bytes() -> Option<Vec<u8>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::Name("DejaVu Sans"), fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    (index == 0).then_some(bytes)
}

/// A library with one face registered as "Inter" regular and semibold.
pub fn test_library() -> Option<FontLibrary> {
    let bytes = system_font_bytes()?;
    let mut library = FontLibrary::new();
    let face = library.load_face(bytes).ok()?;
    library.register("Inter", FontWeight::Regular, FontStyle::Normal, &face);
    library.register("Inter", FontWeight::SemiBold, FontStyle::Normal, &face);
    Some(library)
}

/// An engine over [`test_library`] with "Inter" as the default family.
pub fn test_engine() -> Option<crate::LayoutEngine> {
    let library = test_library()?;
    let config = crate::LayoutConfig {
        default_font_family: "Inter".to_string(),
        ..crate::LayoutConfig::default()
    };
    Some(crate::LayoutEngine::new(std::sync::Arc::new(library), config))
}
