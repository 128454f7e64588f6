//! Link annotations for the clickable areas collected while painting.

use crate::painter::LinkArea;
use crate::writer::{text_string, PdfObjectWriter};
use lopdf::{dictionary, Object, ObjectId};

/// Writes one `/Link` annotation with a URI action per area.
pub fn create_link_annotations(writer: &mut PdfObjectWriter, links: &[LinkArea]) -> Vec<ObjectId> {
    links
        .iter()
        .filter(|link| !link.href.is_empty())
        .map(|link| {
            let action = dictionary! {
                "Type" => "Action",
                "S" => "URI",
                "URI" => Object::string_literal(link.href.as_str()),
            };
            let rect: Vec<Object> = link.rect.iter().map(|v| Object::Real(*v)).collect();
            let annot = dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => rect,
                "Border" => vec![0.into(), 0.into(), 0.into()],
                "A" => action,
            };
            writer.buffer_object(annot)
        })
        .collect()
}

/// The document information dictionary.
pub fn info_dictionary(title: &str, producer: &str, creation_date: Option<&str>) -> lopdf::Dictionary {
    let mut info = dictionary! {
        "Producer" => text_string(producer),
        "Title" => text_string(title),
    };
    if let Some(date) = creation_date {
        info.set("CreationDate", Object::string_literal(date));
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hrefs_are_skipped() {
        let mut writer = PdfObjectWriter::new("1.7");
        let links = vec![
            LinkArea { rect: [0.0, 0.0, 10.0, 10.0], href: "https://example.com/a".into() },
            LinkArea { rect: [0.0, 0.0, 10.0, 10.0], href: String::new() },
        ];
        assert_eq!(create_link_annotations(&mut writer, &links).len(), 1);
    }

    #[test]
    fn info_has_optional_creation_date() {
        let info = info_dictionary("Jane Doe", "dossier", None);
        assert!(info.get(b"CreationDate").is_err());
        let info = info_dictionary("Jane Doe", "dossier", Some("D:20261019000000Z"));
        assert_eq!(
            info.get(b"CreationDate").unwrap(),
            &Object::string_literal("D:20261019000000Z")
        );
    }
}
