use crate::error::RenderError;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Collects PDF objects for one document and serializes them on `finish`.
///
/// The catalog, page tree and shared resource dictionary get their ids up
/// front so pages can reference them before they are written.
pub struct PdfObjectWriter {
    document: Document,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    info: Option<Dictionary>,
}

impl PdfObjectWriter {
    pub fn new(version: &str) -> Self {
        let mut document = Document::with_version(version);
        let resources_id = document.new_object_id();
        let pages_id = document.new_object_id();
        let catalog_id = document.new_object_id();
        Self {
            document,
            catalog_id,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            info: None,
        }
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.document.new_object_id()
    }

    pub fn buffer_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.document.add_object(object)
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: impl Into<Object>) {
        self.document.objects.insert(id, object.into());
    }

    /// Adds a binary stream, Flate-compressed unless it already carries a filter.
    pub fn buffer_stream(&mut self, dict: Dictionary, data: Vec<u8>) -> Result<ObjectId, RenderError> {
        let mut stream = Stream::new(dict, data);
        if stream.dict.get(b"Filter").is_err() {
            stream.compress()?;
        }
        Ok(self.buffer_object(stream))
    }

    pub fn buffer_content_stream(&mut self, content: Content) -> Result<ObjectId, RenderError> {
        let data = content.encode()?;
        self.buffer_stream(dictionary! {}, data)
    }

    pub fn set_resources(&mut self, resources: Dictionary) {
        self.buffer_object_at_id(self.resources_id, resources);
    }

    pub fn add_page(&mut self, page_id: ObjectId) {
        self.page_ids.push(page_id);
    }

    pub fn set_info(&mut self, info: Dictionary) {
        self.info = Some(info);
    }

    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict);

        let catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        self.buffer_object_at_id(self.catalog_id, catalog_dict);
        self.document.trailer.set("Root", self.catalog_id);

        if let Some(info) = self.info.take() {
            let info_id = self.buffer_object(info);
            self.document.trailer.set("Info", info_id);
        }

        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Encodes a PDF text string: PDFDocEncoding-compatible ASCII stays literal,
/// anything else becomes UTF-16BE with a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
