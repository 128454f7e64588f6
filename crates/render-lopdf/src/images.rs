//! Raster images prepared for embedding as image XObjects.

use crate::error::RenderError;
use crate::writer::PdfObjectWriter;
use dossier_layout::ImageMetrics;
use image::GenericImageView;
use lopdf::{dictionary, Dictionary, ObjectId};
use std::collections::BTreeMap;

/// Pixel data in the form the PDF stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    /// Baseline or progressive JPEG, embedded unchanged with `DCTDecode`.
    Jpeg { bytes: Vec<u8>, gray: bool },
    /// 8-bit RGB samples, with an optional 8-bit alpha plane for the soft mask.
    Rgb { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A decoded image ready to be written into the document.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: ImageData,
}

/// Number of color components declared in the first JPEG frame header.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut at = 2;
    while at + 4 <= data.len() {
        if data[at] != 0xFF {
            return None;
        }
        let marker = data[at + 1];
        let length = u16::from_be_bytes([data[at + 2], data[at + 3]]) as usize;
        // SOF0..SOF15, excluding DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return data.get(at + 9).copied();
        }
        at += 2 + length;
    }
    None
}

impl DecodedImage {
    pub fn decode(src: &str, bytes: &[u8]) -> Result<Self, RenderError> {
        let image_error = |reason: String| RenderError::Image {
            src: src.to_string(),
            reason,
        };
        let format = image::guess_format(bytes).map_err(|e| image_error(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format).map_err(|e| image_error(e.to_string()))?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(image_error("image has no pixels".to_string()));
        }

        if format == image::ImageFormat::Jpeg {
            match jpeg_components(bytes) {
                Some(1) => {
                    return Ok(Self {
                        width,
                        height,
                        data: ImageData::Jpeg { bytes: bytes.to_vec(), gray: true },
                    });
                }
                Some(3) => {
                    return Ok(Self {
                        width,
                        height,
                        data: ImageData::Jpeg { bytes: bytes.to_vec(), gray: false },
                    });
                }
                // CMYK and other layouts are re-encoded as RGB below.
                _ => {}
            }
        }

        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        let mut has_alpha = false;
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            has_alpha |= a != 255;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }

        Ok(Self {
            width,
            height,
            data: ImageData::Rgb {
                rgb,
                alpha: has_alpha.then_some(alpha),
            },
        })
    }

    fn write(&self, writer: &mut PdfObjectWriter) -> Result<ObjectId, RenderError> {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "BitsPerComponent" => 8,
        };
        match &self.data {
            ImageData::Jpeg { bytes, gray } => {
                dict.set("ColorSpace", if *gray { "DeviceGray" } else { "DeviceRGB" });
                dict.set("Filter", "DCTDecode");
                writer.buffer_stream(dict, bytes.clone())
            }
            ImageData::Rgb { rgb, alpha } => {
                dict.set("ColorSpace", "DeviceRGB");
                if let Some(alpha) = alpha {
                    let smask = dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => self.width as i64,
                        "Height" => self.height as i64,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    };
                    let smask_id = writer.buffer_stream(smask, alpha.clone())?;
                    dict.set("SMask", smask_id);
                }
                writer.buffer_stream(dict, rgb.clone())
            }
        }
    }
}

/// Decoded images keyed by their source reference.
#[derive(Debug, Default, Clone)]
pub struct ImageSet {
    images: BTreeMap<String, DecodedImage>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, image: DecodedImage) {
        self.images.insert(src.into(), image);
    }

    pub fn get(&self, src: &str) -> Option<&DecodedImage> {
        self.images.get(src)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pixel sizes for the layout engine; only these sources get laid out.
    pub fn metrics(&self) -> ImageMetrics {
        let mut metrics = ImageMetrics::new();
        for (src, image) in &self.images {
            metrics.insert(src.clone(), image.width, image.height);
        }
        metrics
    }
}

/// Writes every image the pages use, returning the `/XObject` resource
/// dictionary and the resource name for each source.
pub fn embed_images<'a>(
    writer: &mut PdfObjectWriter,
    images: &ImageSet,
    used: impl IntoIterator<Item = &'a str>,
) -> Result<(Dictionary, BTreeMap<String, String>), RenderError> {
    let mut xobjects = Dictionary::new();
    let mut names = BTreeMap::new();
    for src in used {
        if names.contains_key(src) {
            continue;
        }
        let image = images
            .get(src)
            .ok_or_else(|| RenderError::MissingResource(format!("image '{}'", src)))?;
        let name = format!("Im{}", names.len());
        let id = image.write(writer)?;
        xobjects.set(name.as_bytes(), id);
        names.insert(src.to_string(), name);
    }
    Ok((xobjects, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Cursor;

    fn encode(format: image::ImageFormat, with_alpha: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        if with_alpha {
            let img = ImageBuffer::from_fn(4, 2, |x, _| Rgba([200u8, 10, 10, if x == 0 { 0 } else { 255 }]));
            img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        } else {
            let img = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
            img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        }
        bytes
    }

    #[test]
    fn jpeg_is_passed_through() {
        let bytes = encode(image::ImageFormat::Jpeg, false);
        let image = DecodedImage::decode("a.jpg", &bytes).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.data, ImageData::Jpeg { bytes, gray: false });
    }

    #[test]
    fn png_with_transparency_gets_a_soft_mask() {
        let bytes = encode(image::ImageFormat::Png, true);
        let image = DecodedImage::decode("a.png", &bytes).unwrap();
        match image.data {
            ImageData::Rgb { rgb, alpha: Some(alpha) } => {
                assert_eq!(rgb.len(), 4 * 2 * 3);
                assert_eq!(alpha[0], 0);
                assert_eq!(alpha[1], 255);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn opaque_png_has_no_mask() {
        let bytes = encode(image::ImageFormat::Png, false);
        let image = DecodedImage::decode("a.png", &bytes).unwrap();
        assert!(matches!(image.data, ImageData::Rgb { alpha: None, .. }));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let result = DecodedImage::decode("broken.png", b"not an image");
        assert!(matches!(result, Err(RenderError::Image { ref src, .. }) if src == "broken.png"));
    }

    #[test]
    fn metrics_cover_every_image() {
        let mut set = ImageSet::new();
        let bytes = encode(image::ImageFormat::Png, false);
        set.insert("a.png", DecodedImage::decode("a.png", &bytes).unwrap());
        let metrics = set.metrics();
        assert!(metrics.contains("a.png"));
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn embedding_reuses_names_per_source() {
        let mut set = ImageSet::new();
        let bytes = encode(image::ImageFormat::Png, true);
        set.insert("a.png", DecodedImage::decode("a.png", &bytes).unwrap());

        let mut writer = PdfObjectWriter::new("1.7");
        let (xobjects, names) = embed_images(&mut writer, &set, ["a.png", "a.png"]).unwrap();
        assert_eq!(xobjects.len(), 1);
        assert_eq!(names.get("a.png").map(String::as_str), Some("Im0"));

        let missing = embed_images(&mut writer, &set, ["b.png"]);
        assert!(matches!(missing, Err(RenderError::MissingResource(_))));
    }
}
