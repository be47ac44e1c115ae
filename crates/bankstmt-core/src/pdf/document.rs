//! PDF loading, text and image access using lopdf and pdf-extract.

use std::cell::OnceCell;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PageSource, Result};
use crate::error::PdfError;

/// A PDF held in memory. Parsing happens on first use, so building one is
/// free and a document that no stage touches is never parsed.
pub struct PdfDocument {
    raw_data: Vec<u8>,
    decrypt_empty_password: bool,
    loaded: OnceCell<std::result::Result<Loaded, PdfError>>,
}

struct Loaded {
    document: Document,
    /// Bytes handed to pdf-extract; the decrypted copy when the source was
    /// encrypted.
    plain_data: Vec<u8>,
}

impl PdfDocument {
    /// Wrap PDF bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            raw_data: data.into(),
            decrypt_empty_password: true,
            loaded: OnceCell::new(),
        }
    }

    /// Whether to try the empty password on encrypted documents.
    pub fn with_empty_password(mut self, enabled: bool) -> Self {
        self.decrypt_empty_password = enabled;
        self
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load(&self) -> std::result::Result<Loaded, PdfError> {
        let mut document =
            Document::load_mem(&self.raw_data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let plain_data = if document.is_encrypted() {
            if !self.decrypt_empty_password || document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            self.raw_data.clone()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Loaded {
            document,
            plain_data,
        })
    }

    fn page_id(&self, page: u32) -> Result<(&Document, ObjectId)> {
        let doc = &self.loaded()?.document;
        let page_id = doc
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))?;
        Ok((doc, page_id))
    }

    /// Every image object in the document, whichever page uses it.
    pub fn all_images(&self) -> Result<Vec<DynamicImage>> {
        let doc = &self.loaded()?.document;
        let images: Vec<DynamicImage> = doc
            .objects
            .values()
            .filter_map(|object| decode_image_object(doc, object))
            .collect();

        debug!("Found {} images in document", images.len());
        Ok(images)
    }
}

impl PageSource for PdfDocument {
    fn direct_text(&self) -> Result<String> {
        let loaded = self.loaded()?;
        pdf_extract::extract_text_from_mem(&loaded.plain_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn page_count(&self) -> Result<u32> {
        Ok(self.loaded()?.document.get_pages().len() as u32)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let (doc, _) = self.page_id(page)?;
        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(format!("page {}: {}", page, e)))
    }

    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let (doc, page_id) = self.page_id(page)?;

        let mut images = Vec::new();
        if let Some(resources) = page_resources(doc, page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobject_dict))) = doc.dereference(xobjects) {
                    for (_name, reference) in xobject_dict.iter() {
                        if let Ok((_, object)) = doc.dereference(reference) {
                            if let Some(image) = decode_image_object(doc, object) {
                                images.push(image);
                            }
                        }
                    }
                }
            }
        }

        // single-page scans sometimes hang their image off an unlinked object
        if images.is_empty() && doc.get_pages().len() == 1 {
            debug!("No XObject images found on page {}, scanning all objects", page);
            images = self.all_images()?;
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}

/// Resources of a page, following `/Parent` links for inherited ones.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(resource_dict))) = doc.dereference(resources) {
            return Some(resource_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}

/// Decode an image XObject. JPEG streams and 8-bit RGB/gray samples are
/// supported; anything else is skipped.
fn decode_image_object(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = image_dimension(dict, b"Width")?;
    let height = image_dimension(dict, b"Height")?;
    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(filters) => filters.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Skipping image with unsupported filter");
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(items) => items.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    raw_samples_to_image(&data, width, height, color_space, bits)
}

/// A positive image dimension that fits in `u32`.
fn image_dimension(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    let value = dict.get(key).ok()?.as_i64().ok()?;
    u32::try_from(value).ok().filter(|v| *v > 0)
}

fn raw_samples_to_image(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: i64,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    if width == 0 || height == 0 {
        return None;
    }

    let pixels = (width as usize).checked_mul(height as usize)?;
    let channels = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => return None,
    };
    let sample_len = pixels.checked_mul(channels)?;
    let rgba_len = pixels.checked_mul(4)?;
    if data.len() < sample_len {
        trace!(
            "Short image data: {} bytes for {} pixels",
            data.len(),
            pixels
        );
        return None;
    }

    let mut rgba = Vec::with_capacity(rgba_len);
    for sample in data[..sample_len].chunks_exact(channels) {
        match sample {
            [r, g, b] => rgba.extend_from_slice(&[*r, *g, *b, 255]),
            [gray] => rgba.extend_from_slice(&[*gray, *gray, *gray, 255]),
            _ => return None,
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}
