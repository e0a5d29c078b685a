use super::value_objects::ObjectKey;
use bytes::Bytes;
use serde::Serialize;

/// Content type of every object written by the upload pipeline.
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Stored images never change under a given key, so CDNs may cache them for a year.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Uploaded file as received from the multipart body.
///
/// Lives in memory for the duration of one request and is dropped once the
/// optimized rendition exists.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub data: Bytes,
    pub file_name: Option<String>,
}

impl RawImage {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            file_name: None,
        }
    }

    /// Declared size of the upload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Web-optimized rendition of a [`RawImage`].
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl OptimizedImage {
    pub const EXTENSION: &'static str = "webp";
    pub const CONTENT_TYPE: &'static str = WEBP_CONTENT_TYPE;

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Object written to the bucket, minus its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub key: ObjectKey,
    pub content_type: String,
    pub cache_control: String,
}

impl StoredObject {
    /// Publicly cacheable WebP object under `key`.
    pub fn webp(key: ObjectKey) -> Self {
        Self {
            key,
            content_type: OptimizedImage::CONTENT_TYPE.to_string(),
            cache_control: IMMUTABLE_CACHE_CONTROL.to_string(),
        }
    }
}
