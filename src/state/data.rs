/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the generation client, the iteration store and the UI layer.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// An image held in memory: declared mime type plus raw bytes
///
/// Bytes are shared, so cloning an image (into a task, a message,
/// an iteration) never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Mime type as declared by the producer (e.g., "image/png")
    pub mime_type: String,
    /// Raw binary payload
    pub bytes: Arc<[u8]>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Decode a base64 payload as found in inline wire parts
    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Result<Self, base64::DecodeError> {
        let bytes = STANDARD.decode(data.trim())?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// File extension matching the mime type, "png" when unknown
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.to_ascii_lowercase().as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            other => image::ImageFormat::from_mime_type(other)
                .and_then(|format| format.extensions_str().first().copied())
                .unwrap_or("png"),
        }
    }
}

/// Reference to a node of the lineage graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// The uploaded source image
    Source,
    /// A generated iteration, by id
    Iteration(String),
}

impl NodeRef {
    pub fn iteration_id(&self) -> Option<&str> {
        match self {
            NodeRef::Source => None,
            NodeRef::Iteration(id) => Some(id),
        }
    }
}

/// One generated image, tied to the prompt and base that produced it
///
/// Iterations are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    /// Unique id (UUID v4)
    pub id: String,
    /// The generated image
    pub image: EncodedImage,
    /// Prompt that produced it
    pub prompt: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Base the generation ran against (None = text-only generation)
    pub parent: Option<NodeRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base64() {
        let image = EncodedImage::new("image/png", vec![1u8, 2, 3]);
        assert_eq!(image.to_base64(), "AQID");
    }

    #[test]
    fn test_from_base64() {
        let image = EncodedImage::from_base64("image/webp", "AQID").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(&*image.bytes, &[1u8, 2, 3]);
        assert_eq!(image.byte_len(), 3);

        assert!(EncodedImage::from_base64("image/png", "not base64!").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(EncodedImage::new("image/png", vec![0u8]).file_extension(), "png");
        assert_eq!(EncodedImage::new("image/JPEG", vec![0u8]).file_extension(), "jpg");
        assert_eq!(EncodedImage::new("image/webp", vec![0u8]).file_extension(), "webp");
        assert_eq!(EncodedImage::new("application/x-unknown", vec![0u8]).file_extension(), "png");
    }

    #[test]
    fn test_clone_shares_payload() {
        let image = EncodedImage::new("image/png", vec![9u8; 1024]);
        let copy = image.clone();
        assert!(Arc::ptr_eq(&image.bytes, &copy.bytes));
    }
}
