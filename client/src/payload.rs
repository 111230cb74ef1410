use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AcquisitionError;

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSource {
    #[default]
    File,
    CameraFrame,
}

/// Image bytes ready to be sent, together with their declared media type.
///
/// Cloning is cheap: the bytes are shared with any [`PreviewHandle`] made from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    bytes: Arc<[u8]>,
    media_type: String,
    file_name: String,
    source: ImageSource,
}

impl Payload {
    pub fn new(bytes: impl Into<Arc<[u8]>>, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        let file_name = default_file_name(&media_type);
        Self {
            bytes: bytes.into(),
            media_type,
            file_name,
            source: ImageSource::File,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.source = source;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    /// Name sent with the multipart part. Multipart servers only treat a part
    /// as an uploaded file when it carries one.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn preview(&self) -> PreviewHandle {
        PreviewHandle {
            bytes: Arc::clone(&self.bytes),
            media_type: self.media_type.clone(),
        }
    }
}

fn default_file_name(media_type: &str) -> String {
    let extension = match media_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        other => mime_guess::get_mime_extensions_str(other).and_then(|exts| exts.first().copied()),
    };

    match extension {
        Some(ext) => format!("image.{}", ext),
        None => "image".to_string(),
    }
}

/// Displayable reference to the image currently held as payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    bytes: Arc<[u8]>,
    media_type: String,
}

impl PreviewHandle {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.media_type, &self.bytes)
    }

    /// True when this preview renders exactly the payload's image.
    pub fn shows(&self, payload: &Payload) -> bool {
        self.media_type == payload.media_type
            && (Arc::ptr_eq(&self.bytes, &payload.bytes) || self.bytes == payload.bytes)
    }
}

pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Decodes a `data:<mediaType>;base64,<data>` string as produced by a camera
/// screenshot. The `data:` scheme prefix is optional.
pub fn decode_data_uri(encoded: &str) -> Result<Payload, AcquisitionError> {
    let (header, data) = encoded
        .split_once(',')
        .ok_or_else(|| AcquisitionError::MalformedFrame("missing data-uri header".into()))?;

    let header = header.strip_prefix("data:").unwrap_or(header);
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| AcquisitionError::MalformedFrame("frame is not base64 encoded".into()))?;
    // Parameters such as `;charset=` are not part of the media type.
    let media_type = media_type.split(';').next().unwrap_or_default().trim();

    if media_type.is_empty() {
        return Err(AcquisitionError::MalformedFrame("missing media type".into()));
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| AcquisitionError::MalformedFrame(format!("invalid base64 payload: {}", e)))?;

    if bytes.is_empty() {
        return Err(AcquisitionError::MalformedFrame("empty frame".into()));
    }

    Ok(Payload::new(bytes, media_type).with_source(ImageSource::CameraFrame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_jpeg_data_uri() {
        let payload = decode_data_uri("data:image/jpeg;base64,QUJD").unwrap();
        assert_eq!(payload.bytes(), b"ABC");
        assert_eq!(payload.media_type(), "image/jpeg");
        assert_eq!(payload.file_name(), "image.jpg");
        assert_eq!(payload.source(), ImageSource::CameraFrame);
    }

    #[test]
    fn header_prefix_is_optional() {
        let payload = decode_data_uri("image/png;base64,QUJD").unwrap();
        assert_eq!(payload.media_type(), "image/png");
        assert_eq!(payload.bytes(), b"ABC");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            decode_data_uri("QUJD"),
            Err(AcquisitionError::MalformedFrame(_))
        ));
        // What a browser returns for an empty canvas.
        assert!(matches!(
            decode_data_uri("data:,"),
            Err(AcquisitionError::MalformedFrame(_))
        ));
        assert!(matches!(
            decode_data_uri("data:;base64,QUJD"),
            Err(AcquisitionError::MalformedFrame(_))
        ));
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_data_uri("data:image/jpeg;base64,@@@"),
            Err(AcquisitionError::MalformedFrame(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/jpeg;base64,"),
            Err(AcquisitionError::MalformedFrame(_))
        ));
    }

    #[test]
    fn preview_shares_payload_bytes() {
        let payload = Payload::new(vec![1u8, 2, 3], "image/webp").with_file_name("lunch.webp");
        let preview = payload.preview();

        assert!(preview.shows(&payload));
        assert_eq!(preview.media_type(), "image/webp");
        assert_eq!(payload.file_name(), "lunch.webp");
        assert_eq!(payload.source(), ImageSource::File);
        assert_eq!(decode_data_uri(&preview.to_data_uri()).unwrap().bytes(), payload.bytes());
    }

    #[test]
    fn unknown_media_type_gets_plain_name() {
        assert_eq!(Payload::new(vec![0u8], "application/x-unknown-thing").file_name(), "image");
    }
}
