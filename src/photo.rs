//! Photo Gallery - Photo Records and the Persisted Index
//!
//! `PhotoRecord` is the in-memory shape shown to consumers. `IndexEntry` is the
//! only type that is ever written to the key-value store, and it has no field
//! for image content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::GalleryResult;

/// One captured image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Logical file name, also the file store key
    pub filepath: String,
    /// Session-local reference the renderer can show directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_reference: Option<String>,
    /// `data:` URI of the full image, only present after rehydration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_content: Option<String>,
}

impl PhotoRecord {
    /// Record for a photo captured in the current session
    pub fn captured(filepath: impl Into<String>, display_reference: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            display_reference: Some(display_reference.into()),
            inline_content: None,
        }
    }

    /// Record rebuilt from the index in a later session. Display references
    /// belong to the session that captured the photo and are not carried over.
    pub fn rehydrated(entry: IndexEntry, inline_content: Option<String>) -> Self {
        Self {
            filepath: entry.filepath,
            display_reference: None,
            inline_content,
        }
    }

    /// Something the renderer can use, preferring the transient reference
    pub fn renderable(&self) -> Option<&str> {
        self.display_reference
            .as_deref()
            .or(self.inline_content.as_deref())
    }
}

/// Persisted form of a [`PhotoRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_reference: Option<String>,
}

impl From<&PhotoRecord> for IndexEntry {
    fn from(record: &PhotoRecord) -> Self {
        Self {
            filepath: record.filepath.clone(),
            display_reference: record.display_reference.clone(),
        }
    }
}

/// Serialize a collection into the index wire format (a JSON array)
pub fn encode_index(photos: &[PhotoRecord]) -> GalleryResult<String> {
    let entries: Vec<IndexEntry> = photos.iter().map(IndexEntry::from).collect();
    Ok(serde_json::to_string(&entries)?)
}

/// Parse the index wire format. Unknown fields are ignored.
pub fn decode_index(raw: &str) -> GalleryResult<Vec<IndexEntry>> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode image bytes as a self-contained `data:` URI
pub fn data_uri(bytes: &[u8], fallback_mime: &str) -> String {
    let mime = detect_mime(bytes).unwrap_or(fallback_mime);
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Detect image MIME type from magic bytes
pub fn detect_mime(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    match &data[0..8] {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, ..] => {
            if data.len() >= 12 && &data[8..12] == b"WEBP" {
                Some("image/webp")
            } else {
                None
            }
        }
        _ => {
            if data.len() >= 12 && &data[4..8] == b"ftyp" {
                match &data[8..12] {
                    b"heic" | b"heix" => return Some("image/heic"),
                    b"mif1" => return Some("image/heif"),
                    _ => {}
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_never_carries_inline_content() {
        let photos = vec![
            PhotoRecord::captured("2.jpeg", "blob:session/2"),
            PhotoRecord {
                filepath: "1.jpeg".into(),
                display_reference: None,
                inline_content: Some("data:image/jpeg;base64,AAAA".into()),
            },
        ];

        let raw = encode_index(&photos).unwrap();
        assert_eq!(
            raw,
            r#"[{"filepath":"2.jpeg","displayReference":"blob:session/2"},{"filepath":"1.jpeg"}]"#
        );
        assert!(!raw.contains("inlineContent"));
        assert!(!raw.contains("base64"));
    }

    #[test]
    fn test_decode_ignores_legacy_payload_fields() {
        let raw = r#"[{"filepath":"1.jpeg","base64":"data:image/jpeg;base64,AAAA"}]"#;
        let entries = decode_index(raw).unwrap();
        assert_eq!(
            entries,
            vec![IndexEntry {
                filepath: "1.jpeg".into(),
                display_reference: None
            }]
        );
    }

    #[test]
    fn test_decode_rejects_malformed_index() {
        assert!(decode_index("{\"filepath\":").is_err());
        assert!(decode_index(r#"[{"displayReference":"x"}]"#).is_err());
    }

    #[test]
    fn test_data_uri_sniffs_mime() {
        let png: [u8; 9] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(data_uri(&png, "image/jpeg").starts_with("data:image/png;base64,"));

        let unknown = b"not an image at all";
        assert_eq!(
            data_uri(unknown, "image/jpeg"),
            format!("data:image/jpeg;base64,{}", STANDARD.encode(unknown))
        );
    }

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]), Some("image/jpeg"));
        assert_eq!(detect_mime(b"GIF89a\0\0"), Some("image/gif"));
        assert_eq!(detect_mime(b"RIFF\0\0\0\0WEBP"), Some("image/webp"));
        assert_eq!(detect_mime(b"\0\0\0\x18ftypheic"), Some("image/heic"));
        assert_eq!(detect_mime(b"short"), None);
    }

    #[test]
    fn test_renderable_prefers_transient_reference() {
        let mut record = PhotoRecord::captured("1.jpeg", "file:///tmp/1.jpeg");
        record.inline_content = Some("data:image/jpeg;base64,AAAA".into());
        assert_eq!(record.renderable(), Some("file:///tmp/1.jpeg"));

        record.display_reference = None;
        assert_eq!(record.renderable(), Some("data:image/jpeg;base64,AAAA"));
    }
}
