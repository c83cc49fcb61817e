//! Uploaded document records and upload intake.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::DocumentId;
use crate::mime::MimeType;

/// A stored document: the original file name, its type, and the full payload
/// as base64 text.
///
/// Records are created on upload and never mutated; they are only deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: MimeType,
    #[serde(rename = "base64Content")]
    pub content: String,
}

impl DocumentRecord {
    /// Validates an upload and assigns it a generated ID.
    ///
    /// Rejects empty names, MIME types outside the accepted set, and content
    /// that is not standard padded base64.
    pub fn from_upload(name: &str, mime: &str, content: &str) -> Result<Self, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::EmptyField { field: "name" });
        }
        let mime_type: MimeType = mime.parse()?;
        STANDARD
            .decode(content.as_bytes())
            .map_err(|err| CoreError::InvalidContent {
                reason: err.to_string(),
            })?;

        Ok(DocumentRecord {
            id: DocumentId::generate(name),
            name: name.to_string(),
            mime_type,
            content: content.to_string(),
        })
    }

    /// Size of the decoded payload in bytes, or `None` if the stored text is
    /// not valid base64.
    pub fn decoded_len(&self) -> Option<usize> {
        STANDARD.decode(self.content.as_bytes()).ok().map(|b| b.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_valid_upload() {
        let doc = DocumentRecord::from_upload("a.png", "image/png", "QQ==").unwrap();
        assert_eq!(doc.name, "a.png");
        assert_eq!(doc.mime_type, MimeType::Png);
        assert_eq!(doc.content, "QQ==");
        assert!(doc.id.as_str().starts_with("a.png-"));
        assert_eq!(doc.decoded_len(), Some(1));
    }

    #[test]
    fn rejects_unsupported_type() {
        let err = DocumentRecord::from_upload("notes.txt", "text/plain", "QQ==").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedMimeType { .. }));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = DocumentRecord::from_upload("a.pdf", "application/pdf", "not base64!").unwrap_err();
        assert!(matches!(err, CoreError::InvalidContent { .. }));
    }

    #[test]
    fn rejects_blank_name() {
        let err = DocumentRecord::from_upload("  ", "image/jpeg", "QQ==").unwrap_err();
        assert!(matches!(err, CoreError::EmptyField { field: "name" }));
    }

    #[test]
    fn wire_format_matches_upload_shape() {
        let doc = DocumentRecord {
            id: DocumentId::from("a-1"),
            name: "a.png".into(),
            mime_type: MimeType::Png,
            content: "QQ==".into(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "a-1",
                "name": "a.png",
                "type": "image/png",
                "base64Content": "QQ=="
            })
        );
    }

    proptest! {
        #[test]
        fn any_encoded_payload_passes_intake(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let encoded = STANDARD.encode(&bytes);
            let doc = DocumentRecord::from_upload("scan.pdf", "application/pdf", &encoded).unwrap();
            prop_assert_eq!(doc.decoded_len(), Some(bytes.len()));
        }
    }
}
