//! File metadata types

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata describing a single uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Client-supplied filename, verbatim
    pub name: String,
    /// Client-declared MIME type; not verified against content
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Byte length of the decoded upload
    pub size: u64,
    /// Reserved for a client-supplied timestamp; never set server-side
    #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Extension including the leading '.', e.g. ".pdf"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl FileMetadata {
    /// Build metadata from the fields the transport layer exposes for an upload
    pub fn from_upload(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            mime_type: mime_type.into(),
            size,
            last_modified: None,
            extension,
        }
    }
}

/// Derive the extension of a filename: the substring from the last '.'
/// through the end.
///
/// Names without a '.' have no extension. A leading dot with nothing before
/// it (".gitignore") is a hidden-file name, not an extension.
pub fn extension_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(name[idx..].to_string()),
        _ => None,
    }
}

/// Envelope for every answer the analysis endpoint produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadataResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FileMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Request-completion time, ISO-8601
    pub timestamp: String,
}

impl FileMetadataResponse {
    /// Success envelope around extracted metadata
    pub fn ok(data: FileMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: now_iso8601(),
        }
    }

    /// Failure envelope with a human-readable message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            timestamp: now_iso8601(),
        }
    }

    /// Check the envelope against its shape invariants before it goes out.
    ///
    /// A success must carry data; a failure must carry a message and no
    /// data; a present extension must match what the filename derives to.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.success {
            if self.data.is_none() {
                return Err(ValidationError::MissingData);
            }
        } else {
            if self.data.is_some() {
                return Err(ValidationError::UnexpectedData);
            }
            if self.message.is_none() {
                return Err(ValidationError::MissingMessage);
            }
        }
        if let Some(data) = &self.data {
            if data.extension != extension_of(&data.name) {
                return Err(ValidationError::ExtensionMismatch);
            }
        }
        if self.timestamp.is_empty() {
            return Err(ValidationError::EmptyTimestamp);
        }
        Ok(())
    }
}

/// Shape violations caught by [`FileMetadataResponse::validate`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("success response is missing its data payload")]
    MissingData,
    #[error("failure response carries a data payload")]
    UnexpectedData,
    #[error("failure response is missing its message")]
    MissingMessage,
    #[error("extension does not match the filename it was derived from")]
    ExtensionMismatch,
    #[error("response timestamp is empty")]
    EmptyTimestamp,
}

/// Current wall-clock time as ISO-8601 with millisecond precision
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_derivation() {
        assert_eq!(extension_of("document.pdf"), Some(".pdf".to_string()));
        assert_eq!(extension_of("report.final.pdf"), Some(".pdf".to_string()));
        assert_eq!(extension_of("README"), None);
        // Hidden files have no base component, so no extension
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(extension_of("trailing."), Some(".".to_string()));
        assert_eq!(extension_of(""), None);
    }

    #[test]
    fn test_from_upload_populates_extension() {
        let meta = FileMetadata::from_upload("photo.jpeg", "image/jpeg", 2048);
        assert_eq!(meta.name, "photo.jpeg");
        assert_eq!(meta.mime_type, "image/jpeg");
        assert_eq!(meta.size, 2048);
        assert_eq!(meta.extension, Some(".jpeg".to_string()));
        assert_eq!(meta.last_modified, None);
    }

    #[test]
    fn test_success_envelope_validates() {
        let resp = FileMetadataResponse::ok(FileMetadata::from_upload(
            "a.txt",
            "text/plain",
            3,
        ));
        assert!(resp.success);
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn test_failure_envelope_validates() {
        let resp = FileMetadataResponse::failure("no file uploaded");
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_success_without_data() {
        let resp = FileMetadataResponse {
            success: true,
            data: None,
            message: None,
            timestamp: now_iso8601(),
        };
        assert_eq!(resp.validate(), Err(ValidationError::MissingData));
    }

    #[test]
    fn test_validate_rejects_failure_without_message() {
        let resp = FileMetadataResponse {
            success: false,
            data: None,
            message: None,
            timestamp: now_iso8601(),
        };
        assert_eq!(resp.validate(), Err(ValidationError::MissingMessage));
    }

    #[test]
    fn test_validate_rejects_mismatched_extension() {
        let mut meta = FileMetadata::from_upload("notes.txt", "text/plain", 10);
        meta.extension = Some(".pdf".to_string());
        let resp = FileMetadataResponse::ok(meta);
        assert_eq!(resp.validate(), Err(ValidationError::ExtensionMismatch));
    }

    #[test]
    fn test_serde_round_trip() {
        let resp = FileMetadataResponse::ok(FileMetadata::from_upload(
            "document.pdf",
            "application/pdf",
            1_048_576,
        ));
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: FileMetadataResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, resp);
        assert!(parsed.validate().is_ok());

        // Unset optional fields must not appear on the wire
        assert!(!json.contains("lastModified"));
        assert!(!json.contains("message"));
        assert!(json.contains("\"type\":\"application/pdf\""));
    }
}
