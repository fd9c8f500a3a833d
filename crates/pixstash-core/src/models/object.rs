use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque, collision-resistant object name (UUID v4, hyphenated)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stored filename for this id with the given extension (leading dot or empty)
    pub fn filename(&self, extension: &str) -> String {
        format!("{}{}", self.0, extension)
    }
}

impl From<Uuid> for ObjectId {
    fn from(id: Uuid) -> Self {
        ObjectId(id.hyphenated().to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        ObjectId(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a transcode attempt was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    DecodeError,
    EncodeError,
    StorageError,
    WorkerPanicked,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::DecodeError => "decode_error",
            FailureKind::EncodeError => "encode_error",
            FailureKind::StorageError => "storage_error",
            FailureKind::WorkerPanicked => "worker_panicked",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the conversion step for one upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Transcoded to the delivery format; `bytes` is the encoded size
    Converted { bytes: u64 },
    /// Not attempted (opaque format or conversion disabled)
    Skipped,
    /// Attempted and abandoned; the original bytes were stored instead
    Failed { kind: FailureKind, reason: String },
}

impl ConversionOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }
}

/// Durable description of a stored object
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredObject {
    pub object_id: ObjectId,
    /// Effective extension after conversion, with leading dot (may be empty)
    pub extension: String,
    /// `<object_id><extension>`
    pub filename: String,
    /// Lower-cased extension of the client filename, with leading dot (may be empty)
    pub original_extension: String,
    /// Bytes actually written to storage
    pub size_bytes: u64,
    pub was_converted: bool,
    pub conversion: ConversionOutcome,
    pub created_at: DateTime<Utc>,
}

impl StoredObject {
    pub fn new(
        object_id: ObjectId,
        extension: impl Into<String>,
        original_extension: impl Into<String>,
        size_bytes: u64,
        conversion: ConversionOutcome,
    ) -> Self {
        let extension = extension.into();
        Self {
            filename: object_id.filename(&extension),
            object_id,
            extension,
            original_extension: original_extension.into(),
            size_bytes,
            was_converted: conversion.is_converted(),
            conversion,
            created_at: Utc::now(),
        }
    }
}

/// Response body for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original_extension: String,
    pub size: u64,
    pub converted_to_webp: bool,
    pub message: String,
}

impl UploadResponse {
    pub fn from_stored(object: &StoredObject, url: String) -> Self {
        Self {
            url,
            filename: object.filename.clone(),
            original_extension: object.original_extension.clone(),
            size: object.size_bytes,
            converted_to_webp: object.was_converted,
            message: "File uploaded successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_from_uuid_is_hyphenated() {
        let id = ObjectId::from(Uuid::new_v4());
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(id.as_str().matches('-').count(), 4);
        assert_eq!(id.filename(".webp"), format!("{}.webp", id));
        assert_eq!(id.filename(""), id.to_string());
    }

    #[test]
    fn test_stored_object_derives_filename_and_flag() {
        let id = ObjectId::from("abc".to_string());
        let obj = StoredObject::new(
            id.clone(),
            ".webp",
            ".png",
            42,
            ConversionOutcome::Converted { bytes: 42 },
        );
        assert_eq!(obj.filename, "abc.webp");
        assert!(obj.was_converted);

        let obj = StoredObject::new(
            id,
            ".png",
            ".png",
            0,
            ConversionOutcome::Failed {
                kind: FailureKind::DecodeError,
                reason: "empty input".to_string(),
            },
        );
        assert_eq!(obj.filename, "abc.png");
        assert!(!obj.was_converted);
    }

    #[test]
    fn test_upload_response_omits_empty_original_extension() {
        let obj = StoredObject::new(
            ObjectId::from("abc".to_string()),
            "",
            "",
            3,
            ConversionOutcome::Skipped,
        );
        let body = UploadResponse::from_stored(&obj, "http://localhost:4000/uploads/abc".into());
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("original_extension").is_none());
        assert_eq!(json["message"], "File uploaded successfully");
        assert_eq!(json["converted_to_webp"], false);
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let outcome = ConversionOutcome::Failed {
            kind: FailureKind::WorkerPanicked,
            reason: "boom".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "worker_panicked");
    }
}
