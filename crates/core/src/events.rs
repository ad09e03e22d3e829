//! Object-store notification documents and the per-object upload event.
//!
//! Notifications arrive in the S3 event format:
//!
//! ```json
//! {"Records": [{"eventName": "ObjectCreated:Put",
//!               "s3": {"bucket": {"name": "input"},
//!                      "object": {"key": "dev1/http/none/data.csv", "size": 1024}}}]}
//! ```
//!
//! Missing fields decode as empty strings so a partial record still yields
//! an invocation (and therefore an email) instead of rejecting the document.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A full notification document, possibly carrying several records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3EventNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

impl S3EventNotification {
    /// Parse a notification document from raw JSON bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Upload events in record order.
    pub fn upload_events(&self) -> Vec<UploadEvent> {
        self.records.iter().map(UploadEvent::from_record).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3Bucket,
    #[serde(default)]
    pub object: S3Object,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Bucket {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Object {
    /// Form-URL-encoded object key, as delivered by the store.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One uploaded object to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    /// Event name, e.g. `ObjectCreated:Put`
    pub action: String,
    pub bucket_name: String,
    /// Decoded object key
    pub object_key: String,
}

impl UploadEvent {
    pub fn new(
        action: impl Into<String>,
        bucket_name: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            bucket_name: bucket_name.into(),
            object_key: object_key.into(),
        }
    }

    pub fn from_record(record: &S3EventRecord) -> Self {
        Self {
            action: record.event_name.clone(),
            bucket_name: record.s3.bucket.name.clone(),
            object_key: decode_object_key(&record.s3.object.key),
        }
    }
}

/// Decode a form-URL-encoded key (`+` is a space, `%XX` escapes).
///
/// Notification keys never contain raw `&` or `=`, so the whole key is the
/// name half of the first form pair.
pub fn decode_object_key(raw: &str) -> String {
    url::form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(name, _)| name.into_owned())
        .unwrap_or_default()
}
