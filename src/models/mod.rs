use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;

/// Wire format of `FileDescriptor::modified_at`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One stored file, derived from filesystem metadata on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    /// Last modification in server local time, minute precision.
    #[serde(rename = "date", with = "minute_format")]
    #[schema(value_type = String, example = "2026-01-15 09:30")]
    pub modified_at: NaiveDateTime,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, modified: SystemTime) -> Self {
        let local = chrono::DateTime::<chrono::Local>::from(modified).naive_local();
        let modified_at = local
            .date()
            .and_hms_opt(local.hour(), local.minute(), 0)
            .unwrap_or(local);

        Self {
            name: name.into(),
            size,
            modified_at,
        }
    }

    /// The `date` field as it appears on the wire.
    pub fn date(&self) -> String {
        self.modified_at.format(DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Stored filename, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl UploadResponse {
    pub fn stored(file: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "File uploaded successfully".to_string(),
            file: Some(file.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            file: None,
        }
    }
}

mod minute_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
