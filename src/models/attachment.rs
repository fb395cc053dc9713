use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File embedded in a patient or appointment record.
///
/// `data` is a data URI (`data:<mime>;base64,<payload>`). It may be empty
/// for records written by older clients; viewing such a file fails cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
    pub upload_date: DateTime<Utc>,
}

/// Upload payload before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInput {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data: String,
}
