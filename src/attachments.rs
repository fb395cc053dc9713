//! File attachments: data URI encoding, upload reading, and decoding for
//! viewing.
//!
//! Attachments are stored inline as `data:<mime>;base64,<payload>`, the same
//! shape a browser `FileReader.readAsDataURL` produces, so records written by
//! either side stay interchangeable.

use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;

use crate::config::MAX_ATTACHMENT_BYTES;
use crate::models::{FileAttachment, FileInput};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("No data available")]
    MissingData,

    #[error("Invalid data format")]
    InvalidFormat,

    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("File size cannot exceed {limit} bytes ({size} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded form of a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    let mime = if mime_type.is_empty() { FALLBACK_MIME } else { mime_type };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Split a data URI at the first comma and decode the payload.
pub fn decode_data_uri(uri: &str) -> Result<DataUri, AttachmentError> {
    let (header, payload) = uri.split_once(',').ok_or(AttachmentError::InvalidFormat)?;
    if payload.is_empty() {
        return Err(AttachmentError::InvalidFormat);
    }

    let mime_type = header
        .strip_prefix("data:")
        .and_then(|h| h.split(';').next())
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    Ok(DataUri { mime_type, bytes })
}

fn check_size(size: u64) -> Result<(), AttachmentError> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            size,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

impl FileInput {
    /// Encode raw bytes, enforcing the upload size limit.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<Self, AttachmentError> {
        check_size(bytes.len() as u64)?;
        let mime_type = mime_type.into();
        let data = encode_data_uri(&mime_type, bytes);
        Ok(Self {
            name: name.into(),
            mime_type,
            data,
        })
    }
}

/// Read a user-selected file into an upload payload.
///
/// The size is checked from metadata before any bytes are read; the MIME
/// type is guessed from the extension.
pub async fn read_upload(path: &Path) -> Result<FileInput, AttachmentError> {
    let size = tokio::fs::metadata(path).await?.len();
    check_size(size)?;

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!(file = %name, size, mime = %mime_type, "Upload read");
    FileInput::from_bytes(name, mime_type, &bytes)
}

/// An attachment decoded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedFile {
    /// Write the bytes into `dir` so an external viewer can open them.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, AttachmentError> {
        let path = dir.join(safe_file_name(&self.name));
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Decode an attachment for viewing. Failures are returned, never panicked.
pub fn open_attachment(file: &FileAttachment) -> Result<DecodedFile, AttachmentError> {
    if file.data.trim().is_empty() {
        tracing::warn!(file_id = %file.id, "Attachment has no data");
        return Err(AttachmentError::MissingData);
    }
    let decoded = decode_data_uri(&file.data).inspect_err(|e| {
        tracing::warn!(file_id = %file.id, error = %e, "Attachment could not be decoded");
    })?;

    let mime_type = if !file.mime_type.is_empty() {
        file.mime_type.clone()
    } else {
        decoded.mime_type.unwrap_or_else(|| FALLBACK_MIME.to_string())
    };

    Ok(DecodedFile {
        name: file.name.clone(),
        mime_type,
        bytes: decoded.bytes,
    })
}

fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').trim();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn attachment(mime: &str, data: &str) -> FileAttachment {
        FileAttachment {
            id: "f1".into(),
            name: "xray.png".into(),
            mime_type: mime.into(),
            data: data.into(),
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn encodes_mime_prefixed_base64() {
        assert_eq!(encode_data_uri("text/plain", b"hi"), "data:text/plain;base64,aGk=");
        assert_eq!(
            encode_data_uri("", b"hi"),
            "data:application/octet-stream;base64,aGk="
        );
    }

    #[test]
    fn decodes_header_and_payload() {
        let uri = decode_data_uri("data:image/png;base64,iVBORw==").unwrap();
        assert_eq!(uri.mime_type.as_deref(), Some("image/png"));
        assert_eq!(uri.bytes, vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn payload_without_comma_is_invalid() {
        assert!(matches!(
            decode_data_uri("aGk="),
            Err(AttachmentError::InvalidFormat)
        ));
        assert!(matches!(
            decode_data_uri("data:text/plain;base64,"),
            Err(AttachmentError::InvalidFormat)
        ));
    }

    #[test]
    fn malformed_base64_is_an_error() {
        assert!(matches!(
            decode_data_uri("data:text/plain;base64,@@@"),
            Err(AttachmentError::Base64(_))
        ));
    }

    #[test]
    fn oversized_input_rejected() {
        let bytes = vec![0u8; (MAX_ATTACHMENT_BYTES + 1) as usize];
        let err = FileInput::from_bytes("big.bin", "application/octet-stream", &bytes).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
    }

    #[test]
    fn open_missing_data_fails_cleanly() {
        let err = open_attachment(&attachment("image/png", "")).unwrap_err();
        assert_eq!(err.to_string(), "No data available");
    }

    #[test]
    fn open_falls_back_to_uri_mime_then_octet_stream() {
        let from_uri = open_attachment(&attachment("", "data:image/png;base64,aGk=")).unwrap();
        assert_eq!(from_uri.mime_type, "image/png");

        let fallback = open_attachment(&attachment("", "data:;base64,aGk=")).unwrap();
        assert_eq!(fallback.mime_type, FALLBACK_MIME);
        assert_eq!(fallback.bytes, b"hi");
    }

    #[test]
    fn decoded_file_saved_with_safe_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = DecodedFile {
            name: "../../etc/passwd".into(),
            mime_type: "text/plain".into(),
            bytes: b"x".to_vec(),
        };
        let path = file.save_to(dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(path).unwrap(), b"x");
    }

    #[tokio::test]
    async fn read_upload_encodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let input = read_upload(&path).await.unwrap();
        assert_eq!(input.name, "notes.txt");
        assert_eq!(input.mime_type, "text/plain");
        assert_eq!(input.data, "data:text/plain;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn read_upload_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_upload(&dir.path().join("absent.pdf")).await.unwrap_err();
        assert!(matches!(err, AttachmentError::Io(_)));
    }
}
