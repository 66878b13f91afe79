//! Multipart body building and file attachment loading.

use std::path::Path;

use jimeng_domain::{FileAttachment, Part, PartValue};
use reqwest::multipart::{self, Form};

/// Error type for body building operations.
#[derive(Debug, thiserror::Error)]
pub enum BodyBuildError {
    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// Failed to read file.
    #[error("Failed to read file: {message}")]
    FileReadError {
        /// Reason, prefixed with the path.
        message: String,
    },

    /// Invalid body configuration.
    #[error("Invalid body configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },
}

/// Reads a local file into an attachment, guessing its MIME type from the extension.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub async fn load_attachment(path: &Path) -> Result<FileAttachment, BodyBuildError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BodyBuildError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            BodyBuildError::FileReadError {
                message: format!("{}: {}", path.display(), e),
            }
        }
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(FileAttachment::new(file_name, bytes).with_content_type(mime_type.essence_str()))
}

/// Builds a reqwest multipart form with the parts in order.
///
/// # Errors
///
/// Returns an error if an attachment carries an unparsable MIME type.
pub fn build_multipart_form(parts: &[Part]) -> Result<Form, BodyBuildError> {
    let mut form = Form::new();

    for part in parts {
        match &part.value {
            PartValue::Text(value) => {
                form = form.text(part.name.clone(), value.clone());
            }
            PartValue::File(attachment) => {
                let mime_type = attachment
                    .content_type
                    .clone()
                    .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
                let file_part = multipart::Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone())
                    .mime_str(&mime_type)
                    .map_err(|e| BodyBuildError::InvalidConfig {
                        message: format!("Invalid MIME type: {e}"),
                    })?;
                form = form.part(part.name.clone(), file_part);
            }
        }
    }

    Ok(form)
}
