//! Attachment source resolution
//!
//! Normalizes the two PDF sources (a path on disk, an in-memory buffer) into
//! one [`AttachmentDescriptor`] so the dispatcher handles a single type. The
//! bytes themselves are not inspected; content-level PDF validation is out of
//! scope.

use crate::domain::{AttachmentDescriptor, PDF_CONTENT_TYPE};
use crate::error::{MailerError, Result};
use std::path::Path;

/// Resolve a PDF stored on disk.
///
/// Fails with [`MailerError::AttachmentNotFound`] when the path does not
/// exist at resolution time; there is no retry or polling. The dispatcher
/// re-checks existence immediately before sending.
pub async fn resolve_from_path(
    path: impl AsRef<Path>,
    display_name: &str,
) -> Result<AttachmentDescriptor> {
    validate_display_name(display_name)?;

    let path = path.as_ref();
    if !matches!(tokio::fs::try_exists(path).await, Ok(true)) {
        return Err(MailerError::AttachmentNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(AttachmentDescriptor::File {
        path: path.to_path_buf(),
        display_name: display_name.to_string(),
    })
}

/// Resolve a PDF already held in memory.
///
/// Fails with [`MailerError::InvalidAttachment`] when the buffer is empty.
pub fn resolve_from_buffer(bytes: Vec<u8>, display_name: &str) -> Result<AttachmentDescriptor> {
    validate_display_name(display_name)?;

    if bytes.is_empty() {
        return Err(MailerError::InvalidAttachment(
            "attachment buffer is empty".to_string(),
        ));
    }

    Ok(AttachmentDescriptor::Buffer {
        bytes,
        content_type: PDF_CONTENT_TYPE.to_string(),
        display_name: display_name.to_string(),
    })
}

fn validate_display_name(display_name: &str) -> Result<()> {
    if display_name.is_empty() {
        return Err(MailerError::InvalidAttachment(
            "attachment name is empty".to_string(),
        ));
    }
    if !display_name.ends_with(".pdf") {
        return Err(MailerError::InvalidAttachment(format!(
            "attachment name {:?} must end in .pdf",
            display_name
        )));
    }
    Ok(())
}
