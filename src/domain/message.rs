//! Outbound message domain types

use serde::Serialize;
use std::path::{Path, PathBuf};

/// MIME type carried by every report attachment
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Normalized attachment source, resolved once and handled uniformly by the
/// dispatcher.
///
/// Exactly one variant is populated; `display_name` is non-empty and ends in
/// `.pdf` (enforced at resolution, see [`crate::email::attachment`]).
#[derive(Debug, Clone)]
pub enum AttachmentDescriptor {
    /// PDF on disk, read at send time
    File { path: PathBuf, display_name: String },
    /// PDF already in memory
    Buffer {
        bytes: Vec<u8>,
        content_type: String,
        display_name: String,
    },
}

impl AttachmentDescriptor {
    /// Filename presented to the recipient
    pub fn display_name(&self) -> &str {
        match self {
            Self::File { display_name, .. } | Self::Buffer { display_name, .. } => display_name,
        }
    }

    /// MIME content type of the attachment
    pub fn content_type(&self) -> &str {
        match self {
            Self::File { .. } => PDF_CONTENT_TYPE,
            Self::Buffer { content_type, .. } => content_type,
        }
    }

    /// Backing path for file-sourced attachments
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Buffer { .. } => None,
        }
    }
}

/// A fully composed message, immutable once built
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: AttachmentDescriptor,
}

impl OutboundMessage {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        attachment: AttachmentDescriptor,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            attachment,
        }
    }
}

/// Outcome of a successful dispatch
///
/// Failures are [`crate::MailerError`] values; a `DispatchResult` is only
/// ever produced for a delivered message, so it carries no success flag.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    /// RFC 5322 Message-ID stamped into the outgoing message
    pub message_id: String,
    pub recipient: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accessors_file() {
        let descriptor = AttachmentDescriptor::File {
            path: PathBuf::from("/reports/r.pdf"),
            display_name: "report.pdf".to_string(),
        };

        assert_eq!(descriptor.display_name(), "report.pdf");
        assert_eq!(descriptor.content_type(), "application/pdf");
        assert_eq!(descriptor.file_path(), Some(Path::new("/reports/r.pdf")));
    }

    #[test]
    fn test_descriptor_accessors_buffer() {
        let descriptor = AttachmentDescriptor::Buffer {
            bytes: vec![1, 2, 3],
            content_type: PDF_CONTENT_TYPE.to_string(),
            display_name: "report.pdf".to_string(),
        };

        assert_eq!(descriptor.display_name(), "report.pdf");
        assert!(descriptor.file_path().is_none());
    }

    #[test]
    fn test_outbound_message_construction() {
        let message = OutboundMessage::new(
            "p@y.com",
            "Subject",
            "Body",
            AttachmentDescriptor::Buffer {
                bytes: vec![0x25],
                content_type: PDF_CONTENT_TYPE.to_string(),
                display_name: "r.pdf".to_string(),
            },
        );

        assert_eq!(message.recipient, "p@y.com");
        assert_eq!(message.subject, "Subject");
        assert_eq!(message.body, "Body");
        assert_eq!(message.attachment.display_name(), "r.pdf");
    }

    #[test]
    fn test_dispatch_result_serialization() {
        let result = DispatchResult {
            message_id: "<abc@x.com>".to_string(),
            recipient: "p@y.com".to_string(),
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"message_id\""));
        assert!(json.contains("p@y.com"));
    }
}
