//! Unified error handling for CareSend Core

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, MailerError>;

/// Delivery error types
///
/// Callers branch on the variant, not the message text. `Configuration` is
/// fatal until the process is reconfigured; `Connection` is transient and may
/// succeed on a later attempt; the attachment variants require different
/// input; `Send` may be either and the core does not distinguish.
#[derive(Error, Debug)]
pub enum MailerError {
    #[error("email transport not configured: {0}")]
    Configuration(String),

    #[error("connection verification failed: {0}")]
    Connection(String),

    #[error("attachment not found: {}", .path.display())]
    AttachmentNotFound { path: PathBuf },

    #[error("invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("failed to send to {recipient}: {reason}")]
    Send { recipient: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MailerError::Send {
            recipient: "p@y.com".to_string(),
            reason: "recipient rejected".to_string(),
        };
        assert_eq!(err.to_string(), "failed to send to p@y.com: recipient rejected");
    }

    #[test]
    fn test_attachment_not_found_display() {
        let err = MailerError::AttachmentNotFound {
            path: PathBuf::from("/reports/missing.pdf"),
        };
        assert!(err.to_string().contains("/reports/missing.pdf"));
    }

    #[test]
    fn test_all_variants_have_messages() {
        let errors = vec![
            MailerError::Configuration("credentials missing".to_string()),
            MailerError::Connection("timeout".to_string()),
            MailerError::AttachmentNotFound {
                path: PathBuf::from("r.pdf"),
            },
            MailerError::InvalidAttachment("empty buffer".to_string()),
            MailerError::Send {
                recipient: "a@x.com".to_string(),
                reason: "rejected".to_string(),
            },
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
