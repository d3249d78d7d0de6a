//! Email delivery for CareSend
//!
//! This module owns the SMTP transport lifecycle, attachment resolution and
//! report composition:
//! - transport management and connectivity verification (using lettre)
//! - attachment sources normalized into a single descriptor type
//! - pure, template-driven report composition

pub mod attachment;
pub mod compose;
pub mod smtp;
pub mod transport;

pub use smtp::SmtpMailTransport;
pub use transport::{MailTransport, TransportManager, TransportState};
