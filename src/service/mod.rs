//! Service layer

pub mod mailer;

pub use mailer::{MailerStatus, ReportMailer};
