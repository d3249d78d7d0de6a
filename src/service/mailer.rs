//! Report delivery orchestration
//!
//! [`ReportMailer`] is the surface the HTTP layer talks to: status, connection
//! verification, single sends (file or buffer sourced), and bulk patient
//! report runs with per-item failure isolation.

use crate::domain::{BulkFailure, BulkItem, BulkReport, DispatchResult, OutboundMessage};
use crate::email::transport::{TransportManager, TransportState};
use crate::email::{attachment, compose};
use crate::error::{MailerError, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};

/// Current configuration and connectivity state, safe for health checks
///
/// The account secret is never part of this record.
#[derive(Debug, Clone, Serialize)]
pub struct MailerStatus {
    pub configured: bool,
    pub host: String,
    pub port: u16,
    /// "Configured" or "Not configured"
    pub user: String,
}

/// Patient report delivery service
///
/// One instance exists per process, owning the [`TransportManager`] built at
/// startup. Single-item operations fail fast with a typed error; bulk runs
/// always complete and report per-item outcomes as data.
pub struct ReportMailer {
    transport: TransportManager,
}

impl ReportMailer {
    pub fn new(transport: TransportManager) -> Self {
        Self { transport }
    }

    /// Current service status; pure read, no I/O
    pub fn status(&self) -> MailerStatus {
        let summary = self.transport.config_summary();
        MailerStatus {
            configured: self.transport.state() == TransportState::Configured,
            host: summary.host,
            port: summary.port,
            user: if summary.user_present {
                "Configured"
            } else {
                "Not configured"
            }
            .to_string(),
        }
    }

    /// Verify that the transport can connect and authenticate
    pub async fn verify_connection(&self) -> Result<()> {
        self.transport.verify().await
    }

    /// Send one email with a PDF attachment read from disk
    pub async fn send_with_pdf_from_file(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        pdf_path: impl AsRef<Path>,
        display_name: &str,
    ) -> Result<DispatchResult> {
        let attachment = attachment::resolve_from_path(pdf_path, display_name).await?;
        let message = OutboundMessage::new(to, subject, body, attachment);
        self.dispatch(&message).await
    }

    /// Send one email with an in-memory PDF attachment
    pub async fn send_with_pdf_from_buffer(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        pdf_bytes: Vec<u8>,
        display_name: &str,
    ) -> Result<DispatchResult> {
        let attachment = attachment::resolve_from_buffer(pdf_bytes, display_name)?;
        let message = OutboundMessage::new(to, subject, body, attachment);
        self.dispatch(&message).await
    }

    /// Send a patient their risk assessment report
    pub async fn send_patient_report(
        &self,
        email: &str,
        patient_name: Option<&str>,
        patient_id: &str,
        pdf_path: impl AsRef<Path>,
    ) -> Result<DispatchResult> {
        let display_name =
            compose::report_attachment_name(patient_id, Utc::now().date_naive());
        let attachment = attachment::resolve_from_path(pdf_path, &display_name).await?;
        let message = compose::patient_report(email, patient_name, patient_id, attachment);
        self.dispatch(&message).await
    }

    /// Send risk assessment reports to a batch of patients.
    ///
    /// Items are processed strictly one at a time, each to completion before
    /// the next starts: this bounds concurrent load on the SMTP endpoint and
    /// keeps failure attribution unambiguous, at the cost of throughput. A
    /// per-item failure is recorded and the run continues; the batch itself
    /// never fails.
    pub async fn send_bulk_patient_reports(&self, items: Vec<BulkItem>) -> BulkReport {
        let mut report = BulkReport::default();

        for item in items {
            match self
                .send_patient_report(
                    &item.email,
                    item.patient_name.as_deref(),
                    &item.patient_id,
                    &item.pdf_path,
                )
                .await
            {
                Ok(result) => report.successful.push(result),
                Err(err) => {
                    warn!(recipient = %item.email, error = %err, "bulk report delivery failed for recipient");
                    report.failed.push(BulkFailure {
                        error: err.to_string(),
                        item,
                    });
                }
            }
        }

        info!(
            successful = report.successful.len(),
            failed = report.failed.len(),
            "bulk report delivery completed"
        );
        report
    }

    /// Dispatch one composed message: verify, re-check a file-backed
    /// attachment, then exactly one send. No retry at any step.
    async fn dispatch(&self, message: &OutboundMessage) -> Result<DispatchResult> {
        self.transport.verify().await?;

        // The file may have been deleted between resolution and now.
        if let Some(path) = message.attachment.file_path() {
            if !matches!(tokio::fs::try_exists(path).await, Ok(true)) {
                return Err(MailerError::AttachmentNotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        match self.transport.deliver(message).await {
            Ok(result) => {
                info!(recipient = %result.recipient, message_id = %result.message_id, "email sent");
                Ok(result)
            }
            Err(err) => {
                error!(recipient = %message.recipient, error = %err, "email delivery failed");
                Err(err)
            }
        }
    }
}
