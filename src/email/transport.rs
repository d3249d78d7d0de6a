//! SMTP transport lifecycle and connectivity verification

use crate::config::{ConfigSummary, EmailConfig};
use crate::domain::{DispatchResult, OutboundMessage};
use crate::email::smtp::SmtpMailTransport;
use crate::error::{MailerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::RwLock;
use tracing::{error, info, warn};

/// Lifecycle state of the process-wide transport
///
/// There is no transition back to `Unconfigured` once `Configured`; the
/// manager is built once at startup and only a restart reconfigures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Credentials missing; delivery is disabled but the process is healthy
    Unconfigured,
    /// SMTP client built; connectivity unknown until verified
    Configured,
    /// Client construction failed (e.g. malformed host)
    Failed,
}

/// Seam between the dispatcher and the wire
///
/// The production implementation is [`SmtpMailTransport`]; tests substitute
/// a mock so orchestration is exercised without a live SMTP endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a fully composed message, returning the assigned message id
    async fn deliver(&self, message: &OutboundMessage) -> Result<DispatchResult>;

    /// Probe that the endpoint is reachable and accepts our credentials
    async fn test_connection(&self) -> Result<()>;
}

/// Owner of the single long-lived SMTP client
///
/// One instance exists per process, constructed at startup and passed to
/// [`crate::ReportMailer`] explicitly. The only mutation after construction
/// is the last-verified diagnostic timestamp.
pub struct TransportManager {
    config: EmailConfig,
    state: TransportState,
    transport: Option<Box<dyn MailTransport>>,
    last_verified_at: RwLock<Option<DateTime<Utc>>>,
}

impl TransportManager {
    /// Build the transport from configuration.
    ///
    /// Missing credentials yield an `Unconfigured` manager rather than an
    /// error; a client construction failure yields `Failed`. Both states
    /// surface as [`MailerError::Configuration`] when delivery is attempted.
    pub fn initialize(config: EmailConfig) -> Self {
        if !config.is_configured() {
            warn!("email credentials missing; set EMAIL_USER and EMAIL_PASS to enable delivery");
            return Self {
                config,
                state: TransportState::Unconfigured,
                transport: None,
                last_verified_at: RwLock::new(None),
            };
        }

        match SmtpMailTransport::from_config(&config) {
            Ok(transport) => {
                info!(host = %config.host, port = config.port, "email transport configured");
                Self {
                    config,
                    state: TransportState::Configured,
                    transport: Some(Box::new(transport)),
                    last_verified_at: RwLock::new(None),
                }
            }
            Err(err) => {
                error!(error = %err, "failed to initialize email transport");
                Self {
                    config,
                    state: TransportState::Failed,
                    transport: None,
                    last_verified_at: RwLock::new(None),
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn with_parts(
        config: EmailConfig,
        state: TransportState,
        transport: Option<Box<dyn MailTransport>>,
    ) -> Self {
        Self {
            config,
            state,
            transport,
            last_verified_at: RwLock::new(None),
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Redacted configuration view; never exposes the secret
    pub fn config_summary(&self) -> ConfigSummary {
        self.config.summary()
    }

    /// When the connection last verified successfully, for diagnostics
    pub fn last_verified_at(&self) -> Option<DateTime<Utc>> {
        self.last_verified_at.read().ok().and_then(|slot| *slot)
    }

    /// Verify that the transport can connect and authenticate.
    ///
    /// Idempotent and callable any number of times. Fails with
    /// [`MailerError::Configuration`] before any network I/O when the
    /// transport is not `Configured`.
    pub async fn verify(&self) -> Result<()> {
        let transport = self.ready_transport()?;

        if let Err(err) = transport.test_connection().await {
            error!(error = %err, "email connection verification failed");
            return Err(err);
        }

        // Diagnostic only; a poisoned lock just loses the timestamp.
        if let Ok(mut slot) = self.last_verified_at.write() {
            *slot = Some(Utc::now());
        }
        Ok(())
    }

    /// Hand a message to the underlying transport
    pub(crate) async fn deliver(&self, message: &OutboundMessage) -> Result<DispatchResult> {
        self.ready_transport()?.deliver(message).await
    }

    fn ready_transport(&self) -> Result<&dyn MailTransport> {
        match (self.state, self.transport.as_deref()) {
            (TransportState::Configured, Some(transport)) => Ok(transport),
            (TransportState::Failed, _) => Err(MailerError::Configuration(
                "email transport failed to initialize; check EMAIL_HOST and EMAIL_PORT".to_string(),
            )),
            _ => Err(MailerError::Configuration(
                "email transport not configured; set EMAIL_USER and EMAIL_PASS".to_string(),
            )),
        }
    }
}
