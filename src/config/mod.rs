//! SMTP configuration sourced from the process environment
//!
//! `.env` loading is the bootstrap's job; this module only reads whatever is
//! already in the environment. Missing credentials are a valid state and are
//! reported through [`EmailConfig::is_configured`], never a panic.

use serde::Serialize;
use std::env;
use std::fmt;

/// Default SMTP relay when `EMAIL_HOST` is unset
pub const DEFAULT_HOST: &str = "smtp.gmail.com";

/// Default submission port when `EMAIL_PORT` is unset or unparseable
pub const DEFAULT_PORT: u16 = 587;

/// SMTP account credentials
///
/// The secret never appears in `Debug` output, logs, or serialized views.
#[derive(Clone)]
pub struct MailCredentials {
    pub user: String,
    pub secret: String,
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("secret", &"***")
            .finish()
    }
}

/// Email transport configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server host
    pub host: String,
    /// SMTP server port
    pub port: u16,
    /// Implicit TLS (SMTPS) instead of STARTTLS
    pub secure: bool,
    /// Account credentials; `None` leaves the transport unconfigured
    pub credentials: Option<MailCredentials>,
}

impl EmailConfig {
    /// Load configuration from `EMAIL_HOST`, `EMAIL_PORT`, `EMAIL_USER` and
    /// `EMAIL_PASS`.
    ///
    /// `secure` is always `false` here: port 465 does not switch the
    /// transport to implicit TLS. Callers constructing a config by hand may
    /// opt in via the field.
    pub fn from_env() -> Self {
        let credentials = match (env::var("EMAIL_USER"), env::var("EMAIL_PASS")) {
            (Ok(user), Ok(secret)) if !user.is_empty() && !secret.is_empty() => {
                Some(MailCredentials { user, secret })
            }
            _ => None,
        };

        Self {
            host: env::var("EMAIL_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_port(env::var("EMAIL_PORT").ok()),
            secure: false,
            credentials,
        }
    }

    /// Whether both credential fields are present
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Redacted view safe to log or hand to health checks
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            host: self.host.clone(),
            port: self.port,
            secure: self.secure,
            user_present: self.credentials.is_some(),
        }
    }
}

/// Secret-free configuration view
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user_present: bool,
}

// Unparseable values fall back to the default, matching the defaulting the
// callers have always observed.
fn parse_port(value: Option<String>) -> u16 {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
