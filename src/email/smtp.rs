//! SMTP delivery implementation using lettre

use crate::config::EmailConfig;
use crate::domain::{AttachmentDescriptor, DispatchResult, OutboundMessage};
use crate::email::transport::MailTransport;
use crate::error::{MailerError, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

/// Lettre-backed SMTP transport
///
/// Holds the long-lived SMTP client; messages go out as `multipart/mixed`
/// with a plain-text part and the PDF attachment part. The `From` header is
/// the configured account user, matching what the relay authenticates as.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailTransport {
    /// Build the SMTP client from configuration.
    ///
    /// `secure` selects implicit TLS (`relay`); otherwise the connection
    /// upgrades via STARTTLS (`starttls_relay`). Credentials are required;
    /// an unconfigured state never reaches this constructor through
    /// [`crate::email::TransportManager`].
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let credentials = config.credentials.as_ref().ok_or_else(|| {
            MailerError::Configuration(
                "credentials are required to build an SMTP transport".to_string(),
            )
        })?;

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|err| {
            MailerError::Configuration(format!("invalid SMTP relay {}: {}", config.host, err))
        })?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.secret.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from_address: credentials.user.clone(),
        })
    }

    /// Mint the Message-ID stamped into the outgoing message.
    ///
    /// SMTP servers do not hand back an identifier on the wire, so the id is
    /// assigned client-side and reported to the caller.
    fn mint_message_id(&self) -> String {
        let domain = self
            .from_address
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("localhost");
        format!("<{}@{}>", Uuid::new_v4(), domain)
    }

    fn build_message(
        &self,
        message: &OutboundMessage,
        pdf_bytes: Vec<u8>,
        message_id: &str,
    ) -> Result<Message> {
        let from: Mailbox = self.from_address.parse().map_err(|err| {
            MailerError::Configuration(format!(
                "invalid from address {}: {}",
                self.from_address, err
            ))
        })?;

        let to: Mailbox = message.recipient.parse().map_err(|err| MailerError::Send {
            recipient: message.recipient.clone(),
            reason: format!("invalid recipient address: {}", err),
        })?;

        let content_type = ContentType::parse(message.attachment.content_type())
            .map_err(|err| MailerError::InvalidAttachment(err.to_string()))?;
        let pdf_part =
            Attachment::new(message.attachment.display_name().to_string()).body(pdf_bytes, content_type);

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .message_id(Some(message_id.to_string()))
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.body.clone()),
                    )
                    .singlepart(pdf_part),
            )
            .map_err(|err| MailerError::Send {
                recipient: message.recipient.clone(),
                reason: err.to_string(),
            })
    }

    async fn attachment_bytes(&self, message: &OutboundMessage) -> Result<Vec<u8>> {
        match &message.attachment {
            AttachmentDescriptor::File { path, .. } => {
                tokio::fs::read(path).await.map_err(|err| match err.kind() {
                    std::io::ErrorKind::NotFound => MailerError::AttachmentNotFound {
                        path: path.clone(),
                    },
                    _ => MailerError::Send {
                        recipient: message.recipient.clone(),
                        reason: format!("failed to read attachment {}: {}", path.display(), err),
                    },
                })
            }
            AttachmentDescriptor::Buffer { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, message: &OutboundMessage) -> Result<DispatchResult> {
        let pdf_bytes = self.attachment_bytes(message).await?;
        let message_id = self.mint_message_id();
        let email = self.build_message(message, pdf_bytes, &message_id)?;

        self.transport
            .send(email)
            .await
            .map_err(|err| MailerError::Send {
                recipient: message.recipient.clone(),
                reason: err.to_string(),
            })?;

        Ok(DispatchResult {
            message_id,
            recipient: message.recipient.clone(),
        })
    }

    async fn test_connection(&self) -> Result<()> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailerError::Connection(
                "SMTP server did not accept the connection".to_string(),
            )),
            Err(err) => Err(MailerError::Connection(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailCredentials;
    use crate::domain::PDF_CONTENT_TYPE;

    fn test_config() -> EmailConfig {
        EmailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            credentials: Some(MailCredentials {
                user: "sender@example.com".to_string(),
                secret: "hunter2".to_string(),
            }),
        }
    }

    fn buffer_message() -> OutboundMessage {
        OutboundMessage::new(
            "p@y.com",
            "Your report",
            "Please find your report attached.",
            AttachmentDescriptor::Buffer {
                bytes: b"%PDF-1.4 test".to_vec(),
                content_type: PDF_CONTENT_TYPE.to_string(),
                display_name: "patient_report.pdf".to_string(),
            },
        )
    }

    #[test]
    fn test_from_config_starttls() {
        assert!(SmtpMailTransport::from_config(&test_config()).is_ok());
    }

    #[test]
    fn test_from_config_implicit_tls() {
        let config = EmailConfig {
            port: 465,
            secure: true,
            ..test_config()
        };
        assert!(SmtpMailTransport::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_without_credentials_fails() {
        let config = EmailConfig {
            credentials: None,
            ..test_config()
        };

        let result = SmtpMailTransport::from_config(&config);
        assert!(matches!(result, Err(MailerError::Configuration(_))));
    }

    #[test]
    fn test_mint_message_id_uses_sender_domain() {
        let transport = SmtpMailTransport::from_config(&test_config()).unwrap();
        let id = transport.mint_message_id();

        assert!(id.starts_with('<'));
        assert!(id.ends_with("@example.com>"));
        assert_ne!(id, transport.mint_message_id());
    }

    #[test]
    fn test_build_message_carries_attachment() {
        let transport = SmtpMailTransport::from_config(&test_config()).unwrap();
        let email = transport
            .build_message(&buffer_message(), b"%PDF-1.4 test".to_vec(), "<m1@example.com>")
            .unwrap();

        let formatted = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(formatted.contains("Subject: Your report"));
        assert!(formatted.contains("patient_report.pdf"));
        assert!(formatted.contains("application/pdf"));
        assert!(formatted.contains("multipart/mixed"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let transport = SmtpMailTransport::from_config(&test_config()).unwrap();
        let mut message = buffer_message();
        message.recipient = "not-an-address".to_string();

        let result = transport.build_message(&message, vec![1], "<m1@example.com>");
        assert!(matches!(result, Err(MailerError::Send { .. })));
    }

    #[tokio::test]
    async fn test_attachment_bytes_missing_file() {
        let transport = SmtpMailTransport::from_config(&test_config()).unwrap();
        let message = OutboundMessage::new(
            "p@y.com",
            "Subject",
            "Body",
            AttachmentDescriptor::File {
                path: std::path::PathBuf::from("./definitely-missing.pdf"),
                display_name: "r.pdf".to_string(),
            },
        );

        let result = transport.attachment_bytes(&message).await;
        assert!(matches!(result, Err(MailerError::AttachmentNotFound { .. })));
    }
}
