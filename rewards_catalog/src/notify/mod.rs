//! Asynchronous email notifications.
//!
//! Mail is a fire-and-forget side channel: callers push a message onto an
//! unbounded queue and move on, a background worker drains the queue and
//! delivers over SMTP. A transport failure is logged and the message
//! dropped; nothing in the calling path ever blocks on, or fails because
//! of, mail delivery.

use lettre::{
    Message, SmtpTransport, Transport, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use tokio::sync::mpsc;

/// SMTP delivery configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `"Rewards Catalog <no-reply@example.com>"`.
    pub from_address: String,
    /// Base URL prefixed to the verification link in outgoing mail.
    pub verify_base_url: String,
}

/// An email-verification message for a freshly created or still-unverified
/// account.
#[derive(Debug, Clone)]
pub struct VerificationMail {
    pub recipient: String,
    pub first_name: String,
}

/// Handle to the mail queue.
///
/// `send` never blocks and never returns an error to the caller. A
/// disabled notifier drops messages silently, which keeps deployments
/// without SMTP configuration (and tests) free of conditional wiring.
#[derive(Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<VerificationMail>>,
}

impl Notifier {
    /// A notifier that drops every message.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Enqueue a verification mail.
    pub fn send(&self, mail: VerificationMail) {
        match &self.tx {
            Some(tx) => {
                if tx.send(mail).is_err() {
                    tracing::warn!("mail worker is gone; dropping verification mail");
                }
            }
            None => {
                tracing::debug!(recipient = %mail.recipient, "mail notifications disabled; dropping verification mail");
            }
        }
    }
}

/// Start the background mail worker and return its queue handle.
///
/// Must be called from within a tokio runtime. The worker lives as long as
/// at least one [`Notifier`] clone exists.
pub fn spawn_mailer(config: MailerConfig) -> Notifier {
    let (tx, mut rx) = mpsc::unbounded_channel::<VerificationMail>();

    tokio::spawn(async move {
        let transport = match build_transport(&config) {
            Ok(transport) => transport,
            Err(err) => {
                tracing::error!(error = %err, host = %config.smtp_host, "failed to initialize SMTP transport; mail disabled");
                while rx.recv().await.is_some() {}
                return;
            }
        };

        while let Some(mail) = rx.recv().await {
            let message = match compose(&config, &mail) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(recipient = %mail.recipient, error = %err, "could not compose verification mail");
                    continue;
                }
            };

            // SMTP delivery is blocking; keep it off the async workers.
            let transport = transport.clone();
            let recipient = mail.recipient.clone();
            match tokio::task::spawn_blocking(move || transport.send(&message)).await {
                Ok(Ok(_)) => {
                    tracing::debug!(%recipient, "verification mail delivered");
                }
                Ok(Err(err)) => {
                    tracing::warn!(%recipient, error = %err, "verification mail delivery failed");
                }
                Err(err) => {
                    tracing::warn!(%recipient, error = %err, "mail delivery task failed");
                }
            }
        }
    });

    Notifier { tx: Some(tx) }
}

fn build_transport(
    config: &MailerConfig,
) -> Result<SmtpTransport, lettre::transport::smtp::Error> {
    let mut builder = SmtpTransport::starttls_relay(&config.smtp_host)?.port(config.smtp_port);

    if !config.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ));
    }

    Ok(builder.build())
}

fn compose(config: &MailerConfig, mail: &VerificationMail) -> Result<Message, String> {
    let from = config
        .from_address
        .parse::<Mailbox>()
        .map_err(|err| err.to_string())?;
    let to = mail
        .recipient
        .parse::<Mailbox>()
        .map_err(|err| err.to_string())?;

    let link = format!(
        "{}/api/v1/users/verify-email/{}",
        config.verify_base_url.trim_end_matches('/'),
        mail.recipient,
    );
    let body = format!(
        "Hello {},\n\n\
         Thanks for registering. Please follow the link below to verify your \
         email address:\n\n{}\n\n\
         If you did not request this message you can safely ignore it.\n",
        mail.first_name, link,
    );

    Message::builder()
        .from(from)
        .to(to)
        .subject("Verify your email address")
        .body(body)
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailerConfig {
        MailerConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from_address: "Rewards Catalog <no-reply@example.com>".to_string(),
            verify_base_url: "https://api.example.com/".to_string(),
        }
    }

    #[test]
    fn test_compose_builds_verification_link() {
        let mail = VerificationMail {
            recipient: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
        };
        let message = compose(&config(), &mail).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("https://api.example.com/api/v1/users/verify-email/a@x.com"));
    }

    #[test]
    fn test_compose_rejects_invalid_recipient() {
        let mail = VerificationMail {
            recipient: "not an address".to_string(),
            first_name: "Ada".to_string(),
        };
        assert!(compose(&config(), &mail).is_err());
    }

    #[test]
    fn test_disabled_notifier_drops_without_panicking() {
        Notifier::disabled().send(VerificationMail {
            recipient: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
        });
    }
}
