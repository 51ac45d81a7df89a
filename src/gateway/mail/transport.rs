use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use crate::core::domain::MailConfig;
use crate::core::library::{LibraryError, LibraryResult};

// MailTransport dispatches a plain-text message to one recipient.
#[async_trait]
pub trait MailTransport: Sync + Send {
    async fn send(&self, to: &str, subject: &str, body: &str) -> LibraryResult<()>;
}

// SmtpMailTransport builds its relay once; clones of the mailer share one connection pool.
pub struct SmtpMailTransport {
    config: MailConfig,
    mailer: SmtpTransport,
}

impl SmtpMailTransport {
    pub fn new(config: MailConfig) -> LibraryResult<Self> {
        let mailer = Self::build_mailer(&config)?;
        Ok(Self { config, mailer })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> LibraryResult<Message> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Library System");
        let from: Mailbox = format!("{} <{}>", from_name, self.config.smtp_from).parse()
            .map_err(|e| LibraryError::runtime(format!("invalid from address: {}", e).as_str(), Some("mail".to_string())))?;
        let to: Mailbox = to.parse()
            .map_err(|e| LibraryError::runtime(format!("invalid to address: {}", e).as_str(), Some("mail".to_string())))?;
        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| LibraryError::runtime(format!("failed to build email: {}", e).as_str(), Some("mail".to_string())))
    }

    fn build_mailer(config: &MailConfig) -> LibraryResult<SmtpTransport> {
        let builder = if config.smtp_use_tls {
            SmtpTransport::starttls_relay(&config.smtp_host)
                .map_err(|e| LibraryError::runtime(format!("failed to create SMTP transport: {}", e).as_str(), Some("mail".to_string())))?
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
        }.port(config.smtp_port);
        let builder = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => builder.credentials(Credentials::new(username.clone(), password.clone())),
            _ => builder,
        };
        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> LibraryResult<()> {
        let email = self.build_message(to, subject, body)?;
        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| LibraryError::runtime(format!("mail dispatch aborted: {}", e).as_str(), Some("mail".to_string())))?
            .map_err(|e| LibraryError::runtime(format!("failed to send email: {}", e).as_str(), Some("mail".to_string())))?;
        Ok(())
    }
}
