use std::sync::Arc;
use tracing::warn;
use crate::core::domain::Configuration;
use crate::gateway::console::sink::ConsoleSink;
use crate::gateway::file::sink::FileLogSink;
use crate::gateway::hub::NotificationHub;
use crate::gateway::mail::sink::MailSink;
use crate::gateway::mail::transport::{MailTransport, SmtpMailTransport};

pub fn create_mail_sink(config: &Configuration, transport: Arc<dyn MailTransport>) -> MailSink {
    let sink = MailSink::new(transport, config.fallback_email.as_str(), config.mail_to_fallback_only);
    match config.mail.as_ref().and_then(|m| m.smtp_from_name.as_deref()) {
        Some(name) => sink.with_signature(name),
        None => sink,
    }
}

// hub with the console and file sinks, plus the mail sink when SMTP is configured
pub fn create_notification_hub(config: &Configuration) -> Arc<NotificationHub> {
    let hub = NotificationHub::new();
    let _ = hub.attach(Arc::new(ConsoleSink::stdout()));
    let _ = hub.attach(Arc::new(FileLogSink::new(config.notification_log_path.as_str())));
    if let Some(mail) = &config.mail {
        match SmtpMailTransport::new(mail.clone()) {
            Ok(transport) => {
                let transport: Arc<dyn MailTransport> = Arc::new(transport);
                let _ = hub.attach(Arc::new(create_mail_sink(config, transport)));
            }
            Err(err) => {
                warn!(host = mail.smtp_host.as_str(), error = %err, "mail sink disabled");
            }
        }
    }
    Arc::new(hub)
}
