use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, warn};
use crate::core::events::{NotificationEvent, NotificationEventType};
use crate::core::library::LibraryResult;
use crate::gateway::events::NotificationSink;
use crate::gateway::mail::transport::MailTransport;

// MailSink mails patron-level events to the patron, or to the fallback address when the patron
// has none or the sink is pinned to it. System-level events are not mailed.
pub struct MailSink {
    transport: Arc<dyn MailTransport>,
    fallback_email: String,
    fallback_only: bool,
    signature: String,
}

impl MailSink {
    pub fn new(transport: Arc<dyn MailTransport>, fallback_email: &str, fallback_only: bool) -> Self {
        Self {
            transport,
            fallback_email: fallback_email.to_string(),
            fallback_only,
            signature: "Library System".to_string(),
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = signature.to_string();
        self
    }

    fn destination(&self, event: &NotificationEvent) -> Option<String> {
        let patron = event.patron.as_ref()?;
        if self.fallback_only || patron.email.trim().is_empty() {
            Some(self.fallback_email.to_string())
        } else {
            Some(patron.email.to_string())
        }
    }
}

pub(crate) fn subject_for(kind: NotificationEventType) -> &'static str {
    match kind {
        NotificationEventType::OverdueDetected => "Overdue Item Reminder",
        NotificationEventType::FineApplied => "Library Fine Notification",
        NotificationEventType::FinePaid => "Fine Payment Confirmation",
        NotificationEventType::FinePartiallyPaid => "Fine Payment Confirmation",
        NotificationEventType::BorrowingRestored => "Borrowing Privileges Restored",
    }
}

#[async_trait]
impl NotificationSink for MailSink {
    fn name(&self) -> &str {
        "mail"
    }

    async fn receive(&self, event: &NotificationEvent) -> LibraryResult<()> {
        let to = match self.destination(event) {
            Some(to) => to,
            None => {
                debug!(kind = %event.kind, "system event not mailed");
                return Ok(());
            }
        };
        let body = format!("{}\n\nBest regards,\n{}", event.message, self.signature);
        self.transport.send(to.as_str(), subject_for(event.kind), body.as_str()).await
            .map_err(|err| {
                warn!(to = to.as_str(), error = %err, "mail notification not sent");
                err
            })
    }
}
