use std::io::Write;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::core::events::NotificationEvent;
use crate::core::library::LibraryResult;
use crate::gateway::events::NotificationSink;

pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }
}

pub(crate) fn render(event: &NotificationEvent) -> String {
    format!("=== NOTIFICATION ===\nEvent: {}\nPatron: {}\nMessage: {}\nTimestamp: {}\n====================\n",
            event.kind,
            event.patron_id().unwrap_or("SYSTEM"),
            event.message,
            event.created_at.format("%Y-%m-%dT%H:%M:%S"))
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn receive(&self, event: &NotificationEvent) -> LibraryResult<()> {
        let text = render(event);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
