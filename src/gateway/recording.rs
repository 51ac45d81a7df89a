use std::sync::Mutex;
use async_trait::async_trait;
use crate::core::events::{NotificationEvent, NotificationEventType};
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::events::NotificationSink;

// RecordingSink keeps every received event; a failing one records and then errors.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    name: String,
    failing: bool,
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.to_string(), failing: false, events: Mutex::new(vec![]) }
    }

    pub(crate) fn failing(name: &str) -> Self {
        Self { name: name.to_string(), failing: true, events: Mutex::new(vec![]) }
    }

    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("recording lock").clone()
    }

    pub(crate) fn kinds(&self) -> Vec<NotificationEventType> {
        self.events().iter().map(|e| e.kind).collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    async fn receive(&self, event: &NotificationEvent) -> LibraryResult<()> {
        self.events.lock().expect("recording lock").push(event.clone());
        if self.failing {
            return Err(LibraryError::runtime(format!("{} is down", self.name).as_str(), None));
        }
        Ok(())
    }
}

// HangingSink never finishes receiving.
#[derive(Debug, Default)]
pub(crate) struct HangingSink;

#[async_trait]
impl NotificationSink for HangingSink {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn receive(&self, _event: &NotificationEvent) -> LibraryResult<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}
