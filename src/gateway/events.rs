use async_trait::async_trait;
use crate::core::events::NotificationEvent;
use crate::core::library::LibraryResult;

// NotificationSink is one delivery endpoint for account notifications.
#[async_trait]
pub trait NotificationSink: Sync + Send {
    fn name(&self) -> &str;

    async fn receive(&self, event: &NotificationEvent) -> LibraryResult<()>;
}
