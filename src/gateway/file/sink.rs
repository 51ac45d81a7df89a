use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use crate::core::events::NotificationEvent;
use crate::core::library::LibraryResult;
use crate::gateway::events::NotificationSink;

// FileLogSink appends one line per event to a text log.
pub struct FileLogSink {
    path: String,
    append: Mutex<()>,
}

impl FileLogSink {
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string(), append: Mutex::new(()) }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

pub(crate) fn log_line(event: &NotificationEvent) -> String {
    format!("[{}] {} - {} - {}\n",
            event.created_at.format("%Y-%m-%dT%H:%M:%S"),
            event.kind,
            event.patron_id().unwrap_or("SYSTEM"),
            event.message.replace('\n', " "))
}

#[async_trait]
impl NotificationSink for FileLogSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn receive(&self, event: &NotificationEvent) -> LibraryResult<()> {
        let line = log_line(event);
        let _guard = self.append.lock().await;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
