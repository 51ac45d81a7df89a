use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::patrons::dto::PatronDto;
use crate::utils::date::serializer;

// NotificationEventType defines the account-state changes that are fanned out to sinks
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum NotificationEventType {
    OverdueDetected,
    FineApplied,
    FinePaid,
    FinePartiallyPaid,
    BorrowingRestored,
}

impl From<String> for NotificationEventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OVERDUE_DETECTED" => NotificationEventType::OverdueDetected,
            "FINE_APPLIED" => NotificationEventType::FineApplied,
            "FINE_PAID" => NotificationEventType::FinePaid,
            "FINE_PARTIALLY_PAID" => NotificationEventType::FinePartiallyPaid,
            "BORROWING_RESTORED" => NotificationEventType::BorrowingRestored,
            _ => NotificationEventType::OverdueDetected,
        }
    }
}

impl Display for NotificationEventType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            NotificationEventType::OverdueDetected => write!(f, "OVERDUE_DETECTED"),
            NotificationEventType::FineApplied => write!(f, "FINE_APPLIED"),
            NotificationEventType::FinePaid => write!(f, "FINE_PAID"),
            NotificationEventType::FinePartiallyPaid => write!(f, "FINE_PARTIALLY_PAID"),
            NotificationEventType::BorrowingRestored => write!(f, "BORROWING_RESTORED"),
        }
    }
}

// NotificationEvent abstracts a lifecycle event delivered to notification sinks.
// The patron is absent for system-level events.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub event_id: String,
    pub kind: NotificationEventType,
    pub patron: Option<PatronDto>,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl NotificationEvent {
    pub fn new(kind: NotificationEventType, patron: Option<&PatronDto>, message: &str) -> Self {
        NotificationEvent {
            event_id: Uuid::new_v4().to_string(),
            kind,
            patron: patron.cloned(),
            message: message.to_string(),
            payload: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn with_payload<T: Serialize>(kind: NotificationEventType, patron: Option<&PatronDto>,
                                      message: &str, data: &T) -> serde_json::Result<Self> {
        let mut event = Self::new(kind, patron, message);
        event.payload = Some(serde_json::to_value(data)?);
        Ok(event)
    }

    pub fn patron_id(&self) -> Option<&str> {
        self.patron.as_ref().map(|p| p.patron_id.as_str())
    }
}
