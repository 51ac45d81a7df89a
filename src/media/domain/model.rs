use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::normalize_media_type;
use crate::media::domain::Media;
use crate::utils::date::serializer;

// MediaEntity abstracts a lendable unit (a book copy, a disc, ...) tagged with its media type.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MediaEntity {
    pub media_id: String,
    pub media_type: String,
    pub title: String,
    pub available: bool,
    pub loan_period_days: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl MediaEntity {
    pub fn new(media_type: &str, title: &str, loan_period_days: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string().as_str(), media_type, title, loan_period_days)
    }

    pub fn with_id(media_id: &str, media_type: &str, title: &str, loan_period_days: i64) -> Self {
        Self {
            media_id: media_id.to_string(),
            media_type: normalize_media_type(media_type),
            title: title.to_string(),
            available: true,
            loan_period_days,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for MediaEntity {
    fn id(&self) -> String {
        self.media_id.to_string()
    }
}

impl Media for MediaEntity {
    fn media_type(&self) -> String {
        self.media_type.to_string()
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
