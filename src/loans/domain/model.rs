use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::{normalize_media_type, LoanStatus};
use crate::utils::date::{days_between, serializer};

// LoanEntity records one item held by one patron. The overdue flag is a cache that is only
// recomputed against a caller-supplied date.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanEntity {
    pub loan_id: String,
    pub patron_id: String,
    pub media_id: String,
    pub media_type: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub overdue: bool,
    pub loan_status: LoanStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn new(patron_id: &str, media_id: &str, media_type: &str,
               borrow_date: NaiveDate, loan_period_days: i64) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            patron_id: patron_id.to_string(),
            media_id: media_id.to_string(),
            media_type: normalize_media_type(media_type),
            borrow_date,
            due_date: borrow_date + Duration::days(loan_period_days),
            return_date: None,
            overdue: false,
            loan_status: LoanStatus::Open,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn is_overdue_on(&self, as_of: NaiveDate) -> bool {
        self.is_open() && as_of > self.due_date
    }

    // recomputes the cached flag, returns true only when the loan has just turned overdue
    pub fn refresh_overdue(&mut self, as_of: NaiveDate) -> bool {
        let overdue = self.is_overdue_on(as_of);
        let newly = overdue && !self.overdue;
        self.overdue = overdue;
        newly
    }

    // whole days past the due date, zero when not late
    pub fn overdue_days(&self, as_of: NaiveDate) -> i64 {
        days_between(self.due_date, as_of).max(0)
    }

    // return date is written exactly once
    pub fn mark_returned(&mut self, date: NaiveDate) -> bool {
        if self.return_date.is_some() {
            return false;
        }
        self.return_date = Some(date);
        self.loan_status = LoanStatus::Returned;
        self.overdue = false;
        true
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }
}
