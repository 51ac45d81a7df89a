pub mod model;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDate;
use crate::core::library::LibraryResult;
use crate::loans::dto::{LoanDto, ReturnDto};

#[async_trait]
pub trait LoanService: Sync + Send {
    async fn borrow(&self, patron_id: &str, media_id: &str, media_type: &str, as_of: NaiveDate) -> LibraryResult<LoanDto>;

    async fn return_item(&self, loan_id: &str, as_of: NaiveDate) -> LibraryResult<ReturnDto>;

    async fn has_overdue_loans(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<bool>;

    async fn get_open_loans(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<Vec<LoanDto>>;

    async fn get_overdue_loans(&self, as_of: NaiveDate) -> LibraryResult<Vec<LoanDto>>;

    // one OVERDUE_DETECTED per patron holding overdue items, returns the number of patrons notified
    async fn send_overdue_reminders(&self, as_of: NaiveDate) -> LibraryResult<usize>;

    fn loan_period_for(&self, media_type: &str) -> i64;
}
