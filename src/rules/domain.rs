pub mod model;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDate;
use crate::core::library::LibraryResult;
use crate::rules::domain::model::{BorrowingRules, ValidationResult};

#[async_trait]
pub trait EligibilityService: Sync + Send {
    // first failing condition wins; an unknown patron is an invalid result, not an error
    async fn can_borrow(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<ValidationResult>;

    async fn borrowing_rules(&self) -> BorrowingRules;

    // requires an active admin session
    async fn update_borrowing_rules(&self, rules: BorrowingRules) -> LibraryResult<BorrowingRules>;
}
