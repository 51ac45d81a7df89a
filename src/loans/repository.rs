pub mod memory_loan_repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;

#[async_trait]
pub trait LoanRepository: Repository<LoanEntity> {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanEntity>>;

    async fn find_open(&self) -> LibraryResult<Vec<LoanEntity>>;

    // open loans whose due date lies strictly before the given date
    async fn find_overdue(&self, as_of: NaiveDate) -> LibraryResult<Vec<LoanEntity>>;

    // sets the return date once; false when the loan is unknown or already returned
    async fn mark_returned(&self, id: &str, date: NaiveDate) -> LibraryResult<bool>;

    // recomputes the stored overdue flag of an open loan in place, leaving every other field alone;
    // true when the loan turned overdue, false when unknown, returned or already flagged
    async fn refresh_overdue(&self, id: &str, as_of: NaiveDate) -> LibraryResult<bool>;
}
