pub mod engine;
pub mod model;
pub mod service;

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::library::LibraryResult;
use crate::fines::dto::{FineBreakdownDto, FineDto, PaymentReceiptDto};

#[async_trait]
pub trait FineService: Sync + Send {
    // fine for an overdue loan, at most one per loan
    async fn apply_loan_fine(&self, patron_id: &str, reason: &str, loan_id: &str) -> LibraryResult<FineDto>;

    // ad hoc fine not tied to any loan
    async fn apply_fine(&self, patron_id: &str, amount: Decimal, reason: &str) -> LibraryResult<FineDto>;

    async fn pay_fine(&self, fine_id: &str, amount: Decimal) -> LibraryResult<PaymentReceiptDto>;

    async fn get_unpaid_fines(&self, patron_id: &str) -> LibraryResult<Vec<FineDto>>;

    async fn get_total_unpaid(&self, patron_id: &str) -> LibraryResult<Decimal>;

    async fn fine_breakdown(&self, patron_id: &str) -> LibraryResult<Vec<FineBreakdownDto>>;
}
