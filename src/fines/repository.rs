pub mod memory_fine_repository;

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::fines::domain::model::{FineEntity, PaymentResult};

#[async_trait]
pub trait FineRepository: Repository<FineEntity> {
    async fn find_by_loan_id(&self, loan_id: &str) -> LibraryResult<Option<FineEntity>>;

    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<FineEntity>>;

    async fn find_unpaid_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<FineEntity>>;

    // applies the payment to the stored fine in one step
    async fn apply_payment(&self, id: &str, amount: Decimal) -> LibraryResult<PaymentResult>;
}
