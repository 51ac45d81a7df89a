use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::model::{FineEntity, PaymentResult};
use crate::fines::repository::FineRepository;
use crate::utils::memory::MemoryTable;

#[derive(Debug)]
pub(crate) struct MemoryFineRepository {
    table: MemoryTable<FineEntity>,
}

impl MemoryFineRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<FineEntity> for MemoryFineRepository {
    async fn create(&self, entity: &FineEntity) -> LibraryResult<usize> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: &FineEntity) -> LibraryResult<usize> {
        let mut entity = entity.clone();
        entity.updated_at = Utc::now().naive_utc();
        Ok(self.table.replace(&entity).await)
    }

    async fn get(&self, id: &str) -> LibraryResult<FineEntity> {
        self.table.get(id).await
    }
}

#[async_trait]
impl FineRepository for MemoryFineRepository {
    async fn find_by_loan_id(&self, loan_id: &str) -> LibraryResult<Option<FineEntity>> {
        Ok(self.table.find_first(|f| f.loan_id.as_deref() == Some(loan_id)).await)
    }

    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<FineEntity>> {
        Ok(self.table.find(|f| f.patron_id == patron_id).await)
    }

    async fn find_unpaid_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<FineEntity>> {
        Ok(self.table.find(|f| f.patron_id == patron_id && !f.is_paid()).await)
    }

    async fn apply_payment(&self, id: &str, amount: Decimal) -> LibraryResult<PaymentResult> {
        let mut result = None;
        let _ = self.table.modify(id, |fine| {
            let res = fine.apply_payment(amount);
            if res.success {
                fine.updated_at = Utc::now().naive_utc();
            }
            let written = res.success;
            result = Some(res);
            written
        }).await;
        match result {
            Some(res) => Ok(res),
            None => Err(LibraryError::not_found(format!("fine with id {} not found", id).as_str())),
        }
    }
}
