use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::utils::memory::MemoryTable;

#[derive(Debug)]
pub(crate) struct MemoryLoanRepository {
    table: MemoryTable<LoanEntity>,
}

impl MemoryLoanRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<LoanEntity> for MemoryLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let mut entity = entity.clone();
        entity.updated_at = Utc::now().naive_utc();
        Ok(self.table.replace(&entity).await)
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.table.get(id).await
    }
}

#[async_trait]
impl LoanRepository for MemoryLoanRepository {
    async fn find_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.table.find(|l| l.patron_id == patron_id).await)
    }

    async fn find_open(&self) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.table.find(|l| l.is_open()).await)
    }

    async fn find_overdue(&self, as_of: NaiveDate) -> LibraryResult<Vec<LoanEntity>> {
        Ok(self.table.find(|l| l.is_overdue_on(as_of)).await)
    }

    async fn mark_returned(&self, id: &str, date: NaiveDate) -> LibraryResult<bool> {
        Ok(self.table.modify(id, |loan| {
            let written = loan.mark_returned(date);
            if written {
                loan.updated_at = Utc::now().naive_utc();
            }
            written
        }).await)
    }

    async fn refresh_overdue(&self, id: &str, as_of: NaiveDate) -> LibraryResult<bool> {
        Ok(self.table.modify(id, |loan| {
            if !loan.is_open() {
                return false;
            }
            let before = loan.overdue;
            let newly = loan.refresh_overdue(as_of);
            if before != loan.overdue {
                loan.updated_at = Utc::now().naive_utc();
            }
            newly
        }).await)
    }
}
