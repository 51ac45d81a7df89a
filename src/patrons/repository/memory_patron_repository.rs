use async_trait::async_trait;
use chrono::Utc;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::memory::MemoryTable;

#[derive(Debug)]
pub(crate) struct MemoryPatronRepository {
    table: MemoryTable<PatronEntity>,
}

impl MemoryPatronRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<PatronEntity> for MemoryPatronRepository {
    async fn create(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        let mut entity = entity.clone();
        entity.updated_at = Utc::now().naive_utc();
        Ok(self.table.replace(&entity).await)
    }

    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        self.table.get(id).await
    }
}

#[async_trait]
impl PatronRepository for MemoryPatronRepository {
    async fn find_all(&self) -> LibraryResult<Vec<PatronEntity>> {
        Ok(self.table.find(|_| true).await)
    }

    async fn find_by_active(&self, active: bool) -> LibraryResult<Vec<PatronEntity>> {
        Ok(self.table.find(|p| p.active == active).await)
    }
}
