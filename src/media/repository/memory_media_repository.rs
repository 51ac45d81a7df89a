use async_trait::async_trait;
use chrono::Utc;
use crate::core::library::{normalize_media_type, LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::media::domain::model::MediaEntity;
use crate::media::repository::MediaRepository;
use crate::utils::memory::MemoryTable;

#[derive(Debug)]
pub(crate) struct MemoryMediaRepository {
    table: MemoryTable<MediaEntity>,
}

impl MemoryMediaRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table: MemoryTable::new(table_name),
        }
    }
}

#[async_trait]
impl Repository<MediaEntity> for MemoryMediaRepository {
    async fn create(&self, entity: &MediaEntity) -> LibraryResult<usize> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: &MediaEntity) -> LibraryResult<usize> {
        let mut entity = entity.clone();
        entity.updated_at = Utc::now().naive_utc();
        Ok(self.table.replace(&entity).await)
    }

    async fn get(&self, id: &str) -> LibraryResult<MediaEntity> {
        self.table.get(id).await
    }
}

#[async_trait]
impl MediaRepository for MemoryMediaRepository {
    async fn find_by_id_and_type(&self, id: &str, media_type: &str) -> LibraryResult<MediaEntity> {
        let media_type = normalize_media_type(media_type);
        let media = self.table.get(id).await?;
        if media.media_type != media_type {
            return Err(LibraryError::not_found(
                format!("{} not found with id {}", media_type, id).as_str()));
        }
        Ok(media)
    }

    async fn set_available(&self, id: &str, available: bool) -> LibraryResult<bool> {
        Ok(self.table.modify(id, |media| {
            media.available = available;
            media.updated_at = Utc::now().naive_utc();
            true
        }).await)
    }

    async fn find_all(&self) -> LibraryResult<Vec<MediaEntity>> {
        Ok(self.table.find(|_| true).await)
    }
}
