pub mod memory_media_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::media::domain::model::MediaEntity;

#[async_trait]
pub trait MediaRepository: Repository<MediaEntity> {
    // finds an item only when it carries the given media type (case-insensitive)
    async fn find_by_id_and_type(&self, id: &str, media_type: &str) -> LibraryResult<MediaEntity>;

    async fn set_available(&self, id: &str, available: bool) -> LibraryResult<bool>;

    async fn find_all(&self) -> LibraryResult<Vec<MediaEntity>>;
}
