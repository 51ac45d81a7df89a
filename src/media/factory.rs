use std::sync::Arc;
use crate::media::repository::MediaRepository;
use crate::media::repository::memory_media_repository::MemoryMediaRepository;

pub fn create_media_repository() -> Arc<dyn MediaRepository> {
    Arc::new(MemoryMediaRepository::new("media"))
}
