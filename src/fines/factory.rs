use std::sync::Arc;
use crate::fines::domain::engine::FineEngine;
use crate::fines::domain::FineService;
use crate::fines::domain::service::FineServiceImpl;
use crate::fines::repository::FineRepository;
use crate::fines::repository::memory_fine_repository::MemoryFineRepository;
use crate::gateway::hub::NotificationHub;
use crate::loans::repository::LoanRepository;
use crate::patrons::repository::PatronRepository;
use crate::policy::FinePolicyRegistry;
use crate::utils::locks::KeyedLocks;

pub fn create_fine_repository() -> Arc<dyn FineRepository> {
    Arc::new(MemoryFineRepository::new("fines"))
}

pub(crate) fn create_fine_engine(fine_repository: Arc<dyn FineRepository>, loan_repository: Arc<dyn LoanRepository>,
                                 patron_repository: Arc<dyn PatronRepository>, policies: Arc<FinePolicyRegistry>,
                                 hub: Arc<NotificationHub>) -> Arc<FineEngine> {
    Arc::new(FineEngine::new(fine_repository, loan_repository, patron_repository, policies, hub))
}

pub(crate) fn create_fine_service(engine: Arc<FineEngine>, locks: Arc<KeyedLocks>) -> Arc<dyn FineService> {
    Arc::new(FineServiceImpl::new(engine, locks))
}
