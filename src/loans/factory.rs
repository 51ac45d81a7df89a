use std::sync::Arc;
use crate::core::domain::Configuration;
use crate::fines::domain::engine::FineEngine;
use crate::gateway::hub::NotificationHub;
use crate::loans::domain::LoanService;
use crate::loans::domain::service::LoanServiceImpl;
use crate::loans::repository::LoanRepository;
use crate::loans::repository::memory_loan_repository::MemoryLoanRepository;
use crate::media::repository::MediaRepository;
use crate::patrons::repository::PatronRepository;
use crate::utils::locks::KeyedLocks;

pub fn create_loan_repository() -> Arc<dyn LoanRepository> {
    Arc::new(MemoryLoanRepository::new("loans"))
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn create_loan_service(config: &Configuration, loan_repository: Arc<dyn LoanRepository>,
                                  media_repository: Arc<dyn MediaRepository>, patron_repository: Arc<dyn PatronRepository>,
                                  fine_engine: Arc<FineEngine>, hub: Arc<NotificationHub>,
                                  locks: Arc<KeyedLocks>) -> Arc<dyn LoanService> {
    Arc::new(LoanServiceImpl::new(config, loan_repository, media_repository, patron_repository,
                                  fine_engine, hub, locks))
}
