use std::sync::Arc;
use crate::core::auth::AuthService;
use crate::fines::domain::engine::FineEngine;
use crate::loans::repository::LoanRepository;
use crate::patrons::domain::PatronService;
use crate::patrons::domain::service::PatronServiceImpl;
use crate::patrons::repository::PatronRepository;
use crate::patrons::repository::memory_patron_repository::MemoryPatronRepository;
use crate::utils::locks::KeyedLocks;

pub fn create_patron_repository() -> Arc<dyn PatronRepository> {
    Arc::new(MemoryPatronRepository::new("patrons"))
}

pub(crate) fn create_patron_service(patron_repository: Arc<dyn PatronRepository>, loan_repository: Arc<dyn LoanRepository>,
                                    fine_engine: Arc<FineEngine>, auth: Arc<dyn AuthService>,
                                    locks: Arc<KeyedLocks>) -> Arc<dyn PatronService> {
    Arc::new(PatronServiceImpl::new(patron_repository, loan_repository, fine_engine, auth, locks))
}
