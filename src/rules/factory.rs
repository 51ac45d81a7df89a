use std::sync::Arc;
use crate::core::auth::AuthService;
use crate::fines::domain::engine::FineEngine;
use crate::loans::repository::LoanRepository;
use crate::patrons::repository::PatronRepository;
use crate::rules::domain::EligibilityService;
use crate::rules::domain::model::BorrowingRules;
use crate::rules::domain::service::EligibilityServiceImpl;

pub(crate) fn create_eligibility_service(patron_repository: Arc<dyn PatronRepository>,
                                         loan_repository: Arc<dyn LoanRepository>, fine_engine: Arc<FineEngine>,
                                         auth: Arc<dyn AuthService>) -> Arc<dyn EligibilityService> {
    Arc::new(EligibilityServiceImpl::new(BorrowingRules::default(), patron_repository, loan_repository,
                                         fine_engine, auth))
}
