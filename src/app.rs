use std::sync::Arc;
use tracing::info;
use crate::core::auth::AuthService;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::fines::domain::FineService;
use crate::fines::factory::{create_fine_engine, create_fine_repository, create_fine_service};
use crate::fines::repository::FineRepository;
use crate::gateway::factory::create_notification_hub;
use crate::gateway::hub::NotificationHub;
use crate::loans::domain::LoanService;
use crate::loans::factory::{create_loan_repository, create_loan_service};
use crate::loans::repository::LoanRepository;
use crate::media::domain::model::MediaEntity;
use crate::media::factory::create_media_repository;
use crate::media::repository::MediaRepository;
use crate::patrons::domain::PatronService;
use crate::patrons::factory::{create_patron_repository, create_patron_service};
use crate::patrons::repository::PatronRepository;
use crate::policy::FinePolicyRegistry;
use crate::rules::domain::EligibilityService;
use crate::rules::factory::create_eligibility_service;
use crate::utils::locks::KeyedLocks;

// LendingApp wires the stores, the fine engine and the services over one hub and one lock table.
// The fine engine only depends on stores, so the loan service can hold it without a back-reference.
pub struct LendingApp {
    pub config: Configuration,
    pub media_repository: Arc<dyn MediaRepository>,
    pub patron_repository: Arc<dyn PatronRepository>,
    pub loan_repository: Arc<dyn LoanRepository>,
    pub fine_repository: Arc<dyn FineRepository>,
    pub policies: Arc<FinePolicyRegistry>,
    pub hub: Arc<NotificationHub>,
    pub patron_service: Arc<dyn PatronService>,
    pub loan_service: Arc<dyn LoanService>,
    pub fine_service: Arc<dyn FineService>,
    pub eligibility_service: Arc<dyn EligibilityService>,
}

impl LendingApp {
    // console, log file and (when configured) mail sinks attached
    pub fn new(config: &Configuration, auth: Arc<dyn AuthService>) -> Self {
        Self::with_hub(config, auth, create_notification_hub(config))
    }

    // no sinks attached; callers attach their own
    pub fn quiet(config: &Configuration, auth: Arc<dyn AuthService>) -> Self {
        Self::with_hub(config, auth, Arc::new(NotificationHub::new()))
    }

    pub fn with_hub(config: &Configuration, auth: Arc<dyn AuthService>, hub: Arc<NotificationHub>) -> Self {
        let media_repository = create_media_repository();
        let patron_repository = create_patron_repository();
        let loan_repository = create_loan_repository();
        let fine_repository = create_fine_repository();
        let policies = Arc::new(FinePolicyRegistry::new());
        let locks = Arc::new(KeyedLocks::new());

        let fine_engine = create_fine_engine(fine_repository.clone(), loan_repository.clone(),
                                             patron_repository.clone(), policies.clone(), hub.clone());
        let fine_service = create_fine_service(fine_engine.clone(), locks.clone());
        let loan_service = create_loan_service(config, loan_repository.clone(), media_repository.clone(),
                                               patron_repository.clone(), fine_engine.clone(), hub.clone(),
                                               locks.clone());
        let patron_service = create_patron_service(patron_repository.clone(), loan_repository.clone(),
                                                   fine_engine.clone(), auth.clone(), locks);
        let eligibility_service = create_eligibility_service(patron_repository.clone(), loan_repository.clone(),
                                                             fine_engine, auth);
        info!(branch = %config.branch_id, sinks = hub.sink_count(), "lending engine ready");
        Self {
            config: config.clone(),
            media_repository,
            patron_repository,
            loan_repository,
            fine_repository,
            policies,
            hub,
            patron_service,
            loan_service,
            fine_service,
            eligibility_service,
        }
    }

    // Catalogs an item with the loan period of its media type.
    pub async fn add_media(&self, media_id: &str, media_type: &str, title: &str) -> LibraryResult<MediaEntity> {
        let item = MediaEntity::with_id(media_id, media_type, title, self.loan_service.loan_period_for(media_type));
        let _ = self.media_repository.create(&item).await?;
        Ok(item)
    }
}
