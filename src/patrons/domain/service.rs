use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::core::auth::AuthService;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::engine::FineEngine;
use crate::loans::repository::LoanRepository;
use crate::patrons::domain::{Patron, PatronService};
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::utils::locks::{patron_key, KeyedLocks};

pub(crate) struct PatronServiceImpl {
    patron_repository: Arc<dyn PatronRepository>,
    loan_repository: Arc<dyn LoanRepository>,
    fine_engine: Arc<FineEngine>,
    auth: Arc<dyn AuthService>,
    locks: Arc<KeyedLocks>,
}

impl PatronServiceImpl {
    pub(crate) fn new(patron_repository: Arc<dyn PatronRepository>, loan_repository: Arc<dyn LoanRepository>,
                      fine_engine: Arc<FineEngine>, auth: Arc<dyn AuthService>, locks: Arc<KeyedLocks>) -> Self {
        PatronServiceImpl {
            patron_repository,
            loan_repository,
            fine_engine,
            auth,
            locks,
        }
    }

    fn require_admin(&self, action: &str) -> LibraryResult<()> {
        if self.auth.is_admin_session_active() {
            return Ok(());
        }
        warn!(action, "patron account change rejected without admin session");
        Err(LibraryError::access_denied(format!("admin login required to {}", action).as_str(),
                                        Some("admin_required".to_string())))
    }

    async fn save(&self, patron: &PatronEntity) -> LibraryResult<()> {
        if self.patron_repository.update(patron).await? == 0 {
            return Err(LibraryError::not_written("patron", patron.patron_id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl PatronService for PatronServiceImpl {
    async fn register_patron(&self, name: &str, email: &str) -> LibraryResult<PatronDto> {
        if name.trim().is_empty() {
            return Err(LibraryError::validation("patron name is required", None));
        }
        let patron = PatronEntity::new(name.trim(), email.trim());
        let _ = self.patron_repository.create(&patron).await?;
        info!(patron = %patron.patron_id, "patron registered");
        Ok(PatronDto::from(&patron))
    }

    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto> {
        self.patron_repository.get(id).await.map(|p| PatronDto::from(&p))
    }

    async fn unregister_patron(&self, id: &str) -> LibraryResult<PatronDto> {
        self.require_admin("unregister patron")?;
        let _guard = self.locks.lock(patron_key(id).as_str()).await;
        let mut patron = self.patron_repository.get(id).await?;
        if !patron.active {
            return Err(LibraryError::conflict(format!("patron {} is already inactive", id).as_str(),
                                              Some("already_inactive".to_string())));
        }
        let open = self.loan_repository.find_by_patron(id).await?
            .iter().filter(|l| l.is_open()).count();
        if open > 0 {
            return Err(LibraryError::precondition_failed(
                format!("patron {} still holds {} item(s)", id, open).as_str(), Some("open_loans".to_string())));
        }
        let unpaid = self.fine_engine.total_unpaid(id).await?;
        if !unpaid.is_zero() {
            return Err(LibraryError::precondition_failed(
                format!("patron {} owes ${:.2}", id, unpaid).as_str(), Some("unpaid_fines".to_string())));
        }
        patron.active = false;
        patron.can_borrow = false;
        self.save(&patron).await?;
        info!(patron = %id, "patron unregistered");
        Ok(PatronDto::from(&patron))
    }

    async fn reactivate_patron(&self, id: &str) -> LibraryResult<PatronDto> {
        self.require_admin("reactivate patron")?;
        let _guard = self.locks.lock(patron_key(id).as_str()).await;
        let mut patron = self.patron_repository.get(id).await?;
        if patron.active {
            return Err(LibraryError::conflict(format!("patron {} is already active", id).as_str(),
                                              Some("already_active".to_string())));
        }
        let unpaid = self.fine_engine.total_unpaid(id).await?;
        patron.active = true;
        patron.can_borrow = unpaid.is_zero();
        self.save(&patron).await?;
        info!(patron = %id, can_borrow = patron.can_borrow, "patron reactivated");
        Ok(PatronDto::from(&patron))
    }

    async fn active_patrons(&self) -> LibraryResult<Vec<PatronDto>> {
        Ok(self.patron_repository.find_by_active(true).await?.iter().map(PatronDto::from).collect())
    }

    async fn inactive_patrons(&self) -> LibraryResult<Vec<PatronDto>> {
        Ok(self.patron_repository.find_by_active(false).await?.iter().map(PatronDto::from).collect())
    }

    async fn is_eligible(&self, id: &str) -> LibraryResult<bool> {
        let patron = self.patron_repository.get(id).await?;
        let unpaid = self.fine_engine.total_unpaid(id).await?;
        Ok(patron.is_eligible(unpaid))
    }
}
