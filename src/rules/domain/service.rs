use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::core::auth::AuthService;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::engine::FineEngine;
use crate::loans::repository::LoanRepository;
use crate::patrons::repository::PatronRepository;
use crate::rules::domain::EligibilityService;
use crate::rules::domain::model::{BorrowingRules, ValidationResult};

pub(crate) struct EligibilityServiceImpl {
    rules: RwLock<BorrowingRules>,
    patron_repository: Arc<dyn PatronRepository>,
    loan_repository: Arc<dyn LoanRepository>,
    fine_engine: Arc<FineEngine>,
    auth: Arc<dyn AuthService>,
}

impl EligibilityServiceImpl {
    pub(crate) fn new(rules: BorrowingRules, patron_repository: Arc<dyn PatronRepository>,
                      loan_repository: Arc<dyn LoanRepository>, fine_engine: Arc<FineEngine>,
                      auth: Arc<dyn AuthService>) -> Self {
        Self {
            rules: RwLock::new(rules),
            patron_repository,
            loan_repository,
            fine_engine,
            auth,
        }
    }
}

#[async_trait]
impl EligibilityService for EligibilityServiceImpl {
    async fn can_borrow(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<ValidationResult> {
        let patron = match self.patron_repository.get(patron_id).await {
            Ok(patron) => patron,
            Err(LibraryError::NotFound { .. }) => return Ok(ValidationResult::invalid("Patron not found.")),
            Err(err) => return Err(err),
        };
        if !patron.active {
            return Ok(ValidationResult::invalid("Patron account is not active."));
        }
        let rules = self.rules.read().await.clone();
        let open: Vec<_> = self.loan_repository.find_by_patron(patron_id).await?
            .into_iter()
            .filter(|l| l.is_open())
            .collect();
        if open.len() >= rules.max_loans_per_patron {
            return Ok(ValidationResult::invalid(format!(
                "Patron has reached the maximum limit of {} loans.", rules.max_loans_per_patron).as_str()));
        }
        if rules.restrict_for_overdue && open.iter().any(|l| l.is_overdue_on(as_of)) {
            return Ok(ValidationResult::invalid("Patron has overdue items that must be returned first."));
        }
        if rules.restrict_for_unpaid_fines {
            let unpaid = self.fine_engine.total_unpaid(patron_id).await?;
            if unpaid > Decimal::ZERO {
                return Ok(ValidationResult::invalid(format!(
                    "Patron has unpaid fines of ${:.2}. Please pay all fines before borrowing.", unpaid).as_str()));
            }
        }
        if !patron.can_borrow {
            return Ok(ValidationResult::invalid("Patron account has borrowing restrictions."));
        }
        Ok(ValidationResult::ok("Patron can borrow items."))
    }

    async fn borrowing_rules(&self) -> BorrowingRules {
        self.rules.read().await.clone()
    }

    async fn update_borrowing_rules(&self, rules: BorrowingRules) -> LibraryResult<BorrowingRules> {
        if !self.auth.is_admin_session_active() {
            warn!("borrowing rules update rejected without admin session");
            return Err(LibraryError::access_denied(
                "admin login required to update borrowing rules", Some("admin_required".to_string())));
        }
        rules.validate()?;
        let mut current = self.rules.write().await;
        *current = rules.clone();
        info!(rules = %rules, "borrowing rules updated");
        Ok(rules)
    }
}
