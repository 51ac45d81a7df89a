use std::collections::BTreeMap;
use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use crate::core::events::{NotificationEvent, NotificationEventType};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::fines::domain::model::FineEntity;
use crate::fines::dto::{FineBreakdownDto, FineDto, PaymentReceiptDto};
use crate::fines::repository::FineRepository;
use crate::gateway::hub::NotificationHub;
use crate::loans::repository::LoanRepository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::policy::FinePolicyRegistry;

pub(crate) const GENERAL: &str = "GENERAL";

// FineEngine holds the fine rules. It takes no locks; callers hold the patron scope.
pub(crate) struct FineEngine {
    fine_repository: Arc<dyn FineRepository>,
    loan_repository: Arc<dyn LoanRepository>,
    patron_repository: Arc<dyn PatronRepository>,
    policies: Arc<FinePolicyRegistry>,
    hub: Arc<NotificationHub>,
}

impl FineEngine {
    pub(crate) fn new(fine_repository: Arc<dyn FineRepository>, loan_repository: Arc<dyn LoanRepository>,
                      patron_repository: Arc<dyn PatronRepository>, policies: Arc<FinePolicyRegistry>,
                      hub: Arc<NotificationHub>) -> Self {
        Self {
            fine_repository,
            loan_repository,
            patron_repository,
            policies,
            hub,
        }
    }

    async fn find_patron(&self, patron_id: &str) -> LibraryResult<PatronEntity> {
        if patron_id.trim().is_empty() {
            return Err(LibraryError::not_found("patron id must not be empty"));
        }
        self.patron_repository.get(patron_id).await
    }

    async fn save_patron(&self, patron: &PatronEntity) -> LibraryResult<()> {
        if self.patron_repository.update(patron).await? == 0 {
            return Err(LibraryError::not_written("patron", patron.patron_id.as_str()));
        }
        Ok(())
    }

    pub(crate) async fn find_fine(&self, fine_id: &str) -> LibraryResult<FineEntity> {
        if fine_id.trim().is_empty() {
            return Err(LibraryError::not_found("fine id must not be empty"));
        }
        self.fine_repository.get(fine_id).await
    }

    pub(crate) async fn apply_loan_fine(&self, patron_id: &str, reason: &str, loan_id: &str) -> LibraryResult<FineDto> {
        let patron = self.find_patron(patron_id).await?;
        if loan_id.trim().is_empty() {
            return Err(LibraryError::not_found("loan id must not be empty"));
        }
        let loan = self.loan_repository.get(loan_id).await?;
        if loan.patron_id != patron.patron_id {
            return Err(LibraryError::validation(
                format!("loan {} does not belong to patron {}", loan_id, patron_id).as_str(),
                Some("loan_patron_mismatch".to_string())));
        }
        let amount = self.policies.flat_fine(loan.media_type.as_str());
        if let Some(mut existing) = self.fine_repository.find_by_loan_id(loan_id).await? {
            if !existing.is_paid() && existing.amount != amount {
                let previous = existing.amount;
                existing.amount = amount.max(existing.paid_amount);
                if self.fine_repository.update(&existing).await? == 0 {
                    return Err(LibraryError::not_written("fine", existing.fine_id.as_str()));
                }
                info!(fine_id = existing.fine_id.as_str(), %previous, amount = %existing.amount, "fine amount refreshed");
            } else {
                debug!(fine_id = existing.fine_id.as_str(), loan_id, "fine already exists for loan");
            }
            return Ok(FineDto::from(&existing));
        }
        self.create_fine(patron, amount, Some(loan_id), reason).await
    }

    pub(crate) async fn apply_fine(&self, patron_id: &str, amount: Decimal, reason: &str) -> LibraryResult<FineDto> {
        if amount <= Decimal::ZERO {
            return Err(LibraryError::validation(
                format!("fine amount must be positive, got {}", amount).as_str(), Some("invalid_amount".to_string())));
        }
        let patron = self.find_patron(patron_id).await?;
        self.create_fine(patron, amount, None, reason).await
    }

    async fn create_fine(&self, mut patron: PatronEntity, amount: Decimal,
                         loan_id: Option<&str>, reason: &str) -> LibraryResult<FineDto> {
        let fine = FineEntity::new(patron.patron_id.as_str(), amount, loan_id, reason);
        self.fine_repository.create(&fine).await?;
        patron.can_borrow = false;
        self.save_patron(&patron).await?;
        info!(fine_id = fine.fine_id.as_str(), patron_id = patron.patron_id.as_str(), %amount, "fine applied");
        let dto = FineDto::from(&fine);
        let event = NotificationEvent::with_payload(
            NotificationEventType::FineApplied, Some(&PatronDto::from(&patron)),
            format!("A fine of ${:.2} has been applied to your account for: {}", amount, reason).as_str(), &dto)?;
        self.hub.publish(&event).await;
        Ok(dto)
    }

    pub(crate) async fn pay_fine(&self, fine_id: &str, amount: Decimal) -> LibraryResult<PaymentReceiptDto> {
        if amount <= Decimal::ZERO {
            return Err(LibraryError::validation(
                format!("payment amount must be positive, got {}", amount).as_str(), Some("invalid_amount".to_string())));
        }
        let fine = self.find_fine(fine_id).await?;
        if fine.is_paid() {
            return Err(LibraryError::conflict(
                format!("fine {} has already been paid", fine_id).as_str(), Some("already_paid".to_string())));
        }
        if let Some(loan_id) = &fine.loan_id {
            if let Ok(loan) = self.loan_repository.get(loan_id).await {
                if loan.is_open() {
                    return Err(LibraryError::precondition_failed(
                        format!("item {} must be returned before fine {} can be paid", loan.media_id, fine_id).as_str(),
                        Some("item_not_returned".to_string())));
                }
            }
        }
        let result = self.fine_repository.apply_payment(fine_id, amount).await?;
        if !result.success {
            return Err(LibraryError::validation(result.message.as_str(), Some("payment_rejected".to_string())));
        }
        let fine = self.fine_repository.get(fine_id).await?;
        info!(fine_id, applied = %result.applied, refund = %result.refund, remaining = %fine.remaining_balance(), "fine payment applied");

        let total = self.total_unpaid(fine.patron_id.as_str()).await?;
        let mut patron = self.patron_repository.get(fine.patron_id.as_str()).await?;
        let mut restored = false;
        if total.is_zero() && !patron.can_borrow {
            patron.can_borrow = true;
            self.save_patron(&patron).await?;
            restored = true;
            info!(patron_id = patron.patron_id.as_str(), "borrowing privileges restored");
        } else if !total.is_zero() && patron.can_borrow {
            patron.can_borrow = false;
            self.save_patron(&patron).await?;
        }

        let fine_dto = FineDto::from(&fine);
        let patron_dto = PatronDto::from(&patron);
        if restored {
            let event = NotificationEvent::new(NotificationEventType::BorrowingRestored, Some(&patron_dto),
                                               "All fines have been paid. Borrowing privileges restored.");
            self.hub.publish(&event).await;
        }
        let event = if fine.is_paid() {
            NotificationEvent::with_payload(
                NotificationEventType::FinePaid, Some(&patron_dto),
                format!("Fine {} has been fully paid. Amount: ${:.2}", fine.fine_id, fine.amount).as_str(), &fine_dto)?
        } else {
            NotificationEvent::with_payload(
                NotificationEventType::FinePartiallyPaid, Some(&patron_dto),
                format!("Payment of ${:.2} received for fine {}. Remaining balance: ${:.2}",
                        result.applied, fine.fine_id, fine.remaining_balance()).as_str(), &fine_dto)?
        };
        self.hub.publish(&event).await;

        Ok(PaymentReceiptDto {
            remaining_balance: fine.remaining_balance(),
            fine: fine_dto,
            applied: result.applied,
            refund: result.refund,
            message: result.message,
            borrowing_restored: restored,
        })
    }

    pub(crate) async fn unpaid_fines(&self, patron_id: &str) -> LibraryResult<Vec<FineEntity>> {
        if patron_id.trim().is_empty() {
            return Ok(vec![]);
        }
        self.fine_repository.find_unpaid_by_patron(patron_id).await
    }

    pub(crate) async fn total_unpaid(&self, patron_id: &str) -> LibraryResult<Decimal> {
        Ok(self.unpaid_fines(patron_id).await?.iter()
            .map(|f| f.remaining_balance())
            .sum())
    }

    pub(crate) async fn fine_breakdown(&self, patron_id: &str) -> LibraryResult<Vec<FineBreakdownDto>> {
        let mut groups: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
        for fine in self.unpaid_fines(patron_id).await? {
            let media_type = match &fine.loan_id {
                Some(loan_id) => self.loan_repository.get(loan_id).await
                    .map(|l| l.media_type)
                    .unwrap_or_else(|_| GENERAL.to_string()),
                None => GENERAL.to_string(),
            };
            let entry = groups.entry(media_type).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += fine.remaining_balance();
        }
        Ok(groups.into_iter()
            .map(|(media_type, (count, total))| FineBreakdownDto { media_type, count, total })
            .collect())
    }
}
