use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use crate::core::domain::Configuration;
use crate::core::events::{NotificationEvent, NotificationEventType};
use crate::core::library::{normalize_media_type, LibraryError, LibraryResult, CD};
use crate::fines::domain::engine::FineEngine;
use crate::gateway::hub::NotificationHub;
use crate::loans::domain::LoanService;
use crate::loans::domain::model::LoanEntity;
use crate::loans::dto::{LoanDto, ReturnDto};
use crate::loans::repository::LoanRepository;
use crate::media::repository::MediaRepository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;
use crate::utils::locks::{item_key, patron_key, KeyedLocks};

pub(crate) struct LoanServiceImpl {
    book_loan_days: i64,
    cd_loan_days: i64,
    loan_repository: Arc<dyn LoanRepository>,
    media_repository: Arc<dyn MediaRepository>,
    patron_repository: Arc<dyn PatronRepository>,
    fine_engine: Arc<FineEngine>,
    hub: Arc<NotificationHub>,
    locks: Arc<KeyedLocks>,
}

// Open loans of one patron after recomputing their overdue flags.
struct OverdueScan {
    open: Vec<LoanEntity>,
    newly_overdue: Vec<LoanEntity>,
}

impl OverdueScan {
    fn overdue(&self) -> Vec<&LoanEntity> {
        self.open.iter().filter(|l| l.overdue).collect()
    }
}

pub(crate) fn overdue_reason(loan: &LoanEntity, as_of: NaiveDate) -> String {
    format!("Overdue {} (Loan: {}) - {} days overdue", loan.media_type, loan.loan_id, loan.overdue_days(as_of))
}

fn reminder_message(count: usize) -> String {
    format!("You have {} overdue item(s). Please return them as soon as possible.", count)
}

impl LoanServiceImpl {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(config: &Configuration, loan_repository: Arc<dyn LoanRepository>,
                      media_repository: Arc<dyn MediaRepository>, patron_repository: Arc<dyn PatronRepository>,
                      fine_engine: Arc<FineEngine>, hub: Arc<NotificationHub>, locks: Arc<KeyedLocks>) -> Self {
        Self {
            book_loan_days: config.book_loan_days,
            cd_loan_days: config.cd_loan_days,
            loan_repository,
            media_repository,
            patron_repository,
            fine_engine,
            hub,
            locks,
        }
    }

    async fn save_patron(&self, patron: &PatronEntity) -> LibraryResult<()> {
        if self.patron_repository.update(patron).await? == 0 {
            return Err(LibraryError::not_written("patron", patron.patron_id.as_str()));
        }
        Ok(())
    }

    // recomputes the cached overdue flag of each open loan of the patron; only the flag is written back
    async fn scan_open_loans(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<OverdueScan> {
        let mut scan = OverdueScan { open: vec![], newly_overdue: vec![] };
        for mut loan in self.loan_repository.find_by_patron(patron_id).await? {
            if !loan.is_open() {
                continue;
            }
            let newly = self.loan_repository.refresh_overdue(loan.loan_id.as_str(), as_of).await?;
            let _ = loan.refresh_overdue(as_of);
            if newly {
                scan.newly_overdue.push(loan.clone());
            }
            scan.open.push(loan);
        }
        Ok(scan)
    }

    async fn publish_overdue(&self, patron: &PatronEntity, loans: &[LoanEntity]) -> LibraryResult<()> {
        let dtos: Vec<LoanDto> = loans.iter().map(LoanDto::from).collect();
        let event = NotificationEvent::with_payload(
            NotificationEventType::OverdueDetected, Some(&PatronDto::from(patron)),
            reminder_message(dtos.len()).as_str(), &dtos)?;
        self.hub.publish(&event).await;
        Ok(())
    }
}

#[async_trait]
impl LoanService for LoanServiceImpl {
    async fn borrow(&self, patron_id: &str, media_id: &str, media_type: &str, as_of: NaiveDate) -> LibraryResult<LoanDto> {
        if patron_id.trim().is_empty() {
            return Err(LibraryError::not_found("patron id must not be empty"));
        }
        let _ = self.patron_repository.get(patron_id).await?;
        let _guards = self.locks.lock_all(&[patron_key(patron_id), item_key(media_id)]).await;

        let patron = self.patron_repository.get(patron_id).await?;
        if !patron.active {
            return Err(LibraryError::precondition_failed(
                format!("patron {} is not active", patron_id).as_str(), Some("inactive".to_string())));
        }

        let scan = self.scan_open_loans(patron_id, as_of).await?;
        if !scan.newly_overdue.is_empty() {
            self.publish_overdue(&patron, &scan.newly_overdue).await?;
        }
        for loan in scan.overdue() {
            let _ = self.fine_engine.apply_loan_fine(patron_id, overdue_reason(loan, as_of).as_str(),
                                                     loan.loan_id.as_str()).await?;
        }

        let overdue = scan.overdue().len();
        let unpaid = self.fine_engine.total_unpaid(patron_id).await?;
        if unpaid > Decimal::ZERO {
            if overdue > 0 {
                return Err(LibraryError::precondition_failed(
                    format!("patron {} has {} overdue item(s) and unpaid fines of ${:.2}", patron_id, overdue, unpaid).as_str(),
                    Some("overdue".to_string())));
            }
            return Err(LibraryError::precondition_failed(
                format!("patron {} has unpaid fines of ${:.2}", patron_id, unpaid).as_str(),
                Some("unpaid_fines".to_string())));
        }
        if overdue > 0 {
            return Err(LibraryError::precondition_failed(
                format!("patron {} has {} overdue item(s)", patron_id, overdue).as_str(),
                Some("overdue".to_string())));
        }

        // the fine engine may have touched the patron above
        let mut patron = self.patron_repository.get(patron_id).await?;
        if !patron.can_borrow {
            patron.can_borrow = true;
            self.save_patron(&patron).await?;
            info!(patron_id, "stale borrowing flag restored");
        }

        if media_id.trim().is_empty() {
            return Err(LibraryError::not_found("item id must not be empty"));
        }
        let media = self.media_repository.find_by_id_and_type(media_id, media_type).await?;
        if !media.available {
            return Err(LibraryError::conflict(
                format!("item {} is not available", media_id).as_str(), Some("unavailable".to_string())));
        }

        let loan = LoanEntity::new(patron_id, media_id, media.media_type.as_str(), as_of,
                                   self.loan_period_for(media.media_type.as_str()));
        self.loan_repository.create(&loan).await?;
        if !self.media_repository.set_available(media_id, false).await? {
            return Err(LibraryError::not_written("media", media_id));
        }
        patron.add_loan(loan.loan_id.as_str());
        self.save_patron(&patron).await?;
        info!(loan_id = loan.loan_id.as_str(), patron_id, media_id, due_date = %loan.due_date, "loan created");
        Ok(LoanDto::from(&loan))
    }

    async fn return_item(&self, loan_id: &str, as_of: NaiveDate) -> LibraryResult<ReturnDto> {
        if loan_id.trim().is_empty() {
            return Err(LibraryError::not_found("loan id must not be empty"));
        }
        let loan = self.loan_repository.get(loan_id).await?;
        let _guards = self.locks.lock_all(&[patron_key(loan.patron_id.as_str()), item_key(loan.media_id.as_str())]).await;

        let loan = self.loan_repository.get(loan_id).await?;
        if !loan.is_open() {
            return Err(LibraryError::conflict(
                format!("loan {} has already been returned", loan_id).as_str(), Some("already_returned".to_string())));
        }
        let _ = self.media_repository.get(loan.media_id.as_str()).await?;
        if !self.loan_repository.mark_returned(loan_id, as_of).await? {
            return Err(LibraryError::conflict(
                format!("loan {} has already been returned", loan_id).as_str(), Some("already_returned".to_string())));
        }
        if !self.media_repository.set_available(loan.media_id.as_str(), true).await? {
            return Err(LibraryError::not_written("media", loan.media_id.as_str()));
        }
        let loan = self.loan_repository.get(loan_id).await?;
        info!(loan_id, patron_id = loan.patron_id.as_str(), return_date = %as_of, "loan returned");

        let patron = match self.patron_repository.get(loan.patron_id.as_str()).await {
            Ok(mut patron) => {
                patron.remove_loan(loan_id);
                self.save_patron(&patron).await?;
                Some(patron)
            }
            Err(LibraryError::NotFound { .. }) => {
                warn!(loan_id, patron_id = loan.patron_id.as_str(), "returned loan has no patron record");
                None
            }
            Err(err) => return Err(err),
        };

        let overdue_days = loan.overdue_days(as_of);
        let fine = match patron {
            Some(patron) if as_of > loan.due_date => {
                Some(self.fine_engine.apply_loan_fine(patron.patron_id.as_str(),
                                                      overdue_reason(&loan, as_of).as_str(), loan_id).await?)
            }
            _ => None,
        };
        Ok(ReturnDto::new(LoanDto::from(&loan), overdue_days, fine))
    }

    async fn has_overdue_loans(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<bool> {
        let scan = self.scan_open_loans(patron_id, as_of).await?;
        Ok(!scan.overdue().is_empty())
    }

    async fn get_open_loans(&self, patron_id: &str, as_of: NaiveDate) -> LibraryResult<Vec<LoanDto>> {
        let scan = self.scan_open_loans(patron_id, as_of).await?;
        Ok(scan.open.iter().map(LoanDto::from).collect())
    }

    async fn get_overdue_loans(&self, as_of: NaiveDate) -> LibraryResult<Vec<LoanDto>> {
        let mut overdue = vec![];
        for mut loan in self.loan_repository.find_overdue(as_of).await? {
            let _ = self.loan_repository.refresh_overdue(loan.loan_id.as_str(), as_of).await?;
            let _ = loan.refresh_overdue(as_of);
            overdue.push(LoanDto::from(&loan));
        }
        Ok(overdue)
    }

    async fn send_overdue_reminders(&self, as_of: NaiveDate) -> LibraryResult<usize> {
        let mut by_patron: Vec<(String, Vec<LoanEntity>)> = vec![];
        for mut loan in self.loan_repository.find_overdue(as_of).await? {
            let _ = self.loan_repository.refresh_overdue(loan.loan_id.as_str(), as_of).await?;
            let _ = loan.refresh_overdue(as_of);
            match by_patron.iter_mut().find(|(id, _)| *id == loan.patron_id) {
                Some((_, loans)) => loans.push(loan),
                None => by_patron.push((loan.patron_id.clone(), vec![loan])),
            }
        }
        let mut notified = 0;
        for (patron_id, loans) in by_patron {
            match self.patron_repository.get(patron_id.as_str()).await {
                Ok(patron) => {
                    self.publish_overdue(&patron, &loans).await?;
                    notified += 1;
                }
                Err(err) => {
                    warn!(patron_id = patron_id.as_str(), error = %err, "overdue reminder skipped");
                }
            }
        }
        debug!(notified, %as_of, "overdue reminders sent");
        Ok(notified)
    }

    fn loan_period_for(&self, media_type: &str) -> i64 {
        match normalize_media_type(media_type).as_str() {
            CD => self.cd_loan_days,
            _ => self.book_loan_days,
        }
    }
}
