use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::library::LibraryResult;
use crate::fines::domain::engine::FineEngine;
use crate::fines::domain::FineService;
use crate::fines::dto::{FineBreakdownDto, FineDto, PaymentReceiptDto};
use crate::utils::locks::{patron_key, KeyedLocks};

pub(crate) struct FineServiceImpl {
    engine: Arc<FineEngine>,
    locks: Arc<KeyedLocks>,
}

impl FineServiceImpl {
    pub(crate) fn new(engine: Arc<FineEngine>, locks: Arc<KeyedLocks>) -> Self {
        Self {
            engine,
            locks,
        }
    }
}

#[async_trait]
impl FineService for FineServiceImpl {
    async fn apply_loan_fine(&self, patron_id: &str, reason: &str, loan_id: &str) -> LibraryResult<FineDto> {
        let _guard = self.locks.lock(patron_key(patron_id).as_str()).await;
        self.engine.apply_loan_fine(patron_id, reason, loan_id).await
    }

    async fn apply_fine(&self, patron_id: &str, amount: Decimal, reason: &str) -> LibraryResult<FineDto> {
        let _guard = self.locks.lock(patron_key(patron_id).as_str()).await;
        self.engine.apply_fine(patron_id, amount, reason).await
    }

    async fn pay_fine(&self, fine_id: &str, amount: Decimal) -> LibraryResult<PaymentReceiptDto> {
        // the owning patron is only known after reading the fine; the engine re-reads it under lock
        let fine = self.engine.find_fine(fine_id).await?;
        let _guard = self.locks.lock(patron_key(fine.patron_id.as_str()).as_str()).await;
        self.engine.pay_fine(fine_id, amount).await
    }

    async fn get_unpaid_fines(&self, patron_id: &str) -> LibraryResult<Vec<FineDto>> {
        Ok(self.engine.unpaid_fines(patron_id).await?.iter().map(FineDto::from).collect())
    }

    async fn get_total_unpaid(&self, patron_id: &str) -> LibraryResult<Decimal> {
        self.engine.total_unpaid(patron_id).await
    }

    async fn fine_breakdown(&self, patron_id: &str) -> LibraryResult<Vec<FineBreakdownDto>> {
        self.engine.fine_breakdown(patron_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use crate::core::events::NotificationEventType;
    use crate::core::library::{FineStatus, LibraryError};
    use crate::core::repository::Repository;
    use crate::fines::domain::FineService;
    use crate::fines::factory::{create_fine_engine, create_fine_repository, create_fine_service};
    use crate::gateway::hub::NotificationHub;
    use crate::gateway::recording::{HangingSink, RecordingSink};
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::factory::create_loan_repository;
    use crate::loans::repository::LoanRepository;
    use crate::patrons::domain::Patron;
    use crate::patrons::domain::model::PatronEntity;
    use crate::patrons::factory::create_patron_repository;
    use crate::patrons::repository::PatronRepository;
    use crate::policy::FinePolicyRegistry;
    use crate::utils::locks::KeyedLocks;

    struct Fixture {
        service: Arc<dyn FineService>,
        patrons: Arc<dyn PatronRepository>,
        loans: Arc<dyn LoanRepository>,
        policies: Arc<FinePolicyRegistry>,
        hub: Arc<NotificationHub>,
        sink: Arc<RecordingSink>,
    }

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("date") + Duration::days(n)
    }

    fn fixture() -> Fixture {
        let patrons = create_patron_repository();
        let loans = create_loan_repository();
        let policies = Arc::new(FinePolicyRegistry::new());
        let hub = Arc::new(NotificationHub::new());
        let sink = Arc::new(RecordingSink::new("recording"));
        let _ = hub.attach(sink.clone());
        let engine = create_fine_engine(create_fine_repository(), loans.clone(), patrons.clone(), policies.clone(), hub.clone());
        let service = create_fine_service(engine, Arc::new(KeyedLocks::new()));
        Fixture { service, patrons, loans, policies, hub, sink }
    }

    async fn patron(fx: &Fixture, name: &str) -> PatronEntity {
        let patron = PatronEntity::new(name, format!("{}@example.org", name).as_str());
        let _ = fx.patrons.create(&patron).await.expect("should create patron");
        patron
    }

    async fn returned_loan(fx: &Fixture, patron: &PatronEntity, media_type: &str) -> LoanEntity {
        let loan = LoanEntity::new(patron.patron_id.as_str(), "item", media_type, day(0), 28);
        let _ = fx.loans.create(&loan).await.expect("should create loan");
        assert!(fx.loans.mark_returned(loan.loan_id.as_str(), day(35)).await.expect("should return"));
        loan
    }

    #[tokio::test]
    async fn test_should_apply_loan_fine_once() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let loan = returned_loan(&fx, &ann, "CD").await;
        let first = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await.expect("should fine");
        let second = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await.expect("should fine");
        assert_eq!(first.fine_id, second.fine_id);
        assert_eq!(Decimal::new(2000, 2), first.amount);
        assert_eq!(1, fx.service.get_unpaid_fines(ann.patron_id.as_str()).await.expect("should list").len());
        assert!(!fx.patrons.get(ann.patron_id.as_str()).await.expect("should get").can_borrow);
        fx.hub.flush().await;
        assert_eq!(vec![NotificationEventType::FineApplied], fx.sink.kinds());
        let event = &fx.sink.events()[0];
        assert_eq!("A fine of $20.00 has been applied to your account for: late", event.message.as_str());
        assert!(event.payload.is_some());
    }

    #[tokio::test]
    async fn test_should_refresh_unpaid_fine_to_current_policy() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let loan = returned_loan(&fx, &ann, "BOOK").await;
        let _ = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await.expect("should fine");
        fx.policies.register_flat("BOOK", Decimal::new(1200, 2)).expect("should register");
        let refreshed = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await.expect("should fine");
        assert_eq!(Decimal::new(1200, 2), refreshed.amount);
        assert_eq!(Decimal::new(1200, 2), fx.service.get_total_unpaid(ann.patron_id.as_str()).await.expect("should sum"));
        fx.hub.flush().await;
        assert_eq!(1, fx.sink.events().len());
    }

    #[tokio::test]
    async fn test_should_use_registered_and_fallback_policies() {
        let fx = fixture();
        fx.policies.register_flat("journal", Decimal::new(1500, 2)).expect("should register");
        let ann = patron(&fx, "ann").await;
        let journal = returned_loan(&fx, &ann, "JOURNAL").await;
        let dvd = returned_loan(&fx, &ann, "DVD").await;
        let fine = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", journal.loan_id.as_str()).await.expect("should fine");
        assert_eq!(Decimal::new(1500, 2), fine.amount);
        let fine = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", dvd.loan_id.as_str()).await.expect("should fine");
        assert_eq!(Decimal::new(1000, 2), fine.amount);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_fines() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let bob = patron(&fx, "bob").await;
        let loan = returned_loan(&fx, &bob, "BOOK").await;
        let res = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::ZERO, "nothing").await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        let res = fx.service.apply_fine("", Decimal::ONE, "nobody").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        let res = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        let res = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", "missing").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        fx.hub.flush().await;
        assert!(fx.sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_should_pay_partially_then_fully_and_restore() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let fine = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(1000, 2), "lost card").await.expect("should fine");
        let receipt = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(400, 2)).await.expect("should pay");
        assert_eq!(FineStatus::PartiallyPaid, receipt.fine.fine_status);
        assert_eq!(Decimal::new(600, 2), receipt.remaining_balance);
        assert!(!receipt.borrowing_restored);
        assert!(!fx.patrons.get(ann.patron_id.as_str()).await.expect("should get").can_borrow);

        let receipt = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(1000, 2)).await.expect("should pay");
        assert_eq!(Decimal::new(600, 2), receipt.applied);
        assert_eq!(Decimal::new(400, 2), receipt.refund);
        assert_eq!(Decimal::ZERO, receipt.remaining_balance);
        assert!(receipt.borrowing_restored);
        assert!(fx.patrons.get(ann.patron_id.as_str()).await.expect("should get").can_borrow);
        fx.hub.flush().await;
        assert_eq!(vec![NotificationEventType::FineApplied, NotificationEventType::FinePartiallyPaid,
                        NotificationEventType::BorrowingRestored, NotificationEventType::FinePaid], fx.sink.kinds());
        let paid = fx.sink.events().last().cloned().expect("should have event");
        assert_eq!(format!("Fine {} has been fully paid. Amount: $10.00", fine.fine_id), paid.message);

        let res = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::ONE).await;
        assert!(matches!(res, Err(LibraryError::Conflict { .. })));
        assert_eq!(Some("already_paid"), res.err().as_ref().and_then(|e| e.reason()));
    }

    #[tokio::test]
    async fn test_should_keep_flag_while_other_fines_remain() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let first = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(300, 2), "a").await.expect("should fine");
        let _ = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(200, 2), "b").await.expect("should fine");
        let receipt = fx.service.pay_fine(first.fine_id.as_str(), Decimal::new(300, 2)).await.expect("should pay");
        assert!(!receipt.borrowing_restored);
        assert_eq!(Decimal::new(200, 2), fx.service.get_total_unpaid(ann.patron_id.as_str()).await.expect("should sum"));
        assert!(!fx.patrons.get(ann.patron_id.as_str()).await.expect("should get").can_borrow);
    }

    #[tokio::test]
    async fn test_should_reject_payment_for_open_loan() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let loan = LoanEntity::new(ann.patron_id.as_str(), "b1", "BOOK", day(0), 28);
        let _ = fx.loans.create(&loan).await.expect("should create loan");
        let fine = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", loan.loan_id.as_str()).await.expect("should fine");
        let res = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(1000, 2)).await;
        assert_eq!(Some("item_not_returned"), res.err().as_ref().and_then(|e| e.reason()));
        assert!(fx.loans.mark_returned(loan.loan_id.as_str(), day(35)).await.expect("should return"));
        let receipt = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(1000, 2)).await.expect("should pay");
        assert!(receipt.borrowing_restored);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_payments() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let fine = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(500, 2), "late").await.expect("should fine");
        let res = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::ZERO).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        let res = fx.service.pay_fine("missing", Decimal::ONE).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        let res = fx.service.pay_fine("", Decimal::ONE).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_answer_empty_for_unknown_patron() {
        let fx = fixture();
        assert!(fx.service.get_unpaid_fines("").await.expect("should list").is_empty());
        assert!(fx.service.get_unpaid_fines("nobody").await.expect("should list").is_empty());
        assert_eq!(Decimal::ZERO, fx.service.get_total_unpaid("nobody").await.expect("should sum"));
        assert!(fx.service.fine_breakdown("nobody").await.expect("should group").is_empty());
    }

    #[tokio::test]
    async fn test_should_break_down_by_media_type() {
        let fx = fixture();
        let ann = patron(&fx, "ann").await;
        let book = returned_loan(&fx, &ann, "BOOK").await;
        let cd = returned_loan(&fx, &ann, "CD").await;
        let _ = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", book.loan_id.as_str()).await.expect("should fine");
        let _ = fx.service.apply_loan_fine(ann.patron_id.as_str(), "late", cd.loan_id.as_str()).await.expect("should fine");
        let _ = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(250, 2), "lost card").await.expect("should fine");
        let breakdown = fx.service.fine_breakdown(ann.patron_id.as_str()).await.expect("should group");
        let lines: Vec<(String, usize, Decimal)> = breakdown.iter().map(|b| (b.media_type.clone(), b.count, b.total)).collect();
        assert_eq!(vec![("BOOK".to_string(), 1, Decimal::new(1000, 2)),
                        ("CD".to_string(), 1, Decimal::new(2000, 2)),
                        ("GENERAL".to_string(), 1, Decimal::new(250, 2))], lines);
    }

    #[tokio::test]
    async fn test_should_restore_flag_for_inactive_patron_paying_off() {
        let fx = fixture();
        let mut ann = patron(&fx, "ann").await;
        let fine = fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(500, 2), "lost card").await.expect("should fine");
        ann = fx.patrons.get(ann.patron_id.as_str()).await.expect("should get");
        ann.active = false;
        let _ = fx.patrons.update(&ann).await.expect("should update");

        let receipt = fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(500, 2)).await.expect("should pay");
        assert!(receipt.borrowing_restored);
        let stored = fx.patrons.get(ann.patron_id.as_str()).await.expect("should get");
        assert!(stored.can_borrow);
        assert!(!stored.active);
        assert!(!stored.is_eligible(Decimal::ZERO));
        fx.hub.flush().await;
        assert!(fx.sink.kinds().contains(&NotificationEventType::BorrowingRestored));
    }

    #[tokio::test]
    async fn test_should_not_block_on_hanging_sink() {
        let fx = fixture();
        let _ = fx.hub.attach(Arc::new(HangingSink));
        let ann = patron(&fx, "ann").await;
        let within = std::time::Duration::from_secs(2);
        let fine = tokio::time::timeout(within, fx.service.apply_fine(ann.patron_id.as_str(), Decimal::new(300, 2), "a"))
            .await.expect("should not hang").expect("should fine");
        let receipt = tokio::time::timeout(within, fx.service.pay_fine(fine.fine_id.as_str(), Decimal::new(300, 2)))
            .await.expect("should not hang").expect("should pay");
        assert!(receipt.borrowing_restored);
        for _ in 0..100 {
            if fx.sink.events().len() == 3 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(vec![NotificationEventType::FineApplied, NotificationEventType::BorrowingRestored,
                        NotificationEventType::FinePaid], fx.sink.kinds());
    }
}
