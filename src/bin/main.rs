use std::sync::Arc;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};
use lending::app::LendingApp;
use lending::patrons::domain::PatronService;
use lending::loans::domain::LoanService;
use lending::fines::domain::FineService;
use lending::rules::domain::EligibilityService;
use lending::core::auth::SessionAuthService;
use lending::core::domain::Configuration;
use lending::core::library::{LibraryError, LibraryResult};
use lending::rules::domain::model::BorrowingRules;
use lending::utils::logs::setup_tracing;

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> LibraryResult<()> {
    setup_tracing();

    let config = if DEV_MODE {
        Configuration::from_env("dev")
    } else {
        Configuration::from_env("prod")
    };
    let auth = Arc::new(SessionAuthService::new());
    let app = LendingApp::new(&config, auth.clone());

    let _ = app.add_media("B1", "BOOK", "The Left Hand of Darkness").await?;
    let _ = app.add_media("B2", "BOOK", "Middlemarch").await?;
    let _ = app.add_media("C1", "CD", "A Love Supreme").await?;
    let patron = app.patron_service.register_patron("Ada Reader", "ada@example.org").await?;
    let patron_id = patron.patron_id.as_str();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .ok_or_else(|| LibraryError::validation("invalid start date", None))?;
    let loan = app.loan_service.borrow(patron_id, "B1", "BOOK", start).await?;
    info!(loan_id = %loan.loan_id, due = %loan.due_date, "book lent");

    match app.loan_service.borrow(patron_id, "B2", "BOOK", start + Duration::days(30)).await {
        Ok(_) => info!("second book lent"),
        Err(err) => info!(reason = err.reason().unwrap_or_default(), "second loan refused: {}", err),
    }
    let verdict = app.eligibility_service.can_borrow(patron_id, start + Duration::days(30)).await?;
    info!(%verdict, "eligibility");

    let receipt = app.loan_service.return_item(loan.loan_id.as_str(), start + Duration::days(35)).await?;
    info!(overdue_days = receipt.overdue_days, "book returned");
    if let Some(fine) = receipt.fine {
        let paid = app.fine_service.pay_fine(fine.fine_id.as_str(), Decimal::new(1000, 2)).await?;
        info!(remaining = %paid.remaining_balance, restored = paid.borrowing_restored, "{}", paid.message);
    }

    let loan = app.loan_service.borrow(patron_id, "C1", "CD", start + Duration::days(36)).await?;
    let reminders = app.loan_service.send_overdue_reminders(start + Duration::days(50)).await?;
    info!(reminders, "overdue reminders sent");
    let receipt = app.loan_service.return_item(loan.loan_id.as_str(), start + Duration::days(50)).await?;
    info!(overdue_days = receipt.overdue_days, fine = ?receipt.fine.map(|f| f.amount), "disc returned");

    auth.login();
    let raised = BorrowingRules { max_loans_per_patron: 10, ..app.eligibility_service.borrowing_rules().await };
    let rules = app.eligibility_service.update_borrowing_rules(raised).await?;
    auth.logout();
    info!(%rules, "borrowing rules");

    if tokio::time::timeout(std::time::Duration::from_secs(10), app.hub.flush()).await.is_err() {
        warn!("notification sinks still busy at shutdown");
    }
    Ok(())
}
