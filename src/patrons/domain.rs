pub mod model;
pub mod service;

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::domain::Identifiable;
use crate::core::library::LibraryResult;
use crate::patrons::dto::PatronDto;

#[async_trait]
pub trait PatronService: Sync + Send {
    async fn register_patron(&self, name: &str, email: &str) -> LibraryResult<PatronDto>;
    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto>;
    async fn unregister_patron(&self, id: &str) -> LibraryResult<PatronDto>;
    async fn reactivate_patron(&self, id: &str) -> LibraryResult<PatronDto>;
    async fn active_patrons(&self) -> LibraryResult<Vec<PatronDto>>;
    async fn inactive_patrons(&self) -> LibraryResult<Vec<PatronDto>>;
    async fn is_eligible(&self, id: &str) -> LibraryResult<bool>;
}

pub trait Patron: Identifiable {
    fn is_active(&self) -> bool;
    fn borrow_override(&self) -> bool;
    fn held_loans(&self) -> Vec<String>;

    // derived eligibility: registered, not manually restricted and nothing owed
    fn is_eligible(&self, total_unpaid: Decimal) -> bool {
        self.is_active() && self.borrow_override() && total_unpaid.is_zero()
    }
}
