use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::patrons::domain::Patron;
use crate::utils::date::serializer;

// PatronEntity abstracts a library member as stored; never deleted, only deactivated.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronEntity {
    pub patron_id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub can_borrow: bool,
    pub loan_ids: Vec<String>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl PatronEntity {
    pub fn new(name: &str, email: &str) -> Self {
        Self::with_id(Uuid::new_v4().to_string().as_str(), name, email)
    }

    pub fn with_id(patron_id: &str, name: &str, email: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            can_borrow: true,
            loan_ids: vec![],
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn add_loan(&mut self, loan_id: &str) {
        if !self.loan_ids.iter().any(|id| id == loan_id) {
            self.loan_ids.push(loan_id.to_string());
        }
    }

    pub fn remove_loan(&mut self, loan_id: &str) {
        self.loan_ids.retain(|id| id != loan_id);
    }

    pub fn has_current_loans(&self) -> bool {
        !self.loan_ids.is_empty()
    }
}

impl Identifiable for PatronEntity {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }
}

impl Patron for PatronEntity {
    fn is_active(&self) -> bool {
        self.active
    }

    fn borrow_override(&self) -> bool {
        self.can_borrow
    }

    fn held_loans(&self) -> Vec<String> {
        self.loan_ids.clone()
    }
}
