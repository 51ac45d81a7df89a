use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::patrons::domain::Patron;
use crate::patrons::domain::model::PatronEntity;
use crate::utils::date::serializer;


// PatronDto abstracts library member as seen by callers and carried on events.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronDto {
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

impl PatronDto {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            patron_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            active: true,
            can_borrow: true,
            loan_ids: vec![],
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for PatronDto {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }
}

impl Patron for PatronDto {
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

impl From<&PatronEntity> for PatronDto {
    fn from(other: &PatronEntity) -> Self {
        Self {
            patron_id: other.patron_id.to_string(),
            name: other.name.to_string(),
            email: other.email.to_string(),
            active: other.active,
            can_borrow: other.can_borrow,
            loan_ids: other.loan_ids.clone(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&PatronDto> for PatronEntity {
    fn from(other: &PatronDto) -> Self {
        Self {
            patron_id: other.patron_id.to_string(),
            name: other.name.to_string(),
            email: other.email.to_string(),
            active: other.active,
            can_borrow: other.can_borrow,
            loan_ids: other.loan_ids.clone(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::patrons::domain::Patron;
    use crate::patrons::domain::model::PatronEntity;
    use crate::patrons::dto::PatronDto;

    #[tokio::test]
    async fn test_should_build_patron() {
        let patron = PatronDto::new("Ann", "email@org.cc");
        assert_eq!("email@org.cc", patron.email.as_str());
        assert!(patron.is_eligible(Decimal::ZERO));
        assert!(!patron.is_eligible(Decimal::new(1, 2)));
    }

    #[tokio::test]
    async fn test_should_convert_entity() {
        let mut entity = PatronEntity::new("Ann", "ann@example.org");
        entity.add_loan("l1");
        entity.can_borrow = false;
        let dto = PatronDto::from(&entity);
        assert_eq!(entity.patron_id, dto.patron_id);
        assert_eq!(vec!["l1".to_string()], dto.held_loans());
        assert!(!dto.borrow_override());
        assert_eq!(entity, PatronEntity::from(&dto));
    }
}
