use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::fines::dto::FineDto;
use crate::loans::domain::model::LoanEntity;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanDto {
    pub loan_id: String,
    pub patron_id: String,
    pub media_id: String,
    pub media_type: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub overdue: bool,
    pub loan_status: LoanStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanDto {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

impl Identifiable for LoanDto {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> Self {
        Self {
            loan_id: other.loan_id.to_string(),
            patron_id: other.patron_id.to_string(),
            media_id: other.media_id.to_string(),
            media_type: other.media_type.to_string(),
            borrow_date: other.borrow_date,
            due_date: other.due_date,
            return_date: other.return_date,
            overdue: other.overdue,
            loan_status: other.loan_status,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

// ReturnDto is the receipt of a return: the closed loan, how late it was and the fine it raised.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ReturnDto {
    pub loan: LoanDto,
    pub overdue_days: i64,
    pub fine: Option<FineDto>,
}

impl ReturnDto {
    pub fn new(loan: LoanDto, overdue_days: i64, fine: Option<FineDto>) -> Self {
        Self { loan, overdue_days, fine }
    }
}
