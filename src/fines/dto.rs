use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::FineStatus;
use crate::fines::domain::model::FineEntity;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FineDto {
    pub fine_id: String,
    pub patron_id: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_balance: Decimal,
    pub fine_status: FineStatus,
    pub loan_id: Option<String>,
    pub reason: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl FineDto {
    pub fn is_paid(&self) -> bool {
        self.fine_status == FineStatus::Paid
    }
}

impl Identifiable for FineDto {
    fn id(&self) -> String {
        self.fine_id.to_string()
    }
}

impl From<&FineEntity> for FineDto {
    fn from(other: &FineEntity) -> Self {
        Self {
            fine_id: other.fine_id.to_string(),
            patron_id: other.patron_id.to_string(),
            amount: other.amount,
            paid_amount: other.paid_amount,
            remaining_balance: other.remaining_balance(),
            fine_status: other.fine_status(),
            loan_id: other.loan_id.clone(),
            reason: other.reason.to_string(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

// PaymentReceiptDto is returned by a successful payment.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PaymentReceiptDto {
    pub fine: FineDto,
    pub applied: Decimal,
    pub refund: Decimal,
    pub remaining_balance: Decimal,
    pub message: String,
    pub borrowing_restored: bool,
}

// FineBreakdownDto is one line of a patron's unpaid balance grouped by media type.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FineBreakdownDto {
    pub media_type: String,
    pub count: usize,
    pub total: Decimal,
}
