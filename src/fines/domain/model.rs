use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::FineStatus;
use crate::utils::date::serializer;

// FineEntity is a monetary obligation of a patron, optionally tied to one loan.
// paid_amount only grows and never exceeds amount.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FineEntity {
    pub fine_id: String,
    pub patron_id: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub loan_id: Option<String>,
    pub reason: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

// PaymentResult reports what a payment did to a fine.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub success: bool,
    pub applied: Decimal,
    pub refund: Decimal,
    pub message: String,
}

impl PaymentResult {
    fn rejected(message: &str) -> Self {
        Self { success: false, applied: Decimal::ZERO, refund: Decimal::ZERO, message: message.to_string() }
    }
}

impl FineEntity {
    pub fn new(patron_id: &str, amount: Decimal, loan_id: Option<&str>, reason: &str) -> Self {
        Self {
            fine_id: Uuid::new_v4().to_string(),
            patron_id: patron_id.to_string(),
            amount,
            paid_amount: Decimal::ZERO,
            loan_id: loan_id.map(|id| id.to_string()),
            reason: reason.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn remaining_balance(&self) -> Decimal {
        (self.amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn is_paid(&self) -> bool {
        self.remaining_balance().is_zero()
    }

    pub fn fine_status(&self) -> FineStatus {
        if self.is_paid() {
            FineStatus::Paid
        } else if self.paid_amount > Decimal::ZERO {
            FineStatus::PartiallyPaid
        } else {
            FineStatus::Unpaid
        }
    }

    // consumes at most the remaining balance, the excess is reported as refund
    pub fn apply_payment(&mut self, amount: Decimal) -> PaymentResult {
        if amount <= Decimal::ZERO {
            return PaymentResult::rejected("Payment amount must be positive.");
        }
        if self.is_paid() {
            return PaymentResult::rejected("Fine has already been paid.");
        }
        let applied = amount.min(self.remaining_balance());
        let refund = amount - applied;
        self.paid_amount += applied;
        let message = if refund > Decimal::ZERO {
            format!("Payment of ${:.2} applied. Overpayment of ${:.2} will be refunded.", applied, refund)
        } else if self.is_paid() {
            format!("Payment of ${:.2} applied. Fine fully paid.", applied)
        } else {
            format!("Payment of ${:.2} applied. Remaining balance: ${:.2}", applied, self.remaining_balance())
        };
        PaymentResult { success: true, applied, refund, message }
    }
}

impl Identifiable for FineEntity {
    fn id(&self) -> String {
        self.fine_id.to_string()
    }
}
