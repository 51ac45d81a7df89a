use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::FineService;
use crate::fines::dto::FineDto;

pub struct ApplyFineCommand {
    fine_service: Arc<dyn FineService>,
}

impl ApplyFineCommand {
    pub fn new(fine_service: Arc<dyn FineService>) -> Self {
        Self {
            fine_service,
        }
    }
}

// either a loan fine (loan_id set, amount from policy) or an ad hoc fine (amount set)
#[derive(Debug, Deserialize)]
pub struct ApplyFineCommandRequest {
    patron_id: String,
    reason: String,
    loan_id: Option<String>,
    amount: Option<Decimal>,
}

impl ApplyFineCommandRequest {
    pub fn new(patron_id: &str, amount: Decimal, reason: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            reason: reason.to_string(),
            loan_id: None,
            amount: Some(amount),
        }
    }

    pub fn for_loan(patron_id: &str, loan_id: &str, reason: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            reason: reason.to_string(),
            loan_id: Some(loan_id.to_string()),
            amount: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplyFineCommandResponse {
    pub fine: FineDto,
}

impl ApplyFineCommandResponse {
    pub fn new(fine: FineDto) -> Self {
        Self {
            fine,
        }
    }
}

#[async_trait]
impl Command<ApplyFineCommandRequest, ApplyFineCommandResponse> for ApplyFineCommand {
    async fn execute(&self, req: ApplyFineCommandRequest) -> Result<ApplyFineCommandResponse, CommandError> {
        let res = match (&req.loan_id, req.amount) {
            (Some(loan_id), _) => {
                self.fine_service.apply_loan_fine(req.patron_id.as_str(), req.reason.as_str(), loan_id.as_str()).await
            }
            (None, Some(amount)) => {
                self.fine_service.apply_fine(req.patron_id.as_str(), amount, req.reason.as_str()).await
            }
            (None, None) => {
                return Err(CommandError::Validation {
                    message: "either loan_id or amount is required".to_string(),
                    reason_code: Some("invalid_amount".to_string()),
                });
            }
        };
        res.map_err(CommandError::from).map(ApplyFineCommandResponse::new)
    }
}
