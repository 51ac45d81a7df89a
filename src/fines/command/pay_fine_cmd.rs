use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::fines::domain::FineService;
use crate::fines::dto::PaymentReceiptDto;

pub struct PayFineCommand {
    fine_service: Arc<dyn FineService>,
}

impl PayFineCommand {
    pub fn new(fine_service: Arc<dyn FineService>) -> Self {
        Self {
            fine_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PayFineCommandRequest {
    fine_id: String,
    amount: Decimal,
}

impl PayFineCommandRequest {
    pub fn new(fine_id: &str, amount: Decimal) -> Self {
        Self {
            fine_id: fine_id.to_string(),
            amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayFineCommandResponse {
    pub receipt: PaymentReceiptDto,
}

impl PayFineCommandResponse {
    pub fn new(receipt: PaymentReceiptDto) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<PayFineCommandRequest, PayFineCommandResponse> for PayFineCommand {
    async fn execute(&self, req: PayFineCommandRequest) -> Result<PayFineCommandResponse, CommandError> {
        self.fine_service.pay_fine(req.fine_id.as_str(), req.amount)
            .await.map_err(CommandError::from).map(PayFineCommandResponse::new)
    }
}
