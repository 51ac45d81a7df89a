use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::loans::domain::LoanService;
use crate::loans::dto::ReturnDto;

pub struct ReturnItemCommand {
    loan_service: Arc<dyn LoanService>,
}

impl ReturnItemCommand {
    pub fn new(loan_service: Arc<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReturnItemCommandRequest {
    loan_id: String,
    as_of: NaiveDate,
}

impl ReturnItemCommandRequest {
    pub fn new(loan_id: &str, as_of: NaiveDate) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            as_of,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReturnItemCommandResponse {
    pub receipt: ReturnDto,
}

impl ReturnItemCommandResponse {
    pub fn new(receipt: ReturnDto) -> Self {
        Self {
            receipt,
        }
    }
}

#[async_trait]
impl Command<ReturnItemCommandRequest, ReturnItemCommandResponse> for ReturnItemCommand {
    async fn execute(&self, req: ReturnItemCommandRequest) -> Result<ReturnItemCommandResponse, CommandError> {
        self.loan_service.return_item(req.loan_id.as_str(), req.as_of)
            .await.map_err(CommandError::from).map(ReturnItemCommandResponse::new)
    }
}
