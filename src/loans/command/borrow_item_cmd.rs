use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::loans::domain::LoanService;
use crate::loans::dto::LoanDto;

pub struct BorrowItemCommand {
    loan_service: Arc<dyn LoanService>,
}

impl BorrowItemCommand {
    pub fn new(loan_service: Arc<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BorrowItemCommandRequest {
    patron_id: String,
    media_id: String,
    media_type: String,
    as_of: NaiveDate,
}

impl BorrowItemCommandRequest {
    pub fn new(patron_id: &str, media_id: &str, media_type: &str, as_of: NaiveDate) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            media_id: media_id.to_string(),
            media_type: media_type.to_string(),
            as_of,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BorrowItemCommandResponse {
    pub loan: LoanDto,
}

impl BorrowItemCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<BorrowItemCommandRequest, BorrowItemCommandResponse> for BorrowItemCommand {
    async fn execute(&self, req: BorrowItemCommandRequest) -> Result<BorrowItemCommandResponse, CommandError> {
        self.loan_service.borrow(req.patron_id.as_str(), req.media_id.as_str(), req.media_type.as_str(), req.as_of)
            .await.map_err(CommandError::from).map(BorrowItemCommandResponse::new)
    }
}
