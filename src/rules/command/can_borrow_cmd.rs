use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::rules::domain::EligibilityService;
use crate::rules::domain::model::ValidationResult;

pub struct CanBorrowCommand {
    eligibility_service: Arc<dyn EligibilityService>,
}

impl CanBorrowCommand {
    pub fn new(eligibility_service: Arc<dyn EligibilityService>) -> Self {
        Self {
            eligibility_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CanBorrowCommandRequest {
    patron_id: String,
    as_of: NaiveDate,
}

impl CanBorrowCommandRequest {
    pub fn new(patron_id: &str, as_of: NaiveDate) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            as_of,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CanBorrowCommandResponse {
    pub result: ValidationResult,
}

#[async_trait]
impl Command<CanBorrowCommandRequest, CanBorrowCommandResponse> for CanBorrowCommand {
    async fn execute(&self, req: CanBorrowCommandRequest) -> Result<CanBorrowCommandResponse, CommandError> {
        self.eligibility_service.can_borrow(req.patron_id.as_str(), req.as_of)
            .await.map_err(CommandError::from).map(|result| CanBorrowCommandResponse { result })
    }
}
