use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub struct UnregisterPatronCommand {
    patron_service: Arc<dyn PatronService>,
}

impl UnregisterPatronCommand {
    pub fn new(patron_service: Arc<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UnregisterPatronCommandRequest {
    pub patron_id: String,
}

impl UnregisterPatronCommandRequest {
    pub fn new(patron_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnregisterPatronCommandResponse {
    pub patron: PatronDto,
}

impl UnregisterPatronCommandResponse {
    pub fn new(patron: PatronDto) -> Self {
        Self {
            patron,
        }
    }
}

#[async_trait]
impl Command<UnregisterPatronCommandRequest, UnregisterPatronCommandResponse> for UnregisterPatronCommand {
    async fn execute(&self, req: UnregisterPatronCommandRequest) -> Result<UnregisterPatronCommandResponse, CommandError> {
        self.patron_service.unregister_patron(req.patron_id.as_str())
            .await.map_err(CommandError::from).map(UnregisterPatronCommandResponse::new)
    }
}
