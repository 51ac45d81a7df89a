use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;

pub struct RegisterPatronCommand {
    patron_service: Arc<dyn PatronService>,
}

impl RegisterPatronCommand {
    pub fn new(patron_service: Arc<dyn PatronService>) -> Self {
        Self {
            patron_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPatronCommandRequest {
    pub name: String,
    pub email: String,
}

impl RegisterPatronCommandRequest {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterPatronCommandResponse {
    pub patron: PatronDto,
}

impl RegisterPatronCommandResponse {
    pub fn new(patron: PatronDto) -> Self {
        Self {
            patron,
        }
    }
}

#[async_trait]
impl Command<RegisterPatronCommandRequest, RegisterPatronCommandResponse> for RegisterPatronCommand {
    async fn execute(&self, req: RegisterPatronCommandRequest) -> Result<RegisterPatronCommandResponse, CommandError> {
        self.patron_service.register_patron(req.name.as_str(), req.email.as_str())
            .await.map_err(CommandError::from).map(RegisterPatronCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::app::LendingApp;
    use crate::core::auth::SessionAuthService;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::patrons::command::register_patron_cmd::{RegisterPatronCommand, RegisterPatronCommandRequest};

    lazy_static! {
        static ref SUT_CMD : AsyncOnce<RegisterPatronCommand> = AsyncOnce::new(async {
                let app = LendingApp::quiet(&Configuration::new("test"), Arc::new(SessionAuthService::new()));
                RegisterPatronCommand::new(app.patron_service.clone())
            });
    }

    #[tokio::test]
    async fn test_should_run_register_patron() {
        let cmd = SUT_CMD.get().await;
        let res = cmd.execute(RegisterPatronCommandRequest::new("Ann", "ann@example.org")).await.expect("should register");
        assert_eq!("Ann", res.patron.name.as_str());
        assert!(res.patron.active);
    }

    #[tokio::test]
    async fn test_should_reject_blank_name() {
        let cmd = SUT_CMD.get().await;
        let err = cmd.execute(RegisterPatronCommandRequest::new("", "ann@example.org")).await;
        assert!(matches!(err, Err(CommandError::Validation { .. })));
    }
}
