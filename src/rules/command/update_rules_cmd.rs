use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::rules::domain::EligibilityService;
use crate::rules::domain::model::BorrowingRules;

pub struct UpdateRulesCommand {
    eligibility_service: Arc<dyn EligibilityService>,
}

impl UpdateRulesCommand {
    pub fn new(eligibility_service: Arc<dyn EligibilityService>) -> Self {
        Self {
            eligibility_service,
        }
    }
}

// Fields left out keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRulesCommandRequest {
    pub max_loans_per_patron: Option<usize>,
    pub loan_period_days: Option<i64>,
    pub restrict_for_overdue: Option<bool>,
    pub restrict_for_unpaid_fines: Option<bool>,
}

impl UpdateRulesCommandRequest {
    fn merge(&self, current: BorrowingRules) -> BorrowingRules {
        BorrowingRules {
            max_loans_per_patron: self.max_loans_per_patron.unwrap_or(current.max_loans_per_patron),
            loan_period_days: self.loan_period_days.unwrap_or(current.loan_period_days),
            restrict_for_overdue: self.restrict_for_overdue.unwrap_or(current.restrict_for_overdue),
            restrict_for_unpaid_fines: self.restrict_for_unpaid_fines.unwrap_or(current.restrict_for_unpaid_fines),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateRulesCommandResponse {
    pub rules: BorrowingRules,
}

#[async_trait]
impl Command<UpdateRulesCommandRequest, UpdateRulesCommandResponse> for UpdateRulesCommand {
    async fn execute(&self, req: UpdateRulesCommandRequest) -> Result<UpdateRulesCommandResponse, CommandError> {
        let rules = req.merge(self.eligibility_service.borrowing_rules().await);
        self.eligibility_service.update_borrowing_rules(rules)
            .await.map_err(CommandError::from).map(|rules| UpdateRulesCommandResponse { rules })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::app::LendingApp;
    use crate::core::auth::SessionAuthService;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::rules::command::update_rules_cmd::{UpdateRulesCommand, UpdateRulesCommandRequest};

    #[tokio::test]
    async fn test_should_run_update_rules() {
        let auth = Arc::new(SessionAuthService::new());
        let app = LendingApp::quiet(&Configuration::new("test"), auth.clone());
        let cmd = UpdateRulesCommand::new(app.eligibility_service.clone());
        let req = || UpdateRulesCommandRequest { max_loans_per_patron: Some(10), ..UpdateRulesCommandRequest::default() };
        assert!(matches!(cmd.execute(req()).await, Err(CommandError::Access { .. })));

        auth.login();
        let res = cmd.execute(req()).await.expect("should update");
        assert_eq!(10, res.rules.max_loans_per_patron);
        assert_eq!(28, res.rules.loan_period_days);
        assert!(res.rules.restrict_for_overdue);
    }
}
