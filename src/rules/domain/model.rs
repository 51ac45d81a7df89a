use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

// BorrowingRules is the runtime-mutable lending configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BorrowingRules {
    pub max_loans_per_patron: usize,
    pub loan_period_days: i64,
    pub restrict_for_overdue: bool,
    pub restrict_for_unpaid_fines: bool,
}

impl Default for BorrowingRules {
    fn default() -> Self {
        Self {
            max_loans_per_patron: 5,
            loan_period_days: 28,
            restrict_for_overdue: true,
            restrict_for_unpaid_fines: true,
        }
    }
}

impl BorrowingRules {
    pub fn validate(&self) -> LibraryResult<()> {
        if self.max_loans_per_patron == 0 {
            return Err(LibraryError::validation("max loans per patron must be at least 1", None));
        }
        if self.loan_period_days <= 0 {
            return Err(LibraryError::validation("loan period must be at least one day", None));
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl Display for BorrowingRules {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Max loans: {} | Loan period: {} days | Restrict overdue: {} | Restrict unpaid fines: {}",
               self.max_loans_per_patron, self.loan_period_days,
               yes_no(self.restrict_for_overdue), yes_no(self.restrict_for_unpaid_fines))
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok(message: &str) -> Self {
        Self { valid: true, message: message.to_string() }
    }

    pub fn invalid(message: &str) -> Self {
        Self { valid: false, message: message.to_string() }
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Valid: {} | Message: {}", yes_no(self.valid), self.message)
    }
}
