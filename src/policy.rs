use std::collections::HashMap;
use std::sync::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::core::library::{normalize_media_type, LibraryError, LibraryResult, BOOK, CD};

// FinePolicy is a flat fine per media type; the amount never depends on how late the item is.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum FinePolicy {
    Book,
    Cd,
    Flat {
        media_type: String,
        amount: Decimal,
    },
}

impl FinePolicy {
    pub fn flat(media_type: &str, amount: Decimal) -> Self {
        FinePolicy::Flat { media_type: normalize_media_type(media_type), amount }
    }

    pub fn media_type(&self) -> String {
        match self {
            FinePolicy::Book => BOOK.to_string(),
            FinePolicy::Cd => CD.to_string(),
            FinePolicy::Flat { media_type, .. } => normalize_media_type(media_type),
        }
    }

    pub fn flat_fine(&self) -> Decimal {
        match self {
            FinePolicy::Book => Decimal::new(1000, 2),
            FinePolicy::Cd => Decimal::new(2000, 2),
            FinePolicy::Flat { amount, .. } => *amount,
        }
    }

    pub fn calculate(&self, _overdue_days: i64) -> Decimal {
        self.flat_fine()
    }
}

// FinePolicyRegistry maps normalized media types to policies; unknown types use the BOOK policy.
#[derive(Debug)]
pub struct FinePolicyRegistry {
    policies: RwLock<HashMap<String, FinePolicy>>,
}

impl Default for FinePolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FinePolicyRegistry {
    pub fn new() -> Self {
        let policies = HashMap::from([
            (BOOK.to_string(), FinePolicy::Book),
            (CD.to_string(), FinePolicy::Cd),
        ]);
        Self { policies: RwLock::new(policies) }
    }

    pub fn register(&self, policy: FinePolicy) -> LibraryResult<()> {
        let media_type = policy.media_type();
        if media_type.is_empty() {
            return Err(LibraryError::validation("media type must not be empty", None));
        }
        if policy.flat_fine() <= Decimal::ZERO {
            return Err(LibraryError::validation(
                format!("fine for {} must be positive", media_type).as_str(), None));
        }
        info!(media_type = media_type.as_str(), amount = %policy.flat_fine(), "fine policy registered");
        let mut policies = self.policies.write().unwrap_or_else(|e| e.into_inner());
        policies.insert(media_type, policy);
        Ok(())
    }

    pub fn register_flat(&self, media_type: &str, amount: Decimal) -> LibraryResult<()> {
        self.register(FinePolicy::flat(media_type, amount))
    }

    pub fn policy_for(&self, media_type: &str) -> FinePolicy {
        let policies = self.policies.read().unwrap_or_else(|e| e.into_inner());
        policies.get(&normalize_media_type(media_type))
            .or_else(|| policies.get(BOOK))
            .cloned()
            .unwrap_or(FinePolicy::Book)
    }

    pub fn flat_fine(&self, media_type: &str) -> Decimal {
        self.policy_for(media_type).flat_fine()
    }

    pub fn calculate(&self, media_type: &str, overdue_days: i64) -> Decimal {
        self.policy_for(media_type).calculate(overdue_days)
    }

    pub fn registered_media_types(&self) -> Vec<String> {
        let policies = self.policies.read().unwrap_or_else(|e| e.into_inner());
        let mut types: Vec<String> = policies.keys().cloned().collect();
        types.sort();
        types
    }
}
