use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// KeyedLocks hands out one exclusion scope per patron or item key.
// Callers acquire patron scopes before item scopes. Slots nobody holds or waits on are
// dropped on the next lock, so the table only grows with the keys in use.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

pub fn patron_key(patron_id: &str) -> String {
    format!("patron:{}", patron_id)
}

pub fn item_key(item_id: &str) -> String {
    format!("item:{}", item_id)
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // the table holds the only reference to an idle slot
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry(key.to_string()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
        };
        slot.lock_owned().await
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    // locks every key in the given order, skipping duplicates
    pub async fn lock_all(&self, keys: &[String]) -> Vec<OwnedMutexGuard<()>> {
        let mut guards = Vec::with_capacity(keys.len());
        let mut seen: Vec<&String> = vec![];
        for key in keys {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            guards.push(self.lock(key).await);
        }
        guards
    }
}
