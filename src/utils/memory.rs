use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};

// MemoryTable is the keyed collection behind every in-memory store: rows keyed by id,
// kept in insertion order so that listings are deterministic.
#[derive(Debug)]
pub(crate) struct MemoryTable<E> {
    name: String,
    rows: RwLock<(HashMap<String, E>, Vec<String>)>,
}

impl<E: Identifiable + Clone> MemoryTable<E> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: RwLock::new((HashMap::new(), vec![])),
        }
    }

    pub(crate) async fn insert(&self, entity: &E) -> LibraryResult<usize> {
        let id = entity.id();
        if id.trim().is_empty() {
            return Err(LibraryError::validation(
                format!("{} id must not be empty", self.name).as_str(), Some("empty_id".to_string())));
        }
        let mut rows = self.rows.write().await;
        if rows.0.contains_key(&id) {
            return Err(LibraryError::conflict(
                format!("{} with id {} already exists", self.name, id).as_str(), Some("duplicate_key".to_string())));
        }
        rows.0.insert(id.clone(), entity.clone());
        rows.1.push(id);
        Ok(1)
    }

    pub(crate) async fn replace(&self, entity: &E) -> usize {
        let mut rows = self.rows.write().await;
        match rows.0.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                1
            }
            None => 0,
        }
    }

    pub(crate) async fn modify<F: FnOnce(&mut E) -> bool>(&self, id: &str, f: F) -> bool {
        let mut rows = self.rows.write().await;
        match rows.0.get_mut(id) {
            Some(row) => f(row),
            None => false,
        }
    }

    pub(crate) async fn get(&self, id: &str) -> LibraryResult<E> {
        let rows = self.rows.read().await;
        rows.0.get(id).cloned().ok_or_else(|| LibraryError::not_found(
            format!("{} with id {} not found", self.name, id).as_str()))
    }

    pub(crate) async fn find<P: Fn(&E) -> bool>(&self, predicate: P) -> Vec<E> {
        let rows = self.rows.read().await;
        rows.1.iter()
            .filter_map(|id| rows.0.get(id))
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    pub(crate) async fn find_first<P: Fn(&E) -> bool>(&self, predicate: P) -> Option<E> {
        let rows = self.rows.read().await;
        rows.1.iter()
            .filter_map(|id| rows.0.get(id))
            .find(|e| predicate(e))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Identifiable;
    use crate::core::library::LibraryError;
    use crate::utils::memory::MemoryTable;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        value: i64,
    }

    impl Identifiable for Row {
        fn id(&self) -> String {
            self.id.to_string()
        }
    }

    fn row(id: &str, value: i64) -> Row {
        Row { id: id.to_string(), value }
    }

    #[tokio::test]
    async fn test_should_insert_and_get() {
        let table = MemoryTable::new("rows");
        assert_eq!(1, table.insert(&row("a", 1)).await.expect("insert"));
        assert_eq!(row("a", 1), table.get("a").await.expect("get"));
        assert!(matches!(table.get("b").await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_and_empty_ids() {
        let table = MemoryTable::new("rows");
        let _ = table.insert(&row("a", 1)).await.expect("insert");
        assert!(matches!(table.insert(&row("a", 2)).await, Err(LibraryError::Conflict { .. })));
        assert!(matches!(table.insert(&row(" ", 2)).await, Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_replace_only_existing() {
        let table = MemoryTable::new("rows");
        let _ = table.insert(&row("a", 1)).await.expect("insert");
        assert_eq!(1, table.replace(&row("a", 5)).await);
        assert_eq!(0, table.replace(&row("z", 5)).await);
        assert_eq!(5, table.get("a").await.expect("get").value);
    }

    #[tokio::test]
    async fn test_should_find_in_insertion_order() {
        let table = MemoryTable::new("rows");
        for (i, id) in ["c", "a", "b"].iter().enumerate() {
            let _ = table.insert(&row(id, i as i64)).await.expect("insert");
        }
        let ids: Vec<String> = table.find(|_| true).await.into_iter().map(|r| r.id).collect();
        assert_eq!(vec!["c", "a", "b"], ids);
        assert_eq!(Some(row("a", 1)), table.find_first(|r| r.value == 1).await);
        assert!(table.modify("b", |r| { r.value = 9; true }).await);
        assert_eq!(9, table.get("b").await.expect("get").value);
    }
}
