//! Generic keyed record store
//!
//! The peripheral ledgers that sit next to the wallet core (security events,
//! governance, grant pools, ...) are all thin keyed maps sharing one
//! contract: existence-checked creation and lookup, single-writer mutation of
//! a record, and a timestamped append-only history per key. `RecordStore`
//! provides that contract once so those ledgers do not each re-implement it.
//!
//! # Thread Safety
//!
//! The store uses `DashMap` for fine-grained locking: operations on different
//! keys proceed in parallel and operations on the same key are serialized by
//! the entry lock. Each store is independent of the wallet `Ledger` and of
//! every other store; no ordering is guaranteed between them.

use crate::core::account_store::validate_id;
use crate::types::{LedgerError, LedgerResult};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// A history entry attached to a record
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedEvent<E> {
    pub event: E,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Slot<V, E> {
    value: V,
    history: Vec<TimestampedEvent<E>>,
}

/// Concurrent keyed store of records of type `V` with event history of type `E`
#[derive(Debug)]
pub struct RecordStore<V, E = String> {
    /// Name used in error messages ("Proposal", "Grant", ...)
    entity: &'static str,
    records: DashMap<String, Slot<V, E>>,
}

impl<V: Clone, E: Clone> RecordStore<V, E> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            records: DashMap::new(),
        }
    }

    /// Insert a new record
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the key is blank
    /// - `AlreadyExists` if the key is present
    pub fn insert(&self, key: &str, value: V) -> LedgerResult<()> {
        validate_id("insert", key)?;

        match self.records.entry(key.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::already_exists(self.entity, key)),
            Entry::Vacant(slot) => {
                slot.insert(Slot {
                    value,
                    history: Vec::new(),
                });
                Ok(())
            }
        }
    }

    /// Copy of the record stored under `key`
    pub fn get(&self, key: &str) -> LedgerResult<V> {
        self.records
            .get(key)
            .map(|slot| slot.value.clone())
            .ok_or_else(|| self.not_found(key))
    }

    /// Mutate a record in place while holding its entry lock
    ///
    /// If the closure fails, nothing it changed is kept.
    pub fn update<F>(&self, key: &str, f: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut V) -> LedgerResult<()>,
    {
        let mut slot = self.records.get_mut(key).ok_or_else(|| self.not_found(key))?;

        let mut draft = slot.value.clone();
        f(&mut draft)?;
        slot.value = draft;

        Ok(())
    }

    /// Append an event to the record's history
    pub fn append_event(&self, key: &str, event: E, now: DateTime<Utc>) -> LedgerResult<()> {
        let mut slot = self.records.get_mut(key).ok_or_else(|| self.not_found(key))?;
        slot.history.push(TimestampedEvent {
            event,
            recorded_at: now,
        });
        Ok(())
    }

    /// Copy of the record's history, oldest first
    pub fn history(&self, key: &str) -> LedgerResult<Vec<TimestampedEvent<E>>> {
        self.records
            .get(key)
            .map(|slot| slot.history.clone())
            .ok_or_else(|| self.not_found(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn not_found(&self, key: &str) -> LedgerError {
        LedgerError::record_not_found(self.entity, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Proposal {
        title: String,
        votes: u32,
    }

    fn proposal(title: &str) -> Proposal {
        Proposal {
            title: title.to_string(),
            votes: 0,
        }
    }

    #[test]
    fn test_insert_and_get_return_copies() {
        let store: RecordStore<Proposal> = RecordStore::new("Proposal");
        store.insert("p1", proposal("raise quorum")).unwrap();

        let mut copy = store.get("p1").unwrap();
        copy.votes = 99;

        assert_eq!(store.get("p1").unwrap().votes, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_and_blank_key() {
        let store: RecordStore<Proposal> = RecordStore::new("Proposal");
        store.insert("p1", proposal("a")).unwrap();

        let duplicate = store.insert("p1", proposal("b"));
        assert_eq!(duplicate.unwrap_err().kind(), ErrorKind::AlreadyExists);
        assert_eq!(store.get("p1").unwrap().title, "a");

        let blank = store.insert("", proposal("c"));
        assert_eq!(blank.unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_lookups_of_missing_key() {
        let store: RecordStore<Proposal> = RecordStore::new("Proposal");

        assert!(matches!(
            store.get("nope").unwrap_err(),
            LedgerError::RecordNotFound { .. }
        ));
        assert_eq!(
            store.update("nope", |_| Ok(())).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            store
                .append_event("nope", "x".to_string(), Utc::now())
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert!(store.history("nope").is_err());
    }

    #[test]
    fn test_failed_update_keeps_record() {
        let store: RecordStore<Proposal> = RecordStore::new("Proposal");
        store.insert("p1", proposal("a")).unwrap();

        let result = store.update("p1", |p| {
            p.votes = 10;
            Err(LedgerError::invalid_input("vote", "closed"))
        });

        assert!(result.is_err());
        assert_eq!(store.get("p1").unwrap().votes, 0);
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let store: RecordStore<Proposal> = RecordStore::new("Proposal");
        store.insert("p1", proposal("a")).unwrap();
        let now = Utc::now();

        store.append_event("p1", "opened".to_string(), now).unwrap();
        store.append_event("p1", "closed".to_string(), now).unwrap();

        let events: Vec<String> = store
            .history("p1")
            .unwrap()
            .into_iter()
            .map(|e| e.event)
            .collect();
        assert_eq!(events, vec!["opened", "closed"]);
    }

    #[test]
    fn test_concurrent_updates_to_same_key_are_serialized() {
        let store: Arc<RecordStore<Proposal>> = Arc::new(RecordStore::new("Proposal"));
        store.insert("p1", proposal("a")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store
                            .update("p1", |p| {
                                p.votes += 1;
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("p1").unwrap().votes, 800);
    }
}
