//! In-process session store.
//!
//! Entries live in a `DashMap` and disappear with the process. Useful for
//! single-instance deployments and tests.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use chatrelay_core::store::session_store::SessionStore;
use chatrelay_types::error::RepositoryError;

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// `SessionStore` held entirely in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, Entry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, live or not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let now = Utc::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RepositoryError> {
        let entry = Entry {
            value: value.to_owned(),
            expires_at: expiry_from(Utc::now(), ttl),
        };
        self.entries.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        let now = Utc::now();
        let mut removed = 0u64;
        self.entries.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }
}
