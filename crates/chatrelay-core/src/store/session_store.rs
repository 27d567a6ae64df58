//! Session store trait.
//!
//! Defines the interface for the durable key -> string store with per-key
//! expiry. Implementations live in chatrelay-infra.

use std::time::Duration;

use chatrelay_types::error::RepositoryError;

/// Trait for durable session storage.
///
/// Values are opaque strings (the encoded conversation). Every `put` sets
/// the entry's expiry to `now + ttl`, replacing any earlier expiry. Expired
/// entries are invisible to `get` even before they are purged.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// Get the live value for a key. Returns None if absent or expired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Upsert a value and reset its expiry.
    fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Drop every expired entry, returning how many were removed.
    fn purge_expired(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
