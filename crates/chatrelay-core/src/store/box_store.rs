//! BoxSessionStore -- object-safe dynamic dispatch wrapper for SessionStore.
//!
//! Lets the application pick the SQLite or in-memory store at runtime while
//! `SessionManager` stays generic.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chatrelay_types::error::RepositoryError;

use super::session_store::SessionStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Object-safe version of [`SessionStore`] with boxed futures.
pub trait SessionStoreDyn: Send + Sync {
    fn get_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<String>>;

    fn put_boxed<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> BoxFuture<'a, ()>;

    fn purge_expired_boxed(&self) -> BoxFuture<'_, u64>;
}

impl<T: SessionStore> SessionStoreDyn for T {
    fn get_boxed<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(self.get(key))
    }

    fn put_boxed<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> BoxFuture<'a, ()> {
        Box::pin(self.put(key, value, ttl))
    }

    fn purge_expired_boxed(&self) -> BoxFuture<'_, u64> {
        Box::pin(self.purge_expired())
    }
}

/// Type-erased session store.
pub struct BoxSessionStore {
    inner: Box<dyn SessionStoreDyn + Send + Sync>,
}

impl BoxSessionStore {
    pub fn new<T: SessionStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl SessionStore for BoxSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        self.inner.get_boxed(key).await
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RepositoryError> {
        self.inner.put_boxed(key, value, ttl).await
    }

    async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        self.inner.purge_expired_boxed().await
    }
}
