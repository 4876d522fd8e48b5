//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the listing
//! maintenance actions. The store is a trait object so tests can swap in the
//! in-memory store from `test_dependencies`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use sqlx::PgPool;

use crate::common::{DirectoryError, Scope};
use crate::kernel::{
    BaseListingStore, PgListingStore, PgSettingsSource, ScopeGuard, ScopeLocks, SettingsCache,
};

/// Store calls that outlive this are treated as failures
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseListingStore>,
    /// Site settings with explicit TTL (no global cache)
    pub settings: Arc<SettingsCache>,
    /// Serializes mutating maintenance runs per scope
    pub scope_locks: ScopeLocks,
    pub store_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseListingStore>,
        settings: Arc<SettingsCache>,
        scope_locks: ScopeLocks,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            settings,
            scope_locks,
            store_timeout,
        }
    }

    /// Production wiring: Postgres store and Postgres-backed settings
    pub fn postgres(pool: PgPool, settings_ttl: Duration, store_timeout: Duration) -> Self {
        let store = Arc::new(PgListingStore::new(pool.clone()));
        let settings = Arc::new(SettingsCache::new(
            Arc::new(PgSettingsSource::new(pool)),
            settings_ttl,
        ));
        Self::new(store, settings, ScopeLocks::new(), store_timeout)
    }

    /// Run a store call under the configured timeout
    pub async fn with_timeout<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "{} timed out after {}s",
                operation,
                self.store_timeout.as_secs_f64()
            )),
        }
    }

    /// Take the maintenance lock for a scope. City scopes are looked up first
    /// so they also conflict with a run over their state.
    pub async fn lock_scope(&self, scope: &Scope) -> Result<ScopeGuard, DirectoryError> {
        let state_id = match scope {
            Scope::City(_) => self
                .with_timeout("cities query", self.store.find_cities(scope))
                .await
                .map_err(DirectoryError::StoreRead)?
                .first()
                .map(|city| city.state_id),
            Scope::State(_) | Scope::All => None,
        };
        self.scope_locks.try_acquire_in_state(scope, state_id)
    }
}
