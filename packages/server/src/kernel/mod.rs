//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod postgres_store;
pub mod scope_lock;
pub mod settings_cache;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, DEFAULT_STORE_TIMEOUT};
pub use postgres_store::PgListingStore;
pub use scope_lock::{ScopeGuard, ScopeLocks};
pub use settings_cache::{PgSettingsSource, SettingsCache};
pub use test_dependencies::{MockListingStore, StaticSettingsSource, TestDependencies};
pub use traits::*;
