//! Site settings cache with an explicit expiry policy.
//!
//! Passed around inside `ServerDeps`; there is no global instance. A cached
//! value is served until it is older than the TTL, then the next `get()`
//! reloads it. `refresh()` forces a reload, `invalidate()` drops the value.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domains::settings::models::SiteSettings;
use crate::kernel::BaseSettingsSource;

struct Cached {
    settings: SiteSettings,
    loaded_at: Instant,
}

pub struct SettingsCache {
    source: Arc<dyn BaseSettingsSource>,
    ttl: Duration,
    cached: RwLock<Option<Cached>>,
}

impl SettingsCache {
    pub fn new(source: Arc<dyn BaseSettingsSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Cached settings, reloading when missing or expired
    pub async fn get(&self) -> Result<SiteSettings> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.loaded_at.elapsed() < self.ttl {
                    return Ok(entry.settings.clone());
                }
            }
        }
        self.refresh().await
    }

    /// Reload from the source regardless of age
    pub async fn refresh(&self) -> Result<SiteSettings> {
        let mut cached = self.cached.write().await;
        let settings = self.source.load().await?;
        debug!(site_name = %settings.site_name, "Site settings loaded");
        *cached = Some(Cached {
            settings: settings.clone(),
            loaded_at: Instant::now(),
        });
        Ok(settings)
    }

    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

/// Reads settings from the `site_settings` table
pub struct PgSettingsSource {
    pool: PgPool,
}

impl PgSettingsSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseSettingsSource for PgSettingsSource {
    async fn load(&self) -> Result<SiteSettings> {
        SiteSettings::load(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl BaseSettingsSource for CountingSource {
        async fn load(&self) -> Result<SiteSettings> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(SiteSettings {
                site_name: format!("Directory v{}", n),
                ..SiteSettings::default()
            })
        }
    }

    fn cache(ttl: Duration) -> (Arc<CountingSource>, SettingsCache) {
        let source = Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
        });
        let cache = SettingsCache::new(source.clone(), ttl);
        (source, cache)
    }

    #[tokio::test]
    async fn test_fresh_value_is_served_from_cache() {
        let (source, cache) = cache(Duration::from_secs(300));

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_value_is_reloaded() {
        let (source, cache) = cache(Duration::ZERO);

        cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert_eq!(second.site_name, "Directory v2");
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_and_invalidate_force_reload() {
        let (source, cache) = cache(Duration::from_secs(300));

        cache.get().await.unwrap();
        let refreshed = cache.refresh().await.unwrap();
        assert_eq!(refreshed.site_name, "Directory v2");

        cache.invalidate().await;
        let reloaded = cache.get().await.unwrap();
        assert_eq!(reloaded.site_name, "Directory v3");
        assert_eq!(source.loads.load(Ordering::SeqCst), 3);
    }
}
