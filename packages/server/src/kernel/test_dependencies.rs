// TestDependencies - in-memory implementations for testing
//
// Provides a listing store that can be injected into ServerDeps for tests,
// with hooks to inject read/write failures per operation or per city.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::{BaseListingStore, BaseSettingsSource, ScopeLocks, ServerDeps, SettingsCache};
use crate::common::{CityId, ListingId, Scope, StateId};
use crate::domains::listings::models::{Listing, NewListing};
use crate::domains::locations::models::{City, State};
use crate::domains::settings::models::SiteSettings;

// =============================================================================
// Mock Listing Store
// =============================================================================

#[derive(Default)]
struct Tables {
    states: Vec<State>,
    cities: Vec<City>,
    listings: Vec<Listing>,
}

#[derive(Default)]
struct Failures {
    reads: bool,
    deletes: bool,
    city_reads: HashSet<CityId>,
    city_updates: HashSet<CityId>,
    read_delay: Option<Duration>,
}

#[derive(Default)]
pub struct MockListingStore {
    tables: Mutex<Tables>,
    failures: Mutex<Failures>,
    delete_calls: Mutex<Vec<Vec<ListingId>>>,
}

impl MockListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&self, name: &str) -> State {
        let state = State {
            id: StateId::new(),
            name: name.to_string(),
            abbreviation: None,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().states.push(state.clone());
        state
    }

    pub fn add_city(&self, name: &str, state_id: StateId) -> City {
        let city = City {
            id: CityId::new(),
            name: name.to_string(),
            state_id,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().cities.push(city.clone());
        city
    }

    pub fn add_listing(&self, input: NewListing) -> Listing {
        let listing = Listing::from_new(input);
        self.tables.lock().unwrap().listings.push(listing.clone());
        listing
    }

    /// Every scoped or listing read fails
    pub fn fail_reads(&self) {
        self.failures.lock().unwrap().reads = true;
    }

    pub fn fail_deletes(&self) {
        self.failures.lock().unwrap().deletes = true;
    }

    pub fn fail_reads_for_city(&self, city_id: CityId) {
        self.failures.lock().unwrap().city_reads.insert(city_id);
    }

    pub fn fail_updates_for_city(&self, city_id: CityId) {
        self.failures.lock().unwrap().city_updates.insert(city_id);
    }

    /// Delay every listing read, for timeout tests
    pub fn delay_reads(&self, delay: Duration) {
        self.failures.lock().unwrap().read_delay = Some(delay);
    }

    pub fn listings(&self) -> Vec<Listing> {
        self.tables.lock().unwrap().listings.clone()
    }

    pub fn listing(&self, id: ListingId) -> Option<Listing> {
        self.listings().into_iter().find(|l| l.id == id)
    }

    pub fn featured_in_city(&self, city_id: CityId) -> Vec<Listing> {
        self.listings()
            .into_iter()
            .filter(|l| l.city_id == city_id && l.featured)
            .collect()
    }

    /// Ids passed to each delete call, in order
    pub fn delete_calls(&self) -> Vec<Vec<ListingId>> {
        self.delete_calls.lock().unwrap().clone()
    }

    fn city_ids_in_scope(tables: &Tables, scope: &Scope) -> HashSet<CityId> {
        tables
            .cities
            .iter()
            .filter(|c| match scope {
                Scope::All => true,
                Scope::State(state_id) => c.state_id == *state_id,
                Scope::City(city_id) => c.id == *city_id,
            })
            .map(|c| c.id)
            .collect()
    }

    async fn before_read(&self) -> Result<()> {
        let (fail, delay) = {
            let failures = self.failures.lock().unwrap();
            (failures.reads, failures.read_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(())
    }
}

fn sorted_by_creation(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    listings
}

#[async_trait]
impl BaseListingStore for MockListingStore {
    async fn find_cities(&self, scope: &Scope) -> Result<Vec<City>> {
        self.before_read().await?;
        let tables = self.tables.lock().unwrap();
        let ids = Self::city_ids_in_scope(&tables, scope);
        let mut cities: Vec<City> = tables
            .cities
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn find_states(&self, ids: &[StateId]) -> Result<Vec<State>> {
        self.before_read().await?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .states
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn find_listings(&self, scope: &Scope) -> Result<Vec<Listing>> {
        self.before_read().await?;
        let tables = self.tables.lock().unwrap();
        let ids = Self::city_ids_in_scope(&tables, scope);
        Ok(sorted_by_creation(
            tables
                .listings
                .iter()
                .filter(|l| ids.contains(&l.city_id))
                .cloned()
                .collect(),
        ))
    }

    async fn find_listings_in_city(&self, city_id: CityId) -> Result<Vec<Listing>> {
        self.before_read().await?;
        if self.failures.lock().unwrap().city_reads.contains(&city_id) {
            return Err(anyhow!("query canceled for city {}", city_id));
        }
        let tables = self.tables.lock().unwrap();
        Ok(sorted_by_creation(
            tables
                .listings
                .iter()
                .filter(|l| l.city_id == city_id)
                .cloned()
                .collect(),
        ))
    }

    async fn delete_listings(&self, ids: &[ListingId]) -> Result<u64> {
        self.delete_calls.lock().unwrap().push(ids.to_vec());
        if self.failures.lock().unwrap().deletes {
            return Err(anyhow!("permission denied for table listings"));
        }
        let mut tables = self.tables.lock().unwrap();
        let before = tables.listings.len();
        tables.listings.retain(|l| !ids.contains(&l.id));
        Ok((before - tables.listings.len()) as u64)
    }

    async fn set_featured(&self, ids: &[ListingId], featured: bool) -> Result<u64> {
        let failing = self.failures.lock().unwrap().city_updates.clone();
        let mut tables = self.tables.lock().unwrap();

        if tables
            .listings
            .iter()
            .any(|l| ids.contains(&l.id) && failing.contains(&l.city_id))
        {
            return Err(anyhow!("update rejected by row-level security"));
        }

        let mut updated = 0;
        for listing in tables.listings.iter_mut().filter(|l| ids.contains(&l.id)) {
            listing.featured = featured;
            updated += 1;
        }
        Ok(updated)
    }
}

// =============================================================================
// Static Settings Source
// =============================================================================

pub struct StaticSettingsSource(pub SiteSettings);

#[async_trait]
impl BaseSettingsSource for StaticSettingsSource {
    async fn load(&self) -> Result<SiteSettings> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<MockListingStore>,
    pub settings: SiteSettings,
    pub store_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MockListingStore::new()),
            settings: SiteSettings::default(),
            store_timeout: Duration::from_secs(5),
        }
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> ServerDeps {
        let settings = Arc::new(SettingsCache::new(
            Arc::new(StaticSettingsSource(self.settings)),
            Duration::from_secs(60),
        ));
        ServerDeps::new(self.store, settings, ScopeLocks::new(), self.store_timeout)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
