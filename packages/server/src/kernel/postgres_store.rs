//! Postgres-backed listing store. All SQL lives in the models; this adapter
//! only routes trait calls to them.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{CityId, ListingId, Scope, StateId};
use crate::domains::listings::models::Listing;
use crate::domains::locations::models::{City, State};
use crate::kernel::BaseListingStore;

#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseListingStore for PgListingStore {
    async fn find_cities(&self, scope: &Scope) -> Result<Vec<City>> {
        City::find_in_scope(scope, &self.pool).await
    }

    async fn find_states(&self, ids: &[StateId]) -> Result<Vec<State>> {
        State::find_by_ids(ids, &self.pool).await
    }

    async fn find_listings(&self, scope: &Scope) -> Result<Vec<Listing>> {
        Listing::find_in_scope(scope, &self.pool).await
    }

    async fn find_listings_in_city(&self, city_id: CityId) -> Result<Vec<Listing>> {
        Listing::find_by_city(city_id, &self.pool).await
    }

    async fn delete_listings(&self, ids: &[ListingId]) -> Result<u64> {
        Listing::delete_many(ids, &self.pool).await
    }

    async fn set_featured(&self, ids: &[ListingId], featured: bool) -> Result<u64> {
        Listing::set_featured_many(ids, featured, &self.pool).await
    }
}
