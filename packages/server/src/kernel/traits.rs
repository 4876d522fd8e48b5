// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Duplicate grouping and featured selection live in domains/listings/effects
// and only reach the store through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseListingStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{CityId, ListingId, Scope, StateId};
use crate::domains::listings::models::Listing;
use crate::domains::locations::models::{City, State};
use crate::domains::settings::models::SiteSettings;

// =============================================================================
// Listing Store Trait (Infrastructure - the relational data store)
// =============================================================================

#[async_trait]
pub trait BaseListingStore: Send + Sync {
    /// Cities covered by a scope (one city, all cities of a state, or all)
    async fn find_cities(&self, scope: &Scope) -> Result<Vec<City>>;

    async fn find_states(&self, ids: &[StateId]) -> Result<Vec<State>>;

    /// All listings in a scope, ordered by created_at ascending
    async fn find_listings(&self, scope: &Scope) -> Result<Vec<Listing>>;

    async fn find_listings_in_city(&self, city_id: CityId) -> Result<Vec<Listing>>;

    /// Hard delete in one batch. Must be all-or-nothing.
    async fn delete_listings(&self, ids: &[ListingId]) -> Result<u64>;

    /// Set the featured flag on every listed id
    async fn set_featured(&self, ids: &[ListingId], featured: bool) -> Result<u64>;
}

// =============================================================================
// Site Settings Source Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseSettingsSource: Send + Sync {
    async fn load(&self) -> Result<SiteSettings>;
}
