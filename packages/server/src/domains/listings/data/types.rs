use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CityId, ListingId};
use crate::domains::listings::models::Listing;

// =============================================================================
// Duplicate detection
// =============================================================================

/// Body of a duplicate detection request.
///
/// `action` stays a raw string so unknown values surface as validation
/// errors instead of body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatesRequest {
    pub action: Option<String>,
    pub city_id: Option<String>,
    pub state_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatesResponse {
    pub message: String,
    pub stats: DuplicateStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<DuplicateGroupData>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateStats {
    pub total: usize,
    pub duplicate_groups: usize,
    pub duplicates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroupData {
    pub original_listing: ListingReviewData,
    pub duplicates: Vec<ListingReviewData>,
}

/// Fields an admin needs to confirm a duplicate by eye
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingReviewData {
    pub id: ListingId,
    pub business_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ListingReviewData {
    pub fn new(listing: &Listing, city: Option<String>, state: Option<String>) -> Self {
        Self {
            id: listing.id,
            business_name: listing.business_name.clone(),
            address: listing.address.clone(),
            phone: listing.phone.clone(),
            city,
            state,
            created_at: listing.created_at,
        }
    }
}

// =============================================================================
// Featured selection
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedRequest {
    pub action: Option<String>,
    pub city_id: Option<String>,
    pub state_id: Option<String>,
    /// "topUpOnly" (default) or "deterministicRebalance"
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedResponse {
    pub message: String,
    pub stats: FeaturedStats,
    pub cities: Vec<CityFeaturedData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedStats {
    pub cities_processed: usize,
    pub listings_updated: u64,
    pub cities_with_listings: usize,
    pub cities_without_listings: usize,
    /// One entry per failed city, prefixed with the city name
    pub errors: Vec<String>,
}

/// Per-city outcome
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityFeaturedData {
    pub city_id: CityId,
    pub city_name: String,
    pub featured: u64,
    pub unfeatured: u64,
    pub cleared: u64,
    pub selected: Vec<String>,
    /// True when the city had nothing to choose from (or nothing to clear)
    pub no_candidates: bool,
}
