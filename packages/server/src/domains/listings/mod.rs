pub mod actions;
pub mod data;
pub mod effects;
pub mod models;

// Re-export data types (request/response bodies)
pub use data::types::{
    CityFeaturedData, DuplicateGroupData, DuplicateStats, DuplicatesRequest, DuplicatesResponse,
    FeaturedRequest, FeaturedResponse, FeaturedStats, ListingReviewData,
};

// Re-export models (domain models)
pub use models::listing::{Listing, NewListing};
