//! Typed ID definitions for the directory entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Listing entities (business entries).
pub struct Listing;

/// Marker type for City entities.
pub struct City;

/// Marker type for State entities.
pub struct State;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type ListingId = Id<Listing>;

pub type CityId = Id<City>;

pub type StateId = Id<State>;
