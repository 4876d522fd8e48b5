//! Listing maintenance actions - entry points called from the HTTP routes

pub mod duplicates;
pub mod featured;

pub use duplicates::{manage_duplicates, DuplicateAction};
pub use featured::{manage_featured, manage_featured_with_rng, FeaturedAction};
