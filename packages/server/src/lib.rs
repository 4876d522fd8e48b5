// Business Directory - maintenance core
//
// Duplicate detection and removal, plus featured listing selection, for a
// directory of businesses organized by state and city. Actions live per
// domain in domains/*/actions and are exposed over HTTP from server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
