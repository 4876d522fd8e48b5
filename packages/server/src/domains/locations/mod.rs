pub mod models;

pub use models::{City, State};
