// HTTP routes
pub mod health;
pub mod listings;
pub mod settings;

pub use health::*;
pub use listings::*;
pub use settings::*;
