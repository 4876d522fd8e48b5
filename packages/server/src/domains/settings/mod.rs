pub mod models;

pub use models::{SiteSetting, SiteSettings};
