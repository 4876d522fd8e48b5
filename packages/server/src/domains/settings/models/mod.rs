pub mod site_setting;

pub use site_setting::*;
