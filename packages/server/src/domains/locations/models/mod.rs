pub mod city;
pub mod state;

pub use city::*;
pub use state::*;
