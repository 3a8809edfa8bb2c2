pub mod defaults;
mod env;
mod loader;
pub mod types;

pub use types::*;
