//! Configuration module
//!
//! Handles environment variables and crate-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::AuthConfig;
