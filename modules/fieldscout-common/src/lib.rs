//! Shared types and configuration for the Fieldscout athlete discovery
//! pipeline.

pub mod config;
pub mod criteria;
pub mod types;

pub use config::Config;
pub use criteria::DiscoveryCriteria;
pub use types::*;
