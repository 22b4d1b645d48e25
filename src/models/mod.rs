// src/models/mod.rs

//! Domain models for the holiday resolver.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;

// Re-export all public types
pub use config::{CacheConfig, Config, LoggingConfig, RetrieverConfig};
pub use record::{Listing, YearRecord};

pub(crate) use record::push_unique;
