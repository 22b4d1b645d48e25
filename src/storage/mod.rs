//! Persistence for resolved years.
//!
//! A single flat text file holds one four-line block per year:
//!
//! ```text
//! holiday-data
//! ├── 2023 block      # year / holidays / workdays / separator
//! └── 2024 block
//! ```
//!
//! The file is the only durable state; nothing is kept in memory between
//! resolutions.

pub mod block;
pub mod local;

pub use local::CacheStore;
