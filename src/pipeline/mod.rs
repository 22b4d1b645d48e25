//! Resolution pipeline.
//!
//! - `Resolver`: cache lookup, announcement retrieval, extraction and
//!   cross-year reconciliation for a list of years

pub mod resolve;

pub use resolve::Resolver;
