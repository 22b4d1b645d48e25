//! Service layer for the holiday resolver.
//!
//! This module contains the business logic for:
//! - Announcement text extraction (`Extractor`)
//! - Announcement retrieval (`Retriever`)
//! - Web page access (`WebSource`, `HttpSource`)

pub mod completion;
mod extractor;
mod retriever;
mod source;

pub use extractor::{Extraction, Extractor, Festival};
pub use retriever::{Retriever, announcement_title};
pub use source::{Anchor, HttpSource, WebSource};

#[cfg(test)]
pub(crate) use retriever::tests::{FakeSite, instant_config};
