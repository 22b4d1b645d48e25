// src/lib.rs

//! China holiday calendar library
//!
//! Resolves public holidays and make-up workdays from the State Council's
//! yearly announcements, caching each resolved year in a flat file.

pub mod error;
pub mod holiday;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use holiday::ChinaHoliday;
