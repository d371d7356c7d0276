//! Travel-guide crawling and attribute extraction.
//!
//! This crate provides:
//! - [`extract`] — fixed-vocabulary substring matching over page text
//! - [`engine`] — the one-level [`DestinationCrawler`]

pub mod engine;
pub mod extract;

pub use engine::DestinationCrawler;
pub use extract::extract_attributes;
