//! Catalog source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`]
//! that queries one external catalog and normalizes its records.

pub mod bjjfanatics;
pub mod submeta;

pub use bjjfanatics::BjjFanaticsSource;
pub use submeta::SubmetaSource;
