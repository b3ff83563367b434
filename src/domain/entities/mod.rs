//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with click accounting
//! - [`NewLink`] - Input for creating a link
//! - [`LinkTotals`] - Store-wide aggregate counts

pub mod link;

pub use link::{Link, LinkTotals, NewLink};
