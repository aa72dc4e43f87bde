//! Read side of albumcopy.
//!
//! Fetches an account's photos from a [`PhotoSource`](backend::PhotoSource),
//! keeps the largest size variant of each, and groups the results by like
//! count into a [`Catalog`].

pub mod backend;
mod catalog;
pub mod error;
pub mod models;
mod select;
mod timestamp;

pub use crate::catalog::{Bucket, Catalog, CatalogEntry, build_catalog};
pub use crate::select::largest_variant;
pub use crate::timestamp::{Zone, format_timestamp};
