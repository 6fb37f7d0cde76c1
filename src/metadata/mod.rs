//! Metadata synthesis.
//!
//! Turns scanned files plus analyzer facts (and, for components, a registry
//! entry) into the [`ComponentRecord`] and [`SampleRecord`] values held by
//! the discovery caches. Descriptions, categories and tags come from a
//! [`Catalog`] lookup table.

pub mod catalog;
pub mod records;
pub mod synthesize;

pub use catalog::{canonical_name, Catalog, CatalogEntry, DEFAULT_CATEGORY};
pub use records::{ComponentRecord, SampleRecord};
pub use synthesize::{leading_comment, synthesize_component, synthesize_sample, DEFAULT_STATUS};
