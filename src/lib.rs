//! docscope - Component discovery and static analysis for UI library documentation
//!
//! This crate scans a workspace of UI component sources and `*.sample.tsx`
//! usage files, extracts structured metadata from them, keeps the results
//! in time-bounded in-memory caches, and answers search, suggestion and
//! statistics queries over them.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod export;
pub mod metadata;
pub mod ranking;
pub mod registry;
pub mod scanner;
