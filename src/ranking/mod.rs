//! Scoring and ranking.
//!
//! - [`search`]: multi-factor relevance for free-text component search.
//! - [`suggest`]: keyword-driven use-case to component suggestions.
//! - [`patterns`]: corpus-wide usage pattern aggregation over samples.

pub mod patterns;
pub mod search;
pub mod suggest;

pub use patterns::{aggregate, PatternAggregate, PatternExample, MAX_PATTERN_EXAMPLES};
pub use search::{rank_components, score_component, DEFAULT_SEARCH_LIMIT};
pub use suggest::{suggest, Suggestion, MAX_SUGGESTIONS};
