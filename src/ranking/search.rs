//! Free-text relevance scoring for component search.

use crate::metadata::ComponentRecord;

/// Result count used when the caller does not give a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

pub const EXACT_NAME_SCORE: u32 = 100;
pub const NAME_SCORE: u32 = 50;
pub const DESCRIPTION_SCORE: u32 = 30;
pub const TAG_SCORE: u32 = 20;
pub const EXPORT_SCORE: u32 = 15;
pub const CATEGORY_SCORE: u32 = 10;

/// Relevance of `record` for an already lower-cased `query`.
///
/// Bonuses accumulate: an exact name match (or else a name substring), a
/// description substring, every matching tag, every matching export and a
/// category substring.
pub fn score_component(record: &ComponentRecord, query: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;
    let name = record.name.to_lowercase();
    if name == query {
        score += EXACT_NAME_SCORE;
    } else if name.contains(query) {
        score += NAME_SCORE;
    }

    if record.description.to_lowercase().contains(query) {
        score += DESCRIPTION_SCORE;
    }

    let tags = record
        .tags
        .iter()
        .filter(|t| t.to_lowercase().contains(query))
        .count() as u32;
    score += tags * TAG_SCORE;

    let exports = record
        .exports
        .iter()
        .filter(|e| e.to_lowercase().contains(query))
        .count() as u32;
    score += exports * EXPORT_SCORE;

    if record.category.to_lowercase().contains(query) {
        score += CATEGORY_SCORE;
    }

    score
}

/// Scores every candidate, drops non-matches and keeps the best `limit`.
///
/// Equal scores keep candidate order.
pub fn rank_components(
    candidates: Vec<ComponentRecord>,
    query: &str,
    limit: usize,
) -> Vec<ComponentRecord> {
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(u32, ComponentRecord)> = candidates
        .into_iter()
        .map(|record| (score_component(&record, &query), record))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);
    scored.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn record(name: &str, description: &str, tags: &[&str], exports: &[&str]) -> ComponentRecord {
        ComponentRecord {
            name: name.to_string(),
            description: description.to_string(),
            version: "1.0.0".to_string(),
            status: "stable".to_string(),
            category: "general".to_string(),
            file_path: PathBuf::from(format!("{}.tsx", name.to_lowercase())),
            exports: exports.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            props: None,
            variants: None,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_score_accumulates() {
        let button = record(
            "Button",
            "Clickable button element",
            &["button", "interactive"],
            &["Button", "buttonVariants"],
        );
        // exact 100 + description 30 + one tag 20 + two exports 30
        assert_eq!(score_component(&button, "button"), 180);
    }

    #[test]
    fn test_substring_name() {
        let group = record("ButtonGroup", "Groups things", &[], &[]);
        assert_eq!(score_component(&group, "button"), NAME_SCORE);
        assert_eq!(score_component(&group, "zzz"), 0);
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let candidates = vec![
            record("IconButton", "An icon button", &["button"], &["IconButton"]),
            record("Card", "A container", &[], &[]),
            record("Button", "Clickable button", &["button"], &["Button"]),
        ];
        let ranked = rank_components(candidates, "Button", DEFAULT_SEARCH_LIMIT);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Button", "IconButton"]);
    }

    #[test]
    fn test_ties_keep_candidate_order_and_limit() {
        let candidates = vec![
            record("Alpha", "form field", &[], &[]),
            record("Beta", "form field", &[], &[]),
            record("Gamma", "form field", &[], &[]),
        ];
        let ranked = rank_components(candidates, "form", 2);
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let candidates = vec![record("Button", "", &[], &[])];
        assert!(rank_components(candidates, "   ", 10).is_empty());
    }
}
