//! Use-case to component suggestion scoring.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::metadata::ComponentRecord;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// Bonus per use-case word that also appears in a component description.
pub const WORD_OVERLAP_SCORE: u32 = 5;

/// Reason reported when only word overlap contributed.
pub const FALLBACK_REASON: &str = "Keyword match";

/// A use-case keyword family and the component names it favors.
struct UseCaseRule {
    triggers: &'static [&'static str],
    name_keywords: &'static [&'static str],
    bonus: u32,
    reason: &'static str,
}

const USE_CASE_RULES: &[UseCaseRule] = &[
    UseCaseRule {
        triggers: &["form"],
        name_keywords: &["input", "button", "select", "checkbox", "textarea", "form"],
        bonus: 40,
        reason: "Form control suited to form use cases",
    },
    UseCaseRule {
        triggers: &["navigation", "navigate", "menu"],
        name_keywords: &["nav", "menu", "tabs", "breadcrumb", "pagination", "link", "sidebar"],
        bonus: 40,
        reason: "Navigation component",
    },
    UseCaseRule {
        triggers: &["data", "table", "list"],
        name_keywords: &["table", "card", "list", "badge", "avatar", "chart", "data"],
        bonus: 35,
        reason: "Displays structured data",
    },
    UseCaseRule {
        triggers: &["modal", "dialog", "popup", "overlay"],
        name_keywords: &["dialog", "modal", "sheet", "drawer", "popover", "alert"],
        bonus: 40,
        reason: "Overlay for modal interactions",
    },
];

/// A requirement family and the description/tag evidence that satisfies it.
struct RequirementRule {
    triggers: &'static [&'static str],
    evidence: &'static [&'static str],
    bonus: u32,
    reason: &'static str,
}

const REQUIREMENT_RULES: &[RequirementRule] = &[
    RequirementRule {
        triggers: &["accessib", "a11y", "aria", "screen reader"],
        evidence: &["accessible", "accessibility", "aria"],
        bonus: 20,
        reason: "Built with accessibility support",
    },
    RequirementRule {
        triggers: &["mobile", "responsive", "touch"],
        evidence: &["mobile", "responsive"],
        bonus: 15,
        reason: "Works well on mobile",
    },
    RequirementRule {
        triggers: &["interactiv", "clickable", "dynamic"],
        evidence: &["interactive", "clickable"],
        bonus: 15,
        reason: "Supports user interaction",
    },
];

/// A ranked suggestion for a use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub component: ComponentRecord,
    /// Normalized relevance in `[0, 1]`.
    pub score: f64,
    pub reason: String,
}

/// Raw score and matched reasons for one component.
fn score_suggestion(
    record: &ComponentRecord,
    use_case: &str,
    requirements: &[String],
) -> (u32, Vec<&'static str>) {
    let use_case = use_case.to_lowercase();
    let name = record.name.to_lowercase();
    let description = record.description.to_lowercase();

    let mut score = 0;
    let mut reasons = Vec::new();

    for rule in USE_CASE_RULES {
        let asked = rule.triggers.iter().any(|t| use_case.contains(t));
        let fits = rule.name_keywords.iter().any(|k| name.contains(k));
        if asked && fits {
            score += rule.bonus;
            reasons.push(rule.reason);
        }
    }

    for requirement in requirements {
        let requirement = requirement.to_lowercase();
        for rule in REQUIREMENT_RULES {
            if !rule.triggers.iter().any(|t| requirement.contains(t)) {
                continue;
            }
            let backed = rule.evidence.iter().any(|e| {
                description.contains(e) || record.tags.iter().any(|tag| tag.contains(e))
            });
            if backed && !reasons.contains(&rule.reason) {
                score += rule.bonus;
                reasons.push(rule.reason);
            }
        }
    }

    score += word_overlap(&use_case, &description) * WORD_OVERLAP_SCORE;
    (score, reasons)
}

/// Number of distinct words shared by `text` and `description`.
fn word_overlap(text: &str, description: &str) -> u32 {
    let described = words(description);
    words(text).intersection(&described).count() as u32
}

fn words(text: &str) -> BTreeSet<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .collect()
}

/// Ranks `candidates` for a free-text use case and requirement list.
///
/// Raw scores are divided by 100 and capped at 1.0. Components with no
/// score are dropped; equal scores keep candidate order.
pub fn suggest(
    candidates: &[ComponentRecord],
    use_case: &str,
    requirements: &[String],
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|record| {
            let (raw, reasons) = score_suggestion(record, use_case, requirements);
            if raw == 0 {
                return None;
            }
            let reason = if reasons.is_empty() {
                FALLBACK_REASON.to_string()
            } else {
                reasons.join("; ")
            };
            Some(Suggestion {
                component: record.clone(),
                score: (f64::from(raw) / 100.0).min(1.0),
                reason,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
