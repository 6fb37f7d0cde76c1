//! Corpus-wide usage pattern aggregation over analyzed samples.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::analysis::SampleAnalysis;

/// Maximum representative examples kept per pattern.
pub const MAX_PATTERN_EXAMPLES: usize = 3;

/// Static description and guidance for a known pattern.
struct PatternInfo {
    name: &'static str,
    description: &'static str,
    /// Substring that marks an example as showing this pattern.
    indicator: &'static str,
    best_practices: &'static [&'static str],
}

const KNOWN_PATTERNS: &[PatternInfo] = &[
    PatternInfo {
        name: "state-management",
        description: "Local component state drives what is rendered",
        indicator: "State",
        best_practices: &[
            "Keep state as close as possible to where it is used",
            "Derive values during render instead of duplicating state",
        ],
    },
    PatternInfo {
        name: "useState-pattern",
        description: "Uses the useState hook for local values",
        indicator: "useState",
        best_practices: &[
            "Use functional updates when the next value depends on the previous one",
            "Group related values into one state object only when they change together",
        ],
    },
    PatternInfo {
        name: "useEffect-pattern",
        description: "Synchronizes the component with external systems through useEffect",
        indicator: "useEffect",
        best_practices: &[
            "List every reactive value in the dependency array",
            "Return a cleanup function for subscriptions and timers",
        ],
    },
    PatternInfo {
        name: "form-management",
        description: "Manages form values and validation with a form hook",
        indicator: "form",
        best_practices: &[
            "Validate on submit and surface field errors next to their inputs",
            "Associate every input with a label",
        ],
    },
    PatternInfo {
        name: "user-feedback",
        description: "Notifies the user about the result of an action",
        indicator: "toast",
        best_practices: &[
            "Keep messages short and actionable",
            "Announce notifications to assistive technology",
        ],
    },
    PatternInfo {
        name: "variant-usage",
        description: "Selects a visual style through the variant prop",
        indicator: "variant=",
        best_practices: &[
            "Use variants to express intent rather than raw colors",
            "Prefer the default variant for primary actions",
        ],
    },
    PatternInfo {
        name: "size-usage",
        description: "Adjusts dimensions through the size prop",
        indicator: "size=",
        best_practices: &["Keep sizes consistent within one group of controls"],
    },
    PatternInfo {
        name: "disabled-state",
        description: "Prevents interaction with the disabled prop",
        indicator: "disabled",
        best_practices: &[
            "Explain why a control is disabled when it is not obvious",
            "Disable submit controls while a request is pending",
        ],
    },
    PatternInfo {
        name: "click-handling",
        description: "Responds to clicks with an onClick handler",
        indicator: "onClick",
        best_practices: &[
            "Use a button element for clickable actions",
            "Keep handlers small and move logic into named functions",
        ],
    },
    PatternInfo {
        name: "form-submission",
        description: "Handles form submission with an onSubmit handler",
        indicator: "onSubmit",
        best_practices: &[
            "Call preventDefault before handling the submission",
            "Give the submit control type=\"submit\"",
        ],
    },
];

fn known(pattern: &str) -> Option<&'static PatternInfo> {
    KNOWN_PATTERNS.iter().find(|p| p.name == pattern)
}

/// A code example showing a pattern in one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternExample {
    pub component: String,
    pub code: String,
    pub context: String,
}

/// One usage pattern across the whole sample corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAggregate {
    pub pattern_name: String,
    pub description: String,
    /// Number of samples whose pattern set contains this pattern.
    pub frequency: usize,
    pub components: BTreeSet<String>,
    pub examples: Vec<PatternExample>,
    pub best_practices: Vec<String>,
}

impl PatternAggregate {
    fn new(pattern: &str) -> Self {
        let (description, best_practices) = match known(pattern) {
            Some(info) => (
                info.description.to_string(),
                info.best_practices.iter().map(|s| s.to_string()).collect(),
            ),
            None => (format!("Usage pattern: {}", pattern), Vec::new()),
        };
        Self {
            pattern_name: pattern.to_string(),
            description,
            frequency: 0,
            components: BTreeSet::new(),
            examples: Vec::new(),
            best_practices,
        }
    }
}

/// Aggregates pattern tags over `(component name, analysis)` pairs.
///
/// Output is sorted by frequency, highest first, then by pattern name.
pub fn aggregate<'a, I>(samples: I) -> Vec<PatternAggregate>
where
    I: IntoIterator<Item = (&'a str, &'a SampleAnalysis)>,
{
    let mut by_pattern: BTreeMap<String, PatternAggregate> = BTreeMap::new();

    for (component, analysis) in samples {
        for pattern in &analysis.patterns {
            let entry = by_pattern
                .entry(pattern.clone())
                .or_insert_with(|| PatternAggregate::new(pattern));
            entry.frequency += 1;
            entry.components.insert(component.to_string());

            if entry.examples.len() < MAX_PATTERN_EXAMPLES {
                if let Some(example) = pick_example(pattern, component, analysis) {
                    entry.examples.push(example);
                }
            }
        }
    }

    let mut aggregates: Vec<PatternAggregate> = by_pattern.into_values().collect();
    aggregates.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.pattern_name.cmp(&b.pattern_name))
    });
    aggregates
}

/// The sample's example that best shows `pattern`, else its first one.
fn pick_example(pattern: &str, component: &str, analysis: &SampleAnalysis) -> Option<PatternExample> {
    let indicator = known(pattern).map(|info| info.indicator);
    let example = indicator
        .and_then(|ind| analysis.examples.iter().find(|e| e.code.contains(ind)))
        .or_else(|| analysis.examples.first())?;

    Some(PatternExample {
        component: component.to_string(),
        code: example.code.clone(),
        context: example.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CodeExample, ExampleKind};

    fn analysis(patterns: &[&str], examples: &[&str]) -> SampleAnalysis {
        SampleAnalysis {
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            examples: examples
                .iter()
                .map(|code| CodeExample::new(ExampleKind::Basic, "Button", *code))
                .collect(),
            ..SampleAnalysis::default()
        }
    }

    #[test]
    fn test_frequency_and_components() {
        let button = analysis(&["click-handling", "state-management"], &["<Button />"]);
        let toggle = analysis(&["click-handling"], &[]);
        let alert = analysis(&[], &["<Alert />"]);

        let result = aggregate(vec![
            ("Button", &button),
            ("Toggle", &toggle),
            ("Alert", &alert),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].pattern_name, "click-handling");
        assert_eq!(result[0].frequency, 2);
        assert_eq!(
            result[0].components,
            ["Button", "Toggle"].iter().map(|s| s.to_string()).collect()
        );
        assert_eq!(result[1].pattern_name, "state-management");
        assert_eq!(result[1].frequency, 1);
        assert!(!result[1].components.contains("Alert"));
    }

    #[test]
    fn test_examples_are_bounded_and_relevant() {
        let samples: Vec<SampleAnalysis> = (0..5)
            .map(|_| analysis(&["click-handling"], &["<Button />", "<Button onClick={go} />"]))
            .collect();
        let result = aggregate(samples.iter().map(|a| ("Button", a)));

        assert_eq!(result[0].examples.len(), MAX_PATTERN_EXAMPLES);
        assert_eq!(result[0].examples[0].code, "<Button onClick={go} />");
        assert_eq!(result[0].examples[0].context, "Basic Button example");
    }

    #[test]
    fn test_unknown_pattern_fallback() {
        let custom = analysis(&["drag-and-drop"], &[]);
        let result = aggregate(vec![("Board", &custom)]);
        assert_eq!(result[0].description, "Usage pattern: drag-and-drop");
        assert!(result[0].best_practices.is_empty());
        assert!(result[0].examples.is_empty());
    }

    #[test]
    fn test_known_pattern_metadata() {
        let sample = analysis(&["form-submission"], &[]);
        let result = aggregate(vec![("Form", &sample)]);
        assert!(result[0].description.contains("onSubmit"));
        assert_eq!(result[0].best_practices.len(), 2);
    }
}
