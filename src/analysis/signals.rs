//! Signals collected while walking a file, and the classifications derived
//! from them.
//!
//! Both analyzer strategies feed the same [`Signals`] collector so that
//! pattern tags and interactivity are computed by one set of rules.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{ExampleKind, Interactivity};

static BOOLEAN_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:is|has)[A-Z]\w*").expect("valid boolean-state regex"));
static TRY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btry\s*\{").expect("valid try regex"));
static CATCH_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcatch\b").expect("valid catch regex"));

/// Hook names treated as local state.
const STATE_HOOKS: [&str; 2] = ["useState", "useReducer"];
/// Hook names treated as side effects.
const EFFECT_HOOKS: [&str; 2] = ["useEffect", "useLayoutEffect"];

/// Returns true for React-style hook names (`useX`).
pub fn is_hook_name(name: &str) -> bool {
    name.strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Returns true for event handler attributes (`onClick`, `onSubmit`, ...).
pub fn is_event_handler(attribute: &str) -> bool {
    attribute
        .strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Returns true when a JSX tag name refers to a component rather than an
/// intrinsic element.
pub fn is_component_tag(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Raw observations made while walking one file.
#[derive(Debug, Default)]
pub struct Signals {
    hooks: Vec<String>,
    calls: Vec<String>,
    attributes: BTreeSet<String>,
}

impl Signals {
    /// Records a call by its callee text (`useState`, `React.useState`,
    /// `toast.success`).
    pub fn record_call(&mut self, callee: &str) {
        let last = callee.rsplit('.').next().unwrap_or(callee);
        if is_hook_name(last) {
            self.hooks.push(last.to_string());
        } else {
            self.calls.push(callee.to_string());
        }
    }

    /// Records a JSX attribute name.
    pub fn record_attribute(&mut self, name: &str) {
        self.attributes.insert(name.to_string());
    }

    /// Number of hook-style calls seen.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    fn has_hook(&self, name: &str) -> bool {
        self.hooks.iter().any(|h| h == name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn has_state(&self) -> bool {
        STATE_HOOKS.iter().any(|h| self.has_hook(h))
    }

    pub fn has_effect(&self) -> bool {
        EFFECT_HOOKS.iter().any(|h| self.has_hook(h))
    }

    pub fn has_handler(&self) -> bool {
        self.attributes.iter().any(|a| is_event_handler(a))
    }

    fn has_feedback_call(&self) -> bool {
        self.has_hook("useToast")
            || self.calls.iter().any(|c| {
                c == "toast" || c.starts_with("toast.") || c == "alert" || c == "window.alert"
            })
    }

    /// Pattern tags implied by the recorded signals.
    pub fn patterns(&self) -> BTreeSet<String> {
        let mut patterns = BTreeSet::new();
        let mut tag = |name: &str| {
            patterns.insert(name.to_string());
        };

        if self.has_hook("useState") {
            tag("state-management");
            tag("useState-pattern");
        }
        if self.has_hook("useReducer") {
            tag("state-management");
        }
        if self.has_hook("useEffect") {
            tag("useEffect-pattern");
        }
        if self.has_hook("useForm") {
            tag("form-management");
        }
        if self.has_feedback_call() {
            tag("user-feedback");
        }
        if self.has_attribute("variant") {
            tag("variant-usage");
        }
        if self.has_attribute("size") {
            tag("size-usage");
        }
        if self.has_attribute("disabled") {
            tag("disabled-state");
        }
        if self.has_attribute("onClick") {
            tag("click-handling");
        }
        if self.has_attribute("onSubmit") {
            tag("form-submission");
        }

        patterns
    }

    /// Interactivity class: dynamic needs state, effects and a handler.
    pub fn interactivity(&self) -> Interactivity {
        let state = self.has_state();
        let handler = self.has_handler();
        if state && self.has_effect() && handler {
            Interactivity::Dynamic
        } else if state || handler {
            Interactivity::Interactive
        } else {
            Interactivity::Static
        }
    }
}

/// Best-practice notes driven by literal substring checks on the source.
pub fn best_practices(source: &str) -> Vec<String> {
    let mut notes = Vec::new();

    if source.contains("aria-") {
        notes.push("Uses ARIA attributes for accessibility".to_string());
    }
    let has_submit_input = source.contains("type=\"submit\"") || source.contains("type='submit'");
    if has_submit_input && source.contains("onSubmit") {
        notes.push("Handles form submission with a submit-typed control".to_string());
    }
    if source.contains("disabled") && source.to_lowercase().contains("loading") {
        notes.push("Disables interaction while loading".to_string());
    }
    if TRY_BLOCK.is_match(source) && CATCH_CLAUSE.is_match(source) {
        notes.push("Handles errors with try/catch".to_string());
    }

    notes
}

/// Classifies an example snippet.
///
/// Boolean-looking state wins over complex attribute expressions.
pub fn classify_example(code: &str, has_complex_attribute: bool) -> ExampleKind {
    if BOOLEAN_STATE.is_match(code) || code.contains("State") {
        ExampleKind::Interactive
    } else if has_complex_attribute {
        ExampleKind::Advanced
    } else {
        ExampleKind::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_predicates() {
        assert!(is_hook_name("useState"));
        assert!(!is_hook_name("user"));
        assert!(!is_hook_name("use"));
        assert!(is_event_handler("onClick"));
        assert!(!is_event_handler("one"));
        assert!(is_component_tag("Button"));
        assert!(!is_component_tag("div"));
    }

    #[test]
    fn test_hooks_and_calls() {
        let mut signals = Signals::default();
        signals.record_call("React.useState");
        signals.record_call("useEffect");
        signals.record_call("toast.success");
        signals.record_call("console.log");

        assert_eq!(signals.hook_count(), 2);
        let patterns = signals.patterns();
        assert!(patterns.contains("state-management"));
        assert!(patterns.contains("useState-pattern"));
        assert!(patterns.contains("useEffect-pattern"));
        assert!(patterns.contains("user-feedback"));
    }

    #[test]
    fn test_attribute_patterns() {
        let mut signals = Signals::default();
        for attr in ["variant", "size", "disabled", "onClick", "onSubmit"] {
            signals.record_attribute(attr);
        }
        let patterns = signals.patterns();
        for expected in [
            "variant-usage",
            "size-usage",
            "disabled-state",
            "click-handling",
            "form-submission",
        ] {
            assert!(patterns.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_interactivity_rules() {
        let signals = Signals::default();
        assert_eq!(signals.interactivity(), Interactivity::Static);

        let mut handler_only = Signals::default();
        handler_only.record_attribute("onChange");
        assert_eq!(handler_only.interactivity(), Interactivity::Interactive);

        let mut state_effect = Signals::default();
        state_effect.record_call("useState");
        state_effect.record_call("useEffect");
        assert_eq!(state_effect.interactivity(), Interactivity::Interactive);

        state_effect.record_attribute("onClick");
        assert_eq!(state_effect.interactivity(), Interactivity::Dynamic);
    }

    #[test]
    fn test_best_practices() {
        let source = r#"
            async function save() { try { await post(); } catch (e) { report(e); } }
            <form onSubmit={save}>
              <Button type="submit" disabled={loading} aria-label="Save">Save</Button>
            </form>
        "#;
        let notes = best_practices(source);
        assert_eq!(notes.len(), 4);
        assert!(best_practices("<Badge>New</Badge>").is_empty());
    }

    #[test]
    fn test_classify_example() {
        assert_eq!(classify_example("<Dialog open={isOpen} />", false), ExampleKind::Interactive);
        assert_eq!(classify_example("<Tabs value={tabState} />", true), ExampleKind::Interactive);
        assert_eq!(classify_example("<Button onClick={() => go()} />", true), ExampleKind::Advanced);
        assert_eq!(classify_example("<Badge>New</Badge>", false), ExampleKind::Basic);
    }
}
