//! Fact-like phrase detection in assistant replies
//!
//! Candidates are computed and reported, never stored. Whoever wants to act
//! on them installs a [`FactObserver`].

use std::sync::OnceLock;
use regex::Regex;

use super::types::Message;

const FACT_PATTERN: &str = r"(?i)\b(remember that|note:|key fact:|important:)\s*(.+)";

fn fact_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FACT_PATTERN).ok()).as_ref()
}

/// A phrase in a reply that looks like something worth remembering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCandidate {
    /// Trigger phrase as written, e.g. "Note:"
    pub trigger: String,
    /// Remainder of the line after the trigger
    pub text: String,
}

/// Extension point notified of fact candidates in assistant replies
pub trait FactObserver: Send + Sync {
    fn observe(&self, message: &Message, candidates: &[FactCandidate]);
}

/// Scan `text` for fact triggers; one candidate per match, in order
pub fn detect_fact_candidates(text: &str) -> Vec<FactCandidate> {
    let Some(re) = fact_regex() else {
        return Vec::new();
    };

    re.captures_iter(text)
        .filter_map(|caps| {
            let trigger = caps.get(1)?.as_str().to_string();
            let text = caps.get(2)?.as_str().trim().to_string();
            (!text.is_empty()).then_some(FactCandidate { trigger, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_triggers_case_insensitively() {
        let found = detect_fact_candidates(
            "Sure.\nRemember that the API key rotates weekly.\nIMPORTANT: back up first\nnothing here",
        );
        assert_eq!(
            found,
            vec![
                FactCandidate {
                    trigger: "Remember that".into(),
                    text: "the API key rotates weekly.".into(),
                },
                FactCandidate { trigger: "IMPORTANT:".into(), text: "back up first".into() },
            ]
        );
    }

    #[test]
    fn test_requires_word_boundary() {
        assert!(detect_fact_candidates("denote: nothing").is_empty());
        assert_eq!(detect_fact_candidates("key fact: water is wet").len(), 1);
    }

    #[test]
    fn test_no_candidates_in_plain_text() {
        assert!(detect_fact_candidates("just a reply").is_empty());
        assert!(detect_fact_candidates("").is_empty());
    }
}
