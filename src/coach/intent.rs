//! Intent classification
//!
//! Substring matching over lowercased text, evaluated in a fixed precedence
//! order. The first category with a matching keyword wins.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HealthInquiry,
    Recommendation,
    Greeting,
    EmotionalSupport,
    Unknown,
}

/// Keywords that mark text as tired or stressed within emotional support
pub const SOMATIC_KEYWORDS: [&str; 2] = ["tired", "stressed"];

/// Precedence cascade; order matters
const CASCADE: [(Intent, &[&str]); 4] = [
    (Intent::HealthInquiry, &["how", "metric", "what is"]),
    (
        Intent::Recommendation,
        &["plan", "routine", "recommend", "coach"],
    ),
    (Intent::Greeting, &["hi", "hello"]),
    (
        Intent::EmotionalSupport,
        &[
            "tired",
            "stressed",
            "sad",
            "feel",
            "exhausted",
            "burnt",
            "happy",
            "great",
        ],
    ),
];

/// Classify free text. Matching is plain substring containment, so "hi"
/// also matches inside longer words.
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    classify_lowercased(&lower)
}

pub(crate) fn classify_lowercased(lower: &str) -> Intent {
    let intent = CASCADE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Unknown);

    trace!(?intent, "classified intent");
    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_first_match_wins() {
        assert_eq!(classify_intent("hi, what is my plan"), Intent::HealthInquiry);
        assert_eq!(classify_intent("Recommend a plan, hello!"), Intent::Recommendation);
        assert_eq!(classify_intent("hello, I feel great"), Intent::Greeting);
    }

    #[test]
    fn test_each_category() {
        assert_eq!(classify_intent("Show me my METRICS"), Intent::HealthInquiry);
        assert_eq!(classify_intent("give me a routine"), Intent::Recommendation);
        assert_eq!(classify_intent("Hello there"), Intent::Greeting);
        assert_eq!(classify_intent("I am so exhausted"), Intent::EmotionalSupport);
        assert_eq!(classify_intent("burnt out"), Intent::EmotionalSupport);
        assert_eq!(classify_intent("banana"), Intent::Unknown);
        assert_eq!(classify_intent(""), Intent::Unknown);
    }

    #[test]
    fn test_substring_matching_is_literal() {
        // "this" contains "hi"
        assert_eq!(classify_intent("this"), Intent::Greeting);
        // "somehow" contains "how"
        assert_eq!(classify_intent("somehow sad"), Intent::HealthInquiry);
    }
}
