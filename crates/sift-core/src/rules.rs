//! Keyword rule evaluation for channel posts.
//!
//! Prefix rules are tested before substring rules, each in list order, first
//! hit wins. An empty rule set forwards everything (default-allow).

use crate::config::RelayConfig;

/// Outcome of evaluating one post against the configured rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDecision {
    pub forward: bool,
    /// The stored rule that matched; `None` under default-allow or no match.
    pub matched_keyword: Option<String>,
}

/// Decides whether a post with `text` should be copied to the sending
/// channels. Matching is case-insensitive on both the rule and the candidate.
pub fn decide(text: &str, config: &RelayConfig) -> RuleDecision {
    if config.keyword_initial.is_empty() && config.keyword_contain.is_empty() {
        return RuleDecision {
            forward: true,
            matched_keyword: None,
        };
    }
    let candidate = text.to_lowercase();
    for keyword in &config.keyword_initial {
        if candidate.starts_with(&keyword.to_lowercase()) {
            return RuleDecision {
                forward: true,
                matched_keyword: Some(keyword.clone()),
            };
        }
    }
    for keyword in &config.keyword_contain {
        if candidate.contains(&keyword.to_lowercase()) {
            return RuleDecision {
                forward: true,
                matched_keyword: Some(keyword.clone()),
            };
        }
    }
    RuleDecision {
        forward: false,
        matched_keyword: None,
    }
}
