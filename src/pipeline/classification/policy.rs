//! Keyword lists and ratios driving the verdict heuristics.
//!
//! The defaults reproduce the behaviour the dashboard was built against.
//! They carry no documented policy basis, so every value can be overridden
//! from a JSON policy file (see `config::load_policy_file`).

use serde::{Deserialize, Serialize};

pub const DEFAULT_UNSAFE_MARKERS: &[&str] = &["unsafe", "violate", "inappropriate"];
pub const DEFAULT_VIOLENCE_TERMS: &[&str] = &["violence", "graphic", "harmful"];
pub const DEFAULT_ADULT_TERMS: &[&str] = &["sexual", "explicit", "adult"];
pub const DEFAULT_HATE_TERMS: &[&str] = &["hate", "discriminat", "offensive"];

pub const DEFAULT_STRONG_CERTAINTY: &[&str] = &["definitely", "certainly", "clearly"];
pub const DEFAULT_MODERATE_CERTAINTY: &[&str] = &["likely", "probably"];
pub const DEFAULT_WEAK_CERTAINTY: &[&str] = &["possibly", "might", "could be"];
pub const DEFAULT_UNCERTAINTY: &[&str] = &["uncertain", "unclear"];

/// Remainder 0 of the content hash modulo this value marks fallback content unsafe.
pub const DEFAULT_FALLBACK_UNSAFE_MODULUS: u32 = 5;

/// All tunable heuristic inputs. Terms are matched as lowercase substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicPolicy {
    pub unsafe_markers: Vec<String>,
    pub violence_terms: Vec<String>,
    pub adult_terms: Vec<String>,
    pub hate_terms: Vec<String>,
    pub strong_certainty: Vec<String>,
    pub moderate_certainty: Vec<String>,
    pub weak_certainty: Vec<String>,
    pub uncertainty: Vec<String>,
    pub fallback_unsafe_modulus: u32,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            unsafe_markers: owned(DEFAULT_UNSAFE_MARKERS),
            violence_terms: owned(DEFAULT_VIOLENCE_TERMS),
            adult_terms: owned(DEFAULT_ADULT_TERMS),
            hate_terms: owned(DEFAULT_HATE_TERMS),
            strong_certainty: owned(DEFAULT_STRONG_CERTAINTY),
            moderate_certainty: owned(DEFAULT_MODERATE_CERTAINTY),
            weak_certainty: owned(DEFAULT_WEAK_CERTAINTY),
            uncertainty: owned(DEFAULT_UNCERTAINTY),
            fallback_unsafe_modulus: DEFAULT_FALLBACK_UNSAFE_MODULUS,
        }
    }
}

impl HeuristicPolicy {
    /// Modulus used by the fallback, never below 1.
    pub fn effective_modulus(&self) -> u32 {
        self.fallback_unsafe_modulus.max(1)
    }
}

/// True if `haystack` (already lowercased) contains any of `terms`.
pub fn contains_any(haystack: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .any(|t| !t.is_empty() && haystack.contains(t.to_lowercase().as_str()))
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}
