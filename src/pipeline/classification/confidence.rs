use super::policy::{contains_any, HeuristicPolicy};

/// Confidence bounds for every verdict.
pub mod confidence_bounds {
    pub const MIN: f32 = 0.50;
    pub const MAX: f32 = 0.99;
}

/// Base confidence before certainty adjustment.
pub const SAFE_BASE_CONFIDENCE: f32 = 0.80;
pub const UNSAFE_BASE_CONFIDENCE: f32 = 0.75;

pub const STRONG_CERTAINTY_BONUS: f32 = 0.15;
pub const MODERATE_CERTAINTY_BONUS: f32 = 0.05;
pub const WEAK_CERTAINTY_PENALTY: f32 = -0.10;
pub const UNCERTAINTY_PENALTY: f32 = -0.20;

/// Adjustment for the certainty language in `lowered` (already case-folded).
///
/// Only the first matching tier applies: strong, moderate, weak, uncertain.
pub fn certainty_adjustment(lowered: &str, policy: &HeuristicPolicy) -> f32 {
    if contains_any(lowered, &policy.strong_certainty) {
        STRONG_CERTAINTY_BONUS
    } else if contains_any(lowered, &policy.moderate_certainty) {
        MODERATE_CERTAINTY_BONUS
    } else if contains_any(lowered, &policy.weak_certainty) {
        WEAK_CERTAINTY_PENALTY
    } else if contains_any(lowered, &policy.uncertainty) {
        UNCERTAINTY_PENALTY
    } else {
        0.0
    }
}

/// Score a provider verdict from its safety flag and certainty language.
pub fn compute_verdict_confidence(safe: bool, raw: &str, policy: &HeuristicPolicy) -> f32 {
    let base = if safe {
        SAFE_BASE_CONFIDENCE
    } else {
        UNSAFE_BASE_CONFIDENCE
    };
    let lowered = raw.to_lowercase();
    clamp_confidence(base + certainty_adjustment(&lowered, policy))
}

/// Clamp into [0.5, 0.99]. Applied after all adjustments.
pub fn clamp_confidence(value: f32) -> f32 {
    value.clamp(confidence_bounds::MIN, confidence_bounds::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn policy() -> HeuristicPolicy {
        HeuristicPolicy::default()
    }

    #[test]
    fn neutral_text_keeps_base() {
        assert!(approx(compute_verdict_confidence(true, "It is fine.", &policy()), 0.80));
        assert!(approx(compute_verdict_confidence(false, "It is bad.", &policy()), 0.75));
    }

    #[test]
    fn strong_certainty_boosts() {
        let conf = compute_verdict_confidence(true, "This is Clearly acceptable.", &policy());
        assert!(approx(conf, 0.95), "got {conf}");
    }

    #[test]
    fn moderate_certainty_small_boost() {
        let conf = compute_verdict_confidence(false, "This is probably harmful.", &policy());
        assert!(approx(conf, 0.80), "got {conf}");
    }

    #[test]
    fn weak_certainty_penalised() {
        let conf = compute_verdict_confidence(false, "This could be a problem.", &policy());
        assert!(approx(conf, 0.65), "got {conf}");
    }

    #[test]
    fn uncertainty_penalised_most() {
        let conf = compute_verdict_confidence(false, "The intent is unclear.", &policy());
        assert!(approx(conf, 0.55), "got {conf}");
    }

    #[test]
    fn strong_tier_wins_over_uncertainty() {
        // "definitely" and "uncertain" together: only the strong tier applies.
        let raw = "It is definitely safe, though the context is uncertain.";
        let conf = compute_verdict_confidence(true, raw, &policy());
        assert!(approx(conf, 0.95), "got {conf}");
        assert!(conf <= confidence_bounds::MAX);
    }

    #[test]
    fn clamp_pins_out_of_range_values() {
        assert!(approx(clamp_confidence(0.80 + 0.25), confidence_bounds::MAX));
        assert!(approx(clamp_confidence(0.75 - 0.40), confidence_bounds::MIN));
        assert!(approx(clamp_confidence(0.70), 0.70));
    }

    #[test]
    fn default_tiers_stay_strictly_inside_bounds() {
        // Highest reachable is 0.80 + 0.15, lowest 0.75 - 0.20: the clamp in
        // compute_verdict_confidence never binds with the built-in constants.
        let highest = compute_verdict_confidence(true, "definitely", &policy());
        let lowest = compute_verdict_confidence(false, "unclear", &policy());
        assert!(approx(highest, 0.95), "got {highest}");
        assert!(approx(lowest, 0.55), "got {lowest}");
        assert!(highest < confidence_bounds::MAX);
        assert!(lowest > confidence_bounds::MIN);
    }

    #[test]
    fn every_tier_stays_in_bounds() {
        for safe in [true, false] {
            for raw in ["definitely", "likely", "might", "unclear", "plain"] {
                let conf = compute_verdict_confidence(safe, raw, &policy());
                assert!((0.5..=0.99).contains(&conf), "{raw}: {conf}");
            }
        }
    }
}
