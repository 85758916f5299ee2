use std::collections::BTreeSet;

use super::signals::{
    ACS, DISSECTION, ENDOCARDITIS, FALLBACK_GROUPS, HAEMODYNAMIC, REST_PAIN, SEVERE_AS,
    SURGICAL_REFERRAL, SYNCOPE,
};
use crate::models::{Recommendation, UrgencyTier, EVIDENCE_BASIS, RECOMMENDATION_TYPE};

const FALLBACK_CONFIDENCE: &str = "cautious";
const FALLBACK_REASONING: &str = "Heuristic offline triage used because model output was \
     unavailable or invalid; signals mapped to conservative escalation.";

const TIMEFRAME_URGENT_SURGICAL: &str =
    "Discuss promptly with cardiology; consider surgical team triage if confirmed.";

/// Deterministic, safety-biased triage engine. Guaranteed to produce a
/// fully populated recommendation for any input, including empty text.
#[derive(Debug, Default)]
pub struct HeuristicTriage;

impl HeuristicTriage {
    pub fn new() -> Self {
        Self
    }

    pub fn recommend(&self, text: &str) -> Recommendation {
        let lowered = text.to_lowercase();

        let detected: BTreeSet<&str> = FALLBACK_GROUPS
            .iter()
            .filter(|group| group.phrases.iter().any(|p| lowered.contains(p)))
            .map(|group| group.label)
            .collect();

        let has = |label: &str| detected.contains(label);

        // Precedence: highest-acuity tier wins outright.
        let (urgency, timeframe) = if has(DISSECTION.label)
            || has(HAEMODYNAMIC.label)
            || has(REST_PAIN.label)
        {
            (
                UrgencyTier::Emergency,
                Recommendation::default_timeframe(UrgencyTier::Emergency),
            )
        } else if has(ACS.label) || has(SYNCOPE.label) {
            (
                UrgencyTier::Urgent,
                Recommendation::default_timeframe(UrgencyTier::Urgent),
            )
        } else if has(SURGICAL_REFERRAL.label) || has(SEVERE_AS.label) || has(ENDOCARDITIS.label) {
            (UrgencyTier::Urgent, TIMEFRAME_URGENT_SURGICAL)
        } else {
            (
                UrgencyTier::Routine,
                Recommendation::default_timeframe(UrgencyTier::Routine),
            )
        };

        tracing::debug!(
            urgency = %urgency,
            signal_count = detected.len(),
            "heuristic fallback recommendation"
        );

        Recommendation {
            recommendation_type: RECOMMENDATION_TYPE.to_string(),
            urgency,
            suggested_timeframe: timeframe.to_string(),
            red_flags: detected.iter().map(|s| s.to_string()).collect(),
            confidence_level: FALLBACK_CONFIDENCE.to_string(),
            evidence_basis: EVIDENCE_BASIS.to_string(),
            reasoning: FALLBACK_REASONING.to_string(),
        }
    }
}
