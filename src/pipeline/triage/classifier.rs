use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::signals::{EMERGENCY_PATTERNS, RED_FLAGS, SURGICAL_INDICATORS};
use super::TriageError;
use crate::models::UrgencyTier;

const RED_FLAG_WEIGHT: f64 = 3.0;
const SURGICAL_WEIGHT: f64 = 1.0;
const EMERGENCY_WEIGHT: f64 = 5.0;

const EMERGENCY_THRESHOLD: f64 = 5.0;
const URGENT_THRESHOLD: f64 = 2.0;

/// Outcome of urgency scoring: the tier plus the sorted, deduplicated
/// vocabulary phrases that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyResult {
    pub tier: UrgencyTier,
    pub matched_signals: Vec<String>,
}

impl UrgencyResult {
    /// The safe default every internal fault degrades to.
    pub fn routine() -> Self {
        Self {
            tier: UrgencyTier::Routine,
            matched_signals: Vec::new(),
        }
    }
}

/// Scores redacted text against the fixed clinical-signal vocabulary.
/// `assess` never fails; any internal fault degrades to ROUTINE with no
/// signals.
#[derive(Debug, Default)]
pub struct UrgencySignalClassifier;

impl UrgencySignalClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, text: &str) -> UrgencyResult {
        self.try_assess(text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "urgency scoring fault, degrading to ROUTINE");
            UrgencyResult::routine()
        })
    }

    pub(crate) fn try_assess(&self, text: &str) -> Result<UrgencyResult, TriageError> {
        let lowered = text.to_lowercase();

        // Each distinct phrase counts once, however often it appears.
        let red_hits: BTreeSet<&str> = RED_FLAGS
            .iter()
            .copied()
            .filter(|p| lowered.contains(p))
            .collect();
        let surgical_hits: BTreeSet<&str> = SURGICAL_INDICATORS
            .iter()
            .copied()
            .filter(|p| lowered.contains(p))
            .collect();

        let mut score = RED_FLAG_WEIGHT * red_hits.len() as f64
            + SURGICAL_WEIGHT * surgical_hits.len() as f64;

        // Flat contribution per pattern, regardless of repetition.
        for pattern in EMERGENCY_PATTERNS.iter() {
            if pattern.is_match(text) {
                score += EMERGENCY_WEIGHT;
            }
        }

        if !score.is_finite() {
            return Err(TriageError::Scoring(format!("non-finite score {score}")));
        }

        let tier = if score >= EMERGENCY_THRESHOLD {
            UrgencyTier::Emergency
        } else if score >= URGENT_THRESHOLD {
            UrgencyTier::Urgent
        } else {
            UrgencyTier::Routine
        };

        // BTreeSet union is already sorted and deduplicated.
        let matched_signals = red_hits
            .union(&surgical_hits)
            .map(|s| s.to_string())
            .collect();

        Ok(UrgencyResult {
            tier,
            matched_signals,
        })
    }
}
