use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary triage classification of a referral letter.
///
/// Ordering matters for precedence comparisons: `Emergency` outranks
/// `Urgent`, which outranks `Routine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyTier {
    Emergency,
    Urgent,
    Routine,
}

impl UrgencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Emergency => "EMERGENCY",
            UrgencyTier::Urgent => "URGENT",
            UrgencyTier::Routine => "ROUTINE",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyTier {
    type Err = ();

    /// Case-insensitive parse; surrounding whitespace tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMERGENCY" => Ok(UrgencyTier::Emergency),
            "URGENT" => Ok(UrgencyTier::Urgent),
            "ROUTINE" => Ok(UrgencyTier::Routine),
            _ => Err(()),
        }
    }
}

/// Structured triage recommendation consumed by UI/API layers.
///
/// Invariant: every field is populated regardless of which strategy
/// produced it. Consumers never need to null-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation_type: String,
    pub urgency: UrgencyTier,
    pub suggested_timeframe: String,
    pub red_flags: Vec<String>,
    pub confidence_level: String,
    pub evidence_basis: String,
    pub reasoning: String,
}

/// Fixed category for all recommendations produced by this crate.
pub const RECOMMENDATION_TYPE: &str = "CARDIOVASCULAR_TRIAGE";

/// Guideline citation attached to every heuristic recommendation.
pub const EVIDENCE_BASIS: &str = "NICE CG95 (chest pain); NICE NG185 (ACS); NICE NG208 (valve disease); NHS England Adult Cardiac Surgery Service Specification.";

impl Recommendation {
    /// Conservative timeframe wording for a tier, used both by the heuristic
    /// engine (ROUTINE case) and to backfill sparse model output.
    pub fn default_timeframe(tier: UrgencyTier) -> &'static str {
        match tier {
            UrgencyTier::Emergency => {
                "Immediate escalation via local emergency protocol (ED/cardiology)."
            }
            UrgencyTier::Urgent => {
                "Urgent assessment within 2 weeks, aligned to NICE ACS/chest-pain pathways."
            }
            UrgencyTier::Routine => "Routine outpatient review and non-invasive diagnostics.",
        }
    }
}
