use serde::Deserialize;

use super::TriageError;
use crate::models::{Recommendation, UrgencyTier, EVIDENCE_BASIS, RECOMMENDATION_TYPE};

/// Parse a generative model response into a recommendation.
///
/// The model is instructed to return strict JSON, but responses are
/// accepted either raw or inside a ```json fence. A missing or invalid
/// urgency value fails the parse — the caller treats that as a generation
/// failure. Every other absent field is backfilled with the conservative
/// default for the returned tier, so the all-fields-populated invariant
/// holds regardless of model sloppiness.
pub fn parse_recommendation(response: &str) -> Result<Recommendation, TriageError> {
    let json_str = extract_json(response)?;

    let raw: RawRecommendation = serde_json::from_str(json_str)
        .map_err(|e| TriageError::JsonParsing(e.to_string()))?;

    let urgency_str = raw
        .urgency
        .ok_or_else(|| TriageError::InvalidUrgency("missing".into()))?;
    let urgency: UrgencyTier = urgency_str
        .parse()
        .map_err(|()| TriageError::InvalidUrgency(urgency_str.clone()))?;

    Ok(Recommendation {
        recommendation_type: non_blank(raw.recommendation_type)
            .unwrap_or_else(|| RECOMMENDATION_TYPE.to_string()),
        urgency,
        suggested_timeframe: non_blank(raw.suggested_timeframe)
            .unwrap_or_else(|| Recommendation::default_timeframe(urgency).to_string()),
        red_flags: raw.red_flags.unwrap_or_default(),
        confidence_level: non_blank(raw.confidence_level).unwrap_or_else(|| "cautious".to_string()),
        evidence_basis: non_blank(raw.evidence_basis).unwrap_or_else(|| EVIDENCE_BASIS.to_string()),
        reasoning: non_blank(raw.reasoning)
            .unwrap_or_else(|| "Model-generated triage recommendation.".to_string()),
    })
}

#[derive(Deserialize)]
struct RawRecommendation {
    recommendation_type: Option<String>,
    urgency: Option<String>,
    suggested_timeframe: Option<String>,
    red_flags: Option<Vec<String>>,
    confidence_level: Option<String>,
    evidence_basis: Option<String>,
    reasoning: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Locate the JSON payload: a ```json fence when present, otherwise the
/// whole trimmed response.
fn extract_json(response: &str) -> Result<&str, TriageError> {
    if let Some(fence_start) = response.find("```json") {
        let body_start = fence_start + 7;
        let body_end = response[body_start..]
            .find("```")
            .ok_or_else(|| TriageError::MalformedResponse("unclosed JSON fence".into()))?;
        return Ok(response[body_start..body_start + body_end].trim());
    }
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(TriageError::MalformedResponse("empty response".into()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "recommendation_type": "CARDIOVASCULAR_TRIAGE",
        "urgency": "URGENT",
        "suggested_timeframe": "Assessment within 2 weeks.",
        "red_flags": ["raised troponin"],
        "confidence_level": "moderate",
        "evidence_basis": "NICE NG185",
        "reasoning": "Troponin rise without ongoing pain."
    }"#;

    #[test]
    fn parses_complete_strict_json() {
        let rec = parse_recommendation(FULL).unwrap();
        assert_eq!(rec.urgency, UrgencyTier::Urgent);
        assert_eq!(rec.red_flags, vec!["raised troponin"]);
        assert_eq!(rec.confidence_level, "moderate");
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("Here is the triage:\n```json\n{FULL}\n```\nDone.");
        let rec = parse_recommendation(&fenced).unwrap();
        assert_eq!(rec.urgency, UrgencyTier::Urgent);
    }

    #[test]
    fn missing_urgency_is_rejected() {
        let err = parse_recommendation(r#"{"reasoning": "no urgency key"}"#).unwrap_err();
        assert!(matches!(err, TriageError::InvalidUrgency(_)));
    }

    #[test]
    fn unknown_urgency_value_is_rejected() {
        let err = parse_recommendation(r#"{"urgency": "CRITICAL"}"#).unwrap_err();
        assert!(matches!(err, TriageError::InvalidUrgency(_)));
    }

    #[test]
    fn lowercase_urgency_is_tolerated() {
        let rec = parse_recommendation(r#"{"urgency": "emergency"}"#).unwrap();
        assert_eq!(rec.urgency, UrgencyTier::Emergency);
    }

    #[test]
    fn sparse_response_is_backfilled_conservatively() {
        let rec = parse_recommendation(r#"{"urgency": "ROUTINE"}"#).unwrap();
        assert_eq!(rec.recommendation_type, RECOMMENDATION_TYPE);
        assert_eq!(
            rec.suggested_timeframe,
            Recommendation::default_timeframe(UrgencyTier::Routine)
        );
        assert!(rec.red_flags.is_empty());
        assert_eq!(rec.confidence_level, "cautious");
        assert!(!rec.evidence_basis.is_empty());
        assert!(!rec.reasoning.is_empty());
    }

    #[test]
    fn blank_fields_are_treated_as_missing() {
        let rec =
            parse_recommendation(r#"{"urgency": "URGENT", "suggested_timeframe": "  "}"#).unwrap();
        assert_eq!(
            rec.suggested_timeframe,
            Recommendation::default_timeframe(UrgencyTier::Urgent)
        );
    }

    #[test]
    fn prose_response_is_rejected() {
        let err = parse_recommendation("The patient should be seen urgently.").unwrap_err();
        assert!(matches!(err, TriageError::JsonParsing(_)));
    }

    #[test]
    fn empty_response_is_rejected() {
        let err = parse_recommendation("   ").unwrap_err();
        assert!(matches!(err, TriageError::MalformedResponse(_)));
    }

    #[test]
    fn unclosed_fence_is_rejected() {
        let err = parse_recommendation("```json\n{\"urgency\": \"URGENT\"}").unwrap_err();
        assert!(matches!(err, TriageError::MalformedResponse(_)));
    }
}
