pub mod checksum;
pub mod rules;

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use rules::REDACTION_RULES;

/// Strips patient-identifying text from referral letters before any further
/// processing. Pure and infallible: a rule that finds nothing changes
/// nothing, and malformed input degrades to empty text.
#[derive(Debug, Default)]
pub struct PiiRedactor;

impl PiiRedactor {
    pub fn new() -> Self {
        Self
    }

    /// Apply the ordered rule set. Each rule operates on the output of the
    /// previous one; replacement tokens are never re-matched.
    pub fn redact(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        REDACTION_RULES
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

/// One-way SHA-256 digest of a caller-supplied identifier, hex-encoded.
/// Deterministic, never reversible; the only representation of a patient
/// identity allowed in logs and audit records.
pub fn hash_identifier(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

static NHS_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)NHS\s*Number\s*:?\s*(\d{3}\s*\d{3}\s*\d{4})").expect("invalid NHS pattern")
});

static NAME_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:patient\s+name|patient|name)\s*:?\s*([A-Z][a-z]+\s+[A-Z][a-z]+)")
        .expect("invalid name pattern")
});

/// Best-effort identifier extraction for callers that have none: NHS number,
/// else a labeled name, else the first substantial line, else "UNKNOWN".
/// Feed the result to [`hash_identifier`]; never log it raw.
pub fn derive_identifier(text: &str) -> String {
    if let Some(caps) = NHS_LABELED.captures(text) {
        let number: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
        tracing::debug!(kind = "nhs_number", "derived patient identifier");
        return number;
    }

    if let Some(caps) = NAME_LABELED.captures(text) {
        tracing::debug!(kind = "name", "derived patient identifier");
        return caps[1].trim().to_string();
    }

    for line in text.lines().take(5) {
        let line = line.trim();
        if line.len() > 10 && line.len() < 100 {
            tracing::debug!(kind = "first_line", "derived patient identifier");
            return line.chars().take(50).collect();
        }
    }

    "UNKNOWN".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = "Patient Name: John Smith\n\
        NHS Number: 943 476 5919\n\
        DOB: 12/05/1962\n\
        Address: 4 Acacia Avenue, Leeds, LS1 4AP\n\
        Tel: 0113 496 0123, email john.smith@example.co.uk\n\
        \n\
        Dear Dr Patel,\n\
        Thank you for seeing this gentleman with exertional chest pain.";

    #[test]
    fn redacts_every_identifier_category() {
        let redacted = PiiRedactor::new().redact(LETTER);

        assert!(redacted.contains("[NHS_NUMBER_REDACTED]"));
        assert!(redacted.contains("[DATE_REDACTED]"));
        assert!(redacted.contains("[ADDRESS_REDACTED]"));
        assert!(redacted.contains("[PHONE_REDACTED]"));
        assert!(redacted.contains("[EMAIL_REDACTED]"));
        assert!(redacted.contains("[NAME_REDACTED]"));

        assert!(!redacted.contains("9434765919"));
        assert!(!redacted.contains("943 476 5919"));
        assert!(!redacted.contains("John Smith"));
        assert!(!redacted.contains("Acacia"));
        assert!(!redacted.contains("example.co.uk"));
        assert!(!redacted.contains("12/05/1962"));
    }

    #[test]
    fn clinical_content_survives_redaction() {
        let redacted = PiiRedactor::new().redact(LETTER);
        assert!(redacted.contains("exertional chest pain"));
        assert!(redacted.contains("Thank you for seeing"));
    }

    #[test]
    fn invalid_checksum_lookalike_left_unredacted() {
        // Deliberate policy: unvalidated numeric look-alikes stay in place
        // so unrelated numeric data is not destroyed.
        let redacted = PiiRedactor::new().redact("Study ref 123 456 7890 enrolled.");
        assert!(redacted.contains("123 456 7890"));
        assert!(!redacted.contains("[NHS_NUMBER_REDACTED]"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(PiiRedactor::new().redact(""), "");
    }

    #[test]
    fn redact_is_idempotent() {
        let redactor = PiiRedactor::new();
        let once = redactor.redact(LETTER);
        let twice = redactor.redact(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_identifier("9434765919"), hash_identifier("9434765919"));
    }

    #[test]
    fn hash_distinct_inputs_do_not_collide() {
        let a = hash_identifier("9434765919");
        let b = hash_identifier("9434765918");
        let c = hash_identifier("John Smith");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn hash_never_contains_the_input() {
        let digest = hash_identifier("9434765919");
        assert!(!digest.contains("9434765919"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn derive_prefers_nhs_number() {
        assert_eq!(derive_identifier(LETTER), "9434765919");
    }

    #[test]
    fn derive_falls_back_to_labeled_name() {
        let text = "Patient Name: Jane Doe\nSeen in clinic today.";
        assert_eq!(derive_identifier(text), "Jane Doe");
    }

    #[test]
    fn derive_falls_back_to_first_substantial_line() {
        let text = "ok\nReferral from Leeds cardiology outpatients\nshort";
        assert_eq!(
            derive_identifier(text),
            "Referral from Leeds cardiology outpatients"
        );
    }

    #[test]
    fn derive_unknown_when_nothing_usable() {
        assert_eq!(derive_identifier(""), "UNKNOWN");
        assert_eq!(derive_identifier("a\nb\nc"), "UNKNOWN");
    }
}
