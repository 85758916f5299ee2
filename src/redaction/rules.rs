use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::checksum::validate_nhs_number;

/// One redaction rule: a pattern, an optional confirmation predicate, and
/// the token written over confirmed matches. Rules are data so the set is
/// testable and extensible without touching control flow.
pub struct RedactionRule {
    pub regex: Regex,
    /// Applied to the whole match; a `false` leaves the text untouched.
    pub validator: Option<fn(&str) -> bool>,
    pub replacement: &'static str,
}

impl RedactionRule {
    /// Apply this rule to `text`. A `keep` capture group, when present,
    /// survives in front of the token (used for label-anchored rules).
    pub fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &Captures| {
                let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                if let Some(validate) = self.validator {
                    if !validate(matched) {
                        return matched.to_string();
                    }
                }
                match caps.name("keep") {
                    Some(label) => format!("{} {}", label.as_str(), self.replacement),
                    None => self.replacement.to_string(),
                }
            })
            .into_owned()
    }
}

fn rule(
    pattern: &str,
    validator: Option<fn(&str) -> bool>,
    replacement: &'static str,
) -> RedactionRule {
    RedactionRule {
        regex: Regex::new(pattern).expect("invalid redaction pattern"),
        validator,
        replacement,
    }
}

/// Ordered rule set. Later rules see the output of earlier ones; replacement
/// tokens are bracketed all-caps words with no digits, so no later pattern
/// can re-match them. Identifier rules run before the generic numeric rules
/// for the same reason.
pub static REDACTION_RULES: LazyLock<Vec<RedactionRule>> = LazyLock::new(|| {
    vec![
        // NHS numbers: 3-3-4 digit groups, optional whitespace separators.
        // Only checksum-confirmed candidates are redacted; numeric
        // look-alikes that fail Mod-11 stay in place.
        rule(
            r"\b\d{3}[ \t]*\d{3}[ \t]*\d{4}\b",
            Some(validate_nhs_number),
            "[NHS_NUMBER_REDACTED]",
        ),
        // UK postcodes, e.g. SW1A 1AA or m1 7ja.
        rule(
            r"(?i)\b[A-Z]{1,2}[0-9][0-9A-Z]?\s?[0-9][A-Z]{2}\b",
            None,
            "[POSTCODE_REDACTED]",
        ),
        // Label-anchored phone numbers; the label survives the redaction.
        rule(
            r"(?i)\b(?P<keep>(?:phone|telephone|tel|mobile|fax)\s*:)\s*\+?[\d\s()\-]{7,}",
            None,
            "[PHONE_REDACTED]",
        ),
        // International-prefix numbers appearing without a label.
        rule(
            r"\+\d{1,3}[\s\-]?\(?\d{2,5}\)?[\s\-]?\d{3,4}[\s\-]?\d{3,4}",
            None,
            "[PHONE_REDACTED]",
        ),
        // UK local numbers starting with a trunk zero.
        rule(
            r"\b0\d{3,4}[\s\-]?\d{3}[\s\-]?\d{3,4}\b",
            None,
            "[PHONE_REDACTED]",
        ),
        // Email addresses.
        rule(
            r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b",
            None,
            "[EMAIL_REDACTED]",
        ),
        // Numeric dates, day-first or ISO, with / - . separators. Treated
        // as potential dates of birth and redacted unconditionally.
        rule(
            r"\b(?:\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{4}[/\-.]\d{1,2}[/\-.]\d{1,2})\b",
            None,
            "[DATE_REDACTED]",
        ),
        // Honorific-prefixed names: title (any case) + capitalized word pair.
        rule(
            r"\b(?i:mr|mrs|ms|miss|dr|prof(?:essor)?)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?",
            None,
            "[NAME_REDACTED]",
        ),
        // Label-anchored names: "Patient Name: John Smith" keeps its label.
        rule(
            r"\b(?P<keep>(?i:patient\s+name|patient|name)\s*:)\s*[A-Z][a-z]+\s+[A-Z][a-z]+",
            None,
            "[NAME_REDACTED]",
        ),
        // Address lines, up to end-of-line. Stops before `[` so tokens
        // already written on the line survive.
        rule(
            r"(?P<keep>(?i:address)\s*:)[ \t]*[^\n\[\s][^\n\[]*",
            None,
            "[ADDRESS_REDACTED]",
        ),
    ]
});
