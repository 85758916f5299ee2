//! Mod-11 checksum validation for NHS numbers.
//!
//! A candidate is confirmed only when its tenth digit matches the check
//! digit computed over the first nine: weighted sum with descending weights
//! 10..2, check = 11 - (sum mod 11), where 11 normalizes to 0 and a computed
//! 10 means the number cannot be valid.

/// Validate a candidate national identifier. Whitespace is stripped before
/// checking; anything that is not exactly 10 digits afterwards is rejected.
pub fn validate_nhs_number(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 10 {
        return false;
    }

    let sum: u32 = digits[..9]
        .iter()
        .zip((2..=10).rev())
        .map(|(d, w)| d * w)
        .sum();

    let check = match 11 - (sum % 11) {
        11 => 0,
        10 => return false,
        c => c,
    };

    digits[9] == check
}
