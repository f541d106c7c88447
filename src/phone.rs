//! # Phone Number Module
//!
//! Normalization of customer phone numbers typed into the chat.
//!
//! Local mobile numbers have a fixed identity of 9 significant digits. Two
//! forms are derived from raw input:
//!
//! - the **storage form** (`+251` followed by the 9 significant digits),
//!   produced only for the three accepted input conventions, and
//! - the **search key** (the last 9 digits of whatever was typed), used only
//!   to compare numbers and never persisted.

use lazy_static::lazy_static;
use regex::Regex;

/// Country calling code prefix of the storage form
pub const COUNTRY_PREFIX: &str = "+251";

/// Number of significant digits identifying a subscriber
pub const SIGNIFICANT_DIGITS: usize = 9;

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"[^0-9]+").expect("Non-digit pattern should be valid");
}

/// Strip everything that is not an ASCII digit
pub fn digits_only(raw: &str) -> String {
    NON_DIGITS.replace_all(raw, "").into_owned()
}

/// Comparison key for a phone number: the last 9 digits of the input
///
/// Input without any digit (empty cells, `NaN` placeholders) yields an empty
/// key. Inputs shorter than 9 digits are returned whole.
///
/// # Examples
///
/// ```rust
/// use anbesa_helper::phone::normalize_for_search;
///
/// assert_eq!(normalize_for_search("+251 912 345 678"), "912345678");
/// assert_eq!(normalize_for_search("nan"), "");
/// ```
pub fn normalize_for_search(raw: &str) -> String {
    let digits = digits_only(raw);
    let skip = digits.len().saturating_sub(SIGNIFICANT_DIGITS);
    digits[skip..].to_string()
}

/// Canonical storage form of a phone number, or `None` when rejected
///
/// The shape is decided by the literal prefix of the trimmed input:
///
/// - `09…` / `07…`: exactly 10 digits
/// - `+251…`: exactly 13 characters and 12 digits
/// - `251…`: exactly 12 digits
///
/// Anything else is rejected; there is no auto-correction.
///
/// # Examples
///
/// ```rust
/// use anbesa_helper::phone::format_for_storage;
///
/// assert_eq!(format_for_storage("0912345678").as_deref(), Some("+251912345678"));
/// assert_eq!(format_for_storage("+25191234567"), None);
/// ```
pub fn format_for_storage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = digits_only(trimmed);

    let accepted = if trimmed.starts_with("09") || trimmed.starts_with("07") {
        digits.len() == 10
    } else if trimmed.starts_with("+251") {
        trimmed.chars().count() == 13 && digits.len() == 12
    } else if trimmed.starts_with("251") {
        digits.len() == 12
    } else {
        false
    };

    if !accepted {
        return None;
    }

    let significant = &digits[digits.len() - SIGNIFICANT_DIGITS..];
    Some(format!("{COUNTRY_PREFIX}{significant}"))
}
