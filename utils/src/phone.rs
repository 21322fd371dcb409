use std::sync::OnceLock;

use regex::Regex;

/// `01X` prefix (0, 1, 6-9), a 3-4 digit middle block and a 4 digit tail,
/// each optionally separated by a hyphen or whitespace.
const MOBILE_PATTERN: &str = r"^01(0|1|[6-9])[-\s]?[0-9]{3,4}[-\s]?[0-9]{4}$";

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MOBILE_PATTERN).expect("mobile pattern is a valid regex"))
}

/// Whether `value` looks like a Korean mobile phone number.
pub fn is_valid_phone_number(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    mobile_pattern().is_match(value)
}
