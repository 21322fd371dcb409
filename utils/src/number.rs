//! ko-KR number formatting.
//!
//! Output matches a ko-KR locale number formatter: `,` groups every three
//! integer digits, `.` is the decimal point, at most three fraction digits
//! are shown (rounded half away from zero on the shortest decimal
//! representation) and trailing fraction zeros are dropped.

const MAX_FRACTION_DIGITS: usize = 3;

/// A number, or text to be read as one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberInput<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for NumberInput<'_> {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

impl From<f32> for NumberInput<'_> {
    fn from(value: f32) -> Self {
        NumberInput::Number(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NumberInput<'_> {
                fn from(value: $ty) -> Self {
                    NumberInput::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a> From<&'a str> for NumberInput<'a> {
    fn from(value: &'a str) -> Self {
        NumberInput::Text(value)
    }
}

impl<'a> From<&'a String> for NumberInput<'a> {
    fn from(value: &'a String) -> Self {
        NumberInput::Text(value.as_str())
    }
}

/// Format `value` with ko-KR grouping. Anything that is not a number,
/// including text that does not parse as one, formats as `"0"`.
///
/// ```
/// use format_utils::number_formatting;
///
/// assert_eq!(number_formatting(1234567), "1,234,567");
/// assert_eq!(number_formatting("-9876.54321"), "-9,876.543");
/// assert_eq!(number_formatting("abc"), "0");
/// ```
pub fn number_formatting<'a>(value: impl Into<NumberInput<'a>>) -> String {
    let number = match value.into() {
        NumberInput::Number(n) => n,
        NumberInput::Text(text) => parse_number(text),
    };
    if number.is_nan() {
        return "0".to_string();
    }
    format_grouped(number)
}

/// Read text the way a script engine's `Number(text)` conversion does:
/// surrounding whitespace is ignored, empty text is zero, `Infinity` and
/// `0x`/`0o`/`0b` literals are recognized, and anything else must be a plain
/// decimal literal. Unreadable text is NaN.
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            if let Some(value) = parse_prefixed_integer(trimmed) {
                return value;
            }
            let plain_decimal = trimmed
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
            if !plain_decimal {
                return f64::NAN;
            }
            trimmed.parse().unwrap_or(f64::NAN)
        }
    }
}

/// `Some` when `text` carries a radix prefix; NaN inside if the digits are bad.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

fn format_grouped(number: f64) -> String {
    let sign = if number.is_sign_negative() { "-" } else { "" };
    if number.is_infinite() {
        return format!("{sign}∞");
    }

    // f64 `Display` prints the shortest round-trip digits, never an exponent.
    let (integer, fraction) = round_fraction(&number.abs().to_string());
    let mut out = String::with_capacity(sign.len() + integer.len() * 4 / 3 + fraction.len() + 1);
    out.push_str(sign);
    out.push_str(&group_thousands(&integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Round a plain decimal string to `MAX_FRACTION_DIGITS`, half away from
/// zero, and strip trailing fraction zeros.
fn round_fraction(repr: &str) -> (String, String) {
    let (integer, fraction) = repr.split_once('.').unwrap_or((repr, ""));
    if fraction.len() <= MAX_FRACTION_DIGITS {
        return (integer.to_string(), fraction.trim_end_matches('0').to_string());
    }

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(MAX_FRACTION_DIGITS))
        .collect();
    if fraction.as_bytes()[MAX_FRACTION_DIGITS] >= b'5' {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - MAX_FRACTION_DIGITS;
    let integer: String = digits[..split].iter().map(|&b| char::from(b)).collect();
    let fraction: String = digits[split..].iter().map(|&b| char::from(b)).collect();
    (integer, fraction.trim_end_matches('0').to_string())
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(number_formatting(1234567), "1,234,567");
        assert_eq!(number_formatting(999), "999");
        assert_eq!(number_formatting(1000), "1,000");
        assert_eq!(number_formatting(0), "0");
        assert_eq!(number_formatting(1e21), "1,000,000,000,000,000,000,000");
    }

    #[test]
    fn unreadable_text_is_zero() {
        assert_eq!(number_formatting("abc"), "0");
        assert_eq!(number_formatting("12abc"), "0");
        assert_eq!(number_formatting("1,000"), "0");
        assert_eq!(number_formatting("inf"), "0");
        assert_eq!(number_formatting("0x"), "0");
        assert_eq!(number_formatting(f64::NAN), "0");
    }

    #[test]
    fn reads_text_like_number_conversion() {
        assert_eq!(number_formatting("1234567"), "1,234,567");
        assert_eq!(number_formatting("  42\n"), "42");
        assert_eq!(number_formatting(""), "0");
        assert_eq!(number_formatting("1e3"), "1,000");
        assert_eq!(number_formatting(".5"), "0.5");
        assert_eq!(number_formatting("0x1F"), "31");
        assert_eq!(number_formatting("0b101"), "5");
        assert_eq!(number_formatting(&"-2500".to_string()), "-2,500");
    }

    #[test]
    fn keeps_at_most_three_fraction_digits() {
        assert_eq!(number_formatting(1234.5), "1,234.5");
        assert_eq!(number_formatting(-1234.5678), "-1,234.568");
        assert_eq!(number_formatting(0.1 + 0.2), "0.3");
        assert_eq!(number_formatting(2.50), "2.5");
    }

    #[test]
    fn rounds_half_away_from_zero_on_shortest_digits() {
        assert_eq!(number_formatting(1.0005), "1.001");
        assert_eq!(number_formatting(0.0625), "0.063");
        assert_eq!(number_formatting(999.9996), "1,000");
        assert_eq!(number_formatting(-0.0005), "-0.001");
        assert_eq!(number_formatting(0.0004), "0");
    }

    #[test]
    fn negative_zero_and_infinities_keep_their_sign() {
        assert_eq!(number_formatting(-0.0), "-0");
        assert_eq!(number_formatting(-0.0001), "-0");
        assert_eq!(number_formatting("Infinity"), "∞");
        assert_eq!(number_formatting(f64::NEG_INFINITY), "-∞");
    }
}
