//! String and number helpers shared by the parser and its converters

use crate::error::{Error, Result};

/// Characters treated as whitespace when stripping and splitting values
pub const WHITESPACE: &str = " \t\n\r";

/// Line terminators
pub const NEWLINE: &str = "\n\r";

/// Characters that start a comment line
pub const COMMENTS: &str = "#;";

/// Cut the string at the first line terminator
pub fn truncate_nl(s: &str) -> &str {
    match s.find(|c: char| NEWLINE.contains(c)) {
        Some(pos) => &s[..pos],
        None => s,
    }
}

/// Trim `WHITESPACE` from both ends
pub fn strip(s: &str) -> &str {
    s.trim_matches(|c: char| WHITESPACE.contains(c))
}

/// True when every character is an ASCII decimal digit.
///
/// An empty string is vacuously a number.
pub fn is_number(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Interpret a boolean word
///
/// `1`, `on` and anything starting with `y`/`t` are true;
/// `0`, `off` and anything starting with `n`/`f` are false (case-insensitive).
/// Returns `None` for anything else.
pub fn parse_boolean(v: &str) -> Option<bool> {
    let first = v.chars().next();

    if v == "1" || matches!(first, Some('y' | 'Y' | 't' | 'T')) || v.eq_ignore_ascii_case("on") {
        Some(true)
    } else if v == "0"
        || matches!(first, Some('n' | 'N' | 'f' | 'F'))
        || v.eq_ignore_ascii_case("off")
    {
        Some(false)
    } else {
        None
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(|b| b.is_ascii_digit()).count()
}

fn parse_decimal(digits: &str, original: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .map_err(|e| Error::InvalidFormat(format!("'{}': {}", original, e)))
}

/// Parse a size with an optional binary unit suffix
///
/// Format: `<digits>[B|K|M|G]`, the unit must be the last character.
/// Examples:
/// - "512" -> 512
/// - "10K" -> 10240
/// - "1G" -> 1073741824
///
/// An empty string yields 0.
pub fn parse_bytes(b: &str) -> Result<u64> {
    if b.is_empty() {
        return Ok(0);
    }

    let len = b.len();
    let num_len = leading_digits(b);

    if num_len == len {
        return parse_decimal(b, b);
    }

    if num_len == 0 || num_len < len - 1 {
        return Err(Error::InvalidFormat(format!(
            "'{}' is not a byte size",
            b
        )));
    }

    let shift = match b.as_bytes()[num_len] {
        b'B' => 0,
        b'K' => 10,
        b'M' => 20,
        b'G' => 30,
        other => {
            return Err(Error::InvalidFormat(format!(
                "'{}': unknown unit '{}'",
                b, other as char
            )))
        }
    };

    parse_decimal(&b[..num_len], b)?
        .checked_mul(1u64 << shift)
        .ok_or_else(|| Error::InvalidFormat(format!("'{}' is out of range", b)))
}

/// Parse a percentage such as "70%"
///
/// The value must end with `%` and may not exceed 100.
/// An empty string yields 0.
pub fn parse_percent(s: &str) -> Result<u64> {
    if s.is_empty() {
        return Ok(0);
    }

    let digits = s.strip_suffix('%').ok_or_else(|| {
        Error::InvalidFormat(format!("'{}' does not end with '%'", s))
    })?;

    if digits.is_empty() || !is_number(digits) {
        return Err(Error::InvalidFormat(format!(
            "'{}' is not a percentage",
            s
        )));
    }

    let percent = parse_decimal(digits, s)?;
    if percent > 100 {
        return Err(Error::InvalidFormat(format!(
            "'{}' is over 100%",
            s
        )));
    }

    Ok(percent)
}

/// Split on any of the `separator` characters, dropping empty words
pub fn str_to_strv(s: &str, separator: &str) -> Vec<String> {
    s.split(|c: char| separator.contains(c))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hexadecimal float such as `0x1A` or `-0x1.8p3`
fn parse_hex_float(token: &str) -> Option<f32> {
    let (negative, rest) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    let rest = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;

    let (mantissa, exponent) = match rest.find(|c: char| c == 'p' || c == 'P') {
        Some(pos) => (&rest[..pos], rest[pos + 1..].parse::<i32>().ok()?),
        None => (rest, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }

    let frac_bits = i32::try_from(frac_part.len()).ok()?.checked_mul(4)?;
    let value = value * 2f64.powi(exponent.checked_sub(frac_bits)?);

    Some((if negative { -value } else { value }) as f32)
}

/// Parse the leading float token of `s`
///
/// Leading whitespace is skipped and the token ends at the first
/// whitespace character. Decimal and `0x` hexadecimal forms are accepted.
/// A blank string yields 0.0.
pub fn parse_float(s: &str) -> Option<f32> {
    let token = s
        .trim_start_matches(|c: char| WHITESPACE.contains(c))
        .split(|c: char| WHITESPACE.contains(c))
        .next()
        .unwrap_or("");

    if token.is_empty() {
        return Some(0.0);
    }

    token
        .parse::<f32>()
        .ok()
        .or_else(|| parse_hex_float(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_nl() {
        assert_eq!(truncate_nl("key = value\n"), "key = value");
        assert_eq!(truncate_nl("key = value\r\n"), "key = value");
        assert_eq!(truncate_nl("no newline"), "no newline");
        assert_eq!(truncate_nl("\n"), "");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip("  value \t"), "value");
        assert_eq!(strip("\r\nvalue\n"), "value");
        assert_eq!(strip("   "), "");
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("1500"));
        assert!(is_number(""));
        assert!(!is_number("-1"));
        assert!(!is_number("15 "));
        assert!(!is_number("1.5"));
    }

    #[test]
    fn test_parse_boolean_true() {
        for v in ["1", "on", "On", "ON", "yes", "Y", "true", "T"] {
            assert_eq!(parse_boolean(v), Some(true), "{}", v);
        }
    }

    #[test]
    fn test_parse_boolean_false() {
        for v in ["0", "off", "Off", "OFF", "no", "N", "false", "F"] {
            assert_eq!(parse_boolean(v), Some(false), "{}", v);
        }
    }

    #[test]
    fn test_parse_boolean_unknown() {
        assert_eq!(parse_boolean("maybe"), None);
        assert_eq!(parse_boolean(""), None);
        assert_eq!(parse_boolean("2"), None);
        assert_eq!(parse_boolean("o"), None);
    }

    #[test]
    fn test_parse_bytes_units() {
        assert_eq!(parse_bytes("512").unwrap(), 512);
        assert_eq!(parse_bytes("512B").unwrap(), 512);
        assert_eq!(parse_bytes("10K").unwrap(), 10240);
        assert_eq!(parse_bytes("3M").unwrap(), 3 * 1024 * 1024);
        assert_eq!(parse_bytes("1G").unwrap(), 1_073_741_824);
        assert_eq!(parse_bytes("").unwrap(), 0);
    }

    #[test]
    fn test_parse_bytes_invalid() {
        assert!(matches!(parse_bytes("K"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_bytes("10KB"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_bytes("10X"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_bytes("1K0"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_bytes("10k"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_bytes(" 10"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_bytes_overflow() {
        assert!(matches!(
            parse_bytes("99999999999999999999G"),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_bytes("17179869184G"),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("70%").unwrap(), 70);
        assert_eq!(parse_percent("0%").unwrap(), 0);
        assert_eq!(parse_percent("100%").unwrap(), 100);
        assert_eq!(parse_percent("").unwrap(), 0);
    }

    #[test]
    fn test_parse_percent_invalid() {
        assert!(matches!(parse_percent("101%"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_percent("70"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_percent("%"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_percent("7 0%"), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse_percent("-5%"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_str_to_strv() {
        assert_eq!(str_to_strv("a b\tc", WHITESPACE), vec!["a", "b", "c"]);
        assert_eq!(str_to_strv("  a   b  ", WHITESPACE), vec!["a", "b"]);
        assert!(str_to_strv("", WHITESPACE).is_empty());
        assert_eq!(str_to_strv("x,y,,z", ","), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("  2.25"), Some(2.25));
        assert_eq!(parse_float("3.0 trailing"), Some(3.0));
        assert_eq!(parse_float(""), Some(0.0));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("1.5x"), None);
        assert_eq!(parse_float("-0.5"), Some(-0.5));
        assert_eq!(parse_float("one"), None);
    }

    #[test]
    fn test_parse_float_hex() {
        assert_eq!(parse_float("0x1A"), Some(26.0));
        assert_eq!(parse_float("0x1p3"), Some(8.0));
        assert_eq!(parse_float("0X1.8P1"), Some(3.0));
        assert_eq!(parse_float("-0x.8"), Some(-0.5));
        assert_eq!(parse_float("0x10p-2 rest"), Some(4.0));
        assert_eq!(parse_float("0x"), None);
        assert_eq!(parse_float("0x1g"), None);
        assert_eq!(parse_float("0x1p"), None);
    }
}
