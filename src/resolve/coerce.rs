//! Value type checks
//!
//! Parsing is locale independent: integers are base 10, floats use `.` as the
//! only decimal separator, booleans accept a fixed word list.

use crate::error::{PropertyError, Result};
use crate::schema::ParamType;

const TRUE_WORDS: &[&str] = &["true", "t", "yes", "y", "1"];
const FALSE_WORDS: &[&str] = &["false", "f", "no", "n", "0"];

fn type_error(name: &str, expected: ParamType, value: &str) -> PropertyError {
    PropertyError::TypeCoercion { name: name.to_string(), expected, value: value.to_string() }
}

pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    let word = value.trim().to_lowercase();
    if TRUE_WORDS.contains(&word.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&word.as_str()) {
        Ok(false)
    } else {
        Err(type_error(name, ParamType::Boolean, value))
    }
}

pub fn parse_int(name: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| type_error(name, ParamType::Integer, value))
}

pub fn parse_float(name: &str, value: &str) -> Result<f64> {
    let text = value.trim();
    // Digits, sign, '.', exponent. Rules out "inf", "NaN" and ',' decimals.
    let plain = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    match text.parse::<f64>() {
        Ok(number) if plain && number.is_finite() => Ok(number),
        _ => Err(type_error(name, ParamType::Float, value)),
    }
}

/// A value given to a parameterless property: blank or a "true" word marks presence.
pub fn is_presence_marker(value: &str) -> bool {
    let word = value.trim().to_lowercase();
    word.is_empty() || TRUE_WORDS.contains(&word.as_str())
}

/// Check that `value` parses as `param_type`.
///
/// For `ParamType::None` this only accepts presence markers; callers report a
/// parametrization violation instead of a type error in that case.
pub fn check(name: &str, value: &str, param_type: ParamType) -> Result<()> {
    match param_type {
        ParamType::String => Ok(()),
        ParamType::Integer => parse_int(name, value).map(|_| ()),
        ParamType::Float => parse_float(name, value).map(|_| ()),
        ParamType::Boolean => parse_bool(name, value).map(|_| ()),
        ParamType::None if is_presence_marker(value) => Ok(()),
        ParamType::None => Err(type_error(name, ParamType::None, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_strict_base_ten() {
        assert_eq!(parse_int("TTL", "5").expect("int"), 5);
        assert_eq!(parse_int("TTL", "  -12 ").expect("int"), -12);
        assert!(parse_int("TTL", "5g").is_err());
        assert!(parse_int("TTL", "0x10").is_err());
        assert!(parse_int("TTL", "").is_err());
    }

    #[test]
    fn floats_reject_comma_decimals() {
        assert!((parse_float("DN", "4.087").expect("float") - 4.087).abs() < 1e-9);
        assert!((parse_float("DN", "1e3").expect("float") - 1000.0).abs() < 1e-9);
        assert!(parse_float("DN", "4,087").is_err());
        assert!(parse_float("DN", "NaN").is_err());
        assert!(parse_float("DN", "inf").is_err());
    }

    #[test]
    fn booleans_accept_word_list_case_insensitively() {
        for word in ["true", "T", "Yes", "y", "1"] {
            assert!(parse_bool("DEBUG", word).expect(word), "{word}");
        }
        for word in ["faLse", "f", "NO", "n", "0"] {
            assert!(!parse_bool("DEBUG", word).expect(word), "{word}");
        }
        let err = parse_bool("DEBUG", "farse").expect_err("not a boolean");
        assert!(matches!(err, PropertyError::TypeCoercion { expected: ParamType::Boolean, .. }));
    }

    #[test]
    fn presence_markers() {
        for value in ["", " ", "true", "YES", "1"] {
            assert!(is_presence_marker(value), "{value:?}");
        }
        for value in ["false", "certainly", "0"] {
            assert!(!is_presence_marker(value), "{value:?}");
        }
    }

    #[test]
    fn type_error_names_the_raw_value() {
        let err = check("TTL", "5g", ParamType::Integer).expect_err("bad int");
        assert_eq!(err.to_string(), "Property \"TTL\" should have been an integer, but input string: \"5g\"");
    }
}
