// src/matching/phone.rs
use log::debug;

use crate::error::PhoneUnrecognized;
use crate::models::PhoneParts;

/// Formatting characters dropped before the digits are parsed.
const PHONE_PUNCTUATION: [char; 6] = ['/', '-', '(', ')', ' ', '.'];

const MISSING_AREA_PENALTY: f64 = 0.25;
const MISSING_EXCHANGE_PENALTY: f64 = 1.0;
const MISSING_SUBSCRIBER_PENALTY: f64 = 0.5;

/// Splits a phone value into area, exchange and subscriber groups.
///
/// 11 digits drop the leading country digit, 10 digits split 3/3/4 and 7
/// digits carry no area code. Leading zeros do not survive the integer parse.
pub fn parse_phone(phone: &str) -> Result<PhoneParts, PhoneUnrecognized> {
    let stripped: String = phone
        .chars()
        .filter(|c| !PHONE_PUNCTUATION.contains(c))
        .collect();
    if stripped.is_empty() {
        return Err(PhoneUnrecognized::Empty);
    }

    let digits = stripped
        .parse::<u64>()
        .map_err(|_| PhoneUnrecognized::NotNumeric(stripped.clone()))?
        .to_string();

    match digits.len() {
        11 => Ok(PhoneParts::new(Some(&digits[1..4]), &digits[4..7], &digits[7..11])),
        10 => Ok(PhoneParts::new(Some(&digits[..3]), &digits[3..6], &digits[6..10])),
        7 => Ok(PhoneParts::new(None, &digits[..3], &digits[3..7])),
        other => Err(PhoneUnrecognized::UnsupportedLength(other)),
    }
}

/// Permissive wrapper over [`parse_phone`]: anything unrecognized is "no phone".
pub fn normalize_phone(phone: Option<&str>) -> PhoneParts {
    let Some(raw) = phone else {
        return PhoneParts::absent();
    };
    match parse_phone(raw) {
        Ok(parts) => parts,
        Err(reason) => {
            debug!("Phone '{}' treated as absent: {}", raw, reason);
            PhoneParts::absent()
        }
    }
}

/// Positional edit distance between two phones, with a fixed penalty for
/// every position where either side is missing.
pub fn phone_distance(x: &PhoneParts, y: &PhoneParts) -> f64 {
    part_distance(&x.area, &y.area, MISSING_AREA_PENALTY)
        + part_distance(&x.exchange, &y.exchange, MISSING_EXCHANGE_PENALTY)
        + part_distance(&x.subscriber, &y.subscriber, MISSING_SUBSCRIBER_PENALTY)
}

fn part_distance(x: &Option<String>, y: &Option<String>, missing_penalty: f64) -> f64 {
    match (x, y) {
        (Some(a), Some(b)) => strsim::levenshtein(a, b) as f64,
        _ => missing_penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(area: Option<&str>, exchange: &str, subscriber: &str) -> PhoneParts {
        PhoneParts::new(area, exchange, subscriber)
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(
            normalize_phone(Some("(555) 123-4567")),
            parts(Some("555"), "123", "4567")
        );
        assert_eq!(
            normalize_phone(Some("555.123.4567")),
            parts(Some("555"), "123", "4567")
        );
        assert_eq!(
            normalize_phone(Some("1-555-123-4567")),
            parts(Some("555"), "123", "4567")
        );
        assert_eq!(normalize_phone(Some("123-4567")), parts(None, "123", "4567"));
        assert_eq!(
            normalize_phone(Some("5551234567")),
            parts(Some("555"), "123", "4567")
        );
    }

    #[test]
    fn test_unrecognized_phones_are_absent() {
        assert_eq!(normalize_phone(None), PhoneParts::absent());
        assert_eq!(normalize_phone(Some("")), PhoneParts::absent());
        assert_eq!(normalize_phone(Some("call us")), PhoneParts::absent());
        assert_eq!(normalize_phone(Some("555-1234 x12")), PhoneParts::absent());
        assert_eq!(normalize_phone(Some("12345")), PhoneParts::absent());
        assert_eq!(normalize_phone(Some("99999999999999999999999")), PhoneParts::absent());
    }

    #[test]
    fn test_parse_phone_reasons() {
        assert_eq!(parse_phone("()"), Err(PhoneUnrecognized::Empty));
        assert_eq!(
            parse_phone("555-CALL"),
            Err(PhoneUnrecognized::NotNumeric("555CALL".to_string()))
        );
        assert_eq!(parse_phone("12345"), Err(PhoneUnrecognized::UnsupportedLength(5)));
    }

    #[test]
    fn test_leading_zero_is_dropped_by_integer_parse() {
        // 0 + 10 digits parses to a 10 digit number
        assert_eq!(
            normalize_phone(Some("0 555 123 4567")),
            parts(Some("555"), "123", "4567")
        );
    }

    #[test]
    fn test_phone_distance() {
        let full = parts(Some("555"), "123", "4567");
        assert_eq!(phone_distance(&full, &full), 0.0);

        let other = parts(Some("555"), "124", "4568");
        assert_eq!(phone_distance(&full, &other), 2.0);

        let local = parts(None, "123", "4567");
        assert_eq!(phone_distance(&full, &local), 0.25);

        let none = PhoneParts::absent();
        assert_eq!(phone_distance(&full, &none), 1.75);
        assert_eq!(phone_distance(&none, &none), 1.75);
    }

    #[test]
    fn test_phone_distance_symmetric() {
        let a = parts(Some("617"), "555", "0101");
        let b = parts(None, "556", "1010");
        assert_eq!(phone_distance(&a, &b), phone_distance(&b, &a));
    }
}
