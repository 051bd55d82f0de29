//! Amount conversion between MAS and nano-units
//!
//! 1 MAS = 10^9 nano-units. Fees and operation amounts are always nano-units
//! on the wire; balances are displayed as MAS with six decimal places.

use crate::{Error, Result};

/// Nano-units per MAS
pub const NANO_PER_MAS: u64 = 1_000_000_000;

/// Default fixed fee (0.01 MAS, in nano-units)
pub const DEFAULT_FEE: u64 = 10_000_000;

const NANO_DECIMALS: usize = 9;
const DISPLAY_DECIMALS: u32 = 6;

/// Convert a MAS amount to nano-units, truncating below one nano.
///
/// Fails for negative, non-finite or out-of-range input.
pub fn mas_to_nano(mas: f64) -> Result<u64> {
    if !mas.is_finite() {
        return Err(Error::InvalidAmount(format!("{mas} is not a finite number")));
    }
    if mas < 0.0 {
        return Err(Error::InvalidAmount(format!("{mas} is negative")));
    }

    let nano = (mas * NANO_PER_MAS as f64).trunc();
    if nano >= u64::MAX as f64 {
        return Err(Error::InvalidAmount(format!("{mas} MAS is out of range")));
    }
    Ok(nano as u64)
}

/// Parse a decimal MAS string (e.g. `"1.5"`) into nano-units.
///
/// Digits beyond the ninth decimal place are truncated.
pub fn parse_mas(input: &str) -> Result<u64> {
    let input = input.trim();
    let invalid = || Error::InvalidAmount(format!("'{input}' is not a valid MAS amount"));

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let mut fraction_nano: u64 = 0;
    for (i, digit) in fraction.bytes().take(NANO_DECIMALS).enumerate() {
        fraction_nano += u64::from(digit - b'0') * 10u64.pow((NANO_DECIMALS - 1 - i) as u32);
    }

    whole
        .checked_mul(NANO_PER_MAS)
        .and_then(|n| n.checked_add(fraction_nano))
        .ok_or_else(|| Error::InvalidAmount(format!("{input} MAS is out of range")))
}

/// Interpret a balance value from a node.
///
/// A value containing `.` is already in MAS; anything else is an integer
/// count of nano-units.
pub fn parse_nano_or_decimal(value: &str) -> Result<u64> {
    let value = value.trim();
    if value.contains('.') {
        parse_mas(value)
    } else {
        value
            .parse::<u64>()
            .map_err(|_| Error::InvalidAmount(format!("'{value}' is not a nano-unit amount")))
    }
}

/// Format nano-units as MAS with six decimal places, rounding half up.
pub fn format_nano(nano: u64) -> String {
    let scale = 10u128.pow(NANO_DECIMALS as u32 - DISPLAY_DECIMALS);
    let micro = (u128::from(nano) + scale / 2) / scale;
    let unit = 10u128.pow(DISPLAY_DECIMALS);
    format!(
        "{}.{:0width$}",
        micro / unit,
        micro % unit,
        width = DISPLAY_DECIMALS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mas_to_nano() {
        assert_eq!(mas_to_nano(0.01).unwrap(), 10_000_000);
        assert_eq!(mas_to_nano(1.5).unwrap(), 1_500_000_000);
        assert_eq!(mas_to_nano(0.0).unwrap(), 0);
        // Truncates below one nano.
        assert_eq!(mas_to_nano(0.0000000019).unwrap(), 1);
    }

    #[test]
    fn test_mas_to_nano_rejects_bad_input() {
        assert!(matches!(mas_to_nano(-1.0), Err(Error::InvalidAmount(_))));
        assert!(matches!(mas_to_nano(f64::NAN), Err(Error::InvalidAmount(_))));
        assert!(matches!(mas_to_nano(f64::INFINITY), Err(Error::InvalidAmount(_))));
        assert!(matches!(mas_to_nano(1e20), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_mas() {
        assert_eq!(parse_mas("1.5").unwrap(), 1_500_000_000);
        assert_eq!(parse_mas("0.01").unwrap(), 10_000_000);
        assert_eq!(parse_mas("42").unwrap(), 42 * NANO_PER_MAS);
        assert_eq!(parse_mas(".5").unwrap(), 500_000_000);
        assert_eq!(parse_mas("0.0000000019").unwrap(), 1);
        assert!(parse_mas("").is_err());
        assert!(parse_mas(".").is_err());
        assert!(parse_mas("-1").is_err());
        assert!(parse_mas("1.2.3").is_err());
        assert!(parse_mas("abc").is_err());
        assert!(parse_mas("99999999999999999999").is_err());
    }

    #[test]
    fn test_format_nano() {
        assert_eq!(format_nano(1_999_000_000), "1.999000");
        assert_eq!(format_nano(0), "0.000000");
        assert_eq!(format_nano(1), "0.000000");
        assert_eq!(format_nano(500), "0.000001");
        assert_eq!(format_nano(1_999_999_999), "2.000000");
        assert_eq!(format_nano(u64::MAX), "18446744073.709552");
    }

    #[test]
    fn test_parse_nano_or_decimal() {
        assert_eq!(parse_nano_or_decimal("1999000000").unwrap(), 1_999_000_000);
        assert_eq!(parse_nano_or_decimal("12.5").unwrap(), 12_500_000_000);
        assert!(parse_nano_or_decimal("n/a").is_err());
        assert!(parse_nano_or_decimal("-5").is_err());
    }
}
