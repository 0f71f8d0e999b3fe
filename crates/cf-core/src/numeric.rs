use crate::{CfError, CfResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CfResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Parse a form field into a number.
///
/// Accepts surrounding whitespace, a trailing `mm` unit suffix (any case) and a
/// German decimal comma. Anything else that fails to parse, including empty
/// input and non-finite values, yields `None`.
pub fn parse_number(raw: &str) -> Option<Real> {
    let mut text = raw.trim();
    let suffix_at = text.len().saturating_sub(2);
    if text
        .get(suffix_at..)
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case("mm"))
    {
        text = text[..suffix_at].trim_end();
    }
    if text.is_empty() {
        return None;
    }
    let normalized = text.replace(',', ".");
    normalized
        .parse::<Real>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a form field into an integer count, truncating any fractional part.
pub fn parse_count(raw: &str) -> Option<i64> {
    parse_number(raw).map(|v| v.trunc() as i64)
}

/// Strict variant of [`parse_number`] for places that must report bad input.
pub fn require_number(raw: &str, what: &'static str) -> CfResult<Real> {
    parse_number(raw).ok_or_else(|| CfError::Unparseable {
        what,
        raw: raw.to_string(),
    })
}

/// Round half away from zero to `decimals` places.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Format a BOM quantity the way the order sheets print it.
///
/// Whole numbers are printed without decimals. Fractional values are printed
/// with up to `decimals` places, trailing zeros removed, and a decimal comma.
pub fn format_quantity(v: Real, decimals: usize) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.fract() == 0.0 {
        return format!("{}", v as i64);
    }
    let fixed = format!("{:.*}", decimals, v);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    trimmed.replace('.', ",")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_number_never_panics(raw in ".*") {
            let _ = parse_number(&raw);
        }

        #[test]
        fn whole_millimeters_parse_back(v in -1_000_000i64..1_000_000) {
            prop_assert_eq!(parse_number(&format!("{v}mm")), Some(v as Real));
        }

        #[test]
        fn formatted_quantity_parses_back(v in 0.0f64..1.0e6) {
            let back = parse_number(&format_quantity(v, 3));
            prop_assert!(back.is_some_and(|b| (b - v).abs() <= 0.000_501));
        }
    }
}
