//! Serde helpers that accept either JSON/YAML numbers or form text.
//!
//! The configuration API returns decimals as strings in some responses and
//! numbers in others; drafts saved from forms may carry `"110mm"`. Text that
//! does not parse is read as an empty field.

use cf_core::numeric::{Real, ensure_finite, parse_count, parse_number, require_number};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(Real),
    Text(String),
}

impl NumberOrText {
    fn number(self) -> Option<Real> {
        match self {
            Self::Number(v) => Some(v).filter(|v| v.is_finite()),
            Self::Text(t) => parse_number(&t),
        }
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<Real>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.and_then(NumberOrText::number))
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Number(v)) if v.is_finite() => Some(v.trunc() as i64),
            Some(NumberOrText::Number(_)) => None,
            Some(NumberOrText::Text(t)) => parse_count(&t),
        },
    )
}

/// Like [`number`] but a missing or unparseable value is an error.
pub fn required_number<'de, D>(deserializer: D) -> Result<Real, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(v) => ensure_finite(v, "number"),
        NumberOrText::Text(t) => require_number(&t, "number"),
    }
    .map_err(D::Error::custom)
}

/// A list of numbers; entries that do not parse are dropped.
pub fn number_list<'de, D>(deserializer: D) -> Result<Vec<Real>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<NumberOrText>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter_map(NumberOrText::number)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        spacing: Option<Real>,
        #[serde(deserialize_with = "required_number")]
        left: Real,
        #[serde(default, deserialize_with = "number_list")]
        sizes: Vec<Real>,
    }

    #[test]
    fn decimals_as_strings_or_numbers() {
        let p: Probe =
            serde_json::from_str(r#"{"spacing": "500.00", "left": 100, "sizes": [90, "110", "x"]}"#)
                .unwrap();
        assert_eq!(p.spacing, Some(500.0));
        assert_eq!(p.left, 100.0);
        assert_eq!(p.sizes, vec![90.0, 110.0]);
    }

    #[test]
    fn required_number_rejects_text() {
        let p: Result<Probe, _> = serde_json::from_str(r#"{"left": "viel"}"#);
        assert!(p.is_err());
    }
}
