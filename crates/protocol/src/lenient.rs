//! Deserializers for numeric fields that the backend sends either as JSON
//! numbers or as the raw text of a form input.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn finite<E: de::Error>(n: f64) -> Result<f64, E> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(E::custom(format!("expected a finite number, got {n}")))
    }
}

/// Reads a finite `f64` from a number or a numeric string. Blank strings
/// read as zero.
pub(crate) fn f64_from_number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(n) => Ok(n as f64),
        NumberOrText::Float(n) => finite(n),
        NumberOrText::Text(s) if s.trim().is_empty() => Ok(0.0),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}")))
            .and_then(finite),
    }
}

/// Reads an optional `i64` from null, a number, or a numeric string.
/// Blank strings read as `None`; numbers with a fractional part are refused.
pub(crate) fn opt_i64_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Int(n)) => Ok(Some(n)),
        Some(NumberOrText::Float(n))
            if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 =>
        {
            Ok(Some(n as i64))
        }
        Some(NumberOrText::Float(n)) => Err(de::Error::custom(format!(
            "expected an integer, got {n}"
        ))),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}
