//! Lenient number decoding.
//!
//! The upstream API is not consistent about numbers: the same field arrives as
//! `2019` on one record and `"2019"` on another.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Float(f64),
    Text(String),
}

/// Decode an optional integer that may be encoded as a string. Blank or
/// non-numeric strings decode to `None`.
pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(NumberOrString::Float(_)) => None,
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::opt_i64")]
        value: Option<i64>,
    }

    fn decode(json: &str) -> Option<i64> {
        serde_json::from_str::<Probe>(json).unwrap().value
    }

    #[test]
    fn blank_and_garbage_are_missing() {
        assert_eq!(decode(r#"{}"#), None);
        assert_eq!(decode(r#"{"value":null}"#), None);
        assert_eq!(decode(r#"{"value":"  "}"#), None);
        assert_eq!(decode(r#"{"value":"n/a"}"#), None);
        assert_eq!(decode(r#"{"value":2019.7}"#), Some(2019));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            .. ProptestConfig::default()
        })]

        #[test]
        fn numbers_and_numeric_strings_agree(n in any::<i64>()) {
            prop_assert_eq!(decode(&format!(r#"{{"value":{n}}}"#)), Some(n));
            prop_assert_eq!(decode(&format!(r#"{{"value":" {n} "}}"#)), Some(n));
        }
    }
}
