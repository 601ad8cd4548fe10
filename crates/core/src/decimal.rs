//! SQL decimal columns arrive as JSON numbers or as strings depending on the
//! driver. Use with `#[serde(default, deserialize_with = "lenient_decimal")]`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(f64),
    Text(String),
}

/// Accepts a number, a numeric string, `null` or an empty string.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDecimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDecimal::Number(n)) => Ok(Some(n)),
        Some(RawDecimal::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawDecimal::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{s}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_decimal")]
        value: Option<f64>,
    }

    fn value(json: &str) -> Option<f64> {
        serde_json::from_str::<Row>(json).unwrap().value
    }

    #[test]
    fn accepts_numbers_strings_and_blanks() {
        assert_eq!(value(r#"{"value": 12.5}"#), Some(12.5));
        assert_eq!(value(r#"{"value": "100.00"}"#), Some(100.0));
        assert_eq!(value(r#"{"value": " "}"#), None);
        assert_eq!(value(r#"{"value": null}"#), None);
        assert_eq!(value(r#"{}"#), None);
        assert!(serde_json::from_str::<Row>(r#"{"value": "n/a"}"#).is_err());
    }
}
