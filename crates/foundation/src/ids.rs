use serde::{Deserialize, Serialize};

/// Normalized country identifier.
///
/// Every identifier source (geometry ids, name-table codes, fact keys, trip
/// records) goes through [`CountryId::normalize`] so that cross-referencing
/// never fails on formatting differences:
/// - surrounding whitespace is trimmed
/// - all-digit input is zero-padded to three digits (`"4"` -> `"004"`)
/// - anything else is upper-cased (`"eg"` -> `"EG"`)
/// - empty input has no id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryId(String);

impl CountryId {
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Longer numeric codes keep their last three digits.
            let padded = format!("000{trimmed}");
            let tail = &padded[padded.len() - 3..];
            return Some(Self(tail.to_string()));
        }
        Some(Self(trimmed.to_uppercase()))
    }

    /// Normalizes an optional raw value; `None` stays `None`.
    pub fn normalize_opt(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::normalize)
    }

    /// Normalizes a JSON scalar the way loose upstream data encodes ids
    /// (strings or bare numbers).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::normalize(s),
            serde_json::Value::Number(n) => Self::normalize(&n.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CountryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or_else(|| format!("empty country id: {value:?}"))
    }
}

impl From<CountryId> for String {
    fn from(id: CountryId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::CountryId;
    use proptest::prelude::*;

    fn norm(s: &str) -> Option<String> {
        CountryId::normalize(s).map(|id| id.as_str().to_string())
    }

    #[test]
    fn pads_numeric_codes() {
        assert_eq!(norm("4").as_deref(), Some("004"));
        assert_eq!(norm("76").as_deref(), Some("076"));
        assert_eq!(norm("840").as_deref(), Some("840"));
        assert_eq!(norm(" 4 ").as_deref(), Some("004"));
    }

    #[test]
    fn uppercases_alpha_codes() {
        assert_eq!(norm("eg").as_deref(), Some("EG"));
        assert_eq!(norm("fra").as_deref(), Some("FRA"));
    }

    #[test]
    fn empty_has_no_id() {
        assert_eq!(norm(""), None);
        assert_eq!(norm("   "), None);
        assert_eq!(CountryId::normalize_opt(None), None);
    }

    #[test]
    fn json_numbers_and_strings() {
        let n = serde_json::json!(4);
        let s = serde_json::json!("076");
        assert_eq!(CountryId::from_json(&n).unwrap().as_str(), "004");
        assert_eq!(CountryId::from_json(&s).unwrap().as_str(), "076");
        assert_eq!(CountryId::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn serde_normalizes_on_read() {
        let id: CountryId = serde_json::from_str("\"eg\"").unwrap();
        assert_eq!(id.as_str(), "EG");
        assert!(serde_json::from_str::<CountryId>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in ".{0,8}") {
            let once = CountryId::normalize(&raw);
            let twice = once.as_ref().and_then(|id| CountryId::normalize(id.as_str()));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn numeric_ids_are_three_digits(n in 0u32..1000) {
            let id = CountryId::normalize(&n.to_string()).unwrap();
            prop_assert_eq!(id.as_str().len(), 3);
            prop_assert_eq!(id.as_str().parse::<u32>().unwrap(), n);
        }
    }
}
