use std::collections::BTreeMap;
use std::path::Path;

use foundation::CountryId;
use serde::Deserialize;

use crate::error::LoadError;

const WHAT: &str = "facts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryFact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fact: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFact {
    Text(String),
    Entry(CountryFact),
}

/// Facts keyed by normalized country id. Keys that do not normalize are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactTable {
    by_id: BTreeMap<CountryId, CountryFact>,
}

impl FactTable {
    pub fn get(&self, id: &CountryId) -> Option<&CountryFact> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn insert(&mut self, id: CountryId, fact: CountryFact) {
        self.by_id.insert(id, fact);
    }

    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let raw: BTreeMap<String, Option<RawFact>> =
            serde_json::from_str(text).map_err(|source| LoadError::Json { what: WHAT, source })?;

        let mut table = FactTable::default();
        for (key, value) in raw {
            let Some(id) = CountryId::normalize(&key) else {
                continue;
            };
            let fact = match value {
                Some(RawFact::Text(text)) => CountryFact {
                    name: None,
                    fact: Some(text),
                },
                Some(RawFact::Entry(entry)) => entry,
                None => continue,
            };
            table.by_id.insert(id, fact);
        }
        Ok(table)
    }
}

pub fn load_facts(path: impl AsRef<Path>) -> Result<FactTable, LoadError> {
    FactTable::from_json_str(&crate::read_text(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::{CountryFact, FactTable};
    use foundation::CountryId;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_are_normalized() {
        let table = FactTable::from_json_str(
            r#"{"4": {"name": "Afghanistan", "fact": "Landlocked"},
                "eg": "Home of the pyramids",
                "  ": {"fact": "dropped"},
                "076": null}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&CountryId::normalize("004").unwrap()),
            Some(&CountryFact {
                name: Some("Afghanistan".into()),
                fact: Some("Landlocked".into()),
            })
        );
        let eg = table.get(&CountryId::normalize("EG").unwrap()).unwrap();
        assert_eq!(eg.fact.as_deref(), Some("Home of the pyramids"));
        assert_eq!(eg.name, None);
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(FactTable::from_json_str("[1, 2]").is_err());
    }
}
