//! Visited/lived trip data and its JSON forms.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use foundation::CountryId;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::timeline::compute_timeline;

/// Countries the user has visited. Membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitedSet(BTreeSet<CountryId>);

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &CountryId) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: CountryId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: &CountryId) -> bool {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryId> {
        self.0.iter()
    }
}

impl FromIterator<CountryId> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = CountryId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A lived-in record as it is stored and edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivedRecordInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "de_cities")]
    pub cities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "yearRange")]
    pub period: String,
}

impl LivedRecordInput {
    /// Country id from the code, falling back to the free-text country.
    pub fn country_id(&self) -> Option<CountryId> {
        CountryId::normalize(&self.country_code).or_else(|| CountryId::normalize(&self.country))
    }
}

fn de_cities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| normalize_cities(&v)).unwrap_or_default())
}

/// Cities from an array or a comma-separated string; blanks are dropped.
pub fn normalize_cities(value: &serde_json::Value) -> Vec<String> {
    let clean = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => clean(s),
                serde_json::Value::Number(n) => clean(&n.to_string()),
                _ => None,
            })
            .collect(),
        serde_json::Value::String(s) => s.split(',').filter_map(clean).collect(),
        _ => Vec::new(),
    }
}

/// Display-ready lived entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LivedRecord {
    pub description: String,
    pub cities: Vec<String>,
    pub primary_city: String,
    pub country: String,
    pub period: String,
    pub timeline: String,
    pub duration_days: u32,
}

impl LivedRecord {
    pub fn from_input(input: &LivedRecordInput) -> Self {
        let period = input.period.trim().to_string();
        let timeline = compute_timeline(&period);
        Self {
            description: input.description.trim().to_string(),
            primary_city: input.cities.first().cloned().unwrap_or_default(),
            cities: input.cities.clone(),
            country: input.country.trim().to_string(),
            period,
            timeline: timeline.text,
            duration_days: timeline.duration_days,
        }
    }
}

/// Lived records grouped by country, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LivedIndex(BTreeMap<CountryId, Vec<LivedRecord>>);

impl LivedIndex {
    pub fn contains(&self, id: &CountryId) -> bool {
        self.0.contains_key(id)
    }

    pub fn records(&self, id: &CountryId) -> &[LivedRecord] {
        self.0.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn push(&mut self, id: CountryId, record: LivedRecord) {
        self.0.entry(id).or_default().push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryId> {
        self.0.keys()
    }
}

/// Per-user data the globe highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripData {
    pub visited: VisitedSet,
    pub lived: LivedIndex,
}

impl TripData {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Visited ids from loose values (strings or numbers); unusable entries are
/// skipped.
pub fn build_visited_set<'a, I>(raw: I) -> VisitedSet
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    raw.into_iter().filter_map(CountryId::from_json).collect()
}

/// Groups records by country; records without a usable id are skipped.
pub fn build_lived_index<'a, I>(records: I) -> LivedIndex
where
    I: IntoIterator<Item = &'a LivedRecordInput>,
{
    let mut index = LivedIndex::default();
    for input in records {
        if let Some(id) = input.country_id() {
            index.push(id, LivedRecord::from_input(input));
        }
    }
    index
}

#[derive(Debug, Default, Deserialize)]
struct TripDocument {
    #[serde(default)]
    visited: Vec<serde_json::Value>,
    #[serde(default)]
    records: Vec<Option<LivedRecordInput>>,
}

const WHAT: &str = "trip data";

/// Parses `{"visited": [...], "records": [...]}`; either key may be absent.
pub fn trip_data_from_json_str(text: &str) -> Result<TripData, LoadError> {
    let doc: TripDocument =
        serde_json::from_str(text).map_err(|source| LoadError::Json { what: WHAT, source })?;
    Ok(TripData {
        visited: build_visited_set(&doc.visited),
        lived: build_lived_index(doc.records.iter().flatten()),
    })
}

pub fn load_trip_data(path: impl AsRef<Path>) -> Result<TripData, LoadError> {
    trip_data_from_json_str(&crate::read_text(path.as_ref())?)
}
