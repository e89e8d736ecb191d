//! Per-country derived state and the fill policy.

use foundation::CountryId;
use formats::{FactTable, LivedIndex, LivedRecord, NameTable, TripData, VisitedSet};
use scene::CountryFeature;

use crate::symbology::{FillPalette, Rgb, base_color};
use crate::view_mode::ViewMode;

/// Display data for one geometry feature, built once at mount.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub raw_id: Option<String>,
    pub id: Option<CountryId>,
    pub name: String,
    pub fact: Option<String>,
    pub base_color: Rgb,
}

impl CountryRecord {
    /// Name comes from the name table, then the fact table, then a
    /// `"Country {id}"` fallback so every feature has a label.
    pub fn build(feature: &CountryFeature, names: &NameTable, facts: &FactTable) -> Self {
        let id = feature.id();
        let fact_entry = id.as_ref().and_then(|id| facts.get(id));

        let name = id
            .as_ref()
            .and_then(|id| names.get(id))
            .map(str::to_string)
            .or_else(|| fact_entry.and_then(|f| f.name.clone()))
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| match (&id, &feature.raw_id) {
                (Some(id), _) => format!("Country {id}"),
                (None, Some(raw)) if !raw.trim().is_empty() => format!("Country {}", raw.trim()),
                _ => "Unknown country".to_string(),
            });

        let fact = fact_entry
            .and_then(|f| f.fact.clone())
            .filter(|f| !f.trim().is_empty());

        let color_key = feature.raw_id.as_deref().unwrap_or_default();
        Self {
            raw_id: feature.raw_id.clone(),
            base_color: base_color(id.as_ref().map(CountryId::as_str).unwrap_or(color_key)),
            id,
            name,
            fact,
        }
    }

    /// Only countries with a normalized id respond to clicks.
    pub fn is_clickable(&self) -> bool {
        self.id.is_some()
    }
}

/// Fill for a country given the active view and its membership.
pub fn resolve_fill(
    view: ViewMode,
    visited: bool,
    lived: bool,
    base: Rgb,
    palette: &FillPalette,
) -> Rgb {
    match view {
        ViewMode::Explorer => base,
        ViewMode::Visited if visited => base,
        ViewMode::Visited => palette.unvisited,
        ViewMode::Lived if lived => palette.lived_highlight,
        ViewMode::Lived => palette.unvisited,
    }
}

/// All country records plus the trip data they are coloured by.
#[derive(Debug, Clone, Default)]
pub struct CountryRenderState {
    records: Vec<CountryRecord>,
    trips: TripData,
}

impl CountryRenderState {
    pub fn new(records: Vec<CountryRecord>, trips: TripData) -> Self {
        Self { records, trips }
    }

    pub fn build<'a>(
        features: impl IntoIterator<Item = &'a CountryFeature>,
        names: &NameTable,
        facts: &FactTable,
        trips: TripData,
    ) -> Self {
        let records = features
            .into_iter()
            .map(|f| CountryRecord::build(f, names, facts))
            .collect();
        Self::new(records, trips)
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&CountryRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index_of(&self, id: &CountryId) -> impl Iterator<Item = usize> + '_ {
        let id = id.clone();
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.id.as_ref() == Some(&id))
            .map(|(i, _)| i)
    }

    pub fn trips(&self) -> &TripData {
        &self.trips
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.trips.visited
    }

    pub fn lived(&self) -> &LivedIndex {
        &self.trips.lived
    }

    /// Replaces trip data; records and geometry are untouched.
    pub fn set_trips(&mut self, trips: TripData) {
        self.trips = trips;
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.id_at(index).is_some_and(|id| self.trips.visited.contains(id))
    }

    pub fn is_lived(&self, index: usize) -> bool {
        self.id_at(index).is_some_and(|id| self.trips.lived.contains(id))
    }

    pub fn lived_records(&self, index: usize) -> &[LivedRecord] {
        match self.id_at(index) {
            Some(id) => self.trips.lived.records(id),
            None => &[],
        }
    }

    pub fn fill(&self, index: usize, view: ViewMode, palette: &FillPalette) -> Option<Rgb> {
        let record = self.records.get(index)?;
        Some(resolve_fill(
            view,
            self.is_visited(index),
            self.is_lived(index),
            record.base_color,
            palette,
        ))
    }

    fn id_at(&self, index: usize) -> Option<&CountryId> {
        self.records.get(index).and_then(|r| r.id.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryRecord, CountryRenderState, resolve_fill};
    use crate::symbology::{FillPalette, Rgb, base_color};
    use crate::view_mode::ViewMode;
    use formats::{FactTable, NameTable, TripData, VisitedSet};
    use foundation::CountryId;
    use scene::CountryFeature;

    const BASE: Rgb = Rgb::new(1, 2, 3);

    fn id(s: &str) -> CountryId {
        CountryId::normalize(s).unwrap()
    }

    #[test]
    fn fill_table() {
        let p = FillPalette::default();
        assert_eq!(resolve_fill(ViewMode::Explorer, false, false, BASE, &p), BASE);
        assert_eq!(resolve_fill(ViewMode::Explorer, true, true, BASE, &p), BASE);
        assert_eq!(resolve_fill(ViewMode::Visited, true, false, BASE, &p), BASE);
        assert_eq!(resolve_fill(ViewMode::Visited, false, true, BASE, &p), p.unvisited);
        assert_eq!(resolve_fill(ViewMode::Lived, false, true, BASE, &p), p.lived_highlight);
        assert_eq!(resolve_fill(ViewMode::Lived, true, false, BASE, &p), p.unvisited);
        assert_eq!(p.unvisited.to_hex(), "#3f4453");
        assert_eq!(p.lived_highlight.to_hex(), "#ffb703");
    }

    #[test]
    fn names_fall_back_in_order() {
        let names = NameTable::from_tsv("name\tiso_n3\nAfghanistan\t004\n").unwrap();
        let facts = FactTable::from_json_str(
            r#"{"076": {"name": "Brazil", "fact": "Big"}, "004": {"name": "Ignored"}}"#,
        )
        .unwrap();

        let named = CountryRecord::build(&CountryFeature::new(Some("4".into()), vec![]), &names, &facts);
        assert_eq!(named.name, "Afghanistan");
        assert_eq!(named.fact, None);

        let from_fact = CountryRecord::build(&CountryFeature::new(Some("76".into()), vec![]), &names, &facts);
        assert_eq!(from_fact.name, "Brazil");
        assert_eq!(from_fact.fact.as_deref(), Some("Big"));

        let unknown = CountryRecord::build(&CountryFeature::new(Some("999".into()), vec![]), &names, &facts);
        assert_eq!(unknown.name, "Country 999");
        assert_eq!(unknown.base_color, base_color("999"));

        let anonymous = CountryRecord::build(&CountryFeature::new(None, vec![]), &names, &facts);
        assert_eq!(anonymous.name, "Unknown country");
        assert!(!anonymous.is_clickable());
    }

    #[test]
    fn membership_drives_fill() {
        let features = vec![
            CountryFeature::new(Some("004".into()), vec![]),
            CountryFeature::new(Some("076".into()), vec![]),
            CountryFeature::new(Some("250".into()), vec![]),
        ];
        let visited: VisitedSet = [id("004"), id("076")].into_iter().collect();
        let trips = TripData {
            visited,
            ..TripData::default()
        };
        let state = CountryRenderState::build(&features, &NameTable::default(), &FactTable::default(), trips);
        let p = FillPalette::default();

        assert_eq!(state.fill(0, ViewMode::Visited, &p), Some(base_color("004")));
        assert_eq!(state.fill(1, ViewMode::Visited, &p), Some(base_color("076")));
        assert_eq!(state.fill(2, ViewMode::Visited, &p), Some(p.unvisited));
        assert_eq!(state.fill(2, ViewMode::Lived, &p), Some(p.unvisited));
        assert_eq!(state.fill(9, ViewMode::Lived, &p), None);
        assert_eq!(state.index_of(&id("076")).collect::<Vec<_>>(), vec![1]);
    }
}
