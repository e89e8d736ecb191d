//! Country name table (`country-names.tsv`).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use foundation::CountryId;
use serde::Serialize;

use crate::error::LoadError;

const WHAT: &str = "name table";

/// Code columns that all map to the row's name.
pub const CODE_COLUMNS: [&str; 4] = ["iso_n3", "iso_a3", "adm0_a3", "sov_a3"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryListEntry {
    pub name: String,
    pub code: CountryId,
}

/// Names keyed by every normalized code, plus a picker-friendly list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    by_id: BTreeMap<CountryId, String>,
    countries: Vec<CountryListEntry>,
}

impl NameTable {
    pub fn get(&self, id: &CountryId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Unique names sorted alphabetically, each with its numeric code.
    pub fn countries(&self) -> &[CountryListEntry] {
        &self.countries
    }

    /// Case-insensitive lookup in the country list.
    pub fn find_by_name(&self, name: &str) -> Option<&CountryListEntry> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.countries
            .iter()
            .find(|entry| entry.name.to_lowercase() == needle)
    }

    /// Parses tab-separated text with a header row.
    ///
    /// Later rows overwrite earlier ones for a shared code. Rows without a
    /// usable name or numeric code are left out of the country list.
    pub fn from_tsv(text: &str) -> Result<Self, LoadError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header: Vec<&str> = lines
            .next()
            .ok_or(LoadError::Empty { what: WHAT })?
            .split('\t')
            .map(str::trim)
            .collect();

        let column = |name: &str| header.iter().position(|h| *h == name);
        let name_col = column("name")
            .ok_or_else(|| LoadError::malformed(WHAT, "missing `name` column"))?;
        let code_cols: Vec<usize> = CODE_COLUMNS.iter().filter_map(|c| column(c)).collect();
        let n3_col = column("iso_n3");

        let mut table = NameTable::default();
        let mut seen = HashSet::new();
        for line in lines {
            let cells: Vec<&str> = line.split('\t').map(unquote).collect();
            let name = cells.get(name_col).copied().unwrap_or_default();

            for &col in &code_cols {
                if let Some(id) = CountryId::normalize_opt(cells.get(col).copied()) {
                    table.by_id.insert(id, name.to_string());
                }
            }

            let code = n3_col.and_then(|c| CountryId::normalize_opt(cells.get(c).copied()));
            if let Some(code) = code {
                if !name.is_empty() && seen.insert(name.to_string()) {
                    table.countries.push(CountryListEntry {
                        name: name.to_string(),
                        code,
                    });
                }
            }
        }

        if table.is_empty() {
            return Err(LoadError::Empty { what: WHAT });
        }
        table
            .countries
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.name.cmp(&b.name)));
        tracing::info!(codes = table.len(), countries = table.countries.len(), "loaded name table");
        Ok(table)
    }
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
        .trim()
}

pub fn load_names(path: impl AsRef<Path>) -> Result<NameTable, LoadError> {
    NameTable::from_tsv(&crate::read_text(path.as_ref())?)
}
