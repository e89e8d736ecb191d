use serde::{Deserialize, Serialize};

/// Which colouring and tooltip policy is active. Exactly one at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Explorer,
    Visited,
    Lived,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Explorer, ViewMode::Visited, ViewMode::Lived];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Explorer => "explorer",
            ViewMode::Visited => "visited",
            ViewMode::Lived => "lived",
        }
    }

    /// Case-insensitive name; `None` for anything unknown.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
    }

    /// View named by a URL fragment such as `#lived`. Missing or unknown
    /// fragments select the explorer view.
    pub fn from_hash(hash: &str) -> Self {
        let name = hash.strip_prefix('#').unwrap_or(hash);
        Self::parse(name).unwrap_or_default()
    }

    pub fn to_hash(self) -> String {
        format!("#{}", self.as_str())
    }

    /// Heading shown above the globe.
    pub fn label(self, own_profile: bool) -> &'static str {
        match self {
            ViewMode::Explorer => "Country explorer",
            ViewMode::Visited => "Visited countries",
            ViewMode::Lived if own_profile => "Places I've lived",
            ViewMode::Lived => "Places lived",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
