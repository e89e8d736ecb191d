use formats::LoadError;

#[derive(Debug)]
pub enum GlobeError {
    AlreadyMounted,
    NotMounted,
    /// Mandatory data (world geometry or names) is missing or unusable.
    FatalLoad {
        what: &'static str,
        source: Option<LoadError>,
    },
    InvalidConfig(String),
}

impl GlobeError {
    pub fn fatal(what: &'static str) -> Self {
        GlobeError::FatalLoad { what, source: None }
    }
}

impl From<LoadError> for GlobeError {
    fn from(e: LoadError) -> Self {
        let what = match &e {
            LoadError::Json { what, .. }
            | LoadError::Malformed { what, .. }
            | LoadError::Empty { what } => *what,
            LoadError::Io { .. } => "input",
        };
        GlobeError::FatalLoad {
            what,
            source: Some(e),
        }
    }
}

impl std::fmt::Display for GlobeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobeError::AlreadyMounted => write!(f, "globe is already mounted"),
            GlobeError::NotMounted => write!(f, "globe is not mounted"),
            GlobeError::FatalLoad {
                what,
                source: Some(e),
            } => write!(f, "cannot render globe without {what}: {e}"),
            GlobeError::FatalLoad { what, source: None } => {
                write!(f, "cannot render globe without {what}")
            }
            GlobeError::InvalidConfig(msg) => write!(f, "invalid globe config: {msg}"),
        }
    }
}

impl std::error::Error for GlobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlobeError::FatalLoad {
                source: Some(e), ..
            } => Some(e),
            _ => None,
        }
    }
}
