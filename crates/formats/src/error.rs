use std::path::PathBuf;

/// Failure while reading or decoding one of the input datasets.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        what: &'static str,
        source: serde_json::Error,
    },
    Malformed {
        what: &'static str,
        reason: String,
    },
    Empty {
        what: &'static str,
    },
}

impl LoadError {
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            what,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Json { what, source } => write!(f, "invalid {what} json: {source}"),
            LoadError::Malformed { what, reason } => write!(f, "malformed {what}: {reason}"),
            LoadError::Empty { what } => write!(f, "{what} is empty"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Falls back to an empty value for optional datasets, logging the failure.
pub fn or_degraded<T: Default>(what: &str, result: Result<T, LoadError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(dataset = what, error = %err, "optional data unavailable, using empty default");
            T::default()
        }
    }
}
