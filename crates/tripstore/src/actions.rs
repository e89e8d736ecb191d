use formats::{TripData, VisitedSet};
use foundation::CountryId;

use crate::{TripStore, TripStoreError};

/// Why trip data could not be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripLoadError {
    /// Someone else's profile that is not public.
    PermissionDenied,
    Store(TripStoreError),
}

impl std::fmt::Display for TripLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripLoadError::PermissionDenied => write!(f, "this profile is private"),
            TripLoadError::Store(e) => write!(f, "failed to load trip data: {e}"),
        }
    }
}

impl std::error::Error for TripLoadError {}

/// Loads the trip data of `owner` as seen by `viewer`.
///
/// A profile with no stored data yields empty trip data. Private profiles
/// are only readable by their owner.
pub fn load_trip_data(
    store: &dyn TripStore,
    owner: &str,
    viewer: Option<&str>,
) -> Result<TripData, TripLoadError> {
    let profile = match store.load_profile(owner) {
        Ok(profile) => profile,
        Err(TripStoreError::NotFound) => return Ok(TripData::empty()),
        Err(TripStoreError::PermissionDenied) => return Err(TripLoadError::PermissionDenied),
        Err(e) => return Err(TripLoadError::Store(e)),
    };
    if !profile.public && viewer != Some(owner) {
        return Err(TripLoadError::PermissionDenied);
    }
    let data = profile.to_trip_data();
    tracing::debug!(
        owner,
        visited = data.visited.len(),
        lived = data.lived.len(),
        "loaded trip data"
    );
    Ok(data)
}

/// A write that failed after the local state was already updated. The local
/// change has been undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub country: CountryId,
    pub source: TripStoreError,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not update {}: {}", self.country, self.source)
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Flips membership of `id` locally, then persists it. On failure the local
/// set is restored.
///
/// Returns whether the country is visited afterwards.
pub fn toggle_visited(
    store: &mut dyn TripStore,
    uid: &str,
    visited: &mut VisitedSet,
    id: &CountryId,
) -> Result<bool, ActionError> {
    let now_visited = !visited.contains(id);
    if now_visited {
        visited.insert(id.clone());
    } else {
        visited.remove(id);
    }

    let result = if now_visited {
        store.add_visited(uid, id)
    } else {
        store.remove_visited(uid, id)
    };

    match result {
        Ok(()) => Ok(now_visited),
        Err(source) => {
            if now_visited {
                visited.remove(id);
            } else {
                visited.insert(id.clone());
            }
            tracing::warn!(country = %id, error = %source, "visited toggle reverted");
            Err(ActionError {
                country: id.clone(),
                source,
            })
        }
    }
}
