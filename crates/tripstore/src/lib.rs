//! Persistence contract for per-user trip data.

use std::collections::{BTreeMap, BTreeSet};

use formats::{LivedRecordInput, TripData, VisitedSet, build_lived_index};
use foundation::CountryId;
use serde::{Deserialize, Serialize};

mod actions;

pub use actions::*;

/// Stored lived record with its insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLivedRecord {
    pub seq: u64,
    pub record: LivedRecordInput,
}

/// Everything stored for one user.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripProfile {
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub visited: BTreeSet<CountryId>,
    #[serde(default)]
    pub lived: BTreeMap<String, StoredLivedRecord>,
    #[serde(default)]
    pub next_seq: u64,
}

impl TripProfile {
    /// Lived records, most recently added first.
    pub fn lived_newest_first(&self) -> Vec<LivedRecordInput> {
        let mut stored: Vec<&StoredLivedRecord> = self.lived.values().collect();
        stored.sort_by(|a, b| b.seq.cmp(&a.seq));
        stored.into_iter().map(|s| s.record.clone()).collect()
    }

    pub fn to_trip_data(&self) -> TripData {
        TripData {
            visited: self.visited.iter().cloned().collect::<VisitedSet>(),
            lived: build_lived_index(&self.lived_newest_first()),
        }
    }

    fn insert_lived(&mut self, mut record: LivedRecordInput) -> LivedRecordInput {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = format!("lived-{seq}");
        record.id = Some(id.clone());
        self.lived.insert(
            id,
            StoredLivedRecord {
                seq,
                record: record.clone(),
            },
        );
        record
    }

    fn update_lived(&mut self, record_id: &str, mut record: LivedRecordInput) -> bool {
        let Some(stored) = self.lived.get_mut(record_id) else {
            return false;
        };
        record.id = Some(record_id.to_string());
        stored.record = record;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripStoreError {
    NotFound,
    /// The profile exists but is not visible to this viewer.
    PermissionDenied,
    StorageUnavailable,
    /// The write or read may succeed if retried.
    Transient(String),
    Corrupt(String),
}

impl std::fmt::Display for TripStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripStoreError::NotFound => write!(f, "trip data not found"),
            TripStoreError::PermissionDenied => write!(f, "profile is not public"),
            TripStoreError::StorageUnavailable => write!(f, "trip storage unavailable"),
            TripStoreError::Transient(msg) => write!(f, "trip storage temporarily failed: {msg}"),
            TripStoreError::Corrupt(msg) => write!(f, "trip storage corrupt: {msg}"),
        }
    }
}

impl std::error::Error for TripStoreError {}

pub trait TripStore {
    /// Full profile for `uid`, or `NotFound` when nothing was ever stored.
    fn load_profile(&self, uid: &str) -> Result<TripProfile, TripStoreError>;

    fn set_public(&mut self, uid: &str, public: bool) -> Result<(), TripStoreError>;

    fn add_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError>;
    fn remove_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError>;

    /// Stores a new record and returns it with its assigned id.
    fn add_lived(
        &mut self,
        uid: &str,
        record: LivedRecordInput,
    ) -> Result<LivedRecordInput, TripStoreError>;
    fn update_lived(
        &mut self,
        uid: &str,
        record_id: &str,
        record: LivedRecordInput,
    ) -> Result<(), TripStoreError>;
    fn delete_lived(&mut self, uid: &str, record_id: &str) -> Result<bool, TripStoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTripStore {
    profiles: BTreeMap<String, TripProfile>,
    offline: bool,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with a transient error.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), TripStoreError> {
        if self.offline {
            return Err(TripStoreError::Transient("store offline".to_string()));
        }
        Ok(())
    }

    fn profile_mut(&mut self, uid: &str) -> Result<&mut TripProfile, TripStoreError> {
        self.check_online()?;
        Ok(self.profiles.entry(uid.to_string()).or_default())
    }
}

impl TripStore for InMemoryTripStore {
    fn load_profile(&self, uid: &str) -> Result<TripProfile, TripStoreError> {
        self.check_online()?;
        self.profiles.get(uid).cloned().ok_or(TripStoreError::NotFound)
    }

    fn set_public(&mut self, uid: &str, public: bool) -> Result<(), TripStoreError> {
        self.profile_mut(uid)?.public = public;
        Ok(())
    }

    fn add_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError> {
        self.profile_mut(uid)?.visited.insert(id.clone());
        Ok(())
    }

    fn remove_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError> {
        self.profile_mut(uid)?.visited.remove(id);
        Ok(())
    }

    fn add_lived(
        &mut self,
        uid: &str,
        record: LivedRecordInput,
    ) -> Result<LivedRecordInput, TripStoreError> {
        Ok(self.profile_mut(uid)?.insert_lived(record))
    }

    fn update_lived(
        &mut self,
        uid: &str,
        record_id: &str,
        record: LivedRecordInput,
    ) -> Result<(), TripStoreError> {
        if self.profile_mut(uid)?.update_lived(record_id, record) {
            Ok(())
        } else {
            Err(TripStoreError::NotFound)
        }
    }

    fn delete_lived(&mut self, uid: &str, record_id: &str) -> Result<bool, TripStoreError> {
        Ok(self.profile_mut(uid)?.lived.remove(record_id).is_some())
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{TripProfile, TripStore, TripStoreError};
    use formats::LivedRecordInput;
    use foundation::CountryId;

    /// One JSON profile per user under `{prefix}.{uid}` in localStorage.
    #[derive(Debug)]
    pub struct LocalStorageTripStore {
        key_prefix: String,
    }

    impl LocalStorageTripStore {
        pub fn new(key: impl Into<String>) -> Result<Self, TripStoreError> {
            window_local_storage()?;
            Ok(Self {
                key_prefix: key.into(),
            })
        }

        fn profile_key(&self, uid: &str) -> String {
            format!("{}.{}", self.key_prefix, uid)
        }

        fn load(&self, uid: &str) -> Result<Option<TripProfile>, TripStoreError> {
            let storage = window_local_storage()?;
            let raw = storage
                .get_item(&self.profile_key(uid))
                .map_err(|e| TripStoreError::Transient(format!("get_item failed: {:?}", e)))?;
            let Some(raw) = raw else {
                return Ok(None);
            };
            if raw.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str::<TripProfile>(&raw)
                .map(Some)
                .map_err(|e| TripStoreError::Corrupt(e.to_string()))
        }

        fn save(&self, uid: &str, profile: &TripProfile) -> Result<(), TripStoreError> {
            let storage = window_local_storage()?;
            let raw =
                serde_json::to_string(profile).map_err(|e| TripStoreError::Corrupt(e.to_string()))?;
            storage
                .set_item(&self.profile_key(uid), &raw)
                .map_err(|e| TripStoreError::Transient(format!("set_item failed: {:?}", e)))
        }

        fn modify<T>(
            &self,
            uid: &str,
            f: impl FnOnce(&mut TripProfile) -> T,
        ) -> Result<T, TripStoreError> {
            let mut profile = self.load(uid)?.unwrap_or_default();
            let out = f(&mut profile);
            self.save(uid, &profile)?;
            Ok(out)
        }
    }

    impl TripStore for LocalStorageTripStore {
        fn load_profile(&self, uid: &str) -> Result<TripProfile, TripStoreError> {
            self.load(uid)?.ok_or(TripStoreError::NotFound)
        }

        fn set_public(&mut self, uid: &str, public: bool) -> Result<(), TripStoreError> {
            self.modify(uid, |p| p.public = public)
        }

        fn add_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError> {
            self.modify(uid, |p| {
                p.visited.insert(id.clone());
            })
        }

        fn remove_visited(&mut self, uid: &str, id: &CountryId) -> Result<(), TripStoreError> {
            self.modify(uid, |p| {
                p.visited.remove(id);
            })
        }

        fn add_lived(
            &mut self,
            uid: &str,
            record: LivedRecordInput,
        ) -> Result<LivedRecordInput, TripStoreError> {
            self.modify(uid, |p| p.insert_lived(record))
        }

        fn update_lived(
            &mut self,
            uid: &str,
            record_id: &str,
            record: LivedRecordInput,
        ) -> Result<(), TripStoreError> {
            if self.modify(uid, |p| p.update_lived(record_id, record))? {
                Ok(())
            } else {
                Err(TripStoreError::NotFound)
            }
        }

        fn delete_lived(&mut self, uid: &str, record_id: &str) -> Result<bool, TripStoreError> {
            self.modify(uid, |p| p.lived.remove(record_id).is_some())
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, TripStoreError> {
        let win = web_sys::window().ok_or(TripStoreError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| TripStoreError::Transient(format!("localStorage error: {:?}", e)))?
            .ok_or(TripStoreError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStorageTripStore;

#[cfg(test)]
mod tests {
    use super::{InMemoryTripStore, TripStore, TripStoreError};
    use formats::LivedRecordInput;
    use foundation::CountryId;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> CountryId {
        CountryId::normalize(s).unwrap()
    }

    fn lived(code: &str, period: &str) -> LivedRecordInput {
        LivedRecordInput {
            country_code: code.into(),
            period: period.into(),
            ..LivedRecordInput::default()
        }
    }

    #[test]
    fn unknown_user_is_not_found() {
        let store = InMemoryTripStore::new();
        assert_eq!(store.load_profile("nobody"), Err(TripStoreError::NotFound));
    }

    #[test]
    fn visited_add_and_remove() {
        let mut store = InMemoryTripStore::new();
        store.add_visited("u1", &id("4")).unwrap();
        store.add_visited("u1", &id("076")).unwrap();
        store.remove_visited("u1", &id("004")).unwrap();
        let data = store.load_profile("u1").unwrap().to_trip_data();
        assert_eq!(data.visited.iter().cloned().collect::<Vec<_>>(), vec![id("076")]);
    }

    #[test]
    fn lived_records_are_newest_first_and_editable() {
        let mut store = InMemoryTripStore::new();
        let first = store.add_lived("u1", lived("EG", "2019")).unwrap();
        let second = store.add_lived("u1", lived("eg", "2020")).unwrap();
        assert_ne!(first.id, second.id);

        let records = store.load_profile("u1").unwrap().lived_newest_first();
        assert_eq!(records[0].period, "2020");

        let first_id = first.id.clone().unwrap();
        store.update_lived("u1", &first_id, lived("EG", "2018")).unwrap();
        assert_eq!(
            store.update_lived("u1", "missing", lived("EG", "")),
            Err(TripStoreError::NotFound)
        );

        let data = store.load_profile("u1").unwrap().to_trip_data();
        let periods: Vec<&str> = data.lived.records(&id("EG")).iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2020", "2018"]);

        assert!(store.delete_lived("u1", &first_id).unwrap());
        assert!(!store.delete_lived("u1", &first_id).unwrap());
    }

    #[test]
    fn offline_store_fails_transiently() {
        let mut store = InMemoryTripStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.add_visited("u1", &id("004")),
            Err(TripStoreError::Transient(_))
        ));
    }

    #[test]
    fn profile_serializes_for_storage() {
        let mut store = InMemoryTripStore::new();
        store.add_visited("u1", &id("eg")).unwrap();
        store.add_lived("u1", lived("076", "2019")).unwrap();
        let profile = store.load_profile("u1").unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let back: super::TripProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
