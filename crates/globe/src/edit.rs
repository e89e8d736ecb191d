//! Click-to-edit: toggling a country's visited state from the globe.

use foundation::CountryId;
use tripstore::{ActionError, TripStore, toggle_visited};

use crate::view::GlobeView;

/// Flips `id` in the visited set, persists it and refreshes the globe.
///
/// On success the country fades to its new fill and flashes the added or
/// removed colour. On failure the globe is left as it was.
pub fn toggle_visited_on_click(
    globe: &mut GlobeView,
    store: &mut dyn TripStore,
    uid: &str,
    id: &CountryId,
    now_ms: f64,
) -> Result<bool, ActionError> {
    let mut trips = globe.trips().cloned().unwrap_or_default();
    let now_visited = toggle_visited(store, uid, &mut trips.visited, id)?;

    // Not mounted is fine: the store was still updated.
    let _ = globe.update_trip_data(trips, now_ms);
    let color = if now_visited {
        globe.config().flash_added
    } else {
        globe.config().flash_removed
    };
    globe.flash_country(id, Some(color), now_ms);
    tracing::debug!(country = %id, visited = now_visited, "toggled visited");
    Ok(now_visited)
}

#[cfg(test)]
mod tests {
    use super::toggle_visited_on_click;
    use crate::view::tests::mounted;
    use formats::TripData;
    use foundation::CountryId;
    use layers::{FillPalette, ViewMode, base_color};
    use tripstore::{InMemoryTripStore, TripStore};

    #[test]
    fn toggling_persists_and_recolours() {
        let mut globe = mounted(ViewMode::Visited, TripData::default());
        let mut store = InMemoryTripStore::new();
        let id = CountryId::normalize("250").unwrap();

        assert!(toggle_visited_on_click(&mut globe, &mut store, "u1", &id, 0.0).unwrap());
        assert!(store.load_profile("u1").unwrap().visited.contains(&id));
        assert_eq!(globe.style_of(&id).unwrap().fill.to_hex(), "#4ade80");
        globe.animate(1_000.0);
        assert_eq!(globe.style_of(&id).unwrap().fill, base_color("250"));

        assert!(!toggle_visited_on_click(&mut globe, &mut store, "u1", &id, 2_000.0).unwrap());
        assert_eq!(globe.style_of(&id).unwrap().fill.to_hex(), "#ff6b6b");
        globe.animate(3_000.0);
        assert_eq!(globe.style_of(&id).unwrap().fill, FillPalette::default().unvisited);
    }

    #[test]
    fn failed_write_leaves_globe_untouched() {
        let mut globe = mounted(ViewMode::Visited, TripData::default());
        let mut store = InMemoryTripStore::new();
        store.set_offline(true);
        let id = CountryId::normalize("250").unwrap();

        let err = toggle_visited_on_click(&mut globe, &mut store, "u1", &id, 0.0).unwrap_err();
        assert_eq!(err.country, id);
        assert!(!globe.trips().unwrap().visited.contains(&id));
        assert_eq!(globe.style_of(&id).unwrap().fill, FillPalette::default().unvisited);
    }
}
