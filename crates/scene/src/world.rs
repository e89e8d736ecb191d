use foundation::CountryId;
use foundation::math::LonLat;

/// Closed ring of geographic positions. A trailing duplicate of the first
/// point is allowed and ignored by the projector.
pub type Ring = Vec<LonLat>;

/// Polygon with the exterior ring first and holes after it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

/// One country shape as delivered by the geometry source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryFeature {
    /// Identifier exactly as the source spelled it (numeric or alpha).
    pub raw_id: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl CountryFeature {
    pub fn new(raw_id: Option<String>, polygons: Vec<Polygon>) -> Self {
        Self { raw_id, polygons }
    }

    pub fn id(&self) -> Option<CountryId> {
        CountryId::normalize_opt(self.raw_id.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(|p| p.vertex_count() == 0)
    }
}

/// Immutable set of country shapes, loaded once per page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldGeometry {
    features: Vec<CountryFeature>,
}

impl WorldGeometry {
    pub fn new(features: Vec<CountryFeature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn find(&self, id: &CountryId) -> Option<&CountryFeature> {
        self.features.iter().find(|f| f.id().as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::{CountryFeature, Polygon, WorldGeometry};
    use foundation::CountryId;
    use foundation::math::LonLat;

    fn square(lon: f64, lat: f64) -> Polygon {
        Polygon::new(vec![vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + 1.0, lat),
            LonLat::new(lon + 1.0, lat + 1.0),
            LonLat::new(lon, lat + 1.0),
            LonLat::new(lon, lat),
        ]])
    }

    #[test]
    fn finds_features_by_normalized_id() {
        let world = WorldGeometry::new(vec![
            CountryFeature::new(Some("4".into()), vec![square(65.0, 33.0)]),
            CountryFeature::new(None, vec![square(0.0, 0.0)]),
        ]);
        let afg = CountryId::normalize("004").unwrap();
        assert!(world.find(&afg).is_some());
        assert_eq!(world.features()[1].id(), None);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn empty_feature_detection() {
        assert!(CountryFeature::new(Some("1".into()), Vec::new()).is_empty());
        assert!(!CountryFeature::new(None, vec![square(1.0, 1.0)]).is_empty());
    }
}
