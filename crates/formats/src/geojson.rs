//! Plain GeoJSON FeatureCollections of country polygons.

use foundation::math::LonLat;
use scene::{CountryFeature, Polygon, WorldGeometry};
use serde::Deserialize;

use crate::error::LoadError;
use crate::topojson::raw_id;

const WHAT: &str = "geojson";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

pub fn world_from_geojson_str(text: &str) -> Result<WorldGeometry, LoadError> {
    let collection: FeatureCollection =
        serde_json::from_str(text).map_err(|source| LoadError::Json { what: WHAT, source })?;

    let mut features = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.iter().enumerate() {
        let polygons = match &feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![polygon(i, coordinates)?],
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .iter()
                .map(|rings| polygon(i, rings))
                .collect::<Result<Vec<_>, _>>()?,
            Some(Geometry::Unsupported) | None => continue,
        };
        features.push(CountryFeature::new(feature_id(feature), polygons));
    }
    Ok(WorldGeometry::new(features))
}

fn feature_id(feature: &Feature) -> Option<String> {
    raw_id(feature.id.as_ref()).or_else(|| {
        let props = feature.properties.as_ref()?;
        ["id", "iso_n3", "iso_a3"]
            .iter()
            .find_map(|key| raw_id(props.get(*key)))
    })
}

fn polygon(feature: usize, rings: &[Vec<Vec<f64>>]) -> Result<Polygon, LoadError> {
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let mut points = Vec::with_capacity(ring.len());
        for position in ring {
            match position.as_slice() {
                [lon, lat, ..] => points.push(LonLat::new(*lon, *lat)),
                _ => {
                    return Err(LoadError::malformed(
                        WHAT,
                        format!("feature {feature} has a position with fewer than two values"),
                    ));
                }
            }
        }
        out.push(points);
    }
    Ok(Polygon::new(out))
}

#[cfg(test)]
mod tests {
    use super::world_from_geojson_str;
    use foundation::CountryId;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":"eg","geometry":{"type":"Polygon",
                "coordinates":[[[25,22],[36,22],[36,31],[25,31],[25,22]]]}},
            {"type":"Feature","properties":{"iso_n3":"76"},"geometry":{"type":"MultiPolygon",
                "coordinates":[[[[-50,-10],[-40,-10],[-40,0],[-50,-10]]],[[[-60,-20],[-55,-20],[-55,-15],[-60,-20]]]]}},
            {"type":"Feature","id":"x","geometry":null},
            {"type":"Feature","id":"y","geometry":{"type":"Point","coordinates":[0,0]}}
        ]}"#;
        let world = world_from_geojson_str(text).unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(world.features()[0].id(), CountryId::normalize("EG"));
        assert_eq!(world.features()[1].id(), CountryId::normalize("076"));
        assert_eq!(world.features()[1].polygons.len(), 2);
    }

    #[test]
    fn short_position_is_malformed() {
        let text = r#"{"features":[{"geometry":{"type":"Polygon","coordinates":[[[1]]]}}]}"#;
        assert!(world_from_geojson_str(text).is_err());
    }
}
