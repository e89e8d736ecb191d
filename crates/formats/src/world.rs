use std::path::Path;

use scene::WorldGeometry;

use crate::error::LoadError;
use crate::geojson::world_from_geojson_str;
use crate::topojson::Topology;

const WHAT: &str = "world geometry";

/// Decodes world geometry from TopoJSON or GeoJSON text.
///
/// Geometry is mandatory: unreadable input or a world without any feature
/// is an error rather than an empty default.
pub fn world_from_str(text: &str) -> Result<WorldGeometry, LoadError> {
    let probe: serde_json::Value =
        serde_json::from_str(text).map_err(|source| LoadError::Json { what: WHAT, source })?;
    let kind = probe.get("type").and_then(|t| t.as_str()).unwrap_or_default();

    let world = match kind {
        "Topology" => Topology::from_json_str(text)?.to_world()?,
        "FeatureCollection" => world_from_geojson_str(text)?,
        other => {
            return Err(LoadError::malformed(
                WHAT,
                format!("unsupported document type {other:?}"),
            ));
        }
    };

    if world.is_empty() {
        return Err(LoadError::Empty { what: WHAT });
    }
    tracing::info!(features = world.len(), "loaded world geometry");
    Ok(world)
}

pub fn load_world(path: impl AsRef<Path>) -> Result<WorldGeometry, LoadError> {
    world_from_str(&crate::read_text(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::{load_world, world_from_str};
    use crate::error::LoadError;

    #[test]
    fn empty_collection_is_fatal() {
        let err = world_from_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn unknown_document_is_malformed() {
        assert!(matches!(
            world_from_str(r#"{"type":"Feature"}"#),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(world_from_str("not json"), Err(LoadError::Json { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        std::fs::write(
            &path,
            r#"{"type":"Topology","objects":{"countries":{"type":"GeometryCollection","geometries":[
                {"type":"Polygon","id":"4","arcs":[[0]]}]}},
               "arcs":[[[60,30],[70,30],[70,38],[60,30]]]}"#,
        )
        .unwrap();
        let world = load_world(&path).unwrap();
        assert_eq!(world.len(), 1);

        let missing = load_world(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }
}
