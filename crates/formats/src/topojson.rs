//! TopoJSON topology decoding (quantized, delta-encoded arcs).

use std::collections::BTreeMap;

use foundation::math::LonLat;
use scene::{CountryFeature, Polygon, Ring, WorldGeometry};
use serde::Deserialize;

use crate::error::LoadError;

const WHAT: &str = "topology";

#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Copy, Clone, Deserialize, PartialEq)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<serde_json::Value>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<serde_json::Value>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Unsupported,
}

/// Preferred object name in world-atlas files.
pub const COUNTRIES_OBJECT: &str = "countries";

impl Topology {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|source| LoadError::Json { what: WHAT, source })
    }

    /// Absolute positions for every arc.
    pub fn decoded_arcs(&self) -> Result<Vec<Vec<LonLat>>, LoadError> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(i, arc)| self.decode_arc(i, arc))
            .collect()
    }

    fn decode_arc(&self, index: usize, arc: &[Vec<f64>]) -> Result<Vec<LonLat>, LoadError> {
        let mut out = Vec::with_capacity(arc.len());
        let (mut x, mut y) = (0.0, 0.0);
        for position in arc {
            let [px, py] = match position.as_slice() {
                [px, py, ..] => [*px, *py],
                _ => {
                    return Err(LoadError::malformed(
                        WHAT,
                        format!("arc {index} has a position with fewer than two values"),
                    ));
                }
            };
            let p = match self.transform {
                Some(t) => {
                    x += px;
                    y += py;
                    LonLat::new(x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1])
                }
                None => LonLat::new(px, py),
            };
            out.push(p);
        }
        Ok(out)
    }

    /// Country features from the `countries` object, or the first object
    /// when that name is absent.
    pub fn to_world(&self) -> Result<WorldGeometry, LoadError> {
        let object = self
            .objects
            .get(COUNTRIES_OBJECT)
            .or_else(|| self.objects.values().next())
            .ok_or(LoadError::Empty { what: WHAT })?;

        let arcs = self.decoded_arcs()?;
        let mut features = Vec::new();
        collect_features(object, &arcs, &mut features)?;
        Ok(WorldGeometry::new(features))
    }
}

fn collect_features(
    geometry: &TopoGeometry,
    arcs: &[Vec<LonLat>],
    out: &mut Vec<CountryFeature>,
) -> Result<(), LoadError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_features(g, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { id, arcs: rings } => {
            let polygon = stitch_polygon(rings, arcs)?;
            out.push(CountryFeature::new(raw_id(id.as_ref()), vec![polygon]));
        }
        TopoGeometry::MultiPolygon { id, arcs: polygons } => {
            let polygons = polygons
                .iter()
                .map(|rings| stitch_polygon(rings, arcs))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(CountryFeature::new(raw_id(id.as_ref()), polygons));
        }
        TopoGeometry::Unsupported => {}
    }
    Ok(())
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<LonLat>]) -> Result<Polygon, LoadError> {
    rings
        .iter()
        .map(|ring| stitch_ring(ring, arcs))
        .collect::<Result<Vec<_>, _>>()
        .map(Polygon::new)
}

/// Joins arcs into one ring. A negative index `!i` walks arc `i` backwards;
/// the shared endpoint between consecutive arcs is kept once.
pub fn stitch_ring(indices: &[i64], arcs: &[Vec<LonLat>]) -> Result<Ring, LoadError> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| LoadError::malformed(WHAT, format!("arc index {index} out of range")))?;

        ring.pop();
        if reversed {
            ring.extend(arc.iter().rev().copied());
        } else {
            ring.extend(arc.iter().copied());
        }
    }
    Ok(ring)
}

/// Identifier text for a feature: strings as-is, numbers in decimal.
pub(crate) fn raw_id(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
