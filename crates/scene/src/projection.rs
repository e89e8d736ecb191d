use foundation::math::{LonLat, SphereRotation, Vec2, Vec3};

use crate::clip::{MAX_EDGE_RAD, clip_ring_to_hemisphere, open_ring, resample_ring};
use crate::path::PathGeometry;
use crate::world::CountryFeature;

/// Angular radius of the visible cap, in degrees. Exactly one hemisphere.
pub const CLIP_ANGLE_DEG: f64 = 90.0;

/// Plain projection parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionState {
    /// `[lon, lat, roll]` in degrees.
    pub rotation: [f64; 3],
    /// Sphere radius in pixels.
    pub scale: f64,
    /// Screen position of the sphere center.
    pub translate: [f64; 2],
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self {
            rotation: [0.0, 0.0, 0.0],
            scale: 150.0,
            translate: [480.0, 250.0],
        }
    }
}

/// Orthographic globe projection with a fixed 90° clip angle.
///
/// Paths are derived from the current state on every call; nothing is cached
/// across rotation or resize.
#[derive(Debug, Clone)]
pub struct GeoProjector {
    state: ProjectionState,
    rotation: SphereRotation,
}

impl Default for GeoProjector {
    fn default() -> Self {
        Self::new(ProjectionState::default())
    }
}

impl GeoProjector {
    pub fn new(state: ProjectionState) -> Self {
        let [lon, lat, roll] = state.rotation;
        Self {
            state,
            rotation: SphereRotation::from_degrees(lon, lat, roll),
        }
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    /// Stores the rotation as given. Callers clamp.
    pub fn set_rotation(&mut self, lon: f64, lat: f64, roll: f64) {
        self.state.rotation = [lon, lat, roll];
        self.rotation = SphereRotation::from_degrees(lon, lat, roll);
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.state.rotation
    }

    /// Updates scale and center together; rotation is untouched.
    pub fn resize(&mut self, scale: f64, translate_x: f64, translate_y: f64) {
        self.state.scale = scale;
        self.state.translate = [translate_x, translate_y];
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn translate(&self) -> [f64; 2] {
        self.state.translate
    }

    /// Projects a geographic point, or `None` when it lies beyond the clip
    /// angle from the visible center.
    pub fn project(&self, point: LonLat) -> Option<Vec2> {
        let r = self.rotation.apply_lon_lat(point);
        if r.x <= 0.0 {
            return None;
        }
        Some(self.to_screen(r))
    }

    /// Geographic point under a screen position, or `None` outside the disk.
    pub fn invert(&self, x: f64, y: f64) -> Option<LonLat> {
        let scale = self.state.scale;
        if scale <= 0.0 || !scale.is_finite() {
            return None;
        }
        let sy = (x - self.state.translate[0]) / scale;
        let sz = (self.state.translate[1] - y) / scale;
        let r2 = sy * sy + sz * sz;
        if r2 > 1.0 {
            return None;
        }
        let view = Vec3::new((1.0 - r2).sqrt(), sy, sz);
        Some(LonLat::from_unit(self.rotation.invert(view)))
    }

    /// Screen geometry for a feature under the current state.
    pub fn path_for(&self, feature: &CountryFeature) -> PathGeometry {
        let mut path = PathGeometry::empty();
        for polygon in &feature.polygons {
            for ring in &polygon.rings {
                let mut rotated: Vec<Vec3> =
                    ring.iter().map(|p| self.rotation.apply_lon_lat(*p)).collect();
                open_ring(&mut rotated);
                if rotated.len() < 3 {
                    continue;
                }
                let dense = resample_ring(&rotated, MAX_EDGE_RAD);
                let visible = clip_ring_to_hemisphere(&dense);
                if visible.is_empty() {
                    continue;
                }
                path.push_ring(visible.into_iter().map(|r| self.to_screen(r).into()).collect());
            }
        }
        path
    }

    fn to_screen(&self, r: Vec3) -> Vec2 {
        Vec2::new(
            self.state.translate[0] + r.y * self.state.scale,
            self.state.translate[1] - r.z * self.state.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoProjector, ProjectionState};
    use crate::world::{CountryFeature, Polygon};
    use foundation::math::LonLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn projector() -> GeoProjector {
        GeoProjector::new(ProjectionState {
            rotation: [0.0, 0.0, 0.0],
            scale: 100.0,
            translate: [200.0, 200.0],
        })
    }

    fn square(lon: f64, lat: f64, size: f64) -> CountryFeature {
        CountryFeature::new(
            Some("1".into()),
            vec![Polygon::new(vec![vec![
                LonLat::new(lon, lat),
                LonLat::new(lon + size, lat),
                LonLat::new(lon + size, lat + size),
                LonLat::new(lon, lat + size),
                LonLat::new(lon, lat),
            ]])],
        )
    }

    #[test]
    fn center_projects_to_translate() {
        let p = projector().project(LonLat::new(0.0, 0.0)).unwrap();
        assert_close(p.x, 200.0, 1e-9);
        assert_close(p.y, 200.0, 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let proj = projector();
        let north = proj.project(LonLat::new(0.0, 30.0)).unwrap();
        let east = proj.project(LonLat::new(30.0, 0.0)).unwrap();
        assert_close(north.y, 200.0 - 50.0, 1e-9);
        assert_close(east.x, 200.0 + 50.0, 1e-9);
    }

    #[test]
    fn far_side_is_clipped() {
        let proj = projector();
        assert!(proj.project(LonLat::new(180.0, 0.0)).is_none());
        assert!(proj.project(LonLat::new(91.0, 0.0)).is_none());
        assert!(proj.project(LonLat::new(89.0, 0.0)).is_some());
    }

    #[test]
    fn rotation_moves_visible_center() {
        let mut proj = projector();
        proj.set_rotation(-100.0, -20.0, 0.0);
        assert_eq!(proj.rotation(), [-100.0, -20.0, 0.0]);
        let p = proj.project(LonLat::new(100.0, 20.0)).unwrap();
        assert_close(p.x, 200.0, 1e-9);
        assert_close(p.y, 200.0, 1e-9);
        assert!(proj.project(LonLat::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn resize_keeps_rotation() {
        let mut proj = projector();
        proj.set_rotation(10.0, 5.0, 0.0);
        proj.resize(50.0, 60.0, 70.0);
        assert_eq!(proj.rotation(), [10.0, 5.0, 0.0]);
        assert_eq!(proj.scale(), 50.0);
        assert_eq!(proj.translate(), [60.0, 70.0]);
    }

    #[test]
    fn invert_round_trips_visible_points() {
        let mut proj = projector();
        proj.set_rotation(30.0, -15.0, 0.0);
        let geo = LonLat::new(-20.0, 35.0);
        let p = proj.project(geo).unwrap();
        let back = proj.invert(p.x, p.y).unwrap();
        assert_close(back.lon_deg, geo.lon_deg, 1e-9);
        assert_close(back.lat_deg, geo.lat_deg, 1e-9);
        assert!(proj.invert(0.0, 0.0).is_none());
    }

    #[test]
    fn path_is_recomputed_after_rotation() {
        let mut proj = projector();
        let feature = square(-5.0, -5.0, 10.0);
        let front = proj.path_for(&feature);
        assert!(front.contains([200.0, 200.0]));

        proj.set_rotation(180.0, 0.0, 0.0);
        assert!(proj.path_for(&feature).is_empty());

        proj.set_rotation(0.0, 0.0, 0.0);
        assert_eq!(proj.path_for(&feature), front);
    }

    #[test]
    fn horizon_straddling_feature_keeps_visible_part() {
        let proj = projector();
        let path = proj.path_for(&square(80.0, -10.0, 20.0));
        assert!(!path.is_empty());
        let b = path.bounds();
        // Nothing spills outside the projected disk.
        assert!(b.max[0] <= 300.0 + 1e-9);
        assert!(path.contains([299.0, 200.0]));
    }
}
