use super::Vec3;

/// Geographic position in degrees on the unit sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn to_unit(self) -> Vec3 {
        unit_from_lon_lat(self.lon_deg.to_radians(), self.lat_deg.to_radians())
    }

    pub fn from_unit(u: Vec3) -> Self {
        let (lon, lat) = lon_lat_from_unit(u);
        Self::new(lon.to_degrees(), lat.to_degrees())
    }
}

/// Unit vector for a longitude/latitude pair in radians.
///
/// Axes: x towards (0°, 0°), y towards (90°E, 0°), z towards the north pole.
pub fn unit_from_lon_lat(lon_rad: f64, lat_rad: f64) -> Vec3 {
    let cos_lat = lat_rad.cos();
    Vec3::new(cos_lat * lon_rad.cos(), cos_lat * lon_rad.sin(), lat_rad.sin())
}

/// Longitude/latitude in radians for a (not necessarily unit) vector.
pub fn lon_lat_from_unit(u: Vec3) -> (f64, f64) {
    let len = u.length();
    if len <= 0.0 {
        return (0.0, 0.0);
    }
    let lat = (u.z / len).clamp(-1.0, 1.0).asin();
    let lon = u.y.atan2(u.x);
    (lon, lat)
}

/// Central angle between two unit vectors in radians.
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Spherical linear interpolation between unit vectors.
pub fn slerp_unit(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let omega = angle_between(a, b);
    if omega.abs() < 1e-12 {
        return a;
    }
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-12 {
        // Antipodal: any great circle works; fall back to a linear blend.
        return (a * (1.0 - t) + b * t).normalized_or(a);
    }
    let s0 = ((1.0 - t) * omega).sin() / sin_omega;
    let s1 = (t * omega).sin() / sin_omega;
    a * s0 + b * s1
}

/// Fixed three-axis rotation of geographic coordinates.
///
/// Matches the conventional orthographic "rotate" triple: the longitude shift
/// is applied first, then a rotation by `pitch` about the y axis, then a
/// rotation by `roll` about the x axis. A point at
/// `(-lon_shift, -pitch)` ends up at the center `(0°, 0°)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereRotation {
    lon_shift_rad: f64,
    cos_pitch: f64,
    sin_pitch: f64,
    cos_roll: f64,
    sin_roll: f64,
}

impl SphereRotation {
    pub fn from_degrees(lon_shift: f64, pitch: f64, roll: f64) -> Self {
        let pitch = pitch.to_radians();
        let roll = roll.to_radians();
        Self {
            lon_shift_rad: lon_shift.to_radians(),
            cos_pitch: pitch.cos(),
            sin_pitch: pitch.sin(),
            cos_roll: roll.cos(),
            sin_roll: roll.sin(),
        }
    }

    /// Rotates a unit vector expressed in unrotated geographic axes.
    pub fn apply(&self, u: Vec3) -> Vec3 {
        // Longitude shift is a rotation about z.
        let (s, c) = self.lon_shift_rad.sin_cos();
        let x = u.x * c - u.y * s;
        let y = u.x * s + u.y * c;
        let z = u.z;

        let k = z * self.cos_pitch + x * self.sin_pitch;
        let x2 = x * self.cos_pitch - z * self.sin_pitch;
        let y2 = y * self.cos_roll - k * self.sin_roll;
        let z2 = k * self.cos_roll + y * self.sin_roll;
        Vec3::new(x2, y2, z2)
    }

    /// Inverse of [`SphereRotation::apply`].
    pub fn invert(&self, r: Vec3) -> Vec3 {
        let k = r.z * self.cos_roll - r.y * self.sin_roll;
        let y = r.y * self.cos_roll + r.z * self.sin_roll;
        let x = r.x * self.cos_pitch + k * self.sin_pitch;
        let z = k * self.cos_pitch - r.x * self.sin_pitch;

        let (s, c) = self.lon_shift_rad.sin_cos();
        Vec3::new(x * c + y * s, -x * s + y * c, z)
    }

    pub fn apply_lon_lat(&self, p: LonLat) -> Vec3 {
        self.apply(p.to_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::{LonLat, SphereRotation, angle_between, slerp_unit};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn unit_round_trip() {
        let p = LonLat::new(-73.5, 40.25);
        let rt = LonLat::from_unit(p.to_unit());
        assert_close(rt.lon_deg, p.lon_deg, 1e-9);
        assert_close(rt.lat_deg, p.lat_deg, 1e-9);
    }

    #[test]
    fn rotation_brings_negated_center_to_origin() {
        let rot = SphereRotation::from_degrees(-30.0, -20.0, 0.0);
        let center = rot.apply_lon_lat(LonLat::new(30.0, 20.0));
        assert_close(center.x, 1.0, 1e-12);
        assert_close(center.y, 0.0, 1e-12);
        assert_close(center.z, 0.0, 1e-12);
    }

    #[test]
    fn invert_undoes_apply() {
        let rot = SphereRotation::from_degrees(112.0, 37.0, 12.0);
        let u = LonLat::new(-10.0, 55.0).to_unit();
        let back = rot.invert(rot.apply(u));
        assert_close(back.x, u.x, 1e-12);
        assert_close(back.y, u.y, 1e-12);
        assert_close(back.z, u.z, 1e-12);
    }

    #[test]
    fn slerp_midpoint_is_equidistant() {
        let a = LonLat::new(0.0, 0.0).to_unit();
        let b = LonLat::new(90.0, 0.0).to_unit();
        let m = slerp_unit(a, b, 0.5);
        assert_close(angle_between(a, m), angle_between(m, b), 1e-12);
        assert_close(LonLat::from_unit(m).lon_deg, 45.0, 1e-9);
    }
}
