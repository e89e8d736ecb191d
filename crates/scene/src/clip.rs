//! Great-circle resampling and clipping of rings against the visible
//! hemisphere.
//!
//! Rings arrive as unit vectors already rotated into view space, where the
//! visible hemisphere is `x > 0` and the horizon is the great circle `x = 0`.

use foundation::math::{Vec3, angle_between, slerp_unit};

/// Longest great-circle step kept between consecutive vertices.
pub const MAX_EDGE_RAD: f64 = 2.0 * std::f64::consts::PI / 180.0;

/// Angular step used when closing a clipped ring along the horizon.
pub const HORIZON_STEP_RAD: f64 = 6.0 * std::f64::consts::PI / 180.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum VertexKind {
    Inside,
    Entry,
    Exit,
}

/// Removes a closing duplicate vertex if present.
pub fn open_ring(points: &mut Vec<Vec3>) {
    if points.len() >= 2 {
        let first = points[0];
        let last = points[points.len() - 1];
        if (first - last).length() < 1e-12 {
            points.pop();
        }
    }
}

/// Inserts great-circle points so that no edge of the closed ring is longer
/// than `max_step_rad`.
pub fn resample_ring(ring: &[Vec3], max_step_rad: f64) -> Vec<Vec3> {
    let n = ring.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        out.push(a);
        let omega = angle_between(a, b);
        if omega > max_step_rad {
            let steps = (omega / max_step_rad).ceil() as usize;
            for s in 1..steps {
                out.push(slerp_unit(a, b, s as f64 / steps as f64));
            }
        }
    }
    out
}

/// Clips an open ring to the visible hemisphere.
///
/// Returns an empty vector when nothing of the ring is visible. Where the ring
/// leaves and re-enters the hemisphere, the gap is closed along the horizon by
/// the shorter arc, which is the correct side for any ring that fits in a
/// hemisphere (true for every country shape).
pub fn clip_ring_to_hemisphere(ring: &[Vec3]) -> Vec<Vec3> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }
    if ring.iter().all(|p| is_visible(*p)) {
        return ring.to_vec();
    }

    let mut tagged: Vec<(Vec3, VertexKind)> = Vec::with_capacity(n + 4);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        match (is_visible(prev), is_visible(cur)) {
            (true, true) => tagged.push((cur, VertexKind::Inside)),
            (false, true) => {
                tagged.push((horizon_crossing(prev, cur), VertexKind::Entry));
                tagged.push((cur, VertexKind::Inside));
            }
            (true, false) => tagged.push((horizon_crossing(prev, cur), VertexKind::Exit)),
            (false, false) => {}
        }
    }

    if tagged.is_empty() {
        return Vec::new();
    }

    let m = tagged.len();
    let mut out = Vec::with_capacity(m * 2);
    for j in 0..m {
        let (p, kind) = tagged[j];
        out.push(p);
        let (next, next_kind) = tagged[(j + 1) % m];
        if kind == VertexKind::Exit && next_kind == VertexKind::Entry {
            push_horizon_arc(&mut out, p, next);
        }
    }
    out
}

fn is_visible(p: Vec3) -> bool {
    p.x > 0.0
}

/// Point where the great-circle arc from `a` to `b` crosses `x = 0`.
fn horizon_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let denom = a.x - b.x;
    let t = if denom.abs() < 1e-15 { 0.5 } else { a.x / denom };
    let chord = a + (b - a) * t;
    let p = chord.normalized_or(a);
    Vec3::new(0.0, p.y, p.z).normalized_or(p)
}

/// Appends the interior points of the shorter horizon arc from `from` to `to`.
fn push_horizon_arc(out: &mut Vec<Vec3>, from: Vec3, to: Vec3) {
    let start = from.z.atan2(from.y);
    let end = to.z.atan2(to.y);
    let mut delta = end - start;
    while delta > std::f64::consts::PI {
        delta -= 2.0 * std::f64::consts::PI;
    }
    while delta <= -std::f64::consts::PI {
        delta += 2.0 * std::f64::consts::PI;
    }
    let steps = (delta.abs() / HORIZON_STEP_RAD).ceil() as usize;
    for s in 1..steps {
        let theta = start + delta * (s as f64 / steps as f64);
        out.push(Vec3::new(0.0, theta.cos(), theta.sin()));
    }
}

#[cfg(test)]
mod tests {
    use super::{HORIZON_STEP_RAD, clip_ring_to_hemisphere, open_ring, resample_ring};
    use foundation::math::{LonLat, Vec3, angle_between};

    fn ring(points: &[(f64, f64)]) -> Vec<Vec3> {
        points
            .iter()
            .map(|&(lon, lat)| LonLat::new(lon, lat).to_unit())
            .collect()
    }

    #[test]
    fn visible_ring_is_untouched() {
        let r = ring(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
        assert_eq!(clip_ring_to_hemisphere(&r), r);
    }

    #[test]
    fn hidden_ring_is_dropped() {
        let r = ring(&[(170.0, -10.0), (-170.0, -10.0), (-170.0, 10.0), (170.0, 10.0)]);
        assert!(clip_ring_to_hemisphere(&r).is_empty());
    }

    #[test]
    fn straddling_ring_stays_on_visible_side() {
        let r = resample_ring(
            &ring(&[(60.0, -10.0), (120.0, -10.0), (120.0, 10.0), (60.0, 10.0)]),
            super::MAX_EDGE_RAD,
        );
        let clipped = clip_ring_to_hemisphere(&r);
        assert!(!clipped.is_empty());
        for p in &clipped {
            assert!(p.x >= -1e-12, "clipped vertex behind horizon: {p:?}");
        }
        // The clipped ring touches the horizon.
        assert!(clipped.iter().any(|p| p.x.abs() < 1e-9));
    }

    #[test]
    fn horizon_gap_is_closed_in_small_steps() {
        let r = resample_ring(
            &ring(&[(45.0, -60.0), (135.0, -60.0), (135.0, 60.0), (45.0, 60.0)]),
            super::MAX_EDGE_RAD,
        );
        let clipped = clip_ring_to_hemisphere(&r);
        for w in clipped.windows(2) {
            if w[0].x.abs() < 1e-9 && w[1].x.abs() < 1e-9 {
                assert!(angle_between(w[0], w[1]) <= HORIZON_STEP_RAD + 1e-9);
            }
        }
    }

    #[test]
    fn resample_limits_edge_length() {
        let r = ring(&[(0.0, 0.0), (30.0, 0.0), (30.0, 30.0)]);
        let dense = resample_ring(&r, super::MAX_EDGE_RAD);
        assert!(dense.len() > r.len());
        for i in 0..dense.len() {
            let a = dense[i];
            let b = dense[(i + 1) % dense.len()];
            assert!(angle_between(a, b) <= super::MAX_EDGE_RAD + 1e-9);
        }
    }

    #[test]
    fn open_ring_drops_closing_duplicate() {
        let mut r = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        open_ring(&mut r);
        assert_eq!(r.len(), 3);
    }
}
