use std::fmt::Write as _;

use foundation::Aabb2;

/// Screen-space geometry for one country: a list of closed rings.
///
/// Rings are filled with the even-odd rule, which renders holes correctly
/// regardless of ring orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    rings: Vec<Vec<[f64; 2]>>,
    bounds: Aabb2,
}

impl Default for PathGeometry {
    fn default() -> Self {
        Self::empty()
    }
}

impl PathGeometry {
    pub fn empty() -> Self {
        Self {
            rings: Vec::new(),
            bounds: Aabb2::empty(),
        }
    }

    /// Adds a ring; rings with fewer than three points are ignored.
    pub fn push_ring(&mut self, ring: Vec<[f64; 2]>) {
        if ring.len() < 3 {
            return;
        }
        for p in &ring {
            self.bounds.extend(*p);
        }
        self.rings.push(ring);
    }

    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Even-odd containment over all rings.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            let mut j = n - 1;
            for i in 0..n {
                let a = ring[i];
                let b = ring[j];
                if (a[1] > p[1]) != (b[1] > p[1]) {
                    let x_cross = (b[0] - a[0]) * (p[1] - a[1]) / (b[1] - a[1]) + a[0];
                    if p[0] < x_cross {
                        inside = !inside;
                    }
                }
                j = i;
            }
        }
        inside
    }

    /// SVG path data (`M x,y L ... Z` per ring). Empty geometry yields an
    /// empty string.
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for ring in &self.rings {
            for (i, p) in ring.iter().enumerate() {
                d.push(if i == 0 { 'M' } else { 'L' });
                push_coord(&mut d, p[0]);
                d.push(',');
                push_coord(&mut d, p[1]);
            }
            d.push('Z');
        }
        d
    }
}

fn push_coord(out: &mut String, v: f64) {
    let mut s = String::new();
    let _ = write!(s, "{v:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    out.push_str(&s);
}
