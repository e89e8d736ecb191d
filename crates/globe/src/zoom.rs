//! Wheel zoom of the content layer.
//!
//! Zoom is a uniform scale applied as a transform on the group holding the
//! sea and the countries; the projection is never touched, so hit testing
//! divides pointer positions back out.

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomState {
    k: f64,
    min: f64,
    max: f64,
}

impl ZoomState {
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_finite() && min > 0.0 { min } else { 1.0 };
        let max = if max.is_finite() && max >= min { max } else { min };
        Self { k: min, min, max }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn set(&mut self, k: f64) {
        if k.is_finite() {
            self.k = k.clamp(self.min, self.max);
        }
    }

    /// `k · 2^(-delta · factor)`, clamped to the extent.
    pub fn apply_wheel(&mut self, delta_y: f64, factor: f64) -> f64 {
        self.set(self.k * 2f64.powf(-delta_y * factor));
        self.k
    }

    /// Maps a point in container space to the unzoomed content space.
    pub fn to_content(&self, x: f64, y: f64) -> [f64; 2] {
        [x / self.k, y / self.k]
    }

    pub fn transform(&self) -> String {
        format!("scale({})", self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::ZoomState;

    #[test]
    fn wheel_zooms_within_extent() {
        let mut z = ZoomState::new(1.0, 4.0);
        assert_eq!(z.k(), 1.0);
        z.apply_wheel(-500.0, 0.002);
        assert!((z.k() - 2.0).abs() < 1e-12);
        z.apply_wheel(-5_000.0, 0.002);
        assert_eq!(z.k(), 4.0);
        z.apply_wheel(10_000.0, 0.002);
        assert_eq!(z.k(), 1.0);
    }

    #[test]
    fn content_mapping_and_transform() {
        let mut z = ZoomState::new(1.0, 4.0);
        z.set(2.0);
        assert_eq!(z.to_content(100.0, 50.0), [50.0, 25.0]);
        assert_eq!(z.transform(), "scale(2)");
        z.set(f64::NAN);
        assert_eq!(z.k(), 2.0);
    }
}
