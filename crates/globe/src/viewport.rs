//! Square globe viewport fitted into a container.

use crate::config::GlobeConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    /// Side of the square drawing area in pixels.
    pub size: f64,
    /// Projection center within the square.
    pub mid: f64,
    /// Sphere radius in pixels.
    pub radius: f64,
    /// Offset of the square inside the container.
    pub left: f64,
    pub top: f64,
}

impl Viewport {
    /// Projection scale for this viewport. The orthographic scale equals the
    /// sphere radius in pixels.
    pub fn scale(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> [f64; 2] {
        [self.mid, self.mid]
    }
}

fn usable(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

/// Fits a square into a `width` × `height` container.
///
/// The side is the shorter usable dimension; a zero or non-finite side is
/// ignored in favour of the other one, then the previous size, then the
/// configured default. Never returns a non-positive size.
pub fn fit_viewport(width: f64, height: f64, previous: Option<f64>, config: &GlobeConfig) -> Viewport {
    let size = match (usable(width), usable(height)) {
        (Some(w), Some(h)) => w.min(h),
        (Some(s), None) | (None, Some(s)) => s,
        (None, None) => previous
            .and_then(usable)
            .or_else(|| usable(config.default_size))
            .unwrap_or(800.0),
    };
    let divisor = usable(config.radius_divisor).unwrap_or(2.1);
    let offset = |side: f64| usable(side).map(|s| (s - size) / 2.0).unwrap_or(0.0);
    Viewport {
        size,
        mid: size / 2.0,
        radius: size / divisor,
        left: offset(width),
        top: offset(height),
    }
}

#[cfg(test)]
mod tests {
    use super::fit_viewport;
    use crate::config::GlobeConfig;

    #[test]
    fn square_uses_shorter_side_and_centers() {
        let v = fit_viewport(1000.0, 600.0, None, &GlobeConfig::default());
        assert_eq!(v.size, 600.0);
        assert_eq!(v.mid, 300.0);
        assert_eq!(v.left, 200.0);
        assert_eq!(v.top, 0.0);
        assert!((v.radius - 600.0 / 2.1).abs() < 1e-9);
    }

    #[test]
    fn zero_width_falls_back_to_height() {
        let v = fit_viewport(0.0, 500.0, None, &GlobeConfig::default());
        assert_eq!(v.size, 500.0);
        assert_eq!(v.left, 0.0);
    }

    #[test]
    fn nothing_usable_falls_back_to_previous_then_default() {
        let cfg = GlobeConfig::default();
        assert_eq!(fit_viewport(0.0, f64::NAN, Some(640.0), &cfg).size, 640.0);
        assert_eq!(fit_viewport(0.0, 0.0, None, &cfg).size, 800.0);
        assert_eq!(fit_viewport(-3.0, f64::INFINITY, Some(0.0), &cfg).size, 800.0);
    }
}
