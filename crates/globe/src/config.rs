use layers::{FillPalette, Rgb};
use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// Drag and momentum tuning.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// Latitude rotation limit in degrees (symmetric).
    pub max_lat_deg: f64,
    /// Samples further apart than this are a pause, not a flick.
    pub sample_gap_ms: f64,
    /// Release speeds below this (deg/ms) do not start inertia.
    pub min_release_speed: f64,
    /// Upper bound on one inertia tick.
    pub max_tick_ms: f64,
    /// Exponential decay time constant.
    pub decay_ms: f64,
    /// Inertia ends once speed (deg/ms) falls below this.
    pub stop_speed: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            max_lat_deg: 50.0,
            sample_gap_ms: 120.0,
            min_release_speed: 0.002,
            max_tick_ms: 60.0,
            decay_ms: 200.0,
            stop_speed: 0.0004,
        }
    }
}

/// Globe configuration. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub palette: FillPalette,
    /// Hover enter/leave transition.
    pub hover_ms: f64,
    /// Fill transition on view switches and trip data updates.
    pub view_switch_ms: f64,
    pub flash_ms: f64,
    /// Flash colour when none is given.
    pub flash_color: Rgb,
    /// Flash colours used by click-to-edit.
    pub flash_added: Rgb,
    pub flash_removed: Rgb,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Wheel delta to zoom exponent (base 2).
    pub wheel_factor: f64,
    /// Pointer travel beyond this on either axis turns a click into a drag.
    pub drag_threshold_px: f64,
    /// Square size used when the container reports no usable size.
    pub default_size: f64,
    /// Sphere radius is `size / radius_divisor`.
    pub radius_divisor: f64,
    /// Initial `[lon, lat]` rotation in degrees.
    pub initial_rotation: [f64; 2],
    pub inertia: InertiaConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            palette: FillPalette::default(),
            hover_ms: 200.0,
            view_switch_ms: 200.0,
            flash_ms: 600.0,
            flash_color: Rgb::from_u32(0x4ade80),
            flash_added: Rgb::from_u32(0x4ade80),
            flash_removed: Rgb::from_u32(0xff6b6b),
            zoom_min: 1.0,
            zoom_max: 4.0,
            wheel_factor: 0.002,
            drag_threshold_px: 2.0,
            default_size: 800.0,
            radius_divisor: 2.1,
            initial_rotation: [0.0, 0.0],
            inertia: InertiaConfig::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(text: &str) -> Result<Self, GlobeError> {
        serde_json::from_str(text).map_err(|e| GlobeError::InvalidConfig(e.to_string()))
    }
}
