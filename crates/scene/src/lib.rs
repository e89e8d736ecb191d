//! Country geometry on the unit sphere and its orthographic screen projection.

pub mod clip;
pub mod path;
pub mod picking;
pub mod projection;
pub mod world;

pub use path::PathGeometry;
pub use picking::{PickHit, pick_topmost};
pub use projection::{CLIP_ANGLE_DEG, GeoProjector, ProjectionState};
pub use world::*;
