//! Interactive orthographic trip globe.
//!
//! [`GlobeView`] owns one mounted scene: the projector, the inertial drag
//! controller, per-country styles and the tooltip. Adapters feed it pointer,
//! wheel, resize and frame events and read back the scene through
//! [`svg::render_content`] or [`GlobeView::drawn`].

pub mod bridge;
pub mod config;
pub mod edit;
pub mod error;
pub mod inertia;
mod render_state;
pub mod svg;
pub mod view;
pub mod viewport;
pub mod zoom;

pub use bridge::*;
pub use config::*;
pub use edit::toggle_visited_on_click;
pub use error::GlobeError;
pub use inertia::*;
pub use render_state::Tooltip;
pub use view::*;
pub use viewport::*;
pub use zoom::ZoomState;
