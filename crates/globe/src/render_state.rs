//! Everything one mounted globe owns.

use formats::TripData;
use layers::{
    AnimatedStyle, CountryRecord, CountryRenderState, Ease, FillPalette, PathStyle, ViewMode,
};
use scene::{GeoProjector, PathGeometry, ProjectionState, WorldGeometry, pick_topmost};

use crate::config::GlobeConfig;
use crate::inertia::InertialRotationController;
use crate::viewport::Viewport;
use crate::zoom::ZoomState;

/// Pointer gesture between down and up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gesture {
    pub last: [f64; 2],
    /// Displacement since pointer down.
    pub travel: [f64; 2],
    pub dragged: bool,
    /// Country under the pointer when the gesture started.
    pub target: Option<usize>,
}

/// Positioned tooltip markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub html: String,
    /// Page coordinates of the tooltip's top-left corner.
    pub left: f64,
    pub top: f64,
}

pub(crate) struct RenderState {
    pub world: WorldGeometry,
    pub countries: CountryRenderState,
    pub projector: GeoProjector,
    pub viewport: Viewport,
    pub zoom: ZoomState,
    pub view: ViewMode,
    pub controller: InertialRotationController,
    /// Screen paths in draw order, parallel to `world.features()`.
    pub paths: Vec<PathGeometry>,
    pub styles: Vec<AnimatedStyle>,
    pub hovered: Option<usize>,
    pub gesture: Option<Gesture>,
    pub tooltip: Option<Tooltip>,
    pub edit_mode: bool,
    pub own_profile: bool,
}

impl RenderState {
    pub fn new(
        world: WorldGeometry,
        countries: CountryRenderState,
        viewport: Viewport,
        view: ViewMode,
        config: &GlobeConfig,
    ) -> Self {
        let mut controller = InertialRotationController::new(config.inertia);
        let [lon, lat] = config.initial_rotation;
        controller.set_rotation(lon, lat);
        let [lon, lat] = controller.rotation();

        let projector = GeoProjector::new(ProjectionState {
            rotation: [lon, lat, 0.0],
            scale: viewport.scale(),
            translate: viewport.center(),
        });

        let mut state = Self {
            world,
            countries,
            projector,
            viewport,
            zoom: ZoomState::new(config.zoom_min, config.zoom_max),
            view,
            controller,
            paths: Vec::new(),
            styles: Vec::new(),
            hovered: None,
            gesture: None,
            tooltip: None,
            edit_mode: false,
            own_profile: false,
        };
        state.styles = (0..state.countries.len())
            .map(|i| AnimatedStyle::new(state.resting_style(i, &config.palette)))
            .collect();
        state.refresh_paths();
        state
    }

    /// Recomputes every screen path from the current projection.
    pub fn refresh_paths(&mut self) {
        self.paths = self
            .world
            .features()
            .iter()
            .map(|f| self.projector.path_for(f))
            .collect();
    }

    /// Pushes the controller's rotation into the projector. Roll stays 0.
    pub fn sync_rotation(&mut self) {
        let [lon, lat] = self.controller.rotation();
        self.projector.set_rotation(lon, lat, 0.0);
        self.refresh_paths();
    }

    pub fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let [tx, ty] = viewport.center();
        self.projector.resize(viewport.scale(), tx, ty);
        self.refresh_paths();
    }

    /// Country under a point in container coordinates.
    pub fn pick(&self, x: f64, y: f64) -> Option<usize> {
        let point = self.zoom.to_content(x, y);
        pick_topmost(&self.paths, point).map(|hit| hit.index)
    }

    pub fn record(&self, index: usize) -> Option<&CountryRecord> {
        self.countries.record(index)
    }

    pub fn resting_style(&self, index: usize, palette: &FillPalette) -> PathStyle {
        PathStyle {
            fill: self
                .countries
                .fill(index, self.view, palette)
                .unwrap_or(palette.unvisited),
            stroke: palette.default_stroke,
        }
    }

    pub fn hover_style(&self, index: usize, palette: &FillPalette) -> PathStyle {
        let rest = self.resting_style(index, palette);
        PathStyle {
            fill: rest.fill.brighter(palette.hover_brighten),
            stroke: palette.hover_stroke,
        }
    }

    /// Style a country settles on: hovered countries keep their highlight.
    pub fn target_style(&self, index: usize, palette: &FillPalette) -> PathStyle {
        if self.hovered == Some(index) {
            self.hover_style(index, palette)
        } else {
            self.resting_style(index, palette)
        }
    }

    /// Animates every country to its target style.
    pub fn restyle_all(&mut self, now_ms: f64, duration_ms: f64, ease: Ease, palette: &FillPalette) {
        for index in 0..self.styles.len() {
            let target = self.target_style(index, palette);
            self.styles[index].transition_to(target, now_ms, duration_ms, ease);
        }
    }

    pub fn set_trips(&mut self, trips: TripData) {
        self.countries.set_trips(trips);
    }

    /// Advances all style transitions. Returns true if anything changed.
    pub fn tick_styles(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        for style in &mut self.styles {
            changed |= style.tick(now_ms);
        }
        changed
    }

    pub fn is_animating(&self) -> bool {
        self.styles.iter().any(AnimatedStyle::is_animating)
    }
}
