//! The interactive globe: mount, input handling and the update API.

use formats::{FactTable, NameTable, TripData};
use foundation::CountryId;
use layers::{
    CountryRecord, CountryRenderState, Ease, PathStyle, Rgb, TooltipContent, ViewMode,
    tooltip_position,
};
use runtime::TaskTicket;
use scene::{PathGeometry, WorldGeometry};

use crate::bridge::{NavigationState, NavigationUi, NoViewState, ViewStateBridge};
use crate::config::GlobeConfig;
use crate::error::GlobeError;
use crate::inertia::{DragPhase, InertiaTick};
use crate::render_state::{Gesture, RenderState, Tooltip};
use crate::viewport::{Viewport, fit_viewport};

/// Inputs for [`GlobeView::mount`].
#[derive(Debug, Clone, Default)]
pub struct GlobeData {
    pub world: WorldGeometry,
    pub names: NameTable,
    pub facts: FactTable,
    pub trips: TripData,
    /// `None` asks the view-state bridge.
    pub initial_view: Option<ViewMode>,
}

/// A click on a country while edit mode is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryClick {
    pub index: usize,
    pub id: CountryId,
    pub name: String,
}

pub type ClickHandler = Box<dyn FnMut(&CountryClick)>;

/// Result of releasing the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerUp {
    pub click: Option<CountryClick>,
    /// Ticket for the inertia run to drive with [`GlobeView::tick_inertia`].
    pub inertia: Option<TaskTicket>,
}

/// One country as currently drawn.
#[derive(Debug, Clone, Copy)]
pub struct DrawnCountry<'a> {
    pub index: usize,
    pub record: &'a CountryRecord,
    pub path: &'a PathGeometry,
    pub style: PathStyle,
}

pub struct GlobeView {
    config: GlobeConfig,
    view_state: Box<dyn ViewStateBridge>,
    navigation: Box<dyn NavigationUi>,
    on_click: Option<ClickHandler>,
    container: [f64; 2],
    state: Option<RenderState>,
    needs_redraw: bool,
}

impl std::fmt::Debug for GlobeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobeView")
            .field("mounted", &self.state.is_some())
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

impl GlobeView {
    pub fn new(config: GlobeConfig) -> Self {
        Self::with_bridges(config, Box::new(NoViewState), Box::new(NavigationState::default()))
    }

    pub fn with_bridges(
        config: GlobeConfig,
        view_state: Box<dyn ViewStateBridge>,
        navigation: Box<dyn NavigationUi>,
    ) -> Self {
        Self {
            config,
            view_state,
            navigation,
            on_click: None,
            container: [0.0, 0.0],
            state: None,
            needs_redraw: false,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    /// Builds the scene. Fails if already mounted, or if the world geometry
    /// or the name table is empty.
    pub fn mount(&mut self, data: GlobeData) -> Result<(), GlobeError> {
        if self.state.is_some() {
            return Err(GlobeError::AlreadyMounted);
        }
        if data.world.is_empty() || data.world.features().iter().all(|f| f.is_empty()) {
            return Err(GlobeError::fatal("world geometry"));
        }
        if data.names.is_empty() {
            return Err(GlobeError::fatal("country names"));
        }

        let view = data
            .initial_view
            .unwrap_or_else(|| self.view_state.initial_view());
        let countries =
            CountryRenderState::build(data.world.features(), &data.names, &data.facts, data.trips);
        let [w, h] = self.container;
        let viewport = fit_viewport(w, h, None, &self.config);
        let state = RenderState::new(data.world, countries, viewport, view, &self.config);

        tracing::debug!(
            countries = state.countries.len(),
            view = %view,
            size = viewport.size,
            "globe mounted"
        );
        self.state = Some(state);
        self.update_navigation();
        self.needs_redraw = true;
        Ok(())
    }

    /// Drops the scene. Returns false if nothing was mounted.
    pub fn unmount(&mut self) -> bool {
        let was_mounted = self.state.take().is_some();
        if was_mounted {
            tracing::debug!("globe unmounted");
            self.needs_redraw = true;
        }
        was_mounted
    }

    /// Refits the globe into a `width` × `height` container. Safe to call
    /// before mount and with degenerate sizes.
    pub fn resize(&mut self, width: f64, height: f64) -> Viewport {
        self.container = [width, height];
        let previous = self.state.as_ref().map(|s| s.viewport.size);
        let viewport = fit_viewport(width, height, previous, &self.config);
        if let Some(state) = self.state.as_mut() {
            state.apply_viewport(viewport);
            self.needs_redraw = true;
            tracing::debug!(size = viewport.size, "globe resized");
        }
        viewport
    }

    pub fn view(&self) -> Option<ViewMode> {
        self.state.as_ref().map(|s| s.view)
    }

    pub fn set_view(&mut self, view: ViewMode, now_ms: f64) -> Result<(), GlobeError> {
        let state = self.state.as_mut().ok_or(GlobeError::NotMounted)?;
        state.view = view;
        state.tooltip = None;
        state.restyle_all(
            now_ms,
            self.config.view_switch_ms,
            Ease::CubicInOut,
            &self.config.palette,
        );
        self.view_state.persist_view(view);
        self.update_navigation();
        self.needs_redraw = true;
        tracing::debug!(view = %view, "view switched");
        Ok(())
    }

    /// Replaces visited and lived data; geometry, rotation and zoom stay.
    pub fn update_trip_data(&mut self, trips: TripData, now_ms: f64) -> Result<(), GlobeError> {
        let state = self.state.as_mut().ok_or(GlobeError::NotMounted)?;
        state.set_trips(trips);
        state.restyle_all(
            now_ms,
            self.config.view_switch_ms,
            Ease::CubicInOut,
            &self.config.palette,
        );
        self.needs_redraw = true;
        Ok(())
    }

    pub fn trips(&self) -> Option<&TripData> {
        self.state.as_ref().map(|s| s.countries.trips())
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if let Some(state) = self.state.as_mut() {
            state.edit_mode = enabled;
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.edit_mode)
    }

    /// Whether the profile shown belongs to the viewer; only changes the
    /// lived view label.
    pub fn set_own_profile(&mut self, own: bool) {
        if let Some(state) = self.state.as_mut() {
            state.own_profile = own;
            self.update_navigation();
        }
    }

    pub fn set_on_country_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    /// Fills the country with `color` (default flash colour) at once, then
    /// fades back to its normal style. Returns how many paths flashed.
    pub fn flash_country(&mut self, id: &CountryId, color: Option<Rgb>, now_ms: f64) -> usize {
        let Some(state) = self.state.as_mut() else {
            return 0;
        };
        let color = color.unwrap_or(self.config.flash_color);
        let indices: Vec<usize> = state.countries.index_of(id).collect();
        for &index in &indices {
            let target = state.target_style(index, &self.config.palette);
            let style = &mut state.styles[index];
            let stroke = style.current().stroke;
            style.set(PathStyle { fill: color, stroke });
            style.transition_to(target, now_ms, self.config.flash_ms, Ease::CubicOut);
        }
        if !indices.is_empty() {
            self.needs_redraw = true;
        }
        indices.len()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.controller.begin_drag(now_ms);
        state.gesture = Some(Gesture {
            last: [x, y],
            travel: [0.0, 0.0],
            dragged: false,
            target: state.pick(x, y),
        });
        if state.tooltip.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Pointer movement in container (`x`, `y`) and page coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64, page_x: f64, page_y: f64, now_ms: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(gesture) = state.gesture.as_mut() {
            let dx = x - gesture.last[0];
            let dy = y - gesture.last[1];
            gesture.last = [x, y];
            gesture.travel[0] += dx;
            gesture.travel[1] += dy;
            let threshold = self.config.drag_threshold_px;
            if gesture.travel[0].abs() > threshold || gesture.travel[1].abs() > threshold {
                gesture.dragged = true;
            }
            let radius = state.viewport.radius;
            state.controller.drag_by(dx, dy, radius, now_ms);
            state.sync_rotation();
            self.needs_redraw = true;
            return;
        }

        let hit = state.pick(x, y);
        if hit != state.hovered {
            let palette = &self.config.palette;
            if let Some(old) = state.hovered.take() {
                let rest = state.resting_style(old, palette);
                state.styles[old].transition_to(rest, now_ms, self.config.hover_ms, Ease::CubicOut);
            }
            if let Some(new) = hit {
                let hover = state.hover_style(new, palette);
                state.styles[new].transition_to(hover, now_ms, self.config.hover_ms, Ease::CubicOut);
            }
            state.hovered = hit;
            self.needs_redraw = true;
        }

        let tooltip = hit.and_then(|index| {
            let record = state.record(index)?;
            let content =
                TooltipContent::build(record, state.view, state.countries.lived_records(index));
            let [left, top] = tooltip_position(page_x, page_y);
            Some(Tooltip {
                html: content.to_html(),
                left,
                top,
            })
        });
        if tooltip != state.tooltip {
            state.tooltip = tooltip;
            self.needs_redraw = true;
        }
    }

    /// Ends a gesture. A gesture that never moved past the drag threshold
    /// is a click; in edit mode it reports the country it started on.
    pub fn pointer_up(&mut self, now_ms: f64) -> PointerUp {
        let Some(state) = self.state.as_mut() else {
            return PointerUp::default();
        };
        let Some(gesture) = state.gesture.take() else {
            return PointerUp::default();
        };
        let inertia = state.controller.end_drag(now_ms);

        let click = if gesture.dragged || !state.edit_mode {
            None
        } else {
            gesture
                .target
                .and_then(|index| state.record(index).map(|r| (index, r)))
                .and_then(|(index, record)| {
                    Some(CountryClick {
                        index,
                        id: record.id.clone()?,
                        name: record.name.clone(),
                    })
                })
        };
        if let (Some(click), Some(handler)) = (click.as_ref(), self.on_click.as_mut()) {
            handler(click);
        }
        PointerUp { click, inertia }
    }

    /// Pointer left the globe: hover and tooltip end.
    pub fn pointer_leave(&mut self, now_ms: f64) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(old) = state.hovered.take() {
            let rest = state.resting_style(old, &self.config.palette);
            state.styles[old].transition_to(rest, now_ms, self.config.hover_ms, Ease::CubicOut);
            self.needs_redraw = true;
        }
        if state.tooltip.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Wheel zoom. Returns the new zoom factor; inertia keeps running.
    pub fn wheel(&mut self, delta_y: f64) -> Option<f64> {
        let state = self.state.as_mut()?;
        let before = state.zoom.k();
        let k = state.zoom.apply_wheel(delta_y, self.config.wheel_factor);
        if k != before {
            self.needs_redraw = true;
        }
        Some(k)
    }

    /// Advances the inertia run `ticket` to `now_ms`.
    pub fn tick_inertia(&mut self, ticket: TaskTicket, now_ms: f64) -> InertiaTick {
        let Some(state) = self.state.as_mut() else {
            return InertiaTick::Stale;
        };
        let tick = state.controller.tick(ticket, now_ms);
        if tick.rotation().is_some() {
            state.sync_rotation();
            self.needs_redraw = true;
        }
        tick
    }

    /// Advances style transitions. Returns true while any is still running.
    pub fn animate(&mut self, now_ms: f64) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if state.tick_styles(now_ms) {
            self.needs_redraw = true;
        }
        state.is_animating()
    }

    /// Jumps to a rotation, cancelling inertia.
    pub fn set_rotation(&mut self, lon: f64, lat: f64) {
        if let Some(state) = self.state.as_mut() {
            state.controller.set_rotation(lon, lat);
            state.sync_rotation();
            self.needs_redraw = true;
        }
    }

    pub fn set_zoom(&mut self, k: f64) {
        if let Some(state) = self.state.as_mut() {
            state.zoom.set(k);
            self.needs_redraw = true;
        }
    }

    /// `[lon, lat, roll]` of the projection.
    pub fn rotation(&self) -> Option<[f64; 3]> {
        self.state.as_ref().map(|s| s.projector.rotation())
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.state
            .as_ref()
            .map(|s| s.controller.phase())
            .unwrap_or_default()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.state.as_ref().map(|s| s.viewport)
    }

    pub fn zoom(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.zoom.k())
    }

    pub fn zoom_transform(&self) -> Option<String> {
        self.state.as_ref().map(|s| s.zoom.transform())
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.state.as_ref().and_then(|s| s.tooltip.as_ref())
    }

    pub fn hovered(&self) -> Option<&CountryRecord> {
        let state = self.state.as_ref()?;
        state.record(state.hovered?)
    }

    /// Country under a point in container coordinates.
    pub fn country_at(&self, x: f64, y: f64) -> Option<&CountryRecord> {
        let state = self.state.as_ref()?;
        state.record(state.pick(x, y)?)
    }

    pub fn countries(&self) -> Option<&CountryRenderState> {
        self.state.as_ref().map(|s| &s.countries)
    }

    /// Current style of every drawn path with the given id.
    pub fn style_of(&self, id: &CountryId) -> Option<PathStyle> {
        let state = self.state.as_ref()?;
        let index = state.countries.index_of(id).next()?;
        Some(state.styles[index].current())
    }

    /// Countries in draw order.
    pub fn drawn(&self) -> impl Iterator<Item = DrawnCountry<'_>> + '_ {
        self.state.iter().flat_map(|state| {
            state
                .countries
                .records()
                .iter()
                .zip(&state.paths)
                .zip(&state.styles)
                .enumerate()
                .map(|(index, ((record, path), style))| DrawnCountry {
                    index,
                    record,
                    path,
                    style: style.current(),
                })
        })
    }

    /// Returns true once after anything visible changed.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn update_navigation(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        self.navigation.set_active_view(state.view);
        self.navigation
            .set_view_label(state.view.label(state.own_profile));
    }
}
