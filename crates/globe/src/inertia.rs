//! Drag-to-rotate with momentum.
//!
//! Pointer samples update the rotation directly while dragging. On release
//! the last valid sample becomes the initial velocity, which then decays
//! frame by frame through [`step_inertia`]. Frames are driven from outside
//! (animation frames in the browser, [`runtime::FrameLoop`] offline); each
//! run carries a [`TaskTicket`] so a frame scheduled before a new drag does
//! nothing.

use runtime::{TaskSlot, TaskTicket};

use crate::config::InertiaConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Inertia,
}

/// Rotation and angular velocity (deg/ms) of the globe.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct InertiaState {
    pub lon: f64,
    pub lat: f64,
    pub v_lon: f64,
    pub v_lat: f64,
    pub active: bool,
}

impl InertiaState {
    pub fn speed(&self) -> f64 {
        self.v_lon.hypot(self.v_lat)
    }
}

pub fn clamp_latitude(lat: f64, config: &InertiaConfig) -> f64 {
    lat.clamp(-config.max_lat_deg, config.max_lat_deg)
}

/// One inertia frame.
///
/// Inactive states and non-positive `dt_ms` are returned unchanged. Long
/// frames are clamped to `max_tick_ms`. Hitting the latitude limit zeroes the
/// latitude velocity. Once speed drops below `stop_speed` the state becomes
/// inactive with zero velocity.
pub fn step_inertia(state: InertiaState, dt_ms: f64, config: &InertiaConfig) -> InertiaState {
    if !state.active || !(dt_ms > 0.0) {
        return state;
    }
    let dt = dt_ms.min(config.max_tick_ms);

    let lon = state.lon + state.v_lon * dt;
    let lat = clamp_latitude(state.lat + state.v_lat * dt, config);

    let damping = (-dt / config.decay_ms).exp();
    let v_lon = state.v_lon * damping;
    let mut v_lat = state.v_lat * damping;
    if lat.abs() >= config.max_lat_deg {
        v_lat = 0.0;
    }

    let next = InertiaState {
        lon,
        lat,
        v_lon,
        v_lat,
        active: true,
    };
    if next.speed() < config.stop_speed {
        return InertiaState {
            v_lon: 0.0,
            v_lat: 0.0,
            active: false,
            ..next
        };
    }
    next
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct DragSample {
    d_lon: f64,
    d_lat: f64,
    dt_ms: f64,
}

/// Outcome of [`InertialRotationController::tick`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InertiaTick {
    /// The ticket belongs to a cancelled or finished run; nothing changed.
    Stale,
    /// No time elapsed since the last frame.
    Waiting,
    Moved([f64; 2]),
    /// Last frame of the run; the controller is idle again.
    Stopped([f64; 2]),
}

impl InertiaTick {
    pub fn rotation(&self) -> Option<[f64; 2]> {
        match self {
            InertiaTick::Moved(r) | InertiaTick::Stopped(r) => Some(*r),
            _ => None,
        }
    }

    pub fn wants_next_frame(&self) -> bool {
        matches!(self, InertiaTick::Moved(_) | InertiaTick::Waiting)
    }
}

/// Idle → Dragging → (Idle | Inertia) → Idle.
#[derive(Debug, Clone)]
pub struct InertialRotationController {
    config: InertiaConfig,
    state: InertiaState,
    phase: DragPhase,
    last_sample_ms: Option<f64>,
    last_sample: Option<DragSample>,
    slot: TaskSlot,
    last_tick_ms: Option<f64>,
}

impl InertialRotationController {
    pub fn new(config: InertiaConfig) -> Self {
        Self {
            config,
            state: InertiaState::default(),
            phase: DragPhase::Idle,
            last_sample_ms: None,
            last_sample: None,
            slot: TaskSlot::new(),
            last_tick_ms: None,
        }
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// `[lon, lat]` in degrees.
    pub fn rotation(&self) -> [f64; 2] {
        [self.state.lon, self.state.lat]
    }

    pub fn velocity(&self) -> [f64; 2] {
        [self.state.v_lon, self.state.v_lat]
    }

    /// Jumps to a rotation, stopping any inertia. Latitude is clamped.
    pub fn set_rotation(&mut self, lon: f64, lat: f64) {
        self.stop();
        self.state.lon = lon;
        self.state.lat = clamp_latitude(lat, &self.config);
    }

    /// Ticket of the running inertia, if any.
    pub fn inertia_ticket(&self) -> Option<TaskTicket> {
        self.slot.current()
    }

    pub fn stop(&mut self) {
        self.slot.cancel();
        self.state.v_lon = 0.0;
        self.state.v_lat = 0.0;
        self.state.active = false;
        self.last_tick_ms = None;
        if self.phase == DragPhase::Inertia {
            self.phase = DragPhase::Idle;
        }
    }

    /// Pointer down: cancels inertia immediately.
    pub fn begin_drag(&mut self, now_ms: f64) {
        self.stop();
        self.phase = DragPhase::Dragging;
        self.last_sample_ms = Some(now_ms);
        self.last_sample = None;
    }

    /// Applies a pointer delta in pixels for a sphere of `radius_px`.
    ///
    /// Longitude accumulates without bound; latitude is clamped.
    pub fn drag_by(&mut self, dx: f64, dy: f64, radius_px: f64, now_ms: f64) -> [f64; 2] {
        if self.phase != DragPhase::Dragging {
            return self.rotation();
        }
        let radius = if radius_px.is_finite() && radius_px > 0.0 {
            radius_px
        } else {
            1.0
        };
        let degrees_per_px = 360.0 / (2.0 * std::f64::consts::PI * radius);

        let before = self.rotation();
        self.state.lon += dx * degrees_per_px;
        self.state.lat = clamp_latitude(self.state.lat - dy * degrees_per_px, &self.config);

        let dt = self.last_sample_ms.map(|t| now_ms - t).unwrap_or(0.0);
        self.last_sample_ms = Some(now_ms);
        if dt > 0.0 {
            self.last_sample = if dt <= self.config.sample_gap_ms {
                Some(DragSample {
                    d_lon: self.state.lon - before[0],
                    d_lat: self.state.lat - before[1],
                    dt_ms: dt,
                })
            } else {
                None
            };
        }
        self.rotation()
    }

    /// Pointer up. Returns a ticket when inertia starts.
    pub fn end_drag(&mut self, now_ms: f64) -> Option<TaskTicket> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.phase = DragPhase::Idle;
        self.last_sample_ms = None;

        let sample = self.last_sample.take()?;
        let v_lon = sample.d_lon / sample.dt_ms;
        let v_lat = sample.d_lat / sample.dt_ms;
        if v_lon.hypot(v_lat) < self.config.min_release_speed {
            return None;
        }

        self.state.v_lon = v_lon;
        self.state.v_lat = v_lat;
        self.state.active = true;
        self.phase = DragPhase::Inertia;
        self.last_tick_ms = Some(now_ms);
        let ticket = self.slot.start();
        tracing::debug!(v_lon, v_lat, "inertia started");
        Some(ticket)
    }

    /// Advances the inertia run identified by `ticket` to `now_ms`.
    pub fn tick(&mut self, ticket: TaskTicket, now_ms: f64) -> InertiaTick {
        if !self.slot.is_live(ticket) {
            return InertiaTick::Stale;
        }
        let dt = self.last_tick_ms.map(|t| now_ms - t).unwrap_or(0.0);
        if !(dt > 0.0) {
            return InertiaTick::Waiting;
        }
        self.last_tick_ms = Some(now_ms);

        self.state = step_inertia(self.state, dt, &self.config);
        if self.state.active {
            InertiaTick::Moved(self.rotation())
        } else {
            self.slot.finish(ticket);
            self.phase = DragPhase::Idle;
            self.last_tick_ms = None;
            InertiaTick::Stopped(self.rotation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DragPhase, InertiaState, InertiaTick, InertialRotationController, step_inertia,
    };
    use crate::config::InertiaConfig;
    use proptest::prelude::*;
    use runtime::{FrameBudget, FrameLoop, TaskStatus};

    const RADIUS: f64 = 360.0 / (2.0 * std::f64::consts::PI);

    fn controller() -> InertialRotationController {
        InertialRotationController::new(InertiaConfig::default())
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    #[test]
    fn one_pixel_is_one_degree_at_unit_scale() {
        let mut c = controller();
        c.begin_drag(0.0);
        let r = c.drag_by(10.0, -5.0, RADIUS, 16.0);
        assert_close(r[0], 10.0);
        assert_close(r[1], 5.0);
    }

    #[test]
    fn latitude_is_clamped_while_dragging() {
        let mut c = controller();
        c.begin_drag(0.0);
        let r = c.drag_by(0.0, -500.0, RADIUS, 16.0);
        assert_eq!(r[1], 50.0);
        let r = c.drag_by(0.0, 1000.0, RADIUS, 32.0);
        assert_eq!(r[1], -50.0);
    }

    #[test]
    fn slow_release_goes_idle() {
        let mut c = controller();
        c.begin_drag(0.0);
        c.drag_by(0.01, 0.0, RADIUS, 100.0);
        assert_eq!(c.end_drag(100.0), None);
        assert_eq!(c.phase(), DragPhase::Idle);
    }

    #[test]
    fn release_without_samples_goes_idle() {
        let mut c = controller();
        c.begin_drag(0.0);
        assert_eq!(c.end_drag(10.0), None);
        assert_eq!(c.velocity(), [0.0, 0.0]);
    }

    #[test]
    fn gap_resets_to_post_gap_sample() {
        let mut c = controller();
        c.begin_drag(0.0);
        c.drag_by(30.0, 0.0, RADIUS, 10.0);
        // Pause longer than the sample gap: the flick before it is forgotten.
        c.drag_by(1.0, 0.0, RADIUS, 300.0);
        assert_eq!(c.end_drag(300.0), None);

        c.begin_drag(400.0);
        c.drag_by(30.0, 0.0, RADIUS, 410.0);
        c.drag_by(1.0, 0.0, RADIUS, 700.0);
        c.drag_by(4.0, 2.0, RADIUS, 720.0);
        assert!(c.end_drag(720.0).is_some());
        let v = c.velocity();
        assert_close(v[0], 4.0 / 20.0);
        assert_close(v[1], -2.0 / 20.0);
    }

    #[test]
    fn pointer_down_cancels_inertia_and_stales_ticket() {
        let mut c = controller();
        c.begin_drag(0.0);
        c.drag_by(20.0, 0.0, RADIUS, 16.0);
        let ticket = c.end_drag(16.0).unwrap();
        assert_eq!(c.phase(), DragPhase::Inertia);

        c.begin_drag(20.0);
        assert_eq!(c.phase(), DragPhase::Dragging);
        let before = c.rotation();
        assert_eq!(c.tick(ticket, 40.0), InertiaTick::Stale);
        assert_eq!(c.rotation(), before);
    }

    #[test]
    fn inertia_runs_to_idle_on_frame_loop() {
        let mut c = controller();
        c.begin_drag(0.0);
        c.drag_by(20.0, 0.0, RADIUS, 16.0);
        let ticket = c.end_drag(16.0).unwrap();

        let mut frames = FrameLoop::new(16.0, 16.0);
        let mut budget = FrameBudget::new(1_000);
        let summary = frames.run(&mut budget, |frame| match c.tick(ticket, frame.now_ms) {
            InertiaTick::Stopped(_) => TaskStatus::Done,
            _ => TaskStatus::Continue,
        });
        assert!(summary.finished);
        assert_eq!(c.phase(), DragPhase::Idle);
        assert!(c.rotation()[0] > 20.0);
        assert_eq!(c.tick(ticket, frames.now_ms() + 16.0), InertiaTick::Stale);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let cfg = InertiaConfig::default();
        let s = InertiaState {
            v_lon: 0.1,
            active: true,
            ..InertiaState::default()
        };
        assert_eq!(step_inertia(s, 0.0, &cfg), s);
        assert_eq!(step_inertia(s, -5.0, &cfg), s);
    }

    #[test]
    fn long_frames_are_clamped() {
        let cfg = InertiaConfig::default();
        let s = InertiaState {
            v_lon: 0.1,
            active: true,
            ..InertiaState::default()
        };
        assert_eq!(step_inertia(s, 5_000.0, &cfg), step_inertia(s, 60.0, &cfg));
    }

    #[test]
    fn hitting_latitude_limit_zeroes_latitude_velocity() {
        let cfg = InertiaConfig::default();
        let s = InertiaState {
            lat: 49.0,
            v_lon: 0.1,
            v_lat: 0.1,
            active: true,
            ..InertiaState::default()
        };
        let next = step_inertia(s, 16.0, &cfg);
        assert_eq!(next.lat, 50.0);
        assert_eq!(next.v_lat, 0.0);
        assert!(next.v_lon > 0.0);
    }

    proptest! {
        #[test]
        fn latitude_stays_in_range(
            moves in proptest::collection::vec((-400.0f64..400.0, -400.0f64..400.0, 1.0f64..200.0), 1..40),
            radius in 10.0f64..1000.0,
        ) {
            let mut c = controller();
            let mut now = 0.0;
            c.begin_drag(now);
            for (dx, dy, dt) in moves {
                now += dt;
                let r = c.drag_by(dx, dy, radius, now);
                prop_assert!((-50.0..=50.0).contains(&r[1]));
            }
            if let Some(ticket) = c.end_drag(now) {
                for _ in 0..500 {
                    now += 16.0;
                    let tick = c.tick(ticket, now);
                    prop_assert!((-50.0..=50.0).contains(&c.rotation()[1]));
                    if !tick.wants_next_frame() {
                        break;
                    }
                }
            }
        }

        #[test]
        fn inertia_speed_strictly_decreases_and_stops(
            v_lon in -2.0f64..2.0,
            v_lat in -2.0f64..2.0,
            dt in 1.0f64..100.0,
        ) {
            prop_assume!(v_lon.hypot(v_lat) > 0.0);
            let cfg = InertiaConfig::default();
            let mut s = InertiaState { v_lon, v_lat, active: true, ..InertiaState::default() };
            let mut ticks = 0;
            while s.active {
                let next = step_inertia(s, dt, &cfg);
                prop_assert!(next.speed() < s.speed());
                s = next;
                ticks += 1;
                prop_assert!(ticks < 10_000);
            }
            prop_assert_eq!(s.speed(), 0.0);
        }
    }
}
