//! Offline commands behind the `tripglobe` binary.

use std::path::{Path, PathBuf};

use formats::{
    FactTable, NameTable, TripData, compute_timeline, load_facts, load_names, load_trip_data,
    load_world, or_degraded,
};
use globe::{GlobeConfig, GlobeData, GlobeView, InertiaTick};
use layers::ViewMode;
use runtime::{FrameBudget, FrameLoop, TaskStatus};
use serde::Serialize;

/// Inputs of a snapshot render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub world: PathBuf,
    pub names: PathBuf,
    pub facts: Option<PathBuf>,
    pub trips: Option<PathBuf>,
    pub view: ViewMode,
    pub lon: f64,
    pub lat: f64,
    pub size: f64,
    pub zoom: f64,
    /// Horizontal flick in pixels, played out with inertia before rendering.
    pub flick_px: f64,
}

pub fn load_config(path: Option<&Path>) -> Result<GlobeConfig, String> {
    let Some(path) = path else {
        return Ok(GlobeConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    GlobeConfig::from_json_str(&text).map_err(|e| e.to_string())
}

fn optional<T: Default>(
    what: &str,
    path: Option<&Path>,
    load: impl FnOnce(&Path) -> Result<T, formats::LoadError>,
) -> T {
    path.map(|p| or_degraded(what, load(p))).unwrap_or_default()
}

/// Mounts a globe from files, applies the requested pose and returns the
/// SVG document.
pub fn render_svg(req: &RenderRequest, config: GlobeConfig) -> Result<String, String> {
    let world = load_world(&req.world).map_err(|e| e.to_string())?;
    let names = load_names(&req.names).map_err(|e| e.to_string())?;
    let facts: FactTable = optional("country facts", req.facts.as_deref(), |p| load_facts(p));
    let trips: TripData = optional("trip data", req.trips.as_deref(), |p| load_trip_data(p));

    let mut globe = GlobeView::new(config);
    globe.resize(req.size, req.size);
    globe
        .mount(GlobeData {
            world,
            names,
            facts,
            trips,
            initial_view: Some(req.view),
        })
        .map_err(|e| e.to_string())?;
    globe.set_rotation(req.lon, req.lat);
    globe.set_zoom(req.zoom);

    if req.flick_px != 0.0 {
        play_flick(&mut globe, req.flick_px);
    }
    globe::svg::render_document(&globe).ok_or_else(|| "globe is not mounted".to_string())
}

/// Drags across the globe's center in four quick steps, releases and runs
/// the inertia to rest on a synthetic 60 Hz clock.
fn play_flick(globe: &mut GlobeView, dx: f64) {
    let Some(viewport) = globe.viewport() else {
        return;
    };
    let (x, y) = (viewport.mid, viewport.mid);
    let step = dx / 4.0;
    globe.pointer_down(x, y, 0.0);
    for i in 1..=4 {
        let t = f64::from(i) * 16.0;
        globe.pointer_move(x + step * f64::from(i), y, 0.0, 0.0, t);
    }
    let Some(ticket) = globe.pointer_up(64.0).inertia else {
        return;
    };

    let mut frames = FrameLoop::new(64.0, 1000.0 / 60.0);
    let mut budget = FrameBudget::new(600);
    let summary = frames.run(&mut budget, |frame| match globe.tick_inertia(ticket, frame.now_ms) {
        InertiaTick::Moved(_) | InertiaTick::Waiting => TaskStatus::Continue,
        InertiaTick::Stopped(_) | InertiaTick::Stale => TaskStatus::Done,
    });
    tracing::debug!(frames = summary.frames, finished = summary.finished, "flick settled");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
}

pub fn country_rows(names: &NameTable) -> Vec<CountryRow> {
    names
        .countries()
        .iter()
        .map(|c| CountryRow {
            code: c.code.to_string(),
            name: c.name.clone(),
        })
        .collect()
}

/// `{text}\t{days}` for a period string.
pub fn timeline_line(period: &str) -> String {
    let t = compute_timeline(period);
    format!("{}\t{}", t.text, t.duration_days)
}
