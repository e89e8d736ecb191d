use gloo_net::http::Request;
use serde::Deserialize;
use std::cell::RefCell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use formats::{FactTable, NameTable, TripData, or_degraded, trip_data_from_json_str, world_from_str};
use foundation::CountryId;
use globe::{
    CountryClick, GlobeConfig, GlobeData, GlobeError, GlobeView, NavigationUi, Viewport,
    ViewStateBridge, toggle_visited_on_click,
};
use layers::{Rgb, ViewMode};
use runtime::{FrameClock, TaskTicket};
use scene::WorldGeometry;
use tripstore::{InMemoryTripStore, TripStore, TripStoreError};

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
const STORE_KEY: &str = "tripglobe.profile.v1";

/// Page wiring passed to [`mount_globe`] as JSON.
#[derive(Debug, Clone, Deserialize)]
struct MountOptions {
    /// `<svg>` element that receives the scene.
    svg_id: String,
    tooltip_id: Option<String>,
    /// Element whose text names the active view.
    label_id: Option<String>,
    world_url: String,
    names_url: String,
    facts_url: Option<String>,
    /// Static trip data; when absent trip data comes from the local store.
    trips_url: Option<String>,
    /// Profile to show and, in edit mode, to edit.
    uid: Option<String>,
    /// Whether the page belongs to the signed-in user.
    #[serde(default)]
    own_profile: bool,
    #[serde(default)]
    config: GlobeConfig,
}

#[derive(Debug)]
enum WebTripStore {
    #[cfg(target_arch = "wasm32")]
    Local(tripstore::LocalStorageTripStore),
    Memory(InMemoryTripStore),
}

impl WebTripStore {
    #[cfg(target_arch = "wasm32")]
    fn new() -> Self {
        match tripstore::LocalStorageTripStore::new(STORE_KEY) {
            Ok(s) => WebTripStore::Local(s),
            Err(_) => WebTripStore::Memory(InMemoryTripStore::new()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn new() -> Self {
        WebTripStore::Memory(InMemoryTripStore::new())
    }

    fn as_store(&self) -> &dyn TripStore {
        match self {
            #[cfg(target_arch = "wasm32")]
            WebTripStore::Local(s) => s,
            WebTripStore::Memory(s) => s,
        }
    }

    fn as_store_mut(&mut self) -> &mut dyn TripStore {
        match self {
            #[cfg(target_arch = "wasm32")]
            WebTripStore::Local(s) => s,
            WebTripStore::Memory(s) => s,
        }
    }
}

struct WebState {
    globe: GlobeView,
    svg_id: Option<String>,
    tooltip_id: Option<String>,
    uid: Option<String>,
    store: WebTripStore,
    on_click: Option<js_sys::Function>,
    inertia: Option<TaskTicket>,
    clock: FrameClock,
    frame_pending: bool,
    loading: bool,
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState {
        globe: GlobeView::new(GlobeConfig::default()),
        svg_id: None,
        tooltip_id: None,
        uid: None,
        store: WebTripStore::new(),
        on_click: None,
        inertia: None,
        clock: FrameClock::new(),
        frame_pending: false,
        loading: false,
    });
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<WebState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{context}: {err:?}")));
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// View persisted in `location.hash`.
struct LocationHash;

impl ViewStateBridge for LocationHash {
    fn initial_view(&self) -> ViewMode {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        ViewMode::from_hash(&hash)
    }

    fn persist_view(&mut self, view: ViewMode) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash(&view.to_hash());
        }
    }
}

/// View tabs marked with `data-view="..."` plus an optional label element.
struct DomNavigation {
    label_id: Option<String>,
}

impl NavigationUi for DomNavigation {
    fn set_active_view(&mut self, view: ViewMode) {
        let Some(nodes) = document().and_then(|d| d.query_selector_all("[data-view]").ok()) else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
                continue;
            };
            let active = el.get_attribute("data-view").as_deref() == Some(view.as_str());
            let _ = el.class_list().toggle_with_force("is-active", active);
        }
    }

    fn set_view_label(&mut self, label: &str) {
        let Some(id) = self.label_id.as_deref() else {
            return;
        };
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(label));
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url).send().await.map_err(js_err)?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "GET {url} failed: {}",
            resp.status()
        )));
    }
    resp.text().await.map_err(js_err)
}

/// Fetches optional JSON, degrading to the default on any failure.
async fn fetch_optional<T, F>(what: &str, url: Option<&str>, parse: F) -> T
where
    T: Default,
    F: FnOnce(&str) -> Result<T, formats::LoadError>,
{
    let Some(url) = url else {
        return T::default();
    };
    match fetch_text(url).await {
        Ok(text) => or_degraded(what, parse(&text)),
        Err(err) => {
            log_error(&format!("{what} unavailable"), &err);
            T::default()
        }
    }
}

fn stored_trips(store: &dyn TripStore, uid: Option<&str>, own_profile: bool) -> TripData {
    let Some(uid) = uid else {
        return TripData::empty();
    };
    let viewer = own_profile.then_some(uid);
    match tripstore::load_trip_data(store, uid, viewer) {
        Ok(trips) => trips,
        Err(err) => {
            log_error("trip data unavailable", &js_err(err));
            TripData::empty()
        }
    }
}

async fn load_and_mount(options: MountOptions) -> Result<(), JsValue> {
    let world_text = fetch_text(&options.world_url).await?;
    let world = world_from_str(&world_text).map_err(js_err)?;
    let names_text = fetch_text(&options.names_url).await?;
    let names = NameTable::from_tsv(&names_text).map_err(js_err)?;
    let facts = fetch_optional("country facts", options.facts_url.as_deref(), |t| {
        FactTable::from_json_str(t)
    })
    .await;
    let from_url = match options.trips_url.as_deref() {
        Some(url) => Some(fetch_optional("trip data", Some(url), trip_data_from_json_str).await),
        None => None,
    };

    with_state(|state| {
        let mut s = state.borrow_mut();
        Some(install_globe(&mut s, &options, world, names, facts, from_url))
    })
    .unwrap_or(Ok(()))?;

    sync_dom();
    Ok(())
}

fn install_globe(
    s: &mut WebState,
    options: &MountOptions,
    world: WorldGeometry,
    names: NameTable,
    facts: FactTable,
    from_url: Option<TripData>,
) -> Result<(), JsValue> {
    let trips = match from_url {
        Some(trips) => trips,
        None => stored_trips(s.store.as_store(), options.uid.as_deref(), options.own_profile),
    };

    let mut globe = GlobeView::with_bridges(
        options.config.clone(),
        Box::new(LocationHash),
        Box::new(DomNavigation {
            label_id: options.label_id.clone(),
        }),
    );
    if let Some(svg) = document().and_then(|d| d.get_element_by_id(&options.svg_id)) {
        let rect = svg.get_bounding_client_rect();
        globe.resize(rect.width(), rect.height());
    }
    globe
        .mount(GlobeData {
            world,
            names,
            facts,
            trips,
            initial_view: None,
        })
        .map_err(js_err)?;
    globe.set_own_profile(options.own_profile);

    s.globe = globe;
    s.svg_id = Some(options.svg_id.clone());
    s.tooltip_id = options.tooltip_id.clone();
    s.uid = options.uid.clone();
    s.inertia = None;
    Ok(())
}

/// Loads data and mounts the globe. `options_json` describes the page (see
/// `MountOptions`); failures are logged to the console.
#[wasm_bindgen]
pub fn mount_globe(options_json: &str) -> Result<(), JsValue> {
    let options: MountOptions = serde_json::from_str(options_json).map_err(js_err)?;
    let busy = with_state(|state| {
        let mut s = state.borrow_mut();
        let busy = s.loading || s.globe.is_mounted();
        if !busy {
            s.loading = true;
        }
        busy
    });
    if busy {
        return Err(JsValue::from_str("globe is already mounted"));
    }

    spawn_local(async move {
        if let Err(err) = load_and_mount(options).await {
            log_error("Failed to mount globe", &err);
        }
        with_state(|state| state.borrow_mut().loading = false);
    });
    Ok(())
}

#[wasm_bindgen]
pub fn unmount_globe() {
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.globe.unmount();
        s.inertia = None;
    });
    sync_dom();
}

#[wasm_bindgen]
pub fn resize_globe(width: f64, height: f64) {
    with_state(|state| {
        state.borrow_mut().globe.resize(width, height);
    });
    sync_dom();
}

#[wasm_bindgen]
pub fn set_view(name: &str) -> Result<(), JsValue> {
    let view = ViewMode::parse(name).unwrap_or_default();
    with_state(|state| Some(state.borrow_mut().globe.set_view(view, now_ms())))
        .transpose()
        .map_err(js_err)?;
    schedule_frame();
    Ok(())
}

/// Edit mode applies to the profile given at mount.
#[wasm_bindgen]
pub fn set_edit_mode(enabled: bool) {
    with_state(|state| state.borrow_mut().globe.set_edit_mode(enabled));
}

/// Replaces the default click-to-toggle behaviour. The callback receives the
/// normalized country id.
#[wasm_bindgen]
pub fn set_on_country_click(callback: Option<js_sys::Function>) {
    with_state(|state| state.borrow_mut().on_click = callback);
}

#[wasm_bindgen]
pub fn flash_country(id: &str, color: Option<String>) -> u32 {
    let Some(id) = CountryId::normalize(id) else {
        return 0;
    };
    let color = color.as_deref().and_then(Rgb::parse_hex);
    let flashed = with_state(|state| state.borrow_mut().globe.flash_country(&id, color, now_ms()));
    schedule_frame();
    u32::try_from(flashed).unwrap_or(u32::MAX)
}

/// Replaces trip data from a `{"visited": [...], "records": [...]}` document.
#[wasm_bindgen]
pub fn update_trip_data(json: &str) -> Result<(), JsValue> {
    let trips = trip_data_from_json_str(json).map_err(js_err)?;
    replace_trip_data(trips, now_ms()).map_err(js_err)?;
    schedule_frame();
    Ok(())
}

fn replace_trip_data(trips: TripData, now: f64) -> Result<(), GlobeError> {
    with_state(|state| Some(state.borrow_mut().globe.update_trip_data(trips, now)))
        .unwrap_or(Err(GlobeError::NotMounted))
}

/// Marks the stored profile public or private.
#[wasm_bindgen]
pub fn set_profile_public(public: bool) -> Result<(), JsValue> {
    with_state(|state| {
        let mut s = state.borrow_mut();
        let Some(uid) = s.uid.clone() else {
            return Some(Err(TripStoreError::NotFound));
        };
        Some(s.store.as_store_mut().set_public(&uid, public))
    })
    .unwrap_or(Err(TripStoreError::StorageUnavailable))
    .map_err(js_err)
}

/// Pointer coordinates are relative to the `<svg>` element.
#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) {
    with_state(|state| {
        let mut s = state.borrow_mut();
        s.globe.pointer_down(x, y, now_ms());
        s.inertia = None;
    });
    sync_dom();
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64, page_x: f64, page_y: f64) {
    with_state(|state| state.borrow_mut().globe.pointer_move(x, y, page_x, page_y, now_ms()));
    schedule_frame();
}

#[wasm_bindgen]
pub fn pointer_up() {
    let click = with_state(|state| {
        let mut s = state.borrow_mut();
        let up = s.globe.pointer_up(now_ms());
        s.inertia = up.inertia;
        up.click
    });
    if let Some(click) = click {
        handle_click(click);
    }
    schedule_frame();
}

#[wasm_bindgen]
pub fn pointer_leave() {
    with_state(|state| state.borrow_mut().globe.pointer_leave(now_ms()));
    schedule_frame();
}

#[wasm_bindgen]
pub fn wheel(delta_y: f64) -> f64 {
    let k = with_state(|state| state.borrow_mut().globe.wheel(delta_y)).unwrap_or(1.0);
    sync_dom();
    k
}

/// Called with the state borrow released so the callback may call back in.
fn handle_click(click: CountryClick) {
    let callback = with_state(|state| state.borrow().on_click.clone());
    if let Some(callback) = callback {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(click.id.as_str())) {
            log_error("country click handler failed", &err);
        }
        return;
    }

    let result = with_state(|state| {
        let mut s = state.borrow_mut();
        let Some(uid) = s.uid.clone() else {
            return None;
        };
        let WebState { globe, store, .. } = &mut *s;
        Some(toggle_visited_on_click(
            globe,
            store.as_store_mut(),
            &uid,
            &click.id,
            now_ms(),
        ))
    });
    if let Some(Err(err)) = result {
        log_error("could not save visited country", &js_err(err));
    }
}

fn schedule_frame() {
    let already = with_state(|state| {
        let mut s = state.borrow_mut();
        std::mem::replace(&mut s.frame_pending, true)
    });
    if already {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move |ts: f64| on_frame(ts));
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        log_error("requestAnimationFrame failed", &err);
        with_state(|state| state.borrow_mut().frame_pending = false);
    }
}

fn on_frame(now: f64) {
    let more = with_state(|state| {
        let mut s = state.borrow_mut();
        s.frame_pending = false;
        let frame = s.clock.advance(now);
        let mut more = false;
        if let Some(ticket) = s.inertia {
            let tick = s.globe.tick_inertia(ticket, frame.now_ms);
            if tick.wants_next_frame() {
                more = true;
            } else {
                s.inertia = None;
            }
        }
        more |= s.globe.animate(frame.now_ms);
        if !more {
            s.clock.reset();
        }
        more
    });
    sync_dom();
    if more {
        schedule_frame();
    }
}

/// Writes the scene and tooltip into the page if anything changed.
fn sync_dom() {
    let update = with_state(|state| {
        let mut s = state.borrow_mut();
        if !s.globe.take_redraw() {
            return None;
        }
        let content = globe::svg::render_content(&s.globe).unwrap_or_default();
        let viewport = s.globe.viewport();
        let tooltip = s.globe.tooltip().cloned();
        Some((s.svg_id.clone(), s.tooltip_id.clone(), content, viewport, tooltip))
    });
    let Some((svg_id, tooltip_id, content, viewport, tooltip)) = update else {
        return;
    };
    let Some(doc) = document() else {
        return;
    };

    if let Some(svg) = svg_id.and_then(|id| doc.get_element_by_id(&id)) {
        if let Some(viewport) = viewport {
            let side = viewport.size.to_string();
            let _ = svg.set_attribute("width", &side);
            let _ = svg.set_attribute("height", &side);
            let _ = svg.set_attribute("viewBox", &format!("0 0 {side} {side}"));
            if let Some(svg) = svg.dyn_ref::<web_sys::SvgElement>() {
                let style = svg.style();
                for (property, value) in placement(&viewport) {
                    let _ = style.set_property(property, &value);
                }
            }
        }
        svg.set_inner_html(&content);
    }

    let Some(el) = tooltip_id
        .and_then(|id| doc.get_element_by_id(&id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    let style = el.style();
    match tooltip {
        Some(t) => {
            el.set_inner_html(&t.html);
            let _ = style.set_property("left", &format!("{}px", t.left));
            let _ = style.set_property("top", &format!("{}px", t.top));
            let _ = style.set_property("opacity", "1");
        }
        None => {
            let _ = style.set_property("opacity", "0");
        }
    }
}

/// Inline style that centres the square scene inside its container.
fn placement(viewport: &Viewport) -> [(&'static str, String); 2] {
    [
        ("left", format!("{}px", viewport.left)),
        ("top", format!("{}px", viewport.top)),
    ]
}
