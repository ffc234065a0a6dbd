//! Browser frontend: wires the page's DOM and a Leaflet map to the controller.
//!
//! The page provides the markup (`#map`, `#loginModal`, `#markerForm`, ...)
//! and loads Leaflet as the global `L`.

use std::cell::RefCell;
use std::rc::Rc;

use geomark_core::{Event, FormSize, LatLng, MarkerColor, MarkerIcon, ScreenPoint, Viewport};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, MouseEvent, Node,
};

use crate::config::AppConfig;
use crate::constants::TITLE_FLASH_DURATION;
use crate::controller::Controller;
use crate::map::{MapSettings, MapSurface};
use crate::ui::{PlaceButton, UiEvent, UiSurface};

type Shared = Rc<RefCell<Controller<BrowserSurface>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let stored = AppConfig::load_from_local_storage();
    let config = match &stored {
        Ok(Some(config)) => config.clone(),
        _ => AppConfig::default(),
    };
    let level = config
        .preferences
        .log_level
        .to_level_filter()
        .to_level()
        .unwrap_or(log::Level::Info);
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::log_1(&format!("Logger already set: {}", e).into());
    }

    match stored {
        Ok(Some(_)) => {}
        // Seed the defaults so they can be edited from the browser's devtools
        Ok(None) => {
            if let Err(e) = config.save_to_local_storage() {
                log::warn!("{}", e);
            }
        }
        Err(e) => log::warn!("Using default configuration: {}", e),
    }

    if let Err(e) = mount(config) {
        log::error!("Failed to start GeoMark: {:?}", e);
    }
}

// ============================================================================
// Leaflet helpers
// ============================================================================

/// Call `target.method(...args)`.
fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    function.apply(target, &args.iter().collect::<Array>())
}

fn lat_lng(p: LatLng) -> JsValue {
    Array::of2(&p.lat.into(), &p.lng.into()).into()
}

fn pair<T: Into<JsValue>>(a: T, b: T) -> JsValue {
    Array::of2(&a.into(), &b.into()).into()
}

fn object(entries: &[(&str, JsValue)]) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    for (key, value) in entries {
        Reflect::set(&obj, &JsValue::from_str(key), value)?;
    }
    Ok(obj.into())
}

fn create_map(leaflet: &JsValue, settings: &MapSettings) -> Result<JsValue, JsValue> {
    let bounds = settings.bounds();
    let max_bounds = call(
        leaflet,
        "latLngBounds",
        &[lat_lng(bounds.south_west), lat_lng(bounds.north_east)],
    )?;
    let options = object(&[
        ("center", lat_lng(settings.center)),
        ("zoom", settings.zoom.into()),
        ("maxBounds", max_bounds),
        ("maxBoundsViscosity", settings.bounds_viscosity.into()),
        ("zoomControl", true.into()),
    ])?;
    let map = call(leaflet, "map", &["map".into(), options])?;

    let tiles = call(
        leaflet,
        "tileLayer",
        &[
            settings.tile_url.as_str().into(),
            object(&[("attribution", settings.attribution.as_str().into())])?,
        ],
    )?;
    call(&tiles, "addTo", &[map.clone()])?;
    call(&map, "setMinZoom", &[settings.min_zoom.into()])?;
    Ok(map)
}

// ============================================================================
// Surface
// ============================================================================

pub struct BrowserSurface {
    document: Document,
    leaflet: JsValue,
    map: JsValue,
}

impl BrowserSurface {
    fn element<T: JsCast>(&self, id: &str) -> Option<T> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            log::warn!("Missing element #{}", id);
        }
        element?.dyn_into::<T>().ok()
    }

    fn set_style(&self, id: &str, property: &str, value: &str) {
        if let Some(el) = self.element::<HtmlElement>(id) {
            el.style().set_property(property, value).ok();
        }
    }

    fn place(&self, origin: ScreenPoint) {
        self.set_style("markerForm", "left", &format!("{}px", origin.x));
        self.set_style("markerForm", "top", &format!("{}px", origin.y));
    }

    fn pin(&self, position: LatLng, options: JsValue, popup: &str) -> Result<JsValue, JsValue> {
        let marker = call(&self.leaflet, "marker", &[lat_lng(position), options])?;
        call(&marker, "addTo", &[self.map.clone()])?;
        call(&marker, "bindPopup", &[popup.into()])?;
        Ok(marker)
    }
}

impl MapSurface for BrowserSurface {
    fn add_marker(&mut self, position: LatLng, icon: &MarkerIcon, popup_html: &str) {
        let result = object(&[
            ("iconUrl", icon.url.into()),
            ("iconSize", pair(icon.size.0, icon.size.1)),
            ("iconAnchor", pair(icon.anchor.0, icon.anchor.1)),
            ("popupAnchor", pair(icon.popup_anchor.0, icon.popup_anchor.1)),
        ])
        .and_then(|options| call(&self.leaflet, "icon", &[options]))
        .and_then(|icon| object(&[("icon", icon)]))
        .and_then(|options| self.pin(position, options, popup_html));

        if let Err(e) = result {
            log::error!("Failed to add marker at {}: {:?}", position, e);
        }
    }

    fn add_landmark(&mut self, position: LatLng, popup_text: &str) {
        let result = self
            .pin(position, Object::new().into(), popup_text)
            .and_then(|marker| call(&marker, "openPopup", &[]));
        if let Err(e) = result {
            log::error!("Failed to add landmark: {:?}", e);
        }
    }
}

impl UiSurface for BrowserSurface {
    fn set_login_prompt_visible(&mut self, visible: bool) {
        self.set_style("loginModal", "display", if visible { "flex" } else { "none" });
    }

    fn show_login_error(&mut self) {
        self.set_style("loginError", "display", "block");
    }

    fn set_logout_visible(&mut self, visible: bool) {
        self.set_style("logoutBtn", "display", if visible { "block" } else { "none" });
    }

    fn set_place_button(&mut self, state: PlaceButton) {
        if let Some(button) = self.element::<HtmlButtonElement>("putMarkerBtn") {
            button.set_text_content(Some(state.label()));
            button.set_disabled(!state.enabled());
        }
    }

    fn open_form(&mut self, origin: ScreenPoint) {
        self.set_style("markerForm", "display", "block");
        self.place(origin);
        if let Some(color) = self.element::<HtmlSelectElement>("markerColor") {
            color.set_value(MarkerColor::default().name());
        }
        if let Some(note) = self.element::<HtmlTextAreaElement>("markerNote") {
            note.set_value("");
        }
        if let Some(title) = self.element::<HtmlInputElement>("markerTitle") {
            title.set_value("");
            title.focus().ok();
        }
    }

    fn move_form(&mut self, origin: ScreenPoint) {
        self.place(origin);
    }

    fn close_form(&mut self) {
        self.set_style("markerForm", "display", "none");
    }

    fn set_title_invalid(&mut self, invalid: bool) {
        let border = if invalid { "2px solid #d32f2f" } else { "" };
        self.set_style("markerTitle", "border", border);
        if invalid {
            if let Some(title) = self.element::<HtmlInputElement>("markerTitle") {
                title.focus().ok();
            }
        }
    }
}

// ============================================================================
// Event wiring
// ============================================================================

fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
}

fn input_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn client_point(event: &web_sys::Event) -> Option<ScreenPoint> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(ScreenPoint::new(mouse.client_x() as f32, mouse.client_y() as f32))
}

fn window_viewport(window: &web_sys::Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or_default() as f32
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn set_user_select(document: &Document, value: &str) {
    if let Some(body) = document.body() {
        body.style().set_property("user-select", value).ok();
    }
}

/// Clear the title highlight once its delay has passed.
fn schedule_title_reset(window: &web_sys::Window, shared: &Shared) {
    let shared = shared.clone();
    let callback = Closure::once_into_js(move || {
        shared.borrow_mut().tick(web_time::Instant::now());
    });
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        TITLE_FLASH_DURATION.as_millis() as i32,
    ) {
        log::warn!("Failed to schedule title reset: {:?}", e);
    }
}

fn mount(config: AppConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))?;

    let leaflet = Reflect::get(&window, &JsValue::from_str("L"))?;
    if leaflet.is_undefined() {
        return Err(JsValue::from_str("Leaflet (global L) is not loaded"));
    }
    let map = create_map(&leaflet, &config.map)?;

    let surface = BrowserSurface {
        document: document.clone(),
        leaflet,
        map: map.clone(),
    };
    let controller = Controller::new(
        config.map.clone(),
        Box::new(config.auth.verifier()),
        surface,
        window_viewport(&window),
    )
    .with_form_size(config.form.size());
    let shared: Shared = Rc::new(RefCell::new(controller));
    let dispatch = {
        let shared = shared.clone();
        move |event: UiEvent| {
            shared.borrow_mut().dispatch(event);
        }
    };

    // Put Marker
    let d = dispatch.clone();
    listen(&by_id(&document, "putMarkerBtn")?, "click", move |_| {
        d(Event::PlaceMarkerRequested.into())
    })?;

    // Login overlay: clicking the backdrop (not the box) dismisses it
    let modal = by_id(&document, "loginModal")?;
    let modal_js: JsValue = modal.clone().into();
    let d = dispatch.clone();
    listen(&modal, "mousedown", move |e| {
        if e.target().is_some_and(|t| JsValue::from(t) == modal_js) {
            d(Event::LoginDismissed.into());
        }
    })?;

    let d = dispatch.clone();
    let doc = document.clone();
    listen(&by_id(&document, "loginForm")?, "submit", move |e| {
        e.prevent_default();
        if let Some(error) = doc
            .get_element_by_id("loginError")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            error.style().set_property("display", "none").ok();
        }
        d(Event::LoginSubmitted {
            username: input_value(&doc, "username"),
            password: input_value(&doc, "password"),
        }
        .into());
    })?;

    let d = dispatch.clone();
    listen(&by_id(&document, "logoutBtn")?, "click", move |_| {
        d(Event::LogoutRequested.into())
    })?;

    // Map clicks come from Leaflet, not the DOM
    let on_click = {
        let shared = shared.clone();
        let doc = document.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
            let Some(position) = leaflet_click_position(&e) else {
                log::warn!("Map click without coordinates");
                return;
            };
            let original = Reflect::get(&e, &JsValue::from_str("originalEvent")).unwrap_or_default();
            let page = |key: &str| {
                Reflect::get(&original, &JsValue::from_str(key))
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or_default() as f32
            };
            let screen = ScreenPoint::new(page("pageX"), page("pageY"));

            let mut controller = shared.borrow_mut();
            controller.dispatch(Event::MapClicked { position, screen }.into());
            if controller.form_origin().is_some() {
                if let Some(form) = doc
                    .get_element_by_id("markerForm")
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    let size = FormSize::new(form.offset_width() as f32, form.offset_height() as f32);
                    if size.width > 0.0 && size.height > 0.0 {
                        controller.dispatch(UiEvent::FormMeasured(size));
                    }
                }
            }
        })
    };
    call(&map, "on", &["click".into(), on_click.as_ref().clone()])?;
    on_click.forget();

    // Authoring form
    let form = by_id(&document, "markerForm")?;
    let doc = document.clone();
    let shared_submit = shared.clone();
    let win = window.clone();
    listen(&form, "submit", move |e| {
        e.prevent_default();
        let title = input_value(&doc, "markerTitle");
        let color = doc
            .get_element_by_id("markerColor")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .map(|select| select.value())
            .unwrap_or_default();
        let color = color.parse::<MarkerColor>().unwrap_or_else(|e| {
            log::warn!("{}; using red", e);
            MarkerColor::default()
        });
        let note = doc
            .get_element_by_id("markerNote")
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
            .map(|area| area.value())
            .unwrap_or_default();

        let flagged = {
            let mut controller = shared_submit.borrow_mut();
            controller.dispatch(Event::FormSubmitted { title, color, note }.into());
            controller.is_title_flagged()
        };
        if flagged {
            schedule_title_reset(&win, &shared_submit);
        }
    })?;

    let d = dispatch.clone();
    listen(&by_id(&document, "cancelMarker")?, "click", move |_| {
        d(Event::FormCancelled.into())
    })?;

    // Dragging by the header
    let d = dispatch.clone();
    let doc = document.clone();
    listen(&by_id(&document, "markerFormHeader")?, "mousedown", move |e| {
        if let Some(pointer) = client_point(&e) {
            set_user_select(&doc, "none");
            d(UiEvent::HeaderPressed(pointer));
        }
    })?;

    let d = dispatch.clone();
    listen(&document, "mousemove", move |e| {
        if let Some(pointer) = client_point(&e) {
            d(UiEvent::PointerMoved(pointer));
        }
    })?;

    let d = dispatch.clone();
    let doc = document.clone();
    listen(&document, "mouseup", move |_| {
        set_user_select(&doc, "");
        d(UiEvent::PointerReleased);
    })?;

    // Pressing anywhere outside the open form dismisses it
    let shared_outside = shared.clone();
    let form_node: Node = form.clone().into();
    listen(&document, "mousedown", move |e| {
        let inside = e
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|node| form_node.contains(Some(&node)));
        let mut controller = shared_outside.borrow_mut();
        if !inside && controller.form_origin().is_some() {
            controller.dispatch(Event::OutsideFormPressed.into());
        }
    })?;

    let d = dispatch.clone();
    listen(&document, "keydown", move |e| {
        if let Some(key) = e.dyn_ref::<web_sys::KeyboardEvent>() {
            if key.key() == "Escape" {
                d(Event::PlacementCancelled.into());
            }
        }
    })?;

    let win = window.clone();
    listen(&window, "resize", move |_| {
        dispatch(UiEvent::ViewportResized(window_viewport(&win)));
    })?;

    log::info!("GeoMark ready");
    Ok(())
}

fn leaflet_click_position(event: &JsValue) -> Option<LatLng> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}
