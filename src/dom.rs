use crate::settings::{Persistence, StorageError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Event listener that is removed from its target when dropped.
pub struct EventListener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Listener for a control that lives as long as the page.
#[inline]
pub fn add_listener(
    document: &web::Document,
    element_id: &str,
    kind: &'static str,
    handler: impl FnMut(web::Event) + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        std::mem::forget(EventListener::new(&el, kind, handler));
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        if canvas.width() != w_px.max(1) || canvas.height() != h_px.max(1) {
            canvas.set_width(w_px.max(1));
            canvas.set_height(h_px.max(1));
        }
    }
}

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub fn reduced_motion_query() -> Option<web::MediaQueryList> {
    web::window().and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
}

pub fn prefers_reduced_motion() -> bool {
    reduced_motion_query().map(|q| q.matches()).unwrap_or(false)
}

/// Calls `on_change` with the new answer whenever the OS preference flips.
pub fn watch_reduced_motion(mut on_change: impl FnMut(bool) + 'static) -> Option<EventListener> {
    let query = reduced_motion_query()?;
    let q = query.clone();
    Some(EventListener::new(&query, "change", move |_| {
        on_change(q.matches())
    }))
}

/// `navigator.deviceMemory` in GB, where the browser exposes it.
pub fn device_memory_gb() -> Option<f64> {
    let navigator = web::window()?.navigator();
    js_sys::Reflect::get(&navigator, &"deviceMemory".into())
        .ok()
        .and_then(|v| v.as_f64())
}

/// `window.localStorage` behind the settings persistence seam.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web::Storage, StorageError> {
        web::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl Persistence for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{:?}", e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

pub fn set_hidden(el: &web::Element, hidden: bool) {
    let classes = el.class_list();
    if hidden {
        _ = classes.add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    } else {
        _ = classes.remove_1("hidden");
        _ = el.remove_attribute("style");
    }
}
