//! Decorative 3D scenes for a portfolio site.
//!
//! The hero page gets a ring of floating orbs, the about page a holographic
//! face. Everything that decides *what* to draw (preferences, loader state,
//! scene layout, per-frame animation, post chain, audio smoothing, API
//! handlers) is plain Rust and builds on any target; the browser glue
//! (DOM, wgpu, Web Audio, requestAnimationFrame) only builds for wasm32.

pub mod animator;
pub mod api;
pub mod audio;
pub mod camera;
pub mod constants;
pub mod loader;
pub mod post;
pub mod probe;
pub mod scene;
pub mod settings;

#[cfg(target_arch = "wasm32")]
mod controls;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod mount;
#[cfg(target_arch = "wasm32")]
mod placeholder;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use entry::{mount_scene, start, SceneHandle};

#[cfg(target_arch = "wasm32")]
mod entry {
    use crate::dom::{self, LocalStorage};
    use crate::mount::SceneMount;
    use crate::scene::SceneKind;
    use crate::settings::{EnvironmentSignals, SettingsHandle, SettingsStore};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys as web;

    struct App {
        store: SettingsHandle<LocalStorage>,
        reduced_motion: Rc<Cell<bool>>,
        mounts: Vec<SceneMount>,
    }

    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    /// Handle for a scene mounted from page script.
    #[wasm_bindgen]
    pub struct SceneHandle {
        inner: Option<SceneMount>,
    }

    #[wasm_bindgen]
    impl SceneHandle {
        pub fn unmount(&mut self) {
            if let Some(mut mount) = self.inner.take() {
                mount.unmount();
            }
        }
    }

    fn mount_container(app: &App, container: web::Element, kind: SceneKind) -> SceneMount {
        SceneMount::mount(
            container,
            kind,
            app.store.clone(),
            app.reduced_motion.clone(),
        )
    }

    /// Mount `kind` ("hero" | "about") into the element with `container_id`.
    #[wasm_bindgen]
    pub fn mount_scene(container_id: &str, kind: &str) -> Result<SceneHandle, JsValue> {
        let kind = SceneKind::from_attr(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown scene kind {kind:?}")))?;
        let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?;
        APP.with(|app| {
            let app = app.borrow();
            let app = app
                .as_ref()
                .ok_or_else(|| JsValue::from_str("scenes not started"))?;
            Ok(SceneHandle {
                inner: Some(mount_container(app, container, kind)),
            })
        })
    }

    fn mount_declared(document: &web::Document, app: &mut App) {
        let Ok(nodes) = document.query_selector_all("[data-scene]") else {
            return;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
                continue;
            };
            let attr = el.get_attribute("data-scene").unwrap_or_default();
            match SceneKind::from_attr(&attr) {
                Some(kind) => {
                    let mount = mount_container(app, el, kind);
                    app.mounts.push(mount);
                }
                None => log::warn!("[start] unknown data-scene={:?}", attr),
            }
        }
    }

    fn hydrate_after_first_paint(store: SettingsHandle<LocalStorage>) {
        let Some(window) = web::window() else {
            return;
        };
        let cb = Closure::once_into_js(move || {
            let env = EnvironmentSignals {
                prefers_reduced_motion: dom::prefers_reduced_motion(),
                device_memory_gb: dom::device_memory_gb(),
            };
            store.borrow_mut().hydrate(env);
        });
        _ = window.request_animation_frame(cb.unchecked_ref());
    }

    fn unmount_all() {
        APP.with(|app| {
            if let Some(app) = app.borrow_mut().as_mut() {
                for mut mount in app.mounts.drain(..) {
                    mount.unmount();
                }
            }
        });
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        _ = console_log::init_with_level(log::Level::Info);

        let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
        let store = SettingsStore::new(LocalStorage).into_handle();

        let reduced_motion = Rc::new(Cell::new(dom::prefers_reduced_motion()));
        let rm = reduced_motion.clone();
        if let Some(listener) = dom::watch_reduced_motion(move |on| {
            log::info!("[start] reduced motion={}", on);
            rm.set(on);
        }) {
            // Page-lifetime listener.
            std::mem::forget(listener);
        }

        crate::controls::wire(&document, &store);

        let mut app = App {
            store: store.clone(),
            reduced_motion,
            mounts: Vec::new(),
        };
        mount_declared(&document, &mut app);
        log::info!("[start] mounted {} scene(s)", app.mounts.len());
        APP.with(|slot| *slot.borrow_mut() = Some(app));

        if let Some(window) = web::window() {
            std::mem::forget(dom::EventListener::new(&window, "pagehide", |_| {
                unmount_all()
            }));
        }

        hydrate_after_first_paint(store);
        Ok(())
    }
}
