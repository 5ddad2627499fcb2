//! One decorative scene bound to a container element.
//!
//! `SceneMount` hosts the [`SceneLoader`] state machine: it performs the
//! actions the loader asks for (probe, visibility observer, GPU init, frame
//! loop) and releases all of them synchronously on unmount.

use crate::audio::{request_microphone, AudioReactiveSource};
use crate::constants::VISIBILITY_THRESHOLD;
use crate::dom::{EventListener, LocalStorage};
use crate::frame::{FrameContext, FrameLoop, SharedInputs};
use crate::loader::{LoadError, LoaderAction, SceneLoader};
use crate::placeholder;
use crate::probe::{GraphicsProbe, WebGlProbe};
use crate::render::GpuState;
use crate::scene::SceneKind;
use crate::settings::{SettingsHandle, SubscriptionId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

/// State reachable from async tasks and DOM callbacks.
struct MountShared {
    kind: SceneKind,
    container: web::Element,
    loader: RefCell<SceneLoader>,
    inputs: SharedInputs,
    observer: RefCell<Option<(web::IntersectionObserver, ObserverCallback)>>,
    canvas: RefCell<Option<web::HtmlCanvasElement>>,
    frame_loop: RefCell<Option<FrameLoop>>,
}

pub struct SceneMount {
    shared: Rc<MountShared>,
    store: SettingsHandle<LocalStorage>,
    subscription: Option<SubscriptionId>,
    _listeners: Vec<EventListener>,
}

impl SceneMount {
    pub fn mount(
        container: web::Element,
        kind: SceneKind,
        store: SettingsHandle<LocalStorage>,
        reduced_motion: Rc<Cell<bool>>,
    ) -> Self {
        let inputs = SharedInputs {
            settings: Rc::new(Cell::new(store.borrow().settings())),
            reduced_motion,
            hovered: Rc::new(Cell::new(false)),
            audio: Rc::new(RefCell::new(AudioReactiveSource::new())),
        };
        let shared = Rc::new(MountShared {
            kind,
            container: container.clone(),
            loader: RefCell::new(SceneLoader::new()),
            inputs: inputs.clone(),
            observer: RefCell::new(None),
            canvas: RefCell::new(None),
            frame_loop: RefCell::new(None),
        });

        let hovered_in = inputs.hovered.clone();
        let hovered_out = inputs.hovered.clone();
        let listeners = vec![
            EventListener::new(&container, "pointerenter", move |_| hovered_in.set(true)),
            EventListener::new(&container, "pointerleave", move |_| hovered_out.set(false)),
        ];

        let weak = Rc::downgrade(&shared);
        let subscription = store.borrow_mut().subscribe(move |s| {
            if let Some(shared) = weak.upgrade() {
                shared.inputs.settings.set(*s);
                sync_audio(&shared);
            }
        });

        let mount = Self {
            shared,
            store,
            subscription: Some(subscription),
            _listeners: listeners,
        };
        placeholder::show(&container, kind);
        let action = mount.shared.loader.borrow_mut().mount(true);
        perform(&mount.shared, action);
        log::info!("[mount] {:?} state={:?}", kind, mount.shared.loader.borrow().state());
        mount
    }

    pub fn kind(&self) -> SceneKind {
        self.shared.kind
    }

    pub fn unmount(&mut self) {
        let action = self.shared.loader.borrow_mut().unmount();
        perform(&self.shared, action);
        self.shared.inputs.audio.borrow_mut().stop();
        if let Some(id) = self.subscription.take() {
            if let Ok(mut store) = self.store.try_borrow_mut() {
                store.unsubscribe(id);
            }
        }
        log::info!("[mount] {:?} unmounted", self.shared.kind);
    }
}

impl Drop for SceneMount {
    fn drop(&mut self) {
        if self.subscription.is_some() {
            self.unmount();
        }
    }
}

/// Start or stop the microphone to match the current settings and loader state.
fn sync_audio(shared: &MountShared) {
    let settings = shared.inputs.settings.get();
    let Ok(wanted) = shared.loader.try_borrow().map(|l| l.wants_audio(&settings)) else {
        return;
    };
    let Ok(mut source) = shared.inputs.audio.try_borrow_mut() else {
        return;
    };
    if !source.sync(wanted) {
        return;
    }
    drop(source);
    let audio = shared.inputs.audio.clone();
    spawn_local(async move {
        let result = request_microphone().await;
        audio.borrow_mut().attach(result);
    });
}

fn perform(shared: &Rc<MountShared>, action: LoaderAction) {
    match action {
        LoaderAction::None | LoaderAction::KeepPlaceholder => {}
        LoaderAction::ShowPlaceholder => placeholder::show(&shared.container, shared.kind),
        LoaderAction::RunProbe => {
            let supported = WebGlProbe.supports_hardware_graphics();
            let next = shared.loader.borrow_mut().probe_resolved(supported);
            perform(shared, next);
        }
        LoaderAction::ShowFallback => {
            placeholder::show_unsupported(&shared.container, shared.kind)
        }
        LoaderAction::ObserveVisibility => match observe(shared) {
            Ok(()) => {
                let next = shared.loader.borrow_mut().observer_attached();
                perform(shared, next);
            }
            Err(e) => {
                log::warn!("[mount] visibility observer unavailable: {:?}", e);
                let next = shared.loader.borrow_mut().visibility_unobservable();
                perform(shared, next);
            }
        },
        LoaderAction::BeginLoad => {
            disconnect_observer(shared);
            begin_load(shared.clone());
        }
        LoaderAction::StartFrameLoop => {}
        LoaderAction::Teardown(teardown) => {
            if let Some(frame_loop) = shared.frame_loop.borrow_mut().take() {
                frame_loop.stop();
            }
            if teardown.disconnect_observer || shared.observer.borrow().is_some() {
                disconnect_observer(shared);
            }
            if let Some(canvas) = shared.canvas.borrow_mut().take() {
                canvas.remove();
            }
        }
    }
}

fn observe(shared: &Rc<MountShared>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    let callback: ObserverCallback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                    continue;
                };
                let action = shared
                    .loader
                    .borrow_mut()
                    .on_intersection(entry.is_intersecting(), entry.intersection_ratio() as f32);
                if action != LoaderAction::None {
                    perform(&shared, action);
                    break;
                }
            }
        },
    ));
    let init = web::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD as f64));
    let observer = web::IntersectionObserver::new_with_options(
        callback.as_ref().unchecked_ref(),
        &init,
    )?;
    observer.observe(&shared.container);
    *shared.observer.borrow_mut() = Some((observer, callback));
    Ok(())
}

fn disconnect_observer(shared: &MountShared) {
    // The callback may be running right now; keep it alive until it returns.
    if let Some((observer, callback)) = shared.observer.borrow_mut().take() {
        observer.disconnect();
        spawn_local(async move {
            drop(callback);
        });
    }
}

fn begin_load(shared: Rc<MountShared>) {
    let Some(canvas) = placeholder::attach_canvas(&shared.container) else {
        let err = LoadError::MissingContainer("could not attach canvas".into());
        let next = shared.loader.borrow_mut().on_load_failed(err);
        perform(&shared, next);
        return;
    };
    crate::dom::sync_canvas_backing_size(&canvas);
    *shared.canvas.borrow_mut() = Some(canvas.clone());

    spawn_local(async move {
        let gpu = GpuState::new(&canvas).await;
        let gpu = match gpu {
            Ok(g) => g,
            Err(e) => {
                let next = shared
                    .loader
                    .borrow_mut()
                    .on_load_failed(LoadError::Graphics(format!("{:?}", e)));
                if let Some(canvas) = shared.canvas.borrow_mut().take() {
                    canvas.remove();
                }
                perform(&shared, next);
                return;
            }
        };
        let action = shared.loader.borrow_mut().on_loaded();
        if action != LoaderAction::StartFrameLoop {
            // Unmounted while the GPU was initialising.
            return;
        }
        let ctx = FrameContext::new(shared.kind, gpu, canvas, shared.inputs.clone());
        let frame_loop = FrameLoop::start(Rc::new(RefCell::new(ctx)));
        *shared.frame_loop.borrow_mut() = Some(frame_loop);
        placeholder::hide(&shared.container);
        sync_audio(&shared);
        log::info!("[mount] {:?} running", shared.kind);
    });
}
