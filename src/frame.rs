use crate::animator::{self, FrameInputs};
use crate::audio::{AudioReactiveSource, MicrophoneInput};
use crate::dom;
use crate::post::{self, PostParams};
use crate::render::GpuState;
use crate::scene::{self, SceneGraph, SceneKind};
use crate::settings::VisualSettings;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Inputs shared between the mount (event listeners, store subscription)
/// and the frame loop.
#[derive(Clone)]
pub struct SharedInputs {
    pub settings: Rc<Cell<VisualSettings>>,
    pub reduced_motion: Rc<Cell<bool>>,
    pub hovered: Rc<Cell<bool>>,
    pub audio: Rc<RefCell<AudioReactiveSource<MicrophoneInput>>>,
}

pub struct FrameContext {
    pub kind: SceneKind,
    pub graph: SceneGraph,
    pub gpu: GpuState,
    pub canvas: web::HtmlCanvasElement,
    pub inputs: SharedInputs,
    pub started: Instant,
    low_quality: bool,
}

impl FrameContext {
    pub fn new(
        kind: SceneKind,
        gpu: GpuState,
        canvas: web::HtmlCanvasElement,
        inputs: SharedInputs,
    ) -> Self {
        let low_quality = inputs.settings.get().low_quality_mode;
        Self {
            kind,
            graph: scene::build(kind, low_quality),
            gpu,
            canvas,
            inputs,
            started: Instant::now(),
            low_quality,
        }
    }

    pub fn frame(&mut self) {
        let settings = self.inputs.settings.get();
        if settings.low_quality_mode != self.low_quality {
            self.low_quality = settings.low_quality_mode;
            self.graph = scene::build(self.kind, self.low_quality);
            log::debug!("[frame] rebuilt scene low_quality={}", self.low_quality);
        }

        let elapsed = self.started.elapsed().as_secs_f32();
        let reduced_motion = self.inputs.reduced_motion.get();
        let hovered = self.inputs.hovered.get();
        let audio_intensity = match self.inputs.audio.try_borrow_mut() {
            Ok(mut audio) => audio.sample(),
            Err(_) => 0.0,
        };

        let frame_inputs = FrameInputs {
            elapsed,
            reduced_motion,
            hovered,
            audio_intensity,
        };
        animator::animate(&mut self.graph, &frame_inputs, &settings);

        let params = post::compose(self.kind, &settings, reduced_motion, hovered)
            .map(|chain| PostParams::from_chain(&chain));

        dom::sync_canvas_backing_size(&self.canvas);
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        if let Err(e) = self.gpu.render(&self.graph, params.as_ref()) {
            log::error!("render error: {:?}", e);
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame driver for one mounted scene.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

impl FrameLoop {
    pub fn start(frame_ctx: Rc<RefCell<FrameContext>>) -> Self {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let tick: TickSlot = Rc::new(RefCell::new(None));

        let tick_clone = tick.clone();
        let running_tick = running.clone();
        let pending_tick = pending.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending_tick.set(None);
            if !running_tick.get() {
                return;
            }
            if let Ok(mut ctx) = frame_ctx.try_borrow_mut() {
                ctx.frame();
            }
            if running_tick.get() {
                pending_tick.set(request_frame(&tick_clone));
            }
        }) as Box<dyn FnMut()>));
        pending.set(request_frame(&tick));

        Self {
            running,
            pending,
            tick,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Cancel the pending frame and drop the callback. Idempotent.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to its own slot.
        self.tick.borrow_mut().take();
        log::debug!("[frame] loop stopped");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &TickSlot) -> Option<i32> {
    let w = web::window()?;
    let slot = tick.borrow();
    let cb = slot.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
