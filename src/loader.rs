//! Deferred scene loader.
//!
//! Decides when the heavy 3D path may start: only on the client, only after the
//! capability probe succeeds, and only once the container has scrolled into view.
//! The state machine is host-agnostic; each transition returns the action the
//! host (the DOM mount) has to perform.

use crate::constants::VISIBILITY_THRESHOLD;
use crate::probe::GraphicsProbe;
use crate::settings::VisualSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderState {
    Unmounted,
    ProbePending,
    NotSupported,
    /// Probe passed; the observer is not connected yet.
    ProbeOk,
    AwaitingVisibility,
    Visible,
    Loaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderAction {
    None,
    /// Pre-render pass: draw the inert gradient and do nothing else.
    ShowPlaceholder,
    RunProbe,
    /// Capability missing; static fallback for good.
    ShowFallback,
    ObserveVisibility,
    /// Disconnect the observer and start instantiating the scene.
    BeginLoad,
    StartFrameLoop,
    /// Instantiation failed; leave whatever is on screen.
    KeepPlaceholder,
    Teardown(Teardown),
}

/// Resources the host must release synchronously on unmount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Teardown {
    pub disconnect_observer: bool,
    pub stop_frame_loop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("graphics initialisation failed: {0}")]
    Graphics(String),
    #[error("scene container missing: {0}")]
    MissingContainer(String),
}

#[derive(Debug)]
pub struct SceneLoader {
    state: LoaderState,
    observing: bool,
    last_error: Option<LoadError>,
}

impl Default for SceneLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLoader {
    pub fn new() -> Self {
        Self {
            state: LoaderState::Unmounted,
            observing: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// The microphone is only held by a scene that is actually drawing.
    pub fn wants_audio(&self, settings: &VisualSettings) -> bool {
        self.state == LoaderState::Loaded && settings.audio_active()
    }

    /// True while the host should keep its visibility observer connected.
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn mount(&mut self, is_client: bool) -> LoaderAction {
        if self.state != LoaderState::Unmounted {
            return LoaderAction::None;
        }
        if !is_client {
            return LoaderAction::ShowPlaceholder;
        }
        self.state = LoaderState::ProbePending;
        LoaderAction::RunProbe
    }

    pub fn probe_resolved(&mut self, supported: bool) -> LoaderAction {
        if self.state != LoaderState::ProbePending {
            return LoaderAction::None;
        }
        if !supported {
            self.state = LoaderState::NotSupported;
            log::info!("[loader] hardware graphics unavailable; static fallback");
            return LoaderAction::ShowFallback;
        }
        self.state = LoaderState::ProbeOk;
        LoaderAction::ObserveVisibility
    }

    /// The host has connected its visibility observer.
    pub fn observer_attached(&mut self) -> LoaderAction {
        if self.state != LoaderState::ProbeOk {
            return LoaderAction::None;
        }
        self.state = LoaderState::AwaitingVisibility;
        self.observing = true;
        LoaderAction::None
    }

    /// Mount and probe in one step, for hosts whose probe is synchronous.
    ///
    /// Returns the last action the host must act on.
    pub fn mount_with_probe(&mut self, is_client: bool, probe: &dyn GraphicsProbe) -> LoaderAction {
        match self.mount(is_client) {
            LoaderAction::RunProbe => self.probe_resolved(probe.supports_hardware_graphics()),
            other => other,
        }
    }

    /// Feed one intersection record. Only the first qualifying one counts.
    pub fn on_intersection(&mut self, is_intersecting: bool, ratio: f32) -> LoaderAction {
        if self.state != LoaderState::AwaitingVisibility || !self.observing {
            return LoaderAction::None;
        }
        if !is_intersecting || ratio < VISIBILITY_THRESHOLD {
            return LoaderAction::None;
        }
        self.become_visible()
    }

    /// The environment has no way to observe visibility: load right away.
    pub fn visibility_unobservable(&mut self) -> LoaderAction {
        if !matches!(
            self.state,
            LoaderState::ProbeOk | LoaderState::AwaitingVisibility
        ) {
            return LoaderAction::None;
        }
        self.become_visible()
    }

    fn become_visible(&mut self) -> LoaderAction {
        self.state = LoaderState::Visible;
        self.observing = false;
        LoaderAction::BeginLoad
    }

    pub fn on_loaded(&mut self) -> LoaderAction {
        if self.state != LoaderState::Visible {
            return LoaderAction::None;
        }
        self.state = LoaderState::Loaded;
        LoaderAction::StartFrameLoop
    }

    /// Instantiation failed. Never retried; the loader stays `Visible`.
    pub fn on_load_failed(&mut self, err: LoadError) -> LoaderAction {
        if self.state != LoaderState::Visible {
            return LoaderAction::None;
        }
        log::error!("[loader] {err}");
        self.last_error = Some(err);
        LoaderAction::KeepPlaceholder
    }

    pub fn unmount(&mut self) -> LoaderAction {
        let teardown = Teardown {
            disconnect_observer: self.observing,
            stop_frame_loop: self.state == LoaderState::Loaded,
        };
        self.state = LoaderState::Unmounted;
        self.observing = false;
        LoaderAction::Teardown(teardown)
    }
}
