//! Audio-reactive intensity source.
//!
//! The microphone is sampled once per rendered frame: the analyser's byte
//! spectrum is averaged and then smoothed again here, so the value feeding
//! the animator moves gently even when the input is spiky.

use crate::constants::AUDIO_SMOOTHING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("no usable audio input device")]
    DeviceUnavailable,
}

/// Exponential moving average in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensitySmoother {
    factor: f32,
    value: f32,
}

impl Default for IntensitySmoother {
    fn default() -> Self {
        Self::new(AUDIO_SMOOTHING)
    }
}

impl IntensitySmoother {
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
            value: 0.0,
        }
    }

    pub fn push(&mut self, sample: f32) -> f32 {
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.value = self.value * self.factor + sample * (1.0 - self.factor);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Mean of a byte spectrum, normalised to [0, 1]. Empty input is silence.
pub fn average_amplitude(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}

/// Anything that can hand out a byte frequency spectrum.
pub trait FrequencySource {
    fn bin_count(&self) -> usize;
    /// Fill `out` with the current spectrum (`out.len() == bin_count()`).
    fn read_bytes(&mut self, out: &mut [u8]);
    /// Stop the underlying device. Called exactly once.
    fn release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    Idle,
    Requesting,
    Running,
    Failed(AudioError),
}

pub struct AudioReactiveSource<S: FrequencySource> {
    status: AudioStatus,
    source: Option<S>,
    bins: Vec<u8>,
    smoother: IntensitySmoother,
}

impl<S: FrequencySource> Default for AudioReactiveSource<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FrequencySource> AudioReactiveSource<S> {
    pub fn new() -> Self {
        Self {
            status: AudioStatus::Idle,
            source: None,
            bins: Vec::new(),
            smoother: IntensitySmoother::default(),
        }
    }

    pub fn status(&self) -> AudioStatus {
        self.status
    }

    pub fn intensity(&self) -> f32 {
        self.smoother.value()
    }

    pub fn error(&self) -> Option<AudioError> {
        match self.status {
            AudioStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == AudioStatus::Running
    }

    /// Returns true if the caller should go and request the device.
    ///
    /// Also the explicit retry path after a failure.
    pub fn begin_start(&mut self) -> bool {
        match self.status {
            AudioStatus::Idle | AudioStatus::Failed(_) => {
                self.status = AudioStatus::Requesting;
                true
            }
            AudioStatus::Requesting | AudioStatus::Running => false,
        }
    }

    /// Follow whether audio is wanted right now. Returns true if the caller
    /// should go and request the device.
    ///
    /// A failure sticks until audio is no longer wanted; wanting it again
    /// after that is the explicit retry.
    pub fn sync(&mut self, wanted: bool) -> bool {
        if !wanted {
            if self.status != AudioStatus::Idle {
                self.stop();
            }
            return false;
        }
        self.status == AudioStatus::Idle && self.begin_start()
    }

    /// Hand over the outcome of the device request.
    pub fn attach(&mut self, result: Result<S, AudioError>) {
        if self.status != AudioStatus::Requesting {
            // Stopped (or unmounted) while the request was in flight.
            if let Ok(mut late) = result {
                late.release();
                log::debug!("[audio] released input that arrived after stop");
            }
            return;
        }
        match result {
            Ok(source) => {
                self.bins = vec![0; source.bin_count()];
                self.source = Some(source);
                self.smoother.reset();
                self.status = AudioStatus::Running;
                log::info!("[audio] microphone running");
            }
            Err(e) => {
                log::warn!("[audio] {e}");
                self.smoother.reset();
                self.status = AudioStatus::Failed(e);
            }
        }
    }

    /// Read the spectrum and advance the smoother. Call once per frame.
    pub fn sample(&mut self) -> f32 {
        let Some(source) = self.source.as_mut() else {
            return 0.0;
        };
        if self.bins.len() != source.bin_count() {
            self.bins.resize(source.bin_count(), 0);
        }
        source.read_bytes(&mut self.bins);
        self.smoother.push(average_amplitude(&self.bins))
    }

    /// Release the device, zero the intensity and clear any failure.
    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            log::info!("[audio] microphone stopped");
        }
        self.smoother.reset();
        self.status = AudioStatus::Idle;
    }
}

impl<S: FrequencySource> Drop for AudioReactiveSource<S> {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_input::{request_microphone, MicrophoneInput};

#[cfg(target_arch = "wasm32")]
mod web_input {
    use super::{AudioError, FrequencySource};
    use crate::constants::{AUDIO_FFT_SIZE, AUDIO_SMOOTHING};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys as web;

    pub struct MicrophoneInput {
        ctx: web::AudioContext,
        analyser: web::AnalyserNode,
        stream: web::MediaStream,
        // Held so the graph stays connected.
        _source: web::MediaStreamAudioSourceNode,
    }

    impl FrequencySource for MicrophoneInput {
        fn bin_count(&self) -> usize {
            self.analyser.frequency_bin_count() as usize
        }

        fn read_bytes(&mut self, out: &mut [u8]) {
            self.analyser.get_byte_frequency_data(out);
        }

        fn release(&mut self) {
            let tracks = self.stream.get_tracks();
            for i in 0..tracks.length() {
                if let Ok(track) = tracks.get(i).dyn_into::<web::MediaStreamTrack>() {
                    track.stop();
                }
            }
            _ = self.ctx.close();
        }
    }

    fn classify(err: &wasm_bindgen::JsValue) -> AudioError {
        match err.dyn_ref::<web::DomException>().map(|e| e.name()) {
            Some(name) if name == "NotAllowedError" || name == "SecurityError" => {
                AudioError::PermissionDenied
            }
            _ => AudioError::DeviceUnavailable,
        }
    }

    /// Prompt for the microphone and build the analyser graph.
    pub async fn request_microphone() -> Result<MicrophoneInput, AudioError> {
        let window = web::window().ok_or(AudioError::DeviceUnavailable)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| AudioError::DeviceUnavailable)?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&wasm_bindgen::JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| classify(&e))?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| classify(&e))?
            .dyn_into()
            .map_err(|_| AudioError::DeviceUnavailable)?;

        let stop_tracks = |stream: &web::MediaStream| {
            let tracks = stream.get_tracks();
            for i in 0..tracks.length() {
                if let Ok(track) = tracks.get(i).dyn_into::<web::MediaStreamTrack>() {
                    track.stop();
                }
            }
        };

        let ctx = match web::AudioContext::new() {
            Ok(c) => c,
            Err(e) => {
                log::error!("[audio] AudioContext error: {:?}", e);
                stop_tracks(&stream);
                return Err(AudioError::DeviceUnavailable);
            }
        };
        let graph = ctx.create_analyser().and_then(|analyser| {
            analyser.set_fft_size(AUDIO_FFT_SIZE);
            analyser.set_smoothing_time_constant(AUDIO_SMOOTHING as f64);
            let source = ctx.create_media_stream_source(&stream)?;
            source.connect_with_audio_node(&analyser)?;
            Ok((analyser, source))
        });
        match graph {
            Ok((analyser, source)) => Ok(MicrophoneInput {
                ctx,
                analyser,
                stream,
                _source: source,
            }),
            Err(e) => {
                log::error!("[audio] analyser graph error: {:?}", e);
                stop_tracks(&stream);
                _ = ctx.close();
                Err(AudioError::DeviceUnavailable)
            }
        }
    }
}
