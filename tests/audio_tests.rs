// Host-side tests for the audio-reactive intensity source.

use folio_scenes::audio::*;
use std::cell::Cell;
use std::rc::Rc;

/// Fake analyser returning a constant spectrum; counts releases.
struct FakeInput {
    level: u8,
    bins: usize,
    released: Rc<Cell<u32>>,
}

impl FakeInput {
    fn new(level: u8) -> (Self, Rc<Cell<u32>>) {
        let released = Rc::new(Cell::new(0));
        (
            Self {
                level,
                bins: 128,
                released: released.clone(),
            },
            released,
        )
    }
}

impl FrequencySource for FakeInput {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read_bytes(&mut self, out: &mut [u8]) {
        out.fill(self.level);
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[test]
fn average_amplitude_normalizes_bytes() {
    assert_eq!(average_amplitude(&[]), 0.0);
    assert_eq!(average_amplitude(&[0, 0, 0]), 0.0);
    assert!((average_amplitude(&[255; 16]) - 1.0).abs() < 1e-6);
    assert!((average_amplitude(&[0, 255]) - 0.5).abs() < 1e-6);
}

#[test]
fn smoother_converges_and_stays_in_range() {
    let mut s = IntensitySmoother::new(0.8);
    let first = s.push(1.0);
    assert!((first - 0.2).abs() < 1e-6);
    for _ in 0..200 {
        s.push(1.0);
    }
    assert!(s.value() > 0.99 && s.value() <= 1.0);
    s.push(f32::NAN);
    assert!(s.value().is_finite());
    s.push(50.0);
    assert!(s.value() <= 1.0);
}

#[test]
fn running_source_reports_smoothed_level() {
    let (input, _) = FakeInput::new(255);
    let mut src = AudioReactiveSource::new();
    assert!(src.begin_start());
    src.attach(Ok(input));
    assert!(src.is_running());
    let a = src.sample();
    let b = src.sample();
    assert!(a > 0.0 && b > a && b <= 1.0);
    assert_eq!(src.intensity(), b);
}

#[test]
fn stop_zeroes_intensity_and_releases_device() {
    let (input, released) = FakeInput::new(200);
    let mut src = AudioReactiveSource::new();
    src.begin_start();
    src.attach(Ok(input));
    src.sample();
    src.stop();
    assert_eq!(src.intensity(), 0.0);
    assert_eq!(src.status(), AudioStatus::Idle);
    assert_eq!(released.get(), 1);
    // Idempotent.
    src.stop();
    assert_eq!(released.get(), 1);
    assert_eq!(src.sample(), 0.0);
}

#[test]
fn permission_denied_is_reported_without_retry() {
    let mut src: AudioReactiveSource<FakeInput> = AudioReactiveSource::new();
    src.begin_start();
    src.attach(Err(AudioError::PermissionDenied));
    assert_eq!(src.status(), AudioStatus::Failed(AudioError::PermissionDenied));
    assert_eq!(src.error(), Some(AudioError::PermissionDenied));
    assert_eq!(src.intensity(), 0.0);
    assert_eq!(src.sample(), 0.0);
    // Retrying is an explicit call.
    assert!(src.begin_start());
    assert_eq!(src.status(), AudioStatus::Requesting);
}

#[test]
fn device_that_arrives_after_stop_is_released() {
    let (input, released) = FakeInput::new(100);
    let mut src = AudioReactiveSource::new();
    src.begin_start();
    src.stop();
    src.attach(Ok(input));
    assert_eq!(released.get(), 1);
    assert_eq!(src.status(), AudioStatus::Idle);
    assert_eq!(src.intensity(), 0.0);
}

#[test]
fn duplicate_start_is_refused_while_pending_or_running() {
    let (input, _) = FakeInput::new(10);
    let mut src = AudioReactiveSource::new();
    assert!(src.begin_start());
    assert!(!src.begin_start());
    src.attach(Ok(input));
    assert!(!src.begin_start());
}

#[test]
fn dropping_a_running_source_releases_it() {
    let (input, released) = FakeInput::new(10);
    {
        let mut src = AudioReactiveSource::new();
        src.begin_start();
        src.attach(Ok(input));
    }
    assert_eq!(released.get(), 1);
}

#[test]
fn sync_requests_only_when_wanted_and_idle() {
    let mut src: AudioReactiveSource<FakeInput> = AudioReactiveSource::new();
    assert!(!src.sync(false));
    assert_eq!(src.status(), AudioStatus::Idle);

    assert!(src.sync(true));
    assert_eq!(src.status(), AudioStatus::Requesting);
    // Already in flight.
    assert!(!src.sync(true));

    let (input, released) = FakeInput::new(100);
    src.attach(Ok(input));
    assert!(src.is_running());
    assert!(!src.sync(true));

    assert!(!src.sync(false));
    assert_eq!(src.status(), AudioStatus::Idle);
    assert_eq!(released.get(), 1);
    assert_eq!(src.intensity(), 0.0);
}

#[test]
fn sync_keeps_failure_until_unwanted() {
    let mut src: AudioReactiveSource<FakeInput> = AudioReactiveSource::new();
    assert!(src.sync(true));
    src.attach(Err(AudioError::PermissionDenied));
    assert!(!src.sync(true));
    assert_eq!(src.error(), Some(AudioError::PermissionDenied));

    assert!(!src.sync(false));
    assert_eq!(src.error(), None);
    assert!(src.sync(true));
}
