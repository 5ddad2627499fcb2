// Host-side tests for tuning constants and their relationships.

use folio_scenes::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn preference_defaults_are_unit_range() {
    assert!((0.0..=1.0).contains(&DEFAULT_BLOOM_INTENSITY));
    assert!((0.0..=1.0).contains(&DEFAULT_SHEEN_STRENGTH));
    assert!(LOW_DEVICE_MEMORY_GB < ASSUMED_DEVICE_MEMORY_GB);
    assert!(VISIBILITY_THRESHOLD > 0.0 && VISIBILITY_THRESHOLD < 1.0);
    assert_eq!(SETTINGS_STORAGE_KEY, "polish-settings");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn orb_counts_fit_renderer_limits() {
    assert!(ORB_COUNT <= MAX_ENTITIES);
    assert!(ORB_COUNT_LOW_QUALITY < ORB_COUNT);
    assert!(ORB_COUNT_LOW_QUALITY > 0);
    assert_eq!(ORB_PALETTE.len(), 3);
}

#[test]
fn palette_channels_are_normalized() {
    for color in ORB_PALETTE.iter() {
        for c in color {
            assert!((0.0..=1.0).contains(c));
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_analyser_settings_are_valid() {
    // AnalyserNode requires a power of two in [32, 32768].
    assert!(AUDIO_FFT_SIZE.is_power_of_two());
    assert!((32..=32768).contains(&AUDIO_FFT_SIZE));
    assert!(AUDIO_SMOOTHING > 0.0 && AUDIO_SMOOTHING < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn hologram_levels_are_ordered() {
    assert!(HOLOGRAM_SUBTLE_INTENSITY < HOLOGRAM_STRONG_INTENSITY);
    assert!(TINT_SUBTLE < TINT_STRONG);
    assert!(HOVER_EMISSIVE_BOOST > 1.0);
}
