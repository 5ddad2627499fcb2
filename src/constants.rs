//! Scene, animation and post-processing tuning constants.
//!
//! These express the intended look (rates, amplitudes, clamp limits) and keep
//! magic numbers out of the animator and renderer.

// Persisted preferences
pub const SETTINGS_STORAGE_KEY: &str = "polish-settings";
pub const LOW_DEVICE_MEMORY_GB: f64 = 2.0; // at or below this, effects start disabled
pub const ASSUMED_DEVICE_MEMORY_GB: f64 = 4.0; // used when the browser does not report it

pub const DEFAULT_BLOOM_INTENSITY: f32 = 0.25;
pub const DEFAULT_SHEEN_STRENGTH: f32 = 0.6;

// Deferred loading
pub const VISIBILITY_THRESHOLD: f32 = 0.1; // fraction of the container that must be visible

// Audio-reactive source
pub const AUDIO_SMOOTHING: f32 = 0.8; // analyser smoothing and EMA factor (two-stage)
pub const AUDIO_FFT_SIZE: u32 = 256;
pub const AUDIO_EMISSIVE_GAIN: f32 = 1.5; // emissive multiplier at full intensity is 1 + gain
pub const AUDIO_DISTORT_GAIN: f32 = 2.0;

// Hero orb field
pub const HERO_SEED: u64 = 42;
pub const ORB_COUNT: usize = 8;
pub const ORB_COUNT_LOW_QUALITY: usize = 5;
pub const ORB_RING_RADIUS_MIN: f32 = 2.0;
pub const ORB_RING_RADIUS_JITTER: f32 = 1.5;
pub const ORB_HEIGHT_SPAN: f32 = 3.0;
pub const ORB_SIZE_MIN: f32 = 0.3;
pub const ORB_SIZE_JITTER: f32 = 0.4;
pub const ORB_SPEED_MIN: f32 = 0.3;
pub const ORB_SPEED_JITTER: f32 = 0.4;
pub const ORB_FLOAT_AMPLITUDE: f32 = 0.5;
pub const ORB_SPIN_RAD_PER_SEC: f32 = 0.6; // per-axis self rotation
pub const ORB_OPACITY: f32 = 0.8;
pub const ORB_DISTORTION: f32 = 0.3;
pub const ORB_GROUP_SPIN_RAD_PER_SEC: f32 = 0.12;
pub const ORB_GROUP_TILT: f32 = 0.1;
pub const ORB_GROUP_TILT_RATE: f32 = 0.2;

// Indigo, purple, pink
pub const ORB_PALETTE: [[f32; 3]; 3] = [
    [0.388, 0.400, 0.945],
    [0.545, 0.361, 0.965],
    [0.925, 0.282, 0.600],
];

// Camera auto-orbit for the hero scene (orbit-controls speed 0.3 at 60 fps)
pub const HERO_AUTO_ORBIT_RAD_PER_SEC: f32 = 0.0314;

// Face model
pub const FACE_SCALE: f32 = 2.5;
pub const FACE_POSITION: [f32; 3] = [0.0, -1.2, 0.0];
pub const FACE_ROTATION_SPEED: f32 = 0.001;
pub const FACE_FLOAT_INTENSITY: f32 = 0.05;
pub const FACE_FLOAT_SPEED: f32 = 0.6;
pub const FACE_YAW_BIAS: f32 = -0.4; // turned left
pub const FACE_PITCH_BIAS: f32 = 0.2;
pub const FACE_BASE_COLOR: [f32; 3] = [0.067, 0.067, 0.067];
pub const SMILE_BASE: f32 = 0.3;
pub const SMILE_SWING: f32 = 0.2;
pub const SMILE_RATE: f32 = 2.0;

// Holographic shimmer
pub const HUE_CYCLE_RATE: f32 = 0.8; // full hue turns per second
pub const POSITION_HUE_SCALE: f32 = 0.3;
pub const POSITION_HUE_RATE: f32 = 0.3;
pub const SHIMMER_PULSE_RATE: f32 = 3.0;
pub const SHIMMER_PULSE_SPATIAL: f32 = 6.0;
pub const HOVER_EMISSIVE_BOOST: f32 = 1.6;
pub const HOLOGRAM_SUBTLE_INTENSITY: f32 = 0.4;
pub const HOLOGRAM_STRONG_INTENSITY: f32 = 2.4;
pub const TINT_SUBTLE: f32 = 0.06;
pub const TINT_STRONG: f32 = 0.14;

// Post-processing (hero)
pub const HERO_BLOOM_THRESHOLD: f32 = 0.4;
pub const HERO_BLOOM_SMOOTHING: f32 = 0.9;
pub const HERO_BLOOM_GAIN: f32 = 1.6; // 0.25 default preference -> 0.4 bloom
pub const HERO_CA_OFFSET: [f32; 2] = [0.001, 0.002];
pub const VIGNETTE_OFFSET: f32 = 0.5;
pub const VIGNETTE_DARKNESS: f32 = 0.5;
pub const NOISE_OPACITY: f32 = 0.02;

// Post-processing (about)
pub const ABOUT_BLOOM_THRESHOLD: f32 = 0.3;
pub const ABOUT_BLOOM_SMOOTHING: f32 = 0.9;
pub const ABOUT_BLOOM_GAIN: f32 = 2.4; // 0.25 -> 0.6, doubled on hover
pub const ABOUT_CA_OFFSET: [f32; 2] = [0.001, 0.001];
pub const ABOUT_CA_OFFSET_HOVER: [f32; 2] = [0.003, 0.003];

// Renderer limits
pub const MAX_ENTITIES: usize = 8;
pub const MAX_LIGHTS: usize = 3;
