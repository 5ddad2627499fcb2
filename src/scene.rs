//! Scene graph assembly.
//!
//! Builds the fixed set of decorative entities for a scene once per mount.
//! Layout is derived from a seed so it is identical across reloads; the
//! per-frame animator then rewrites transforms and materials in place.

use crate::camera::Camera;
use crate::constants::*;
use glam::{EulerRot, Quat, Vec3};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Floating orbs behind the landing-page hero.
    Hero,
    /// Holographic face on the about page.
    About,
}

impl SceneKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "hero" => Some(Self::Hero),
            "about" => Some(Self::About),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HologramStrength {
    None,
    Subtle,
    Strong,
}

impl HologramStrength {
    pub fn base_emissive(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Subtle => HOLOGRAM_SUBTLE_INTENSITY,
            Self::Strong => HOLOGRAM_STRONG_INTENSITY,
        }
    }

    pub fn tint(self) -> f32 {
        match self {
            Self::Strong => TINT_STRONG,
            _ => TINT_SUBTLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    pub base_color: [f32; 3],
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub base_opacity: f32,
    pub opacity: f32,
    /// Surface wobble amplitude, relative to the entity's size.
    pub base_distortion: f32,
    pub distortion: f32,
}

impl MaterialState {
    fn new(base_color: [f32; 3], opacity: f32, distortion: f32) -> Self {
        Self {
            base_color,
            color: base_color,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            base_opacity: opacity,
            opacity,
            base_distortion: distortion,
            distortion,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationParams {
    pub rotation_speed: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub phase: f32,
    /// Per-entity seed mixed from the scene seed and the entity index.
    pub seed: u64,
    /// How strongly the smile influence widens this part.
    pub morph_response: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    pub base_position: Vec3,
    pub position: Vec3,
    /// Euler XYZ, radians.
    pub rotation: Vec3,
    /// Ellipsoid radii at rest.
    pub base_scale: Vec3,
    pub scale: Vec3,
    pub material: MaterialState,
    pub params: AnimationParams,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupTransform {
    pub base_position: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl GroupTransform {
    fn at(position: Vec3, scale: f32) -> Self {
        Self {
            base_position: position,
            position,
            rotation: Vec3::ZERO,
            scale,
        }
    }

    pub fn orientation(&self) -> Quat {
        euler_quat(self.rotation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Options for the face scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceConfig {
    pub scale: f32,
    pub position: Vec3,
    pub enable_rotation: bool,
    pub enable_floating: bool,
    pub rotation_speed: f32,
    pub floating_intensity: f32,
    pub floating_speed: f32,
    /// Keep micro-movements around a fixed three-quarter view.
    pub front_view_only: bool,
    pub hologram: HologramStrength,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            scale: FACE_SCALE,
            position: Vec3::from_array(FACE_POSITION),
            enable_rotation: true,
            enable_floating: true,
            rotation_speed: FACE_ROTATION_SPEED,
            floating_intensity: FACE_FLOAT_INTENSITY,
            floating_speed: FACE_FLOAT_SPEED,
            front_view_only: true,
            hologram: HologramStrength::Subtle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbFieldConfig {
    pub seed: u64,
    pub low_quality: bool,
}

impl Default for OrbFieldConfig {
    fn default() -> Self {
        Self {
            seed: HERO_SEED,
            low_quality: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneMotion {
    Orbs,
    Face(FaceConfig),
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    pub kind: SceneKind,
    pub motion: SceneMotion,
    pub group: GroupTransform,
    pub entities: Vec<SceneEntity>,
    pub lights: Vec<PointLight>,
    pub ambient: f32,
    pub camera: Camera,
    pub camera_base_eye: Vec3,
    pub hologram: HologramStrength,
    pub morph_influence: f32,
    /// Surface clock fed to the shaders. Only the animator advances it.
    pub time: f32,
}

/// World-space ellipsoid ready for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPlacement {
    pub center: Vec3,
    pub orientation: Quat,
    pub radii: Vec3,
}

impl SceneGraph {
    pub fn world_placement(&self, entity: &SceneEntity) -> WorldPlacement {
        let group_rot = self.group.orientation();
        WorldPlacement {
            center: self.group.position + group_rot * (entity.position * self.group.scale),
            orientation: group_rot * euler_quat(entity.rotation),
            radii: entity.scale * self.group.scale,
        }
    }
}

#[inline]
pub fn euler_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

/// Per-entity seed derived from the scene seed, so entities can be
/// re-generated independently.
#[inline]
pub fn entity_seed(scene_seed: u64, index: usize) -> u64 {
    scene_seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub fn build(kind: SceneKind, low_quality: bool) -> SceneGraph {
    match kind {
        SceneKind::Hero => build_hero(OrbFieldConfig {
            low_quality,
            ..Default::default()
        }),
        SceneKind::About => build_about(FaceConfig::default()),
    }
}

pub fn build_hero(config: OrbFieldConfig) -> SceneGraph {
    let count = if config.low_quality {
        ORB_COUNT_LOW_QUALITY
    } else {
        ORB_COUNT
    };
    let entities = (0..count)
        .map(|i| {
            let seed = entity_seed(config.seed, i);
            let mut rng = StdRng::seed_from_u64(seed);
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let ring = ORB_RING_RADIUS_MIN + rng.gen::<f32>() * ORB_RING_RADIUS_JITTER;
            let height = (rng.gen::<f32>() - 0.5) * ORB_HEIGHT_SPAN;
            let size = ORB_SIZE_MIN + rng.gen::<f32>() * ORB_SIZE_JITTER;
            let speed = ORB_SPEED_MIN + rng.gen::<f32>() * ORB_SPEED_JITTER;
            let phase = rng.gen::<f32>() * std::f32::consts::TAU;
            let base_position = Vec3::new(angle.cos() * ring, height, angle.sin() * ring);
            SceneEntity {
                base_position,
                position: base_position,
                rotation: Vec3::ZERO,
                base_scale: Vec3::splat(size),
                scale: Vec3::splat(size),
                material: MaterialState::new(
                    ORB_PALETTE[i % ORB_PALETTE.len()],
                    ORB_OPACITY,
                    ORB_DISTORTION,
                ),
                params: AnimationParams {
                    rotation_speed: ORB_SPIN_RAD_PER_SEC,
                    float_amplitude: ORB_FLOAT_AMPLITUDE,
                    float_speed: speed,
                    phase,
                    seed,
                    morph_response: 0.0,
                },
            }
        })
        .collect();

    let eye = Vec3::new(0.0, 0.0, 5.0);
    SceneGraph {
        kind: SceneKind::Hero,
        motion: SceneMotion::Orbs,
        group: GroupTransform::at(Vec3::ZERO, 1.0),
        entities,
        lights: vec![
            PointLight {
                position: Vec3::new(10.0, 10.0, 10.0),
                color: [1.0, 1.0, 1.0],
                intensity: 1.0,
            },
            PointLight {
                position: Vec3::new(-10.0, -10.0, -10.0),
                color: ORB_PALETTE[0],
                intensity: 0.5,
            },
        ],
        ambient: 0.6,
        camera: Camera::looking_at_origin(eye, 50.0),
        camera_base_eye: eye,
        hologram: HologramStrength::Subtle,
        morph_influence: 0.0,
        time: 0.0,
    }
}

struct FacePart {
    offset: [f32; 3],
    radii: [f32; 3],
    morph_response: f32,
}

// Model space, origin at the base of the neck.
const FACE_PARTS: [FacePart; 3] = [
    // cranium
    FacePart {
        offset: [0.0, 0.5, 0.0],
        radii: [0.16, 0.2, 0.17],
        morph_response: 0.0,
    },
    // jaw
    FacePart {
        offset: [0.0, 0.36, 0.02],
        radii: [0.12, 0.08, 0.12],
        morph_response: 0.15,
    },
    // nose
    FacePart {
        offset: [0.0, 0.44, 0.15],
        radii: [0.03, 0.05, 0.04],
        morph_response: 0.0,
    },
];

pub fn build_about(config: FaceConfig) -> SceneGraph {
    let entities = FACE_PARTS
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let base_position = Vec3::from_array(part.offset);
            let radii = Vec3::from_array(part.radii);
            SceneEntity {
                base_position,
                position: base_position,
                rotation: Vec3::ZERO,
                base_scale: radii,
                scale: radii,
                material: MaterialState::new(FACE_BASE_COLOR, 1.0, 0.0),
                params: AnimationParams {
                    rotation_speed: 0.0,
                    float_amplitude: 0.0,
                    float_speed: 0.0,
                    phase: 0.0,
                    seed: entity_seed(HERO_SEED, i),
                    morph_response: part.morph_response,
                },
            }
        })
        .collect();

    let mut group = GroupTransform::at(config.position, config.scale);
    group.rotation = Vec3::new(FACE_PITCH_BIAS, FACE_YAW_BIAS, 0.0);

    let eye = Vec3::new(0.0, -0.7, 1.5);
    SceneGraph {
        kind: SceneKind::About,
        motion: SceneMotion::Face(config),
        group,
        entities,
        lights: vec![
            PointLight {
                position: Vec3::new(2.0, 2.0, 2.0),
                color: [1.0, 1.0, 1.0],
                intensity: 1.2,
            },
            PointLight {
                position: Vec3::new(-2.0, -2.0, -2.0),
                color: [0.0, 1.0, 1.0],
                intensity: 0.6,
            },
            PointLight {
                position: Vec3::new(0.0, 3.0, 1.0),
                color: [1.0, 0.0, 1.0],
                intensity: 0.8,
            },
        ],
        ambient: 0.9,
        camera: Camera::looking_at_origin(eye, 45.0),
        camera_base_eye: eye,
        hologram: config.hologram,
        morph_influence: 0.0,
        time: 0.0,
    }
}
