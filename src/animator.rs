//! Per-frame animator.
//!
//! `animate` is a pure update: every transform and material value it writes is
//! recomputed from the inputs of this frame, so calling it twice with the same
//! elapsed time gives the same scene and nothing drifts between frames.

use crate::camera::orbit_y;
use crate::constants::*;
use crate::scene::{FaceConfig, HologramStrength, SceneEntity, SceneGraph, SceneMotion};
use crate::settings::VisualSettings;
use glam::Vec3;

/// Everything a frame depends on besides the preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInputs {
    /// Seconds since the scene started.
    pub elapsed: f32,
    pub reduced_motion: bool,
    pub hovered: bool,
    /// Smoothed microphone level in [0, 1]; 0 when audio is off.
    pub audio_intensity: f32,
}

pub fn animate(graph: &mut SceneGraph, inputs: &FrameInputs, settings: &VisualSettings) {
    // Hard freeze: nothing moves or changes color under reduced motion.
    if inputs.reduced_motion {
        return;
    }
    let t = inputs.elapsed.max(0.0);
    graph.time = t;

    match graph.motion {
        SceneMotion::Orbs => animate_orb_group(graph, t),
        SceneMotion::Face(config) => animate_face_group(graph, &config, t),
    }

    let audio = if settings.audio_active() {
        inputs.audio_intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let morph = graph.morph_influence;
    let hologram = graph.hologram;
    for entity in graph.entities.iter_mut() {
        animate_entity_motion(entity, t, morph);
        animate_material(entity, t, hologram, settings, inputs.hovered, audio);
    }
}

fn animate_orb_group(graph: &mut SceneGraph, t: f32) {
    graph.group.rotation = Vec3::new(
        (t * ORB_GROUP_TILT_RATE).sin() * ORB_GROUP_TILT,
        t * ORB_GROUP_SPIN_RAD_PER_SEC,
        0.0,
    );
    graph.camera.eye = orbit_y(
        graph.camera_base_eye,
        graph.camera.target,
        t * HERO_AUTO_ORBIT_RAD_PER_SEC,
    );
}

fn animate_face_group(graph: &mut SceneGraph, config: &FaceConfig, t: f32) {
    if config.enable_rotation {
        graph.group.rotation = if config.front_view_only {
            Vec3::new(
                (t * 0.3).sin() * 0.05 + FACE_PITCH_BIAS,
                (t * 0.2).sin() * 0.1 + FACE_YAW_BIAS,
                (t * 0.15).sin() * 0.03,
            )
        } else {
            Vec3::new(
                (t * 0.3).sin() * 0.05 + FACE_PITCH_BIAS,
                FACE_YAW_BIAS + config.rotation_speed * t,
                (t * 0.2).sin() * 0.03,
            )
        };
    }
    if config.enable_floating {
        let base = graph.group.base_position;
        let phase = t * config.floating_speed;
        graph.group.position = Vec3::new(
            base.x + (phase * 0.7).cos() * config.floating_intensity * 0.3,
            base.y + phase.sin() * config.floating_intensity,
            base.z,
        );
    }
    graph.morph_influence = (t * SMILE_RATE).sin() * SMILE_SWING + SMILE_BASE;
}

fn animate_entity_motion(entity: &mut SceneEntity, t: f32, morph: f32) {
    let p = &entity.params;
    let bob = (t * p.float_speed + p.phase).sin() * p.float_amplitude;
    entity.position = entity.base_position + Vec3::new(0.0, bob, 0.0);
    let spin = t * p.rotation_speed;
    entity.rotation = Vec3::new(spin, spin, 0.0);
    let swell = 1.0 + p.morph_response * morph;
    entity.scale = entity.base_scale * Vec3::new(swell, 1.0, swell);
}

fn animate_material(
    entity: &mut SceneEntity,
    t: f32,
    hologram: HologramStrength,
    settings: &VisualSettings,
    hovered: bool,
    audio: f32,
) {
    let audio_boost = 1.0 + AUDIO_EMISSIVE_GAIN * audio;
    let m = &mut entity.material;
    m.distortion = m.base_distortion * (1.0 + AUDIO_DISTORT_GAIN * audio);

    if !settings.effects_enabled {
        m.emissive = [0.0; 3];
        m.emissive_intensity = 0.0;
        m.color = m.base_color;
        m.opacity = m.base_opacity;
        return;
    }

    let y = entity.base_position.y;
    m.emissive = hsl_to_rgb((t * HUE_CYCLE_RATE).rem_euclid(1.0), 1.0, 0.7);

    let pulse = ((t * SHIMMER_PULSE_RATE + y * SHIMMER_PULSE_SPATIAL).sin() * 0.5 + 0.5).max(0.0);
    let hover = if hovered { HOVER_EMISSIVE_BOOST } else { 1.0 };
    m.emissive_intensity = hologram.base_emissive()
        * (0.6 + 0.6 * pulse)
        * hover
        * preference_gain(settings)
        * audio_boost;

    let scan = match hologram {
        HologramStrength::Strong => ((t * 6.0 + y * 20.0).sin() * 0.25 + 0.85).max(0.65),
        _ => ((t * 5.0 + y * 20.0).sin() * 0.12 + 0.92).max(0.85),
    };
    m.opacity = (m.base_opacity * scan).min(1.0);

    let position_hue = (y * POSITION_HUE_SCALE + t * POSITION_HUE_RATE).rem_euclid(1.0);
    let tint = hsl_to_rgb(position_hue, 0.5, 0.3);
    m.color = lerp3(m.base_color, tint, hologram.tint());
}

/// Sheen and bloom preferences scale the shimmer; the defaults give 1.0.
#[inline]
pub fn preference_gain(settings: &VisualSettings) -> f32 {
    (0.4 + settings.sheen_strength) * (0.75 + settings.bloom_intensity)
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], k: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * k,
        a[1] + (b[1] - a[1]) * k,
        a[2] + (b[2] - a[2]) * k,
    ]
}

/// HSL with all components in [0, 1].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
