// Host-side tests for the per-frame animator.

use folio_scenes::animator::*;
use folio_scenes::scene::*;
use folio_scenes::settings::VisualSettings;

fn effects_on() -> VisualSettings {
    VisualSettings {
        effects_enabled: true,
        ..Default::default()
    }
}

fn at(elapsed: f32) -> FrameInputs {
    FrameInputs {
        elapsed,
        ..Default::default()
    }
}

#[test]
fn reduced_motion_freezes_everything() {
    let mut g = build(SceneKind::Hero, false);
    animate(&mut g, &at(3.0), &effects_on());
    let before = g.clone();
    let inputs = FrameInputs {
        elapsed: 12.5,
        reduced_motion: true,
        hovered: true,
        audio_intensity: 1.0,
    };
    animate(&mut g, &inputs, &effects_on());
    assert_eq!(g.entities, before.entities);
    assert_eq!(g.group, before.group);
    assert_eq!(g.camera, before.camera);
    // Surface wobble in the shaders runs off this clock.
    assert_eq!(g.time, 3.0);
}

#[test]
fn surface_clock_follows_elapsed_time() {
    let mut g = build(SceneKind::About, false);
    assert_eq!(g.time, 0.0);
    animate(&mut g, &at(4.5), &VisualSettings::default());
    assert_eq!(g.time, 4.5);
}

#[test]
fn same_inputs_give_same_scene() {
    let mut a = build(SceneKind::About, false);
    let mut b = build(SceneKind::About, false);
    // Different histories, same final time.
    animate(&mut a, &at(1.0), &effects_on());
    animate(&mut a, &at(7.25), &effects_on());
    animate(&mut b, &at(7.25), &effects_on());
    assert_eq!(a.entities, b.entities);
    assert_eq!(a.group, b.group);
}

#[test]
fn orbs_bob_around_their_base_height() {
    let mut g = build(SceneKind::Hero, false);
    for t in [0.0, 0.7, 3.3, 10.0] {
        animate(&mut g, &at(t), &VisualSettings::default());
        for e in &g.entities {
            let dy = e.position.y - e.base_position.y;
            assert!(dy.abs() <= e.params.float_amplitude + 1e-5);
            assert_eq!(e.position.x, e.base_position.x);
        }
    }
}

#[test]
fn hero_group_spins_over_time() {
    let mut g = build(SceneKind::Hero, false);
    animate(&mut g, &at(1.0), &VisualSettings::default());
    let early = g.group.rotation.y;
    animate(&mut g, &at(5.0), &VisualSettings::default());
    assert!(g.group.rotation.y > early);
    assert!(g.camera.eye != g.camera_base_eye);
}

#[test]
fn effects_off_restores_base_material() {
    let mut g = build(SceneKind::Hero, false);
    animate(&mut g, &at(2.0), &effects_on());
    animate(&mut g, &at(2.0), &VisualSettings::default());
    for e in &g.entities {
        assert_eq!(e.material.emissive_intensity, 0.0);
        assert_eq!(e.material.color, e.material.base_color);
        assert_eq!(e.material.opacity, e.material.base_opacity);
    }
}

#[test]
fn effects_on_lights_up_and_stays_bounded() {
    let mut g = build(SceneKind::About, false);
    for t in [0.0, 0.4, 2.2, 9.9] {
        animate(&mut g, &at(t), &effects_on());
        for e in &g.entities {
            let m = &e.material;
            assert!(m.emissive_intensity > 0.0);
            assert!(m.opacity > 0.0 && m.opacity <= 1.0);
            for c in m.emissive.iter().chain(m.color.iter()) {
                assert!(*c >= -1e-5 && *c <= 1.0 + 1e-5);
            }
        }
    }
}

#[test]
fn hover_boosts_emissive() {
    let mut calm = build(SceneKind::About, false);
    let mut hovered = build(SceneKind::About, false);
    animate(&mut calm, &at(1.5), &effects_on());
    animate(
        &mut hovered,
        &FrameInputs {
            elapsed: 1.5,
            hovered: true,
            ..Default::default()
        },
        &effects_on(),
    );
    for (a, b) in calm.entities.iter().zip(hovered.entities.iter()) {
        let ratio = b.material.emissive_intensity / a.material.emissive_intensity;
        assert!((ratio - 1.6).abs() < 1e-4);
    }
}

#[test]
fn audio_only_counts_when_enabled() {
    let loud = FrameInputs {
        elapsed: 3.0,
        audio_intensity: 1.0,
        ..Default::default()
    };
    let mut quiet = build(SceneKind::Hero, false);
    let mut deaf = build(SceneKind::Hero, false);
    let mut reactive = build(SceneKind::Hero, false);
    animate(&mut quiet, &at(3.0), &effects_on());
    animate(&mut deaf, &loud, &effects_on());
    let with_audio = VisualSettings {
        audio_reactive: true,
        ..effects_on()
    };
    animate(&mut reactive, &loud, &with_audio);

    assert_eq!(quiet.entities, deaf.entities);
    for (q, r) in quiet.entities.iter().zip(reactive.entities.iter()) {
        assert!(r.material.emissive_intensity > q.material.emissive_intensity);
        assert!(r.material.distortion > q.material.distortion);
    }
}

#[test]
fn default_preferences_give_unit_gain() {
    assert!((preference_gain(&VisualSettings::default()) - 1.0).abs() < 1e-5);
}

#[test]
fn smile_widens_the_jaw() {
    let mut g = build(SceneKind::About, false);
    animate(&mut g, &at(0.8), &VisualSettings::default());
    assert!(g.morph_influence >= 0.1 && g.morph_influence <= 0.5);
    for e in &g.entities {
        if e.params.morph_response > 0.0 {
            assert!(e.scale.x > e.base_scale.x);
            assert_eq!(e.scale.y, e.base_scale.y);
        } else {
            assert_eq!(e.scale, e.base_scale);
        }
    }
}

#[test]
fn hsl_conversion_hits_primaries() {
    let red = hsl_to_rgb(0.0, 1.0, 0.5);
    assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
    let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
    assert!((green[1] - 1.0).abs() < 1e-5 && green[0].abs() < 1e-5);
    let grey = hsl_to_rgb(0.42, 0.0, 0.3);
    assert_eq!(grey, [0.3, 0.3, 0.3]);
}
