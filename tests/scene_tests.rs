// Host-side tests for scene graph assembly.

use folio_scenes::constants::*;
use folio_scenes::scene::*;
use glam::Vec3;

#[test]
fn hero_layout_is_reproducible() {
    let a = build_hero(OrbFieldConfig::default());
    let b = build_hero(OrbFieldConfig::default());
    assert_eq!(a.entities, b.entities);
}

#[test]
fn different_seed_changes_layout() {
    let a = build_hero(OrbFieldConfig::default());
    let b = build_hero(OrbFieldConfig {
        seed: HERO_SEED + 1,
        low_quality: false,
    });
    assert_ne!(a.entities, b.entities);
}

#[test]
fn hero_orbs_stay_within_ranges() {
    let g = build_hero(OrbFieldConfig::default());
    assert_eq!(g.kind, SceneKind::Hero);
    assert_eq!(g.entities.len(), ORB_COUNT);
    for (i, e) in g.entities.iter().enumerate() {
        let ring = Vec3::new(e.base_position.x, 0.0, e.base_position.z).length();
        assert!(ring >= ORB_RING_RADIUS_MIN - 1e-4);
        assert!(ring <= ORB_RING_RADIUS_MIN + ORB_RING_RADIUS_JITTER + 1e-4);
        assert!(e.base_position.y.abs() <= ORB_HEIGHT_SPAN / 2.0 + 1e-4);
        let size = e.base_scale.x;
        assert!((ORB_SIZE_MIN..=ORB_SIZE_MIN + ORB_SIZE_JITTER).contains(&size));
        let speed = e.params.float_speed;
        assert!((ORB_SPEED_MIN..=ORB_SPEED_MIN + ORB_SPEED_JITTER).contains(&speed));
        assert_eq!(e.material.base_color, ORB_PALETTE[i % 3]);
        assert_eq!(e.material.opacity, ORB_OPACITY);
        assert_eq!(e.params.seed, entity_seed(HERO_SEED, i));
    }
}

#[test]
fn orbs_are_spread_around_the_ring() {
    let g = build_hero(OrbFieldConfig::default());
    let step = std::f32::consts::TAU / ORB_COUNT as f32;
    for (i, e) in g.entities.iter().enumerate() {
        let angle = e.base_position.z.atan2(e.base_position.x).rem_euclid(std::f32::consts::TAU);
        let expected = (i as f32 * step).rem_euclid(std::f32::consts::TAU);
        let diff = (angle - expected).abs();
        assert!(diff < 1e-3 || (diff - std::f32::consts::TAU).abs() < 1e-3);
    }
}

#[test]
fn low_quality_hero_has_fewer_orbs() {
    let g = build(SceneKind::Hero, true);
    assert_eq!(g.entities.len(), ORB_COUNT_LOW_QUALITY);
}

#[test]
fn entity_seeds_differ_per_index() {
    let seeds: Vec<u64> = (0..ORB_COUNT).map(|i| entity_seed(HERO_SEED, i)).collect();
    for i in 0..seeds.len() {
        for j in (i + 1)..seeds.len() {
            assert_ne!(seeds[i], seeds[j]);
        }
    }
}

#[test]
fn about_scene_has_face_rig() {
    let g = build_about(FaceConfig::default());
    assert_eq!(g.kind, SceneKind::About);
    assert_eq!(g.entities.len(), 3);
    assert_eq!(g.lights.len(), 3);
    assert!((g.group.scale - FACE_SCALE).abs() < 1e-6);
    assert_eq!(g.group.base_position, Vec3::from_array(FACE_POSITION));
    assert_eq!(g.hologram, HologramStrength::Subtle);
    assert!(g.entities.iter().any(|e| e.params.morph_response > 0.0));
}

#[test]
fn light_rigs_fit_renderer_limits() {
    for g in [build(SceneKind::Hero, false), build(SceneKind::About, false)] {
        assert!(g.lights.len() <= MAX_LIGHTS);
        assert!(g.entities.len() <= MAX_ENTITIES);
    }
}

#[test]
fn world_placement_applies_group_transform() {
    let g = build_about(FaceConfig::default());
    let e = &g.entities[0];
    let placed = g.world_placement(e);
    assert!((placed.radii - e.scale * FACE_SCALE).length() < 1e-5);
    let expected = g.group.position + g.group.orientation() * (e.position * FACE_SCALE);
    assert!((placed.center - expected).length() < 1e-5);
}

#[test]
fn scene_kind_parses_attribute_values() {
    assert_eq!(SceneKind::from_attr("hero"), Some(SceneKind::Hero));
    assert_eq!(SceneKind::from_attr("about"), Some(SceneKind::About));
    assert_eq!(SceneKind::from_attr("contact"), None);
}

#[test]
fn hologram_strength_levels() {
    assert_eq!(HologramStrength::None.base_emissive(), 0.0);
    assert_eq!(
        HologramStrength::Subtle.base_emissive(),
        HOLOGRAM_SUBTLE_INTENSITY
    );
    assert_eq!(
        HologramStrength::Strong.base_emissive(),
        HOLOGRAM_STRONG_INTENSITY
    );
}
