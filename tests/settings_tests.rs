// Host-side tests for the visual preference store.

use folio_scenes::constants::SETTINGS_STORAGE_KEY;
use folio_scenes::settings::*;
use std::cell::RefCell;
use std::rc::Rc;

fn roomy_env() -> EnvironmentSignals {
    EnvironmentSignals {
        prefers_reduced_motion: false,
        device_memory_gb: Some(8.0),
    }
}

struct BrokenStorage;

impl Persistence for BrokenStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("quota exceeded".into()))
    }
}

#[test]
fn defaults_before_hydration() {
    let store = SettingsStore::new(MemoryStorage::default());
    assert_eq!(store.phase(), Phase::Uninitialized);
    let s = store.settings();
    assert!(!s.effects_enabled);
    assert!(!s.audio_reactive);
    assert!(!s.low_quality_mode);
    assert!((s.bloom_intensity - 0.25).abs() < 1e-6);
    assert!((s.sheen_strength - 0.6).abs() < 1e-6);
}

#[test]
fn set_field_then_read_back() {
    let mut store = SettingsStore::new(MemoryStorage::default());
    store.hydrate(roomy_env());
    store.set_field(SettingField::EffectsEnabled(true));
    store.set_field(SettingField::BloomIntensity(0.8));
    let s = store.settings();
    assert!(s.effects_enabled);
    assert!((s.bloom_intensity - 0.8).abs() < 1e-6);
}

#[test]
fn float_fields_are_clamped_and_nan_rejected() {
    let mut store = SettingsStore::new(MemoryStorage::default());
    store.hydrate(roomy_env());
    store.set_field(SettingField::SheenStrength(3.0));
    assert_eq!(store.settings().sheen_strength, 1.0);
    store.set_field(SettingField::BloomIntensity(-1.0));
    assert_eq!(store.settings().bloom_intensity, 0.0);
    store.set_field(SettingField::BloomIntensity(f32::NAN));
    assert_eq!(store.settings().bloom_intensity, 0.0);
}

#[test]
fn persisted_blob_round_trips_through_a_new_store() {
    let mut first = SettingsStore::new(MemoryStorage::default());
    first.hydrate(roomy_env());
    first.set_field(SettingField::EffectsEnabled(true));
    first.set_field(SettingField::AudioReactive(true));
    first.set_field(SettingField::SheenStrength(0.3));
    let storage = first.storage().clone();
    let expected = first.settings();

    let mut second = SettingsStore::new(storage);
    second.hydrate(roomy_env());
    assert_eq!(second.settings(), expected);
}

#[test]
fn serialized_form_uses_camel_case_keys() {
    let json = VisualSettings::default().to_json();
    for key in [
        "effectsEnabled",
        "audioReactive",
        "lowQualityMode",
        "bloomIntensity",
        "sheenStrength",
    ] {
        assert!(json.contains(key), "missing {key} in {json}");
    }
}

#[test]
fn low_memory_forces_effects_off() {
    let blob = r#"{"effectsEnabled":true,"audioReactive":true,"bloomIntensity":0.5}"#;
    let mut store = SettingsStore::new(MemoryStorage::with_entry(SETTINGS_STORAGE_KEY, blob));
    store.hydrate(EnvironmentSignals {
        prefers_reduced_motion: false,
        device_memory_gb: Some(2.0),
    });
    let s = store.settings();
    assert!(!s.effects_enabled);
    // Only the effects flag is overridden.
    assert!(s.audio_reactive);
    assert!((s.bloom_intensity - 0.5).abs() < 1e-6);
}

#[test]
fn reduced_motion_forces_effects_off() {
    let blob = r#"{"effectsEnabled":true}"#;
    let mut store = SettingsStore::new(MemoryStorage::with_entry(SETTINGS_STORAGE_KEY, blob));
    store.hydrate(EnvironmentSignals {
        prefers_reduced_motion: true,
        device_memory_gb: Some(16.0),
    });
    assert!(!store.settings().effects_enabled);
}

#[test]
fn unknown_device_memory_counts_as_capable() {
    let blob = r#"{"effectsEnabled":true}"#;
    let mut store = SettingsStore::new(MemoryStorage::with_entry(SETTINGS_STORAGE_KEY, blob));
    store.hydrate(EnvironmentSignals::default());
    assert!(store.settings().effects_enabled);
}

#[test]
fn legacy_key_is_accepted() {
    let parsed = VisualSettings::from_json_lenient(r#"{"polishEnabled":true}"#).unwrap();
    assert!(parsed.effects_enabled);
}

#[test]
fn malformed_blob_falls_back_to_defaults() {
    let mut store =
        SettingsStore::new(MemoryStorage::with_entry(SETTINGS_STORAGE_KEY, "{not json"));
    store.hydrate(roomy_env());
    assert_eq!(store.settings(), VisualSettings::default());
    assert_eq!(store.phase(), Phase::Hydrated);
}

#[test]
fn mistyped_fields_keep_their_defaults() {
    let parsed = VisualSettings::from_json_lenient(
        r#"{"effectsEnabled":"yes","bloomIntensity":7,"sheenStrength":0.1,"extra":1}"#,
    )
    .unwrap();
    assert!(!parsed.effects_enabled);
    assert!((parsed.bloom_intensity - 0.25).abs() < 1e-6);
    assert!((parsed.sheen_strength - 0.1).abs() < 1e-6);
    assert!(VisualSettings::from_json_lenient("[1,2]").is_none());
}

#[test]
fn storage_failures_are_swallowed() {
    let mut store = SettingsStore::new(BrokenStorage);
    store.hydrate(roomy_env());
    assert_eq!(store.settings(), VisualSettings::default());
    store.set_field(SettingField::LowQualityMode(true));
    assert!(store.settings().low_quality_mode);
}

#[test]
fn writes_before_hydration_do_not_touch_storage() {
    let mut store = SettingsStore::new(MemoryStorage::default());
    store.set_field(SettingField::EffectsEnabled(true));
    assert!(store.storage().get(SETTINGS_STORAGE_KEY).is_none());
    store.hydrate(roomy_env());
    assert!(store.storage().get(SETTINGS_STORAGE_KEY).is_some());
}

#[test]
fn hydrate_is_idempotent() {
    let mut store = SettingsStore::new(MemoryStorage::default());
    store.hydrate(roomy_env());
    store.set_field(SettingField::EffectsEnabled(true));
    store.hydrate(EnvironmentSignals {
        prefers_reduced_motion: true,
        device_memory_gb: None,
    });
    assert!(store.settings().effects_enabled);
}

#[test]
fn subscribers_see_every_change_until_unsubscribed() {
    let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let handle = SettingsStore::new(MemoryStorage::default()).into_handle();
    let sink = seen.clone();
    let id = handle
        .borrow_mut()
        .subscribe(move |s| sink.borrow_mut().push(s.effects_enabled));
    assert_eq!(handle.borrow().subscriber_count(), 1);

    handle.borrow_mut().hydrate(roomy_env());
    handle
        .borrow_mut()
        .set_field(SettingField::EffectsEnabled(true));
    handle.borrow_mut().unsubscribe(id);
    handle
        .borrow_mut()
        .set_field(SettingField::EffectsEnabled(false));

    assert_eq!(*seen.borrow(), vec![false, true]);
    assert_eq!(handle.borrow().subscriber_count(), 0);
}

#[test]
fn audio_needs_effects() {
    let s = VisualSettings {
        audio_reactive: true,
        ..Default::default()
    };
    assert!(!s.audio_active());
    let s = VisualSettings {
        effects_enabled: true,
        ..s
    };
    assert!(s.audio_active());
}
