//! Visual preference store.
//!
//! A single shared instance holds the user's decoration preferences. It is
//! created with defaults before first paint and hydrated from persisted storage
//! afterwards, so pre-rendered and client-rendered output agree. Consumers get
//! the store injected (`SettingsHandle`) instead of reaching for a global.

use crate::constants::{
    ASSUMED_DEVICE_MEMORY_GB, DEFAULT_BLOOM_INTENSITY, DEFAULT_SHEEN_STRENGTH,
    LOW_DEVICE_MEMORY_GB, SETTINGS_STORAGE_KEY,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualSettings {
    pub effects_enabled: bool,
    pub audio_reactive: bool,
    pub low_quality_mode: bool,
    pub bloom_intensity: f32,
    pub sheen_strength: f32,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            effects_enabled: false,
            audio_reactive: false,
            low_quality_mode: false,
            bloom_intensity: DEFAULT_BLOOM_INTENSITY,
            sheen_strength: DEFAULT_SHEEN_STRENGTH,
        }
    }
}

impl VisualSettings {
    /// Microphone-driven intensity only applies while decoration is on.
    pub fn audio_active(&self) -> bool {
        self.effects_enabled && self.audio_reactive
    }

    pub fn to_json(&self) -> String {
        // Serializing a plain struct of bools and finite floats cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Parse a persisted blob, falling back to defaults field by field.
    ///
    /// Unknown fields are ignored; missing, mistyped or out-of-range fields
    /// keep their default. Returns `None` only when the blob is not a JSON
    /// object at all.
    pub fn from_json_lenient(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let obj = value.as_object()?;
        let defaults = Self::default();
        Some(Self {
            effects_enabled: read_bool(obj, &["effectsEnabled", "polishEnabled"])
                .unwrap_or(defaults.effects_enabled),
            audio_reactive: read_bool(obj, &["audioReactive"]).unwrap_or(defaults.audio_reactive),
            low_quality_mode: read_bool(obj, &["lowQualityMode"])
                .unwrap_or(defaults.low_quality_mode),
            bloom_intensity: read_unit(obj, "bloomIntensity").unwrap_or(defaults.bloom_intensity),
            sheen_strength: read_unit(obj, "sheenStrength").unwrap_or(defaults.sheen_strength),
        })
    }

    fn apply(&mut self, field: SettingField) -> bool {
        match field {
            SettingField::EffectsEnabled(v) => self.effects_enabled = v,
            SettingField::AudioReactive(v) => self.audio_reactive = v,
            SettingField::LowQualityMode(v) => self.low_quality_mode = v,
            SettingField::BloomIntensity(v) => match clamp_unit(v) {
                Some(v) => self.bloom_intensity = v,
                None => return false,
            },
            SettingField::SheenStrength(v) => match clamp_unit(v) {
                Some(v) => self.sheen_strength = v,
                None => return false,
            },
        }
        true
    }
}

fn read_bool(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_bool))
}

fn read_unit(obj: &Map<String, Value>, key: &str) -> Option<f32> {
    let v = obj.get(key)?.as_f64()? as f32;
    (0.0..=1.0).contains(&v).then_some(v)
}

#[inline]
fn clamp_unit(v: f32) -> Option<f32> {
    (!v.is_nan()).then(|| v.clamp(0.0, 1.0))
}

/// One field update; the only way consumers mutate preferences.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingField {
    EffectsEnabled(bool),
    AudioReactive(bool),
    LowQualityMode(bool),
    BloomIntensity(f32),
    SheenStrength(f32),
}

/// Environment facts read once at hydration time.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvironmentSignals {
    pub prefers_reduced_motion: bool,
    /// Approximate device memory in GB, when the browser reports it.
    pub device_memory_gb: Option<f64>,
}

impl EnvironmentSignals {
    pub fn forces_effects_off(&self) -> bool {
        let memory = self.device_memory_gb.unwrap_or(ASSUMED_DEVICE_MEMORY_GB);
        self.prefers_reduced_motion || memory <= LOW_DEVICE_MEMORY_GB
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable tab-local key/value storage.
pub trait Persistence {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage for non-browser hosts and tests.
#[derive(Default, Debug, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Persistence for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Hydrated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Subscriber = Box<dyn FnMut(&VisualSettings)>;

pub struct SettingsStore<P: Persistence> {
    settings: VisualSettings,
    phase: Phase,
    storage: P,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u32,
}

/// Shared handle injected into every scene and control.
pub type SettingsHandle<P> = Rc<RefCell<SettingsStore<P>>>;

impl<P: Persistence> SettingsStore<P> {
    pub fn new(storage: P) -> Self {
        Self {
            settings: VisualSettings::default(),
            phase: Phase::Uninitialized,
            storage,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn into_handle(self) -> SettingsHandle<P> {
        Rc::new(RefCell::new(self))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Current snapshot; defaults until hydrated.
    pub fn settings(&self) -> VisualSettings {
        self.settings
    }

    /// Restore persisted preferences and apply environment overrides.
    ///
    /// Only `effects_enabled` is overridden by the environment; everything
    /// else comes back exactly as stored. Calling this twice is a no-op.
    pub fn hydrate(&mut self, env: EnvironmentSignals) {
        if self.phase == Phase::Hydrated {
            return;
        }
        let stored = match self.storage.load(SETTINGS_STORAGE_KEY) {
            Ok(raw) => raw.and_then(|raw| {
                let parsed = VisualSettings::from_json_lenient(&raw);
                if parsed.is_none() {
                    log::warn!("[settings] ignoring malformed persisted preferences");
                }
                parsed
            }),
            Err(e) => {
                log::warn!("[settings] {e}; using defaults");
                None
            }
        };
        let mut resolved = stored.unwrap_or_default();
        if env.forces_effects_off() {
            resolved.effects_enabled = false;
        }
        self.settings = resolved;
        self.phase = Phase::Hydrated;
        log::info!(
            "[settings] hydrated effects={} audio={} low_quality={}",
            resolved.effects_enabled,
            resolved.audio_reactive,
            resolved.low_quality_mode
        );
        self.persist();
        self.notify();
    }

    /// Update one field, persist the whole blob and notify subscribers.
    pub fn set_field(&mut self, field: SettingField) {
        if !self.settings.apply(field) {
            log::warn!("[settings] rejected {:?}", field);
            return;
        }
        self.persist();
        self.notify();
    }

    /// Register a re-render callback. Callbacks get the new snapshot and run
    /// while the store is borrowed, so they must not reach back into it.
    pub fn subscribe(&mut self, callback: impl FnMut(&VisualSettings) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn persist(&mut self) {
        // Before hydration the persisted blob is not ours to overwrite.
        if self.phase != Phase::Hydrated {
            return;
        }
        let blob = self.settings.to_json();
        if let Err(e) = self.storage.save(SETTINGS_STORAGE_KEY, &blob) {
            log::warn!("[settings] {e}; keeping in-memory preferences");
        }
    }

    fn notify(&mut self) {
        let snapshot = self.settings;
        for (_, cb) in self.subscribers.iter_mut() {
            cb(&snapshot);
        }
    }
}
