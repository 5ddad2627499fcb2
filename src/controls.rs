use crate::dom::{self, LocalStorage};
use crate::settings::{SettingField, SettingsHandle, VisualSettings};
use wasm_bindgen::JsCast;
use web_sys as web;

pub const EFFECTS_TOGGLE_ID: &str = "polish-toggle";
pub const AUDIO_TOGGLE_ID: &str = "fx-audio-toggle";
pub const LOW_QUALITY_TOGGLE_ID: &str = "fx-low-quality";
pub const BLOOM_SLIDER_ID: &str = "fx-bloom";
pub const SHEEN_SLIDER_ID: &str = "fx-sheen";
/// Container of the fine-grained controls; hidden while effects are off.
pub const PANEL_ID: &str = "fx-panel";

fn toggle(
    document: &web::Document,
    store: &SettingsHandle<LocalStorage>,
    id: &str,
    make: impl Fn(&VisualSettings) -> SettingField + 'static,
) {
    let store = store.clone();
    dom::add_listener(document, id, "click", move |_| {
        let field = make(&store.borrow().settings());
        store.borrow_mut().set_field(field);
    });
}

fn slider(
    document: &web::Document,
    store: &SettingsHandle<LocalStorage>,
    id: &str,
    make: impl Fn(f32) -> SettingField + 'static,
) {
    let store = store.clone();
    dom::add_listener(document, id, "input", move |ev| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        match input.value().parse::<f32>() {
            Ok(v) => store.borrow_mut().set_field(make(v)),
            Err(_) => log::warn!("[controls] ignoring slider value {:?}", input.value()),
        }
    });
}

/// Wire the visual-controls panel, if the page has one.
pub fn wire(document: &web::Document, store: &SettingsHandle<LocalStorage>) {
    toggle(document, store, EFFECTS_TOGGLE_ID, |s| {
        SettingField::EffectsEnabled(!s.effects_enabled)
    });
    toggle(document, store, AUDIO_TOGGLE_ID, |s| {
        SettingField::AudioReactive(!s.audio_reactive)
    });
    toggle(document, store, LOW_QUALITY_TOGGLE_ID, |s| {
        SettingField::LowQualityMode(!s.low_quality_mode)
    });
    slider(document, store, BLOOM_SLIDER_ID, SettingField::BloomIntensity);
    slider(document, store, SHEEN_SLIDER_ID, SettingField::SheenStrength);

    let doc = document.clone();
    reflect(&doc, &store.borrow().settings());
    store.borrow_mut().subscribe(move |s| reflect(&doc, s));
}

fn set_pressed(document: &web::Document, id: &str, on: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.set_attribute("aria-pressed", if on { "true" } else { "false" });
    }
}

fn set_value(document: &web::Document, id: &str, value: f32) {
    if let Some(input) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        input.set_value(&format!("{value:.2}"));
    }
}

fn reflect(document: &web::Document, s: &VisualSettings) {
    set_pressed(document, EFFECTS_TOGGLE_ID, s.effects_enabled);
    set_pressed(document, AUDIO_TOGGLE_ID, s.audio_reactive);
    set_pressed(document, LOW_QUALITY_TOGGLE_ID, s.low_quality_mode);
    set_value(document, BLOOM_SLIDER_ID, s.bloom_intensity);
    set_value(document, SHEEN_SLIDER_ID, s.sheen_strength);
    if let Some(panel) = document.get_element_by_id(PANEL_ID) {
        dom::set_hidden(&panel, !s.effects_enabled);
    }
}
