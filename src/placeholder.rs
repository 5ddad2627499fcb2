use crate::scene::SceneKind;
use wasm_bindgen::JsCast;
use web_sys as web;

const PLACEHOLDER_CLASS: &str = "scene-placeholder";

fn gradient(kind: SceneKind) -> &'static str {
    match kind {
        SceneKind::Hero => {
            "position:absolute;inset:0;pointer-events:none;\
             background:linear-gradient(135deg,rgba(99,102,241,0.2),rgba(139,92,246,0.2),rgba(236,72,153,0.2))"
        }
        SceneKind::About => {
            "position:absolute;inset:0;pointer-events:none;\
             background:radial-gradient(circle at 50% 40%,rgba(0,255,255,0.15),rgba(255,0,255,0.08) 45%,transparent 70%)"
        }
    }
}

fn find(container: &web::Element) -> Option<web::Element> {
    container
        .query_selector(&format!(".{PLACEHOLDER_CLASS}"))
        .ok()
        .flatten()
}

fn ensure(container: &web::Element, kind: SceneKind) -> Option<web::Element> {
    if let Some(el) = find(container) {
        return Some(el);
    }
    let document = container.owner_document()?;
    let el = document.create_element("div").ok()?;
    _ = el.set_attribute("class", PLACEHOLDER_CLASS);
    _ = el.set_attribute("aria-hidden", "true");
    _ = el.set_attribute("style", gradient(kind));
    container.append_child(&el).ok()?;
    Some(el)
}

/// Inert gradient shown until the scene is running.
pub fn show(container: &web::Element, kind: SceneKind) {
    ensure(container, kind);
}

/// Static fallback for clients without hardware graphics.
pub fn show_unsupported(container: &web::Element, kind: SceneKind) {
    if let Some(el) = ensure(container, kind) {
        el.set_text_content(Some("WebGL not supported"));
        _ = el.set_attribute(
            "style",
            &format!(
                "{};display:flex;align-items:center;justify-content:center;\
                 font-size:0.875rem;opacity:0.7",
                gradient(kind)
            ),
        );
    }
}

pub fn hide(container: &web::Element) {
    if let Some(el) = find(container) {
        _ = el.set_attribute("style", "display:none");
    }
}

pub fn is_hidden(container: &web::Element) -> bool {
    find(container)
        .and_then(|el| el.get_attribute("style"))
        .map(|s| s.contains("display:none"))
        .unwrap_or(true)
}

/// Canvas the renderer draws into, stacked over the placeholder.
pub fn attach_canvas(container: &web::Element) -> Option<web::HtmlCanvasElement> {
    let document = container.owner_document()?;
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()?;
    _ = canvas.set_attribute(
        "style",
        "position:absolute;inset:0;width:100%;height:100%;display:block",
    );
    _ = canvas.set_attribute("aria-hidden", "true");
    container.append_child(&canvas).ok()?;
    Some(canvas)
}
