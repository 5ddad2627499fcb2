/// Answers whether this client can render hardware-accelerated 3D at all.
///
/// Implementations must be repeatable and leave no observable state behind.
pub trait GraphicsProbe {
    fn supports_hardware_graphics(&self) -> bool;
}

/// Probe with a predetermined answer (non-browser hosts, tests).
#[derive(Clone, Copy, Debug)]
pub struct FixedProbe(pub bool);

impl GraphicsProbe for FixedProbe {
    fn supports_hardware_graphics(&self) -> bool {
        self.0
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_probe::WebGlProbe;

#[cfg(target_arch = "wasm32")]
mod web_probe {
    use super::GraphicsProbe;
    use wasm_bindgen::JsCast;
    use web_sys as web;

    /// Asks a throwaway, never-attached canvas for a WebGL context.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebGlProbe;

    impl GraphicsProbe for WebGlProbe {
        fn supports_hardware_graphics(&self) -> bool {
            let Some(document) = crate::dom::window_document() else {
                return false;
            };
            let canvas = match document
                .create_element("canvas")
                .ok()
                .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
            {
                Some(c) => c,
                None => return false,
            };
            ["webgl2", "webgl"]
                .iter()
                .any(|kind| matches!(canvas.get_context(kind), Ok(Some(_))))
        }
    }
}
