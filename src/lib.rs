#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// Core animation logic compiles on every target so the state machine and the
// particle simulation can be tested on the host without a display surface.

pub mod config;
pub mod driver;
pub mod particle;
pub mod rng;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod render;
    mod sprites;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // The hosting page decides the backend by which canvas it carries:
        // `frc-3d` gets the WebGL2 blobs, `frc-2d` the canvas particles.
        if let Some(element) = document.get_element_by_id("frc-3d") {
            let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;
            log::info!("starting WebGL2 backend");
            render::start(canvas)?;
        } else if let Some(element) = document.get_element_by_id("frc-2d") {
            let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;
            log::info!("starting canvas particle backend");
            sprites::start(canvas)?;
        } else {
            return Err("no frc canvas found".into());
        }
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
