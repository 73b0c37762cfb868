//! WASM bindings for Pulseplot Core.
//!
//! This module provides JavaScript-friendly bindings so a browser front end
//! can parse and lay out a sequence, then draw the result itself.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmPulseDiagram } from 'pulseplot_core';
//!
//! await init();
//!
//! const sequence = `
//!   p1 pl1 ph1 f1 c
//!   d2 f1 tx=$\\tau$
//!   p2 pl1 ph2 f1 c necho
//! `;
//!
//! const diagram = new WasmPulseDiagram(sequence, 0.1);
//! const layout = JSON.parse(diagram.to_json());
//! const t = diagram.time_of("echo");
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl::ExternalParams;
use crate::error::PulseplotError;
use crate::layout::{JsonRenderer, Layout, LayoutConfig, LayoutEngine};
use crate::sequence::PulseSequence;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: PulseplotError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A laid-out pulse sequence diagram.
#[wasm_bindgen]
pub struct WasmPulseDiagram {
    layout: Layout,
    json: serde_json::Value,
}

#[wasm_bindgen]
impl WasmPulseDiagram {
    /// Parse `sequence` and lay it out with the given pulse spacing.
    ///
    /// # Arguments
    /// * `sequence` - Multi-line instruction text
    /// * `spacing` - Gap before every deferred pulse
    ///
    /// # Returns
    /// The diagram, or an error naming the first line that failed.
    #[wasm_bindgen(constructor)]
    pub fn new(sequence: &str, spacing: f64) -> Result<WasmPulseDiagram, JsValue> {
        Self::with_center_align(sequence, spacing, false)
    }

    /// Like the constructor, optionally centering outlines on their channel.
    #[wasm_bindgen]
    pub fn with_center_align(sequence: &str, spacing: f64, center_align: bool) -> Result<WasmPulseDiagram, JsValue> {
        let sequence = PulseSequence::from_text(sequence, &ExternalParams::new()).map_err(to_js)?;

        let config = LayoutConfig::new()
            .with_spacing(spacing)
            .with_center_align(center_align);
        let mut renderer = JsonRenderer::new();
        let layout = LayoutEngine::new(config).run(&sequence, &mut renderer);
        let json = renderer.into_json().map_err(to_js)?;

        Ok(WasmPulseDiagram { layout, json })
    }

    /// The rendered layout as a JSON string.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.json).map_err(|e| {
            to_js(PulseplotError::WasmError {
                message: e.to_string(),
            })
        })
    }

    /// Start time of the element called `name`.
    #[wasm_bindgen]
    pub fn time_of(&self, name: &str) -> Result<f64, JsValue> {
        self.layout.time_of(name).map_err(to_js)
    }

    /// Number of placed elements.
    #[wasm_bindgen(getter)]
    pub fn element_count(&self) -> usize {
        self.layout.elements.len()
    }

    /// Total time covered by the diagram.
    #[wasm_bindgen(getter)]
    pub fn duration(&self) -> f64 {
        self.layout.duration()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
