use js_sys::JSON;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_scroll_core::{Config, Engine, Inputs, Outputs};

mod dom;
mod logger;

pub use dom::DomDocument;

#[wasm_bindgen]
pub struct VizijScroll {
    core: Engine<DomDocument>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Accepts a config object, a JSON string, or undefined/null for defaults.
fn parse_config(config: JsValue) -> Result<Config, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(Config::default());
    }
    let text = match config.as_string() {
        Some(s) => s,
        None => JSON::stringify(&config)
            .map_err(|e| JsError::new(&format!("config stringify error: {:?}", e)))?
            .as_string()
            .ok_or_else(|| JsError::new("config: stringify produced non-string"))?,
    };
    Config::from_json(&text).map_err(|e| JsError::new(&format!("config error: {e}")))
}

fn to_js(out: &Outputs) -> Result<JsValue, JsError> {
    swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
}

#[wasm_bindgen]
impl VizijScroll {
    /// Create an engine bound to the page's document.
    /// Example:
    ///   new VizijScroll({ pin_breakpoint: 1024, counters: { warn_unrecognized: true } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijScroll, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        Ok(VizijScroll {
            core: Engine::new(DomDocument::from_window()?, cfg),
        })
    }

    /// Register reveals, counters and pins. Call once the DOM is ready;
    /// later calls do nothing. Returns the setup Outputs.
    pub fn ready(&mut self) -> Result<JsValue, JsError> {
        to_js(self.core.ready())
    }

    /// Step by `dt` seconds. `inputs_json` matches Inputs:
    /// `{ scroll_y?: number, resized?: boolean }`.
    pub fn update(&mut self, dt: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt, inputs);
        to_js(out)
    }

    /// Step using the window's current scroll position. Hosts wire this to
    /// requestAnimationFrame and pass `resized` from a resize listener.
    pub fn tick(&mut self, dt: f64, resized: bool) -> Result<JsValue, JsError> {
        let inputs = Inputs {
            scroll_y: Some(self.core.document().scroll_y()),
            resized,
        };
        to_js(self.core.update(dt, inputs))
    }

    /// Number of sections currently holding a pin session.
    #[wasm_bindgen(js_name = active_pin_sessions)]
    pub fn active_pin_sessions(&self) -> u32 {
        self.core.active_pin_sessions() as u32
    }

    #[wasm_bindgen(js_name = live_triggers)]
    pub fn live_triggers(&self) -> u32 {
        self.core.live_triggers() as u32
    }

    /// Effective configuration, defaults filled in.
    pub fn config(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.config()).map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

/// Route engine logs to the browser console at `level`
/// ("off", "error", "warn", "info", "debug", "trace").
#[wasm_bindgen(js_name = set_log_level)]
pub fn set_log_level(level: &str) -> Result<(), JsError> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsError::new(&format!("unknown log level '{level}'")))?;
    logger::init(filter);
    Ok(())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_composes_px() {
        assert_eq!(dom::translate_y(-12.5), "translate3d(0px, -12.5px, 0px)");
        assert_eq!(dom::translate_y(0.0), "translate3d(0px, 0px, 0px)");
    }

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(logger::parse_level("warn"), Some(log::LevelFilter::Warn));
        assert_eq!(logger::parse_level("TRACE"), Some(log::LevelFilter::Trace));
        assert_eq!(logger::parse_level("loud"), None);
    }
}
