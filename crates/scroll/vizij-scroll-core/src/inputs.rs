//! Input contracts for the engine.
//!
//! Hosts build one of these per animation frame from the scroll and resize
//! events seen since the previous frame.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    /// Current vertical scroll offset, if it changed.
    #[serde(default)]
    pub scroll_y: Option<f64>,
    /// At least one viewport resize event fired this frame.
    #[serde(default)]
    pub resized: bool,
}

impl Inputs {
    pub fn scroll(y: f64) -> Self {
        Self {
            scroll_y: Some(y),
            resized: false,
        }
    }

    pub fn resize() -> Self {
        Self {
            scroll_y: None,
            resized: true,
        }
    }
}
