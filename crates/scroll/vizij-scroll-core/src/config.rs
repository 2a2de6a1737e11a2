//! Page configuration for vizij-scroll-core.
//!
//! Defaults reproduce the landing page the engine was built for: six reveal
//! groups, one counter grid and two pinned sections.

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;
use crate::interp::Ease;
use crate::trigger::{ToggleActions, TriggerPosition};

/// Top-level configuration for an [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum viewport width (logical px) at which sections pin.
    pub pin_breakpoint: f64,
    /// Visual buffer subtracted from the pin distance, in px.
    pub pin_offset: f64,
    /// Quiet period before a resize burst is handled, in ms.
    pub resize_debounce_ms: f64,
    /// Pin look-ahead factor; 0 disables anticipation.
    pub anticipate_pin: f64,
    /// Class toggled on a header while it is pinned. None to skip.
    pub pinned_class: Option<String>,
    pub reveal: RevealCfg,
    pub counters: CounterCfg,
    pub pins: Vec<PinSectionCfg>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin_breakpoint: 960.0,
            pin_offset: 96.0,
            resize_debounce_ms: 250.0,
            anticipate_pin: 1.0,
            pinned_class: Some("is-pinned".to_string()),
            reveal: RevealCfg::default(),
            counters: CounterCfg::default(),
            pins: vec![
                PinSectionCfg::named("servicos"),
                PinSectionCfg::named("setores"),
            ],
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, ScrollError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reveals and counters play once; actions that could rewind them are rejected.
    pub fn validate(&self) -> Result<(), ScrollError> {
        for actions in [self.reveal.toggle_actions, self.counters.toggle_actions] {
            if !actions.is_forward_only() {
                return Err(ScrollError::InvalidToggleActions {
                    expr: actions.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fade/slide-in reveals, one fire-once trigger per matching element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealCfg {
    pub selectors: Vec<String>,
    /// Seconds.
    pub duration: f64,
    /// Initial downward offset in px.
    pub offset_y: f64,
    pub ease: Ease,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
    pub toggle_actions: ToggleActions,
}

impl Default for RevealCfg {
    fn default() -> Self {
        Self {
            selectors: [
                ".hero-content.container",
                ".sobre-nos-content.container",
                ".clientes-content",
                ".servicos-card",
                ".setores-card",
                ".avaliacao-content.container",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            duration: 0.8,
            offset_y: 50.0,
            ease: Ease::default(),
            start: TriggerPosition::Edges {
                element: crate::trigger::Anchor::Top,
                viewport: crate::trigger::Anchor::Percent(80.0),
            },
            end: TriggerPosition::Edges {
                element: crate::trigger::Anchor::Top,
                viewport: crate::trigger::Anchor::Percent(50.0),
            },
            toggle_actions: ToggleActions::PLAY_ONCE,
        }
    }
}

/// Numeric counters inside one container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterCfg {
    /// Container holding the labels; also the trigger element.
    pub scope: String,
    /// Label selector inside `scope`.
    pub label: String,
    /// Counting duration in seconds.
    pub duration: f64,
    /// Fade duration for fade-only labels, in seconds.
    pub fade_duration: f64,
    pub ease: Ease,
    pub start: TriggerPosition,
    pub toggle_actions: ToggleActions,
    /// Log a warning for labels matching no notation.
    pub warn_unrecognized: bool,
}

impl Default for CounterCfg {
    fn default() -> Self {
        Self {
            scope: ".sobre-nos-grid".to_string(),
            label: "h3".to_string(),
            duration: 2.0,
            fade_duration: 1.0,
            ease: Ease::default(),
            start: TriggerPosition::Edges {
                element: crate::trigger::Anchor::Top,
                viewport: crate::trigger::Anchor::Percent(80.0),
            },
            toggle_actions: ToggleActions::PLAY_ONCE,
            warn_unrecognized: false,
        }
    }
}

/// One pinned section: a container and the header held while it scrolls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinSectionCfg {
    pub name: String,
    pub container: String,
    pub header: String,
    /// Title node inside the header.
    #[serde(default = "default_title")]
    pub title: String,
    /// Subtitle node inside the header.
    pub subtitle: String,
}

fn default_title() -> String {
    "h2".to_string()
}

impl PinSectionCfg {
    /// Selectors following the `<name>-content` / `<name>-header` /
    /// `<name>-subtitle` naming used by the page markup.
    pub fn named(name: &str) -> Self {
        let container = format!(".{name}-content.container");
        Self {
            name: name.to_string(),
            header: format!("{container} .{name}-header"),
            container,
            title: default_title(),
            subtitle: format!(".{name}-subtitle"),
        }
    }
}
