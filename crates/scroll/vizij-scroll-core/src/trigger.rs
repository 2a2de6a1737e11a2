//! Trigger descriptors: what element to watch, which scroll window to act on,
//! and what to do when the scroll position crosses its edges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;
use crate::ids::{ElementId, TweenId};

/// A point on a box, measured from its top edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Center,
    Bottom,
    Percent(f64),
    Px(f64),
}

impl Anchor {
    /// Offset from the top edge of a box of the given `extent`.
    pub fn resolve(&self, extent: f64) -> f64 {
        match *self {
            Anchor::Top => 0.0,
            Anchor::Center => extent * 0.5,
            Anchor::Bottom => extent,
            Anchor::Percent(p) => extent * p / 100.0,
            Anchor::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Anchor::Top),
            "center" => Ok(Anchor::Center),
            "bottom" => Ok(Anchor::Bottom),
            _ => {
                if let Some(p) = s.strip_suffix('%') {
                    p.parse().map(Anchor::Percent).map_err(|_| ())
                } else {
                    s.strip_suffix("px")
                        .unwrap_or(s)
                        .parse()
                        .map(Anchor::Px)
                        .map_err(|_| ())
                }
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Top => f.write_str("top"),
            Anchor::Center => f.write_str("center"),
            Anchor::Bottom => f.write_str("bottom"),
            Anchor::Percent(p) => write!(f, "{p}%"),
            Anchor::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Scroll position expression for a trigger edge.
///
/// `"top 80%"` means "when the element's top meets the line 80% down the
/// viewport"; `"+=420"` means 420px past the resolved start.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TriggerPosition {
    Edges { element: Anchor, viewport: Anchor },
    Relative(f64),
}

impl TriggerPosition {
    pub const TOP_TOP: TriggerPosition = TriggerPosition::Edges {
        element: Anchor::Top,
        viewport: Anchor::Top,
    };

    /// Default end when none is given: element bottom meets viewport top.
    pub const BOTTOM_TOP: TriggerPosition = TriggerPosition::Edges {
        element: Anchor::Bottom,
        viewport: Anchor::Top,
    };

    /// Absolute scroll offset for an element at `top` with `height`.
    /// `base` is the resolved start, used by relative expressions.
    pub fn resolve(&self, top: f64, height: f64, viewport_height: f64, base: f64) -> f64 {
        match *self {
            TriggerPosition::Edges { element, viewport } => {
                top + element.resolve(height) - viewport.resolve(viewport_height)
            }
            TriggerPosition::Relative(delta) => base + delta,
        }
    }
}

impl FromStr for TriggerPosition {
    type Err = ScrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScrollError::InvalidPosition {
            expr: s.to_string(),
        };
        let expr = s.trim();
        if let Some(delta) = expr.strip_prefix("+=") {
            return delta
                .trim()
                .parse()
                .map(TriggerPosition::Relative)
                .map_err(|_| invalid());
        }
        if let Some(delta) = expr.strip_prefix("-=") {
            return delta
                .trim()
                .parse::<f64>()
                .map(|d| TriggerPosition::Relative(-d))
                .map_err(|_| invalid());
        }
        let mut parts = expr.split_whitespace();
        let element = parts.next().ok_or_else(invalid)?;
        // A single anchor applies to both boxes ("top" == "top top").
        let viewport = parts.next().unwrap_or(element);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(TriggerPosition::Edges {
            element: element.parse().map_err(|_| invalid())?,
            viewport: viewport.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerPosition::Edges { element, viewport } => write!(f, "{element} {viewport}"),
            TriggerPosition::Relative(d) if *d < 0.0 => write!(f, "-={}", -d),
            TriggerPosition::Relative(d) => write!(f, "+={d}"),
        }
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = ScrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPosition> for String {
    fn from(pos: TriggerPosition) -> Self {
        pos.to_string()
    }
}

/// What a tween does when its trigger toggles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        })
    }
}

/// Actions for the four crossings: enter, leave, enter-back, leave-back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// Play on first entry and never reverse or replay.
    pub const PLAY_ONCE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::None,
    };

    pub const NONE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::None,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::None,
    };

    /// True when no crossing can ever rewind the tween.
    pub fn is_forward_only(&self) -> bool {
        [self.on_leave, self.on_enter_back, self.on_leave_back]
            .iter()
            .all(|a| matches!(a, ToggleAction::None | ToggleAction::Complete))
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self::PLAY_ONCE
    }
}

impl FromStr for ToggleActions {
    type Err = ScrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScrollError::InvalidToggleActions {
            expr: s.to_string(),
        };
        let actions = s
            .split_whitespace()
            .map(|a| a.parse::<ToggleAction>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match actions.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(ToggleActions {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = ScrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(actions: ToggleActions) -> Self {
        actions.to_string()
    }
}

/// Pin behavior attached to a trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinSpec {
    /// Element held in place while the trigger is active.
    pub element: ElementId,
    /// Reserve layout space for the pinned element (pushes content below).
    pub spacing: bool,
    /// Look-ahead factor applied to scroll velocity so the pin engages a frame
    /// early under fast scrolling. 0 disables it.
    pub anticipate: f64,
    /// Class toggled on the pinned element while engaged.
    #[serde(default)]
    pub class: Option<String>,
}

/// Registration binding an element, a scroll window and an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerDescriptor {
    pub element: ElementId,
    pub start: TriggerPosition,
    /// Defaults to `"bottom top"` when absent.
    #[serde(default)]
    pub end: Option<TriggerPosition>,
    #[serde(default)]
    pub toggle_actions: ToggleActions,
    /// Tween driven by the toggle actions.
    #[serde(default)]
    pub tween: Option<TweenId>,
    #[serde(default)]
    pub pin: Option<PinSpec>,
}

impl TriggerDescriptor {
    pub fn new(element: ElementId, start: TriggerPosition) -> Self {
        Self {
            element,
            start,
            end: None,
            toggle_actions: ToggleActions::NONE,
            tween: None,
            pin: None,
        }
    }

    pub fn with_end(mut self, end: TriggerPosition) -> Self {
        self.end = Some(end);
        self
    }

    pub fn playing(mut self, tween: TweenId, actions: ToggleActions) -> Self {
        self.tween = Some(tween);
        self.toggle_actions = actions;
        self
    }

    pub fn pinning(mut self, pin: PinSpec) -> Self {
        self.pin = Some(pin);
        self
    }
}
