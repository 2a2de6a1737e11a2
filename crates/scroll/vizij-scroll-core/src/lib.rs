//! Vizij Scroll Core (host-agnostic)
//!
//! Scroll-synchronized page behavior: fire-once reveals, pinned section
//! headers whose pin distance follows live layout, and numeric counters that
//! count up when first visible. The DOM, the scroll observer and the tween
//! engine are capabilities behind traits ([`Document`], [`ScrollObserver`],
//! [`Tweener`]); headless implementations ship here so pages can be driven
//! from tests, and the wasm adapter supplies a `web-sys` document.

pub mod breakpoint;
pub mod config;
pub mod counter;
pub mod dom;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod inputs;
pub mod interp;
pub mod observer;
pub mod outputs;
pub mod pin;
pub mod resize;
pub mod reveal;
pub mod timer;
pub mod trigger;
pub mod tween;

// Re-exports for consumers (adapters)
pub use breakpoint::{is_pin_eligible, BreakpointGate};
pub use config::{Config, CounterCfg, PinSectionCfg, RevealCfg};
pub use counter::{classify, CounterController, CounterSpec, LabelKind, Notation};
pub use dom::{Document, ElementLayout, MemoryDocument, PageLayout, StyleProperty, Viewport};
pub use engine::Engine;
pub use error::ScrollError;
pub use geometry::GeometryResolver;
pub use ids::{ElementId, TriggerId, TweenId};
pub use inputs::Inputs;
pub use interp::Ease;
pub use observer::{Bounds, ScrollObserver, TriggerRegistry, Zone};
pub use outputs::{Change, ChangeValue, CoreEvent, Outputs};
pub use pin::{PinController, PinSession, PinState};
pub use resize::ResizeCoordinator;
pub use reveal::{Reveal, RevealController};
pub use timer::{TaskHandle, TimerQueue};
pub use trigger::{Anchor, PinSpec, ToggleAction, ToggleActions, TriggerDescriptor, TriggerPosition};
pub use tween::{StyleSet, TweenEngine, TweenOptions, TweenState, Tweener};
