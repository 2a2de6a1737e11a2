//! Pin Controller: one pinning trigger per pinned section.
//!
//! The lifecycle is a two-state machine, `Absent` or `Active(session)`, driven
//! by [`PinController::reconcile`]. Every call tears down the current session
//! before deciding whether to build a new one, so a section never holds more
//! than one live trigger.

use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointGate;
use crate::config::PinSectionCfg;
use crate::dom::Document;
use crate::error::ScrollError;
use crate::geometry::GeometryResolver;
use crate::ids::{ElementId, TriggerId};
use crate::observer::ScrollObserver;
use crate::trigger::{PinSpec, TriggerDescriptor, TriggerPosition};

/// The live pin trigger of one section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinSession {
    pub trigger: TriggerId,
    pub container: ElementId,
    pub header: ElementId,
    /// Scroll distance the header stays pinned, in px.
    pub distance: f64,
    /// Viewport width the geometry was measured at.
    pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PinState {
    #[default]
    Absent,
    Active(PinSession),
}

/// Result of one reconcile step, for logging and events.
#[derive(Clone, Debug, PartialEq)]
pub struct PinTransition {
    pub destroyed: Option<TriggerId>,
    pub created: Option<PinSession>,
    /// Why no session was created, if none was.
    pub skipped: Option<ScrollError>,
}

#[derive(Debug)]
pub struct PinController {
    name: String,
    container_selector: String,
    header_selector: String,
    container: Option<ElementId>,
    header: Option<ElementId>,
    geometry: GeometryResolver,
    gate: BreakpointGate,
    anticipate: f64,
    pinned_class: Option<String>,
    state: PinState,
}

impl PinController {
    /// Resolve the section's container and header once. Either may be missing;
    /// reconcile then leaves the section unpinned.
    pub fn new(
        cfg: &PinSectionCfg,
        doc: &dyn Document,
        gate: BreakpointGate,
        fixed_offset: f64,
    ) -> Self {
        Self {
            name: cfg.name.clone(),
            container_selector: cfg.container.clone(),
            header_selector: cfg.header.clone(),
            container: doc.query(&cfg.container),
            header: doc.query(&cfg.header),
            geometry: GeometryResolver::new(&cfg.title, &cfg.subtitle, fixed_offset),
            gate,
            anticipate: 1.0,
            pinned_class: None,
            state: PinState::Absent,
        }
    }

    pub fn with_anticipation(mut self, anticipate: f64) -> Self {
        self.anticipate = anticipate;
        self
    }

    pub fn with_pinned_class(mut self, class: Option<String>) -> Self {
        self.pinned_class = class;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &PinState {
        &self.state
    }

    pub fn session(&self) -> Option<&PinSession> {
        match &self.state {
            PinState::Active(s) => Some(s),
            PinState::Absent => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PinState::Active(_))
    }

    /// Idempotent setup at the document's current width.
    pub fn setup(
        &mut self,
        doc: &dyn Document,
        observer: &mut dyn ScrollObserver,
    ) -> PinTransition {
        self.reconcile(doc.viewport_width(), doc, observer)
    }

    /// Destroy any live session, then create a fresh one if `width` passes the
    /// gate and the section's geometry resolves.
    pub fn reconcile(
        &mut self,
        width: f64,
        doc: &dyn Document,
        observer: &mut dyn ScrollObserver,
    ) -> PinTransition {
        let destroyed = match std::mem::take(&mut self.state) {
            PinState::Active(old) => {
                observer.destroy(old.trigger);
                Some(old.trigger)
            }
            PinState::Absent => None,
        };

        match self.build(width, doc, observer) {
            Ok(session) => {
                log::debug!(
                    "pin {}: distance {} at width {}",
                    self.name,
                    session.distance,
                    width
                );
                self.state = PinState::Active(session.clone());
                PinTransition {
                    destroyed,
                    created: Some(session),
                    skipped: None,
                }
            }
            Err(err) => {
                log::debug!("pin {} not applied ({}): {err}", self.name, err.category());
                PinTransition {
                    destroyed,
                    created: None,
                    skipped: Some(err),
                }
            }
        }
    }

    fn build(
        &self,
        width: f64,
        doc: &dyn Document,
        observer: &mut dyn ScrollObserver,
    ) -> Result<PinSession, ScrollError> {
        let container = self
            .container
            .ok_or_else(|| ScrollError::missing(&self.container_selector))?;
        let header = self
            .header
            .ok_or_else(|| ScrollError::missing(&self.header_selector))?;
        self.gate.check(width)?;
        let distance = self.geometry.end_scroll_distance(doc, container, header)?;

        let trigger = observer.register(
            TriggerDescriptor::new(container, TriggerPosition::TOP_TOP)
                .with_end(TriggerPosition::Relative(distance))
                .pinning(PinSpec {
                    element: header,
                    spacing: false,
                    anticipate: self.anticipate,
                    class: self.pinned_class.clone(),
                }),
        );
        Ok(PinSession {
            trigger,
            container,
            header,
            distance,
            width,
        })
    }
}
