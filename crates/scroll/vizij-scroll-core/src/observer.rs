//! Scroll-observation capability and the headless trigger registry.
//!
//! The registry is the single owner of every live trigger. Controllers add
//! and remove entries through [`ScrollObserver`]; the engine asks it to
//! recompute boundaries after layout changes and to evaluate all triggers
//! against the current scroll position each tick.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, StyleProperty};
use crate::ids::{ElementId, IdAllocator, TriggerId};
use crate::outputs::{CoreEvent, Outputs};
use crate::trigger::{ToggleAction, TriggerDescriptor, TriggerPosition};
use crate::tween::Tweener;

/// Scroll-observation capability consumed by the controllers.
pub trait ScrollObserver {
    fn register(&mut self, desc: TriggerDescriptor) -> TriggerId;
    /// Remove a trigger, reverting any pin it holds. Returns false for unknown ids.
    fn destroy(&mut self, id: TriggerId) -> bool;
    /// Recompute every trigger's absolute boundaries from current layout.
    /// Returns the number of triggers refreshed.
    fn refresh_all(&mut self, doc: &dyn Document) -> usize;
    fn live_count(&self) -> usize;
    fn is_live(&self, id: TriggerId) -> bool;
}

/// Where the scroll position sits relative to a trigger's window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Before,
    Active,
    After,
}

/// Absolute scroll offsets of a trigger's window.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: f64,
    pub end: f64,
}

impl Bounds {
    fn zone(&self, scroll: f64) -> Zone {
        if scroll <= self.start {
            Zone::Before
        } else if scroll >= self.end {
            Zone::After
        } else {
            Zone::Active
        }
    }

    fn pin_offset(&self, scroll: f64) -> f64 {
        (scroll - self.start).clamp(0.0, (self.end - self.start).max(0.0))
    }
}

#[derive(Debug)]
struct Entry {
    id: TriggerId,
    desc: TriggerDescriptor,
    bounds: Option<Bounds>,
    zone: Zone,
    pin_engaged: bool,
    pin_offset: Option<f64>,
}

/// A pin that must be reverted on the next update.
#[derive(Debug)]
struct Release {
    trigger: TriggerId,
    element: ElementId,
    class: Option<String>,
    engaged: bool,
}

fn resolve_bounds(desc: &TriggerDescriptor, doc: &dyn Document) -> Option<Bounds> {
    let top = doc.offset_top(desc.element)?;
    let height = doc.offset_height(desc.element)?;
    let vh = doc.viewport_height();
    let start = desc.start.resolve(top, height, vh, 0.0);
    let end = desc
        .end
        .unwrap_or(TriggerPosition::BOTTOM_TOP)
        .resolve(top, height, vh, start);
    Some(Bounds { start, end })
}

/// Crossing actions for a zone change, in firing order.
fn crossings(from: Zone, to: Zone, desc: &TriggerDescriptor) -> Vec<(&'static str, ToggleAction)> {
    let a = desc.toggle_actions;
    match (from, to) {
        (Zone::Before, Zone::Active) => vec![("enter", a.on_enter)],
        (Zone::Before, Zone::After) => vec![("enter", a.on_enter), ("leave", a.on_leave)],
        (Zone::Active, Zone::After) => vec![("leave", a.on_leave)],
        (Zone::Active, Zone::Before) => vec![("leave_back", a.on_leave_back)],
        (Zone::After, Zone::Active) => vec![("enter_back", a.on_enter_back)],
        (Zone::After, Zone::Before) => vec![
            ("enter_back", a.on_enter_back),
            ("leave_back", a.on_leave_back),
        ],
        _ => Vec::new(),
    }
}

/// Headless trigger registry.
#[derive(Debug, Default)]
pub struct TriggerRegistry {
    ids: IdAllocator,
    entries: Vec<Entry>,
    releases: Vec<Release>,
    last_scroll: Option<f64>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved boundaries; None until the trigger has been refreshed or evaluated.
    pub fn bounds(&self, id: TriggerId) -> Option<Bounds> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.bounds)
    }

    pub fn zone(&self, id: TriggerId) -> Option<Zone> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.zone)
    }

    pub fn descriptor(&self, id: TriggerId) -> Option<&TriggerDescriptor> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.desc)
    }

    /// Number of live triggers holding a pin.
    pub fn pin_count(&self) -> usize {
        self.entries.iter().filter(|e| e.desc.pin.is_some()).count()
    }

    /// Evaluate all triggers at `scroll`: fire toggle actions on crossings and
    /// update pin offsets. Pins of destroyed triggers are reverted first.
    pub fn update(
        &mut self,
        scroll: f64,
        doc: &mut dyn Document,
        tweens: &mut dyn Tweener,
        out: &mut Outputs,
    ) {
        for rel in self.releases.drain(..) {
            doc.set_style(rel.element, StyleProperty::PinOffset, 0.0);
            if let Some(class) = &rel.class {
                doc.set_class(rel.element, class, false);
            }
            if rel.engaged {
                out.push_event(CoreEvent::PinReleased {
                    trigger: rel.trigger,
                    element: rel.element,
                });
            }
        }

        let velocity = self.last_scroll.map_or(0.0, |last| scroll - last);
        self.last_scroll = Some(scroll);

        for entry in &mut self.entries {
            if entry.bounds.is_none() {
                entry.bounds = resolve_bounds(&entry.desc, doc);
            }
            let Some(bounds) = entry.bounds else {
                continue;
            };

            let zone = bounds.zone(scroll);
            let prev_zone = entry.zone;
            if zone != entry.zone {
                for (crossing, action) in crossings(entry.zone, zone, &entry.desc) {
                    log::trace!("trigger {:?} {crossing} -> {action}", entry.id);
                    if let Some(tween) = entry.desc.tween {
                        tweens.apply(tween, action);
                    }
                }
                entry.zone = zone;
            }

            let Some(pin) = &entry.desc.pin else {
                continue;
            };
            // Anticipation engages the class and event early; the offset
            // itself only moves inside the window. An early engagement holds
            // until the scroll turns back or the window is entered.
            let predicted = scroll + velocity * pin.anticipate;
            let held = entry.pin_engaged && prev_zone == zone;
            let engaged = match zone {
                Zone::Active => true,
                Zone::Before => {
                    (velocity > 0.0 && pin.anticipate > 0.0 && predicted > bounds.start)
                        || (held && velocity >= 0.0)
                }
                Zone::After => {
                    (velocity < 0.0 && pin.anticipate > 0.0 && predicted < bounds.end)
                        || (held && velocity <= 0.0)
                }
            };
            if engaged != entry.pin_engaged {
                entry.pin_engaged = engaged;
                if let Some(class) = &pin.class {
                    doc.set_class(pin.element, class, engaged);
                }
                out.push_event(if engaged {
                    CoreEvent::PinEngaged {
                        trigger: entry.id,
                        element: pin.element,
                    }
                } else {
                    CoreEvent::PinReleased {
                        trigger: entry.id,
                        element: pin.element,
                    }
                });
            }
            let offset = bounds.pin_offset(scroll);
            if entry.pin_offset != Some(offset) {
                entry.pin_offset = Some(offset);
                doc.set_style(pin.element, StyleProperty::PinOffset, offset);
            }
        }
    }
}

impl ScrollObserver for TriggerRegistry {
    fn register(&mut self, desc: TriggerDescriptor) -> TriggerId {
        let id = self.ids.alloc_trigger();
        self.entries.push(Entry {
            id,
            desc,
            bounds: None,
            zone: Zone::Before,
            pin_engaged: false,
            pin_offset: None,
        });
        id
    }

    fn destroy(&mut self, id: TriggerId) -> bool {
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(idx);
        if let Some(pin) = entry.desc.pin {
            self.releases.push(Release {
                trigger: id,
                element: pin.element,
                class: pin.class,
                engaged: entry.pin_engaged,
            });
        }
        true
    }

    fn refresh_all(&mut self, doc: &dyn Document) -> usize {
        for entry in &mut self.entries {
            entry.bounds = resolve_bounds(&entry.desc, doc);
        }
        self.entries.len()
    }

    fn live_count(&self) -> usize {
        self.entries.len()
    }

    fn is_live(&self, id: TriggerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}
