//! Engine: owns the document, trigger registry, tweens and controllers.
//!
//! Methods:
//! - new, ready (reveals → counters → pins), update (resize timers → refresh →
//!   pin re-setup → trigger evaluation → tween stepping)

use crate::breakpoint::BreakpointGate;
use crate::config::Config;
use crate::counter::{CounterController, CounterSpec};
use crate::dom::Document;
use crate::inputs::Inputs;
use crate::observer::{ScrollObserver, TriggerRegistry};
use crate::outputs::{CoreEvent, Outputs, RecordingDocument};
use crate::pin::{PinController, PinTransition};
use crate::resize::{ResizeCoordinator, ScheduledTask};
use crate::reveal::{Reveal, RevealController};
use crate::timer::TimerQueue;
use crate::tween::TweenEngine;

#[derive(Debug)]
pub struct Engine<D: Document> {
    // Owned data
    cfg: Config,
    doc: D,

    // Capabilities
    registry: TriggerRegistry,
    tweens: TweenEngine,
    timers: TimerQueue<ScheduledTask>,

    // Controllers
    reveals: RevealController,
    counters: CounterController,
    pins: Vec<PinController>,
    resize: ResizeCoordinator,

    clock_ms: f64,
    scroll_y: f64,
    is_ready: bool,

    // Per-tick outputs
    outputs: Outputs,
}

fn record_pin(events: &mut Outputs, section: &str, t: PinTransition) {
    if let Some(trigger) = t.destroyed {
        events.push_event(CoreEvent::PinDestroyed {
            section: section.to_string(),
            trigger,
        });
    }
    if let Some(session) = t.created {
        events.push_event(CoreEvent::PinCreated {
            section: section.to_string(),
            trigger: session.trigger,
            distance: session.distance,
        });
    }
}

impl<D: Document> Engine<D> {
    pub fn new(doc: D, cfg: Config) -> Self {
        Self {
            reveals: RevealController::new(cfg.reveal.clone()),
            counters: CounterController::new(cfg.counters.clone()),
            resize: ResizeCoordinator::new(cfg.resize_debounce_ms),
            pins: Vec::new(),
            registry: TriggerRegistry::new(),
            tweens: TweenEngine::new(),
            timers: TimerQueue::new(),
            clock_ms: 0.0,
            scroll_y: 0.0,
            is_ready: false,
            outputs: Outputs::default(),
            cfg,
            doc,
        }
    }

    /// Page-ready setup: register reveals, then counters, then pins.
    /// Calling it again is a no-op.
    pub fn ready(&mut self) -> &Outputs {
        self.outputs.clear();
        if self.is_ready {
            return &self.outputs;
        }
        self.is_ready = true;

        let mut events = Outputs::default();
        {
            let mut doc = RecordingDocument::new(&mut self.doc, &mut self.outputs);

            for r in self
                .reveals
                .register_all(&mut doc, &mut self.tweens, &mut self.registry)
            {
                events.push_event(CoreEvent::RevealRegistered {
                    element: r.element,
                    trigger: r.trigger,
                });
            }

            self.counters.register_counters(
                &mut doc,
                &mut self.tweens,
                &mut self.registry,
                &mut events,
            );

            let gate = BreakpointGate::new(self.cfg.pin_breakpoint);
            self.pins = self
                .cfg
                .pins
                .iter()
                .map(|section| {
                    PinController::new(section, &doc, gate, self.cfg.pin_offset)
                        .with_anticipation(self.cfg.anticipate_pin)
                        .with_pinned_class(self.cfg.pinned_class.clone())
                })
                .collect();
            for pin in &mut self.pins {
                let t = pin.setup(&doc, &mut self.registry);
                record_pin(&mut events, pin.name(), t);
            }
        }
        self.outputs.append(&mut events);
        &self.outputs
    }

    /// Step the page by `dt` seconds with this frame's inputs.
    pub fn update(&mut self, dt: f64, inputs: Inputs) -> &Outputs {
        self.outputs.clear();
        self.clock_ms += dt.max(0.0) * 1000.0;
        if let Some(y) = inputs.scroll_y {
            self.scroll_y = y;
        }
        if inputs.resized {
            self.resize.on_resize(self.clock_ms, &mut self.timers);
        }

        let mut events = Outputs::default();
        {
            let mut doc = RecordingDocument::new(&mut self.doc, &mut self.outputs);

            for (handle, task) in self.timers.take_due(self.clock_ms) {
                match task {
                    ScheduledTask::ResizeSettled => {
                        let Some(burst) = self.resize.settle(handle) else {
                            continue;
                        };
                        log::debug!(
                            "resize settled after {burst} event(s), width {}",
                            doc.viewport_width()
                        );
                        // Boundaries first: pin geometry reads the refreshed layout.
                        let triggers = self.registry.refresh_all(&doc);
                        events.push_event(CoreEvent::Refreshed { triggers });
                        for pin in &mut self.pins {
                            let t = pin.setup(&doc, &mut self.registry);
                            record_pin(&mut events, pin.name(), t);
                        }
                    }
                }
            }

            self.registry
                .update(self.scroll_y, &mut doc, &mut self.tweens, &mut events);
            self.tweens.step(dt, &mut doc, &mut events);
        }
        self.outputs.append(&mut events);
        &self.outputs
    }
}

impl<D: Document> Engine<D> {
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable access for hosts that mirror layout into the document.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn tweens(&self) -> &TweenEngine {
        &self.tweens
    }

    pub fn pins(&self) -> &[PinController] {
        &self.pins
    }

    /// Number of sections currently holding a pin session.
    pub fn active_pin_sessions(&self) -> usize {
        self.pins.iter().filter(|p| p.is_active()).count()
    }

    pub fn reveals(&self) -> &[Reveal] {
        self.reveals.reveals()
    }

    pub fn counters(&self) -> &[CounterSpec] {
        self.counters.counters()
    }

    /// Live value of a counter's tween.
    pub fn counter_value(&self, counter: &CounterSpec) -> Option<f64> {
        self.tweens.value(counter.tween)
    }

    pub fn live_triggers(&self) -> usize {
        self.registry.live_count()
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}
