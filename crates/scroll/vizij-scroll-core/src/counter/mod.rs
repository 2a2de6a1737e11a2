//! Counter Controller: animate numeric labels from zero to their value.

pub mod notation;

use crate::config::CounterCfg;
use crate::dom::Document;
use crate::error::ScrollError;
use crate::ids::{ElementId, TriggerId, TweenId};
use crate::observer::ScrollObserver;
use crate::outputs::{CoreEvent, Outputs};
use crate::trigger::TriggerDescriptor;
use crate::tween::{StyleSet, TweenOptions, Tweener};

pub use notation::{classify, LabelKind, Notation, NOTATIONS};

/// A label being counted up.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterSpec {
    pub element: ElementId,
    pub target: f64,
    pub notation: &'static Notation,
    /// Value tween holding the live count.
    pub tween: TweenId,
    pub trigger: TriggerId,
}

impl CounterSpec {
    pub fn display(&self, value: f64) -> String {
        self.notation.format(value)
    }
}

#[derive(Debug)]
pub struct CounterController {
    cfg: CounterCfg,
    counters: Vec<CounterSpec>,
}

impl CounterController {
    pub fn new(cfg: CounterCfg) -> Self {
        Self {
            cfg,
            counters: Vec::new(),
        }
    }

    pub fn counters(&self) -> &[CounterSpec] {
        &self.counters
    }

    /// Scan the configured scope and register every recognized label.
    /// A missing scope is a no-op.
    pub fn register_counters(
        &mut self,
        doc: &mut dyn Document,
        tweens: &mut dyn Tweener,
        observer: &mut dyn ScrollObserver,
        out: &mut Outputs,
    ) -> usize {
        let Some(scope) = doc.query(&self.cfg.scope) else {
            log::debug!("counter scope {:?} matched nothing", self.cfg.scope);
            return 0;
        };
        let before = self.counters.len();
        for element in doc.query_within(scope, &self.cfg.label) {
            if let Err(err) = self.register_label(scope, element, doc, tweens, observer, out) {
                if self.cfg.warn_unrecognized {
                    log::warn!("[{}] {err}; left as is", err.category());
                } else {
                    log::trace!("[{}] {err}", err.category());
                }
            }
        }
        self.counters.len() - before
    }

    /// Skipped labels come back as a silent [`ScrollError`] after their
    /// `LabelSkipped` event is recorded.
    pub(crate) fn register_label(
        &mut self,
        scope: ElementId,
        element: ElementId,
        doc: &mut dyn Document,
        tweens: &mut dyn Tweener,
        observer: &mut dyn ScrollObserver,
        out: &mut Outputs,
    ) -> Result<(), ScrollError> {
        let text = doc.text(element).unwrap_or_default();
        let text = text.trim();
        match classify(text) {
            LabelKind::Counter { notation, target } => {
                doc.set_text(element, &notation.zero());
                let format = notation.format;
                let tween = tweens.animate(
                    0.0,
                    target,
                    TweenOptions::triggered(self.cfg.duration, self.cfg.ease),
                    Box::new(move |value: f64, doc: &mut dyn Document| {
                        doc.set_text(element, &format(value));
                    }),
                );
                let trigger = observer.register(
                    TriggerDescriptor::new(scope, self.cfg.start)
                        .playing(tween, self.cfg.toggle_actions),
                );
                out.push_event(CoreEvent::CounterRegistered {
                    element,
                    target,
                    notation: notation.name.to_string(),
                });
                self.counters.push(CounterSpec {
                    element,
                    target,
                    notation,
                    tween,
                    trigger,
                });
            }
            LabelKind::FadeOnly => {
                let tween = tweens.from_to(
                    element,
                    StyleSet::opacity(0.0),
                    StyleSet::opacity(1.0),
                    TweenOptions::triggered(self.cfg.fade_duration, self.cfg.ease),
                    doc,
                );
                observer.register(
                    TriggerDescriptor::new(scope, self.cfg.start)
                        .playing(tween, self.cfg.toggle_actions),
                );
                out.push_event(CoreEvent::LabelFaded { element });
            }
            LabelKind::Unrecognized => {
                out.push_event(CoreEvent::LabelSkipped {
                    element,
                    text: text.to_string(),
                });
                return Err(ScrollError::UnrecognizedNotation {
                    text: text.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, StyleProperty};
    use crate::observer::TriggerRegistry;
    use crate::tween::TweenEngine;

    fn grid(labels: &[&str]) -> (MemoryDocument, Vec<ElementId>) {
        let mut doc = MemoryDocument::new(1200.0, 900.0);
        let grid = doc.push_box(None, "div", "sobre-nos-grid", 3000.0, 400.0, "");
        let els = labels
            .iter()
            .map(|t| doc.push_box(Some(grid), "h3", "", 3000.0, 40.0, t))
            .collect();
        (doc, els)
    }

    #[test]
    fn zero_state_is_rendered_at_registration() {
        let (mut doc, els) = grid(&["98,6%", "+25mil", "+500"]);
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut out = Outputs::default();
        let mut ctl = CounterController::new(CounterCfg::default());
        assert_eq!(ctl.register_counters(&mut doc, &mut tweens, &mut reg, &mut out), 3);
        let texts: Vec<_> = els.iter().filter_map(|&e| doc.text(e)).collect();
        assert_eq!(texts, vec!["0,0%", "+0mil", "+0"]);
        assert_eq!(reg.live_count(), 3);
        assert_eq!(ctl.counters()[1].target, 25000.0);
        assert_eq!(ctl.counters()[1].display(12499.0), "+12mil");
    }

    #[test]
    fn fade_only_and_unknown_labels() {
        let (mut doc, els) = grid(&["24/7", "N/A"]);
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut out = Outputs::default();
        let mut ctl = CounterController::new(CounterCfg::default());
        assert_eq!(ctl.register_counters(&mut doc, &mut tweens, &mut reg, &mut out), 0);
        assert_eq!(doc.text(els[0]).as_deref(), Some("24/7"));
        assert_eq!(doc.style(els[0], StyleProperty::Opacity), Some(0.0));
        assert_eq!(doc.text(els[1]).as_deref(), Some("N/A"));
        assert_eq!(doc.style(els[1], StyleProperty::Opacity), None);
        // only the fade registers a trigger
        assert_eq!(reg.live_count(), 1);
        assert_eq!(tweens.len(), 1);
        assert!(out.events.contains(&CoreEvent::LabelFaded { element: els[0] }));
        assert!(out.events.contains(&CoreEvent::LabelSkipped {
            element: els[1],
            text: "N/A".into()
        }));
    }

    #[test]
    fn unknown_label_reports_silent_error() {
        let (mut doc, els) = grid(&["N/A", "+500"]);
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut out = Outputs::default();
        let mut ctl = CounterController::new(CounterCfg::default());
        let scope = doc.query(&CounterCfg::default().scope).expect("grid present");

        let err = ctl
            .register_label(scope, els[0], &mut doc, &mut tweens, &mut reg, &mut out)
            .unwrap_err();
        assert_eq!(err, ScrollError::UnrecognizedNotation { text: "N/A".into() });
        assert_eq!(err.category(), "unrecognized-notation");
        assert!(err.is_silent());

        ctl.register_label(scope, els[1], &mut doc, &mut tweens, &mut reg, &mut out)
            .expect("+500 is a counter");
        assert_eq!(ctl.counters().len(), 1);
    }

    #[test]
    fn missing_scope_is_noop() {
        let mut doc = MemoryDocument::new(1200.0, 900.0);
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut out = Outputs::default();
        let mut ctl = CounterController::new(CounterCfg::default());
        assert_eq!(ctl.register_counters(&mut doc, &mut tweens, &mut reg, &mut out), 0);
        assert!(out.is_empty());
    }
}
