//! Tweening capability and a headless stepping engine.
//!
//! Tweens are created paused and driven by toggle actions from the trigger
//! registry; `step` advances every playing tween by `dt` seconds and renders
//! it into the document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, StyleProperty};
use crate::ids::{ElementId, IdAllocator, TweenId};
use crate::interp::{functions::lerp, Ease};
use crate::outputs::{CoreEvent, Outputs};
use crate::trigger::ToggleAction;

/// Per-frame callback for value tweens, called with the interpolated value.
pub type OnUpdate = Box<dyn FnMut(f64, &mut dyn Document)>;

/// Subset of inline style a tween can drive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Vertical offset in px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl StyleSet {
    pub fn opacity(value: f64) -> Self {
        Self {
            opacity: Some(value),
            y: None,
        }
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    fn entries(&self) -> impl Iterator<Item = (StyleProperty, f64)> {
        [
            self.opacity.map(|v| (StyleProperty::Opacity, v)),
            self.y.map(|v| (StyleProperty::TranslateY, v)),
        ]
        .into_iter()
        .flatten()
    }

    fn get(&self, prop: StyleProperty) -> Option<f64> {
        match prop {
            StyleProperty::Opacity => self.opacity,
            StyleProperty::TranslateY => self.y,
            StyleProperty::PinOffset => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TweenOptions {
    /// Seconds.
    pub duration: f64,
    pub ease: Ease,
    /// Start paused; a trigger (or an explicit action) starts it.
    pub paused: bool,
}

impl TweenOptions {
    pub fn triggered(duration: f64, ease: Ease) -> Self {
        Self {
            duration,
            ease,
            paused: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenState {
    Idle,
    Playing,
    Reversing,
    Paused,
    Complete,
}

/// Tweening capability consumed by the controllers.
pub trait Tweener {
    /// Tween `element` styles from `from` to `to`. `from` is rendered immediately.
    fn from_to(
        &mut self,
        element: ElementId,
        from: StyleSet,
        to: StyleSet,
        opts: TweenOptions,
        doc: &mut dyn Document,
    ) -> TweenId;

    /// Tween a bare number, reporting each frame through `on_update`.
    fn animate(&mut self, from: f64, to: f64, opts: TweenOptions, on_update: OnUpdate) -> TweenId;

    /// Apply a toggle action. Unknown ids are ignored.
    fn apply(&mut self, tween: TweenId, action: ToggleAction);
}

enum TweenTarget {
    Style {
        element: ElementId,
        from: StyleSet,
        to: StyleSet,
    },
    Value {
        from: f64,
        to: f64,
        current: f64,
        on_update: OnUpdate,
    },
}

impl fmt::Debug for TweenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweenTarget::Style { element, from, to } => f
                .debug_struct("Style")
                .field("element", element)
                .field("from", from)
                .field("to", to)
                .finish(),
            TweenTarget::Value {
                from, to, current, ..
            } => f
                .debug_struct("Value")
                .field("from", from)
                .field("to", to)
                .field("current", current)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug)]
struct Tween {
    id: TweenId,
    target: TweenTarget,
    duration: f64,
    ease: Ease,
    /// Linear time fraction in [0, 1].
    progress: f64,
    state: TweenState,
    /// Direction to continue in after a pause.
    reversed: bool,
    /// Jumped by an action; render on the next step even if not running.
    dirty: bool,
}

impl Tween {
    fn render(&mut self, doc: &mut dyn Document) {
        let eased = self.ease.apply(self.progress);
        match &mut self.target {
            TweenTarget::Style { element, from, to } => {
                for (prop, end) in to.entries() {
                    let start = from.get(prop).unwrap_or(end);
                    doc.set_style(*element, prop, lerp(start, end, eased));
                }
            }
            TweenTarget::Value {
                from,
                to,
                current,
                on_update,
            } => {
                *current = lerp(*from, *to, eased);
                on_update(*current, doc);
            }
        }
    }

    fn is_running(&self) -> bool {
        matches!(self.state, TweenState::Playing | TweenState::Reversing)
    }
}

/// Headless tween engine stepped by the host clock.
#[derive(Debug, Default)]
pub struct TweenEngine {
    ids: IdAllocator,
    tweens: Vec<Tween>,
    /// Events raised by actions between steps.
    pending: Vec<CoreEvent>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|t| t.id == id)
    }

    fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.id == id)
    }

    fn insert(&mut self, target: TweenTarget, opts: TweenOptions) -> TweenId {
        let id = self.ids.alloc_tween();
        let state = if opts.paused {
            TweenState::Idle
        } else {
            self.pending.push(CoreEvent::TweenStarted { tween: id });
            TweenState::Playing
        };
        self.tweens.push(Tween {
            id,
            target,
            duration: opts.duration.max(0.0),
            ease: opts.ease,
            progress: 0.0,
            state,
            reversed: false,
            dirty: false,
        });
        id
    }

    pub fn state(&self, id: TweenId) -> Option<TweenState> {
        self.get(id).map(|t| t.state)
    }

    /// Current interpolated value of a value tween, or eased progress of a style tween.
    pub fn value(&self, id: TweenId) -> Option<f64> {
        self.get(id).map(|t| match &t.target {
            TweenTarget::Value { current, .. } => *current,
            TweenTarget::Style { .. } => t.ease.apply(t.progress),
        })
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn running(&self) -> usize {
        self.tweens.iter().filter(|t| t.is_running()).count()
    }

    /// Advance every running tween by `dt` seconds and render it.
    pub fn step(&mut self, dt: f64, doc: &mut dyn Document, out: &mut Outputs) {
        for ev in self.pending.drain(..) {
            out.push_event(ev);
        }
        for tween in self.tweens.iter_mut() {
            if !tween.is_running() {
                if std::mem::take(&mut tween.dirty) {
                    tween.render(doc);
                }
                continue;
            }
            tween.dirty = false;
            let delta = if tween.duration > 0.0 {
                dt / tween.duration
            } else {
                1.0
            };
            match tween.state {
                TweenState::Playing => {
                    tween.progress = (tween.progress + delta).min(1.0);
                    tween.render(doc);
                    if tween.progress >= 1.0 {
                        tween.state = TweenState::Complete;
                        out.push_event(CoreEvent::TweenCompleted { tween: tween.id });
                    }
                }
                TweenState::Reversing => {
                    tween.progress = (tween.progress - delta).max(0.0);
                    tween.render(doc);
                    if tween.progress <= 0.0 {
                        tween.state = TweenState::Idle;
                        tween.reversed = false;
                    }
                }
                _ => {}
            }
        }
    }

    fn start(&mut self, id: TweenId, forward: bool) {
        let Some(t) = self.get_mut(id) else {
            return;
        };
        let was_running = t.is_running();
        t.reversed = !forward;
        t.state = if forward {
            TweenState::Playing
        } else {
            TweenState::Reversing
        };
        if forward && !was_running {
            self.pending.push(CoreEvent::TweenStarted { tween: id });
        }
    }
}

impl Tweener for TweenEngine {
    fn from_to(
        &mut self,
        element: ElementId,
        from: StyleSet,
        to: StyleSet,
        opts: TweenOptions,
        doc: &mut dyn Document,
    ) -> TweenId {
        for (prop, v) in from.entries() {
            doc.set_style(element, prop, v);
        }
        self.insert(TweenTarget::Style { element, from, to }, opts)
    }

    fn animate(&mut self, from: f64, to: f64, opts: TweenOptions, on_update: OnUpdate) -> TweenId {
        self.insert(
            TweenTarget::Value {
                from,
                to,
                current: from,
                on_update,
            },
            opts,
        )
    }

    fn apply(&mut self, id: TweenId, action: ToggleAction) {
        let Some(t) = self.get(id) else {
            return;
        };
        let (state, progress, reversed) = (t.state, t.progress, t.reversed);
        match action {
            ToggleAction::None => {}
            ToggleAction::Play => {
                // A finished tween stays finished.
                if state != TweenState::Complete && state != TweenState::Playing {
                    self.start(id, true);
                }
            }
            ToggleAction::Resume => {
                if state == TweenState::Paused {
                    self.start(id, !reversed);
                }
            }
            ToggleAction::Reverse => {
                if progress > 0.0 {
                    self.start(id, false);
                }
            }
            ToggleAction::Pause => {
                if let Some(t) = self.get_mut(id) {
                    if t.is_running() {
                        t.state = TweenState::Paused;
                    }
                }
            }
            ToggleAction::Restart => {
                if let Some(t) = self.get_mut(id) {
                    t.progress = 0.0;
                    t.state = TweenState::Idle;
                }
                self.start(id, true);
            }
            ToggleAction::Reset => {
                if let Some(t) = self.get_mut(id) {
                    t.progress = 0.0;
                    t.state = TweenState::Idle;
                    t.reversed = false;
                    t.dirty = true;
                }
            }
            ToggleAction::Complete => {
                if state == TweenState::Complete {
                    return;
                }
                if let Some(t) = self.get_mut(id) {
                    t.progress = 1.0;
                    t.state = TweenState::Complete;
                    t.dirty = true;
                }
                self.pending.push(CoreEvent::TweenCompleted { tween: id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn card() -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new(1200.0, 800.0);
        let el = doc.push_box(None, "div", "card", 0.0, 100.0, "");
        (doc, el)
    }

    #[test]
    fn from_to_renders_start_immediately() {
        let (mut doc, el) = card();
        let mut engine = TweenEngine::new();
        engine.from_to(
            el,
            StyleSet::opacity(0.0).with_y(50.0),
            StyleSet::opacity(1.0).with_y(0.0),
            TweenOptions::triggered(0.8, Ease::default()),
            &mut doc,
        );
        assert_eq!(doc.style(el, StyleProperty::Opacity), Some(0.0));
        assert_eq!(doc.style(el, StyleProperty::TranslateY), Some(50.0));
    }

    #[test]
    fn paused_tween_waits_for_play() {
        let (mut doc, el) = card();
        let mut engine = TweenEngine::new();
        let mut out = Outputs::default();
        let id = engine.from_to(
            el,
            StyleSet::opacity(0.0),
            StyleSet::opacity(1.0),
            TweenOptions::triggered(1.0, Ease::Linear),
            &mut doc,
        );
        engine.step(0.5, &mut doc, &mut out);
        assert_eq!(engine.state(id), Some(TweenState::Idle));

        engine.apply(id, ToggleAction::Play);
        engine.step(0.5, &mut doc, &mut out);
        assert!((doc.style(el, StyleProperty::Opacity).unwrap() - 0.5).abs() < 1e-9);
        engine.step(0.6, &mut doc, &mut out);
        assert_eq!(engine.state(id), Some(TweenState::Complete));
        assert_eq!(doc.style(el, StyleProperty::Opacity), Some(1.0));
        assert!(out.events.contains(&CoreEvent::TweenStarted { tween: id }));
        assert!(out.events.contains(&CoreEvent::TweenCompleted { tween: id }));
    }

    #[test]
    fn play_on_complete_is_noop() {
        let (mut doc, _) = card();
        let mut engine = TweenEngine::new();
        let mut out = Outputs::default();
        let id = engine.animate(
            0.0,
            10.0,
            TweenOptions::triggered(0.1, Ease::Linear),
            Box::new(|_: f64, _: &mut dyn Document| {}),
        );
        engine.apply(id, ToggleAction::Play);
        engine.step(1.0, &mut doc, &mut out);
        out.clear();
        engine.apply(id, ToggleAction::Play);
        engine.step(1.0, &mut doc, &mut out);
        assert!(out.events.is_empty());
        assert_eq!(engine.value(id), Some(10.0));
    }

    #[test]
    fn value_tween_calls_on_update_each_frame() {
        let (mut doc, _) = card();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut engine = TweenEngine::new();
        let mut out = Outputs::default();
        let id = engine.animate(
            0.0,
            100.0,
            TweenOptions::triggered(2.0, Ease::Linear),
            Box::new(move |v: f64, _: &mut dyn Document| sink.borrow_mut().push(v)),
        );
        engine.apply(id, ToggleAction::Play);
        for _ in 0..4 {
            engine.step(0.5, &mut doc, &mut out);
        }
        assert_eq!(*seen.borrow(), vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn reverse_and_restart() {
        let (mut doc, el) = card();
        let mut engine = TweenEngine::new();
        let mut out = Outputs::default();
        let id = engine.from_to(
            el,
            StyleSet::opacity(0.0),
            StyleSet::opacity(1.0),
            TweenOptions::triggered(1.0, Ease::Linear),
            &mut doc,
        );
        engine.apply(id, ToggleAction::Play);
        engine.step(0.5, &mut doc, &mut out);
        engine.apply(id, ToggleAction::Reverse);
        engine.step(1.0, &mut doc, &mut out);
        assert_eq!(engine.state(id), Some(TweenState::Idle));
        assert_eq!(doc.style(el, StyleProperty::Opacity), Some(0.0));

        engine.apply(id, ToggleAction::Restart);
        assert_eq!(engine.state(id), Some(TweenState::Playing));
        engine.apply(id, ToggleAction::Pause);
        engine.step(1.0, &mut doc, &mut out);
        assert_eq!(engine.state(id), Some(TweenState::Paused));
        engine.apply(id, ToggleAction::Resume);
        assert_eq!(engine.state(id), Some(TweenState::Playing));
    }

    #[test]
    fn complete_and_reset_render_on_next_step() {
        let (mut doc, el) = card();
        let mut engine = TweenEngine::new();
        let mut out = Outputs::default();
        let id = engine.from_to(
            el,
            StyleSet::opacity(0.0),
            StyleSet::opacity(1.0),
            TweenOptions::triggered(1.0, Ease::Linear),
            &mut doc,
        );
        engine.apply(id, ToggleAction::Complete);
        engine.step(0.0, &mut doc, &mut out);
        assert_eq!(doc.style(el, StyleProperty::Opacity), Some(1.0));
        assert_eq!(out.events, vec![CoreEvent::TweenCompleted { tween: id }]);

        engine.apply(id, ToggleAction::Reset);
        engine.step(0.0, &mut doc, &mut out);
        assert_eq!(engine.state(id), Some(TweenState::Idle));
        assert_eq!(doc.style(el, StyleProperty::Opacity), Some(0.0));
    }
}
