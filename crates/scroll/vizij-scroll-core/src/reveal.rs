//! Reveal Controller: fade/slide-in for fixed selector groups.

use serde::{Deserialize, Serialize};

use crate::config::RevealCfg;
use crate::dom::Document;
use crate::ids::{ElementId, TriggerId, TweenId};
use crate::observer::ScrollObserver;
use crate::trigger::TriggerDescriptor;
use crate::tween::{StyleSet, TweenOptions, Tweener};

/// One registered reveal.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub element: ElementId,
    pub tween: TweenId,
    pub trigger: TriggerId,
}

#[derive(Debug)]
pub struct RevealController {
    cfg: RevealCfg,
    reveals: Vec<Reveal>,
}

impl RevealController {
    pub fn new(cfg: RevealCfg) -> Self {
        Self {
            cfg,
            reveals: Vec::new(),
        }
    }

    pub fn reveals(&self) -> &[Reveal] {
        &self.reveals
    }

    /// Register a reveal for every element of every selector group.
    /// Groups matching nothing are skipped.
    pub fn register_all(
        &mut self,
        doc: &mut dyn Document,
        tweens: &mut dyn Tweener,
        observer: &mut dyn ScrollObserver,
    ) -> &[Reveal] {
        let first_new = self.reveals.len();
        for selector in &self.cfg.selectors {
            let elements = doc.query_all(selector);
            if elements.is_empty() {
                log::debug!("reveal group {selector:?} matched nothing");
            }
            for element in elements {
                let reveal = register_one(&self.cfg, element, doc, tweens, observer);
                self.reveals.push(reveal);
            }
        }
        &self.reveals[first_new..]
    }
}

fn register_one(
    cfg: &RevealCfg,
    element: ElementId,
    doc: &mut dyn Document,
    tweens: &mut dyn Tweener,
    observer: &mut dyn ScrollObserver,
) -> Reveal {
    let tween = tweens.from_to(
        element,
        StyleSet::opacity(0.0).with_y(cfg.offset_y),
        StyleSet::opacity(1.0).with_y(0.0),
        TweenOptions::triggered(cfg.duration, cfg.ease),
        doc,
    );
    let trigger = observer.register(
        TriggerDescriptor::new(element, cfg.start)
            .with_end(cfg.end)
            .playing(tween, cfg.toggle_actions),
    );
    Reveal {
        element,
        tween,
        trigger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, StyleProperty};
    use crate::observer::TriggerRegistry;
    use crate::tween::TweenEngine;

    #[test]
    fn registers_each_match_and_hides_it() {
        let mut doc = MemoryDocument::new(1200.0, 900.0);
        let a = doc.push_box(None, "div", "servicos-card", 100.0, 300.0, "");
        let b = doc.push_box(None, "div", "servicos-card", 500.0, 300.0, "");
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut ctl = RevealController::new(RevealCfg::default());
        let reveals = ctl.register_all(&mut doc, &mut tweens, &mut reg).to_vec();
        assert_eq!(reveals.iter().map(|r| r.element).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(reg.live_count(), 2);
        assert_eq!(tweens.len(), 2);
        assert_eq!(doc.style(a, StyleProperty::Opacity), Some(0.0));
        assert_eq!(doc.style(b, StyleProperty::TranslateY), Some(50.0));
    }

    #[test]
    fn empty_page_registers_nothing() {
        let mut doc = MemoryDocument::new(1200.0, 900.0);
        let mut tweens = TweenEngine::new();
        let mut reg = TriggerRegistry::new();
        let mut ctl = RevealController::new(RevealCfg::default());
        assert!(ctl.register_all(&mut doc, &mut tweens, &mut reg).is_empty());
        assert_eq!(reg.live_count(), 0);
    }
}
