use vizij_scroll_core::{
    config::Config,
    dom::{Document, MemoryDocument, PageLayout, StyleProperty},
    engine::Engine,
    inputs::Inputs,
    observer::ScrollObserver,
    outputs::CoreEvent,
};

fn landing_at(width: f64) -> Engine<MemoryDocument> {
    let layout: PageLayout =
        vizij_test_fixtures::pages::load("landing").expect("landing fixture should load");
    let mut doc = MemoryDocument::from_layout(&layout);
    doc.set_viewport(width, layout.viewport.height);
    let mut engine = Engine::new(doc, Config::default());
    engine.ready();
    engine
}

/// Resize the viewport and let the debounce window elapse.
fn resize_and_settle(engine: &mut Engine<MemoryDocument>, width: f64) -> Vec<CoreEvent> {
    let height = engine.document().viewport_height();
    engine.document_mut().set_viewport(width, height);
    let mut events = engine.update(0.0, Inputs::resize()).events.clone();
    events.extend(engine.update(0.5, Inputs::default()).events.iter().cloned());
    events
}

fn distances(engine: &Engine<MemoryDocument>) -> Vec<(String, f64)> {
    engine
        .pins()
        .iter()
        .filter_map(|p| p.session().map(|s| (p.name().to_string(), s.distance)))
        .collect()
}

#[test]
fn wide_viewport_pins_both_sections() {
    let engine = landing_at(1280.0);
    assert_eq!(engine.active_pin_sessions(), 2);
    assert_eq!(engine.registry().pin_count(), 2);
    assert_eq!(
        distances(&engine),
        vec![("servicos".to_string(), 1400.0), ("setores".to_string(), 1176.0)]
    );
}

#[test]
fn breakpoint_is_inclusive() {
    assert_eq!(landing_at(960.0).active_pin_sessions(), 2);
    let narrow = landing_at(959.5);
    assert_eq!(narrow.active_pin_sessions(), 0);
    assert_eq!(narrow.registry().pin_count(), 0);
}

#[test]
fn ready_twice_registers_once() {
    let mut engine = landing_at(1280.0);
    let live = engine.live_triggers();
    assert!(engine.ready().is_empty());
    assert_eq!(engine.live_triggers(), live);
    assert_eq!(engine.registry().pin_count(), 2);
}

#[test]
fn resize_cycle_never_leaks_sessions() {
    let mut engine = landing_at(1200.0);

    let events = resize_and_settle(&mut engine, 800.0);
    assert_eq!(engine.active_pin_sessions(), 0);
    assert_eq!(engine.registry().pin_count(), 0);
    let destroyed = events
        .iter()
        .filter(|e| matches!(e, CoreEvent::PinDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 2);

    resize_and_settle(&mut engine, 1200.0);
    assert_eq!(engine.active_pin_sessions(), 2);
    assert_eq!(engine.registry().pin_count(), 2);

    // Widening again rebuilds rather than stacking a second trigger.
    let events = resize_and_settle(&mut engine, 1400.0);
    assert_eq!(engine.registry().pin_count(), 2);
    let created = events
        .iter()
        .filter(|e| matches!(e, CoreEvent::PinCreated { .. }))
        .count();
    assert_eq!(created, 2);
    for pin in engine.pins() {
        assert_eq!(pin.session().map(|s| s.width), Some(1400.0));
    }
}

#[test]
fn geometry_is_recomputed_after_resize() {
    let mut engine = landing_at(1280.0);
    let subtitle = engine
        .document()
        .query(".servicos-subtitle")
        .expect("subtitle present");
    // Subtitle wraps onto a second line.
    engine.document_mut().set_height(subtitle, 100.0);
    resize_and_settle(&mut engine, 1100.0);

    let servicos = engine.pins()[0].session().expect("servicos pinned");
    assert_eq!(servicos.distance, 1600.0 - (56.0 + 100.0) - 96.0);
    assert!(engine.registry().is_live(servicos.trigger));
}

#[test]
fn header_follows_scroll_while_pinned() {
    let mut engine = landing_at(1280.0);
    let header = engine.pins()[0].session().expect("pinned").header;

    engine.update(0.016, Inputs::scroll(2900.0));
    let out = engine.update(0.016, Inputs::scroll(3000.0));
    assert!(out.events.iter().all(|e| !matches!(e, CoreEvent::PinReleased { .. })));
    let doc = engine.document();
    assert_eq!(doc.style(header, StyleProperty::PinOffset), Some(700.0));
    assert!(doc.has_class(header, "is-pinned"));

    // Past the end the header stays at the full pin distance.
    engine.update(0.016, Inputs::scroll(4000.0));
    engine.update(0.016, Inputs::scroll(4100.0));
    let doc = engine.document();
    assert_eq!(doc.style(header, StyleProperty::PinOffset), Some(1400.0));
    assert!(!doc.has_class(header, "is-pinned"));
}

#[test]
fn narrowing_while_pinned_releases_header() {
    let mut engine = landing_at(1280.0);
    let header = engine.pins()[0].session().expect("pinned").header;
    engine.update(0.016, Inputs::scroll(2900.0));
    engine.update(0.016, Inputs::scroll(3000.0));
    assert!(engine.document().has_class(header, "is-pinned"));

    let events = resize_and_settle(&mut engine, 800.0);
    let trigger = events
        .iter()
        .find_map(|e| match e {
            CoreEvent::PinDestroyed { section, trigger } if section == "servicos" => Some(*trigger),
            _ => None,
        })
        .expect("servicos pin destroyed");
    assert!(events.contains(&CoreEvent::PinReleased {
        trigger,
        element: header
    }));
    let doc = engine.document();
    assert_eq!(doc.style(header, StyleProperty::PinOffset), Some(0.0));
    assert!(!doc.has_class(header, "is-pinned"));
}

#[test]
fn missing_sections_are_silent() {
    let layout: PageLayout = vizij_test_fixtures::pages::load("landing-no-sections")
        .expect("fixture should load");
    let mut engine = Engine::new(MemoryDocument::from_layout(&layout), Config::default());
    let out = engine.ready();
    assert!(out.events.iter().all(|e| !matches!(e, CoreEvent::PinCreated { .. })));
    assert_eq!(engine.active_pin_sessions(), 0);
    assert_eq!(engine.pins().len(), 2);

    resize_and_settle(&mut engine, 1600.0);
    assert_eq!(engine.active_pin_sessions(), 0);
}
