use vizij_scroll_core::{
    config::Config,
    dom::{MemoryDocument, PageLayout},
    engine::Engine,
    inputs::Inputs,
    outputs::{CoreEvent, Outputs},
};

fn landing() -> Engine<MemoryDocument> {
    let layout: PageLayout =
        vizij_test_fixtures::pages::load("landing").expect("landing fixture should load");
    let mut engine = Engine::new(MemoryDocument::from_layout(&layout), Config::default());
    engine.ready();
    engine
}

fn refreshes(out: &Outputs) -> usize {
    out.events
        .iter()
        .filter(|e| matches!(e, CoreEvent::Refreshed { .. }))
        .count()
}

#[test]
fn burst_settles_once_after_quiet_period() {
    let mut engine = landing();

    // Resize events at 0, 125 and 250 ms.
    assert_eq!(refreshes(engine.update(0.0, Inputs::resize())), 0);
    assert_eq!(refreshes(engine.update(0.125, Inputs::resize())), 0);
    assert_eq!(refreshes(engine.update(0.125, Inputs::resize())), 0);

    // 250 ms after the last event, not before.
    assert_eq!(refreshes(engine.update(0.125, Inputs::default())), 0);
    let out_refreshes = refreshes(engine.update(0.125, Inputs::default()));
    assert_eq!(engine.clock_ms(), 500.0);
    assert_eq!(out_refreshes, 1);

    for _ in 0..8 {
        assert_eq!(refreshes(engine.update(0.125, Inputs::default())), 0);
    }
}

#[test]
fn refresh_precedes_pin_rebuild() {
    let mut engine = landing();
    engine.update(0.0, Inputs::resize());
    let out = engine.update(0.5, Inputs::default());

    let refreshed = out
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::Refreshed { .. }))
        .expect("refresh ran");
    let first_destroy = out
        .events
        .iter()
        .position(|e| matches!(e, CoreEvent::PinDestroyed { .. }))
        .expect("pins torn down");
    let last_create = out
        .events
        .iter()
        .rposition(|e| matches!(e, CoreEvent::PinCreated { .. }))
        .expect("pins rebuilt");
    assert!(refreshed < first_destroy);
    assert!(first_destroy < last_create);
    assert_eq!(engine.active_pin_sessions(), 2);
}

#[test]
fn configured_delay_is_honored() {
    let layout: PageLayout =
        vizij_test_fixtures::pages::load("landing").expect("landing fixture should load");
    let cfg: Config = vizij_test_fixtures::configs::load("single-pin").expect("config fixture");
    assert_eq!(cfg.resize_debounce_ms, 100.0);
    let mut engine = Engine::new(MemoryDocument::from_layout(&layout), cfg);
    engine.ready();
    assert_eq!(engine.pins().len(), 1);

    engine.update(0.0, Inputs::resize());
    assert_eq!(refreshes(engine.update(0.0625, Inputs::default())), 0);
    assert_eq!(refreshes(engine.update(0.0625, Inputs::default())), 1);
}

#[test]
fn scroll_without_resize_schedules_nothing() {
    let mut engine = landing();
    for y in [0.0, 400.0, 800.0, 1200.0] {
        engine.update(0.125, Inputs::scroll(y));
    }
    assert_eq!(refreshes(engine.update(1.0, Inputs::default())), 0);
}
