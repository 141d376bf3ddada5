use glam::Vec2;
use step_canvas::input::PointerButton;
use step_canvas::interaction::ConnectMode;
use step_canvas::model::{Handle, StepId, StepType};
use step_canvas::payload::{MessageButton, MessageConfig, StepConfig};
use step_canvas::{Builder, CanvasEvent, Ignored, InteractionMode, LogicEvent, Outcome, StepPatch};

fn seeded() -> (Builder, StepId) {
    let builder = Builder::default();
    let trigger = builder.graph.steps_in_order().next().unwrap().id.clone();
    (builder, trigger)
}

#[test]
fn test_header_drag_moves_step() {
    let (mut builder, trigger) = seeded();

    // 1. Press on the header band of the trigger (at 100,100).
    let events = builder.handle(CanvasEvent::press(Vec2::new(110.0, 110.0)));
    assert!(events.contains(&LogicEvent::SelectionChanged(Some(trigger.clone()))));
    match &builder.state.mode {
        InteractionMode::Dragging { step, offset } => {
            assert_eq!(step, &trigger);
            assert_eq!(*offset, Vec2::new(10.0, 10.0));
        }
        other => panic!("Should be dragging, got {other:?}"),
    }
    assert!(builder.state.tracks_pointer());

    // 2. Drag
    let events = builder.handle(CanvasEvent::PointerMove {
        pos: Vec2::new(160.0, 130.0),
    });
    assert!(events.contains(&LogicEvent::StepMoved {
        id: trigger.clone(),
        position: Vec2::new(150.0, 120.0),
    }));
    assert_eq!(builder.graph.get(&trigger).unwrap().position, Vec2::new(150.0, 120.0));

    // 3. Release, then moves are no longer tracked.
    builder.handle(CanvasEvent::PointerUp {
        pos: Vec2::new(160.0, 130.0),
    });
    assert_eq!(builder.state.mode, InteractionMode::Idle);
    assert!(!builder.state.tracks_pointer());
    let events = builder.handle(CanvasEvent::PointerMove {
        pos: Vec2::new(400.0, 400.0),
    });
    assert!(events.is_empty());
    assert_eq!(builder.graph.get(&trigger).unwrap().position, Vec2::new(150.0, 120.0));
}

#[test]
fn test_drag_is_clamped_to_positive_quadrant() {
    let (mut builder, trigger) = seeded();
    builder.handle(CanvasEvent::press(Vec2::new(110.0, 110.0)));
    builder.handle(CanvasEvent::PointerMove { pos: Vec2::ZERO });
    assert_eq!(builder.graph.get(&trigger).unwrap().position, Vec2::ZERO);
}

#[test]
fn test_body_click_selects_without_dragging() {
    let (mut builder, trigger) = seeded();
    builder.handle(CanvasEvent::press(Vec2::new(110.0, 200.0)));
    assert_eq!(builder.selection(), Some(&trigger));
    assert_eq!(builder.state.mode, InteractionMode::Idle);
}

#[test]
fn test_empty_canvas_click_clears_selection() {
    let (mut builder, trigger) = seeded();
    builder.handle(CanvasEvent::press(Vec2::new(110.0, 200.0)));
    assert_eq!(builder.selection(), Some(&trigger));

    let events = builder.handle(CanvasEvent::press(Vec2::new(1000.0, 700.0)));
    assert_eq!(builder.selection(), None);
    assert!(events.contains(&LogicEvent::SelectionChanged(None)));
}

#[test]
fn test_connect_mode_completes_on_other_step() {
    let (mut builder, trigger) = seeded();
    let message = builder.add_step(StepType::Message); // at (330, 100)

    let events = builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    assert!(events.contains(&LogicEvent::ConnectionArmed(Handle::Step(trigger.clone()))));
    assert_eq!(builder.state.armed(), Some(&Handle::Step(trigger.clone())));

    // Click the message body.
    let events = builder.handle(CanvasEvent::press(Vec2::new(500.0, 200.0)));
    assert!(events.contains(&LogicEvent::ConnectionCreated {
        from: Handle::Step(trigger.clone()),
        to: message.clone(),
    }));
    assert_eq!(builder.state.connect, ConnectMode::Idle);
    assert_eq!(builder.graph.outgoing(&trigger), vec![message]);
    // Completing a connection does not start a drag.
    assert_eq!(builder.state.mode, InteractionMode::Idle);
}

#[test]
fn test_connect_mode_aborts_on_same_step_or_cancel() {
    let (mut builder, trigger) = seeded();
    let _message = builder.add_step(StepType::Message);

    builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    let events = builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    assert!(events.contains(&LogicEvent::ConnectionAborted));
    assert_eq!(builder.state.connect, ConnectMode::Idle);

    builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    builder.handle(CanvasEvent::press(Vec2::new(110.0, 200.0)));
    assert_eq!(builder.state.connect, ConnectMode::Idle);

    builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    builder.handle(CanvasEvent::CancelConnect);
    assert_eq!(builder.state.connect, ConnectMode::Idle);

    assert!(builder.graph.connections.is_empty());
}

#[test]
fn test_connecting_existing_pair_twice_keeps_one_edge() {
    let (mut builder, trigger) = seeded();
    let _message = builder.add_step(StepType::Message);
    for _ in 0..2 {
        builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
        builder.handle(CanvasEvent::press(Vec2::new(500.0, 200.0)));
    }
    assert_eq!(builder.graph.connections.len(), 1);
}

#[test]
fn test_button_handle_arms_synthetic_source() {
    let (mut builder, _trigger) = seeded();
    let message = builder.add_step(StepType::Message); // (330, 100)
    let delay = builder.add_step(StepType::Delay); // (610, 100)
    let config = StepConfig::Message(MessageConfig {
        message: "Pick one".to_string(),
        buttons: vec![
            MessageButton::link("Shop", "https://x.com"),
            MessageButton::automation("Next"),
        ],
        ..Default::default()
    });
    assert!(builder.update_step(&message, StepPatch::config(config)).is_applied());

    // Link buttons are not outputs.
    let events = builder.handle(CanvasEvent::ButtonHandleClicked {
        step: message.clone(),
        index: 0,
    });
    assert!(events.is_empty());
    assert_eq!(builder.state.armed(), None);

    builder.handle(CanvasEvent::ButtonHandleClicked {
        step: message.clone(),
        index: 1,
    });
    builder.handle(CanvasEvent::press(Vec2::new(700.0, 200.0)));

    let document = builder.document();
    assert_eq!(document.connections.len(), 1);
    assert_eq!(document.connections[0].from, format!("{message}_button_1"));
    assert_eq!(document.connections[0].to, delay);
}

#[test]
fn test_deleting_armed_source_disarms() {
    let (mut builder, _trigger) = seeded();
    let message = builder.add_step(StepType::Message);
    builder.handle(CanvasEvent::ConnectClicked(message.clone()));
    assert!(builder.delete_step(&message).is_applied());
    assert_eq!(builder.state.connect, ConnectMode::Idle);
}

#[test]
fn test_zoom_bounds_and_reset() {
    let (mut builder, trigger) = seeded();
    let before = builder.graph.get(&trigger).unwrap().position;

    for _ in 0..20 {
        builder.handle(CanvasEvent::ZoomIn);
        assert!(builder.zoom() <= 2.0);
    }
    assert_eq!(builder.zoom(), 2.0);
    for _ in 0..40 {
        builder.handle(CanvasEvent::ZoomOut);
        assert!(builder.zoom() >= 0.5);
    }
    assert_eq!(builder.zoom(), 0.5);
    for _ in 0..10 {
        builder.handle(CanvasEvent::Scroll {
            pos: Vec2::new(10.0, 10.0),
            delta: -5.0,
        });
        assert!(builder.zoom() >= 0.5);
    }

    builder.handle(CanvasEvent::ZoomReset);
    assert_eq!(builder.zoom(), 1.0);
    assert_eq!(builder.state.view.transform.pan, Vec2::ZERO);
    assert_eq!(builder.graph.get(&trigger).unwrap().position, before);
}

#[test]
fn test_middle_button_pans_and_reset_returns_to_origin() {
    let (mut builder, _trigger) = seeded();
    builder.handle(CanvasEvent::PointerDown {
        pos: Vec2::new(100.0, 100.0),
        button: PointerButton::Middle,
    });
    assert!(matches!(builder.state.mode, InteractionMode::Panning { .. }));
    builder.handle(CanvasEvent::PointerMove {
        pos: Vec2::new(150.0, 120.0),
    });
    assert_eq!(builder.state.view.transform.pan, Vec2::new(50.0, 20.0));
    builder.handle(CanvasEvent::PointerUp {
        pos: Vec2::new(150.0, 120.0),
    });
    assert_eq!(builder.state.mode, InteractionMode::Idle);

    builder.handle(CanvasEvent::ZoomReset);
    assert_eq!(builder.state.view.transform.pan, Vec2::ZERO);
}

#[test]
fn test_drag_under_zoom_uses_world_space() {
    let (mut builder, trigger) = seeded();
    for _ in 0..10 {
        builder.handle(CanvasEvent::ZoomIn);
    }
    assert_eq!(builder.zoom(), 2.0);

    // World (110,110) is screen (220,220) at 2x.
    builder.handle(CanvasEvent::press(Vec2::new(220.0, 220.0)));
    builder.handle(CanvasEvent::PointerMove {
        pos: Vec2::new(240.0, 260.0),
    });
    assert_eq!(builder.graph.get(&trigger).unwrap().position, Vec2::new(110.0, 120.0));
}

#[test]
fn test_drag_of_deleted_step_ends_session() {
    let (mut builder, trigger) = seeded();
    builder.handle(CanvasEvent::press(Vec2::new(110.0, 110.0)));
    assert!(builder.delete_step(&trigger).is_applied());
    let events = builder.handle(CanvasEvent::PointerMove {
        pos: Vec2::new(200.0, 200.0),
    });
    assert!(events.is_empty());
    assert_eq!(builder.state.mode, InteractionMode::Idle);
}

#[test]
fn test_connect_requires_armed_source() {
    let (mut builder, trigger) = seeded();
    let message = builder.add_step(StepType::Message);
    let delay = builder.add_step(StepType::Delay);

    // Nothing armed.
    assert_eq!(
        builder.connect(Handle::Step(trigger.clone()), &delay),
        Outcome::Ignored(Ignored::NotArmed)
    );
    assert!(builder.graph.connections.is_empty());

    // Another source armed.
    builder.handle(CanvasEvent::ConnectClicked(message.clone()));
    assert_eq!(
        builder.connect(Handle::Step(trigger.clone()), &delay),
        Outcome::Ignored(Ignored::NotArmed)
    );
    assert!(builder.graph.connections.is_empty());
    builder.handle(CanvasEvent::CancelConnect);

    builder.handle(CanvasEvent::ConnectClicked(trigger.clone()));
    assert!(builder.connect(Handle::Step(trigger.clone()), &delay).is_applied());
    assert_eq!(builder.state.connect, ConnectMode::Idle);
    assert_eq!(builder.graph.outgoing(&trigger), vec![delay.clone()]);

    // Connect mode was left, so a second call is not armed any more.
    assert_eq!(
        builder.connect(Handle::Step(trigger), &message),
        Outcome::Ignored(Ignored::NotArmed)
    );
}
