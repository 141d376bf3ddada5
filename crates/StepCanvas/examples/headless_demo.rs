use glam::Vec2;
use step_canvas::model::{Handle, StepType};
use step_canvas::payload::{MessageButton, MessageConfig, StepConfig};
use step_canvas::{Builder, BuilderConfig, CanvasEvent, StepPatch};

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== StepCanvas Headless Demo ===");

    // 1. Initialize Builder (seeded with a trigger)
    let mut builder = Builder::new(BuilderConfig::default());
    builder.update_viewport_size(Vec2::new(1280.0, 720.0));
    builder.meta.name = "Welcome flow".into();
    let trigger = builder
        .graph
        .steps_in_order()
        .next()
        .map(|s| s.id.clone())
        .unwrap_or_default();

    // 2. Populate Graph from the palette
    let message = builder.add_step(StepType::Message);
    let delay = builder.add_step(StepType::Delay);
    let config = StepConfig::Message(MessageConfig {
        message: "Hi {{name}}, welcome aboard!".into(),
        buttons: vec![
            MessageButton::link("Shop", "https://example.com"),
            MessageButton::automation("Remind me later"),
        ],
        ..Default::default()
    });
    let _ = builder.update_step(&message, StepPatch::config(config));

    println!("Created graph with {} steps:", builder.graph.len());
    for step in builder.graph.steps_in_order() {
        println!("  - {} '{}' at {:?}", step.id, step.title, step.position);
    }

    // 3. Simulate the user wiring steps through the canvas
    let frames = vec![
        CanvasEvent::ConnectClicked(trigger.clone()),
        CanvasEvent::press(Vec2::new(450.0, 200.0)),
        CanvasEvent::ButtonHandleClicked {
            step: message.clone(),
            index: 1,
        },
        CanvasEvent::press(Vec2::new(700.0, 200.0)),
        CanvasEvent::press(Vec2::new(620.0, 110.0)),
        CanvasEvent::PointerMove {
            pos: Vec2::new(700.0, 300.0),
        },
        CanvasEvent::PointerUp {
            pos: Vec2::new(700.0, 300.0),
        },
    ];

    for (frame, event) in frames.into_iter().enumerate() {
        println!("\n--- Frame {} ---", frame);
        println!("Event: {:?}", event);
        for logic in builder.handle(event) {
            println!("  -> {:?}", logic);
        }
    }

    println!("\nDelay now at {:?}", builder.graph.get(&delay).map(|s| s.position));
    let button = Handle::Button {
        step: message.clone(),
        index: 1,
    };
    println!("Button handle: {}", button);

    // 4. Preview
    println!("\n=== Live Preview ===");
    for card in builder.live_preview() {
        println!("[{}] {} :: {}", card.meta.icon, card.title, card.summary);
    }

    // 5. Document
    match builder.document().to_json() {
        Ok(json) => println!("\n=== Document ===\n{}", json),
        Err(err) => eprintln!("Failed to serialize: {}", err),
    }
}
