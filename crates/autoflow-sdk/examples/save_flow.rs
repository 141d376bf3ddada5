use autoflow_sdk::{AutomationBackend, EditorSession, InMemoryBackend};
use std::sync::Arc;
use step_canvas::BuilderConfig;
use step_canvas::model::{Handle, StepType};
use step_canvas::persistence::AutomationStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let backend = Arc::new(InMemoryBackend::new());
    let mut session = EditorSession::new(backend.clone(), BuilderConfig::default());
    session.builder.meta.name = "Lead capture".to_string();
    session.builder.meta.description = "Collects an email after the greeting".to_string();

    // 1. Build a small flow
    let trigger = session
        .builder
        .graph
        .steps_in_order()
        .next()
        .map(|s| s.id.clone())
        .unwrap_or_default();
    let message = session.builder.add_step(StepType::Message);
    let form = session.builder.add_step(StepType::DataInput);
    let _ = session
        .builder
        .graph
        .connect(Handle::Step(trigger), &message);
    let _ = session.builder.graph.connect(Handle::Step(message), &form);

    // 2. Save, activate, save again
    let id = session.save().await?;
    session.set_status(AutomationStatus::Active).await?;
    session.save().await?;

    for notice in session.drain_notices() {
        println!("[{:?}] {}", notice.level, notice.message);
    }

    // 3. List what the backend holds
    for stored in backend.list().await? {
        println!(
            "{} '{}' ({}) with {} steps",
            stored.id,
            stored.document.name,
            stored.document.status.as_str(),
            stored.document.workflow.len()
        );
    }

    // 4. Reopen
    let reopened = EditorSession::open(backend, id, BuilderConfig::default()).await?;
    println!("{}", reopened.builder.document().to_json()?);
    Ok(())
}
