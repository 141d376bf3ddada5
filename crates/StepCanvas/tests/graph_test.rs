use glam::Vec2;
use step_canvas::model::{GraphState, Handle, StepType};
use step_canvas::{Builder, BuilderConfig, Ignored, Outcome, PlacementPolicy, StepPatch};

/// Every connection's source step lists the target exactly once, and no connection
/// points at a missing step.
fn assert_symmetric(graph: &GraphState) {
    for connection in &graph.connections {
        assert!(graph.contains(connection.from.owner()), "dangling source");
        assert!(graph.contains(&connection.to), "dangling target");
        if let Handle::Step(from) = &connection.from {
            let outgoing = graph.outgoing(from);
            assert_eq!(outgoing.iter().filter(|t| *t == &connection.to).count(), 1);
        }
    }
    for step in graph.steps_in_order() {
        for target in graph.outgoing(&step.id) {
            assert!(
                graph
                    .connections
                    .iter()
                    .any(|c| c.from == Handle::Step(step.id.clone()) && c.to == target)
            );
        }
    }
}

#[test]
fn test_new_automation_is_seeded_once() {
    let mut builder = Builder::default();
    assert_eq!(builder.graph.len(), 1);
    let seed = builder.graph.steps_in_order().next().unwrap();
    assert_eq!(seed.step_type(), StepType::Trigger);
    assert_eq!(seed.position, Vec2::new(100.0, 100.0));
    assert!(seed.id.as_str().starts_with("trigger_"));

    builder.add_step(StepType::Message);
    let triggers = builder
        .graph
        .steps_in_order()
        .filter(|s| s.step_type() == StepType::Trigger)
        .count();
    assert_eq!(triggers, 1);
    assert_eq!(builder.graph.len(), 2);
}

#[test]
fn test_add_step_selects_and_uses_registry_defaults() {
    let mut builder = Builder::default();
    let id = builder.add_step(StepType::Delay);
    assert_eq!(builder.selection(), Some(&id));

    let step = builder.graph.get(&id).unwrap();
    assert_eq!(step.title, "Delay");
    assert!(id.as_str().starts_with("delay_"));
    assert_eq!(
        step.config.to_value(),
        serde_json::json!({"duration": 5, "unit": "minutes"})
    );
}

#[test]
fn test_grid_placement_uses_live_count() {
    let mut graph = GraphState::default();
    let layout = BuilderConfig::default().layout;
    let ids: Vec<_> = (0..6)
        .map(|_| graph.add_step(StepType::Delay, &layout, PlacementPolicy::LiveCount))
        .collect();

    for (n, id) in ids.iter().enumerate() {
        let expected = Vec2::new(
            50.0 + (n % 4) as f32 * 280.0,
            100.0 + (n / 4) as f32 * 200.0,
        );
        assert_eq!(graph.get(id).unwrap().position, expected);
    }

    // After a deletion the next step reuses the slot of the live count.
    assert!(graph.delete_step(&ids[0]).is_applied());
    let next = graph.add_step(StepType::Delay, &layout, PlacementPolicy::LiveCount);
    assert_eq!(graph.get(&next).unwrap().position, Vec2::new(330.0, 300.0));
    assert_eq!(graph.get(&ids[5]).unwrap().position, Vec2::new(330.0, 300.0));
}

#[test]
fn test_grid_placement_monotonic_never_reuses_slots() {
    let mut graph = GraphState::default();
    let layout = BuilderConfig::default().layout;
    let a = graph.add_step(StepType::Delay, &layout, PlacementPolicy::Monotonic);
    let b = graph.add_step(StepType::Delay, &layout, PlacementPolicy::Monotonic);
    assert!(graph.delete_step(&a).is_applied());
    let c = graph.add_step(StepType::Delay, &layout, PlacementPolicy::Monotonic);
    assert_ne!(graph.get(&b).unwrap().position, graph.get(&c).unwrap().position);
    assert_eq!(graph.get(&c).unwrap().position, Vec2::new(610.0, 100.0));
}

#[test]
fn test_connect_is_idempotent_and_rejects_self_loops() {
    let mut builder = Builder::default();
    let a = builder.add_step(StepType::Message);
    let b = builder.add_step(StepType::Delay);
    let graph = &mut builder.graph;

    assert!(graph.connect(Handle::Step(a.clone()), &b).is_applied());
    assert_eq!(
        graph.connect(Handle::Step(a.clone()), &b),
        Outcome::Ignored(Ignored::DuplicateConnection)
    );
    assert_eq!(graph.connections.len(), 1);
    assert_eq!(graph.outgoing(&a), vec![b.clone()]);

    assert_eq!(
        graph.connect(Handle::Step(a.clone()), &a),
        Outcome::Ignored(Ignored::SelfLoop)
    );
    assert_eq!(graph.connections.len(), 1);
    assert_symmetric(graph);
}

#[test]
fn test_delete_step_cascades_connections() {
    let mut builder = Builder::default();
    let a = builder.add_step(StepType::Message);
    let b = builder.add_step(StepType::Condition);
    let c = builder.add_step(StepType::Delay);
    let graph = &mut builder.graph;
    assert!(graph.connect(Handle::Step(a.clone()), &b).is_applied());
    assert!(graph.connect(Handle::Step(b.clone()), &c).is_applied());
    assert!(graph.connect(Handle::Step(a.clone()), &c).is_applied());

    assert!(builder.delete_step(&b).is_applied());
    let graph = &builder.graph;
    assert_eq!(graph.connections.len(), 1);
    assert!(graph.connections.iter().all(|c| c.to != b && c.from.owner() != &b));
    assert_eq!(graph.outgoing(&a), vec![c]);
    assert_symmetric(graph);
}

#[test]
fn test_delete_clears_selection_of_deleted_step() {
    let mut builder = Builder::default();
    let a = builder.add_step(StepType::Webhook);
    assert_eq!(builder.selection(), Some(&a));
    assert!(builder.delete_step(&a).is_applied());
    assert_eq!(builder.selection(), None);

    let b = builder.add_step(StepType::Webhook);
    let c = builder.add_step(StepType::Delay);
    assert!(builder.select(Some(b.clone())).is_applied());
    assert!(builder.delete_step(&c).is_applied());
    assert_eq!(builder.selection(), Some(&b));
}

#[test]
fn test_stale_ids_are_silent_noops() {
    let mut builder = Builder::default();
    let a = builder.add_step(StepType::ApiCall);
    let b = builder.add_step(StepType::ApiCall);
    assert!(builder.delete_step(&a).is_applied());

    assert_eq!(builder.delete_step(&a), Outcome::Ignored(Ignored::UnknownStep));
    assert_eq!(
        builder.update_step(&a, StepPatch::title("Renamed")),
        Outcome::Ignored(Ignored::UnknownStep)
    );
    assert_eq!(
        builder.graph.connect(Handle::Step(a.clone()), &b),
        Outcome::Ignored(Ignored::UnknownStep)
    );
    assert_eq!(
        builder.disconnect(&Handle::Step(b.clone()), &a),
        Outcome::Ignored(Ignored::UnknownConnection)
    );
    assert_eq!(builder.select(Some(a)), Outcome::Ignored(Ignored::UnknownStep));
}

#[test]
fn test_update_step_merges_only_given_fields() {
    let mut builder = Builder::default();
    let id = builder.add_step(StepType::Condition);
    let before = builder.graph.get(&id).unwrap().clone();

    assert!(builder.update_step(&id, StepPatch::title("Is VIP?")).is_applied());
    let after = builder.graph.get(&id).unwrap();
    assert_eq!(after.title, "Is VIP?");
    assert_eq!(after.position, before.position);
    assert_eq!(after.config, before.config);
}

#[test]
fn test_disconnect_removes_edge() {
    let mut builder = Builder::default();
    let a = builder.add_step(StepType::Message);
    let b = builder.add_step(StepType::Delay);
    assert!(builder.graph.connect(Handle::Step(a.clone()), &b).is_applied());

    assert!(builder.disconnect(&Handle::Step(a.clone()), &b).is_applied());
    assert!(builder.graph.connections.is_empty());
    assert!(builder.graph.outgoing(&a).is_empty());
}

#[test]
fn test_scenario_b_delete_first_of_two_api_calls() {
    let mut builder = Builder::default();
    let first = builder.add_step(StepType::ApiCall);
    let second = builder.add_step(StepType::ApiCall);
    assert!(builder.graph.connect(Handle::Step(first.clone()), &second).is_applied());

    assert!(builder.delete_step(&first).is_applied());
    let document = builder.document();
    assert!(document.connections.is_empty());
    let saved = document.workflow.iter().find(|s| s.id == second).unwrap();
    assert!(saved.connections.is_empty());
}

#[test]
fn test_random_sequence_keeps_invariants() {
    let mut builder = Builder::default();
    let types = [StepType::Message, StepType::Delay, StepType::Condition];
    let mut ids = Vec::new();
    for round in 0..24usize {
        match round % 4 {
            0 | 1 => ids.push(builder.add_step(types[round % types.len()])),
            2 => {
                if ids.len() >= 2 {
                    let from = ids[round % ids.len()].clone();
                    let to = ids[(round * 7 + 1) % ids.len()].clone();
                    let _ = builder.graph.connect(Handle::Step(from), &to);
                }
            }
            _ => {
                if let Some(id) = ids.get(round % ids.len().max(1)).cloned() {
                    let _ = builder.delete_step(&id);
                }
            }
        }
        assert_symmetric(&builder.graph);
    }
}
