use glam::Vec2;

use crate::config::{BuilderConfig, LayoutConfig};
use crate::graph::{Outcome, StepPatch};
use crate::input::{CanvasEvent, PointerButton};
use crate::math::Rect;
use crate::model::{GraphState, Handle, StepId};
use crate::view::{Transform, View};

/// Events emitted by the controller to the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicEvent {
    /// The selected step changed; the host opens or closes the config panel.
    SelectionChanged(Option<StepId>),
    /// A step was dragged to a new world position.
    StepMoved { id: StepId, position: Vec2 },
    /// A connection source was armed and waits for a target click.
    ConnectionArmed(Handle),
    /// An armed connection was completed.
    ConnectionCreated { from: Handle, to: StepId },
    /// An armed connection was cancelled without touching the graph.
    ConnectionAborted,
    /// The visual state changed, requiring a repaint.
    RepaintNeeded,
}

/// The pointer interaction in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionMode {
    /// No active interaction.
    #[default]
    Idle,
    /// User is panning the canvas (middle-button drag).
    Panning {
        /// Pointer position at start of drag (Screen Space).
        start_drag: Vec2,
        /// Transform at start of drag.
        initial_transform: Transform,
    },
    /// User is moving a step by its header.
    Dragging {
        step: StepId,
        /// Pointer position minus step position at drag start (World Space).
        offset: Vec2,
    },
}

/// Connect mode. At most one source is armed at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConnectMode {
    #[default]
    Idle,
    Armed(Handle),
}

/// All transient editor state: pointer mode, connect mode, selection and view.
///
/// The state is a plain value; [`reduce`] produces the next one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub mode: InteractionMode,
    pub connect: ConnectMode,
    pub selection: Option<StepId>,
    pub view: View,
}

impl InteractionState {
    /// True only while a drag or pan session is live; pointer moves are ignored otherwise.
    pub fn tracks_pointer(&self) -> bool {
        !matches!(self.mode, InteractionMode::Idle)
    }

    pub fn armed(&self) -> Option<&Handle> {
        match &self.connect {
            ConnectMode::Armed(handle) => Some(handle),
            ConnectMode::Idle => None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.view.transform.zoom
    }
}

/// The result of feeding one event through the controller.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: InteractionState,
    pub events: Vec<LogicEvent>,
}

/// Where a pointer landed on a step card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitZone {
    Header,
    Body,
}

/// Finds the top-most step under `world`, front to back.
pub fn hit_test(
    graph: &GraphState,
    layout: &LayoutConfig,
    world: Vec2,
) -> Option<(StepId, HitZone)> {
    graph.order.iter().rev().find_map(|&key| {
        let step = graph.steps.get(key)?;
        if !Rect::new(step.position, layout.step_size).contains(world) {
            return None;
        }
        let header = Rect::new(
            step.position,
            Vec2::new(layout.step_size.x, layout.header_height),
        );
        let zone = if header.contains(world) {
            HitZone::Header
        } else {
            HitZone::Body
        };
        Some((step.id.clone(), zone))
    })
}

/// Central state machine of the canvas.
///
/// Computes the next interaction state for `event`. Graph changes (drag moves,
/// completed connections) go through the Graph Mutator.
pub fn reduce(
    state: &InteractionState,
    event: &CanvasEvent,
    config: &BuilderConfig,
    graph: &mut GraphState,
) -> Transition {
    let mut next = state.clone();
    let mut events = Vec::new();

    match event {
        CanvasEvent::PointerDown { pos, button } => match button {
            PointerButton::Primary => {
                handle_press(&mut next, graph, &config.layout, *pos, &mut events)
            }
            PointerButton::Middle => {
                if next.mode == InteractionMode::Idle {
                    next.mode = InteractionMode::Panning {
                        start_drag: *pos,
                        initial_transform: next.view.transform,
                    };
                }
            }
            PointerButton::Secondary => {}
        },
        CanvasEvent::PointerMove { pos } => handle_move(&mut next, graph, *pos, &mut events),
        CanvasEvent::PointerUp { .. } => {
            // Ends the drag session; further moves are not tracked.
            next.mode = InteractionMode::Idle;
        }
        CanvasEvent::Scroll { pos, delta } => {
            next.view.zoom_at(*pos, *delta, &config.zoom);
            events.push(LogicEvent::RepaintNeeded);
        }
        CanvasEvent::ConnectClicked(step) => {
            if graph.contains(step) {
                match next.connect.clone() {
                    ConnectMode::Idle => arm(&mut next, Handle::Step(step.clone()), &mut events),
                    ConnectMode::Armed(source) => {
                        finish_connection(&mut next, graph, source, step, &mut events)
                    }
                }
            }
        }
        CanvasEvent::ButtonHandleClicked { step, index } => {
            let connectable = graph
                .get(step)
                .and_then(|s| s.config.as_message())
                .is_some_and(|m| m.is_automation_button(*index));
            let handle = Handle::Button {
                step: step.clone(),
                index: *index,
            };
            if next.armed() == Some(&handle) {
                disarm(&mut next, &mut events);
            } else if connectable {
                arm(&mut next, handle, &mut events);
            }
        }
        CanvasEvent::CancelConnect => disarm(&mut next, &mut events),
        CanvasEvent::ZoomIn => {
            next.view.zoom_in(&config.zoom);
            events.push(LogicEvent::RepaintNeeded);
        }
        CanvasEvent::ZoomOut => {
            next.view.zoom_out(&config.zoom);
            events.push(LogicEvent::RepaintNeeded);
        }
        CanvasEvent::ZoomReset => {
            next.view.reset();
            events.push(LogicEvent::RepaintNeeded);
        }
    }

    Transition {
        state: next,
        events,
    }
}

/// Primary press: completes an armed connection, starts a header drag, selects a
/// step, or clears the selection on empty canvas.
fn handle_press(
    next: &mut InteractionState,
    graph: &mut GraphState,
    layout: &LayoutConfig,
    pos: Vec2,
    events: &mut Vec<LogicEvent>,
) {
    let world = next.view.screen_to_world(pos);
    let hit = hit_test(graph, layout, world);

    if let (Some((target, _)), ConnectMode::Armed(source)) = (&hit, next.connect.clone()) {
        finish_connection(next, graph, source, target, events);
        return;
    }

    match hit {
        Some((id, zone)) => {
            let position = graph.get(&id).map(|s| s.position).unwrap_or(world);
            select(next, Some(id.clone()), events);
            if zone == HitZone::Header {
                next.mode = InteractionMode::Dragging {
                    step: id,
                    offset: world - position,
                };
            }
        }
        None => select(next, None, events),
    }
}

fn handle_move(
    next: &mut InteractionState,
    graph: &mut GraphState,
    pos: Vec2,
    events: &mut Vec<LogicEvent>,
) {
    match next.mode.clone() {
        InteractionMode::Idle => {}
        InteractionMode::Panning {
            start_drag,
            initial_transform,
        } => {
            next.view.transform.pan = initial_transform.pan + (pos - start_drag);
            events.push(LogicEvent::RepaintNeeded);
        }
        InteractionMode::Dragging { step, offset } => {
            let world = next.view.screen_to_world(pos);
            let position = (world - offset).max(Vec2::ZERO);
            match graph.update_step(&step, StepPatch::position(position)) {
                Outcome::Applied => {
                    events.push(LogicEvent::StepMoved { id: step, position });
                    events.push(LogicEvent::RepaintNeeded);
                }
                // The step vanished mid-drag.
                Outcome::Ignored(_) => next.mode = InteractionMode::Idle,
            }
        }
    }
}

fn select(next: &mut InteractionState, id: Option<StepId>, events: &mut Vec<LogicEvent>) {
    if next.selection != id {
        next.selection = id.clone();
        events.push(LogicEvent::SelectionChanged(id));
        events.push(LogicEvent::RepaintNeeded);
    }
}

fn arm(next: &mut InteractionState, handle: Handle, events: &mut Vec<LogicEvent>) {
    tracing::debug!(source = %handle, "connection armed");
    next.connect = ConnectMode::Armed(handle.clone());
    events.push(LogicEvent::ConnectionArmed(handle));
    events.push(LogicEvent::RepaintNeeded);
}

fn disarm(next: &mut InteractionState, events: &mut Vec<LogicEvent>) {
    if next.connect != ConnectMode::Idle {
        next.connect = ConnectMode::Idle;
        events.push(LogicEvent::ConnectionAborted);
        events.push(LogicEvent::RepaintNeeded);
    }
}

/// Second phase of connect mode: the same step aborts, any other step completes.
fn finish_connection(
    next: &mut InteractionState,
    graph: &mut GraphState,
    source: Handle,
    target: &StepId,
    events: &mut Vec<LogicEvent>,
) {
    if source.owner() == target {
        disarm(next, events);
        return;
    }
    next.connect = ConnectMode::Idle;
    match graph.connect(source.clone(), target) {
        Outcome::Applied => events.push(LogicEvent::ConnectionCreated {
            from: source,
            to: target.clone(),
        }),
        Outcome::Ignored(reason) => {
            tracing::debug!(source = %source, target = %target, %reason, "connection not created")
        }
    }
    events.push(LogicEvent::RepaintNeeded);
}
