//! # StepCanvas
//!
//! `step_canvas` is the headless core of the automation flow builder. It owns the
//! step graph, the canvas interaction state machine and the document format,
//! while rendering is left to the host application.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: Steps in a flat arena (SlotMap) plus the ordered connection list.
//! - **Payloads (`src/payload.rs`)**: One strongly typed config per step type.
//! - **Graph (`src/graph.rs`)**: Invariant-preserving mutations reporting an `Outcome`.
//! - **Interaction (`src/interaction.rs`)**: Drag, connect mode, selection and zoom as a reducer.
//! - **Persistence (`src/persistence.rs`)**: The automation document sent to the backend.

pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod interaction;
pub mod math;
pub mod model;
pub mod payload;
pub mod persistence;
pub mod preview;
pub mod registry;
pub mod view;

use chrono::{DateTime, Utc};
use glam::Vec2;

use geometry::ConnectionPath;
use model::{GraphState, Handle, StepId, StepType};
use persistence::{AutomationDocument, AutomationStatus, LoadReport};
use preview::PreviewCard;

// Re-exports for convenience
pub use config::{BuilderConfig, PlacementPolicy};
pub use error::DocumentError;
pub use graph::{Ignored, Outcome, StepPatch};
pub use input::CanvasEvent;
pub use interaction::{InteractionMode, InteractionState, LogicEvent};

/// Top-level metadata of the automation being edited.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutomationMeta {
    pub name: String,
    pub description: String,
    status: AutomationStatus,
}

impl AutomationMeta {
    pub fn status(&self) -> AutomationStatus {
        self.status
    }
}

/// The main entry point for the library.
///
/// A `Builder` edits one automation: the graph, the interaction state and the
/// document metadata.
pub struct Builder {
    /// Configuration settings.
    pub config: BuilderConfig,
    /// Steps and connections.
    pub graph: GraphState,
    /// Selection, pointer mode, connect mode and viewport.
    pub state: InteractionState,
    /// Name, description and status.
    pub meta: AutomationMeta,
}

impl Builder {
    /// Creates a new draft automation seeded with a keyword trigger.
    pub fn new(config: BuilderConfig) -> Self {
        let mut graph = GraphState::default();
        graph.seed_trigger(&config.layout);
        Self {
            config,
            graph,
            state: InteractionState::default(),
            meta: AutomationMeta::default(),
        }
    }

    /// Opens a saved automation. A document without steps is seeded like a new one.
    pub fn from_document(
        document: AutomationDocument,
        config: BuilderConfig,
    ) -> (Self, LoadReport) {
        let mut graph = GraphState::default();
        let report = graph.load(document.graph());
        graph.seed_trigger(&config.layout);
        tracing::info!(
            name = %document.name,
            steps = graph.len(),
            connections = graph.connections.len(),
            "automation loaded"
        );
        let builder = Self {
            config,
            graph,
            state: InteractionState::default(),
            meta: AutomationMeta {
                name: document.name,
                description: document.description,
                status: document.status,
            },
        };
        (builder, report)
    }

    /// Updates the viewport size (e.g., on window resize).
    pub fn update_viewport_size(&mut self, size: Vec2) {
        self.state.view.viewport_size = size;
    }

    /// Feeds one canvas event through the interaction controller.
    pub fn handle(&mut self, event: CanvasEvent) -> Vec<LogicEvent> {
        let transition = interaction::reduce(&self.state, &event, &self.config, &mut self.graph);
        self.state = transition.state;
        transition.events
    }

    /// Adds a step on the next grid slot and selects it.
    pub fn add_step(&mut self, step_type: StepType) -> StepId {
        let id = self
            .graph
            .add_step(step_type, &self.config.layout, self.config.placement);
        self.state.selection = Some(id.clone());
        id
    }

    /// Deletes a step with its connections, clearing selection and connect mode
    /// when they referred to it.
    pub fn delete_step(&mut self, id: &StepId) -> Outcome {
        let outcome = self.graph.delete_step(id);
        if outcome.is_applied() {
            if self.state.selection.as_ref() == Some(id) {
                self.state.selection = None;
            }
            if self.state.armed().is_some_and(|h| h.owner() == id) {
                self.state.connect = interaction::ConnectMode::Idle;
            }
        }
        outcome
    }

    pub fn update_step(&mut self, id: &StepId, patch: StepPatch) -> Outcome {
        self.graph.update_step(id, patch)
    }

    /// Completes the armed connection from `from` to `to` and leaves connect mode.
    ///
    /// Does nothing unless `from` is the armed source.
    pub fn connect(&mut self, from: Handle, to: &StepId) -> Outcome {
        if self.state.armed() != Some(&from) {
            return Outcome::Ignored(Ignored::NotArmed);
        }
        self.state.connect = interaction::ConnectMode::Idle;
        self.graph.connect(from, to)
    }

    pub fn disconnect(&mut self, from: &Handle, to: &StepId) -> Outcome {
        self.graph.disconnect(from, to)
    }

    /// Selects a step (opening its config panel) or clears the selection.
    pub fn select(&mut self, id: Option<StepId>) -> Outcome {
        if let Some(id) = &id
            && !self.graph.contains(id)
        {
            return Outcome::Ignored(Ignored::UnknownStep);
        }
        self.state.selection = id;
        Outcome::Applied
    }

    pub fn selection(&self) -> Option<&StepId> {
        self.state.selection.as_ref()
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom()
    }

    /// Mirrors a status change the backend has accepted.
    pub fn apply_remote_status(&mut self, status: AutomationStatus) {
        self.meta.status = status;
    }

    /// Flattens the automation into the persisted document shape.
    ///
    /// No validation happens here; incomplete steps are saved as they are.
    pub fn to_document(&self, created_at: DateTime<Utc>) -> AutomationDocument {
        let saved = self.graph.save();
        AutomationDocument {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            status: self.meta.status,
            workflow: saved.workflow,
            connections: saved.connections,
            created_at,
        }
    }

    /// [`Builder::to_document`] stamped with the current time.
    pub fn document(&self) -> AutomationDocument {
        self.to_document(Utc::now())
    }

    pub fn live_preview(&self) -> Vec<PreviewCard> {
        preview::live_preview(&self.graph)
    }

    pub fn connection_paths(&self) -> Vec<ConnectionPath> {
        geometry::connection_paths(&self.graph, &self.config.layout)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
