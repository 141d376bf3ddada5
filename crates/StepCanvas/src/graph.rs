//! # Graph Mutator
//!
//! Invariant-preserving operations over the step arena and the connection list.
//! Every operation is total: a stale id or a rejected edit is reported through
//! [`Outcome::Ignored`] and leaves the graph untouched.

use glam::Vec2;
use thiserror::Error;

use crate::config::{LayoutConfig, PlacementPolicy};
use crate::model::{Connection, GraphState, Handle, StepId, StepType};
use crate::payload::{ButtonKind, StepConfig};
use crate::registry;

/// Result of a mutation.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Why a mutation was a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Ignored {
    #[error("step does not exist")]
    UnknownStep,
    #[error("connection does not exist")]
    UnknownConnection,
    #[error("a step cannot connect to itself")]
    SelfLoop,
    #[error("connection already exists")]
    DuplicateConnection,
    #[error("no connection is armed")]
    NotArmed,
    #[error("config does not match the step type")]
    TypeMismatch,
    #[error("input rejected")]
    InvalidInput,
    #[error("field is not available for this step")]
    FieldUnavailable,
}

/// Shallow update of a step. `None` fields are left as they are.
#[derive(Clone, Debug, Default)]
pub struct StepPatch {
    pub title: Option<String>,
    pub config: Option<StepConfig>,
    pub position: Option<Vec2>,
}

impl StepPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn config(config: StepConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }
}

impl GraphState {
    /// Adds a step of `step_type` on the next grid slot and returns its id.
    pub fn add_step(
        &mut self,
        step_type: StepType,
        layout: &LayoutConfig,
        policy: PlacementPolicy,
    ) -> StepId {
        let slot = match policy {
            PlacementPolicy::LiveCount => self.len(),
            PlacementPolicy::Monotonic => self.placements,
        };
        let position = layout.grid_position(slot);
        let id = self.fresh_id(step_type, chrono::Utc::now().timestamp_millis());
        self.insert_step(
            id.clone(),
            registry::meta(step_type).title,
            registry::default_config(step_type),
            position,
        );
        tracing::debug!(step = %id, slot, "step added");
        id
    }

    /// Seeds the keyword trigger of a new automation. Does nothing on a non-empty graph.
    pub fn seed_trigger(&mut self, layout: &LayoutConfig) -> Option<StepId> {
        if !self.is_empty() {
            return None;
        }
        let id = self.fresh_id(StepType::Trigger, chrono::Utc::now().timestamp_millis());
        self.insert_step(
            id.clone(),
            registry::meta(StepType::Trigger).title,
            registry::default_config(StepType::Trigger),
            layout.seed_position,
        );
        Some(id)
    }

    /// `{type}_{millis}`, bumping the millisecond until the id is free.
    pub(crate) fn fresh_id(&self, step_type: StepType, mut millis: i64) -> StepId {
        loop {
            let id = StepId::new(format!("{}_{}", step_type.as_str(), millis));
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Removes a step and every connection that starts or ends at it.
    pub fn delete_step(&mut self, id: &StepId) -> Outcome {
        if self.remove_step(id).is_none() {
            return Outcome::Ignored(Ignored::UnknownStep);
        }
        let before = self.connections.len();
        self.connections
            .retain(|c| c.from.owner() != id && &c.to != id);
        tracing::debug!(
            step = %id,
            pruned = before - self.connections.len(),
            "step deleted"
        );
        Outcome::Applied
    }

    /// Shallow-merges `patch` into the step.
    pub fn update_step(&mut self, id: &StepId, patch: StepPatch) -> Outcome {
        let Some(step) = self.get_mut(id) else {
            return Outcome::Ignored(Ignored::UnknownStep);
        };
        if let Some(config) = &patch.config
            && config.step_type() != step.step_type()
        {
            return Outcome::Ignored(Ignored::TypeMismatch);
        }
        if let Some(StepConfig::Delay(delay)) = &patch.config
            && delay.duration == 0
        {
            return Outcome::Ignored(Ignored::InvalidInput);
        }

        if let Some(title) = patch.title {
            step.title = title;
        }
        if let Some(position) = patch.position {
            step.position = position;
        }
        if let Some(config) = patch.config {
            step.config = config;
            self.prune_button_connections(id);
        }
        Outcome::Applied
    }

    /// Appends the edge `from -> to` unless it is a self-loop, a duplicate, or
    /// refers to a missing step or a non-connectable button.
    ///
    /// Connect mode is not consulted here; the editor goes through
    /// `Builder::connect`, loading and scripted edits call this directly.
    pub fn connect(&mut self, from: Handle, to: &StepId) -> Outcome {
        let Some(owner) = self.get(from.owner()) else {
            return Outcome::Ignored(Ignored::UnknownStep);
        };
        if let Handle::Button { index, .. } = &from {
            let connectable = owner
                .config
                .as_message()
                .is_some_and(|m| m.is_automation_button(*index));
            if !connectable {
                return Outcome::Ignored(Ignored::InvalidInput);
            }
        }
        if !self.contains(to) {
            return Outcome::Ignored(Ignored::UnknownStep);
        }
        if from.owner() == to {
            return Outcome::Ignored(Ignored::SelfLoop);
        }
        if self.connections.iter().any(|c| c.from == from && &c.to == to) {
            return Outcome::Ignored(Ignored::DuplicateConnection);
        }

        tracing::debug!(from = %from, to = %to, "connected");
        self.connections.push(Connection {
            from,
            to: to.clone(),
            label: None,
        });
        Outcome::Applied
    }

    /// Removes the edge `from -> to`.
    pub fn disconnect(&mut self, from: &Handle, to: &StepId) -> Outcome {
        let before = self.connections.len();
        self.connections.retain(|c| !(&c.from == from && &c.to == to));
        if self.connections.len() == before {
            return Outcome::Ignored(Ignored::UnknownConnection);
        }
        tracing::debug!(from = %from, to = %to, "disconnected");
        Outcome::Applied
    }

    pub fn set_connection_label(
        &mut self,
        from: &Handle,
        to: &StepId,
        label: Option<String>,
    ) -> Outcome {
        match self
            .connections
            .iter_mut()
            .find(|c| &c.from == from && &c.to == to)
        {
            Some(connection) => {
                connection.label = label.filter(|l| !l.is_empty());
                Outcome::Applied
            }
            None => Outcome::Ignored(Ignored::UnknownConnection),
        }
    }

    /// Removes button `index` of a message step, dropping its connections and
    /// shifting the handles of the buttons after it.
    pub fn remove_message_button(&mut self, id: &StepId, index: usize) -> Outcome {
        let Some(step) = self.get_mut(id) else {
            return Outcome::Ignored(Ignored::UnknownStep);
        };
        let StepConfig::Message(message) = &mut step.config else {
            return Outcome::Ignored(Ignored::FieldUnavailable);
        };
        if index >= message.buttons.len() {
            return Outcome::Ignored(Ignored::InvalidInput);
        }
        message.buttons.remove(index);

        self.connections.retain(|c| {
            !matches!(&c.from, Handle::Button { step, index: i } if step == id && *i == index)
        });
        for connection in &mut self.connections {
            if let Handle::Button { step, index: i } = &mut connection.from
                && step == id
                && *i > index
            {
                *i -= 1;
            }
        }
        Outcome::Applied
    }

    /// Drops connections from buttons that no longer exist or are no longer
    /// automation buttons.
    fn prune_button_connections(&mut self, id: &StepId) {
        let Some(step) = self.get(id) else {
            return;
        };
        let message = step.config.as_message().cloned();
        self.connections.retain(|c| match &c.from {
            Handle::Button { step, index } if step == id => message
                .as_ref()
                .and_then(|m| m.buttons.get(*index))
                .is_some_and(|b| b.kind == ButtonKind::Automation),
            _ => true,
        });
    }
}
