//! # Core Data Models
//!
//! This module defines the fundamental data model of an automation graph.
//! Steps are stored in a flat arena (`SlotMap`) with a stable `StepId` index,
//! and the connection list is the single source of truth for edges: the
//! outgoing targets of a step are derived from it on read.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use slotmap::new_key_type;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;
use crate::payload::StepConfig;

new_key_type! {
    /// Arena key for a Step. Not stable across save/load.
    pub struct StepKey;
}

/// Stable, user-visible identity of a Step (e.g. `message_1718000000000`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The closed set of step types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Trigger,
    Message,
    Condition,
    DataInput,
    ApiCall,
    Webhook,
    Delay,
    CustomAction,
    Branch,
}

impl StepType {
    pub const ALL: [StepType; 9] = [
        StepType::Trigger,
        StepType::Message,
        StepType::Condition,
        StepType::DataInput,
        StepType::ApiCall,
        StepType::Webhook,
        StepType::Delay,
        StepType::CustomAction,
        StepType::Branch,
    ];

    /// The wire name used in ids and saved documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Trigger => "trigger",
            StepType::Message => "message",
            StepType::Condition => "condition",
            StepType::DataInput => "data_input",
            StepType::ApiCall => "api_call",
            StepType::Webhook => "webhook",
            StepType::Delay => "delay",
            StepType::CustomAction => "custom_action",
            StepType::Branch => "branch",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownStepType(s.to_string()))
    }
}

/// The source end of a connection.
///
/// Besides a plain step, an `automation` button of a message step is an output of
/// its own. Its wire form is `{step}_button_{index}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    Step(StepId),
    Button { step: StepId, index: usize },
}

impl Handle {
    /// The step that owns this output.
    pub fn owner(&self) -> &StepId {
        match self {
            Handle::Step(id) => id,
            Handle::Button { step, .. } => step,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Step(id) => write!(f, "{id}"),
            Handle::Button { step, index } => write!(f, "{step}_button_{index}"),
        }
    }
}

impl From<StepId> for Handle {
    fn from(id: StepId) -> Self {
        Handle::Step(id)
    }
}

/// A Step in the graph.
#[derive(Clone, Debug)]
pub struct Step {
    /// Self-reference key.
    pub key: StepKey,
    /// Stable id for persistence and connections.
    pub id: StepId,
    /// Editable display label.
    pub title: String,
    /// Type-specific payload. The variant is the step's type.
    pub config: StepConfig,
    /// World-space position of the top-left corner.
    pub position: Vec2,
}

impl Step {
    pub fn step_type(&self) -> StepType {
        self.config.step_type()
    }
}

/// A directed edge from a step (or one of its buttons) to another step.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: Handle,
    pub to: StepId,
    pub label: Option<String>,
}

/// The entire state of the graph.
///
/// Holds the steps in an arena, the id index, the canvas order and the ordered
/// connection list. Interaction state lives elsewhere.
#[derive(Clone, Debug)]
pub struct GraphState {
    /// Arena for Steps.
    pub steps: SlotMap<StepKey, Step>,
    /// Canvas order. Later entries are drawn on top and saved last.
    pub order: Vec<StepKey>,
    /// Ordered edge list.
    pub connections: Vec<Connection>,
    /// Index for O(1) StepId to StepKey lookup.
    id_index: HashMap<StepId, StepKey>,
    /// Number of steps ever inserted; drives monotonic placement.
    pub(crate) placements: usize,
}

impl Default for GraphState {
    fn default() -> Self {
        Self {
            steps: SlotMap::with_key(),
            order: Vec::new(),
            connections: Vec::new(),
            id_index: HashMap::new(),
            placements: 0,
        }
    }
}

impl GraphState {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn get(&self, id: &StepId) -> Option<&Step> {
        self.id_index.get(id).and_then(|&key| self.steps.get(key))
    }

    pub fn get_mut(&mut self, id: &StepId) -> Option<&mut Step> {
        let key = *self.id_index.get(id)?;
        self.steps.get_mut(key)
    }

    /// Steps in canvas order.
    pub fn steps_in_order(&self) -> impl Iterator<Item = &Step> {
        self.order.iter().filter_map(|&key| self.steps.get(key))
    }

    /// Outgoing targets of a step, derived from the connection list.
    ///
    /// Only connections whose source is the step itself are listed; button outputs
    /// are separate sources.
    pub fn outgoing(&self, id: &StepId) -> Vec<StepId> {
        self.connections
            .iter()
            .filter(|c| matches!(&c.from, Handle::Step(from) if from == id))
            .map(|c| c.to.clone())
            .collect()
    }

    /// Resolves a wire-form handle (`id` or `id_button_n`) against the current steps.
    pub fn resolve_handle(&self, raw: &str) -> Option<Handle> {
        let id = StepId::from(raw);
        if self.contains(&id) {
            return Some(Handle::Step(id));
        }
        let (owner, index) = raw.rsplit_once("_button_")?;
        let index = index.parse::<usize>().ok()?;
        let owner = StepId::from(owner);
        self.contains(&owner)
            .then_some(Handle::Button { step: owner, index })
    }

    /// Inserts a step and updates the id index.
    pub fn insert_step(
        &mut self,
        id: StepId,
        title: impl Into<String>,
        config: StepConfig,
        position: Vec2,
    ) -> StepKey {
        let title = title.into();
        let key = self.steps.insert_with_key(|key| Step {
            key,
            id: id.clone(),
            title,
            config,
            position,
        });
        self.id_index.insert(id, key);
        self.order.push(key);
        self.placements += 1;
        key
    }

    /// Removes a step and updates the id index. Connections are left untouched.
    pub fn remove_step(&mut self, id: &StepId) -> Option<Step> {
        let key = self.id_index.remove(id)?;
        self.order.retain(|&k| k != key);
        self.steps.remove(key)
    }

    /// Clears all steps and connections.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.order.clear();
        self.connections.clear();
        self.id_index.clear();
        self.placements = 0;
    }
}
