//! # Automation Documents
//!
//! The flat, persisted shape of an automation and its conversion to and from
//! the in-memory graph. Field names match what the backend stores.

use chrono::{DateTime, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DocumentError;
use crate::model::{GraphState, StepId, StepType};
use crate::payload::StepConfig;
use crate::registry;

/// Lifecycle of an automation. Only the backend moves it past `draft`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationStatus {
    #[default]
    Draft,
    Active,
    Paused,
}

impl AutomationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutomationStatus::Draft => "draft",
            AutomationStatus::Active => "active",
            AutomationStatus::Paused => "paused",
        }
    }
}

/// A serializable representation of a Step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedStep {
    pub id: StepId,
    /// Kept as text so unknown types can be reported instead of failing the document.
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub config: Value,
    #[serde(with = "crate::math::xy", default)]
    pub position: Vec2,
    /// Outgoing targets, derived from the connection list on save and ignored on load.
    #[serde(default)]
    pub connections: Vec<StepId>,
}

/// A serializable representation of a Connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedConnection {
    /// Step id, or `{step}_button_{index}` for a button output.
    pub from: String,
    pub to: StepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A serializable snapshot of the Graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedGraph {
    pub workflow: Vec<SavedStep>,
    pub connections: Vec<SavedConnection>,
}

/// The document handed to the persistence API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutomationDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: AutomationStatus,
    #[serde(alias = "steps")]
    pub workflow: Vec<SavedStep>,
    #[serde(default)]
    pub connections: Vec<SavedConnection>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl AutomationDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Splits off the graph part of the document.
    pub fn graph(&self) -> SavedGraph {
        SavedGraph {
            workflow: self.workflow.clone(),
            connections: self.connections.clone(),
        }
    }
}

/// What `load` had to drop to keep the graph consistent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub dropped_steps: Vec<StepId>,
    pub dropped_connections: usize,
}

impl GraphState {
    /// Serializes the graph state into a `SavedGraph` payload.
    pub fn save(&self) -> SavedGraph {
        let workflow = self
            .steps_in_order()
            .map(|step| SavedStep {
                id: step.id.clone(),
                step_type: step.step_type().as_str().to_string(),
                title: step.title.clone(),
                config: step.config.to_value(),
                position: step.position,
                connections: self.outgoing(&step.id),
            })
            .collect();

        let connections = self
            .connections
            .iter()
            .map(|c| SavedConnection {
                from: c.from.to_string(),
                to: c.to.clone(),
                label: c.label.clone(),
            })
            .collect();

        SavedGraph {
            workflow,
            connections,
        }
    }

    /// Loads a `SavedGraph` payload, REPLACING the current state.
    ///
    /// Unknown step types and duplicate ids are dropped, malformed payloads fall back
    /// to the registry default, and connections that would break the graph
    /// invariants are pruned.
    pub fn load(&mut self, saved: SavedGraph) -> LoadReport {
        self.clear();
        let mut report = LoadReport::default();

        // 1. Restore Steps
        for saved_step in saved.workflow {
            let step_type = match saved_step.step_type.parse::<StepType>() {
                Ok(step_type) => step_type,
                Err(err) => {
                    tracing::warn!(step = %saved_step.id, %err, "dropping step");
                    report.dropped_steps.push(saved_step.id);
                    continue;
                }
            };
            if self.contains(&saved_step.id) {
                tracing::warn!(step = %saved_step.id, "dropping duplicate step id");
                report.dropped_steps.push(saved_step.id);
                continue;
            }
            let config = StepConfig::from_value(step_type, saved_step.config).unwrap_or_else(|err| {
                tracing::warn!(step = %saved_step.id, %err, "malformed config, using defaults");
                registry::default_config(step_type)
            });
            let title = if saved_step.title.is_empty() {
                registry::meta(step_type).title.to_string()
            } else {
                saved_step.title
            };
            self.insert_step(saved_step.id, title, config, saved_step.position);
        }

        // 2. Restore Connections
        for saved_conn in saved.connections {
            let Some(from) = self.resolve_handle(&saved_conn.from) else {
                report.dropped_connections += 1;
                continue;
            };
            if !self.connect(from.clone(), &saved_conn.to).is_applied() {
                report.dropped_connections += 1;
                continue;
            }
            if saved_conn.label.is_some() {
                let _ = self.set_connection_label(&from, &saved_conn.to, saved_conn.label);
            }
        }

        if report.dropped_connections > 0 {
            tracing::warn!(count = report.dropped_connections, "pruned connections on load");
        }
        report
    }
}
