use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use step_canvas::persistence::{AutomationDocument, AutomationStatus};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Server-assigned identity of a saved automation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutomationId(Uuid);

impl AutomationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AutomationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AutomationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for AutomationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("automation {0} not found")]
    NotFound(AutomationId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAutomation {
    pub id: AutomationId,
    pub document: AutomationDocument,
}

#[async_trait]
pub trait AutomationBackend: Send + Sync {
    /// Stores a new automation and returns its id.
    async fn save(&self, document: AutomationDocument) -> anyhow::Result<AutomationId>;

    /// Replaces the graph and metadata of an existing automation.
    async fn update(&self, id: AutomationId, document: AutomationDocument) -> anyhow::Result<()>;

    async fn load(&self, id: AutomationId) -> anyhow::Result<AutomationDocument>;

    /// Retrieves all automations, oldest first.
    async fn list(&self) -> anyhow::Result<Vec<StoredAutomation>>;

    async fn delete(&self, id: AutomationId) -> anyhow::Result<()>;

    /// Moves an automation to a new lifecycle status.
    async fn patch_status(&self, id: AutomationId, status: AutomationStatus) -> anyhow::Result<()>;
}

/// Backend that keeps documents in process memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    storage: Arc<RwLock<HashMap<AutomationId, AutomationDocument>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }
}

#[async_trait]
impl AutomationBackend for InMemoryBackend {
    async fn save(&self, document: AutomationDocument) -> anyhow::Result<AutomationId> {
        let id = AutomationId::new();
        tracing::info!(%id, name = %document.name, "automation created");
        self.storage.write().await.insert(id, document);
        Ok(id)
    }

    async fn update(&self, id: AutomationId, document: AutomationDocument) -> anyhow::Result<()> {
        let mut guard = self.storage.write().await;
        let stored = guard.get_mut(&id).ok_or(BackendError::NotFound(id))?;
        // Status and creation time belong to the backend.
        let status = stored.status;
        let created_at = stored.created_at;
        *stored = AutomationDocument {
            status,
            created_at,
            ..document
        };
        tracing::info!(%id, "automation updated");
        Ok(())
    }

    async fn load(&self, id: AutomationId) -> anyhow::Result<AutomationDocument> {
        let guard = self.storage.read().await;
        let document = guard.get(&id).ok_or(BackendError::NotFound(id))?;
        Ok(document.clone())
    }

    async fn list(&self) -> anyhow::Result<Vec<StoredAutomation>> {
        let guard = self.storage.read().await;
        let mut automations: Vec<_> = guard
            .iter()
            .map(|(id, document)| StoredAutomation {
                id: *id,
                document: document.clone(),
            })
            .collect();
        automations.sort_by_key(|a| a.document.created_at);
        Ok(automations)
    }

    async fn delete(&self, id: AutomationId) -> anyhow::Result<()> {
        self.storage
            .write()
            .await
            .remove(&id)
            .ok_or(BackendError::NotFound(id))?;
        tracing::info!(%id, "automation deleted");
        Ok(())
    }

    async fn patch_status(&self, id: AutomationId, status: AutomationStatus) -> anyhow::Result<()> {
        let mut guard = self.storage.write().await;
        let stored = guard.get_mut(&id).ok_or(BackendError::NotFound(id))?;
        stored.status = status;
        tracing::info!(%id, status = status.as_str(), "automation status changed");
        Ok(())
    }
}
