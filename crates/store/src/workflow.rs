//! Saved workflows
//!
//! A workflow is a named snapshot of a whole design. Saved workflows live
//! together in one JSON file inside the store directory; single workflows
//! can also be exported to and imported from standalone files.

use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use doc_model::DesignState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format version written into every workflow
pub const WORKFLOW_VERSION: &str = "1.0.0";

const WORKFLOWS_FILE: &str = "workflows.json";

/// A named, timestamped design snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowData {
    pub id: String,
    pub name: String,
    pub design_state: DesignState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
}

impl WorkflowData {
    /// A new workflow around `design_state`, with a fresh id
    pub fn new(name: impl Into<String>, design_state: DesignState) -> Self {
        let now = Utc::now();
        Self {
            id: generate_workflow_id(),
            name: name.into(),
            design_state,
            created_at: now,
            updated_at: now,
            version: WORKFLOW_VERSION.to_string(),
        }
    }

    /// Name used when the workflow is exported to a file
    pub fn export_file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{stem}.json")
    }
}

pub fn generate_workflow_id() -> String {
    format!("workflow-{}", uuid::Uuid::new_v4())
}

/// Parse an exported workflow.
///
/// The text must be a JSON object with an `id` and a `designState`.
/// Nothing is returned unless the whole workflow decodes.
pub fn parse_workflow(text: &str) -> Result<WorkflowData> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| StoreError::InvalidFormat(format!("workflow is not valid JSON: {e}")))?;

    let has_id = value
        .get("id")
        .and_then(|id| id.as_str())
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        return Err(StoreError::InvalidFormat("workflow has no id".into()));
    }
    if value.get("designState").map_or(true, |s| s.is_null()) {
        return Err(StoreError::InvalidFormat("workflow has no designState".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| StoreError::InvalidFormat(format!("workflow does not decode: {e}")))
}

/// Saved workflows in a directory
pub struct WorkflowStore {
    path: PathBuf,
}

impl WorkflowStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(WORKFLOWS_FILE),
        }
    }

    /// File holding every saved workflow
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<WorkflowData>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, workflows: &[WorkflowData]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(workflows)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Insert or replace by id. `updatedAt` is refreshed; the stored copy
    /// is returned.
    pub async fn save(&self, workflow: &WorkflowData) -> Result<WorkflowData> {
        let mut saved = workflow.clone();
        saved.updated_at = Utc::now();
        saved.version = WORKFLOW_VERSION.to_string();

        let mut workflows = self.read_all().await?;
        match workflows.iter_mut().find(|w| w.id == saved.id) {
            Some(existing) => *existing = saved.clone(),
            None => workflows.push(saved.clone()),
        }
        self.write_all(&workflows).await?;
        debug!(id = %saved.id, name = %saved.name, "Saved workflow");
        Ok(saved)
    }

    pub async fn load(&self, id: &str) -> Result<WorkflowData> {
        self.read_all()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::FileNotFound(format!("workflow {id}")))
    }

    /// All saved workflows, most recently updated first
    pub async fn list(&self) -> Result<Vec<WorkflowData>> {
        let mut workflows = self.read_all().await?;
        workflows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(workflows)
    }

    /// Most recently updated workflow, if any
    pub async fn latest(&self) -> Result<Option<WorkflowData>> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Remove a workflow; returns whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let mut workflows = self.read_all().await?;
        let before = workflows.len();
        workflows.retain(|w| w.id != id);
        if workflows.len() == before {
            return Ok(false);
        }
        self.write_all(&workflows).await?;
        debug!(id, "Deleted workflow");
        Ok(true)
    }

    /// Write one saved workflow to `dir` as a standalone file
    pub async fn export_to_file(&self, id: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let workflow = self.load(id).await?;
        let path = dir.as_ref().join(workflow.export_file_name());
        let content = serde_json::to_string_pretty(&workflow)?;
        tokio::fs::write(&path, content).await?;
        info!(path = %path.display(), "Exported workflow");
        Ok(path)
    }

    /// Add a workflow from an exported file.
    ///
    /// The imported copy gets a fresh id so it never replaces a saved one.
    pub async fn import_from_file(&self, path: impl AsRef<Path>) -> Result<WorkflowData> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            return Err(StoreError::FileNotFound(path.display().to_string()));
        }
        let text = tokio::fs::read_to_string(path).await?;
        let mut workflow = parse_workflow(&text)?;
        workflow.id = generate_workflow_id();
        workflow.updated_at = Utc::now();

        let mut workflows = self.read_all().await?;
        workflows.push(workflow.clone());
        self.write_all(&workflows).await?;
        info!(id = %workflow.id, "Imported workflow");
        Ok(workflow)
    }
}

/// A blank workflow that keeps the custom fonts of `previous`
pub fn new_workflow(name: impl Into<String>, previous: Option<&DesignState>) -> WorkflowData {
    let mut state = DesignState::default();
    if let Some(previous) = previous {
        state.custom_fonts = previous.custom_fonts.clone();
    }
    WorkflowData::new(name, state)
}
