//! The registry of all connectors, in canonical display order.

use std::path::Path;

use futures::future::join_all;

use crate::{
    connector::{Connector, SPECS},
    types::{CommandDescriptor, GlobalDetection, ProjectDetection, SkillDescriptor, ToolName},
};

/// Ordered collection of every supported connector. Bulk operations fan out
/// concurrently and recombine results by stable position, so output order is
/// deterministic regardless of which filesystem check returns first.
pub struct ConnectorRegistry {
    connectors: Vec<Connector>,
}

impl ConnectorRegistry {
    /// Build the registry against the current user's home directory.
    pub fn new() -> anyhow::Result<Self> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;
        Ok(Self::from_home(base.home_dir()))
    }

    /// Build the registry against an explicit home directory (tests, or a
    /// sandboxed install).
    pub fn from_home(home: &Path) -> Self {
        Self {
            connectors: SPECS.iter().map(|s| Connector::from_spec(s, home)).collect(),
        }
    }

    /// The canonical ordered list.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn get(&self, name: ToolName) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.name() == name)
    }

    /// Global detection for every tool, positionally aligned with
    /// [`ConnectorRegistry::connectors`].
    pub async fn detect_all_global(&self) -> Vec<GlobalDetection> {
        join_all(self.connectors.iter().map(|c| c.detect_global())).await
    }

    /// Per-project detection for every tool, positionally aligned with
    /// [`ConnectorRegistry::connectors`].
    pub async fn detect_all_project(&self, project_path: &Path) -> Vec<ProjectDetection> {
        join_all(self.connectors.iter().map(|c| c.detect_project(project_path))).await
    }

    /// Global skills for every tool.
    pub async fn list_all_skills(&self) -> Vec<(ToolName, Vec<SkillDescriptor>)> {
        join_all(
            self.connectors
                .iter()
                .map(|c| async move { (c.name(), c.list_skills().await) }),
        )
        .await
    }

    /// Per-project skills for every tool.
    pub async fn list_all_project_skills(
        &self,
        project_path: &Path,
    ) -> Vec<(ToolName, Vec<SkillDescriptor>)> {
        join_all(self.connectors.iter().map(|c| async move {
            (c.name(), c.list_project_skills(project_path).await)
        }))
        .await
    }

    /// Global commands across tools that have them (claude-code today).
    pub async fn list_global_commands(&self) -> Vec<CommandDescriptor> {
        match self.get(ToolName::ClaudeCode) {
            Some(c) => c.list_commands().await,
            None => Vec::new(),
        }
    }
}
