//! Persistence for the curated library: skills, agents, and projects in
//! SQLite. Discovered skill descriptors stay ephemeral; only what the user
//! explicitly saves or registers lands here.

pub mod agents;
pub mod error;
pub mod projects;
pub mod skills;
pub mod types;

pub use {
    agents::{AgentStore, SqliteAgentStore},
    error::{Error, Result},
    projects::{ProjectStore, SqliteProjectStore},
    skills::{SkillStore, SqliteSkillStore},
    types::{
        Agent, AgentPatch, DetectedTool, NewAgent, NewSkill, Project, ProjectPatch, Skill,
        SkillPatch, SkillRef, SkillScope, SkillSource, SourceTool, now_ms,
    },
};

/// Create all tables. Call once at startup before using the stores.
pub async fn init_schema(pool: &sqlx::SqlitePool) -> Result<()> {
    SqliteSkillStore::init(pool).await?;
    SqliteAgentStore::init(pool).await?;
    SqliteProjectStore::init(pool).await?;
    Ok(())
}
