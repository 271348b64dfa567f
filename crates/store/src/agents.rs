use {async_trait::async_trait, sqlx::SqlitePool};

use crate::{
    error::Result,
    types::{Agent, AgentPatch, SourceTool, now_ms},
};

/// Persistence seam for configured agents.
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Agent>>;
    async fn get(&self, id: &str) -> Result<Option<Agent>>;
    async fn create(&self, agent: Agent) -> Result<Agent>;
    async fn update(&self, id: &str, patch: AgentPatch) -> Result<Option<Agent>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct SqliteAgentStore {
    pool: SqlitePool,
}

impl SqliteAgentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the agents table. Idempotent.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS agents (
                id             TEXT    PRIMARY KEY,
                name           TEXT    NOT NULL,
                source_tool    TEXT    NOT NULL,
                enabled_skills TEXT    NOT NULL DEFAULT '[]',
                created_at     INTEGER NOT NULL,
                updated_at     INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AgentStore for SqliteAgentStore {
    async fn list(&self) -> Result<Vec<Agent>> {
        let rows = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Agent>> {
        let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, agent: Agent) -> Result<Agent> {
        let enabled_skills = serde_json::to_string(&agent.enabled_skills)?;
        sqlx::query(
            r#"INSERT INTO agents (id, name, source_tool, enabled_skills, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&agent.id)
        .bind(&agent.name)
        .bind(agent.source_tool.as_str())
        .bind(enabled_skills)
        .bind(agent.created_at as i64)
        .bind(agent.updated_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(agent)
    }

    async fn update(&self, id: &str, patch: AgentPatch) -> Result<Option<Agent>> {
        let Some(mut agent) = self.get(id).await? else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            agent.name = name;
        }
        if let Some(enabled_skills) = patch.enabled_skills {
            agent.enabled_skills = enabled_skills;
        }
        agent.updated_at = now_ms();

        let enabled_skills = serde_json::to_string(&agent.enabled_skills)?;
        sqlx::query("UPDATE agents SET name = ?, enabled_skills = ?, updated_at = ? WHERE id = ?")
            .bind(&agent.name)
            .bind(enabled_skills)
            .bind(agent.updated_at as i64)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(agent))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct AgentRow {
    id: String,
    name: String,
    source_tool: String,
    enabled_skills: String,
    created_at: i64,
    updated_at: i64,
}

impl From<AgentRow> for Agent {
    fn from(r: AgentRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            source_tool: SourceTool::parse(&r.source_tool).unwrap_or(SourceTool::Generic),
            enabled_skills: serde_json::from_str(&r.enabled_skills).unwrap_or_default(),
            created_at: r.created_at as u64,
            updated_at: r.updated_at as u64,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{NewAgent, SkillRef},
    };

    async fn store() -> SqliteAgentStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteAgentStore::init(&pool).await.unwrap();
        SqliteAgentStore::new(pool)
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = store().await;

        let agent = store
            .create(Agent::new(NewAgent {
                name: "Reviewer".into(),
                source_tool: SourceTool::Claude,
                enabled_skills: vec![SkillRef {
                    skill_id: "abc".into(),
                    enabled: true,
                }],
            }))
            .await
            .unwrap();

        let found = store.get(&agent.id).await.unwrap().unwrap();
        assert_eq!(found, agent);
        assert_eq!(found.enabled_skills.len(), 1);

        let updated = store
            .update(
                &agent.id,
                AgentPatch {
                    enabled_skills: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.enabled_skills.is_empty());

        assert!(store.delete(&agent.id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
