use {async_trait::async_trait, sqlx::SqlitePool};

use crate::{
    error::Result,
    types::{Skill, SkillPatch, SkillScope, SkillSource, SourceTool, now_ms},
};

/// Persistence seam for library skills.
#[async_trait]
pub trait SkillStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Skill>>;
    async fn get(&self, id: &str) -> Result<Option<Skill>>;
    async fn create(&self, skill: Skill) -> Result<Skill>;
    async fn update(&self, id: &str, patch: SkillPatch) -> Result<Option<Skill>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct SqliteSkillStore {
    pool: SqlitePool,
}

impl SqliteSkillStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the skills table. Idempotent.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS skills (
                id                 TEXT    PRIMARY KEY,
                name               TEXT    NOT NULL,
                description        TEXT    NOT NULL,
                body               TEXT,
                frontmatter        TEXT,
                input_schema       TEXT,
                output_schema      TEXT,
                implementation_ref TEXT,
                source             TEXT    NOT NULL,
                original_tool      TEXT,
                tags               TEXT    NOT NULL DEFAULT '[]',
                scope              TEXT    NOT NULL DEFAULT 'general',
                created_at         INTEGER NOT NULL,
                updated_at         INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SkillStore for SqliteSkillStore {
    async fn list(&self) -> Result<Vec<Skill>> {
        let rows = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Skill>> {
        let row = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, skill: Skill) -> Result<Skill> {
        let frontmatter = skill
            .frontmatter
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let input_schema = skill
            .input_schema
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let output_schema = skill
            .output_schema
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let tags = serde_json::to_string(&skill.tags)?;

        sqlx::query(
            r#"INSERT INTO skills (id, name, description, body, frontmatter, input_schema, output_schema, implementation_ref, source, original_tool, tags, scope, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&skill.id)
        .bind(&skill.name)
        .bind(&skill.description)
        .bind(&skill.body)
        .bind(frontmatter)
        .bind(input_schema)
        .bind(output_schema)
        .bind(&skill.implementation_ref)
        .bind(skill.source.as_str())
        .bind(skill.original_tool.map(SourceTool::as_str))
        .bind(tags)
        .bind(skill.scope.as_str())
        .bind(skill.created_at as i64)
        .bind(skill.updated_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(skill)
    }

    async fn update(&self, id: &str, patch: SkillPatch) -> Result<Option<Skill>> {
        let Some(mut skill) = self.get(id).await? else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            skill.name = name;
        }
        if let Some(description) = patch.description {
            skill.description = description;
        }
        if let Some(body) = patch.body {
            skill.body = Some(body);
        }
        if let Some(tags) = patch.tags {
            skill.tags = tags;
        }
        if let Some(scope) = patch.scope {
            skill.scope = scope;
        }
        skill.updated_at = now_ms();

        let tags = serde_json::to_string(&skill.tags)?;
        sqlx::query(
            "UPDATE skills SET name = ?, description = ?, body = ?, tags = ?, scope = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&skill.name)
        .bind(&skill.description)
        .bind(&skill.body)
        .bind(tags)
        .bind(skill.scope.as_str())
        .bind(skill.updated_at as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(Some(skill))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct SkillRow {
    id: String,
    name: String,
    description: String,
    body: Option<String>,
    frontmatter: Option<String>,
    input_schema: Option<String>,
    output_schema: Option<String>,
    implementation_ref: Option<String>,
    source: String,
    original_tool: Option<String>,
    tags: String,
    scope: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SkillRow> for Skill {
    fn from(r: SkillRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            body: r.body,
            frontmatter: r.frontmatter.and_then(|s| serde_json::from_str(&s).ok()),
            input_schema: r.input_schema.and_then(|s| serde_json::from_str(&s).ok()),
            output_schema: r.output_schema.and_then(|s| serde_json::from_str(&s).ok()),
            implementation_ref: r.implementation_ref,
            source: SkillSource::parse(&r.source).unwrap_or(SkillSource::Manual),
            original_tool: r.original_tool.as_deref().and_then(SourceTool::parse),
            tags: serde_json::from_str(&r.tags).unwrap_or_default(),
            scope: SkillScope::parse(&r.scope).unwrap_or_default(),
            created_at: r.created_at as u64,
            updated_at: r.updated_at as u64,
        }
    }
}
