use {async_trait::async_trait, sqlx::SqlitePool};

use crate::{
    error::Result,
    types::{DetectedTool, Project, ProjectPatch, now_ms},
};

/// Persistence seam for registered projects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>>;
    async fn get(&self, id: &str) -> Result<Option<Project>>;
    async fn get_by_path(&self, path: &str) -> Result<Option<Project>>;
    async fn create(&self, project: Project) -> Result<Project>;
    async fn update(&self, id: &str, patch: ProjectPatch) -> Result<Option<Project>>;
    /// Replace the stored detection snapshot after a rescan.
    async fn set_detected_tools(&self, id: &str, tools: &[DetectedTool]) -> Result<()>;
    async fn toggle_favorite(&self, id: &str) -> Result<Option<Project>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the projects table. Idempotent.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS projects (
                id               TEXT    PRIMARY KEY,
                name             TEXT    NOT NULL,
                path             TEXT    NOT NULL UNIQUE,
                icon_path        TEXT,
                preferred_editor TEXT,
                is_favorite      INTEGER NOT NULL DEFAULT 0,
                detected_tools   TEXT    NOT NULL DEFAULT '[]',
                created_at       INTEGER NOT NULL,
                updated_at       INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let rows =
            sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects ORDER BY updated_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn get_by_path(&self, path: &str) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, project: Project) -> Result<Project> {
        let detected_tools = serde_json::to_string(&project.detected_tools)?;
        sqlx::query(
            r#"INSERT INTO projects (id, name, path, icon_path, preferred_editor, is_favorite, detected_tools, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.path)
        .bind(&project.icon_path)
        .bind(&project.preferred_editor)
        .bind(project.is_favorite as i32)
        .bind(detected_tools)
        .bind(project.created_at as i64)
        .bind(project.updated_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> Result<Option<Project>> {
        let Some(mut project) = self.get(id).await? else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(icon_path) = patch.icon_path {
            project.icon_path = Some(icon_path);
        }
        if let Some(preferred_editor) = patch.preferred_editor {
            project.preferred_editor = Some(preferred_editor);
        }
        project.updated_at = now_ms();

        sqlx::query(
            "UPDATE projects SET name = ?, icon_path = ?, preferred_editor = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&project.name)
        .bind(&project.icon_path)
        .bind(&project.preferred_editor)
        .bind(project.updated_at as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(Some(project))
    }

    async fn set_detected_tools(&self, id: &str, tools: &[DetectedTool]) -> Result<()> {
        let detected_tools = serde_json::to_string(tools)?;
        sqlx::query("UPDATE projects SET detected_tools = ?, updated_at = ? WHERE id = ?")
            .bind(detected_tools)
            .bind(now_ms() as i64)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<Option<Project>> {
        let Some(mut project) = self.get(id).await? else {
            return Ok(None);
        };
        project.is_favorite = !project.is_favorite;
        project.updated_at = now_ms();

        sqlx::query("UPDATE projects SET is_favorite = ?, updated_at = ? WHERE id = ?")
            .bind(project.is_favorite as i32)
            .bind(project.updated_at as i64)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(project))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    name: String,
    path: String,
    icon_path: Option<String>,
    preferred_editor: Option<String>,
    is_favorite: i32,
    detected_tools: String,
    created_at: i64,
    updated_at: i64,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            path: r.path,
            icon_path: r.icon_path,
            preferred_editor: r.preferred_editor,
            is_favorite: r.is_favorite != 0,
            detected_tools: serde_json::from_str(&r.detected_tools).unwrap_or_default(),
            created_at: r.created_at as u64,
            updated_at: r.updated_at as u64,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, skillforge_connectors::ToolName};

    async fn store() -> SqliteProjectStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteProjectStore::init(&pool).await.unwrap();
        SqliteProjectStore::new(pool)
    }

    fn detections() -> Vec<DetectedTool> {
        vec![
            DetectedTool {
                name: ToolName::ClaudeCode,
                detected: true,
            },
            DetectedTool {
                name: ToolName::Cursor,
                detected: false,
            },
        ]
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = store().await;

        let project = store
            .create(Project::new("/home/u/code/app".into(), detections()))
            .await
            .unwrap();
        assert_eq!(project.name, "app");

        let found = store.get(&project.id).await.unwrap().unwrap();
        assert_eq!(found.detected_tools, detections());

        let by_path = store.get_by_path("/home/u/code/app").await.unwrap();
        assert!(by_path.is_some());

        let updated = store
            .update(
                &project.id,
                ProjectPatch {
                    name: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "renamed");

        assert!(store.delete(&project.id).await.unwrap());
        assert!(store.get(&project.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_path_is_rejected() {
        let store = store().await;
        store
            .create(Project::new("/same/path".into(), Vec::new()))
            .await
            .unwrap();
        let result = store
            .create(Project::new("/same/path".into(), Vec::new()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn toggle_favorite_flips() {
        let store = store().await;
        let project = store
            .create(Project::new("/fav/path".into(), Vec::new()))
            .await
            .unwrap();
        let toggled = store.toggle_favorite(&project.id).await.unwrap().unwrap();
        assert!(toggled.is_favorite);
        let toggled_back = store.toggle_favorite(&project.id).await.unwrap().unwrap();
        assert!(!toggled_back.is_favorite);
    }

    #[tokio::test]
    async fn detection_snapshot_can_be_refreshed() {
        let store = store().await;
        let project = store
            .create(Project::new("/scan/path".into(), Vec::new()))
            .await
            .unwrap();

        store
            .set_detected_tools(&project.id, &detections())
            .await
            .unwrap();
        let found = store.get(&project.id).await.unwrap().unwrap();
        assert_eq!(found.detected_tools, detections());
    }
}
