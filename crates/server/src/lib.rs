//! REST API over the connector registry and the library stores.
//!
//! Routes live under `/api`. Responses use a `{"data": …}` envelope;
//! failures use `{"error": {"message", "code"}}`.

use std::sync::Arc;

use {
    axum::{
        Router,
        http::{HeaderValue, Method, header},
        routing::{get, patch},
    },
    tower_http::cors::CorsLayer,
    tracing::info,
};

use {
    skillforge_connectors::ConnectorRegistry,
    skillforge_store::{
        AgentStore, ProjectStore, SkillStore, SqliteAgentStore, SqliteProjectStore,
        SqliteSkillStore,
    },
};

pub mod agents;
pub mod error;
pub mod health;
pub mod projects;
pub mod skills;
pub mod tools;

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub skills: Arc<dyn SkillStore>,
    pub agents: Arc<dyn AgentStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub registry: Arc<ConnectorRegistry>,
}

/// Build the full API router.
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_handler))
        .route("/tools", get(tools::tools_index_handler))
        .route(
            "/tools/claude-code/commands",
            get(tools::claude_commands_handler),
        )
        .route("/tools/{name}/skills", get(tools::tool_skills_handler))
        .route(
            "/skills",
            get(skills::list_handler).post(skills::create_handler),
        )
        .route(
            "/skills/{id}",
            get(skills::get_handler)
                .patch(skills::update_handler)
                .delete(skills::delete_handler),
        )
        .route(
            "/agents",
            get(agents::list_handler).post(agents::create_handler),
        )
        .route(
            "/agents/{id}",
            get(agents::get_handler)
                .patch(agents::update_handler)
                .delete(agents::delete_handler),
        )
        .route(
            "/projects",
            get(projects::list_handler).post(projects::create_handler),
        )
        .route(
            "/projects/{id}",
            get(projects::get_handler)
                .patch(projects::update_handler)
                .delete(projects::delete_handler),
        )
        .route("/projects/{id}/skills", get(projects::project_skills_handler))
        .route(
            "/projects/{id}/favorite",
            patch(projects::favorite_handler),
        );

    let mut app = Router::new().nest("/api", api).with_state(state);
    if !cors_origins.is_empty() {
        app = app.layer(cors_layer(cors_origins));
    }
    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Open the database under the data dir, run schema init, and serve until
/// shutdown.
pub async fn start_server(bind: &str, port: u16, cors_origins: &[String]) -> anyhow::Result<()> {
    let data_dir = skillforge_config::data_dir();
    tokio::fs::create_dir_all(&data_dir).await.ok();

    let db_path = data_dir.join("skillforge.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let pool = sqlx::SqlitePool::connect(&db_url).await?;
    skillforge_store::init_schema(&pool).await?;
    info!(db = %db_path.display(), "database ready");

    let state = AppState {
        skills: Arc::new(SqliteSkillStore::new(pool.clone())),
        agents: Arc::new(SqliteAgentStore::new(pool.clone())),
        projects: Arc::new(SqliteProjectStore::new(pool)),
        registry: Arc::new(ConnectorRegistry::new()?),
    };

    let app = build_app(state, cors_origins);
    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "skillforge API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
