use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use skillforge_connectors::{ConnectorRegistry, ToolName};

#[derive(Parser)]
#[command(name = "skillforge", about = "SkillForge: skill library for AI coding tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Custom config directory (overrides the default user config dir).
    #[arg(long, global = true, env = "SKILLFORGE_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
    /// Custom data directory (overrides the default user data dir).
    #[arg(long, global = true, env = "SKILLFORGE_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default when no subcommand is provided).
    Serve,
    /// Show detection status for every supported tool.
    Tools,
    /// List skills discovered on this machine.
    Skills {
        /// Limit to one tool (e.g. claude-code).
        #[arg(long)]
        tool: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        // Default: serve when no subcommand is provided
        None | Some(Commands::Serve) => {
            // Apply directory overrides before loading config
            if let Some(ref dir) = cli.config_dir {
                skillforge_config::set_config_dir(dir.clone());
            }
            if let Some(ref dir) = cli.data_dir {
                skillforge_config::set_data_dir(dir.clone());
            }

            let config = skillforge_config::discover_and_load();

            // CLI args override config values
            let bind = cli.bind.unwrap_or(config.server.bind);
            let port = cli.port.unwrap_or(config.server.port);

            info!(version = env!("CARGO_PKG_VERSION"), "skillforge starting");
            skillforge_server::start_server(&bind, port, &config.server.cors_origins).await
        },
        Some(Commands::Tools) => handle_tools().await,
        Some(Commands::Skills { tool }) => handle_skills(tool).await,
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

async fn handle_tools() -> anyhow::Result<()> {
    let registry = ConnectorRegistry::new()?;
    let detections = registry.detect_all_global().await;
    for (connector, detection) in registry.connectors().iter().zip(detections) {
        let status = if detection.detected {
            "detected"
        } else {
            "not detected"
        };
        match detection.global_dir {
            Some(dir) => println!("{:<12} {status:<13} {}", connector.name(), dir.display()),
            None => println!("{:<12} {status}", connector.name()),
        }
    }
    Ok(())
}

async fn handle_skills(tool: Option<String>) -> anyhow::Result<()> {
    let registry = ConnectorRegistry::new()?;
    let listings = match tool {
        Some(name) => {
            let tool: ToolName = name.parse()?;
            let skills = match registry.get(tool) {
                Some(connector) => connector.list_skills().await,
                None => Vec::new(),
            };
            vec![(tool, skills)]
        },
        None => registry.list_all_skills().await,
    };

    for (tool, skills) in listings {
        for skill in skills {
            println!("{tool:<12} {:<24} {}", skill.name, skill.description);
        }
    }
    Ok(())
}
