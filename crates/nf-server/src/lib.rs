pub mod config;
pub mod rest;
pub mod sanitize;
pub mod state;
pub mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use nf_storage::SqliteStore;
use state::AppState;

pub struct ServerConfig {
    pub bind_host: String,
    pub rest_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".into(),
            rest_port: 8000,
            cors_allowed_origins: Vec::new(),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Start the Noteful REST server.
pub async fn start_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nf_server=debug".parse().unwrap()),
        )
        .init();

    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = config.data_dir.join("noteful.sqlite");
    tracing::info!(path = %db_path.display(), "opening note store");
    let store = Arc::new(SqliteStore::open(&db_path)?);

    let state = Arc::new(AppState::with_store(store));
    let app = rest::create_router_with_cors(state, &config.cors_allowed_origins);

    let addr = format!("{}:{}", config.bind_host, config.rest_port);
    tracing::info!("REST API listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
