use std::path::{Path, PathBuf};

use anyhow::Result;

use nf_server::config::RuntimeConfig;

pub async fn start(
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    config_path: &Path,
) -> Result<()> {
    let runtime = RuntimeConfig::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?;

    let bind_host = runtime.server.bind_host.clone();
    let rest_port = port.unwrap_or(runtime.server.rest_port);
    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&runtime.storage.data_dir));

    let server_config = nf_server::ServerConfig {
        bind_host: bind_host.clone(),
        rest_port,
        cors_allowed_origins: runtime.server.cors_allowed_origins,
        data_dir: data_dir.clone(),
    };

    println!("starting Noteful server...");
    println!("  REST: http://{bind_host}:{rest_port}");
    println!("  data: {}", data_dir.display());

    nf_server::start_server(server_config)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}
