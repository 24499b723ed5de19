mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "noteful", about = "REST backend for the Noteful note-taking app", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST server.
    Serve {
        /// Port for the REST listener (overrides config).
        #[arg(long)]
        port: Option<u16>,
        /// Directory holding the SQLite database (overrides config).
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Path to the runtime config file.
        #[arg(long, default_value = "noteful.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            config,
        } => commands::serve::start(port, data_dir, &config).await,
    }
}
