//! Logosmith CLI — runs the logo design consultation backend.
//!
//! Reuses the same core domain logic (logosmith-core) and server
//! bootstrap (logosmith-server) so the HTTP surface and any embedding
//! share one engine.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use logosmith_core::providers::openai::OpenAiClient;
use logosmith_core::providers::replicate::ReplicateClient;
use logosmith_core::providers::SimulatedAssessor;
use logosmith_core::state::{AppState, AppStateInner};
use logosmith_core::workflow::engine::WorkflowEngine;
use logosmith_server::{start_server, ServerConfig};

/// Logosmith CLI — logo design consultation backend
#[derive(Parser)]
#[command(name = "logosmith", version, about = "Logosmith — logo design consultation backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Logosmith HTTP backend server
    Server {
        /// Host to bind to
        #[arg(long, env = "LOGOSMITH_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "LOGOSMITH_PORT", default_value_t = 8000)]
        port: u16,
        /// Path to static frontend directory
        #[arg(long, env = "LOGOSMITH_STATIC_DIR")]
        static_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            host,
            port,
            static_dir,
        } => {
            logosmith_server::init_tracing();

            let state = match build_state() {
                Ok(state) => state,
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            };

            let config = ServerConfig {
                host,
                port,
                static_dir,
            };

            match start_server(config, state).await {
                Ok(addr) => {
                    tracing::info!("Logosmith ready at http://{addr}");
                    // The serve loop runs in a background task; park here.
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("Failed to listen for shutdown signal: {e}");
                    }
                    tracing::info!("Shutting down");
                }
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Build the shared engine from environment-configured providers.
fn build_state() -> Result<AppState, String> {
    let text = OpenAiClient::from_env().map_err(|e| e.to_string())?;
    let image = ReplicateClient::from_env().map_err(|e| e.to_string())?;

    let engine = WorkflowEngine::new(
        Arc::new(text),
        Arc::new(image),
        Arc::new(SimulatedAssessor::default()),
    );

    Ok(Arc::new(AppStateInner::new(engine)))
}
