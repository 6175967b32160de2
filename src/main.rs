//! FakeGPT CLI - Fake LLM API Server
//!
//! Usage:
//!   fakegpt serve [OPTIONS]    Start the HTTP server
//!
//! Examples:
//!   fakegpt serve --port 3000
//!   fakegpt serve --config config.yaml
//!   fakegpt serve --admin-password secret

use clap::{Parser, Subcommand};
use fakegpt::cli::{Config, ConfigError};

#[derive(Parser)]
#[command(name = "fakegpt")]
#[command(author, version, about = "Fake LLM API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the FakeGPT HTTP server
    Serve {
        /// Configuration file path (YAML)
        #[arg(short, long)]
        config: Option<String>,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Admin panel password
        #[arg(long, env = "FAKEGPT_ADMIN_PASSWORD")]
        admin_password: Option<String>,

        /// File the request log is persisted to
        #[arg(long)]
        log_file: Option<String>,
    },
}

fn build_config(
    config_file: Option<String>,
    port: u16,
    host: String,
    admin_password: Option<String>,
    log_file: Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = if let Some(path) = config_file {
        Config::from_file(&path)?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    config.server.port = port;
    config.server.host = host;
    if let Some(password) = admin_password {
        config.admin.password = password;
    }
    if let Some(path) = log_file {
        config.storage.log_file = path;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            host,
            admin_password,
            log_file,
        } => {
            let config = build_config(config, port, host, admin_password, log_file)?;

            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive("fakegpt=info".parse().unwrap())
                        .add_directive("tower_http=debug".parse().unwrap()),
                )
                .init();

            fakegpt::cli::run_server(config).await?;
        }
    }

    Ok(())
}
