//! QCaaS CLI: run classical-versus-quantum comparisons and serve the REST API.

mod commands;

use clap::Parser;
use qcaas_core::AppConfig;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// QCaaS: Quantum-Enhanced Classification as a Service
#[derive(Parser, Debug)]
#[command(name = "qcaas", version, about, long_about = None)]
struct Cli {
    /// Configuration file path (skips the user/workspace search)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Train both classifiers on a dataset and report the winner
    Run {
        /// Dataset identifier (case-insensitive)
        dataset: String,
        /// Directory holding the dataset CSV files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// Qubits for the primary quantum path
        #[arg(long)]
        qubits: Option<usize>,
        /// Measurement shots per circuit (0 = exact probabilities)
        #[arg(long)]
        shots: Option<usize>,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the registered datasets
    Datasets,
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default qcaas.toml into the current directory
    Init,
}

fn load_app_config(cli: &Cli, workspace: &Path) -> anyhow::Result<AppConfig> {
    let loaded = match &cli.config {
        Some(path) => qcaas_core::load_config_file(path),
        None => qcaas_core::load_config(Some(workspace), None),
    };
    loaded.map_err(|e| anyhow::anyhow!("Configuration error: {}", e))
}

/// Human-readable stderr logging, plus JSON rolling files when enabled.
fn init_tracing(cli: &Cli, config: &AppConfig) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 if cli.quiet => EnvFilter::new("error"),
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let (json_layer, guard) = if config.logging.json_file {
        let log_dir = config
            .logging
            .log_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("dev", "qcaas", "qcaas")
                    .map(|d| d.data_dir().join("logs"))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "qcaas.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(EnvFilter::new("debug"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_app_config(&cli, &workspace)?;
    let _guard = init_tracing(&cli, &config);

    commands::handle_command(cli.command, config, &workspace).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "qcaas", "-vv", "run", "Heart", "--data-dir", "/srv/data", "--qubits", "3", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                dataset,
                data_dir,
                qubits,
                shots,
                json,
            } => {
                assert_eq!(dataset, "Heart");
                assert_eq!(data_dir, Some(PathBuf::from("/srv/data")));
                assert_eq!(qubits, Some(3));
                assert_eq!(shots, None);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_and_config() {
        let cli = Cli::try_parse_from(["qcaas", "serve", "--port", "8080", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                host: None,
                port: Some(8080)
            }
        ));

        let cli = Cli::try_parse_from(["qcaas", "-c", "custom.toml", "config", "show"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_run_requires_dataset() {
        assert!(Cli::try_parse_from(["qcaas", "run"]).is_err());
    }

    #[test]
    fn test_explicit_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alt.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "qcaas",
            "--config",
            path.to_str().unwrap(),
            "datasets",
        ])
        .unwrap();
        let config = load_app_config(&cli, dir.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
