use anyhow::Result;
use clap::Parser;
use photonctl_core::Config;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;
mod progress;

use cli::{Cli, Commands};
use commands::CommandContext;
use connection::ConnectionManager;
use error::PhotonCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_file.as_deref())?;

    // Load configuration from specified path or default location
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        (Config::load_from_path(&path), Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load(), None)
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            PhotonCtlError::from(e).print_diagnostic();
            std::process::exit(1);
        }
    };
    let mut conn_mgr = ConnectionManager::with_config_path(config, config_path);

    if let Err(e) = execute_command(&cli, &mut conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "photonctl=warn,photonctl_core=warn",
            1 => "photonctl=info,photonctl_core=info",
            2 => "photonctl=debug,photonctl_core=debug",
            _ => "photonctl=trace,photonctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e)
            })?;
            let layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr)
                .compact();
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
    Ok(())
}

async fn execute_command(
    cli: &Cli,
    conn_mgr: &mut ConnectionManager,
) -> Result<(), PhotonCtlError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            if cli.output.is_structured() {
                let output_data = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": env!("CARGO_PKG_NAME"),
                });
                output::print_output(&output_data, cli.output)
            } else {
                println!("photonctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }

        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, cli.output).await
        }

        Commands::Cluster(cluster_cmd) => {
            let ctx = command_context(cli, conn_mgr);
            commands::cluster::handle_cluster_command(cluster_cmd, &ctx).await
        }

        Commands::Task(task_cmd) => {
            let ctx = command_context(cli, conn_mgr);
            commands::task::handle_task_command(task_cmd, &ctx).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

fn command_context<'a>(cli: &'a Cli, conn_mgr: &'a ConnectionManager) -> CommandContext<'a> {
    CommandContext {
        conn_mgr,
        profile: cli.profile.as_deref(),
        output: cli.output,
        interactive: !cli.non_interactive && !cli.output.is_structured(),
    }
}

/// Short command description for logs; never includes argument values
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Profile(cmd) => format!("profile {}", variant_name(cmd)),
        Commands::Cluster(cmd) => format!("cluster {}", variant_name(cmd)),
        Commands::Task(cmd) => format!("task {}", variant_name(cmd)),
    }
}

fn variant_name<T: std::fmt::Debug>(value: &T) -> String {
    let debug = format!("{:?}", value);
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_hides_arguments() {
        let cli = Cli::parse_from([
            "photonctl",
            "profile",
            "set",
            "lab",
            "--endpoint",
            "http://x",
            "--token",
            "secret",
        ]);
        let formatted = format_command(&cli.command);
        assert_eq!(formatted, "profile set");
        assert!(!formatted.contains("secret"));

        let cli = Cli::parse_from(["photonctl", "cluster", "list-vms", "c-1"]);
        assert_eq!(format_command(&cli.command), "cluster listvms");
    }

    #[test]
    fn test_structured_output_disables_spinners() {
        let cli = Cli::parse_from(["photonctl", "-o", "json", "task", "show", "t-1"]);
        let conn_mgr = ConnectionManager::with_config_path(Config::default(), None);
        assert!(!command_context(&cli, &conn_mgr).interactive);

        let cli = Cli::parse_from(["photonctl", "-n", "task", "show", "t-1"]);
        assert!(!command_context(&cli, &conn_mgr).interactive);

        let cli = Cli::parse_from(["photonctl", "task", "show", "t-1"]);
        assert!(command_context(&cli, &conn_mgr).interactive);
    }
}
