use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tplvault::config::ConfigOverrides;
use tplvault::server::VaultHttpServer;
use tplvault::store::{check_entry, Catalog};
use tplvault::Config;

#[derive(Parser, Debug)]
#[command(name = "tplvault")]
#[command(about = "Serve and check the template store")]
struct Cli {
    /// Destination store directory (overrides vault.store_dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve archive downloads over HTTP
    Serve {
        /// Port to listen on (overrides http_server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check every entry's layout and archive reference (default)
    Verify,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Verify);

    let mut config = Config::load()?;
    config.apply_overrides(ConfigOverrides {
        store_dir: cli.store,
        port: match &command {
            Command::Serve { port } => *port,
            Command::Verify => None,
        },
        ..Default::default()
    })?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.vault.log_level.as_str()),
    )
    .init();

    match command {
        Command::Serve { .. } => {
            run_http_server(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify => run_store_verification(&config),
    }
}

/// Serve downloads from the store
async fn run_http_server(config: &Config) -> Result<()> {
    log::info!("Starting tplvault HTTP server v{}", env!("CARGO_PKG_VERSION"));

    let server = VaultHttpServer::new(
        config.store_dir().to_path_buf(),
        config.http_server.allowed_origins.clone(),
    );
    server.run(config.http_server.port).await?;

    Ok(())
}

/// Check that every entry in the store references an archive inside its own directory
fn run_store_verification(config: &Config) -> Result<ExitCode> {
    log::info!("Verifying store at {}", config.store_dir().display());

    let catalog = Catalog::load(config.store_dir())?;
    let mut broken = 0;

    for entry in catalog.entries() {
        let problems = check_entry(entry);
        if problems.is_empty() {
            log::debug!("✓ {}", entry.id);
            continue;
        }
        broken += 1;
        for problem in problems {
            log::error!("✗ {}: {}", entry.id, problem);
        }
    }

    log::info!("{} entries checked, {} broken", catalog.len(), broken);
    if broken > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_serve_port_override() {
        let cli = Cli::try_parse_from(["tplvault", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve { port: Some(8080) })));
    }

    #[test]
    fn test_cli_defaults_to_verify() {
        let cli = Cli::try_parse_from(["tplvault", "--store", "templates"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.store, Some(PathBuf::from("templates")));
        assert!(Cli::try_parse_from(["tplvault", "bogus"]).is_err());
    }
}
