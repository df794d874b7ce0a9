//! Faucet Frontend
//!
//! Serves the login control and claim form, holding OAuth tokens server side.

use anyhow::{bail, Context, Result};
use clap::Parser;
use faucet_frontend::{config::FrontendConfig, http::start_server};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short = 'c', long, default_value = "faucet-frontend.toml")]
    config: PathBuf,

    /// Write a default configuration file to the config path and exit
    #[arg(long)]
    generate_config: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.generate_config {
        return generate_config(&args.config);
    }

    let config = load_config(&args.config)
        .with_context(|| format!("Use --generate-config to create {}", args.config.display()))?;
    config.validate().context("Configuration validation failed")?;

    info!(
        "Faucet frontend v{} on {}:{}, backend {}",
        env!("CARGO_PKG_VERSION"),
        config.http.bind_address,
        config.http.port,
        config.backend.base_url
    );
    if config.proxy.enabled {
        warn!(
            "Development proxy enabled: {} -> {}",
            config.proxy.path_prefix, config.proxy.target
        );
    }

    start_server(&config).await?;
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(path: &Path) -> Result<FrontendConfig> {
    if !path.exists() {
        bail!("Configuration file '{}' not found", path.display());
    }

    FrontendConfig::from_file(path)
        .with_context(|| format!("Failed to parse configuration file '{}'", path.display()))
}

fn generate_config(path: &Path) -> Result<()> {
    FrontendConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    println!("Before starting, set oauth.client_id, oauth.client_secret and oauth.redirect_uri,");
    println!("point backend.base_url at the faucet backend and review claim.only_native_token_default.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_load_config() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let temp_path = temp_dir.path().join("generated.toml");

        generate_config(&temp_path)?;

        let config = load_config(&temp_path)?;

        assert_eq!(config.http.port, 3000);
        assert!(config.claim.only_native_token_default);
        assert_eq!(config.claim.chains.len(), 5);
        // Placeholder OAuth credentials must not pass validation
        assert!(config.validate().is_err());

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = load_config(Path::new("nonexistent-file.toml"));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["faucet-frontend"]);
        assert_eq!(args.config, PathBuf::from("faucet-frontend.toml"));
        assert!(!args.generate_config);

        let args = Args::parse_from(["faucet-frontend", "-c", "other.toml", "--generate-config"]);
        assert_eq!(args.config, PathBuf::from("other.toml"));
        assert!(args.generate_config);
    }
}
