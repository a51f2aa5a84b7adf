//! Educa Web Server
//!
//! Course platform API: login, courses and their notas/galeria/anuncios.

use anyhow::Context;
use clap::Parser;
use educa_core::EducaConfig;
use educa_web::{init_logging, EducaServer};
use std::path::PathBuf;
use tracing::info;

/// Educa Web Server - course platform API
#[derive(Parser, Debug)]
#[command(name = "educa-web")]
#[command(about = "HTTP API for the Educa course platform")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database URL (in-memory storage when absent)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Defaults, then config file, then environment, then command line
    fn load_config(self) -> anyhow::Result<EducaConfig> {
        let mut config = match &self.config {
            Some(path) => EducaConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => EducaConfig::default(),
        };

        config.apply_env_overrides()?;

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.storage.database_url = Some(url);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Args::parse().load_config()?;
    init_logging(&config.logging)?;

    let server = EducaServer::new(config)
        .await
        .context("failed to build server")?;
    info!("Server: http://{}", server.config().address());
    server.start().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["educa-web"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());

        let args = Args::parse_from([
            "educa-web",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--database-url",
            "sqlite::memory:",
        ]);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_command_line_wins() {
        let args = Args::parse_from(["educa-web", "--port", "4100", "--log-level", "debug"]);
        let config = args.load_config().unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.logging.level, "debug");
    }
}
