//! Coffee Shop Web Server
//!
//! Drink menu API for the coffee shop.

use clap::Parser;
use coffeeshop_core::LogFormat;
use coffeeshop_web::server::CoffeeShopServerBuilder;
use coffeeshop_web::{init_logging, CoffeeShopConfig, WebResult};
use std::path::PathBuf;

/// Coffee Shop Web Server - drink menu API with permission based access
#[derive(Parser, Debug)]
#[command(name = "coffeeshop-web")]
#[command(about = "REST API for the coffee shop drink menu")]
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

    /// Database URL, e.g. sqlite:database.db
    #[arg(long)]
    database_url: Option<String>,

    /// Drop all drinks and seed the sample menu before serving
    #[arg(long)]
    reset_db: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (json, pretty, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    /// Flags override file and environment settings
    fn apply(&self, config: &mut CoffeeShopConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if self.reset_db {
            config.database.reset_on_startup = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> WebResult<()> {
    dotenvy::dotenv().ok();

    let mut config = match &args.config {
        Some(path) => CoffeeShopConfig::from_file(path)?,
        None => CoffeeShopConfig::default(),
    };
    config.apply_env()?;
    args.apply(&mut config);

    init_logging(&config.logging)?;

    println!("🚀 Starting Coffee Shop Web Server");
    println!("📍 Server: http://{}", config.address());
    println!("🗄️  Database: {}", config.database.url);

    let server = CoffeeShopServerBuilder::from_config(config).build().await?;
    server.start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "coffeeshop-web",
            "--port",
            "8081",
            "--database-url",
            "sqlite::memory:",
            "--reset-db",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ]);

        let mut config = CoffeeShopConfig::default();
        args.apply(&mut config);

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.database.is_in_memory());
        assert!(config.database.reset_on_startup);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = Args::try_parse_from(["coffeeshop-web", "--log-format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["coffeeshop-web"]);
        let mut config = CoffeeShopConfig::default();
        args.apply(&mut config);
        assert_eq!(config, CoffeeShopConfig::default());
    }
}
