//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The binary applies command line flags last.

use crate::error::{CoffeeShopError, CoffeeShopResult, ErrorContext};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoffeeShopConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite:database.db` or `sqlite::memory:`
    pub url: String,
    /// Maximum pooled connections for file-backed databases
    pub max_connections: u32,
    /// Drop every drink and reseed the sample menu on startup
    pub reset_on_startup: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:database.db".to_string(),
            max_connections: 5,
            reset_on_startup: false,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Bearer token verification settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Where the issuer publishes its signing keys
    pub jwks_url: String,
}

impl AuthConfig {
    /// Settings for an Auth0 style tenant domain
    pub fn for_domain(domain: &str, audience: &str) -> Self {
        let domain = domain.trim_end_matches('/');
        Self {
            issuer: format!("https://{}/", domain),
            audience: audience.to_string(),
            jwks_url: format!("https://{}/.well-known/jwks.json", domain),
        }
    }
}

impl CoffeeShopConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoffeeShopResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoffeeShopError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        toml::from_str(&content).map_err(|e| CoffeeShopError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CoffeeShopResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CoffeeShopError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override values from the process environment
    pub fn apply_env(&mut self) -> CoffeeShopResult<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override values from an arbitrary variable source
    pub fn apply_vars<F>(&mut self, var: F) -> CoffeeShopResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("COFFEESHOP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("COFFEESHOP_PORT") {
            self.server.port = port.parse().map_err(|_| CoffeeShopError::Config {
                message: format!("COFFEESHOP_PORT is not a valid port: {}", port),
                source: None,
                context: ErrorContext::new("config").with_operation("apply_env"),
            })?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }

        // The tenant domain sets issuer and key set together; explicit
        // overrides below still win.
        if let Some(domain) = var("AUTH0_DOMAIN") {
            let derived = AuthConfig::for_domain(&domain, &self.auth.audience);
            self.auth.issuer = derived.issuer;
            self.auth.jwks_url = derived.jwks_url;
        }
        if let Some(audience) = var("API_AUDIENCE") {
            self.auth.audience = audience;
        }
        if let Some(issuer) = var("AUTH_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Some(jwks_url) = var("AUTH_JWKS_URL") {
            self.auth.jwks_url = jwks_url;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CoffeeShopResult<()> {
        let missing = [
            ("auth.issuer", &self.auth.issuer),
            ("auth.audience", &self.auth.audience),
            ("auth.jwks_url", &self.auth.jwks_url),
            ("database.url", &self.database.url),
        ];

        for (field, value) in missing {
            if value.trim().is_empty() {
                return Err(CoffeeShopError::Config {
                    message: format!("{} must be set", field),
                    source: None,
                    context: ErrorContext::new("config")
                        .with_operation("validate")
                        .with_metadata("field", field)
                        .with_suggestion("Set AUTH0_DOMAIN and API_AUDIENCE in the environment"),
                });
            }
        }

        if self.database.max_connections == 0 {
            return Err(crate::config_error!(
                "database.max_connections must be greater than 0",
                "config"
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
