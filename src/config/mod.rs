use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens. A random one is generated when
    /// not configured, which invalidates all sessions on restart.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_seed_email")]
    pub seed_email: String,
    #[serde(default = "default_seed_password")]
    pub seed_password: String,
    #[serde(default = "default_seed_fname")]
    pub seed_fname: String,
    #[serde(default = "default_seed_lname")]
    pub seed_lname: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            seed_email: default_seed_email(),
            seed_password: default_seed_password(),
            seed_fname: default_seed_fname(),
            seed_lname: default_seed_lname(),
        }
    }
}

fn default_jwt_secret() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_seed_email() -> String {
    "admin@redrater.local".to_string()
}

fn default_seed_password() -> String {
    "redraider".to_string()
}

fn default_seed_fname() -> String {
    "Red".to_string()
}

fn default_seed_lname() -> String {
    "Raider".to_string()
}

/// Public-facing identity of the deployment. The layout's server-side
/// self-fetch builds its base URL from these, and `production` controls
/// whether session cookies demand transport encryption.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_host")]
    pub host: String,
    #[serde(default = "default_site_protocol")]
    pub protocol: String,
    #[serde(default = "default_production")]
    pub production: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: default_site_host(),
            protocol: default_site_protocol(),
            production: default_production(),
        }
    }
}

fn default_site_host() -> String {
    std::env::var("HOST").unwrap_or_else(|_| "localhost:8080".to_string())
}

fn default_site_protocol() -> String {
    std::env::var("PROTOCOL").unwrap_or_else(|_| "http".to_string())
}

fn default_production() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|v| v == "production")
        .unwrap_or(false)
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            site: SiteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(!config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [site]
            host = "red-rater.example.edu"
            protocol = "https"
            production = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.site.host, "red-rater.example.edu");
        assert!(config.site.production);
        assert_eq!(config.logging.level, "info");
    }
}
