//! Configuration for the mentorship service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the MongoDB connection string
pub const ENV_DATABASE_URL: &str = "MONGODB_URI";
/// Environment variable naming the fallback database
pub const ENV_DATABASE_NAME: &str = "MONGODB_DATABASE";
pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "HOST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// MongoDB connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Database used when the connection string does not name one
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            database_name: default_database_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from an optional TOML file, then overlay the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };
        config.apply_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a TOML file; missing keys take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay values from a variable lookup (the environment in production)
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
            self.database_url = url;
        }
        if let Some(name) = lookup(ENV_DATABASE_NAME).filter(|v| !v.is_empty()) {
            self.database_name = name;
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port)))?;
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Default value functions

fn default_database_url() -> String {
    "mongodb://localhost:27017/mentorship".to_string()
}

fn default_database_name() -> String {
    "mentorship".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}
