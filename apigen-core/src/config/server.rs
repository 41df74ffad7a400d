//! Server configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server listening port
    /// Env: AG_PORT
    /// Default: 8080
    pub port: u16,

    /// Server listening address
    /// Env: AG_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Maximum request body size in bytes
    /// Env: AG_MAX_BODY_SIZE
    /// Default: 2097152 (2MB)
    pub max_body_size: usize,

    /// Route the HTML-form actions (`/res/create`, `/res/{id}/edit`) to 501 responses
    /// Default: false
    pub form_actions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            max_body_size: 2 * 1024 * 1024,
            form_actions: false,
        }
    }
}

impl ServerConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.port = other.port;
        self.host = other.host;
        self.max_body_size = other.max_body_size;
        self.form_actions = other.form_actions;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(port) = env::var("AG_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(host) = env::var("AG_HOST") {
            self.host = host;
        }

        if let Ok(size) = env::var("AG_MAX_BODY_SIZE") {
            if let Ok(s) = size.parse() {
                self.max_body_size = s;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }

        if self.max_body_size == 0 {
            bail!("Invalid max_body_size: must be greater than 0");
        }

        Ok(())
    }

    /// Socket address string (`host:port`)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
