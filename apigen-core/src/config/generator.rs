//! Generator configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Paths and namespaces used by `make:api`.
///
/// Every path is relative to the application root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory (under `source_dir`) receiving generated controllers
    /// Env: AG_CONTROLLERS_PATH
    /// Default: "api/controllers"
    pub controllers_path: String,

    /// Directory (under `source_dir`) receiving generated transformers
    /// Env: AG_TRANSFORMERS_PATH
    /// Default: "api/transformers"
    pub transformers_path: String,

    /// Routes file (under `source_dir`) patched with new registrations
    /// Env: AG_ROUTES_FILE
    /// Default: "api/routes.rs"
    pub routes_file: String,

    /// Module holding the models, prepended to every model path
    /// Env: AG_MODELS_BASE_DIR
    /// Default: "models"
    pub models_base_dir: String,

    /// Controller stub; the embedded default is used when unset
    pub controller_stub: Option<String>,

    /// Transformer stub; the embedded default is used when unset
    pub transformer_stub: Option<String>,

    /// Route registration stub; the embedded default is used when unset
    pub route_stub: Option<String>,

    /// Root of the application's module tree
    /// Default: "crate"
    pub app_namespace: String,

    /// Source directory the module tree maps onto
    /// Env: AG_SOURCE_DIR
    /// Default: "src"
    pub source_dir: String,

    /// Closing line recognised by the legacy route insertion heuristic
    /// Default: "});"
    pub route_closing_line: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            controllers_path: "api/controllers".to_string(),
            transformers_path: "api/transformers".to_string(),
            routes_file: "api/routes.rs".to_string(),
            models_base_dir: "models".to_string(),
            controller_stub: None,
            transformer_stub: None,
            route_stub: None,
            app_namespace: "crate".to_string(),
            source_dir: "src".to_string(),
            route_closing_line: "});".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.controllers_path = other.controllers_path;
        self.transformers_path = other.transformers_path;
        self.routes_file = other.routes_file;
        self.models_base_dir = other.models_base_dir;
        self.controller_stub = other.controller_stub.or(self.controller_stub.take());
        self.transformer_stub = other.transformer_stub.or(self.transformer_stub.take());
        self.route_stub = other.route_stub.or(self.route_stub.take());
        self.app_namespace = other.app_namespace;
        self.source_dir = other.source_dir;
        self.route_closing_line = other.route_closing_line;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(path) = env::var("AG_CONTROLLERS_PATH") {
            self.controllers_path = path;
        }

        if let Ok(path) = env::var("AG_TRANSFORMERS_PATH") {
            self.transformers_path = path;
        }

        if let Ok(path) = env::var("AG_ROUTES_FILE") {
            self.routes_file = path;
        }

        if let Ok(dir) = env::var("AG_MODELS_BASE_DIR") {
            self.models_base_dir = dir;
        }

        if let Ok(dir) = env::var("AG_SOURCE_DIR") {
            self.source_dir = dir;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.controllers_path.trim_matches(['/', '\\']).is_empty() {
            bail!("Invalid controllers_path: cannot be empty");
        }

        if self.transformers_path.trim_matches(['/', '\\']).is_empty() {
            bail!("Invalid transformers_path: cannot be empty");
        }

        if self.routes_file.trim().is_empty() {
            bail!("Invalid routes_file: cannot be empty");
        }

        if self.app_namespace.trim().is_empty() {
            bail!("Invalid app_namespace: cannot be empty");
        }

        if self.route_closing_line.trim().is_empty() {
            bail!("Invalid route_closing_line: cannot be blank");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_stub_when_other_has_none() {
        let mut base = GeneratorConfig {
            controller_stub: Some("stubs/controller.stub".to_string()),
            ..GeneratorConfig::default()
        };
        base.merge(GeneratorConfig::default());
        assert_eq!(base.controller_stub.as_deref(), Some("stubs/controller.stub"));
    }

    #[test]
    fn empty_controllers_path_is_rejected() {
        let config =
            GeneratorConfig { controllers_path: "/".to_string(), ..GeneratorConfig::default() };
        assert!(config.validate().is_err());
    }
}
