//! The `make:api` pipeline
//!
//! derive names -> controller file -> transformer file -> route entry.
//!
//! Steps are independent and not transactional: a step that fails (for
//! instance because its file already exists) is reported and the remaining
//! steps still run. Files written by earlier steps stay on disk.

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::emitter::{self, ModuleRegistration};
use crate::error::GeneratorResult;
use crate::naming::{ArtifactName, DerivedNames};
use crate::routes::{self, Insertion};
use crate::stub::{defaults, unresolved_placeholders, StubVariables, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Controller,
    Transformer,
    Route,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Controller => write!(f, "controller"),
            ArtifactKind::Transformer => write!(f, "transformer"),
            ArtifactKind::Route => write!(f, "route"),
        }
    }
}

/// Result of one pipeline step
#[derive(Debug)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    /// File written (controller, transformer) or patched (route)
    pub result: GeneratorResult<PathBuf>,
    /// Where the route went, for the route step
    pub insertion: Option<Insertion>,
}

impl ArtifactReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct GenerationReport {
    pub names: DerivedNames,
    pub artifacts: Vec<ArtifactReport>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.artifacts.iter().all(ArtifactReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.artifacts.iter().filter(|a| !a.is_success())
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactReport> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

pub struct ApiGenerator {
    root: PathBuf,
    config: GeneratorConfig,
}

impl ApiGenerator {
    /// Generator writing below the application `root`
    pub fn new(root: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        Self { root: root.into(), config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Absolute path of the routes file
    pub fn routes_file(&self) -> PathBuf {
        self.root.join(&self.config.source_dir).join(&self.config.routes_file)
    }

    /// Run every step for `model`.
    ///
    /// Only an underivable model name is an `Err`; step failures are in the report.
    pub fn generate(&self, model: &str) -> GeneratorResult<GenerationReport> {
        let names = DerivedNames::derive(model, &self.config)?;
        let vars = names.stub_variables();
        log::info!("Generating API for {} at /{}", names.model_full_name, names.endpoint);

        let controller = self.write_artifact(
            &names.controller,
            self.config.controller_stub.as_deref(),
            defaults::CONTROLLER,
            &vars,
        );
        let transformer = self.write_artifact(
            &names.transformer,
            self.config.transformer_stub.as_deref(),
            defaults::TRANSFORMER,
            &vars,
        );
        let route = self.add_route(&vars);

        let artifacts = vec![
            report(ArtifactKind::Controller, controller, None),
            report(ArtifactKind::Transformer, transformer, None),
            match route {
                Ok((path, insertion)) => report(ArtifactKind::Route, Ok(path), Some(insertion)),
                Err(e) => report(ArtifactKind::Route, Err(e), None),
            },
        ];

        Ok(GenerationReport { names, artifacts })
    }

    fn render(
        &self,
        configured: Option<&str>,
        embedded: &str,
        vars: &StubVariables,
    ) -> GeneratorResult<String> {
        let template = Template::resolve(&self.root, configured, embedded)?;
        let rendered = template.render(vars);

        let unresolved = unresolved_placeholders(&rendered);
        if !unresolved.is_empty() {
            let origin = template
                .origin()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in stub".to_string());
            log::warn!("{} leaves unknown placeholders: {}", origin, unresolved.join(", "));
        }
        Ok(rendered)
    }

    fn write_artifact(
        &self,
        artifact: &ArtifactName,
        configured: Option<&str>,
        embedded: &str,
        vars: &StubVariables,
    ) -> GeneratorResult<PathBuf> {
        let path = emitter::destination_for(&self.root, &self.config, &artifact.module_path());
        let contents = self.render(configured, embedded, vars)?;
        emitter::emit(&path, &contents)?;

        if let Some(dir) = path.parent() {
            match emitter::register_module(dir, &artifact.module) {
                Ok(ModuleRegistration::Added(mod_file)) => {
                    log::debug!("{} declared in {}", artifact.module, mod_file.display())
                }
                Ok(_) => {}
                Err(e) => log::warn!("Could not declare module {}: {}", artifact.module, e),
            }
        }
        Ok(path)
    }

    fn add_route(&self, vars: &StubVariables) -> GeneratorResult<(PathBuf, Insertion)> {
        let rendered = self.render(self.config.route_stub.as_deref(), defaults::ROUTE, vars)?;
        let routes_file = self.routes_file();
        let insertion =
            routes::append_route(&routes_file, &rendered, &self.config.route_closing_line)?;
        Ok((routes_file, insertion))
    }
}

fn report(
    kind: ArtifactKind,
    result: GeneratorResult<PathBuf>,
    insertion: Option<Insertion>,
) -> ArtifactReport {
    match &result {
        Ok(path) => log::info!("Created {} {}", kind, path.display()),
        Err(e) if e.is_already_exists() => log::warn!("Skipped {}: {}", kind, e),
        Err(e) => log::error!("Failed to create {}: {}", kind, e),
    }
    ArtifactReport { kind, result, insertion }
}
