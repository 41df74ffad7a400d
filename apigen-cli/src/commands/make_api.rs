use std::path::Path;

use anyhow::{bail, Context, Result};
use apigen_core::config::ApigenConfig;
use apigen_core::generator::{ApiGenerator, GenerationReport};

use super::display_path;

/// Generate controller, transformer and route for `name` below `root`.
///
/// Fails when any step fails; steps that succeeded keep their output.
pub fn run(name: &str, root: &Path, config: &ApigenConfig) -> Result<GenerationReport> {
    let generator = ApiGenerator::new(root, config.generator.clone());
    let report = generator
        .generate(name)
        .with_context(|| format!("cannot generate an API for \"{}\"", name))?;

    for artifact in &report.artifacts {
        match &artifact.result {
            Ok(path) => match artifact.insertion {
                Some(insertion) => println!(
                    "Added   {} to {} ({})",
                    artifact.kind,
                    display_path(root, path),
                    insertion
                ),
                None => println!("Created {} {}", artifact.kind, display_path(root, path)),
            },
            Err(e) => println!("Failed  {}: {}", artifact.kind, e),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{} of {} steps failed for \"{}\"", failed, report.artifacts.len(), name);
    }

    println!();
    println!("  {} -> /{}", report.names.controller.name, report.names.endpoint);
    Ok(report)
}
