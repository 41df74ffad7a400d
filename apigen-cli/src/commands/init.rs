use std::path::Path;

use anyhow::{Context, Result};
use apigen_core::config::ApigenConfig;
use apigen_core::emitter::{self, ModuleRegistration};

use super::display_path;
use crate::templates;

/// What `init` did
#[derive(Debug, Default)]
pub struct InitSummary {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub declared: Vec<String>,
}

/// Write the config file, the editable stubs and the routes skeleton below
/// `root`. Existing files are never overwritten.
pub fn run(root: &Path, config: &ApigenConfig) -> Result<InitSummary> {
    let mut summary = InitSummary::default();

    for file in templates::project_files(config)? {
        let dest = root.join(&file.path);
        match emitter::emit(&dest, &file.content) {
            Ok(()) => {
                println!("Created {}", display_path(root, &dest));
                summary.created.push(file.path.display().to_string());
            }
            Err(e) if e.is_already_exists() => {
                println!("Exists  {}", display_path(root, &dest));
                summary.skipped.push(file.path.display().to_string());
            }
            Err(e) => return Err(e).context("init aborted"),
        }
    }

    for declaration in templates::module_declarations(config) {
        let dir = root.join(&declaration.dir);
        let registration = emitter::register_module(&dir, &declaration.name)
            .with_context(|| format!("failed to declare module {}", declaration.name))?;
        if let ModuleRegistration::Added(mod_file) = registration {
            println!("Declared {} in {}", declaration.name, display_path(root, &mod_file));
            summary.declared.push(declaration.name.clone());
        }
    }

    log::info!(
        "init: {} created, {} already present",
        summary.created.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
