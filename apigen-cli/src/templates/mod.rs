//! Files written by `apigen init`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use apigen_core::config::{ApigenConfig, CONFIG_FILE_NAME};
use apigen_core::naming::module_segments;
use apigen_core::stub::defaults;

/// Directory the editable stubs are written to
pub const STUBS_DIR: &str = "stubs";

const CONTROLLERS_MOD: &str = "//! API controllers, one module per resource.\n";
const TRANSFORMERS_MOD: &str = "//! JSON:API transformers, one module per resource.\n";
const PARENT_MOD: &str = "//! API layer: controllers, transformers and route registrations.\n";

/// A file to write into the application, relative to its root.
pub struct TemplateFile {
    pub path: PathBuf,
    pub content: String,
}

/// A `pub mod <name>;` declaration expected in `<dir>/mod.rs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub dir: PathBuf,
    pub name: String,
}

/// `config` pointing the generator at the stubs written by init
pub fn init_config(config: &ApigenConfig) -> ApigenConfig {
    let mut config = config.clone();
    let stub = |file: &str| Some(format!("{}/{}", STUBS_DIR, file));
    config.generator.controller_stub = stub(defaults::CONTROLLER_FILE);
    config.generator.transformer_stub = stub(defaults::TRANSFORMER_FILE);
    config.generator.route_stub = stub(defaults::ROUTE_FILE);
    config
}

/// Every file `init` writes for `config`
pub fn project_files(config: &ApigenConfig) -> Result<Vec<TemplateFile>> {
    let generator = &config.generator;
    let source = Path::new(&generator.source_dir);

    let mut files = vec![TemplateFile {
        path: PathBuf::from(CONFIG_FILE_NAME),
        content: init_config(config).to_toml_string()?,
    }];

    for (name, content) in defaults::all() {
        files.push(TemplateFile {
            path: Path::new(STUBS_DIR).join(name),
            content: content.to_string(),
        });
    }

    files.push(TemplateFile {
        path: source.join(&generator.routes_file),
        content: defaults::ROUTES_FILE.to_string(),
    });
    files.push(TemplateFile {
        path: module_dir(source, &generator.controllers_path).join("mod.rs"),
        content: CONTROLLERS_MOD.to_string(),
    });
    files.push(TemplateFile {
        path: module_dir(source, &generator.transformers_path).join("mod.rs"),
        content: TRANSFORMERS_MOD.to_string(),
    });

    let mut parents: Vec<PathBuf> = Vec::new();
    for declaration in module_declarations(config) {
        if !parents.contains(&declaration.dir) {
            parents.push(declaration.dir);
        }
    }
    for parent in parents {
        files.push(TemplateFile { path: parent.join("mod.rs"), content: PARENT_MOD.to_string() });
    }

    Ok(files)
}

/// Module declarations linking controllers, transformers and routes to their
/// parent module, relative to the application root.
///
/// Modules that sit directly in the source directory are left to `main.rs`
/// or `lib.rs`.
pub fn module_declarations(config: &ApigenConfig) -> Vec<ModuleDeclaration> {
    let generator = &config.generator;
    let source = Path::new(&generator.source_dir);
    let routes_module = generator.routes_file.trim_end_matches(".rs").to_string();

    [&generator.controllers_path, &generator.transformers_path, &routes_module]
        .into_iter()
        .filter_map(|path| {
            let mut segments = module_segments(path);
            let name = segments.pop()?;
            if segments.is_empty() {
                return None;
            }
            Some(ModuleDeclaration { dir: module_dir(source, &segments.join("/")), name })
        })
        .collect()
}

fn module_dir(source: &Path, module_path: &str) -> PathBuf {
    let mut dir = source.to_path_buf();
    for segment in module_segments(module_path) {
        dir.push(segment);
    }
    dir
}
