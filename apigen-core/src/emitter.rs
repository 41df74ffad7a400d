//! Writing generated files
//!
//! Generated files never overwrite existing ones. After a file is written its
//! module is declared in the sibling `mod.rs`, when there is one.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::naming::NAMESPACE_SEPARATOR;

/// Outcome of declaring a module in its parent `mod.rs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRegistration {
    Added(PathBuf),
    AlreadyDeclared,
    NoModFile,
}

/// File that holds `module_path`.
///
/// `crate::api::controllers::payer_controller` maps to
/// `<root>/src/api/controllers/payer_controller.rs`.
pub fn destination_for(root: &Path, config: &GeneratorConfig, module_path: &str) -> PathBuf {
    let app_prefix = format!("{}{}", config.app_namespace, NAMESPACE_SEPARATOR);
    let relative = module_path.strip_prefix(&app_prefix).unwrap_or(module_path);

    let mut path = root.join(&config.source_dir);
    for segment in relative.split(NAMESPACE_SEPARATOR).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.set_extension("rs");
    path
}

/// Create `path` with `contents`, creating parent directories as needed.
///
/// An existing file yields [`GeneratorError::AlreadyExists`] and is left untouched.
pub fn emit(path: &Path, contents: &str) -> GeneratorResult<()> {
    if path.exists() {
        return Err(GeneratorError::AlreadyExists { path: path.to_path_buf() });
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
    }

    let mut file = OpenOptions::new().write(true).create_new(true).open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            GeneratorError::AlreadyExists { path: path.to_path_buf() }
        } else {
            GeneratorError::io(path, e)
        }
    })?;
    file.write_all(contents.as_bytes()).map_err(|e| GeneratorError::io(path, e))?;

    log::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Append `pub mod <module>;` to `<dir>/mod.rs` unless it is missing or
/// already declares the module
pub fn register_module(dir: &Path, module: &str) -> GeneratorResult<ModuleRegistration> {
    let mod_file = dir.join("mod.rs");
    let existing = match fs::read_to_string(&mod_file) {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No mod.rs in {}, skipping module declaration", dir.display());
            return Ok(ModuleRegistration::NoModFile);
        }
        Err(e) => return Err(GeneratorError::io(&mod_file, e)),
    };

    if declares_module(&existing, module) {
        return Ok(ModuleRegistration::AlreadyDeclared);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&format!("pub mod {};\n", module));
    fs::write(&mod_file, updated).map_err(|e| GeneratorError::io(&mod_file, e))?;

    log::info!("Declared module {} in {}", module, mod_file.display());
    Ok(ModuleRegistration::Added(mod_file))
}

/// `mod x;` with any visibility
fn declares_module(source: &str, module: &str) -> bool {
    let declaration = format!("mod {};", module);
    source.lines().map(str::trim).any(|line| {
        line == declaration
            || (line.starts_with("pub") && line.ends_with(&format!(" {}", declaration)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_strips_app_namespace() {
        let config = GeneratorConfig::default();
        let path = destination_for(
            Path::new("/app"),
            &config,
            "crate::api::controllers::profile_payer_controller",
        );
        assert_eq!(path, PathBuf::from("/app/src/api/controllers/profile_payer_controller.rs"));
    }

    #[test]
    fn destination_with_custom_namespace_and_source_dir() {
        let config = GeneratorConfig {
            app_namespace: "my_app".to_string(),
            source_dir: "lib".to_string(),
            ..GeneratorConfig::default()
        };
        let path = destination_for(Path::new("/app"), &config, "my_app::http::payer_controller");
        assert_eq!(path, PathBuf::from("/app/lib/http/payer_controller.rs"));
    }

    #[test]
    fn emit_creates_parents_and_refuses_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("src/api/controllers/payer_controller.rs");

        emit(&path, "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        let err = emit(&path, "second").unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn register_module_appends_once() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("mod.rs"), "pub mod user_controller;").unwrap();

        let first = register_module(tmp.path(), "payer_controller").unwrap();
        assert_eq!(first, ModuleRegistration::Added(tmp.path().join("mod.rs")));

        let second = register_module(tmp.path(), "payer_controller").unwrap();
        assert_eq!(second, ModuleRegistration::AlreadyDeclared);

        assert_eq!(
            fs::read_to_string(tmp.path().join("mod.rs")).unwrap(),
            "pub mod user_controller;\npub mod payer_controller;\n"
        );
    }

    #[test]
    fn register_module_without_mod_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(register_module(tmp.path(), "x").unwrap(), ModuleRegistration::NoModFile);
        assert!(!tmp.path().join("mod.rs").exists());
    }

    #[test]
    fn declarations_with_any_visibility_count() {
        assert!(declares_module("mod a;", "a"));
        assert!(declares_module("  pub(crate) mod a;", "a"));
        assert!(!declares_module("pub mod ab;", "a"));
    }
}
