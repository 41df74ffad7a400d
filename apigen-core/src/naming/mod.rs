//! Name and path derivation for `make:api`
//!
//! Turns a raw model identifier such as `Profile/Payer` (or `Profile\Payer`,
//! or `profile::Payer`) into every name the stubs need:
//!
//! | key                   | `Profile/Payer` with defaults                              |
//! |-----------------------|------------------------------------------------------------|
//! | `modelName`           | `Payer`                                                    |
//! | `modelNamespace`      | `crate::models::profile`                                   |
//! | `modelFullName`       | `crate::models::profile::Payer`                            |
//! | `controllerName`      | `ProfilePayerController`                                   |
//! | `controllerModule`    | `profile_payer_controller`                                 |
//! | `controllerNamespace` | `crate::api::controllers`                                  |
//! | `controllerFullName`  | `crate::api::controllers::profile_payer_controller::ProfilePayerController` |
//! | `endpoint`            | `profile_payers`                                           |
//!
//! Case conversion is done with `heck`; pluralization with [`pluralize`].

pub mod pluralize;

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::stub::StubVariables;

/// Rust module path separator used in every generated namespace
pub const NAMESPACE_SEPARATOR: &str = "::";

/// A model identifier split into its path segments.
///
/// Separators `/`, `\` and `::` are interchangeable; leading, trailing and
/// repeated separators are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPath {
    segments: Vec<String>,
}

impl ModelPath {
    /// Parse a raw identifier
    pub fn parse(raw: &str) -> GeneratorResult<Self> {
        let normalized = raw.trim().replace(NAMESPACE_SEPARATOR, "/").replace('\\', "/");

        let segments: Vec<String> = normalized
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(GeneratorError::InvalidName(format!("\"{}\" is empty", raw)));
        }

        if let Some(bad) = segments.iter().find(|s| !is_identifier(s)) {
            return Err(GeneratorError::InvalidName(format!(
                "\"{}\" is not a valid identifier in \"{}\"",
                bad, raw
            )));
        }

        let (parents, last) = segments.split_at(segments.len() - 1);
        let reserved = parents
            .iter()
            .find(|s| is_reserved_module(s))
            .or(last.iter().find(|s| is_reserved_type(s)));
        if let Some(bad) = reserved {
            return Err(GeneratorError::InvalidName(format!(
                "\"{}\" is reserved in Rust, in \"{}\"",
                bad, raw
            )));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment
    pub fn last(&self) -> &str {
        // `parse` guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Everything but the final segment
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Drop a leading prefix matching `base` (compared in snake_case), if present
    fn without_prefix(mut self, base: &[String]) -> Self {
        let matches = !base.is_empty()
            && self.segments.len() > base.len()
            && self.segments.iter().zip(base).all(|(seg, b)| seg.to_snake_case() == *b);
        if matches {
            self.segments.drain(..base.len());
        }
        self
    }
}

/// Strict and reserved keywords of the 2021 edition
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Leading segments become module names
fn is_reserved_module(segment: &str) -> bool {
    let module = segment.to_snake_case();
    module.is_empty() || KEYWORDS.contains(&module.as_str())
}

/// The final segment becomes the model type name
fn is_reserved_type(segment: &str) -> bool {
    let name = segment.to_upper_camel_case();
    name.is_empty() || name == "Self"
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Convert a configured directory (`api/controllers`, `Api\Controllers`) into
/// snake_case module segments
pub fn module_segments(path: &str) -> Vec<String> {
    path.replace(NAMESPACE_SEPARATOR, "/")
        .replace('\\', "/")
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_snake_case())
        .collect()
}

/// Join a root namespace with further segments
fn join_namespace<S: AsRef<str>>(root: &str, segments: &[S]) -> String {
    let mut parts = vec![root.trim_end_matches(NAMESPACE_SEPARATOR).to_string()];
    parts.extend(segments.iter().map(|s| s.as_ref().to_string()));
    parts.retain(|p| !p.is_empty());
    parts.join(NAMESPACE_SEPARATOR)
}

/// Names of one generated artifact (controller or transformer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// Type name, e.g. `ProfilePayerController`
    pub name: String,
    /// File / module name, e.g. `profile_payer_controller`
    pub module: String,
    /// Parent module path, e.g. `crate::api::controllers`
    pub namespace: String,
}

impl ArtifactName {
    fn new(prefix: &str, suffix: &str, app_namespace: &str, configured_path: &str) -> Self {
        let name = format!("{}{}", prefix, suffix);
        let module = name.to_snake_case();
        let namespace = join_namespace(app_namespace, &module_segments(configured_path));
        Self { name, module, namespace }
    }

    /// Module path of the generated file, e.g. `crate::api::controllers::profile_payer_controller`
    pub fn module_path(&self) -> String {
        join_namespace(&self.namespace, &[&self.module])
    }

    /// Fully qualified type path
    pub fn full_name(&self) -> String {
        join_namespace(&self.module_path(), &[&self.name])
    }
}

/// Every name derived from one model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub model_name: String,
    pub model_namespace: String,
    pub model_full_name: String,
    pub model_full_name_without_root: String,
    pub controller: ArtifactName,
    pub transformer: ArtifactName,
    pub endpoint: String,
}

impl DerivedNames {
    /// Derive all names for `raw` under `config`
    pub fn derive(raw: &str, config: &GeneratorConfig) -> GeneratorResult<Self> {
        let base = module_segments(&config.models_base_dir);
        let path = ModelPath::parse(raw)?.without_prefix(&base);

        let model_name = path.last().to_upper_camel_case();
        let parent_modules: Vec<String> =
            path.parents().iter().map(|s| s.to_snake_case()).collect();

        let mut model_full_name_without_root = parent_modules.clone();
        model_full_name_without_root.push(model_name.clone());

        let mut namespace_segments = base;
        namespace_segments.extend(parent_modules);
        let model_namespace = join_namespace(&config.app_namespace, &namespace_segments);
        let model_full_name = join_namespace(&model_namespace, &[&model_name]);

        let prefix: String = path.segments().iter().map(|s| s.to_upper_camel_case()).collect();

        let controller =
            ArtifactName::new(&prefix, "Controller", &config.app_namespace, &config.controllers_path);
        let transformer = ArtifactName::new(
            &prefix,
            "Transformer",
            &config.app_namespace,
            &config.transformers_path,
        );

        let endpoint = pluralize::pluralize(&prefix.to_snake_case());

        Ok(Self {
            model_name,
            model_namespace,
            model_full_name,
            model_full_name_without_root: model_full_name_without_root.join(NAMESPACE_SEPARATOR),
            controller,
            transformer,
            endpoint,
        })
    }

    /// Build the ordered placeholder mapping consumed by the stubs
    pub fn stub_variables(&self) -> StubVariables {
        let mut vars = StubVariables::new();
        vars.set("modelFullNameWithoutRoot", &self.model_full_name_without_root)
            .set("modelFullName", &self.model_full_name)
            .set("modelName", &self.model_name)
            .set("modelNamespace", &self.model_namespace)
            .set("controllerName", &self.controller.name)
            .set("controllerModule", &self.controller.module)
            .set("controllerNamespace", &self.controller.namespace)
            .set("controllerFullName", self.controller.full_name())
            .set("transformerName", &self.transformer.name)
            .set("transformerModule", &self.transformer.module)
            .set("transformerNamespace", &self.transformer.namespace)
            .set("transformerFullName", self.transformer.full_name())
            .set("routeName", &self.endpoint)
            .set("endpoint", &self.endpoint);
        vars
    }
}
