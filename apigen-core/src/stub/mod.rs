//! Stub (template) loading and `{{placeholder}}` substitution.
//!
//! Substitution is literal: for each variable, in insertion order, every
//! `{{key}}` occurrence is replaced by its value. There is no escaping and no
//! recursive expansion, so a value that itself contains `{{otherKey}}` may be
//! expanded by a later variable. Placeholders with no matching variable are
//! left in place.

pub mod defaults;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, GeneratorResult};

/// Insertion-ordered placeholder mapping.
///
/// Setting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubVariables {
    entries: Vec<(String, String)>,
}

impl StubVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a variable
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable stub text with embedded `{{token}}` markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    origin: Option<PathBuf>,
}

impl Template {
    /// Wrap in-memory template text
    pub fn from_text(source: impl Into<String>) -> Self {
        Self { source: source.into(), origin: None }
    }

    /// Read a template from disk; a missing file yields [`GeneratorError::NotFound`]
    pub fn load(path: &Path) -> GeneratorResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
        log::debug!("Loaded stub {} ({} bytes)", path.display(), source.len());
        Ok(Self { source, origin: Some(path.to_path_buf()) })
    }

    /// Load the configured stub relative to `root`, or fall back to `embedded`
    pub fn resolve(root: &Path, configured: Option<&str>, embedded: &str) -> GeneratorResult<Self> {
        match configured {
            Some(relative) => Self::load(&root.join(relative)),
            None => Ok(Self::from_text(embedded)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path the template was read from, `None` for embedded stubs
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Substitute every variable, in insertion order
    pub fn render(&self, vars: &StubVariables) -> String {
        let mut output = self.source.clone();
        for (key, value) in vars.iter() {
            output = output.replace(&placeholder(key), value);
        }
        output
    }
}

/// `{{key}}`
pub fn placeholder(key: &str) -> String {
    format!("{{{{{}}}}}", key)
}

/// Placeholder names still present in `text`, in order of first appearance
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let name = after[..end].trim();
        if !name.is_empty()
            && name.chars().all(|c| c.is_alphanumeric() || c == '_')
            && !found.iter().any(|f| f == name)
        {
            found.push(name.to_string());
        }
        rest = &after[end + 2..];
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> StubVariables {
        let mut v = StubVariables::new();
        for (k, val) in pairs {
            v.set(k, *val);
        }
        v
    }

    #[test]
    fn replaces_every_occurrence() {
        let template = Template::from_text("{{name}} and {{name}} use {{endpoint}}");
        let out = template.render(&vars(&[("name", "Payer"), ("endpoint", "payers")]));
        assert_eq!(out, "Payer and Payer use payers");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let template = Template::from_text("{{modelName}} {{unknown}}");
        let out = template.render(&vars(&[("modelName", "Payer")]));
        assert_eq!(out, "Payer {{unknown}}");
        assert_eq!(unresolved_placeholders(&out), vec!["unknown".to_string()]);
    }

    #[test]
    fn values_are_substituted_literally_in_order() {
        // an earlier value containing a later placeholder gets expanded by the later pass
        let template = Template::from_text("{{a}}");
        let out = template.render(&vars(&[("a", "{{b}}"), ("b", "x")]));
        assert_eq!(out, "x");

        // a later value containing an earlier placeholder is not
        let out = template.render(&vars(&[("b", "x"), ("a", "{{b}}")]));
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut v = vars(&[("a", "1"), ("b", "2")]);
        v.set("a", "3");
        let pairs: Vec<(&str, &str)> = v.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn missing_stub_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Template::load(&tmp.path().join("missing.stub")).unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
    }

    #[test]
    fn resolve_prefers_configured_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("custom.stub"), "custom {{modelName}}").unwrap();

        let custom = Template::resolve(tmp.path(), Some("custom.stub"), "embedded").unwrap();
        assert_eq!(custom.source(), "custom {{modelName}}");
        assert!(custom.origin().is_some());

        let embedded = Template::resolve(tmp.path(), None, "embedded").unwrap();
        assert_eq!(embedded.source(), "embedded");
        assert!(embedded.origin().is_none());
    }
}
