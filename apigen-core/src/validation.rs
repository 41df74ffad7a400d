//! Rule-based validation of JSON payloads
//!
//! Rule sets map field names to rules. Rules can be built as values
//! (`Rule::Max(255.0)`) or parsed from pipe-delimited strings
//! (`"required|string|max:255"`).
//!
//! ```
//! use apigen_core::validation::{validate, Rules};
//! use serde_json::json;
//!
//! let rules = Rules::new().parse("name", "required|string|max:10").unwrap();
//! let data = json!({ "name": "Ada" });
//! assert!(validate(data.as_object().unwrap(), &rules).passes());
//! ```

use garde::Validate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A single validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Present and not null, not an empty string, not an empty array
    Required,
    /// `null` is accepted and skips the remaining rules
    Nullable,
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Email,
    /// Minimum length (strings, arrays) or value (numbers)
    Min(f64),
    /// Maximum length (strings, arrays) or value (numbers)
    Max(f64),
    /// Value must be one of the listed options
    In(Vec<String>),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("unknown validation rule: {0}")]
    UnknownRule(String),
    #[error("rule {rule} expects a numeric argument, got \"{arg}\"")]
    InvalidArgument { rule: String, arg: String },
    #[error("rule {0} requires an argument")]
    MissingArgument(String),
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        let numeric = |rule: &str| -> Result<f64, RuleParseError> {
            let arg = arg.ok_or_else(|| RuleParseError::MissingArgument(rule.to_string()))?;
            arg.parse::<f64>().map_err(|_| RuleParseError::InvalidArgument {
                rule: rule.to_string(),
                arg: arg.to_string(),
            })
        };

        match name {
            "required" => Ok(Rule::Required),
            "nullable" => Ok(Rule::Nullable),
            "string" => Ok(Rule::String),
            "integer" => Ok(Rule::Integer),
            "numeric" => Ok(Rule::Numeric),
            "boolean" => Ok(Rule::Boolean),
            "array" => Ok(Rule::Array),
            "email" => Ok(Rule::Email),
            "min" => Ok(Rule::Min(numeric("min")?)),
            "max" => Ok(Rule::Max(numeric("max")?)),
            "in" => {
                let arg = arg.ok_or_else(|| RuleParseError::MissingArgument("in".to_string()))?;
                Ok(Rule::In(arg.split(',').map(|o| o.trim().to_string()).collect()))
            }
            other => Err(RuleParseError::UnknownRule(other.to_string())),
        }
    }
}

impl Rule {
    /// Parse `"required|string|max:255"`
    pub fn parse_list(list: &str) -> Result<Vec<Rule>, RuleParseError> {
        list.split('|').filter(|r| !r.trim().is_empty()).map(str::parse).collect()
    }
}

/// Ordered field -> rules mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    fields: Vec<(String, Vec<Rule>)>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach rules to a field, appending to any rules it already has
    pub fn with(mut self, field: &str, rules: impl IntoIterator<Item = Rule>) -> Self {
        let rules: Vec<Rule> = rules.into_iter().collect();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((field.to_string(), rules)),
        }
        self
    }

    /// Attach rules given as a pipe-delimited string
    pub fn parse(self, field: &str, list: &str) -> Result<Self, RuleParseError> {
        Ok(self.with(field, Rule::parse_list(list)?))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }
}

/// Result of validating one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationOutcome {
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// Messages per failing field
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    fn add(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_default().push(message);
    }
}

/// Validate `data` against `rules`
pub fn validate(data: &Map<String, Value>, rules: &Rules) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (field, field_rules) in rules.iter() {
        let value = data.get(field);
        let required = field_rules.contains(&Rule::Required);
        let nullable = field_rules.contains(&Rule::Nullable);

        if required && value.map_or(true, is_blank) {
            outcome.add(field, format!("The {} field is required.", field));
            continue;
        }

        let Some(value) = value else { continue };
        if value.is_null() && nullable {
            continue;
        }

        for rule in field_rules {
            if let Some(message) = check(field, rule, value) {
                outcome.add(field, message);
            }
        }
    }

    outcome
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Size used by min/max: character count, element count, or numeric value
fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// A single address run through garde's email rule
#[derive(Validate)]
struct EmailAddress(#[garde(email)] String);

fn is_email(s: &str) -> bool {
    EmailAddress(s.to_string()).validate().is_ok()
}

fn check(field: &str, rule: &Rule, value: &Value) -> Option<String> {
    let failed = match rule {
        Rule::Required | Rule::Nullable => false,
        Rule::String => !value.is_string(),
        Rule::Integer => !(value.is_i64() || value.is_u64()),
        Rule::Numeric => !value.is_number(),
        Rule::Boolean => !value.is_boolean(),
        Rule::Array => !(value.is_array() || value.is_object()),
        Rule::Email => !value.as_str().is_some_and(is_email),
        Rule::Min(min) => size_of(value).map_or(true, |size| size < *min),
        Rule::Max(max) => size_of(value).map_or(true, |size| size > *max),
        Rule::In(options) => {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            !options.contains(&rendered)
        }
    };

    if !failed {
        return None;
    }

    Some(match rule {
        Rule::String => format!("The {} must be a string.", field),
        Rule::Integer => format!("The {} must be an integer.", field),
        Rule::Numeric => format!("The {} must be a number.", field),
        Rule::Boolean => format!("The {} field must be true or false.", field),
        Rule::Array => format!("The {} must be an array.", field),
        Rule::Email => format!("The {} must be a valid email address.", field),
        Rule::Min(min) => format!("The {} must be at least {}.", field, min),
        Rule::Max(max) => format!("The {} may not be greater than {}.", field, max),
        Rule::In(_) => format!("The selected {} is invalid.", field),
        Rule::Required | Rule::Nullable => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn parse_rule_list() {
        let rules = Rule::parse_list("required|string|max:255|in:a,b").unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::Required,
                Rule::String,
                Rule::Max(255.0),
                Rule::In(vec!["a".to_string(), "b".to_string()])
            ]
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Rule::parse_list("required|unique"),
            Err(RuleParseError::UnknownRule("unique".to_string()))
        );
        assert!(matches!("max:abc".parse::<Rule>(), Err(RuleParseError::InvalidArgument { .. })));
        assert_eq!("min".parse::<Rule>(), Err(RuleParseError::MissingArgument("min".to_string())));
    }

    #[test]
    fn required_field_missing() {
        let rules = Rules::new().with("name", [Rule::Required]);
        let outcome = validate(&data(json!({})), &rules);
        assert!(outcome.fails());
        assert_eq!(outcome.errors()["name"], vec!["The name field is required.".to_string()]);

        assert!(validate(&data(json!({"name": ""})), &rules).fails());
        assert!(validate(&data(json!({"name": null})), &rules).fails());
        assert!(validate(&data(json!({"name": "x"})), &rules).passes());
    }

    #[test]
    fn optional_absent_field_passes() {
        let rules = Rules::new().parse("age", "integer|min:18").unwrap();
        assert!(validate(&data(json!({})), &rules).passes());
        assert!(validate(&data(json!({"age": 21})), &rules).passes());
        assert!(validate(&data(json!({"age": 12})), &rules).fails());
        assert!(validate(&data(json!({"age": "21"})), &rules).fails());
    }

    #[test]
    fn nullable_accepts_null() {
        let strict = Rules::new().with("nick", [Rule::String]);
        let lenient = Rules::new().with("nick", [Rule::Nullable, Rule::String]);
        assert!(validate(&data(json!({"nick": null})), &strict).fails());
        assert!(validate(&data(json!({"nick": null})), &lenient).passes());
    }

    #[test]
    fn string_length_and_email() {
        let rules = Rules::new().parse("email", "required|email|max:20").unwrap();
        assert!(validate(&data(json!({"email": "ada@example.com"})), &rules).passes());
        assert!(validate(&data(json!({"email": "not-an-email"})), &rules).fails());
        assert!(validate(&data(json!({"email": "someone.long@example.com"})), &rules).fails());
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        let rules = Rules::new().with("email", [Rule::Email]);
        for bad in ["ada@@example.com", "ada lovelace@example.com", "@example.com", "ada@"] {
            assert!(validate(&data(json!({ "email": bad })), &rules).fails(), "{} passed", bad);
        }
        assert!(validate(&data(json!({"email": "ada.lovelace+api@example.co.uk"})), &rules).passes());
        assert!(validate(&data(json!({"email": 42})), &rules).fails());
    }

    #[test]
    fn in_rule_compares_rendered_values() {
        let rules = Rules::new().parse("level", "in:1,2,3").unwrap();
        assert!(validate(&data(json!({"level": 2})), &rules).passes());
        assert!(validate(&data(json!({"level": "3"})), &rules).passes());
        assert!(validate(&data(json!({"level": 4})), &rules).fails());
    }

    #[test]
    fn with_appends_to_existing_field() {
        let rules = Rules::new().with("a", [Rule::Required]).with("a", [Rule::String]);
        let collected: Vec<(&str, &[Rule])> = rules.iter().collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].1, &[Rule::Required, Rule::String][..]);
    }
}
