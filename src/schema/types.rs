//! Schema declarations and their compiled form
//!
//! A declaration is plain data keyed by dotted path strings. Compilation
//! turns it into an ordered list of tokenized path patterns paired with
//! rules whose regexes are already compiled.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{FieldPath, PathPattern, ValueKind};

/// Declared field type.
///
/// `Other` holds a type name that is neither a value kind nor a
/// registered pattern; such a rule never matches any classified value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Other(String),
}

impl FieldKind {
    /// Parses a declared type name.
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => FieldKind::String,
            "number" => FieldKind::Number,
            "boolean" => FieldKind::Boolean,
            "array" => FieldKind::Array,
            "object" => FieldKind::Object,
            other => FieldKind::Other(other.to_string()),
        }
    }

    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Other(name) => name,
        }
    }

    /// Whether a classified value satisfies this declared type.
    pub fn matches(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (FieldKind::String, ValueKind::String)
                | (FieldKind::Number, ValueKind::Number)
                | (FieldKind::Boolean, ValueKind::Boolean)
                | (FieldKind::Array, ValueKind::Array)
                | (FieldKind::Object, ValueKind::Object)
        )
    }
}

/// One field rule as declared by the caller.
///
/// All members are optional; an empty rule merely marks the path as
/// allowed. `type` may name a value kind or a registered pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDecl {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub mandatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

fn is_false(flag: &bool) -> bool {
    !flag
}

impl FieldDecl {
    /// Rule with only a type constraint.
    pub fn typed(name: impl Into<String>) -> Self {
        Self {
            field_type: Some(name.into()),
            ..Self::default()
        }
    }

    /// Rule that must be present.
    pub fn required() -> Self {
        Self {
            mandatory: true,
            ..Self::default()
        }
    }

    /// Typed rule that must be present.
    pub fn required_typed(name: impl Into<String>) -> Self {
        Self {
            field_type: Some(name.into()),
            mandatory: true,
            ..Self::default()
        }
    }

    /// Rule with a default value.
    pub fn with_default(value: Value) -> Self {
        Self {
            default: Some(value),
            ..Self::default()
        }
    }
}

/// A schema declaration: dotted path keys mapped to field rules.
pub type SchemaDecl = BTreeMap<String, FieldDecl>;

/// One compiled rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub kind: Option<FieldKind>,
    pub mandatory: bool,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
}

/// A compiled schema: ordered `(path pattern, rule)` pairs.
#[derive(Debug, Clone, Default)]
pub struct CompiledSchema {
    rules: Vec<(PathPattern, FieldRule)>,
}

impl CompiledSchema {
    pub(crate) fn push(&mut self, pattern: PathPattern, rule: FieldRule) {
        self.rules.push((pattern, rule));
    }

    /// Iterates the compiled rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &(PathPattern, FieldRule)> {
        self.rules.iter()
    }

    /// Finds the rule whose pattern matches the concrete path.
    pub fn rule_for(&self, path: &FieldPath) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, rule)| rule)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
