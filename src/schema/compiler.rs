//! Schema compilation
//!
//! Compilation resolves named patterns and compiles every regular
//! expression eagerly, so the compiled schema is immutable during
//! validation and a bad pattern source is reported here instead of on
//! first use.

use regex::Regex;
use tracing::{debug, trace};

use super::errors::{SchemaError, SchemaResult};
use super::patterns::PatternRegistry;
use super::types::{CompiledSchema, FieldKind, FieldRule, SchemaDecl};
use crate::path::PathPattern;

/// Compiles a schema declaration against a pattern registry.
///
/// A `type` naming a registry entry becomes a string rule carrying the
/// registered expression. Any other unknown type name is kept as
/// declared and never matches a value; the declaration itself is not
/// validated further.
pub fn compile(decl: &SchemaDecl, patterns: &PatternRegistry) -> SchemaResult<CompiledSchema> {
    let mut schema = CompiledSchema::default();

    for (path, field) in decl {
        let mut kind = field.field_type.as_deref().map(FieldKind::parse);
        let mut pattern = None;

        if let Some(name) = field.field_type.as_deref() {
            if let Some(regex) = patterns.get(name) {
                kind = Some(FieldKind::String);
                pattern = Some(regex.clone());
                trace!(field = %path, pattern = name, "resolved named pattern");
            }
        }

        if pattern.is_none() {
            if let Some(source) = &field.pattern {
                pattern = Some(Regex::new(source).map_err(|source| {
                    SchemaError::InvalidPattern {
                        field: path.clone(),
                        source,
                    }
                })?);
            }
        }

        schema.push(
            PathPattern::parse(path),
            FieldRule {
                kind,
                mandatory: field.mandatory,
                default: field.default.clone(),
                min: field.min,
                max: field.max,
                pattern,
            },
        );
    }

    debug!(rules = schema.len(), "schema compiled");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::FieldPath;
    use serde_json::json;

    fn decl(value: serde_json::Value) -> SchemaDecl {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_named_pattern_becomes_string_rule() {
        let mut patterns = PatternRegistry::new();
        patterns.insert_source("color", "^#[0-9a-f]{6}$").unwrap();

        let schema = compile(&decl(json!({"field": {"type": "color"}})), &patterns).unwrap();
        let rule = schema.rule_for(&FieldPath::root().key("field")).unwrap();
        assert_eq!(rule.kind, Some(FieldKind::String));
        assert!(rule.pattern.as_ref().unwrap().is_match("#aa994f"));
    }

    #[test]
    fn test_named_pattern_overrides_declared_pattern() {
        let mut patterns = PatternRegistry::new();
        patterns.insert_source("color", "^#[0-9a-f]{6}$").unwrap();

        let schema = compile(
            &decl(json!({"field": {"type": "color", "pattern": "^ignored$"}})),
            &patterns,
        )
        .unwrap();
        let rule = schema.rule_for(&FieldPath::root().key("field")).unwrap();
        assert!(rule.pattern.as_ref().unwrap().is_match("#aa994f"));
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let schema = compile(
            &decl(json!({"field": {"type": "colour"}})),
            &PatternRegistry::new(),
        )
        .unwrap();
        let rule = schema.rule_for(&FieldPath::root().key("field")).unwrap();
        assert_eq!(rule.kind, Some(FieldKind::Other("colour".into())));
        assert!(rule.pattern.is_none());
    }

    #[test]
    fn test_declared_pattern_is_compiled_eagerly() {
        let schema = compile(
            &decl(json!({"field": {"type": "string", "pattern": "^a+$"}})),
            &PatternRegistry::new(),
        )
        .unwrap();
        let rule = schema.rule_for(&FieldPath::root().key("field")).unwrap();
        assert!(rule.pattern.as_ref().unwrap().is_match("aaa"));
    }

    #[test]
    fn test_bad_pattern_fails_compilation() {
        let result = compile(
            &decl(json!({"field": {"type": "string", "pattern": "(["}})),
            &PatternRegistry::new(),
        );
        assert!(matches!(
            result,
            Err(SchemaError::InvalidPattern { field, .. }) if field == "field"
        ));
    }

    #[test]
    fn test_declaration_is_not_mutated() {
        let mut patterns = PatternRegistry::new();
        patterns.insert_source("color", "^#[0-9a-f]{6}$").unwrap();

        let declared = decl(json!({"field": {"type": "color"}}));
        let before = declared.clone();
        compile(&declared, &patterns).unwrap();
        assert_eq!(declared, before);
    }
}
