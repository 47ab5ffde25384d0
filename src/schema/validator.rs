//! Document validation against a compiled schema
//!
//! Validation runs two passes over the flattened input: a defaulting
//! pass that fills absent fields and enforces mandatory presence, then a
//! rule pass over every present path. The first violation aborts the
//! call.
//!
//! # Design Principles
//!
//! - Validation is deterministic: the flat map iterates in path order
//! - The validator never mutates the compiled schema, so one instance
//!   is freely shareable across calls and threads
//! - Mandatory absence is checked before defaulting; a mandatory field
//!   with a default still fails when the caller omits it

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::trace;

use super::errors::{ValidationError, ValidationResult};
use super::types::{CompiledSchema, FieldKind, FieldRule};
use crate::path::{
    classify, flatten, unflatten, FieldPath, FlatObject, Matcher, PathPattern, Segment, ValueKind,
};

/// Validates and normalizes input objects against a compiled schema.
pub struct SchemaValidator {
    schema: CompiledSchema,
    ignore_undefined: bool,
}

impl SchemaValidator {
    /// Creates a validator that rejects paths without a matching rule.
    pub fn new(schema: CompiledSchema) -> Self {
        Self {
            schema,
            ignore_undefined: false,
        }
    }

    /// Creates a validator; with `ignore_undefined` set, paths without a
    /// matching rule pass through unchecked.
    pub fn with_ignore_undefined(schema: CompiledSchema, ignore_undefined: bool) -> Self {
        Self {
            schema,
            ignore_undefined,
        }
    }

    /// Validates one input object and returns the normalized result with
    /// defaults applied.
    pub fn validate(&self, input: &Value) -> ValidationResult<Value> {
        let mut test = flatten(input);

        let checked = self
            .apply_defaults(&mut test)
            .and_then(|()| self.check_fields(&test));

        match checked {
            Ok(()) => Ok(unflatten(&test)),
            Err(err) => {
                trace!(code = err.code(), field = err.field(), "validation rejected");
                Err(err)
            }
        }
    }

    /// Defaulting pass. Each rule's pattern is expanded against the
    /// input; absent candidates fail when mandatory, receive the default
    /// when one is declared, and are otherwise left absent.
    fn apply_defaults(&self, test: &mut FlatObject) -> ValidationResult<()> {
        for (pattern, rule) in self.schema.rules() {
            if !rule.mandatory && rule.default.is_none() {
                continue;
            }
            for candidate in expand(pattern, test) {
                if test.contains_key(&candidate) {
                    continue;
                }
                if rule.mandatory {
                    return Err(ValidationError::MissingField(candidate.to_string()));
                }
                let Some(default) = &rule.default else {
                    continue;
                };
                if matches!(rule.kind, Some(FieldKind::Object)) {
                    // A supplied child wins over the whole default; there
                    // is no merge.
                    if test
                        .keys()
                        .any(|key| key.len() > candidate.len() && key.starts_with(&candidate))
                    {
                        continue;
                    }
                    for (leaf, value) in flatten(default) {
                        test.insert(candidate.join(&leaf), value);
                    }
                } else {
                    test.insert(candidate, default.clone());
                }
            }
        }
        Ok(())
    }

    /// Rule pass over every present path.
    fn check_fields(&self, test: &FlatObject) -> ValidationResult<()> {
        for (path, value) in test {
            match self.schema.rule_for(path) {
                Some(rule) => check_rule(path, value, rule)?,
                None if self.ignore_undefined => {}
                None => self.check_undeclared(path, value)?,
            }
        }
        Ok(())
    }

    /// Decides whether a path without a rule of its own is still
    /// allowed: an array declared only through its element rules, an
    /// element of an array declared wholesale, or an unchecked child of
    /// an object-typed ancestor.
    fn check_undeclared(&self, path: &FieldPath, value: &Value) -> ValidationResult<()> {
        if classify(value) == ValueKind::Array && self.has_element_rules(path) {
            return Ok(());
        }

        let mut ancestor = path.parent();
        while let Some(current) = ancestor {
            if let Some(rule) = self.schema.rule_for(&current) {
                // Nearest declared ancestor decides.
                if matches!(rule.kind, Some(FieldKind::Object)) {
                    return Ok(());
                }
                if matches!(path.get(current.len()), Some(Segment::Index(_)))
                    && !self.has_element_rules(&current)
                {
                    return Ok(());
                }
                break;
            }
            ancestor = current.parent();
        }

        Err(ValidationError::IllegalField(path.to_string()))
    }

    /// Whether any rule addresses elements below `path`.
    fn has_element_rules(&self, path: &FieldPath) -> bool {
        self.schema.rules().any(|(pattern, _)| {
            pattern.len() > path.len()
                && pattern.matches_prefix(path)
                && matches!(
                    pattern.get(path.len()),
                    Some(Matcher::AnyIndex | Matcher::Index(_))
                )
        })
    }
}

/// Checks one present value against its rule.
fn check_rule(path: &FieldPath, value: &Value, rule: &FieldRule) -> ValidationResult<()> {
    let kind = classify(value);

    if let Some(expected) = &rule.kind {
        if !expected.matches(kind) {
            return Err(ValidationError::WrongType {
                field: path.to_string(),
                expected: expected.type_name().to_string(),
            });
        }
    }

    match kind {
        ValueKind::Number => {
            if let Some(number) = value.as_f64() {
                if let Some(min) = rule.min {
                    if number < min {
                        return Err(ValidationError::MinValueDroppedBelow(path.to_string()));
                    }
                }
                if let Some(max) = rule.max {
                    if number > max {
                        return Err(ValidationError::MaxValueExceeded(path.to_string()));
                    }
                }
            }
        }
        ValueKind::String => {
            if let Some(text) = value.as_str() {
                check_length(path, text.chars().count(), rule)?;
                if let Some(pattern) = &rule.pattern {
                    if !pattern.is_match(text) {
                        return Err(ValidationError::WrongFormat(path.to_string()));
                    }
                }
            }
        }
        ValueKind::Array => {
            if let Some(items) = value.as_array() {
                check_length(path, items.len(), rule)?;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Inclusive length bounds, shared by strings and arrays.
fn check_length(path: &FieldPath, len: usize, rule: &FieldRule) -> ValidationResult<()> {
    let len = len as f64;
    if let Some(min) = rule.min {
        if len < min {
            return Err(ValidationError::MinLengthDroppedBelow(path.to_string()));
        }
    }
    if let Some(max) = rule.max {
        if len > max {
            return Err(ValidationError::MaxLengthExceeded(path.to_string()));
        }
    }
    Ok(())
}

/// Expands a schema path pattern into the concrete paths it addresses
/// in the flattened input. Wildcard segments branch over the indices of
/// the array recorded at that position, so an empty array contributes no
/// candidates; everything else is taken literally, whether or not a
/// parent exists.
fn expand(pattern: &PathPattern, flat: &FlatObject) -> Vec<FieldPath> {
    let mut prefixes = vec![FieldPath::root()];

    for matcher in pattern.matchers() {
        match matcher {
            Matcher::Key(name) => {
                for prefix in &mut prefixes {
                    prefix.push(Segment::Key(name.clone()));
                }
            }
            Matcher::Index(index) => {
                for prefix in &mut prefixes {
                    prefix.push(Segment::Index(*index));
                }
            }
            Matcher::AnyIndex => {
                let mut next = Vec::new();
                for prefix in &prefixes {
                    for index in indices_at(flat, prefix) {
                        next.push(prefix.index(index));
                    }
                }
                prefixes = next;
                if prefixes.is_empty() {
                    break;
                }
            }
        }
    }

    prefixes
}

/// The array indices present at `prefix`: read from the array leaf when
/// one is recorded, otherwise collected from deeper paths.
fn indices_at(flat: &FlatObject, prefix: &FieldPath) -> BTreeSet<usize> {
    if let Some(Value::Array(items)) = flat.get(prefix) {
        return (0..items.len()).collect();
    }
    let mut indices = BTreeSet::new();
    for key in flat.keys() {
        if key.len() > prefix.len() && key.starts_with(prefix) {
            if let Some(Segment::Index(index)) = key.get(prefix.len()) {
                indices.insert(*index);
            }
        }
    }
    indices
}
