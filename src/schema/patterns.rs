//! Named pattern registry
//!
//! A registry maps reusable format names to compiled regular
//! expressions. Schema authors reference them through the `type` member,
//! shorthand for a string rule with that expression. The embedding
//! application builds the registry once; it is read-only afterwards.

use std::collections::BTreeMap;

use regex::Regex;

use super::errors::{SchemaError, SchemaResult};

/// Mapping from pattern name to compiled regular expression.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, Regex>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pre-compiled expression.
    pub fn insert(&mut self, name: impl Into<String>, regex: Regex) {
        self.patterns.insert(name.into(), regex);
    }

    /// Compiles and registers an expression source. A source that does
    /// not compile is rejected here rather than surfacing later during
    /// validation.
    pub fn insert_source(&mut self, name: impl Into<String>, source: &str) -> SchemaResult<()> {
        let name = name.into();
        let regex = Regex::new(source).map_err(|source| SchemaError::InvalidPattern {
            field: name.clone(),
            source,
        })?;
        self.patterns.insert(name, regex);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Merges another registry's entries; later entries win.
    pub fn extend(&mut self, other: PatternRegistry) {
        self.patterns.extend(other.patterns);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_source_and_get() {
        let mut registry = PatternRegistry::new();
        registry.insert_source("color", "^#[0-9a-f]{6}$").unwrap();
        assert!(registry.contains("color"));
        assert!(registry.get("color").unwrap().is_match("#aa994f"));
        assert!(!registry.get("color").unwrap().is_match("#aa994g"));
    }

    #[test]
    fn test_bad_source_is_rejected() {
        let mut registry = PatternRegistry::new();
        let result = registry.insert_source("broken", "([");
        assert!(matches!(
            result,
            Err(SchemaError::InvalidPattern { field, .. }) if field == "broken"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_extend_merges_and_overrides() {
        let mut base = PatternRegistry::new();
        base.insert_source("color", "^#[0-9a-f]{6}$").unwrap();
        base.insert_source("slug", "^[a-z-]+$").unwrap();

        let mut plugin = PatternRegistry::new();
        plugin.insert_source("color", "^#[0-9a-fA-F]{6}$").unwrap();

        base.extend(plugin);
        assert_eq!(base.len(), 2);
        assert!(base.get("color").unwrap().is_match("#AA994F"));
    }
}
