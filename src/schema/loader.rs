//! Schema loader for declaration files
//!
//! One JSON file per schema declaration; the file stem is the schema
//! name. Declarations are compiled at load time against the registry the
//! loader was built with, so a loaded schema is ready for validation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::compiler::compile;
use super::errors::{SchemaError, SchemaResult};
use super::patterns::PatternRegistry;
use super::types::{CompiledSchema, SchemaDecl};
use super::validator::SchemaValidator;

/// Reads schema declaration files and keeps the compiled schemas in an
/// in-memory registry.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    patterns: PatternRegistry,
    schemas: HashMap<String, CompiledSchema>,
}

impl SchemaLoader {
    /// Creates a loader for the given directory, compiling against the
    /// given pattern registry.
    pub fn new(schema_dir: impl Into<PathBuf>, patterns: PatternRegistry) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            patterns,
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory. A missing
    /// directory loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| SchemaError::Io {
            path: self.schema_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| SchemaError::Io {
                path: self.schema_dir.display().to_string(),
                reason: e.to_string(),
            })?;
            let path = entry.path();

            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_file(&path)?;
        }

        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let decl: SchemaDecl = serde_json::from_str(&content).map_err(|e| SchemaError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        self.register(name, &decl)
    }

    /// Compiles and registers a declaration under a name. Names are
    /// unique; registering one twice is rejected.
    pub fn register(&mut self, name: impl Into<String>, decl: &SchemaDecl) -> SchemaResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::DuplicateSchema(name));
        }

        let compiled = compile(decl, &self.patterns)?;
        debug!(schema = %name, rules = compiled.len(), "schema registered");
        self.schemas.insert(name, compiled);
        Ok(())
    }

    /// Gets a compiled schema by name.
    pub fn get(&self, name: &str) -> Option<&CompiledSchema> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Builds a strict validator for a registered schema.
    pub fn validator(&self, name: &str) -> Option<SchemaValidator> {
        self.schemas
            .get(name)
            .cloned()
            .map(SchemaValidator::new)
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::super::types::FieldDecl;

    fn sample_decl() -> SchemaDecl {
        let mut decl = SchemaDecl::new();
        decl.insert("name".into(), FieldDecl::required_typed("string"));
        decl.insert("tags".into(), FieldDecl::typed("array"));
        decl
    }

    #[test]
    fn test_register_and_get() {
        let mut loader = SchemaLoader::new("unused", PatternRegistry::new());
        loader.register("users", &sample_decl()).unwrap();

        assert!(loader.contains("users"));
        assert_eq!(loader.get("users").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut loader = SchemaLoader::new("unused", PatternRegistry::new());
        loader.register("users", &sample_decl()).unwrap();

        let result = loader.register("users", &sample_decl());
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateSchema(name)) if name == "users"
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("users.json"),
            json!({"name": {"type": "string", "mandatory": true}}).to_string(),
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path(), PatternRegistry::new());
        loader.load_all().unwrap();

        assert_eq!(loader.schema_count(), 1);
        let validator = loader.validator("users").unwrap();
        assert!(validator.validate(&json!({"name": "Alice"})).is_ok());
        assert!(validator.validate(&json!({})).is_err());
    }

    #[test]
    fn test_load_empty_or_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path(), PatternRegistry::new());
        loader.load_all().unwrap();
        assert_eq!(loader.schema_count(), 0);

        let mut loader = SchemaLoader::new(
            temp_dir.path().join("does-not-exist"),
            PatternRegistry::new(),
        );
        loader.load_all().unwrap();
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path(), PatternRegistry::new());
        assert!(matches!(
            loader.load_all(),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn test_loader_resolves_named_patterns() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("theme.json"),
            json!({"accent": {"type": "color"}}).to_string(),
        )
        .unwrap();

        let mut patterns = PatternRegistry::new();
        patterns.insert_source("color", "^#[0-9a-f]{6}$").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path(), patterns);
        loader.load_all().unwrap();

        let validator = loader.validator("theme").unwrap();
        assert!(validator.validate(&json!({"accent": "#aa994f"})).is_ok());
        let err = validator
            .validate(&json!({"accent": "#aa994g"}))
            .unwrap_err();
        assert_eq!(err.code(), "wrong-format");
    }
}
