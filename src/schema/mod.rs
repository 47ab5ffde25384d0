//! Schema compilation and validation subsystem for flatschema
//!
//! A schema maps dotted field paths (with `[]` array wildcards) to
//! per-field rules. Compiling a declaration against a named-pattern
//! registry yields an immutable schema; the validator defaults absent
//! fields, matches wildcard paths against the flattened input, enforces
//! the rules, and repacks the normalized object.
//!
//! # Design Principles
//!
//! - Declarations are plain data; compilation resolves named patterns
//!   and compiles every regex eagerly
//! - Validation is two passes over the flat form: defaulting, then rule
//!   checks
//! - First violation aborts; no error aggregation, no partial result
//! - Compiled schemas are immutable and freely shareable

mod compiler;
mod errors;
mod loader;
mod patterns;
mod types;
mod validator;

pub use compiler::compile;
pub use errors::{SchemaError, SchemaResult, ValidationError, ValidationResult};
pub use loader::SchemaLoader;
pub use patterns::PatternRegistry;
pub use types::{CompiledSchema, FieldDecl, FieldKind, FieldRule, SchemaDecl};
pub use validator::SchemaValidator;
