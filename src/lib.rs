//! flatschema - declarative schema validation for flattened,
//! path-addressed objects
//!
//! Input objects are flattened into dotted-path maps, checked against
//! per-path rules (type, mandatory, default, min/max, pattern), and
//! repacked with defaults applied.

pub mod path;
pub mod schema;
