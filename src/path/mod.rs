//! Path-addressed object plumbing for flatschema
//!
//! Nested values are converted to and from a flat mapping of tokenized
//! paths to leaf values. Validation operates entirely on the flat form.
//!
//! # Design Principles
//!
//! - Paths are tokenized, never compared as strings
//! - Deterministic: BTreeMap ordering, container paths sort before their
//!   children
//! - `unflatten(flatten(x))` is structurally equal to `x` for any value
//!   representable in the flat-path model

mod flatten;
mod kind;
mod segment;

pub use flatten::{flatten, unflatten, FlatObject};
pub use kind::{classify, ValueKind};
pub use segment::{FieldPath, Matcher, PathPattern, Segment};
