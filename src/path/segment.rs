//! Tokenized path addressing
//!
//! A concrete path descends objects by key and arrays by index and is
//! rendered in dotted form with bracketed indices, e.g. `box[0].field`.
//! Schema keys are parsed into patterns whose literal `[]` segments match
//! any array index.

use std::fmt;

/// One segment of a concrete field path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Descend into an object by key.
    Key(String),
    /// Descend into an array by index.
    Index(usize),
}

/// A concrete, tokenized field path.
///
/// Paths order lexicographically by segment, so a container path sorts
/// directly before the paths of its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The empty path addressing the root value.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn get(&self, pos: usize) -> Option<&Segment> {
        self.0.get(pos)
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Child path descending by object key.
    pub fn key(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.0.push(Segment::Key(name.to_string()));
        child
    }

    /// Child path descending by array index.
    pub fn index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.0.push(Segment::Index(index));
        child
    }

    /// Concatenation of `self` and `tail`.
    pub fn join(&self, tail: &FieldPath) -> Self {
        let mut joined = self.clone();
        joined.0.extend(tail.0.iter().cloned());
        joined
    }

    /// The path with the last segment removed; `None` for the root.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Whether `prefix` is a leading sub-path of `self`.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if pos > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// One matcher of a schema path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Matches an object key exactly.
    Key(String),
    /// Matches one fixed array index.
    Index(usize),
    /// Matches any array index (a literal `[]` in the schema key).
    AnyIndex,
}

impl Matcher {
    /// Whether this matcher accepts the given concrete segment.
    pub fn matches(&self, segment: &Segment) -> bool {
        match (self, segment) {
            (Matcher::Key(name), Segment::Key(key)) => name == key,
            (Matcher::Index(want), Segment::Index(have)) => want == have,
            (Matcher::AnyIndex, Segment::Index(_)) => true,
            _ => false,
        }
    }
}

/// A parsed schema path key, matched against concrete paths by token
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern(Vec<Matcher>);

impl PathPattern {
    /// Parse a schema path key. `.` separates object keys; a key may end
    /// in bracket segments, `[3]` for a fixed index or `[]` for any
    /// index. Malformed bracket groups are kept as literal key text and
    /// therefore never match a concrete path.
    pub fn parse(path: &str) -> Self {
        let mut matchers = Vec::new();
        for part in path.split('.') {
            let head_end = part.find('[').unwrap_or(part.len());
            let (head, brackets) = part.split_at(head_end);
            match parse_brackets(brackets) {
                Some(groups) => {
                    if !head.is_empty() || groups.is_empty() {
                        matchers.push(Matcher::Key(head.to_string()));
                    }
                    matchers.extend(groups);
                }
                None => matchers.push(Matcher::Key(part.to_string())),
            }
        }
        Self(matchers)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.0
    }

    pub fn get(&self, pos: usize) -> Option<&Matcher> {
        self.0.get(pos)
    }

    /// Whether the pattern matches the concrete path exactly.
    pub fn matches(&self, path: &FieldPath) -> bool {
        self.0.len() == path.len() && self.matches_prefix(path)
    }

    /// Whether the leading matchers of this pattern accept every segment
    /// of `path`. True for any path no longer than the pattern whose
    /// segments all match.
    pub fn matches_prefix(&self, path: &FieldPath) -> bool {
        path.len() <= self.0.len()
            && path
                .segments()
                .iter()
                .zip(&self.0)
                .all(|(segment, matcher)| matcher.matches(segment))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, matcher) in self.0.iter().enumerate() {
            match matcher {
                Matcher::Key(name) => {
                    if pos > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                Matcher::Index(index) => write!(f, "[{}]", index)?,
                Matcher::AnyIndex => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

/// Parse a run of `[..]` groups; `None` if anything is malformed.
fn parse_brackets(mut rest: &str) -> Option<Vec<Matcher>> {
    let mut groups = Vec::new();
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return None;
        }
        let inner_end = rest.find(']')?;
        let inner = &rest[1..inner_end];
        if inner.is_empty() {
            groups.push(Matcher::AnyIndex);
        } else {
            groups.push(Matcher::Index(inner.parse().ok()?));
        }
        rest = &rest[inner_end + 1..];
    }
    Some(groups)
}
