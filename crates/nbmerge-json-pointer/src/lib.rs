//! Typed JSON Pointer (RFC 6901) paths.
//!
//! A [`Path`] addresses a node in a JSON-like document tree. Unlike a plain
//! string pointer, steps are typed: an object key is a [`PathStep::Key`], an
//! array position is a [`PathStep::Index`]. Diff operations over sequences
//! are addressed by *base* index, so indices must stay numeric for ordering
//! and index arithmetic rather than round-tripping through strings.
//!
//! # Example
//!
//! ```
//! use nbmerge_json_pointer::{format_json_pointer, parse_json_pointer, PathStep};
//!
//! let path = parse_json_pointer("/cells/3/source");
//! assert_eq!(
//!     path,
//!     vec![
//!         PathStep::Key("cells".to_string()),
//!         PathStep::Index(3),
//!         PathStep::Key("source".to_string()),
//!     ]
//! );
//! assert_eq!(format_json_pointer(&path), "/cells/3/source");
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A step in a path: an object key or an array index.
///
/// Serializes untagged, so a path is a JSON array of strings and numbers:
/// `["cells", 3, "source"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    Index(usize),
    Key(String),
}

/// A path from the document root.
pub type Path = Vec<PathStep>;

impl PathStep {
    pub fn key(s: impl Into<String>) -> Self {
        PathStep::Key(s.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(k) => Some(k),
            PathStep::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Index(i) => Some(*i),
            PathStep::Key(_) => None,
        }
    }
}

impl From<usize> for PathStep {
    fn from(i: usize) -> Self {
        PathStep::Index(i)
    }
}

impl From<&str> for PathStep {
    fn from(s: &str) -> Self {
        PathStep::Key(s.to_string())
    }
}

impl From<String> for PathStep {
    fn from(s: String) -> Self {
        PathStep::Key(s)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(i) => write!(f, "{i}"),
            PathStep::Key(k) => f.write_str(&escape_component(k)),
        }
    }
}

/// Indices order numerically, keys lexicographically, and indices sort
/// before keys. Kinds never mix at one tree level in practice; the
/// cross-kind rule only keeps the order total.
impl Ord for PathStep {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PathStep::Index(a), PathStep::Index(b)) => a.cmp(b),
            (PathStep::Key(a), PathStep::Key(b)) => a.cmp(b),
            (PathStep::Index(_), PathStep::Key(_)) => Ordering::Less,
            (PathStep::Key(_), PathStep::Index(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for PathStep {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// Per RFC 6901, `/` is replaced with `~1` and `~` is replaced with `~0`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into typed path steps.
///
/// All-digit components become [`PathStep::Index`]; everything else is a
/// key. The empty string is the root path.
///
/// The pointer string form is display-oriented and lossy: an object key
/// that happens to be all digits (`{"0": …}`) parses back as an index.
/// The typed serde array form keeps the distinction and is the wire form
/// of record.
///
/// ```
/// use nbmerge_json_pointer::{parse_json_pointer, PathStep};
///
/// assert_eq!(parse_json_pointer(""), Vec::<PathStep>::new());
/// assert_eq!(parse_json_pointer("/a~0b"), vec![PathStep::key("a~b")]);
/// assert_eq!(parse_json_pointer("/0"), vec![PathStep::Index(0)]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer[1..]
        .split('/')
        .map(|component| {
            let unescaped = unescape_component(component);
            if !unescaped.is_empty() && unescaped.bytes().all(|b| b.is_ascii_digit()) {
                match unescaped.parse::<usize>() {
                    Ok(i) => PathStep::Index(i),
                    Err(_) => PathStep::Key(unescaped),
                }
            } else {
                PathStep::Key(unescaped)
            }
        })
        .collect()
}

/// Format path steps into a JSON Pointer string.
///
/// Returns an empty string for the root path.
pub fn format_json_pointer(path: &[PathStep]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(path.len() * 8);
    for step in path {
        out.push('/');
        match step {
            PathStep::Index(i) => {
                out.push_str(&i.to_string());
            }
            PathStep::Key(k) => out.push_str(&escape_component(k)),
        }
    }
    out
}

/// Returns true if `prefix` is a (non-strict) prefix of `path`.
pub fn is_path_prefix(prefix: &[PathStep], path: &[PathStep]) -> bool {
    prefix.len() <= path.len() && prefix == &path[..prefix.len()]
}
