//! # Element paths
//!
//! An [`ElementPath`] identifies a node in the rendered UI tree as the chain
//! of unique IDs from the root down to the node. Paths are immutable value
//! types: equality, ordering and hashing are structural, and the stringified
//! form (`"root/card/label"`) is the canonical map key used by the metadata
//! and property stores.

use serde::{Deserialize, Serialize};
use std::fmt;

const PATH_SEPARATOR: &str = "/";

/// Root-to-node chain of element UIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementPath {
    parts: Vec<String>,
}

impl ElementPath {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_root(&self) -> bool {
        self.parts.len() <= 1
    }

    /// UID of the element itself (the last chain entry).
    pub fn last_uid(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Path of the containing element, or `None` at the root.
    pub fn parent(&self) -> Option<ElementPath> {
        if self.parts.len() > 1 {
            Some(ElementPath {
                parts: self.parts[..self.parts.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// Extend the path with a child UID.
    pub fn append(&self, uid: impl Into<String>) -> ElementPath {
        let mut parts = self.parts.clone();
        parts.push(uid.into());
        ElementPath { parts }
    }

    pub fn is_descendant_of(&self, other: &ElementPath) -> bool {
        self.parts.len() > other.parts.len() && self.parts[..other.parts.len()] == other.parts[..]
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join(PATH_SEPARATOR))
    }
}

/// Structural path equality. Kept as a named function because call sites read
/// better than `==` where both sides are lookups.
pub fn paths_equal(a: &ElementPath, b: &ElementPath) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = ElementPath::from_parts(["root", "card", "label"]);
        let b = ElementPath::from_parts(["root", "card", "label"]);
        assert_eq!(a, b);
        assert!(paths_equal(&a, &b));
    }

    #[test]
    fn test_parent_and_append() {
        let a = ElementPath::from_parts(["root", "card"]);
        let child = a.append("label");
        assert_eq!(child.to_string(), "root/card/label");
        assert_eq!(child.parent(), Some(a.clone()));
        assert!(child.is_descendant_of(&a));
        assert_eq!(ElementPath::from_parts(["root"]).parent(), None);
    }

    #[test]
    fn test_display_is_canonical_key() {
        let a = ElementPath::from_parts(["aaa", "bbb"]);
        assert_eq!(a.to_string(), "aaa/bbb");
    }
}
