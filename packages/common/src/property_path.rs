//! Property paths address a value inside an element's authored property bag,
//! e.g. `style.display`. Like element paths they are structural value types;
//! the stringified form joins keys with `.`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath {
    keys: Vec<String>,
}

impl PropertyPath {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("."))
    }
}

/// The display property rewritten by reorder auto-conversion.
pub fn style_display_prop() -> PropertyPath {
    PropertyPath::from_keys(["style", "display"])
}
