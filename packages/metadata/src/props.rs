//! # Authored property store
//!
//! [`AllElementProps`] holds each element's property bag exactly as authored
//! in source, addressed by [`PropertyPath`]. Strategies consult it to decide
//! whether an explicit override already exists (e.g. an authored
//! `style.display`); the conditional update command must never introduce a
//! property that was not already there.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use stencil_common::{ElementPath, PropertyPath};

/// One element's authored properties, as a nested JSON object.
pub type PropertyBag = HashMap<String, Value>;

/// All authored properties, keyed by `ElementPath::to_string()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllElementProps {
    props: HashMap<String, PropertyBag>,
}

impl AllElementProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_props(props: HashMap<String, PropertyBag>) -> Self {
        Self { props }
    }

    pub fn bag(&self, element: &ElementPath) -> Option<&PropertyBag> {
        self.props.get(&element.to_string())
    }

    /// Resolve a property path against the element's bag, walking nested
    /// objects key by key.
    pub fn get(&self, element: &ElementPath, property: &PropertyPath) -> Option<&Value> {
        let bag = self.bag(element)?;
        let mut keys = property.keys().iter();
        let first = keys.next()?;
        let mut current = bag.get(first)?;
        for key in keys {
            current = current.as_object()?.get(key)?;
        }
        Some(current)
    }

    /// Does the property currently resolve to a present value?
    pub fn has(&self, element: &ElementPath, property: &PropertyPath) -> bool {
        self.get(element, property).is_some()
    }

    /// Write a value at a property path, creating intermediate objects as
    /// needed. This is the applier's entry point; strategies never call it.
    pub fn set(&mut self, element: &ElementPath, property: &PropertyPath, value: Value) {
        let bag = self.props.entry(element.to_string()).or_default();
        if let Some((first, rest)) = property.keys().split_first() {
            if rest.is_empty() {
                bag.insert(first.clone(), value);
            } else {
                let slot = bag
                    .entry(first.clone())
                    .or_insert_with(|| Value::Object(Default::default()));
                set_in_value(slot, rest, value);
            }
        }
    }
}

fn set_in_value(current: &mut Value, keys: &[String], value: Value) {
    if !current.is_object() {
        // A scalar in the middle of the path is replaced by an object.
        *current = Value::Object(Default::default());
    }
    if let Value::Object(map) = current {
        if let Some((first, rest)) = keys.split_first() {
            if rest.is_empty() {
                map.insert(first.clone(), value);
            } else {
                let slot = map
                    .entry(first.clone())
                    .or_insert_with(|| Value::Object(Default::default()));
                set_in_value(slot, rest, value);
            }
        }
    }
}
