//! # Element instance metadata
//!
//! A read-only, per-frame snapshot of the rendered element tree: measured
//! frames, computed layout modes, and parent/child relationships.
//!
//! ## Design
//!
//! The [`ElementMetadataMap`] is rebuilt wholesale after every DOM
//! measurement pass. There is no partial mutation API: consumers always see
//! the last *fully* measured render, never a speculative future state, and
//! measurement may lag one or more frames behind the pointer. The strategy
//! engine treats the map as best-available truth and only ever reads it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stencil_common::{CanvasRect, ElementPath};

/// Computed CSS display mode of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    Block,
    InlineBlock,
    Inline,
    Flex,
    Grid,
    None,
}

impl DisplayType {
    /// The authored `display` property value for this computed mode.
    pub fn css_value(&self) -> &'static str {
        match self {
            DisplayType::Block => "block",
            DisplayType::InlineBlock => "inline-block",
            DisplayType::Inline => "inline",
            DisplayType::Flex => "flex",
            DisplayType::Grid => "grid",
            DisplayType::None => "none",
        }
    }
}

/// Computed CSS position mode of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionType {
    Static,
    Relative,
    Absolute,
    Sticky,
}

/// Layout regime imposed by an element's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutSystem {
    Flow,
    Flex,
    Grid,
}

/// Layout facts measured from the rendered DOM, beyond the plain frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialSizeMeasurements {
    pub display: DisplayType,
    pub position: PositionType,
    pub parent_layout_system: LayoutSystem,
}

/// One entry per rendered element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInstanceMetadata {
    pub element_path: ElementPath,
    /// Measured bounds in canvas space.
    pub global_frame: CanvasRect,
    pub special_size_measurements: SpecialSizeMeasurements,
    pub parent_path: Option<ElementPath>,
    /// Ordered child paths, in document order.
    pub children: Vec<ElementPath>,
    /// True for elements produced by expression expansion (conditionals,
    /// repeats). Generated elements cannot be reordered.
    pub generated: bool,
}

impl ElementInstanceMetadata {
    /// Laid out by normal document flow: not absolutely positioned (or
    /// sticky) and not inside a flex/grid container.
    pub fn is_positioned_by_flow(&self) -> bool {
        let flow_position = matches!(
            self.special_size_measurements.position,
            PositionType::Static | PositionType::Relative
        );
        flow_position
            && self.special_size_measurements.parent_layout_system == LayoutSystem::Flow
    }
}

/// The full measured snapshot, keyed by `ElementPath::to_string()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadataMap {
    elements: HashMap<String, ElementInstanceMetadata>,
}

impl ElementMetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the snapshot from one full measurement pass.
    pub fn from_elements(elements: Vec<ElementInstanceMetadata>) -> Self {
        Self {
            elements: elements
                .into_iter()
                .map(|e| (e.element_path.to_string(), e))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn find(&self, path: &ElementPath) -> Option<&ElementInstanceMetadata> {
        self.elements.get(&path.to_string())
    }

    pub fn parent_of(&self, path: &ElementPath) -> Option<&ElementPath> {
        self.find(path)?.parent_path.as_ref()
    }

    pub fn children_of(&self, path: &ElementPath) -> &[ElementPath] {
        self.find(path).map(|m| m.children.as_slice()).unwrap_or(&[])
    }

    /// The target's siblings in document order, target included. Elements
    /// without a measured parent have no siblings.
    pub fn siblings(&self, path: &ElementPath) -> Vec<ElementPath> {
        match self.parent_of(path) {
            Some(parent) => self.children_of(&parent.clone()).to_vec(),
            None => Vec::new(),
        }
    }

    /// Index of the element among its parent's children.
    pub fn index_in_parent(&self, path: &ElementPath) -> Option<usize> {
        let parent = self.parent_of(path)?.clone();
        self.children_of(&parent).iter().position(|c| c == path)
    }

    pub fn is_positioned_by_flow(&self, path: &ElementPath) -> bool {
        self.find(path)
            .map(ElementInstanceMetadata::is_positioned_by_flow)
            .unwrap_or(false)
    }

    pub fn display_type_of(&self, path: &ElementPath) -> Option<DisplayType> {
        self.find(path)
            .map(|m| m.special_size_measurements.display)
    }

    /// Replace a child list wholesale. Used only by the command applier when
    /// interpreting an element-order patch; the measurement pipeline never
    /// calls this.
    pub fn set_children(&mut self, parent: &ElementPath, children: Vec<ElementPath>) {
        if let Some(entry) = self.elements.get_mut(&parent.to_string()) {
            entry.children = children;
        }
    }
}
