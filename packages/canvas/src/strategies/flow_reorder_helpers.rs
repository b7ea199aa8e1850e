//! Slot-finding geometry for flow reorder, plus the optional display-type
//! conversion commands.
//!
//! ## Boundary rule
//!
//! Siblings are scanned in document order and the first frame containing the
//! pointer wins. Frames are half-open (left/top inclusive, right/bottom
//! exclusive), so a pointer sitting exactly on the shared edge between two
//! adjacent slots is outside the earlier one and inside the later one: ties
//! favor the later slot.

use stencil_common::{CanvasPoint, ElementPath};
use stencil_metadata::{DisplayType, ElementMetadataMap};

use crate::commands::{update_prop_if_exists, CanvasCommand, WhenToRun};

/// Whether a candidate slot with a different display type is a valid target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTypeFiltering {
    AllowMixedDisplayType,
    SameDisplayTypeOnly,
}

/// Whether the strategy may rewrite the target's display type to adopt a
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoConversion {
    WithAutoConversion,
    NoConversion,
}

/// Outcome of projecting the pointer onto the sibling slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderElementResult {
    /// `None` when no valid slot contains the pointer; callers retain the
    /// last known index rather than snapping unpredictably.
    pub new_index: Option<usize>,
    /// The display type the target would need to adopt at that slot, when it
    /// differs from its current one.
    pub new_display_type: Option<DisplayType>,
}

/// Find the sibling slot the pointer has crossed into.
///
/// Measured against the strategy's checkpoint metadata, not the live map, so
/// mid-gesture re-renders do not move the slots underneath the drag.
pub fn get_flow_reorder_index(
    metadata: &ElementMetadataMap,
    siblings: &[ElementPath],
    point_on_canvas: CanvasPoint,
    target: &ElementPath,
    display_type_filtering: DisplayTypeFiltering,
) -> ReorderElementResult {
    let target_display = metadata.display_type_of(target);

    for (index, sibling) in siblings.iter().enumerate() {
        let Some(sibling_metadata) = metadata.find(sibling) else {
            continue;
        };
        if !sibling_metadata.global_frame.contains(point_on_canvas) {
            continue;
        }
        let slot_display = sibling_metadata.special_size_measurements.display;
        let display_differs = target_display.map(|d| d != slot_display).unwrap_or(false);

        match display_type_filtering {
            DisplayTypeFiltering::SameDisplayTypeOnly if display_differs => {
                // Not a valid slot for this variant; keep scanning.
                continue;
            }
            DisplayTypeFiltering::SameDisplayTypeOnly => {
                return ReorderElementResult {
                    new_index: Some(index),
                    new_display_type: None,
                };
            }
            DisplayTypeFiltering::AllowMixedDisplayType => {
                return ReorderElementResult {
                    new_index: Some(index),
                    new_display_type: display_differs.then_some(slot_display),
                };
            }
        }
    }

    ReorderElementResult {
        new_index: None,
        new_display_type: None,
    }
}

/// The display-type rewrite for adopting a mixed slot: only emitted for the
/// auto-conversion variant, and only ever rewrites an already-authored
/// `style.display` (the command itself refuses to create one).
pub fn get_optional_display_prop_commands(
    target: &ElementPath,
    new_display_type: Option<DisplayType>,
    with_auto_conversion: AutoConversion,
) -> Vec<CanvasCommand> {
    match (with_auto_conversion, new_display_type) {
        (AutoConversion::WithAutoConversion, Some(display)) => vec![update_prop_if_exists(
            WhenToRun::Always,
            target.clone(),
            stencil_common::style_display_prop(),
            display.css_value(),
        )],
        _ => Vec::new(),
    }
}

/// Reordering is disallowed when any sibling is generated (conditionals,
/// repeats): their relative order is owned by the generating expression.
pub fn is_reorder_allowed(metadata: &ElementMetadataMap, siblings: &[ElementPath]) -> bool {
    siblings.iter().all(|sibling| {
        metadata
            .find(sibling)
            .map(|m| !m.generated)
            .unwrap_or(true)
    })
}
