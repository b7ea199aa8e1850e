//! Concrete editing strategies.
//!
//! [`default_registry`] assembles them in priority order; registration
//! order breaks fitness ties, so more capable variants of the same gesture
//! go first.

pub mod absolute_move;
pub mod absolute_resize;
pub mod flow_reorder;
pub mod flow_reorder_helpers;
pub mod keyboard_move;

pub use absolute_move::{absolute_move_strategy, ABSOLUTE_MOVE};
pub use absolute_resize::{absolute_resize_strategy, ABSOLUTE_RESIZE};
pub use flow_reorder::{
    flow_reorder_auto_conversion_strategy, flow_reorder_no_conversion_strategy,
    flow_reorder_same_type_only_strategy, FLOW_REORDER_AUTO_CONVERSION,
    FLOW_REORDER_NO_CONVERSION, FLOW_REORDER_SAME_TYPE_ONLY,
};
pub use flow_reorder_helpers::{
    get_flow_reorder_index, get_optional_display_prop_commands, is_reorder_allowed,
    AutoConversion, DisplayTypeFiltering, ReorderElementResult,
};
pub use keyboard_move::{keyboard_move_strategy, KEYBOARD_MOVE};

use crate::registry::StrategyRegistry;

/// The stock strategy set, in priority order.
pub fn default_registry() -> StrategyRegistry {
    StrategyRegistry::new()
        .with(Box::new(flow_reorder_auto_conversion_strategy()))
        .with(Box::new(flow_reorder_no_conversion_strategy()))
        .with(Box::new(flow_reorder_same_type_only_strategy()))
        .with(Box::new(absolute_move_strategy()))
        .with(Box::new(absolute_resize_strategy()))
        .with(Box::new(keyboard_move_strategy()))
}
