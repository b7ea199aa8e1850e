//! # Stencil Canvas
//!
//! Canvas interaction-strategy engine for the Stencil visual editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ raw input events (pointer / keyboard)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ interaction: immutable session per gesture  │
//! │  - drag threshold gating                    │
//! │  - key-state history                        │
//! │  - hard reset / replay                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ registry: applicability → fitness → winner  │
//! │  - deterministic tie-breaks                 │
//! │  - checkpoint on strategy change            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ strategy.apply(): ordered command list      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commands: one applier → editor state patches│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **Sessions are values**: every input event produces a new immutable
//!    session; replay and checkpointing fall out for free.
//! 2. **Strategies are pure**: (state, session) → command list. Only the
//!    applier produces patches; only `apply_patch` consumes them.
//! 3. **Frames are idempotent**: each frame recomputes the full command
//!    list from the checkpoint against the unpatched base state.
//! 4. **Failure is data**: inapplicable strategies score 0, disallowed
//!    operations return an explicit failure result with a cursor command,
//!    structural identity is a success with cosmetic commands only.

pub mod commands;
pub mod interaction;
pub mod modifiers;
pub mod registry;
pub mod strategies;
pub mod strategy;

pub use commands::{
    apply_patch, fold_and_apply_command_list, reorder_element, run_canvas_command,
    set_cursor_command, set_elements_to_rerender_command, set_property, update_highlighted_views,
    update_prop_if_exists, CanvasCommand, CommandDescription, CommandError, CommandResult,
    CssCursor, EditorState, EditorStatePatch, FoldResult, InteractionLifecycle, WhenToRun,
};
pub use interaction::{
    create_interaction_via_keyboard, create_interaction_via_mouse, has_drag_modifiers_changed,
    interaction_data_hard_reset, interaction_session_hard_reset, keyboard_session_is_stale,
    update_interaction_via_keyboard, update_interaction_via_mouse, update_session_metadata,
    ActiveControl, DragInteractionData, EdgePosition, InputData, InteractionSession, Key,
    KeyState, KeyboardInteractionData, KEYBOARD_INTERACTION_TIMEOUT_MS, MOVE_INTO_DRAG_THRESHOLD,
};
pub use modifiers::Modifiers;
pub use registry::{
    find_canvas_strategy, interaction_commit, interaction_hard_reset, interaction_update,
    HardResetResult, InteractionUpdateResult, StrategyRegistry, StrategySelection,
};
pub use strategies::{
    default_registry, ABSOLUTE_MOVE, ABSOLUTE_RESIZE, FLOW_REORDER_AUTO_CONVERSION,
    FLOW_REORDER_NO_CONVERSION, FLOW_REORDER_SAME_TYPE_ONLY, KEYBOARD_MOVE,
};
pub use strategy::{
    empty_strategy_application_result, single_selected_element, strategy_application_result,
    ApplicableStrategy, CanvasState, CanvasStrategy, CustomStrategyState,
    StrategyApplicationResult, StrategyApplicationStatus, StrategyId, StrategyState,
};
