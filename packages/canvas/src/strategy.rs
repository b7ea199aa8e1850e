//! # Strategy types
//!
//! A [`CanvasStrategy`] is a pluggable policy that interprets a live
//! interaction session into concrete edits. Strategies are pure: they read
//! the canvas state, the session and their checkpointed scratch state, and
//! return an ordered command list. Only the command applier touches editor
//! state.
//!
//! ## Selection contract
//!
//! - `is_applicable` is a cheap structural precondition, independent of the
//!   live drag vector, so it can run before a drag has actually started.
//! - `fitness` returns a non-negative score; `0` means not currently
//!   eligible. It must fold in both applicability and live-session
//!   conditions (input type, active control), because a strategy can be
//!   structurally applicable yet wrong for the current gesture phase.
//! - `apply` produces the command list plus updated scratch state, or an
//!   explicit failure result (cosmetic commands plus Failure status).

use serde::{Deserialize, Serialize};
use stencil_common::{CanvasVector, ElementPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap};

use crate::commands::{CanvasCommand, CommandDescription, EditorStatePatch};
use crate::interaction::InteractionSession;

/// Identifier of a registered strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyId(pub &'static str);

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for StrategyId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for StrategyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // Ids are static registry names; leaking on deserialize keeps the
        // Copy representation and only ever happens for the small fixed set
        // carried in replayed sessions.
        Ok(StrategyId(Box::leak(s.into_boxed_str())))
    }
}

/// Per-frame immutable view of what is being edited on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub selected_elements: Vec<ElementPath>,
    pub scale: f64,
    pub canvas_offset: CanvasVector,
}

impl CanvasState {
    pub fn new(selected_elements: Vec<ElementPath>) -> Self {
        Self {
            selected_elements,
            scale: 1.0,
            canvas_offset: CanvasVector::default(),
        }
    }
}

/// Strategy-scoped scratch state. Persists across frames of the *same*
/// strategy and resets to `None` whenever the winning strategy changes, so
/// no strategy ever inherits another's scratch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CustomStrategyState {
    #[default]
    None,
    FlowReorder {
        last_reorder_idx: Option<usize>,
    },
    KeyboardMove {
        accumulated: CanvasVector,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyApplicationStatus {
    Success,
    Failure,
}

/// What a strategy's `apply` produced for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyApplicationResult {
    pub commands: Vec<CanvasCommand>,
    /// `None` leaves the existing scratch state untouched.
    pub custom_state: Option<CustomStrategyState>,
    pub status: StrategyApplicationStatus,
}

pub fn strategy_application_result(
    commands: Vec<CanvasCommand>,
    custom_state: Option<CustomStrategyState>,
    status: StrategyApplicationStatus,
) -> StrategyApplicationResult {
    StrategyApplicationResult {
        commands,
        custom_state,
        status,
    }
}

pub fn empty_strategy_application_result() -> StrategyApplicationResult {
    strategy_application_result(Vec::new(), None, StrategyApplicationStatus::Success)
}

/// A pluggable editing policy.
pub trait CanvasStrategy {
    fn id(&self) -> StrategyId;

    /// Human-readable name, shown in strategy pickers and history.
    fn name(&self) -> &str;

    /// Cheap structural precondition, independent of the live drag vector.
    fn is_applicable(
        &self,
        canvas_state: &CanvasState,
        interaction_session: Option<&InteractionSession>,
        metadata: &ElementMetadataMap,
        all_element_props: &AllElementProps,
    ) -> bool;

    /// Non-negative score for the current frame; `0` means ineligible.
    fn fitness(
        &self,
        canvas_state: &CanvasState,
        interaction_session: &InteractionSession,
        strategy_state: &StrategyState,
    ) -> u32;

    fn apply(
        &self,
        canvas_state: &CanvasState,
        interaction_session: &InteractionSession,
        strategy_state: &StrategyState,
    ) -> StrategyApplicationResult;
}

/// An applicable strategy with its score, as presented to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicableStrategy {
    pub id: StrategyId,
    pub name: String,
    pub fitness: u32,
}

/// Running scratch state for strategy evaluation across the frames of one
/// session. Created together with the session and discarded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyState {
    pub current_strategy: Option<StrategyId>,
    pub current_strategy_fitness: u32,
    pub current_strategy_commands: Vec<CanvasCommand>,
    /// The latest frame's full patch set. Frames recompute from the
    /// checkpoint, so this replaces rather than stacks.
    pub accumulated_patches: Vec<EditorStatePatch>,
    pub command_descriptions: Vec<CommandDescription>,
    pub sorted_applicable_strategies: Option<Vec<ApplicableStrategy>>,
    pub status: StrategyApplicationStatus,
    /// Metadata checkpointed at the moment the active strategy last changed.
    /// All distance/threshold computation for the strategy is relative to
    /// this, not to the original gesture start.
    pub starting_metadata: ElementMetadataMap,
    pub custom_strategy_state: CustomStrategyState,
    pub starting_all_element_props: AllElementProps,
}

impl StrategyState {
    pub fn new(metadata: ElementMetadataMap, all_element_props: AllElementProps) -> Self {
        Self {
            current_strategy: None,
            current_strategy_fitness: 0,
            current_strategy_commands: Vec::new(),
            accumulated_patches: Vec::new(),
            command_descriptions: Vec::new(),
            sorted_applicable_strategies: None,
            status: StrategyApplicationStatus::Success,
            starting_metadata: metadata,
            custom_strategy_state: CustomStrategyState::default(),
            starting_all_element_props: all_element_props,
        }
    }
}

/// Single selected element, or nothing. Most strategies only support
/// single-element targets.
pub fn single_selected_element(canvas_state: &CanvasState) -> Option<&ElementPath> {
    match canvas_state.selected_elements.as_slice() {
        [single] => Some(single),
        _ => None,
    }
}
