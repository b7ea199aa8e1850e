//! # Strategy registry and frame driver
//!
//! Holds the set of available strategies and advances one interaction frame
//! at a time: filter by applicability, score by fitness, select a winner
//! with deterministic tie-breaks, apply it, and fold the resulting command
//! list into editor-state patches.
//!
//! ## Selection rules
//!
//! Registration order is the declared priority order: when two strategies
//! score the same nonzero fitness, the earlier-registered one wins, so
//! registries must register mutually-exclusive strategies intentionally.
//! A user-preferred strategy wins unconditionally while its fitness is
//! nonzero.
//!
//! ## Checkpointing
//!
//! When the winner changes, the custom scratch state resets and the
//! metadata/props checkpoint is re-taken from the session's latest
//! snapshots. Strategy deltas are always relative to that checkpoint, never
//! to the original gesture start, so switching strategies mid-gesture does
//! not inherit stale deltas.
//!
//! ## Replay
//!
//! Each frame recomputes the winner's full command list from the checkpoint
//! and folds it over the *unpatched* base editor state. Re-application is
//! therefore idempotent, and a hard reset is just an ordinary frame run
//! against a collapsed session and a fresh checkpoint.

use tracing::{debug, trace};

use crate::commands::{
    fold_and_apply_command_list, CommandError, EditorState, EditorStatePatch, InteractionLifecycle,
};
use crate::interaction::{interaction_session_hard_reset, InteractionSession};
use crate::strategy::{
    ApplicableStrategy, CanvasState, CanvasStrategy, StrategyApplicationStatus, StrategyId,
    StrategyState,
};

/// Ordered set of registered strategies. Order is priority.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn CanvasStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Box<dyn CanvasStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn with(mut self, strategy: Box<dyn CanvasStrategy>) -> Self {
        self.register(strategy);
        self
    }

    pub fn strategies(&self) -> &[Box<dyn CanvasStrategy>] {
        &self.strategies
    }

    pub fn find(&self, id: StrategyId) -> Option<&dyn CanvasStrategy> {
        self.strategies
            .iter()
            .find(|s| s.id() == id)
            .map(Box::as_ref)
    }
}

/// Outcome of one frame's strategy selection.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySelection {
    pub winner: Option<StrategyId>,
    pub fitness: u32,
    /// Nonzero-fitness strategies, best first, registration order breaking
    /// ties.
    pub sorted_applicable: Vec<ApplicableStrategy>,
}

/// Score every registered strategy for this frame and pick the winner.
pub fn find_canvas_strategy(
    registry: &StrategyRegistry,
    canvas_state: &CanvasState,
    interaction_session: &InteractionSession,
    strategy_state: &StrategyState,
) -> StrategySelection {
    let mut applicable: Vec<ApplicableStrategy> = Vec::new();
    for strategy in registry.strategies() {
        let fitness = strategy.fitness(canvas_state, interaction_session, strategy_state);
        trace!(strategy = %strategy.id(), fitness, "scored strategy");
        if fitness > 0 {
            applicable.push(ApplicableStrategy {
                id: strategy.id(),
                name: strategy.name().to_string(),
                fitness,
            });
        }
    }
    // Stable sort: equal fitness keeps registration order, so the earlier
    // registration wins ties.
    applicable.sort_by(|a, b| b.fitness.cmp(&a.fitness));

    let preferred = interaction_session
        .user_preferred_strategy
        .filter(|id| applicable.iter().any(|s| s.id == *id));

    let winner = preferred.or_else(|| applicable.first().map(|s| s.id));
    let fitness = winner
        .and_then(|id| applicable.iter().find(|s| s.id == id))
        .map(|s| s.fitness)
        .unwrap_or(0);

    StrategySelection {
        winner,
        fitness,
        sorted_applicable: applicable,
    }
}

/// Result of advancing one input frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionUpdateResult {
    pub strategy_state: StrategyState,
    /// This frame's full patch set against the unpatched base state.
    pub patches: Vec<EditorStatePatch>,
}

/// Re-point selected elements that were renamed mid-gesture (e.g. by a
/// reparent) through the session's updated-path map.
fn canvas_state_with_updated_targets(
    canvas_state: &CanvasState,
    interaction_session: &InteractionSession,
) -> CanvasState {
    if interaction_session.updated_target_paths.is_empty() {
        return canvas_state.clone();
    }
    let selected_elements = canvas_state
        .selected_elements
        .iter()
        .map(|path| {
            interaction_session
                .updated_target_paths
                .get(&path.to_string())
                .cloned()
                .unwrap_or_else(|| path.clone())
        })
        .collect();
    CanvasState {
        selected_elements,
        ..canvas_state.clone()
    }
}

/// Advance one frame: select, checkpoint on change, apply, fold.
pub fn interaction_update(
    registry: &StrategyRegistry,
    canvas_state: &CanvasState,
    editor_state: &EditorState,
    interaction_session: &InteractionSession,
    previous_state: &StrategyState,
    lifecycle: InteractionLifecycle,
) -> Result<InteractionUpdateResult, CommandError> {
    let canvas_state = canvas_state_with_updated_targets(canvas_state, interaction_session);
    let selection = find_canvas_strategy(registry, &canvas_state, interaction_session, previous_state);

    let Some(winner_id) = selection.winner else {
        // No eligible strategy this frame: keep a valid, empty state around
        // so the next input event starts clean.
        let mut state = StrategyState::new(
            interaction_session.latest_metadata.clone(),
            interaction_session.latest_all_element_props.clone(),
        );
        state.sorted_applicable_strategies = Some(selection.sorted_applicable);
        return Ok(InteractionUpdateResult {
            strategy_state: state,
            patches: Vec::new(),
        });
    };

    let strategy_changed = previous_state.current_strategy != Some(winner_id);
    let mut state = if strategy_changed {
        debug!(
            from = previous_state
                .current_strategy
                .map(|s| s.0)
                .unwrap_or("<none>"),
            to = winner_id.0,
            fitness = selection.fitness,
            "strategy changed, checkpointing"
        );
        // Checkpoint to the current frame's snapshots; scratch state resets.
        StrategyState::new(
            interaction_session.latest_metadata.clone(),
            interaction_session.latest_all_element_props.clone(),
        )
    } else {
        previous_state.clone()
    };
    state.current_strategy = Some(winner_id);
    state.current_strategy_fitness = selection.fitness;
    state.sorted_applicable_strategies = Some(selection.sorted_applicable);

    let strategy = registry
        .find(winner_id)
        .ok_or_else(|| CommandError::TargetNotFound(winner_id.to_string()))?;
    let application = strategy.apply(&canvas_state, interaction_session, &state);

    let fold = fold_and_apply_command_list(editor_state, &application.commands, lifecycle)?;

    state.status = application.status;
    state.current_strategy_commands = application.commands;
    state.accumulated_patches = fold.patches.clone();
    state.command_descriptions = fold.descriptions;
    if application.status == StrategyApplicationStatus::Success {
        if let Some(custom) = application.custom_state {
            state.custom_strategy_state = custom;
        }
    }

    Ok(InteractionUpdateResult {
        strategy_state: state,
        patches: fold.patches,
    })
}

/// Commit the gesture: re-fold the winning command list for the
/// end-interaction lifecycle, dropping transient directives.
pub fn interaction_commit(
    editor_state: &EditorState,
    strategy_state: &StrategyState,
) -> Result<Vec<EditorStatePatch>, CommandError> {
    let fold = fold_and_apply_command_list(
        editor_state,
        &strategy_state.current_strategy_commands,
        InteractionLifecycle::EndInteraction,
    )?;
    Ok(fold.patches)
}

/// Result of a hard reset: the collapsed session, its rebuilt strategy
/// state, and the replayed frame's patches.
#[derive(Debug, Clone, PartialEq)]
pub struct HardResetResult {
    pub interaction_session: InteractionSession,
    pub strategy_state: StrategyState,
    pub patches: Vec<EditorStatePatch>,
}

/// Replay an in-progress gesture from scratch against new state: collapse
/// the session history to one equivalent step, rebuild the strategy state
/// from the latest snapshots, and run one ordinary frame. Not a
/// cancellation; intent is preserved, history is collapsed.
pub fn interaction_hard_reset(
    registry: &StrategyRegistry,
    canvas_state: &CanvasState,
    editor_state: &EditorState,
    interaction_session: &InteractionSession,
) -> Result<HardResetResult, CommandError> {
    let session = interaction_session_hard_reset(interaction_session);
    let fresh_state = StrategyState::new(
        session.latest_metadata.clone(),
        session.latest_all_element_props.clone(),
    );
    let update = interaction_update(
        registry,
        canvas_state,
        editor_state,
        &session,
        &fresh_state,
        InteractionLifecycle::MidInteraction,
    )?;
    Ok(HardResetResult {
        interaction_session: session,
        strategy_state: update.strategy_state,
        patches: update.patches,
    })
}
