//! # Flow reorder
//!
//! Reorders a single flow-laid-out element among its siblings by dragging.
//! Three variants share one applicability test and one apply routine and
//! differ only in configuration:
//!
//! - auto-conversion (fitness 3): may rewrite the target's authored display
//!   type to adopt a mixed slot;
//! - no-conversion (fitness 2): accepts mixed slots without rewriting;
//! - same-type-only (fitness 1): only slots matching the target's display
//!   type are valid.
//!
//! The mixed-type variants are only shown when a meaningful conversion
//! choice exists (some sibling has a different display type); the
//! same-type-only variant is always offered. With all three applicable the
//! fitness ordering makes the most capable variant win ties.

use stencil_common::{offset_point, ElementPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap};

use crate::commands::{
    reorder_element, set_cursor_command, set_elements_to_rerender_command,
    update_highlighted_views, CssCursor, WhenToRun,
};
use crate::interaction::{ActiveControl, InputData, InteractionSession};
use crate::strategy::{
    empty_strategy_application_result, single_selected_element, strategy_application_result,
    CanvasState, CanvasStrategy, CustomStrategyState, StrategyApplicationResult,
    StrategyApplicationStatus, StrategyId, StrategyState,
};
use crate::strategies::flow_reorder_helpers::{
    get_flow_reorder_index, get_optional_display_prop_commands, is_reorder_allowed, AutoConversion,
    DisplayTypeFiltering,
};

pub const FLOW_REORDER_AUTO_CONVERSION: StrategyId = StrategyId("FLOW_REORDER_AUTO_CONVERSION");
pub const FLOW_REORDER_NO_CONVERSION: StrategyId = StrategyId("FLOW_REORDER_NO_CONVERSION");
pub const FLOW_REORDER_SAME_TYPE_ONLY: StrategyId = StrategyId("FLOW_REORDER_SAME_TYPE_ONLY");

/// Applicability filtering: the conversion-capable variants only appear when
/// a conversion choice actually exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplicabilityFiltering {
    NoFilter,
    RequiresMixedDisplayType,
}

pub struct FlowReorderStrategy {
    id: StrategyId,
    name: &'static str,
    active_fitness: u32,
    auto_conversion: AutoConversion,
    display_type_filtering: DisplayTypeFiltering,
    applicability_filtering: ApplicabilityFiltering,
}

pub fn flow_reorder_auto_conversion_strategy() -> FlowReorderStrategy {
    FlowReorderStrategy {
        id: FLOW_REORDER_AUTO_CONVERSION,
        name: "Reorder (Flow, Auto)",
        active_fitness: 3,
        auto_conversion: AutoConversion::WithAutoConversion,
        display_type_filtering: DisplayTypeFiltering::AllowMixedDisplayType,
        applicability_filtering: ApplicabilityFiltering::RequiresMixedDisplayType,
    }
}

pub fn flow_reorder_no_conversion_strategy() -> FlowReorderStrategy {
    FlowReorderStrategy {
        id: FLOW_REORDER_NO_CONVERSION,
        name: "Reorder (Flow)",
        active_fitness: 2,
        auto_conversion: AutoConversion::NoConversion,
        display_type_filtering: DisplayTypeFiltering::AllowMixedDisplayType,
        applicability_filtering: ApplicabilityFiltering::RequiresMixedDisplayType,
    }
}

pub fn flow_reorder_same_type_only_strategy() -> FlowReorderStrategy {
    FlowReorderStrategy {
        id: FLOW_REORDER_SAME_TYPE_ONLY,
        name: "Reorder (Same)",
        active_fitness: 1,
        auto_conversion: AutoConversion::NoConversion,
        display_type_filtering: DisplayTypeFiltering::SameDisplayTypeOnly,
        applicability_filtering: ApplicabilityFiltering::NoFilter,
    }
}

impl FlowReorderStrategy {
    fn last_reorder_idx(strategy_state: &StrategyState) -> Option<usize> {
        match strategy_state.custom_strategy_state {
            CustomStrategyState::FlowReorder { last_reorder_idx } => last_reorder_idx,
            _ => None,
        }
    }
}

impl CanvasStrategy for FlowReorderStrategy {
    fn id(&self) -> StrategyId {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn is_applicable(
        &self,
        canvas_state: &CanvasState,
        _interaction_session: Option<&InteractionSession>,
        metadata: &ElementMetadataMap,
        _all_element_props: &AllElementProps,
    ) -> bool {
        let Some(target) = single_selected_element(canvas_state) else {
            return false;
        };
        // `siblings` includes the target itself; reordering needs more than
        // one *other* sibling.
        let siblings = metadata.siblings(target);
        if siblings.len().saturating_sub(1) <= 1 || !metadata.is_positioned_by_flow(target) {
            return false;
        }
        match self.applicability_filtering {
            ApplicabilityFiltering::NoFilter => true,
            ApplicabilityFiltering::RequiresMixedDisplayType => {
                let target_display = metadata.display_type_of(target);
                siblings.iter().any(|sibling| {
                    metadata.is_positioned_by_flow(sibling)
                        && metadata.display_type_of(sibling) != target_display
                })
            }
        }
    }

    fn fitness(
        &self,
        canvas_state: &CanvasState,
        interaction_session: &InteractionSession,
        strategy_state: &StrategyState,
    ) -> u32 {
        let applicable = self.is_applicable(
            canvas_state,
            Some(interaction_session),
            &strategy_state.starting_metadata,
            &strategy_state.starting_all_element_props,
        );
        if applicable
            && interaction_session.interaction_data.is_drag()
            && interaction_session.active_control == ActiveControl::BoundingArea
        {
            self.active_fitness
        } else {
            0
        }
    }

    fn apply(
        &self,
        canvas_state: &CanvasState,
        interaction_session: &InteractionSession,
        strategy_state: &StrategyState,
    ) -> StrategyApplicationResult {
        let InputData::Drag(drag_data) = &interaction_session.interaction_data else {
            return empty_strategy_application_result();
        };
        let Some(target) = single_selected_element(canvas_state).cloned() else {
            return empty_strategy_application_result();
        };

        let Some(drag) = drag_data.drag else {
            // Threshold not yet passed; just track the pointer.
            return strategy_application_result(
                vec![set_cursor_command(WhenToRun::MidInteraction, CssCursor::Move)],
                None,
                StrategyApplicationStatus::Success,
            );
        };

        let starting_metadata = &strategy_state.starting_metadata;
        let siblings_of_target: Vec<ElementPath> = starting_metadata.siblings(&target);

        if !is_reorder_allowed(starting_metadata, &siblings_of_target) {
            return strategy_application_result(
                vec![set_cursor_command(
                    WhenToRun::MidInteraction,
                    CssCursor::NotPermitted,
                )],
                None,
                StrategyApplicationStatus::Failure,
            );
        }

        let raw_point_on_canvas = offset_point(drag_data.drag_start, drag);

        let unpatched_index = siblings_of_target
            .iter()
            .position(|sibling| *sibling == target)
            .unwrap_or(0);
        let last_reorder_idx =
            Self::last_reorder_idx(strategy_state).unwrap_or(unpatched_index);

        let reorder_result = get_flow_reorder_index(
            starting_metadata,
            &siblings_of_target,
            raw_point_on_canvas,
            &target,
            self.display_type_filtering,
        );

        let real_new_index = reorder_result.new_index.unwrap_or(last_reorder_idx);
        let custom_state = Some(CustomStrategyState::FlowReorder {
            last_reorder_idx: Some(real_new_index),
        });

        if real_new_index == unpatched_index {
            // Structural identity: cosmetic commands only, no reorder patch.
            strategy_application_result(
                vec![
                    set_elements_to_rerender_command(siblings_of_target),
                    update_highlighted_views(WhenToRun::MidInteraction, Vec::new()),
                    set_cursor_command(WhenToRun::MidInteraction, CssCursor::Move),
                ],
                custom_state,
                StrategyApplicationStatus::Success,
            )
        } else {
            let mut commands = vec![
                reorder_element(WhenToRun::Always, target.clone(), real_new_index),
                set_elements_to_rerender_command(siblings_of_target),
                update_highlighted_views(WhenToRun::MidInteraction, Vec::new()),
                set_cursor_command(WhenToRun::MidInteraction, CssCursor::Move),
            ];
            commands.extend(get_optional_display_prop_commands(
                &target,
                reorder_result.new_display_type,
                self.auto_conversion,
            ));
            strategy_application_result(
                commands,
                custom_state,
                StrategyApplicationStatus::Success,
            )
        }
    }
}
