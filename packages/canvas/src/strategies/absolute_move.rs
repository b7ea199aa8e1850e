//! Moves a single absolutely-positioned element by dragging its bounding
//! area. Writes `style.left`/`style.top` from the checkpointed frame plus
//! the accumulated drag, so the whole gesture is one idempotent edit.

use serde_json::json;
use stencil_common::{offset_point, PropertyPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap, PositionType};

use crate::commands::{
    set_cursor_command, set_elements_to_rerender_command, set_property, CssCursor, WhenToRun,
};
use crate::interaction::{ActiveControl, InputData, InteractionSession};
use crate::strategy::{
    empty_strategy_application_result, single_selected_element, strategy_application_result,
    CanvasState, CanvasStrategy, StrategyApplicationResult, StrategyApplicationStatus, StrategyId,
    StrategyState,
};

pub const ABSOLUTE_MOVE: StrategyId = StrategyId("ABSOLUTE_MOVE");

pub struct AbsoluteMoveStrategy;

pub fn absolute_move_strategy() -> AbsoluteMoveStrategy {
    AbsoluteMoveStrategy
}

fn is_absolute_positioned(metadata: &ElementMetadataMap, canvas_state: &CanvasState) -> bool {
    single_selected_element(canvas_state)
        .and_then(|target| metadata.find(target))
        .map(|m| m.special_size_measurements.position == PositionType::Absolute)
        .unwrap_or(false)
}

impl CanvasStrategy for AbsoluteMoveStrategy {
    fn id(&self) -> StrategyId {
        ABSOLUTE_MOVE
    }

    fn name(&self) -> &str {
        "Move (Absolute)"
    }

    fn is_applicable(
        &self,
        canvas_state: &CanvasState,
        _interaction_session: Option<&InteractionSession>,
        metadata: &ElementMetadataMap,
        _all_element_props: &AllElementProps,
    ) -> bool {
        is_absolute_positioned(metadata, canvas_state)
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
            2
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
            return strategy_application_result(
                vec![set_cursor_command(WhenToRun::MidInteraction, CssCursor::Move)],
                None,
                StrategyApplicationStatus::Success,
            );
        };
        let Some(metadata) = strategy_state.starting_metadata.find(&target) else {
            return empty_strategy_application_result();
        };

        let new_origin = offset_point(metadata.global_frame.origin(), drag);
        strategy_application_result(
            vec![
                set_property(
                    WhenToRun::Always,
                    target.clone(),
                    PropertyPath::from_keys(["style", "left"]),
                    json!(new_origin.x.round()),
                ),
                set_property(
                    WhenToRun::Always,
                    target.clone(),
                    PropertyPath::from_keys(["style", "top"]),
                    json!(new_origin.y.round()),
                ),
                set_elements_to_rerender_command(vec![target]),
                set_cursor_command(WhenToRun::MidInteraction, CssCursor::Move),
            ],
            None,
            StrategyApplicationStatus::Success,
        )
    }
}
