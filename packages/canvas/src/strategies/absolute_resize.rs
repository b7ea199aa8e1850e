//! Resizes a single absolutely-positioned element from a resize handle.
//! Edge positions use the 0 / 0.5 / 1 encoding: a 0-side handle moves the
//! origin and shrinks, a 1-side handle grows, 0.5 leaves the axis alone.

use serde_json::json;
use stencil_common::PropertyPath;
use stencil_metadata::{AllElementProps, ElementMetadataMap, PositionType};

use crate::commands::{
    set_cursor_command, set_elements_to_rerender_command, set_property, CanvasCommand, CssCursor,
    WhenToRun,
};
use crate::interaction::{ActiveControl, EdgePosition, InputData, InteractionSession};
use crate::strategy::{
    empty_strategy_application_result, single_selected_element, strategy_application_result,
    CanvasState, CanvasStrategy, StrategyApplicationResult, StrategyApplicationStatus, StrategyId,
    StrategyState,
};

pub const ABSOLUTE_RESIZE: StrategyId = StrategyId("ABSOLUTE_RESIZE");

const MIN_SIZE: f64 = 1.0;

pub struct AbsoluteResizeStrategy;

pub fn absolute_resize_strategy() -> AbsoluteResizeStrategy {
    AbsoluteResizeStrategy
}

/// Cursor matching the handle being dragged.
fn cursor_for_edge(edge: EdgePosition) -> CssCursor {
    match (edge.x, edge.y) {
        (x, _) if x == 0.5 => CssCursor::ResizeNs,
        (_, y) if y == 0.5 => CssCursor::ResizeEw,
        (x, y) if x == y => CssCursor::ResizeNwse,
        _ => CssCursor::ResizeNesw,
    }
}

impl CanvasStrategy for AbsoluteResizeStrategy {
    fn id(&self) -> StrategyId {
        ABSOLUTE_RESIZE
    }

    fn name(&self) -> &str {
        "Resize (Absolute)"
    }

    fn is_applicable(
        &self,
        canvas_state: &CanvasState,
        _interaction_session: Option<&InteractionSession>,
        metadata: &ElementMetadataMap,
        _all_element_props: &AllElementProps,
    ) -> bool {
        single_selected_element(canvas_state)
            .and_then(|target| metadata.find(target))
            .map(|m| m.special_size_measurements.position == PositionType::Absolute)
            .unwrap_or(false)
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
        let resize_handle_active = matches!(
            interaction_session.active_control,
            ActiveControl::ResizeHandle { .. }
        );
        if applicable && interaction_session.interaction_data.is_drag() && resize_handle_active {
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
        let ActiveControl::ResizeHandle { edge } = interaction_session.active_control else {
            return empty_strategy_application_result();
        };
        let Some(target) = single_selected_element(canvas_state).cloned() else {
            return empty_strategy_application_result();
        };
        let cursor = cursor_for_edge(edge);
        let Some(drag) = drag_data.drag else {
            return strategy_application_result(
                vec![set_cursor_command(WhenToRun::MidInteraction, cursor)],
                None,
                StrategyApplicationStatus::Success,
            );
        };
        let Some(metadata) = strategy_state.starting_metadata.find(&target) else {
            return empty_strategy_application_result();
        };

        let frame = metadata.global_frame;
        let mut x = frame.x;
        let mut y = frame.y;
        let mut width = frame.width;
        let mut height = frame.height;

        // Weight: -1 for a 0-side handle (origin moves), +1 for a 1-side
        // handle, 0 for a center handle.
        if edge.x == 0.0 {
            let applied = drag.x.min(frame.width - MIN_SIZE);
            x += applied;
            width -= applied;
        } else if edge.x == 1.0 {
            width = (width + drag.x).max(MIN_SIZE);
        }
        if edge.y == 0.0 {
            let applied = drag.y.min(frame.height - MIN_SIZE);
            y += applied;
            height -= applied;
        } else if edge.y == 1.0 {
            height = (height + drag.y).max(MIN_SIZE);
        }

        let style_prop = |key: &str| PropertyPath::from_keys(["style", key]);
        let mut commands: Vec<CanvasCommand> = Vec::new();
        if edge.x != 0.5 {
            commands.push(set_property(
                WhenToRun::Always,
                target.clone(),
                style_prop("width"),
                json!(width.round()),
            ));
        }
        if edge.y != 0.5 {
            commands.push(set_property(
                WhenToRun::Always,
                target.clone(),
                style_prop("height"),
                json!(height.round()),
            ));
        }
        if edge.x == 0.0 {
            commands.push(set_property(
                WhenToRun::Always,
                target.clone(),
                style_prop("left"),
                json!(x.round()),
            ));
        }
        if edge.y == 0.0 {
            commands.push(set_property(
                WhenToRun::Always,
                target.clone(),
                style_prop("top"),
                json!(y.round()),
            ));
        }
        commands.push(set_elements_to_rerender_command(vec![target]));
        commands.push(set_cursor_command(WhenToRun::MidInteraction, cursor));

        strategy_application_result(commands, None, StrategyApplicationStatus::Success)
    }
}
