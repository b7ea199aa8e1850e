//! Nudges a single absolutely-positioned element with the arrow keys.
//!
//! The whole key-state history is folded into one accumulated vector each
//! frame (shift steps by 10px, otherwise 1px), and the element's
//! `style.left`/`style.top` are written from the checkpoint origin plus the
//! accumulation, so re-running the fold is idempotent. The accumulated
//! vector is recorded in the strategy's scratch state for history display.

use serde_json::json;
use stencil_common::{offset_point, CanvasVector, PropertyPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap, PositionType};

use crate::commands::{set_elements_to_rerender_command, set_property, WhenToRun};
use crate::interaction::{ActiveControl, InputData, Key, KeyState, InteractionSession};
use crate::strategy::{
    empty_strategy_application_result, single_selected_element, strategy_application_result,
    CanvasState, CanvasStrategy, CustomStrategyState, StrategyApplicationResult,
    StrategyApplicationStatus, StrategyId, StrategyState,
};

pub const KEYBOARD_MOVE: StrategyId = StrategyId("KEYBOARD_MOVE");

const BASE_STEP: f64 = 1.0;
const SHIFT_STEP: f64 = 10.0;

pub struct KeyboardMoveStrategy;

pub fn keyboard_move_strategy() -> KeyboardMoveStrategy {
    KeyboardMoveStrategy
}

fn arrow_vector(key: Key) -> Option<CanvasVector> {
    match key {
        Key::Left => Some(CanvasVector::new(-1.0, 0.0)),
        Key::Right => Some(CanvasVector::new(1.0, 0.0)),
        Key::Up => Some(CanvasVector::new(0.0, -1.0)),
        Key::Down => Some(CanvasVector::new(0.0, 1.0)),
        _ => None,
    }
}

fn accumulated_drag(key_states: &[KeyState]) -> CanvasVector {
    let mut total = CanvasVector::default();
    for state in key_states {
        let step = if state.modifiers.shift {
            SHIFT_STEP
        } else {
            BASE_STEP
        };
        for key in &state.keys_pressed {
            if let Some(direction) = arrow_vector(*key) {
                total.x += direction.x * step;
                total.y += direction.y * step;
            }
        }
    }
    total
}

fn any_arrow_pressed(key_states: &[KeyState]) -> bool {
    key_states
        .iter()
        .any(|state| state.keys_pressed.iter().any(|k| arrow_vector(*k).is_some()))
}

impl CanvasStrategy for KeyboardMoveStrategy {
    fn id(&self) -> StrategyId {
        KEYBOARD_MOVE
    }

    fn name(&self) -> &str {
        "Move (Keyboard)"
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
        let keyboard_active = matches!(
            &interaction_session.interaction_data,
            InputData::Keyboard(data) if any_arrow_pressed(&data.key_states)
        );
        if applicable
            && keyboard_active
            && interaction_session.active_control == ActiveControl::KeyboardCatcher
        {
            1
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
        let InputData::Keyboard(data) = &interaction_session.interaction_data else {
            return empty_strategy_application_result();
        };
        let Some(target) = single_selected_element(canvas_state).cloned() else {
            return empty_strategy_application_result();
        };
        let Some(metadata) = strategy_state.starting_metadata.find(&target) else {
            return empty_strategy_application_result();
        };

        let total = accumulated_drag(&data.key_states);

        let new_origin = offset_point(metadata.global_frame.origin(), total);
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
            ],
            Some(CustomStrategyState::KeyboardMove { accumulated: total }),
            StrategyApplicationStatus::Success,
        )
    }
}
