//! Frame pipeline behavior: selection, checkpointing, commit and hard reset.

mod common;

use common::{absolute_fixture, flow_stack, dragging_session};
use serde_json::json;
use std::collections::BTreeSet;
use stencil_canvas::{
    create_interaction_via_keyboard, create_interaction_via_mouse, default_registry,
    interaction_commit, interaction_hard_reset, interaction_update, keyboard_session_is_stale,
    update_interaction_via_keyboard, update_interaction_via_mouse, ActiveControl, CanvasCommand,
    CanvasState, CustomStrategyState, EdgePosition, EditorStatePatch, InteractionLifecycle,
    InteractionSession, Key, Modifiers, StrategyState, ABSOLUTE_MOVE, ABSOLUTE_RESIZE,
    FLOW_REORDER_AUTO_CONVERSION, FLOW_REORDER_SAME_TYPE_ONLY, KEYBOARD_INTERACTION_TIMEOUT_MS,
    KEYBOARD_MOVE,
};
use stencil_common::{CanvasPoint, PropertyPath};
use stencil_metadata::DisplayType;

fn style_prop(key: &str) -> PropertyPath {
    PropertyPath::from_keys(["style", key])
}

fn property_patches(patches: &[EditorStatePatch]) -> Vec<(PropertyPath, serde_json::Value)> {
    patches
        .iter()
        .filter_map(|p| match p {
            EditorStatePatch::Property {
                property, value, ..
            } => Some((property.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn absolute_move_writes_left_and_top_from_the_checkpoint_frame() {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());
    // Element frame starts at (20, 30).
    let session = dragging_session(
        &fixture.editor_state,
        CanvasPoint::new(40.0, 50.0),
        CanvasPoint::new(5.0, 7.0),
    );
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let result = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    assert_eq!(result.strategy_state.current_strategy, Some(ABSOLUTE_MOVE));
    assert_eq!(
        property_patches(&result.patches),
        vec![
            (style_prop("left"), json!(25.0)),
            (style_prop("top"), json!(37.0)),
        ]
    );
}

#[test]
fn resize_from_the_bottom_right_handle_only_grows() {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());
    let session = create_interaction_via_mouse(
        CanvasPoint::new(70.0, 90.0),
        Modifiers::none(),
        ActiveControl::ResizeHandle {
            edge: EdgePosition { x: 1.0, y: 1.0 },
        },
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    let session =
        update_interaction_via_mouse(&session, CanvasPoint::new(10.0, 5.0), Modifiers::none(), None);
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let result = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    assert_eq!(result.strategy_state.current_strategy, Some(ABSOLUTE_RESIZE));
    // 50x60 grown by (10, 5); origin untouched.
    assert_eq!(
        property_patches(&result.patches),
        vec![
            (style_prop("width"), json!(60.0)),
            (style_prop("height"), json!(65.0)),
        ]
    );
}

#[test]
fn resize_from_the_left_edge_moves_origin_and_shrinks() {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());
    let session = create_interaction_via_mouse(
        CanvasPoint::new(20.0, 60.0),
        Modifiers::none(),
        ActiveControl::ResizeHandle {
            edge: EdgePosition { x: 0.0, y: 0.5 },
        },
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    let session =
        update_interaction_via_mouse(&session, CanvasPoint::new(10.0, 0.0), Modifiers::none(), None);
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let result = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    // 50 wide at x=20; dragging the left edge right by 10 gives 40 at x=30.
    // The vertical axis (center handle) stays untouched.
    assert_eq!(
        property_patches(&result.patches),
        vec![
            (style_prop("width"), json!(40.0)),
            (style_prop("left"), json!(30.0)),
        ]
    );
}

#[test]
fn keyboard_move_accumulates_over_the_key_state_history() {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());
    let session = create_interaction_via_keyboard(
        [Key::Down],
        Modifiers::none(),
        ActiveControl::KeyboardCatcher,
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    // Second press with shift: 1px then 10px.
    let session = update_interaction_via_keyboard(
        &session,
        &[Key::Down],
        &[],
        Modifiers::shift(),
        ActiveControl::KeyboardCatcher,
    );
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let result = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    assert_eq!(result.strategy_state.current_strategy, Some(KEYBOARD_MOVE));
    // Frame top is 30; accumulated 11px down.
    assert_eq!(
        property_patches(&result.patches),
        vec![
            (style_prop("left"), json!(20.0)),
            (style_prop("top"), json!(41.0)),
        ]
    );
    assert!(matches!(
        result.strategy_state.custom_strategy_state,
        CustomStrategyState::KeyboardMove { accumulated } if accumulated == CanvasPoint::new(0.0, 11.0)
    ));
}

#[test]
fn commit_refolds_without_transient_patches() {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());
    let session = dragging_session(
        &fixture.editor_state,
        CanvasPoint::new(40.0, 50.0),
        CanvasPoint::new(5.0, 7.0),
    );
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let mid = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();
    assert!(mid
        .patches
        .iter()
        .any(|p| matches!(p, EditorStatePatch::Cursor { .. })));

    let committed = interaction_commit(&fixture.editor_state, &mid.strategy_state).unwrap();
    assert!(
        !committed
            .iter()
            .any(|p| matches!(p, EditorStatePatch::Cursor { .. })),
        "cursor directives are mid-interaction only"
    );
    // The structural edits survive the commit.
    assert_eq!(
        property_patches(&committed),
        vec![
            (style_prop("left"), json!(25.0)),
            (style_prop("top"), json!(37.0)),
        ]
    );
}

#[test]
fn hard_reset_collapses_history_and_replays_to_the_same_patches() -> anyhow::Result<()> {
    let fixture = absolute_fixture();
    let registry = default_registry();
    let canvas_state = CanvasState::new(fixture.children.clone());

    let session = create_interaction_via_mouse(
        CanvasPoint::new(40.0, 50.0),
        Modifiers::none(),
        ActiveControl::BoundingArea,
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    let session =
        update_interaction_via_mouse(&session, CanvasPoint::new(0.0, 100.0), Modifiers::none(), None);
    let session =
        update_interaction_via_mouse(&session, CanvasPoint::new(30.0, 150.0), Modifiers::none(), None);

    let fresh = StrategyState::new(
        session.latest_metadata.clone(),
        session.latest_all_element_props.clone(),
    );
    let direct = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &fresh,
        InteractionLifecycle::MidInteraction,
    )?;

    let reset = interaction_hard_reset(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
    )?;

    assert_eq!(reset.patches, direct.patches);

    let data = reset.interaction_session.interaction_data.as_drag().unwrap();
    assert_eq!(data.drag_start, data.original_drag_start);
    assert_eq!(data.drag, Some(CanvasPoint::new(30.0, 150.0)));

    // Resetting the reset session is a no-op.
    let again = interaction_hard_reset(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &reset.interaction_session,
    )?;
    assert_eq!(again.interaction_session, reset.interaction_session);
    assert_eq!(again.patches, reset.patches);
    Ok(())
}

#[test]
fn switching_strategy_mid_gesture_resets_the_scratch_state() {
    let fixture = flow_stack(&[
        DisplayType::Block,
        DisplayType::InlineBlock,
        DisplayType::Block,
    ]);
    let registry = default_registry();
    let canvas_state = CanvasState::new(vec![fixture.children[0].clone()]);
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    // Frame 1: pointer in B's slot; auto-conversion wins and records index 1.
    let session = dragging_session(
        &fixture.editor_state,
        CanvasPoint::new(50.0, 50.0),
        CanvasPoint::new(0.0, 100.0),
    );
    let first = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();
    assert_eq!(
        first.strategy_state.current_strategy,
        Some(FLOW_REORDER_AUTO_CONVERSION)
    );
    assert!(first
        .strategy_state
        .current_strategy_commands
        .iter()
        .any(|c| matches!(c, CanvasCommand::ReorderElement { index: 1, .. })));

    // Frame 2: the user forces same-type-only. The B slot no longer matches,
    // and the remembered index died with the checkpoint, so the frame is an
    // identity.
    let mut preferred_session = session.clone();
    preferred_session.user_preferred_strategy = Some(FLOW_REORDER_SAME_TYPE_ONLY);
    let second = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &preferred_session,
        &first.strategy_state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    assert_eq!(
        second.strategy_state.current_strategy,
        Some(FLOW_REORDER_SAME_TYPE_ONLY)
    );
    assert!(
        !second
            .strategy_state
            .current_strategy_commands
            .iter()
            .any(|c| matches!(c, CanvasCommand::ReorderElement { .. })),
        "the scratch index must not survive a strategy switch"
    );
}

#[test]
fn no_winner_leaves_a_clean_empty_state() {
    let fixture = flow_stack(&[DisplayType::Block, DisplayType::Block, DisplayType::Block]);
    let registry = default_registry();
    // Nothing selected: no strategy applies.
    let canvas_state = CanvasState::new(Vec::new());
    let session = dragging_session(
        &fixture.editor_state,
        CanvasPoint::new(50.0, 50.0),
        CanvasPoint::new(0.0, 100.0),
    );
    let state = StrategyState::new(
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );

    let result = interaction_update(
        &registry,
        &canvas_state,
        &fixture.editor_state,
        &session,
        &state,
        InteractionLifecycle::MidInteraction,
    )
    .unwrap();

    assert_eq!(result.strategy_state.current_strategy, None);
    assert!(result.patches.is_empty());
    assert_eq!(result.strategy_state.sorted_applicable_strategies, Some(Vec::new()));
}

#[test]
fn sessions_round_trip_through_serde() -> anyhow::Result<()> {
    let fixture = absolute_fixture();
    let mut session = create_interaction_via_keyboard(
        [Key::Down, Key::Left],
        Modifiers::shift(),
        ActiveControl::KeyboardCatcher,
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    session.user_preferred_strategy = Some(KEYBOARD_MOVE);

    let json = serde_json::to_string(&session)?;
    let back: InteractionSession = serde_json::from_str(&json)?;
    assert_eq!(back, session);

    let keys = back
        .interaction_data
        .as_keyboard()
        .unwrap()
        .key_states
        .last()
        .unwrap()
        .keys_pressed
        .clone();
    assert_eq!(keys, BTreeSet::from([Key::Left, Key::Down]));
    Ok(())
}

#[test]
fn keyboard_sessions_go_stale_after_the_timeout() {
    let fixture = absolute_fixture();
    let session = create_interaction_via_keyboard(
        [Key::Down],
        Modifiers::none(),
        ActiveControl::KeyboardCatcher,
        fixture.editor_state.metadata.clone(),
        fixture.editor_state.all_element_props.clone(),
    );
    let now = session.last_interaction_time_ms;
    assert!(!keyboard_session_is_stale(&session, now));
    assert!(!keyboard_session_is_stale(
        &session,
        now + KEYBOARD_INTERACTION_TIMEOUT_MS
    ));
    assert!(keyboard_session_is_stale(
        &session,
        now + KEYBOARD_INTERACTION_TIMEOUT_MS + 1
    ));

    // Drag sessions never go stale on the keyboard timeout.
    let drag = dragging_session(
        &fixture.editor_state,
        CanvasPoint::new(0.0, 0.0),
        CanvasPoint::new(10.0, 0.0),
    );
    assert!(!keyboard_session_is_stale(
        &drag,
        drag.last_interaction_time_ms + KEYBOARD_INTERACTION_TIMEOUT_MS * 10
    ));
}
