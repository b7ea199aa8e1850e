//! # Interaction sessions
//!
//! One continuous user gesture, pointer-down to pointer-up or a keyboard
//! sequence, captured as an immutable value. Every input event produces a
//! *new* session value; nothing is mutated in place. That makes each
//! transition trivially replayable, which the hard-reset path relies on.
//!
//! ## Drag threshold
//!
//! A mouse-down followed by sub-pixel jitter must not start selecting
//! strategies, so the raw drag vector is only accepted into `drag` once it
//! exceeds [`MOVE_INTO_DRAG_THRESHOLD`] on either axis. Once accepted, `drag`
//! never returns to `None` for the rest of the session.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};
use stencil_common::{offset_point, point_difference, CanvasPoint, CanvasVector, ElementPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap};

use crate::modifiers::Modifiers;
use crate::strategy::StrategyId;

/// Canvas pixels of movement (strictly greater, per axis) before a
/// mouse-down counts as a drag.
pub const MOVE_INTO_DRAG_THRESHOLD: f64 = 2.0;

/// A keyboard session with no input for this long is considered finished.
pub const KEYBOARD_INTERACTION_TIMEOUT_MS: u64 = 600;

/// A key that participates in keyboard interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
}

/// The live state of a mouse drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragInteractionData {
    pub drag_start: CanvasPoint,
    /// `None` until the move threshold is exceeded; never `None` again after.
    pub drag: Option<CanvasVector>,
    pub prev_drag: Option<CanvasVector>,
    /// Where the gesture originally began. `drag_start` can be re-based by a
    /// hard reset; this never moves.
    pub original_drag_start: CanvasPoint,
    pub modifiers: Modifiers,
    pub global_time_ms: u64,
    pub has_mouse_moved: bool,
}

/// The pressed-key set and modifiers at one instant of a keyboard gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub keys_pressed: BTreeSet<Key>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardInteractionData {
    /// Ordered history of key states; strategies fold over this to count
    /// repeated presses.
    pub key_states: Vec<KeyState>,
}

/// Tagged input variant: what kind of gesture this session is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputData {
    Drag(DragInteractionData),
    Keyboard(KeyboardInteractionData),
}

impl InputData {
    pub fn is_drag(&self) -> bool {
        matches!(self, InputData::Drag(_))
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, InputData::Keyboard(_))
    }

    pub fn as_drag(&self) -> Option<&DragInteractionData> {
        match self {
            InputData::Drag(data) => Some(data),
            InputData::Keyboard(_) => None,
        }
    }

    pub fn as_keyboard(&self) -> Option<&KeyboardInteractionData> {
        match self {
            InputData::Keyboard(data) => Some(data),
            InputData::Drag(_) => None,
        }
    }
}

/// Position of a resize handle on the selection bounds; components are
/// 0, 0.5 or 1 (left/center/right, top/middle/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePosition {
    pub x: f64,
    pub y: f64,
}

/// Which on-canvas control started or updated the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveControl {
    BoundingArea,
    ResizeHandle { edge: EdgePosition },
    FlexGapHandle,
    KeyboardCatcher,
}

/// Pre-interaction path string to its possibly-renamed current path. Paths
/// can be invalidated mid-gesture by a reparent.
pub type UpdatedPathMap = HashMap<String, ElementPath>;

/// One user gesture from start to release. Exactly one session is live at a
/// time; it is created on gesture start and discarded (together with its
/// strategy state) on gesture end or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSession {
    pub interaction_data: InputData,
    pub active_control: ActiveControl,
    pub source_of_update: ActiveControl,
    pub last_interaction_time_ms: u64,
    /// Most recent measurement snapshot; may lag the pointer by a frame or
    /// more. Best available, never assumed to reflect the post-drag layout.
    pub latest_metadata: ElementMetadataMap,
    pub latest_all_element_props: AllElementProps,
    /// Explicit strategy override chosen by the user; wins regardless of
    /// fitness while it stays applicable.
    pub user_preferred_strategy: Option<StrategyId>,
    pub started_at_ms: u64,
    pub updated_target_paths: UpdatedPathMap,
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Start a drag session from a mouse-down. `drag` starts as `None`; the
/// gesture is "not yet dragging" until the threshold passes.
pub fn create_interaction_via_mouse(
    mouse_down_point: CanvasPoint,
    modifiers: Modifiers,
    active_control: ActiveControl,
    metadata: ElementMetadataMap,
    all_element_props: AllElementProps,
) -> InteractionSession {
    let now = current_millis();
    InteractionSession {
        interaction_data: InputData::Drag(DragInteractionData {
            drag_start: mouse_down_point,
            drag: None,
            prev_drag: None,
            original_drag_start: mouse_down_point,
            modifiers,
            global_time_ms: now,
            has_mouse_moved: false,
        }),
        active_control,
        source_of_update: active_control,
        last_interaction_time_ms: now,
        latest_metadata: metadata,
        latest_all_element_props: all_element_props,
        user_preferred_strategy: None,
        started_at_ms: now,
        updated_target_paths: HashMap::new(),
    }
}

fn drag_exceeded_threshold(drag: CanvasVector) -> bool {
    drag.x.abs() > MOVE_INTO_DRAG_THRESHOLD || drag.y.abs() > MOVE_INTO_DRAG_THRESHOLD
}

/// Fold a mouse-move into the session. Keyboard sessions pass through
/// unchanged.
pub fn update_interaction_via_mouse(
    current: &InteractionSession,
    drag: CanvasVector,
    modifiers: Modifiers,
    source_of_update: Option<ActiveControl>,
) -> InteractionSession {
    match &current.interaction_data {
        InputData::Drag(data) => {
            let drag_threshold_passed = data.drag.is_some() || drag_exceeded_threshold(drag);
            InteractionSession {
                interaction_data: InputData::Drag(DragInteractionData {
                    drag_start: data.drag_start,
                    drag: if drag_threshold_passed { Some(drag) } else { None },
                    prev_drag: data.drag,
                    original_drag_start: data.original_drag_start,
                    modifiers,
                    global_time_ms: current_millis(),
                    has_mouse_moved: true,
                }),
                source_of_update: source_of_update.unwrap_or(current.active_control),
                last_interaction_time_ms: current_millis(),
                ..current.clone()
            }
        }
        InputData::Keyboard(_) => current.clone(),
    }
}

/// Start a keyboard session from the first key-down.
pub fn create_interaction_via_keyboard(
    keys_pressed: impl IntoIterator<Item = Key>,
    modifiers: Modifiers,
    active_control: ActiveControl,
    metadata: ElementMetadataMap,
    all_element_props: AllElementProps,
) -> InteractionSession {
    let now = current_millis();
    InteractionSession {
        interaction_data: InputData::Keyboard(KeyboardInteractionData {
            key_states: vec![KeyState {
                keys_pressed: keys_pressed.into_iter().collect(),
                modifiers,
            }],
        }),
        active_control,
        source_of_update: active_control,
        last_interaction_time_ms: now,
        latest_metadata: metadata,
        latest_all_element_props: all_element_props,
        user_preferred_strategy: None,
        started_at_ms: now,
        updated_target_paths: HashMap::new(),
    }
}

/// Fold key presses and releases into the session, appending a new key state.
///
/// When the command modifier is held the new state starts from just the
/// added keys: key-up events are unreliable while cmd is down, so the
/// previous set cannot be trusted. Otherwise the appended state is the
/// previous set with added keys unioned in and released keys removed.
///
/// A keyboard update against a drag session refreshes its modifiers only.
pub fn update_interaction_via_keyboard(
    current: &InteractionSession,
    added_keys_pressed: &[Key],
    keys_released: &[Key],
    modifiers: Modifiers,
    source_of_update: ActiveControl,
) -> InteractionSession {
    match &current.interaction_data {
        InputData::Keyboard(data) => {
            let last_key_state = data.key_states.last();
            let new_key_state = match last_key_state {
                None => KeyState {
                    keys_pressed: added_keys_pressed.iter().copied().collect(),
                    modifiers,
                },
                Some(_) if modifiers.cmd => KeyState {
                    keys_pressed: added_keys_pressed.iter().copied().collect(),
                    modifiers,
                },
                Some(last) => {
                    let mut keys_pressed = last.keys_pressed.clone();
                    for key in added_keys_pressed {
                        keys_pressed.insert(*key);
                    }
                    for key in keys_released {
                        keys_pressed.remove(key);
                    }
                    KeyState {
                        keys_pressed,
                        modifiers,
                    }
                }
            };
            let mut key_states = data.key_states.clone();
            key_states.push(new_key_state);
            InteractionSession {
                interaction_data: InputData::Keyboard(KeyboardInteractionData { key_states }),
                source_of_update,
                last_interaction_time_ms: current_millis(),
                ..current.clone()
            }
        }
        InputData::Drag(data) => InteractionSession {
            interaction_data: InputData::Drag(DragInteractionData {
                modifiers,
                ..data.clone()
            }),
            source_of_update: current.active_control,
            last_interaction_time_ms: current_millis(),
            ..current.clone()
        },
    }
}

/// Collapse the gesture history into one equivalent step so it can be
/// replayed from scratch against new state.
///
/// For a drag this re-bases `drag_start` to the original start point and
/// recomputes the net drag as the difference between the original start and
/// the current effective point. For a keyboard gesture only the last key
/// state survives. Idempotent: resetting a reset session changes nothing.
pub fn interaction_data_hard_reset(interaction_data: &InputData) -> InputData {
    match interaction_data {
        InputData::Drag(data) => match data.drag {
            None => interaction_data.clone(),
            Some(current_drag) => InputData::Drag(DragInteractionData {
                drag_start: data.original_drag_start,
                drag: Some(point_difference(
                    data.original_drag_start,
                    offset_point(data.drag_start, current_drag),
                )),
                ..data.clone()
            }),
        },
        InputData::Keyboard(data) => InputData::Keyboard(KeyboardInteractionData {
            key_states: match data.key_states.last() {
                None => Vec::new(),
                Some(last) => vec![last.clone()],
            },
        }),
    }
}

/// See [`interaction_data_hard_reset`].
pub fn interaction_session_hard_reset(session: &InteractionSession) -> InteractionSession {
    InteractionSession {
        interaction_data: interaction_data_hard_reset(&session.interaction_data),
        ..session.clone()
    }
}

/// Did any of the four modifier flags change between two drag inputs? Used
/// to force strategy re-evaluation when modifiers change without movement.
pub fn has_drag_modifiers_changed(
    prev_interaction_data: Option<&InputData>,
    interaction_data: Option<&InputData>,
) -> bool {
    match (
        prev_interaction_data.and_then(InputData::as_drag),
        interaction_data.and_then(InputData::as_drag),
    ) {
        (Some(prev), Some(current)) => prev.modifiers != current.modifiers,
        _ => false,
    }
}

/// Swap in fresh measurement snapshots mid-gesture.
pub fn update_session_metadata(
    session: &InteractionSession,
    metadata: ElementMetadataMap,
    all_element_props: AllElementProps,
) -> InteractionSession {
    InteractionSession {
        latest_metadata: metadata,
        latest_all_element_props: all_element_props,
        ..session.clone()
    }
}

/// A keyboard gesture with no input for the timeout window is over.
pub fn keyboard_session_is_stale(session: &InteractionSession, now_ms: u64) -> bool {
    session.interaction_data.is_keyboard()
        && now_ms.saturating_sub(session.last_interaction_time_ms) > KEYBOARD_INTERACTION_TIMEOUT_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_common::CanvasPoint;

    fn drag_session(start: CanvasPoint) -> InteractionSession {
        create_interaction_via_mouse(
            start,
            Modifiers::none(),
            ActiveControl::BoundingArea,
            ElementMetadataMap::new(),
            AllElementProps::new(),
        )
    }

    #[test]
    fn test_drag_starts_below_threshold() {
        let session = drag_session(CanvasPoint::new(10.0, 10.0));
        let drag = session.interaction_data.as_drag().unwrap();
        assert_eq!(drag.drag, None);
        assert!(!drag.has_mouse_moved);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let session = drag_session(CanvasPoint::new(0.0, 0.0));
        let at_threshold = update_interaction_via_mouse(
            &session,
            CanvasPoint::new(MOVE_INTO_DRAG_THRESHOLD, MOVE_INTO_DRAG_THRESHOLD),
            Modifiers::none(),
            None,
        );
        assert_eq!(at_threshold.interaction_data.as_drag().unwrap().drag, None);

        let past = update_interaction_via_mouse(
            &at_threshold,
            CanvasPoint::new(MOVE_INTO_DRAG_THRESHOLD + 0.1, 0.0),
            Modifiers::none(),
            None,
        );
        assert!(past.interaction_data.as_drag().unwrap().drag.is_some());
    }

    #[test]
    fn test_drag_never_returns_to_none() {
        let session = drag_session(CanvasPoint::new(0.0, 0.0));
        let dragging = update_interaction_via_mouse(
            &session,
            CanvasPoint::new(10.0, 0.0),
            Modifiers::none(),
            None,
        );
        // Back within the threshold: still a drag.
        let returned = update_interaction_via_mouse(
            &dragging,
            CanvasPoint::new(0.5, 0.5),
            Modifiers::none(),
            None,
        );
        let data = returned.interaction_data.as_drag().unwrap();
        assert_eq!(data.drag, Some(CanvasPoint::new(0.5, 0.5)));
        assert_eq!(data.prev_drag, Some(CanvasPoint::new(10.0, 0.0)));
    }

    #[test]
    fn test_hard_reset_is_idempotent_for_drag() {
        let session = drag_session(CanvasPoint::new(5.0, 5.0));
        let dragging = update_interaction_via_mouse(
            &session,
            CanvasPoint::new(20.0, -7.0),
            Modifiers::none(),
            None,
        );
        let once = interaction_session_hard_reset(&dragging);
        let twice = interaction_session_hard_reset(&once);
        assert_eq!(once, twice);
        // Net point is preserved.
        let data = once.interaction_data.as_drag().unwrap();
        assert_eq!(data.drag_start, CanvasPoint::new(5.0, 5.0));
        assert_eq!(data.drag, Some(CanvasPoint::new(20.0, -7.0)));
    }

    #[test]
    fn test_hard_reset_noop_before_threshold() {
        let session = drag_session(CanvasPoint::new(5.0, 5.0));
        let reset = interaction_session_hard_reset(&session);
        assert_eq!(session.interaction_data, reset.interaction_data);
    }

    #[test]
    fn test_hard_reset_collapses_keyboard_history() {
        let session = create_interaction_via_keyboard(
            [Key::Left],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
            ElementMetadataMap::new(),
            AllElementProps::new(),
        );
        let second = update_interaction_via_keyboard(
            &session,
            &[Key::Down],
            &[],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
        );
        let reset = interaction_session_hard_reset(&second);
        let data = reset.interaction_data.as_keyboard().unwrap();
        assert_eq!(data.key_states.len(), 1);
        assert!(data.key_states[0].keys_pressed.contains(&Key::Left));
        assert!(data.key_states[0].keys_pressed.contains(&Key::Down));
        assert_eq!(
            interaction_session_hard_reset(&reset).interaction_data,
            reset.interaction_data
        );
    }

    #[test]
    fn test_keyboard_merge_folds_adds_and_releases() {
        let session = create_interaction_via_keyboard(
            [Key::Left],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
            ElementMetadataMap::new(),
            AllElementProps::new(),
        );
        let step1 = update_interaction_via_keyboard(
            &session,
            &[Key::Up],
            &[],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
        );
        let step2 = update_interaction_via_keyboard(
            &step1,
            &[],
            &[Key::Left],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
        );
        let data = step2.interaction_data.as_keyboard().unwrap();
        let last = data.key_states.last().unwrap();
        assert_eq!(
            last.keys_pressed,
            BTreeSet::from([Key::Up]),
            "left released, up still held"
        );
    }

    #[test]
    fn test_cmd_modifier_starts_fresh_key_state() {
        let session = create_interaction_via_keyboard(
            [Key::Left],
            Modifiers::none(),
            ActiveControl::KeyboardCatcher,
            ElementMetadataMap::new(),
            AllElementProps::new(),
        );
        let step = update_interaction_via_keyboard(
            &session,
            &[Key::Down],
            &[],
            Modifiers::cmd(),
            ActiveControl::KeyboardCatcher,
        );
        let data = step.interaction_data.as_keyboard().unwrap();
        let last = data.key_states.last().unwrap();
        // Left is dropped: key-up is unreliable while cmd is held.
        assert_eq!(last.keys_pressed, BTreeSet::from([Key::Down]));
    }

    #[test]
    fn test_modifier_change_detection() {
        let session = drag_session(CanvasPoint::new(0.0, 0.0));
        let moved = update_interaction_via_mouse(
            &session,
            CanvasPoint::new(10.0, 0.0),
            Modifiers::none(),
            None,
        );
        let shifted = update_interaction_via_mouse(
            &moved,
            CanvasPoint::new(10.0, 0.0),
            Modifiers::shift(),
            None,
        );
        assert!(has_drag_modifiers_changed(
            Some(&moved.interaction_data),
            Some(&shifted.interaction_data),
        ));
        assert!(!has_drag_modifiers_changed(
            Some(&moved.interaction_data),
            Some(&moved.interaction_data),
        ));
        assert!(!has_drag_modifiers_changed(None, Some(&moved.interaction_data)));
    }

    #[test]
    fn test_keyboard_update_on_drag_session_refreshes_modifiers_only() {
        let session = drag_session(CanvasPoint::new(0.0, 0.0));
        let updated = update_interaction_via_keyboard(
            &session,
            &[Key::Left],
            &[],
            Modifiers::alt(),
            ActiveControl::KeyboardCatcher,
        );
        let data = updated.interaction_data.as_drag().unwrap();
        assert_eq!(data.modifiers, Modifiers::alt());
        assert_eq!(data.drag, None);
    }
}
