//! Shared fixtures: a vertical stack of flow siblings under one root.

#![allow(dead_code)]

use std::sync::Once;

use stencil_canvas::{
    create_interaction_via_mouse, update_interaction_via_mouse, ActiveControl, EditorState,
    InteractionSession, Modifiers,
};
use stencil_common::{CanvasPoint, CanvasRect, CanvasVector, ElementPath};
use stencil_metadata::{
    AllElementProps, DisplayType, ElementInstanceMetadata, ElementMetadataMap, LayoutSystem,
    PositionType, SpecialSizeMeasurements,
};

pub const CHILD_SIZE: f64 = 100.0;

static TRACING: Once = Once::new();

/// Route engine tracing through the test harness so `--nocapture` shows the
/// per-frame strategy scores.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub struct StackFixture {
    pub editor_state: EditorState,
    pub root: ElementPath,
    pub children: Vec<ElementPath>,
}

/// Build a root with `displays.len()` children stacked vertically, each
/// 100x100, child `i` spanning y ∈ [i*100, (i+1)*100).
pub fn flow_stack(displays: &[DisplayType]) -> StackFixture {
    flow_stack_with_generated(displays, &[])
}

pub fn flow_stack_with_generated(
    displays: &[DisplayType],
    generated_indices: &[usize],
) -> StackFixture {
    init_tracing();
    let root = ElementPath::from_parts(["root"]);
    let uids = ["a", "b", "c", "d", "e", "f"];
    let children: Vec<ElementPath> = displays
        .iter()
        .enumerate()
        .map(|(i, _)| root.append(uids[i]))
        .collect();

    let mut elements = vec![ElementInstanceMetadata {
        element_path: root.clone(),
        global_frame: CanvasRect::new(0.0, 0.0, CHILD_SIZE, CHILD_SIZE * displays.len() as f64),
        special_size_measurements: SpecialSizeMeasurements {
            display: DisplayType::Block,
            position: PositionType::Static,
            parent_layout_system: LayoutSystem::Flow,
        },
        parent_path: None,
        children: children.clone(),
        generated: false,
    }];
    for (i, (path, display)) in children.iter().zip(displays).enumerate() {
        elements.push(ElementInstanceMetadata {
            element_path: path.clone(),
            global_frame: CanvasRect::new(0.0, i as f64 * CHILD_SIZE, CHILD_SIZE, CHILD_SIZE),
            special_size_measurements: SpecialSizeMeasurements {
                display: *display,
                position: PositionType::Static,
                parent_layout_system: LayoutSystem::Flow,
            },
            parent_path: Some(root.clone()),
            children: Vec::new(),
            generated: generated_indices.contains(&i),
        });
    }

    StackFixture {
        editor_state: EditorState::new(
            ElementMetadataMap::from_elements(elements),
            AllElementProps::new(),
        ),
        root,
        children,
    }
}

/// An absolutely positioned element alone under the root.
pub fn absolute_fixture() -> StackFixture {
    init_tracing();
    let root = ElementPath::from_parts(["root"]);
    let target = root.append("floating");
    let elements = vec![
        ElementInstanceMetadata {
            element_path: root.clone(),
            global_frame: CanvasRect::new(0.0, 0.0, 400.0, 400.0),
            special_size_measurements: SpecialSizeMeasurements {
                display: DisplayType::Block,
                position: PositionType::Static,
                parent_layout_system: LayoutSystem::Flow,
            },
            parent_path: None,
            children: vec![target.clone()],
            generated: false,
        },
        ElementInstanceMetadata {
            element_path: target.clone(),
            global_frame: CanvasRect::new(20.0, 30.0, 50.0, 60.0),
            special_size_measurements: SpecialSizeMeasurements {
                display: DisplayType::Block,
                position: PositionType::Absolute,
                parent_layout_system: LayoutSystem::Flow,
            },
            parent_path: Some(root.clone()),
            children: Vec::new(),
            generated: false,
        },
    ];
    StackFixture {
        editor_state: EditorState::new(
            ElementMetadataMap::from_elements(elements),
            AllElementProps::new(),
        ),
        root,
        children: vec![target],
    }
}

/// A bounding-area drag session that has already passed the move threshold.
pub fn dragging_session(
    editor_state: &EditorState,
    start: CanvasPoint,
    drag: CanvasVector,
) -> InteractionSession {
    let session = create_interaction_via_mouse(
        start,
        Modifiers::none(),
        ActiveControl::BoundingArea,
        editor_state.metadata.clone(),
        editor_state.all_element_props.clone(),
    );
    update_interaction_via_mouse(&session, drag, Modifiers::none(), None)
}
