use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stencil_canvas::{
    create_interaction_via_mouse, default_registry, find_canvas_strategy, interaction_update,
    update_interaction_via_mouse, ActiveControl, CanvasState, EditorState, InteractionLifecycle,
    Modifiers, StrategyState,
};
use stencil_common::{CanvasPoint, CanvasRect, ElementPath};
use stencil_metadata::{
    AllElementProps, DisplayType, ElementInstanceMetadata, ElementMetadataMap, LayoutSystem,
    PositionType, SpecialSizeMeasurements,
};

const SIBLINGS: usize = 50;

fn wide_flow_stack() -> (EditorState, Vec<ElementPath>) {
    let root = ElementPath::from_parts(["root"]);
    let children: Vec<ElementPath> = (0..SIBLINGS)
        .map(|i| root.append(format!("child-{i}")))
        .collect();
    let measurements = |display| SpecialSizeMeasurements {
        display,
        position: PositionType::Static,
        parent_layout_system: LayoutSystem::Flow,
    };
    let mut elements = vec![ElementInstanceMetadata {
        element_path: root.clone(),
        global_frame: CanvasRect::new(0.0, 0.0, 100.0, 100.0 * SIBLINGS as f64),
        special_size_measurements: measurements(DisplayType::Block),
        parent_path: None,
        children: children.clone(),
        generated: false,
    }];
    for (i, path) in children.iter().enumerate() {
        let display = if i % 2 == 0 {
            DisplayType::Block
        } else {
            DisplayType::InlineBlock
        };
        elements.push(ElementInstanceMetadata {
            element_path: path.clone(),
            global_frame: CanvasRect::new(0.0, i as f64 * 100.0, 100.0, 100.0),
            special_size_measurements: measurements(display),
            parent_path: Some(root.clone()),
            children: Vec::new(),
            generated: false,
        });
    }
    (
        EditorState::new(
            ElementMetadataMap::from_elements(elements),
            AllElementProps::new(),
        ),
        children,
    )
}

fn bench_strategy_selection(c: &mut Criterion) {
    let (editor_state, children) = wide_flow_stack();
    let registry = default_registry();
    let canvas_state = CanvasState::new(vec![children[0].clone()]);
    let session = create_interaction_via_mouse(
        CanvasPoint::new(50.0, 50.0),
        Modifiers::none(),
        ActiveControl::BoundingArea,
        editor_state.metadata.clone(),
        editor_state.all_element_props.clone(),
    );
    let session = update_interaction_via_mouse(
        &session,
        CanvasPoint::new(0.0, 100.0 * (SIBLINGS / 2) as f64),
        Modifiers::none(),
        None,
    );
    let state = StrategyState::new(
        editor_state.metadata.clone(),
        editor_state.all_element_props.clone(),
    );

    c.bench_function("find_canvas_strategy/50-siblings", |b| {
        b.iter(|| {
            black_box(find_canvas_strategy(
                &registry,
                black_box(&canvas_state),
                black_box(&session),
                black_box(&state),
            ))
        })
    });

    c.bench_function("interaction_update/flow-reorder-50-siblings", |b| {
        b.iter(|| {
            black_box(
                interaction_update(
                    &registry,
                    black_box(&canvas_state),
                    black_box(&editor_state),
                    black_box(&session),
                    black_box(&state),
                    InteractionLifecycle::MidInteraction,
                )
                .unwrap(),
            )
        })
    });
}

criterion_group!(benches, bench_strategy_selection);
criterion_main!(benches);
