//! # Canvas commands
//!
//! Strategies emit declarative, serializable [`CanvasCommand`]s; a single
//! applier interprets them against current editor state and produces
//! [`EditorStatePatch`]es. Commands are pure data, not closures, so a frame
//! can be replayed or described without re-invoking strategy code.
//!
//! ## Lifecycle
//!
//! Every command carries a [`WhenToRun`] policy. `Always` commands run both
//! mid-interaction and at commit; `MidInteraction` commands (cursor,
//! highlights) are transient and are skipped at commit, so they never
//! persist once the interaction ends; `OnComplete` commands run only at
//! commit.
//!
//! ## Ordering
//!
//! A command list is folded in emitted order over a working copy of the base
//! state, so later commands observe earlier commands' effects within the
//! same frame. Two frames' lists are never interleaved.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use stencil_common::{ElementPath, PropertyPath};
use stencil_metadata::{AllElementProps, ElementMetadataMap};

/// When in the interaction lifecycle a command is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhenToRun {
    Always,
    MidInteraction,
    OnComplete,
}

/// Which phase the applier is currently folding for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionLifecycle {
    MidInteraction,
    EndInteraction,
}

fn command_runs_in(when_to_run: WhenToRun, lifecycle: InteractionLifecycle) -> bool {
    match when_to_run {
        WhenToRun::Always => true,
        WhenToRun::MidInteraction => lifecycle == InteractionLifecycle::MidInteraction,
        WhenToRun::OnComplete => lifecycle == InteractionLifecycle::EndInteraction,
    }
}

/// Cursor icon shown while an interaction is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CssCursor {
    Default,
    Move,
    NotPermitted,
    ResizeNs,
    ResizeEw,
    ResizeNesw,
    ResizeNwse,
}

/// An atomic, declarative, replayable edit instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanvasCommand {
    /// Move an element to an absolute index among its siblings.
    ReorderElement {
        when_to_run: WhenToRun,
        target: ElementPath,
        index: usize,
    },

    /// Set the canvas cursor icon.
    SetCursor {
        when_to_run: WhenToRun,
        cursor: CssCursor,
    },

    /// Mark elements whose rendered output must refresh.
    SetElementsToRerender {
        when_to_run: WhenToRun,
        targets: Vec<ElementPath>,
    },

    /// Replace the highlighted element set.
    UpdateHighlightedViews {
        when_to_run: WhenToRun,
        targets: Vec<ElementPath>,
    },

    /// Rewrite a property only if it currently resolves to a present value.
    /// Never creates a property; `SetProperty` is the unconditional sibling.
    UpdatePropIfExists {
        when_to_run: WhenToRun,
        element: ElementPath,
        property: PropertyPath,
        value: String,
    },

    /// Create or overwrite a property unconditionally.
    SetProperty {
        when_to_run: WhenToRun,
        element: ElementPath,
        property: PropertyPath,
        value: Value,
    },
}

impl CanvasCommand {
    pub fn when_to_run(&self) -> WhenToRun {
        match self {
            CanvasCommand::ReorderElement { when_to_run, .. }
            | CanvasCommand::SetCursor { when_to_run, .. }
            | CanvasCommand::SetElementsToRerender { when_to_run, .. }
            | CanvasCommand::UpdateHighlightedViews { when_to_run, .. }
            | CanvasCommand::UpdatePropIfExists { when_to_run, .. }
            | CanvasCommand::SetProperty { when_to_run, .. } => *when_to_run,
        }
    }

    /// Does the command change committed document structure or properties,
    /// as opposed to transient presentation?
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CanvasCommand::ReorderElement { .. }
                | CanvasCommand::UpdatePropIfExists { .. }
                | CanvasCommand::SetProperty { .. }
        )
    }
}

// Constructor helpers keep strategy code close to how the command reads.

pub fn reorder_element(when_to_run: WhenToRun, target: ElementPath, index: usize) -> CanvasCommand {
    CanvasCommand::ReorderElement {
        when_to_run,
        target,
        index,
    }
}

pub fn set_cursor_command(when_to_run: WhenToRun, cursor: CssCursor) -> CanvasCommand {
    CanvasCommand::SetCursor {
        when_to_run,
        cursor,
    }
}

pub fn set_elements_to_rerender_command(targets: Vec<ElementPath>) -> CanvasCommand {
    CanvasCommand::SetElementsToRerender {
        when_to_run: WhenToRun::Always,
        targets,
    }
}

pub fn update_highlighted_views(
    when_to_run: WhenToRun,
    targets: Vec<ElementPath>,
) -> CanvasCommand {
    CanvasCommand::UpdateHighlightedViews {
        when_to_run,
        targets,
    }
}

pub fn update_prop_if_exists(
    when_to_run: WhenToRun,
    element: ElementPath,
    property: PropertyPath,
    value: impl Into<String>,
) -> CanvasCommand {
    CanvasCommand::UpdatePropIfExists {
        when_to_run,
        element,
        property,
        value: value.into(),
    }
}

pub fn set_property(
    when_to_run: WhenToRun,
    element: ElementPath,
    property: PropertyPath,
    value: Value,
) -> CanvasCommand {
    CanvasCommand::SetProperty {
        when_to_run,
        element,
        property,
        value,
    }
}

/// The engine-facing slice of committed editor state. The strategy engine
/// never mutates it; [`apply_patch`] is the single writer, fed only by the
/// applier's patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub metadata: ElementMetadataMap,
    pub all_element_props: AllElementProps,
    /// Transient presentation. Cleared by the outer editor when the
    /// interaction ends unless explicitly re-asserted.
    pub cursor: Option<CssCursor>,
    pub highlighted_views: Vec<ElementPath>,
    pub elements_to_rerender: Vec<ElementPath>,
}

impl EditorState {
    pub fn new(metadata: ElementMetadataMap, all_element_props: AllElementProps) -> Self {
        Self {
            metadata,
            all_element_props,
            cursor: None,
            highlighted_views: Vec::new(),
            elements_to_rerender: Vec::new(),
        }
    }
}

/// One opaque, serializable state edit produced by the applier. Merge order
/// and conflict resolution are owned by whoever consumes the patch stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorStatePatch {
    /// Full replacement child order for one parent.
    ElementOrder {
        parent: ElementPath,
        children: Vec<ElementPath>,
    },
    Property {
        element: ElementPath,
        property: PropertyPath,
        value: Value,
    },
    Cursor {
        cursor: Option<CssCursor>,
    },
    HighlightedViews {
        targets: Vec<ElementPath>,
    },
    ElementsToRerender {
        targets: Vec<ElementPath>,
    },
}

/// Human-readable record of what a command did, for history and UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescription {
    pub description: String,
    /// Transient commands never outlive the interaction.
    pub transient: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Target element not found: {0}")]
    TargetNotFound(String),

    #[error("Target element has no measured parent: {0}")]
    ParentNotFound(String),
}

/// Patches plus description for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub patches: Vec<EditorStatePatch>,
    pub description: CommandDescription,
}

/// Interpret one command against the current (already folded) editor state.
pub fn run_canvas_command(
    editor_state: &EditorState,
    command: &CanvasCommand,
) -> Result<CommandResult, CommandError> {
    match command {
        CanvasCommand::ReorderElement { target, index, .. } => {
            run_reorder_element(editor_state, target, *index)
        }
        CanvasCommand::SetCursor { cursor, .. } => Ok(CommandResult {
            patches: vec![EditorStatePatch::Cursor {
                cursor: Some(*cursor),
            }],
            description: CommandDescription {
                description: format!("Set Cursor: {:?}", cursor),
                transient: true,
            },
        }),
        CanvasCommand::SetElementsToRerender { targets, .. } => Ok(CommandResult {
            patches: vec![EditorStatePatch::ElementsToRerender {
                targets: targets.clone(),
            }],
            description: CommandDescription {
                description: format!("Set Elements To Rerender: {} element(s)", targets.len()),
                transient: true,
            },
        }),
        CanvasCommand::UpdateHighlightedViews { targets, .. } => Ok(CommandResult {
            patches: vec![EditorStatePatch::HighlightedViews {
                targets: targets.clone(),
            }],
            description: CommandDescription {
                description: format!("Update Highlighted Views: {} element(s)", targets.len()),
                transient: true,
            },
        }),
        CanvasCommand::UpdatePropIfExists {
            element,
            property,
            value,
            ..
        } => Ok(run_update_prop_if_exists(editor_state, element, property, value)),
        CanvasCommand::SetProperty {
            element,
            property,
            value,
            ..
        } => Ok(CommandResult {
            patches: vec![EditorStatePatch::Property {
                element: element.clone(),
                property: property.clone(),
                value: value.clone(),
            }],
            description: CommandDescription {
                description: format!("Set Property {property} on {element}"),
                transient: false,
            },
        }),
    }
}

fn run_reorder_element(
    editor_state: &EditorState,
    target: &ElementPath,
    index: usize,
) -> Result<CommandResult, CommandError> {
    let metadata = &editor_state.metadata;
    if metadata.find(target).is_none() {
        return Err(CommandError::TargetNotFound(target.to_string()));
    }
    let parent = metadata
        .parent_of(target)
        .cloned()
        .ok_or_else(|| CommandError::ParentNotFound(target.to_string()))?;

    let mut children = metadata.children_of(&parent).to_vec();
    let current_index = children
        .iter()
        .position(|c| c == target)
        .ok_or_else(|| CommandError::ParentNotFound(target.to_string()))?;
    let moved = children.remove(current_index);
    let clamped = index.min(children.len());
    children.insert(clamped, moved);

    Ok(CommandResult {
        patches: vec![EditorStatePatch::ElementOrder {
            parent,
            children,
        }],
        description: CommandDescription {
            description: format!("Reorder Element {target} to index {clamped}"),
            transient: false,
        },
    })
}

/// Consults the *current* folded state, rewrites only when the property
/// presently resolves, and reports a distinct no-op description when it does
/// not. Never creates a property.
fn run_update_prop_if_exists(
    editor_state: &EditorState,
    element: &ElementPath,
    property: &PropertyPath,
    value: &str,
) -> CommandResult {
    let property_exists = editor_state.all_element_props.has(element, property);
    if property_exists {
        CommandResult {
            patches: vec![EditorStatePatch::Property {
                element: element.clone(),
                property: property.clone(),
                value: Value::String(value.to_string()),
            }],
            description: CommandDescription {
                description: format!("Update Prop if Exists {property}={value} on {element}"),
                transient: false,
            },
        }
    } else {
        CommandResult {
            patches: Vec::new(),
            description: CommandDescription {
                description: format!(
                    "Update Prop if Exists did not find existing prop for {property}"
                ),
                transient: false,
            },
        }
    }
}

/// The single writer of [`EditorState`].
pub fn apply_patch(editor_state: &mut EditorState, patch: &EditorStatePatch) {
    match patch {
        EditorStatePatch::ElementOrder { parent, children } => {
            editor_state.metadata.set_children(parent, children.clone());
        }
        EditorStatePatch::Property {
            element,
            property,
            value,
        } => {
            editor_state
                .all_element_props
                .set(element, property, value.clone());
        }
        EditorStatePatch::Cursor { cursor } => {
            editor_state.cursor = *cursor;
        }
        EditorStatePatch::HighlightedViews { targets } => {
            editor_state.highlighted_views = targets.clone();
        }
        EditorStatePatch::ElementsToRerender { targets } => {
            editor_state.elements_to_rerender = targets.clone();
        }
    }
}

/// Result of folding one frame's command list.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldResult {
    pub patches: Vec<EditorStatePatch>,
    pub descriptions: Vec<CommandDescription>,
    /// The base state with every surviving command's patches applied.
    pub final_state: EditorState,
}

/// Run a command list in emitted order against a working copy of the base
/// state, filtered by lifecycle. Later commands see earlier commands'
/// effects; the base state itself is untouched.
pub fn fold_and_apply_command_list(
    editor_state: &EditorState,
    commands: &[CanvasCommand],
    lifecycle: InteractionLifecycle,
) -> Result<FoldResult, CommandError> {
    let mut working = editor_state.clone();
    let mut patches = Vec::new();
    let mut descriptions = Vec::new();

    for command in commands {
        if !command_runs_in(command.when_to_run(), lifecycle) {
            continue;
        }
        let result = run_canvas_command(&working, command)?;
        debug!(description = %result.description.description, "applied canvas command");
        for patch in &result.patches {
            apply_patch(&mut working, patch);
        }
        patches.extend(result.patches);
        descriptions.push(result.description);
    }

    Ok(FoldResult {
        patches,
        descriptions,
        final_state: working,
    })
}
