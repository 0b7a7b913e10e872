//! Turns a finished drag gesture into layout operations.
//!
//! Planning is pure: it reads the current columns and returns the ops to run,
//! the caller applies them with [`LayoutState::apply_all`].

use crate::layout::{LayoutOp, LayoutState};
use crate::model::MIN_SPLIT_PARTS;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Box {
        column: String,
        section: String,
        id: String,
    },
    Section {
        column: String,
        /// Set when the section was picked up from a split part.
        part: Option<usize>,
        id: String,
    },
    Column {
        id: String,
    },
}

impl DragItem {
    pub fn id(&self) -> &str {
        match self {
            DragItem::Box { id, .. } | DragItem::Section { id, .. } | DragItem::Column { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on a box: insert at that box's index.
    Box {
        column: String,
        section: String,
        box_id: String,
        index: usize,
    },
    /// Dropped on a section: boxes are appended, sections take its slot.
    Section {
        column: String,
        part: Option<usize>,
        section: String,
        index: usize,
    },
    SplitPart {
        column: String,
        part: usize,
        index: Option<usize>,
    },
    Column {
        id: String,
    },
}

impl DropTarget {
    pub fn id(&self) -> &str {
        match self {
            DropTarget::Box { box_id, .. } => box_id,
            DropTarget::Section { section, .. } => section,
            DropTarget::SplitPart { column, .. } => column,
            DropTarget::Column { id } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl/Cmd: copy instead of move.
    pub clone: bool,
    /// Alt: do not carry the split layout over to a normal column.
    pub alt: bool,
}

pub fn plan_drop(
    item: &DragItem,
    target: &DropTarget,
    modifiers: Modifiers,
    selected_boxes: &[String],
    state: &LayoutState,
) -> Vec<LayoutOp> {
    if item.id() == target.id() {
        return Vec::new();
    }
    let ops = match item {
        DragItem::Box {
            column,
            section,
            id,
        } => plan_box_drop(column, section, id, target, modifiers, selected_boxes, state),
        DragItem::Section { column, part, id } => {
            plan_section_drop(column, *part, id, target, modifiers, state)
        }
        DragItem::Column { id } => plan_column_drop(id, target, state),
    };
    debug!(?item, ?target, ops = ops.len(), "drop planned");
    ops
}

fn box_op(
    clone: bool,
    from_column: String,
    from_section: String,
    box_id: String,
    to_column: &str,
    to_section: &str,
    to_index: Option<usize>,
) -> LayoutOp {
    if clone {
        LayoutOp::CloneBoxTo {
            from_column,
            from_section,
            box_id,
            to_column: to_column.to_string(),
            to_section: to_section.to_string(),
            to_index,
        }
    } else {
        LayoutOp::MoveBox {
            from_column,
            from_section,
            to_column: to_column.to_string(),
            to_section: to_section.to_string(),
            box_id,
            to_index,
        }
    }
}

fn plan_box_drop(
    column: &str,
    section: &str,
    id: &str,
    target: &DropTarget,
    modifiers: Modifiers,
    selected_boxes: &[String],
    state: &LayoutState,
) -> Vec<LayoutOp> {
    let (to_column, to_section, to_index) = match target {
        DropTarget::Box {
            column,
            section,
            index,
            ..
        } => (column.as_str(), section.as_str(), Some(*index)),
        DropTarget::Section {
            column, section, ..
        } => (column.as_str(), section.as_str(), None),
        _ => return Vec::new(),
    };

    let group = selected_boxes.len() > 1 && selected_boxes.iter().any(|b| b == id);
    if !group {
        return vec![box_op(
            modifiers.clone,
            column.to_string(),
            section.to_string(),
            id.to_string(),
            to_column,
            to_section,
            to_index,
        )];
    }

    let mut insert_at = to_index;
    let mut ops = Vec::with_capacity(selected_boxes.len());
    for box_id in selected_boxes {
        // boxes inside split columns are not found and stay where they are
        let Some((from_column, from_section)) = state.find_box(box_id) else {
            continue;
        };
        ops.push(box_op(
            modifiers.clone,
            from_column,
            from_section,
            box_id.clone(),
            to_column,
            to_section,
            insert_at,
        ));
        insert_at = insert_at.map(|i| i + 1);
    }
    ops
}

fn plan_section_drop(
    from_column: &str,
    from_part: Option<usize>,
    id: &str,
    target: &DropTarget,
    modifiers: Modifiers,
    state: &LayoutState,
) -> Vec<LayoutOp> {
    let (to_column, explicit_part, to_index) = match target {
        DropTarget::SplitPart {
            column,
            part,
            index,
        } => (column.as_str(), Some(*part), *index),
        DropTarget::Section {
            column,
            part,
            index,
            ..
        } => (column.as_str(), *part, Some(*index)),
        DropTarget::Column { id } => (id.as_str(), None, None),
        DropTarget::Box { .. } => return Vec::new(),
    };
    let target_column_split = state.column(to_column).is_some_and(|c| c.is_split());
    let to_part = explicit_part.or(target_column_split.then_some(0));

    let section_op = |part: Option<usize>, index: Option<usize>| -> LayoutOp {
        match (modifiers.clone, part) {
            (true, _) => LayoutOp::CloneSectionTo {
                from_column: from_column.to_string(),
                section: id.to_string(),
                to_column: to_column.to_string(),
                to_part: part,
                to_index: index,
            },
            (false, Some(part)) => LayoutOp::MoveSectionToPart {
                from_column: from_column.to_string(),
                section: id.to_string(),
                to_column: to_column.to_string(),
                part,
                to_index: index,
            },
            (false, None) => LayoutOp::MoveSection {
                from_column: from_column.to_string(),
                to_column: to_column.to_string(),
                section: id.to_string(),
                to_index: index,
            },
        }
    };

    if to_part.is_some() {
        return vec![section_op(to_part, to_index)];
    }
    if from_part.is_some() && !modifiers.alt {
        let parts = state
            .column(from_column)
            .filter(|c| c.is_split())
            .map_or(MIN_SPLIT_PARTS, |c| c.split_parts());
        return vec![
            LayoutOp::SplitColumn {
                column: to_column.to_string(),
                parts,
            },
            section_op(Some(0), None),
        ];
    }
    vec![section_op(None, to_index)]
}

fn plan_column_drop(id: &str, target: &DropTarget, state: &LayoutState) -> Vec<LayoutOp> {
    let DropTarget::Column { id: over } = target else {
        return Vec::new();
    };
    match (state.column_index(id), state.column_index(over)) {
        (Ok(from), Ok(to)) => vec![LayoutOp::MoveColumn { from, to }],
        _ => Vec::new(),
    }
}
