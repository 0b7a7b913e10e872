use super::{LayoutResult, LayoutState};
use tracing::{debug, warn};

/// A layout mutation as data. Drop plans are lists of these so they can be
/// computed without touching state and replayed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOp {
    MoveColumn {
        from: usize,
        to: usize,
    },
    SplitColumn {
        column: String,
        parts: usize,
    },
    MoveSection {
        from_column: String,
        to_column: String,
        section: String,
        to_index: Option<usize>,
    },
    MoveSectionToPart {
        from_column: String,
        section: String,
        to_column: String,
        part: usize,
        to_index: Option<usize>,
    },
    CloneSectionTo {
        from_column: String,
        section: String,
        to_column: String,
        to_part: Option<usize>,
        to_index: Option<usize>,
    },
    MoveBox {
        from_column: String,
        from_section: String,
        to_column: String,
        to_section: String,
        box_id: String,
        to_index: Option<usize>,
    },
    CloneBoxTo {
        from_column: String,
        from_section: String,
        box_id: String,
        to_column: String,
        to_section: String,
        to_index: Option<usize>,
    },
}

impl LayoutOp {
    pub fn apply(&self, state: &mut LayoutState) -> LayoutResult<()> {
        match self {
            LayoutOp::MoveColumn { from, to } => state.move_column(*from, *to),
            LayoutOp::SplitColumn { column, parts } => state.split_column(column, *parts),
            LayoutOp::MoveSection {
                from_column,
                to_column,
                section,
                to_index,
            } => state.move_section(from_column, to_column, section, *to_index),
            LayoutOp::MoveSectionToPart {
                from_column,
                section,
                to_column,
                part,
                to_index,
            } => state.move_section_to_part(from_column, section, to_column, *part, *to_index),
            LayoutOp::CloneSectionTo {
                from_column,
                section,
                to_column,
                to_part,
                to_index,
            } => state
                .clone_section_to(from_column, section, to_column, *to_part, *to_index)
                .map(|_| ()),
            LayoutOp::MoveBox {
                from_column,
                from_section,
                to_column,
                to_section,
                box_id,
                to_index,
            } => state.move_box(from_column, from_section, to_column, to_section, box_id, *to_index),
            LayoutOp::CloneBoxTo {
                from_column,
                from_section,
                box_id,
                to_column,
                to_section,
                to_index,
            } => state
                .clone_box_to(from_column, from_section, box_id, to_column, to_section, *to_index)
                .map(|_| ()),
        }
    }
}

impl LayoutState {
    /// Applies ops in order. An op that fails is logged and skipped, the rest
    /// still run. Returns how many ops succeeded.
    pub fn apply_all(&mut self, ops: &[LayoutOp]) -> usize {
        let mut applied = 0;
        for op in ops {
            match op.apply(self) {
                Ok(()) => {
                    debug!(?op, "layout op applied");
                    applied += 1;
                }
                Err(e) => warn!(?op, error = %e, "layout op skipped"),
            }
        }
        applied
    }
}
