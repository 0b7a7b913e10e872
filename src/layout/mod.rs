//! Layout state: the column → section → box tree and every mutation on it.
//!
//! All operations take `&mut LayoutState` and return a `LayoutResult`. An
//! operation that fails leaves the tree exactly as it was, so callers that
//! only care about best effort can drop the error.

mod ops;
#[cfg(test)]
mod tests;

pub use ops::LayoutOp;

use crate::model::{
    BoxPatch, Column, ColumnPatch, LayoutBox, Section, SectionPatch, Sections, CanvasPosition,
    MAX_SPLIT_PARTS, MIN_SPLIT_PARTS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const COPY_SUFFIX: &str = " (Copy)";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Column {0} not found")]
    ColumnNotFound(String),
    #[error("Section {section} not found in column {column}")]
    SectionNotFound { column: String, section: String },
    #[error("Box {0} not found")]
    BoxNotFound(String),
    #[error("Column {0} is split; this needs a normal column")]
    SplitMode(String),
    #[error("Column {0} is not split")]
    NotSplit(String),
    #[error("Split parts must be between 2 and 8, got {0}")]
    InvalidSplitParts(usize),
    #[error("Column {column} has no part {part}")]
    PartOutOfRange { column: String, part: usize },
    #[error("Index {index} out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub column: Option<String>,
    pub section: Option<String>,
    pub box_id: Option<String>,
}

/// Where a section lives: its column, its split part (if any) and its index there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLocation {
    pub column: String,
    pub part: Option<usize>,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    pub columns: Vec<Column>,
    #[serde(skip)]
    pub selection: Selection,
}

fn insert_clamped<T>(list: &mut Vec<T>, index: Option<usize>, item: T) {
    let at = index.unwrap_or(list.len()).min(list.len());
    list.insert(at, item);
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> LayoutResult<usize> {
        self.columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| LayoutError::ColumnNotFound(column_id.to_string()))
    }

    fn column_mut(&mut self, column_id: &str) -> LayoutResult<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| LayoutError::ColumnNotFound(column_id.to_string()))
    }

    fn flat_sections(&self, column_id: &str) -> LayoutResult<&Vec<Section>> {
        let column = self
            .column(column_id)
            .ok_or_else(|| LayoutError::ColumnNotFound(column_id.to_string()))?;
        column
            .sections
            .flat()
            .ok_or_else(|| LayoutError::SplitMode(column_id.to_string()))
    }

    fn flat_sections_mut(&mut self, column_id: &str) -> LayoutResult<&mut Vec<Section>> {
        let column = self.column_mut(column_id)?;
        column
            .sections
            .flat_mut()
            .ok_or_else(|| LayoutError::SplitMode(column_id.to_string()))
    }

    fn section_mut(&mut self, column_id: &str, section_id: &str) -> LayoutResult<&mut Section> {
        self.flat_sections_mut(column_id)?
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| LayoutError::SectionNotFound {
                column: column_id.to_string(),
                section: section_id.to_string(),
            })
    }

    fn section(&self, column_id: &str, section_id: &str) -> LayoutResult<&Section> {
        self.flat_sections(column_id)?
            .iter()
            .find(|s| s.id == section_id)
            .ok_or_else(|| LayoutError::SectionNotFound {
                column: column_id.to_string(),
                section: section_id.to_string(),
            })
    }

    fn split_part_mut(&mut self, column_id: &str, part: usize) -> LayoutResult<&mut Vec<Section>> {
        let column = self.column_mut(column_id)?;
        let parts = column
            .sections
            .parts_mut()
            .ok_or_else(|| LayoutError::NotSplit(column_id.to_string()))?;
        parts.get_mut(part).ok_or_else(|| LayoutError::PartOutOfRange {
            column: column_id.to_string(),
            part,
        })
    }

    fn check_split_part(&self, column_id: &str, part: usize) -> LayoutResult<()> {
        let column = self
            .column(column_id)
            .ok_or_else(|| LayoutError::ColumnNotFound(column_id.to_string()))?;
        let parts = column
            .sections
            .parts()
            .ok_or_else(|| LayoutError::NotSplit(column_id.to_string()))?;
        if part < parts.len() {
            Ok(())
        } else {
            Err(LayoutError::PartOutOfRange {
                column: column_id.to_string(),
                part,
            })
        }
    }

    // Columns

    /// Appends an empty normal-mode column and returns its id.
    pub fn add_column(&mut self, title: impl Into<String>) -> String {
        let column = Column::new(title);
        let id = column.id.clone();
        self.columns.push(column);
        id
    }

    pub fn delete_column(&mut self, column_id: &str) -> LayoutResult<Column> {
        let index = self.column_index(column_id)?;
        if self.selection.column.as_deref() == Some(column_id) {
            self.selection.column = None;
        }
        Ok(self.columns.remove(index))
    }

    pub fn update_column(&mut self, column_id: &str, patch: ColumnPatch) -> LayoutResult<()> {
        patch.apply(self.column_mut(column_id)?);
        Ok(())
    }

    pub fn set_column_canvas_position(&mut self, column_id: &str, x: f64, y: f64) -> LayoutResult<()> {
        self.column_mut(column_id)?.canvas_position = Some(CanvasPosition { x, y });
        Ok(())
    }

    /// Removes the column at `from` and reinserts it at `to`. `to` past the end means last.
    pub fn move_column(&mut self, from: usize, to: usize) -> LayoutResult<()> {
        let len = self.columns.len();
        if from >= len {
            return Err(LayoutError::IndexOutOfRange { index: from, len });
        }
        let column = self.columns.remove(from);
        let to = to.min(self.columns.len());
        self.columns.insert(to, column);
        Ok(())
    }

    /// Deep copy inserted right after the original, titled with a ` (Copy)` suffix.
    pub fn clone_column(&mut self, column_id: &str) -> LayoutResult<String> {
        let index = self.column_index(column_id)?;
        let mut copy = self.columns[index].duplicate();
        copy.title.push_str(COPY_SUFFIX);
        let id = copy.id.clone();
        self.columns.insert(index + 1, copy);
        Ok(id)
    }

    /// Distributes the sections round-robin over `parts` lists (`index % parts`).
    /// A column without sections gets one `Part N` placeholder per part.
    pub fn split_column(&mut self, column_id: &str, parts: usize) -> LayoutResult<()> {
        if !(MIN_SPLIT_PARTS..=MAX_SPLIT_PARTS).contains(&parts) {
            return Err(LayoutError::InvalidSplitParts(parts));
        }
        let column = self.column_mut(column_id)?;
        let current = std::mem::take(&mut column.sections).into_flat();
        let mut split: Vec<Vec<Section>> = vec![Vec::new(); parts];
        if current.is_empty() {
            for (i, part) in split.iter_mut().enumerate() {
                part.push(Section::new(format!("Part {}", i + 1)));
            }
        } else {
            for (i, section) in current.into_iter().enumerate() {
                split[i % parts].push(section);
            }
        }
        column.sections = Sections::Split(split);
        Ok(())
    }

    /// Concatenates the parts back into one list, in part order.
    pub fn unsplit_column(&mut self, column_id: &str) -> LayoutResult<()> {
        let column = self.column_mut(column_id)?;
        if !column.is_split() {
            return Err(LayoutError::NotSplit(column_id.to_string()));
        }
        let merged = std::mem::take(&mut column.sections).into_flat();
        column.sections = Sections::Flat(merged);
        Ok(())
    }

    // Sections

    pub fn add_section(&mut self, column_id: &str, title: impl Into<String>) -> LayoutResult<String> {
        let section = Section::new(title);
        let id = section.id.clone();
        self.flat_sections_mut(column_id)?.push(section);
        Ok(id)
    }

    pub fn add_section_to_part(
        &mut self,
        column_id: &str,
        part: usize,
        title: impl Into<String>,
    ) -> LayoutResult<String> {
        let section = Section::new(title);
        let id = section.id.clone();
        self.split_part_mut(column_id, part)?.push(section);
        Ok(id)
    }

    pub fn delete_section(&mut self, column_id: &str, section_id: &str) -> LayoutResult<Section> {
        let sections = self.flat_sections_mut(column_id)?;
        let index = sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| LayoutError::SectionNotFound {
                column: column_id.to_string(),
                section: section_id.to_string(),
            })?;
        let removed = sections.remove(index);
        if self.selection.section.as_deref() == Some(section_id) {
            self.selection.section = None;
        }
        Ok(removed)
    }

    pub fn update_section(
        &mut self,
        column_id: &str,
        section_id: &str,
        patch: SectionPatch,
    ) -> LayoutResult<()> {
        patch.apply(self.section_mut(column_id, section_id)?);
        Ok(())
    }

    pub fn clone_section(&mut self, column_id: &str, section_id: &str) -> LayoutResult<String> {
        let sections = self.flat_sections_mut(column_id)?;
        let index = sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| LayoutError::SectionNotFound {
                column: column_id.to_string(),
                section: section_id.to_string(),
            })?;
        let mut copy = sections[index].duplicate();
        copy.title.push_str(COPY_SUFFIX);
        let id = copy.id.clone();
        sections.insert(index + 1, copy);
        Ok(id)
    }

    /// Moves a section between two normal-mode columns (or within one).
    pub fn move_section(
        &mut self,
        from_column: &str,
        to_column: &str,
        section_id: &str,
        to_index: Option<usize>,
    ) -> LayoutResult<()> {
        self.flat_sections(to_column)?;
        let sections = self.flat_sections_mut(from_column)?;
        let index = sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| LayoutError::SectionNotFound {
                column: from_column.to_string(),
                section: section_id.to_string(),
            })?;
        let section = sections.remove(index);
        insert_clamped(self.flat_sections_mut(to_column)?, to_index, section);
        Ok(())
    }

    /// Moves a section out of any column into one part of a split column.
    pub fn move_section_to_part(
        &mut self,
        from_column: &str,
        section_id: &str,
        to_column: &str,
        part: usize,
        to_index: Option<usize>,
    ) -> LayoutResult<()> {
        self.check_split_part(to_column, part)?;
        let section = self.take_section(from_column, section_id)?;
        insert_clamped(self.split_part_mut(to_column, part)?, to_index, section);
        Ok(())
    }

    /// Copies a section (fresh ids, same title) from any column into a normal
    /// column, or into a split part when `to_part` is given.
    pub fn clone_section_to(
        &mut self,
        from_column: &str,
        section_id: &str,
        to_column: &str,
        to_part: Option<usize>,
        to_index: Option<usize>,
    ) -> LayoutResult<String> {
        let copy = self.any_section(from_column, section_id)?.duplicate();
        let id = copy.id.clone();
        let target = match to_part {
            Some(part) => {
                self.check_split_part(to_column, part)?;
                self.split_part_mut(to_column, part)?
            }
            None => self.flat_sections_mut(to_column)?,
        };
        insert_clamped(target, to_index, copy);
        Ok(id)
    }

    /// Looks a section up in a column of either mode.
    fn any_section(&self, column_id: &str, section_id: &str) -> LayoutResult<&Section> {
        let column = self
            .column(column_id)
            .ok_or_else(|| LayoutError::ColumnNotFound(column_id.to_string()))?;
        let found = column.sections.iter().find(|s| s.id == section_id);
        found.ok_or_else(|| LayoutError::SectionNotFound {
            column: column_id.to_string(),
            section: section_id.to_string(),
        })
    }

    fn any_section_mut(&mut self, column_id: &str, section_id: &str) -> LayoutResult<&mut Section> {
        let column = self.column_mut(column_id)?;
        let found = match &mut column.sections {
            Sections::Flat(list) => list.iter_mut().find(|s| s.id == section_id),
            Sections::Split(parts) => parts.iter_mut().flatten().find(|s| s.id == section_id),
        };
        found.ok_or_else(|| LayoutError::SectionNotFound {
            column: column_id.to_string(),
            section: section_id.to_string(),
        })
    }

    fn take_section(&mut self, column_id: &str, section_id: &str) -> LayoutResult<Section> {
        let not_found = || LayoutError::SectionNotFound {
            column: column_id.to_string(),
            section: section_id.to_string(),
        };
        let column = self.column_mut(column_id)?;
        match &mut column.sections {
            Sections::Flat(list) => {
                let index = list.iter().position(|s| s.id == section_id).ok_or_else(not_found)?;
                Ok(list.remove(index))
            }
            Sections::Split(parts) => {
                for part in parts.iter_mut() {
                    if let Some(index) = part.iter().position(|s| s.id == section_id) {
                        return Ok(part.remove(index));
                    }
                }
                Err(not_found())
            }
        }
    }

    // Boxes

    pub fn add_box(&mut self, column_id: &str, section_id: &str, patch: BoxPatch) -> LayoutResult<String> {
        let created = LayoutBox::from_patch(patch);
        let id = created.id.clone();
        self.section_mut(column_id, section_id)?.boxes.push(created);
        Ok(id)
    }

    pub fn delete_box(&mut self, column_id: &str, section_id: &str, box_id: &str) -> LayoutResult<LayoutBox> {
        let section = self.section_mut(column_id, section_id)?;
        let index = section
            .position_of(box_id)
            .ok_or_else(|| LayoutError::BoxNotFound(box_id.to_string()))?;
        let removed = section.boxes.remove(index);
        if self.selection.box_id.as_deref() == Some(box_id) {
            self.selection.box_id = None;
        }
        Ok(removed)
    }

    pub fn update_box(
        &mut self,
        column_id: &str,
        section_id: &str,
        box_id: &str,
        patch: BoxPatch,
    ) -> LayoutResult<()> {
        let section = self.section_mut(column_id, section_id)?;
        let target = section
            .boxes
            .iter_mut()
            .find(|b| b.id == box_id)
            .ok_or_else(|| LayoutError::BoxNotFound(box_id.to_string()))?;
        target.apply(patch);
        Ok(())
    }

    /// Removes a box from its section and inserts it into the target section
    /// at `to_index` (end when `None`). Both columns must be in normal mode.
    pub fn move_box(
        &mut self,
        from_column: &str,
        from_section: &str,
        to_column: &str,
        to_section: &str,
        box_id: &str,
        to_index: Option<usize>,
    ) -> LayoutResult<()> {
        self.section(to_column, to_section)?;
        let source = self.section_mut(from_column, from_section)?;
        let index = source
            .position_of(box_id)
            .ok_or_else(|| LayoutError::BoxNotFound(box_id.to_string()))?;
        let moved = source.boxes.remove(index);
        insert_clamped(&mut self.section_mut(to_column, to_section)?.boxes, to_index, moved);
        Ok(())
    }

    /// Inserts a copy (fresh id) of a box into the target section.
    pub fn clone_box_to(
        &mut self,
        from_column: &str,
        from_section: &str,
        box_id: &str,
        to_column: &str,
        to_section: &str,
        to_index: Option<usize>,
    ) -> LayoutResult<String> {
        let copy = self
            .section(from_column, from_section)?
            .boxes
            .iter()
            .find(|b| b.id == box_id)
            .map(LayoutBox::duplicate)
            .ok_or_else(|| LayoutError::BoxNotFound(box_id.to_string()))?;
        let id = copy.id.clone();
        insert_clamped(&mut self.section_mut(to_column, to_section)?.boxes, to_index, copy);
        Ok(id)
    }

    // Lookup

    /// Column and section holding a box. Split columns are not searched.
    pub fn find_box(&self, box_id: &str) -> Option<(String, String)> {
        self.columns.iter().find_map(|column| {
            column.sections.flat()?.iter().find_map(|section| {
                section
                    .position_of(box_id)
                    .map(|_| (column.id.clone(), section.id.clone()))
            })
        })
    }

    pub fn find_section(&self, section_id: &str) -> Option<SectionLocation> {
        self.columns.iter().find_map(|column| match &column.sections {
            Sections::Flat(list) => list
                .iter()
                .position(|s| s.id == section_id)
                .map(|index| SectionLocation {
                    column: column.id.clone(),
                    part: None,
                    index,
                }),
            Sections::Split(parts) => parts.iter().enumerate().find_map(|(p, part)| {
                part.iter()
                    .position(|s| s.id == section_id)
                    .map(|index| SectionLocation {
                        column: column.id.clone(),
                        part: Some(p),
                        index,
                    })
            }),
        })
    }

    // Selection

    pub fn select_column(&mut self, column_id: Option<String>) {
        self.selection.column = column_id;
    }

    pub fn select_section(&mut self, section_id: Option<String>) {
        self.selection.section = section_id;
    }

    pub fn select_box(&mut self, box_id: Option<String>) {
        self.selection.box_id = box_id;
    }

    // Whole layout

    pub fn load_layout(&mut self, columns: Vec<Column>) {
        info!(columns = columns.len(), "layout loaded");
        self.columns = columns;
        self.selection = Selection::default();
    }

    pub fn clear_layout(&mut self) {
        self.columns.clear();
        self.selection = Selection::default();
    }

    /// Destroys the current columns and rebuilds them from a plain snapshot by
    /// replaying creation operations, so every entity gets a fresh id. Split
    /// columns come back with the same part count and each section in its
    /// original part.
    pub fn rehydrate(&mut self, snapshot: &[Column]) -> LayoutResult<()> {
        self.clear_layout();
        for source in snapshot {
            let column_id = self.add_column(source.title.clone());
            self.update_column(
                &column_id,
                ColumnPatch {
                    title: None,
                    width: Some(source.width),
                    header_color: source.header_color.clone(),
                    hide_column_header: Some(source.hide_column_header),
                    hide_section_headers: Some(source.hide_section_headers),
                },
            )?;
            if let Some(position) = source.canvas_position {
                self.set_column_canvas_position(&column_id, position.x, position.y)?;
            }
            match &source.sections {
                Sections::Flat(sections) => {
                    for section in sections {
                        let section_id = self.add_section(&column_id, section.title.clone())?;
                        self.replay_section(&column_id, &section_id, section)?;
                    }
                }
                Sections::Split(parts) => {
                    self.column_mut(&column_id)?.sections =
                        Sections::Split(vec![Vec::new(); parts.len()]);
                    for (part, sections) in parts.iter().enumerate() {
                        for section in sections {
                            let section_id =
                                self.add_section_to_part(&column_id, part, section.title.clone())?;
                            self.replay_section(&column_id, &section_id, section)?;
                        }
                    }
                }
            }
        }
        info!(columns = self.columns.len(), "layout rehydrated");
        Ok(())
    }

    /// Copies color and boxes of `source` into a freshly created section.
    fn replay_section(&mut self, column_id: &str, section_id: &str, source: &Section) -> LayoutResult<()> {
        let target = self.any_section_mut(column_id, section_id)?;
        SectionPatch {
            title: None,
            color: source.color.clone(),
        }
        .apply(target);
        for item in &source.boxes {
            target.boxes.push(LayoutBox::from_patch(BoxPatch::from_box(item)));
        }
        Ok(())
    }

    /// The layout shown on first launch.
    pub fn demo() -> Self {
        let mut state = Self::new();
        let demo: [(&str, &str, &[(&str, &str)]); 2] = [
            (
                "Welcome to Explainator",
                "Getting Started",
                &[
                    ("Press c to create more columns", "blue"),
                    ("Press s to add sections", "green"),
                    ("Press b to create content boxes", "purple"),
                ],
            ),
            (
                "Features",
                "Main Features",
                &[
                    ("Grab & drop to reorder", "blue"),
                    ("Export to JSON/HTML/outline", "yellow"),
                    ("Split columns (2-8 parts)", "orange"),
                    ("Create presentation slides", "red"),
                ],
            ),
        ];
        for (column_title, section_title, boxes) in demo {
            let column_id = state.add_column(column_title);
            if let Ok(section_id) = state.add_section(&column_id, section_title) {
                for (text, category) in boxes {
                    let _ = state.add_box(
                        &column_id,
                        &section_id,
                        BoxPatch::text(*text).with_category(*category),
                    );
                }
            }
        }
        state
    }
}
