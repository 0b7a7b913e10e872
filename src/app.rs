use crate::config::AppConfig;
use crate::dnd::DragItem;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::model::{Column, Section, Sections};
use crate::projects::ProjectLibrary;
use crate::storage::{Storage, PROJECTS_KEY};
use crate::workspace::Workspace;
use std::fmt::Display;
use tracing::{error, info, warn};

/// What a confirmed edit buffer is applied to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    ColumnTitle { column: String },
    SectionTitle { column: String, section: String },
    /// Split columns get the title first; the section is created on confirm.
    NewSectionInPart { column: String, part: usize },
    BoxText { column: String, section: String, box_id: String },
    SplitParts { column: String },
    NewSlide,
    SaveProject,
    LoadProject,
    ExportFile(ExportFormat),
    ImportFile,
    BatchImport { column: String, section: String },
    ImageSource { column: String, section: String },
    TextColor { column: String, section: String, box_id: String },
    HeaderColor { column: String },
    NewCategory,
    EditCategory { key: String },
    Notes,
}

impl EditTarget {
    pub fn label(&self) -> &'static str {
        match self {
            EditTarget::ColumnTitle { .. } => "Column title",
            EditTarget::SectionTitle { .. } | EditTarget::NewSectionInPart { .. } => {
                "Section title"
            }
            EditTarget::BoxText { .. } => "Box text",
            EditTarget::SplitParts { .. } => "Split into parts (2-8)",
            EditTarget::NewSlide => "Slide name",
            EditTarget::SaveProject => "Save project as",
            EditTarget::LoadProject => "Load project",
            EditTarget::ExportFile(_) => "Export to file",
            EditTarget::ImportFile => "Import from file",
            EditTarget::BatchImport { .. } => "Batch import file",
            EditTarget::ImageSource { .. } => "Image path or URL",
            EditTarget::TextColor { .. } => "Text color",
            EditTarget::HeaderColor { .. } => "Header color",
            EditTarget::NewCategory => "New category (name #color1 #color2 #text)",
            EditTarget::EditCategory { .. } => "Category (name #color1 #color2 #text)",
            EditTarget::Notes => "Notes",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing {
        target: EditTarget,
        buffer: String,
        cursor_pos: usize,
    },
    /// Carrying an item around until it is dropped or the grab is cancelled.
    Grab { item: DragItem },
    /// Showing slides; `working` is the layout to put back afterwards.
    Presentation { working: Vec<Column> },
    Help,
}

/// One selectable line of a column: a section header or a box under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section {
        id: String,
        part: Option<usize>,
        index: usize,
    },
    Box {
        section: String,
        id: String,
        index: usize,
    },
}

fn push_section_rows(rows: &mut Vec<Row>, sections: &[Section], part: Option<usize>) {
    for (index, section) in sections.iter().enumerate() {
        rows.push(Row::Section {
            id: section.id.clone(),
            part,
            index,
        });
        rows.extend(section.boxes.iter().enumerate().map(|(index, b)| Row::Box {
            section: section.id.clone(),
            id: b.id.clone(),
            index,
        }));
    }
}

/// Rows of a column top to bottom. Split parts are listed one after another.
pub fn column_rows(column: &Column) -> Vec<Row> {
    let mut rows = Vec::new();
    match &column.sections {
        Sections::Flat(list) => push_section_rows(&mut rows, list, None),
        Sections::Split(parts) => {
            for (part, list) in parts.iter().enumerate() {
                push_section_rows(&mut rows, list, Some(part));
            }
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub column: usize,
    pub row: usize,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub workspace: Workspace,
    pub projects: ProjectLibrary,
    pub storage: Option<Storage>,
    pub config: AppConfig,
    pub cursor: Cursor,
    /// Box ids marked for a group drag, in marking order.
    pub marked: Vec<String>,

    // Viewport state
    pub first_column: usize,
    pub terminal_width: u16,
    pub terminal_height: u16,

    // Message for status line
    pub message: Option<String>,

    pub clipboard: Option<String>,
}

impl AppState {
    /// In-memory state with nothing written anywhere.
    pub fn new(config: AppConfig, workspace: Workspace) -> Self {
        let mut app = Self {
            running: true,
            mode: AppMode::Normal,
            workspace,
            projects: ProjectLibrary::new(),
            storage: None,
            config,
            cursor: Cursor::default(),
            marked: Vec::new(),
            first_column: 0,
            terminal_width: 80,
            terminal_height: 24,
            message: None,
            clipboard: None,
        };
        app.clamp_cursor();
        app
    }

    /// Loads the workspace and project library from the configured data directory.
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let storage = Storage::open(&config.data_dir)?;
        let workspace = Workspace::load(&storage, config.demo_on_first_run)?;
        let projects = storage.load(PROJECTS_KEY)?.unwrap_or_default();
        info!(dir = %storage.dir().display(), "workspace opened");
        let mut app = Self::new(config, workspace);
        app.projects = projects;
        app.storage = Some(storage);
        Ok(app)
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Shows a failed operation in the status line, with column ids replaced
    /// by the column titles.
    pub fn report(&mut self, err: impl Display) {
        warn!(%err, "action failed");
        let message = self
            .workspace
            .layout
            .columns
            .iter()
            .fold(err.to_string(), |msg, column| {
                msg.replace(&column.id, &format!("\"{}\"", column.title))
            });
        self.set_message(message);
    }

    // Cursor

    pub fn current_column(&self) -> Option<&Column> {
        self.workspace.layout.columns.get(self.cursor.column)
    }

    pub fn current_column_id(&self) -> Option<String> {
        self.current_column().map(|c| c.id.clone())
    }

    pub fn current_rows(&self) -> Vec<Row> {
        self.current_column().map(column_rows).unwrap_or_default()
    }

    pub fn current_row(&self) -> Option<Row> {
        self.current_rows().into_iter().nth(self.cursor.row)
    }

    /// Column and section under the cursor; on a box row, the box's section.
    pub fn focused_section(&self) -> Option<(String, String)> {
        let column = self.current_column_id()?;
        match self.current_row()? {
            Row::Section { id, .. } => Some((column, id)),
            Row::Box { section, .. } => Some((column, section)),
        }
    }

    pub fn focused_box(&self) -> Option<(String, String, String)> {
        let column = self.current_column_id()?;
        match self.current_row()? {
            Row::Box { section, id, .. } => Some((column, section, id)),
            Row::Section { .. } => None,
        }
    }

    /// Split part the cursor is in, when the current column is split.
    pub fn current_part(&self) -> Option<usize> {
        let rows = self.current_rows();
        let upto = (self.cursor.row + 1).min(rows.len());
        rows[..upto]
            .iter()
            .rev()
            .find_map(|row| match row {
                Row::Section { part, .. } => *part,
                Row::Box { .. } => None,
            })
            .or_else(|| self.current_column().filter(|c| c.is_split()).map(|_| 0))
    }

    pub fn clamp_cursor(&mut self) {
        let columns = self.workspace.layout.columns.len();
        self.cursor.column = self.cursor.column.min(columns.saturating_sub(1));
        let rows = self.current_rows().len();
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
        self.first_column = self.first_column.min(self.cursor.column);
        self.sync_selection();
    }

    fn sync_selection(&mut self) {
        let column = self.current_column_id();
        let section = self.focused_section().map(|(_, s)| s);
        let box_id = self.focused_box().map(|(_, _, b)| b);
        let layout = &mut self.workspace.layout;
        layout.select_column(column);
        layout.select_section(section);
        layout.select_box(box_id);
    }

    /// Moves the cursor to the first row matching `pred` in any column.
    pub fn focus_row(&mut self, pred: impl Fn(&Row) -> bool) -> bool {
        let found = self
            .workspace
            .layout
            .columns
            .iter()
            .enumerate()
            .find_map(|(ci, column)| {
                column_rows(column)
                    .iter()
                    .position(&pred)
                    .map(|ri| (ci, ri))
            });
        match found {
            Some((column, row)) => {
                self.cursor = Cursor { column, row };
                self.sync_selection();
                true
            }
            None => false,
        }
    }

    pub fn focus_box(&mut self, box_id: &str) -> bool {
        self.focus_row(|row| matches!(row, Row::Box { id, .. } if id == box_id))
    }

    pub fn focus_section(&mut self, section_id: &str) -> bool {
        self.focus_row(|row| matches!(row, Row::Section { id, .. } if id == section_id))
    }

    pub fn focus_column(&mut self, column_id: &str) {
        if let Ok(index) = self.workspace.layout.column_index(column_id) {
            self.cursor = Cursor {
                column: index,
                row: 0,
            };
            self.clamp_cursor();
        }
    }

    // Persistence

    /// Call after every mutation.
    pub fn commit(&mut self) {
        self.marked
            .retain(|id| self.workspace.layout.find_box(id).is_some());
        self.clamp_cursor();
        if self.config.write_through {
            self.persist();
        }
    }

    /// Writes the workspace. Failures stay in memory and show up in the status line.
    pub fn persist(&mut self) -> bool {
        let Some(storage) = &self.storage else {
            return true;
        };
        match self.workspace.persist(storage) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to persist workspace");
                self.set_message(format!("Failed to save: {}", e));
                false
            }
        }
    }

    pub fn persist_projects(&mut self) -> bool {
        let Some(storage) = &self.storage else {
            return true;
        };
        match storage.save(PROJECTS_KEY, &self.projects) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to persist projects");
                self.set_message(format!("Failed to save projects: {}", e));
                false
            }
        }
    }
}
