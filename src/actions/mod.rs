mod canvas;
mod column;
mod content;
mod drag;
mod editing;
mod file;
mod movement;
mod slides;
mod style;

use crate::app::{AppMode, AppState};
use anyhow::Result;

pub use canvas::*;
pub use column::*;
pub use content::*;
pub use drag::*;
pub use editing::*;
pub use file::*;
pub use movement::*;
pub use slides::*;
pub use style::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    Save,

    // Movement
    GoUp,
    GoDown,
    GoLeft,
    GoRight,
    GoToTop,
    GoToBottom,

    // Columns
    AddColumn,
    RenameColumn,
    DeleteColumn,
    CloneColumn,
    MoveColumnLeft,
    MoveColumnRight,
    NarrowColumn,
    WidenColumn,
    SplitColumn,
    UnsplitColumn,

    // Sections and boxes
    AddSection,
    AddBox,
    EditRow,
    DeleteRow,
    CloneRow,
    MoveRowUp,
    MoveRowDown,
    CycleCategory,
    ToggleBoxWidth,
    ToggleMark,

    // Formatting and categories
    InsertDivider,
    AddImage,
    CycleAlignment,
    SetTextColor,
    SetHeaderColor,
    AddCategory,
    EditCategory,
    DeleteCategory,

    // Editing
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    DeleteToEnd,
    DeleteToStart,
    ConfirmEdit,
    CancelEdit,

    // Drag and drop
    Grab,
    GrabColumn,
    Drop,
    DropCopy,
    DropKeepNormal,
    CancelGrab,

    // Files and projects
    Export,
    Import,
    BatchImport,
    CopyOutline,
    SaveProject,
    LoadProject,
    EditNotes,

    // Slides
    CaptureSlide,
    StartPresentation,
    NextSlide,
    PreviousSlide,
    StopPresentation,

    // Canvas
    ToggleCanvas,
    ToggleGrid,
    CyclePreset,
    ToggleConnectorMode,
    LinkColumn,

    // Help
    ShowHelp,
    CloseHelp,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => {
            if !app.config.write_through {
                app.persist();
                app.persist_projects();
            }
            app.running = false;
        }
        Action::Save => {
            if app.persist() && app.persist_projects() {
                app.set_message("Saved");
            }
        }

        // Movement actions
        Action::GoUp => movement::go_up(app),
        Action::GoDown => movement::go_down(app),
        Action::GoLeft => movement::go_left(app),
        Action::GoRight => movement::go_right(app),
        Action::GoToTop => movement::go_to_top(app),
        Action::GoToBottom => movement::go_to_bottom(app),

        // Columns
        Action::AddColumn => column::add_column(app),
        Action::RenameColumn => column::rename_column(app),
        Action::DeleteColumn => column::delete_column(app),
        Action::CloneColumn => column::clone_column(app),
        Action::MoveColumnLeft => column::move_column(app, -1),
        Action::MoveColumnRight => column::move_column(app, 1),
        Action::NarrowColumn => column::resize_column(app, -column::WIDTH_STEP),
        Action::WidenColumn => column::resize_column(app, column::WIDTH_STEP),
        Action::SplitColumn => column::start_split(app),
        Action::UnsplitColumn => column::unsplit_column(app),

        // Sections and boxes
        Action::AddSection => content::add_section(app),
        Action::AddBox => content::add_box(app),
        Action::EditRow => content::edit_row(app),
        Action::DeleteRow => content::delete_row(app),
        Action::CloneRow => content::clone_row(app),
        Action::MoveRowUp => content::move_row(app, -1),
        Action::MoveRowDown => content::move_row(app, 1),
        Action::CycleCategory => content::cycle_category(app),
        Action::ToggleBoxWidth => content::toggle_box_width(app),
        Action::ToggleMark => content::toggle_mark(app),

        // Formatting and categories
        Action::InsertDivider => style::insert_divider(app),
        Action::AddImage => style::start_add_image(app),
        Action::CycleAlignment => style::cycle_alignment(app),
        Action::SetTextColor => style::start_text_color(app),
        Action::SetHeaderColor => style::start_header_color(app),
        Action::AddCategory => style::start_add_category(app),
        Action::EditCategory => style::start_edit_category(app),
        Action::DeleteCategory => style::delete_category(app),

        // Editing
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::Delete => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::DeleteToEnd => editing::delete_to_end(app),
        Action::DeleteToStart => editing::delete_to_start(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // Drag and drop
        Action::Grab => drag::grab(app),
        Action::GrabColumn => drag::grab_column(app),
        Action::Drop => drag::drop_here(app, Default::default()),
        Action::DropCopy => drag::drop_here(
            app,
            crate::dnd::Modifiers {
                clone: true,
                alt: false,
            },
        ),
        Action::DropKeepNormal => drag::drop_here(
            app,
            crate::dnd::Modifiers {
                clone: false,
                alt: true,
            },
        ),
        Action::CancelGrab => drag::cancel_grab(app),

        // File operations
        Action::Export => file::start_export(app),
        Action::Import => file::start_import(app),
        Action::BatchImport => file::start_batch_import(app),
        Action::CopyOutline => file::copy_outline(app),
        Action::SaveProject => file::start_save_project(app),
        Action::LoadProject => file::start_load_project(app),
        Action::EditNotes => file::start_edit_notes(app),

        // Slides
        Action::CaptureSlide => slides::start_capture(app),
        Action::StartPresentation => slides::start_presentation(app),
        Action::NextSlide => slides::next_slide(app),
        Action::PreviousSlide => slides::previous_slide(app),
        Action::StopPresentation => slides::stop_presentation(app),

        // Canvas
        Action::ToggleCanvas => canvas::toggle_canvas(app),
        Action::ToggleGrid => canvas::toggle_grid(app),
        Action::CyclePreset => canvas::cycle_preset(app),
        Action::ToggleConnectorMode => canvas::toggle_connector_mode(app),
        Action::LinkColumn => canvas::link_column(app),

        // Help
        Action::ShowHelp => app.mode = AppMode::Help,
        Action::CloseHelp => app.mode = AppMode::Normal,
    }
    Ok(())
}
