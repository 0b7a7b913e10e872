use crate::actions::Action;
use crate::app::{AppMode, AppState};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(50))? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                return Ok(handle_key_event(app, key));
            }
            Event::Resize(width, height) => {
                app.terminal_width = width;
                app.terminal_height = height;
            }
            _ => {}
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Editing { .. } => handle_editing_mode(key),
        AppMode::Grab { .. } => handle_grab_mode(key),
        AppMode::Presentation { .. } => handle_presentation_mode(key),
        AppMode::Help => handle_help_mode(key),
    }
}

fn handle_movement(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::GoLeft),
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::GoDown),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::GoUp),
        (Char('l'), KeyModifiers::NONE) | (Right, _) => Some(Action::GoRight),
        (Char('g'), KeyModifiers::NONE) | (Home, _) => Some(Action::GoToTop),
        (Char('G'), KeyModifiers::SHIFT) | (End, _) => Some(Action::GoToBottom),
        _ => None,
    }
}

fn handle_normal_mode(app: &AppState, key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    if let Some(action) = handle_movement(key) {
        return Some(action);
    }

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
        (Char('s'), KeyModifiers::CONTROL) => Some(Action::Save),

        // Columns
        (Char('c'), KeyModifiers::NONE) => Some(Action::AddColumn),
        (Char('R'), KeyModifiers::SHIFT) => Some(Action::RenameColumn),
        (Char('D'), KeyModifiers::SHIFT) => Some(Action::DeleteColumn),
        (Char('Y'), KeyModifiers::SHIFT) => Some(Action::CloneColumn),
        (Char('H'), KeyModifiers::SHIFT) => Some(Action::MoveColumnLeft),
        (Char('L'), KeyModifiers::SHIFT) => Some(Action::MoveColumnRight),
        (Char('<'), _) => Some(Action::NarrowColumn),
        (Char('>'), _) => Some(Action::WidenColumn),
        (Char('v'), KeyModifiers::NONE) => Some(Action::SplitColumn),
        (Char('V'), KeyModifiers::SHIFT) => Some(Action::UnsplitColumn),

        // Sections and boxes
        (Char('s'), KeyModifiers::NONE) => Some(Action::AddSection),
        (Char('b'), KeyModifiers::NONE) => Some(Action::AddBox),
        (Enter, KeyModifiers::NONE) if app.workspace.canvas.connector_mode => {
            Some(Action::LinkColumn)
        }
        (Char('e'), KeyModifiers::NONE) | (Enter, KeyModifiers::NONE) => Some(Action::EditRow),
        (Char('d'), KeyModifiers::NONE) | (Delete, _) => Some(Action::DeleteRow),
        (Char('y'), KeyModifiers::NONE) => Some(Action::CloneRow),
        (Char('J'), KeyModifiers::SHIFT) => Some(Action::MoveRowDown),
        (Char('K'), KeyModifiers::SHIFT) => Some(Action::MoveRowUp),
        (Char('t'), KeyModifiers::NONE) => Some(Action::CycleCategory),
        (Char('w'), KeyModifiers::NONE) => Some(Action::ToggleBoxWidth),
        (Char(' '), KeyModifiers::NONE) => Some(Action::ToggleMark),

        // Formatting and categories
        (Char('-'), _) => Some(Action::InsertDivider),
        (Char('I'), KeyModifiers::SHIFT) => Some(Action::AddImage),
        (Char('a'), KeyModifiers::NONE) => Some(Action::CycleAlignment),
        (Char('T'), KeyModifiers::SHIFT) => Some(Action::SetTextColor),
        (Char('C'), KeyModifiers::SHIFT) => Some(Action::SetHeaderColor),
        (Char('+'), _) => Some(Action::AddCategory),
        (Char('E'), KeyModifiers::SHIFT) => Some(Action::EditCategory),
        (Char('X'), KeyModifiers::SHIFT) => Some(Action::DeleteCategory),

        // Drag and drop
        (Char('m'), KeyModifiers::NONE) => Some(Action::Grab),
        (Char('M'), KeyModifiers::SHIFT) => Some(Action::GrabColumn),

        // Files and projects
        (Char('x'), KeyModifiers::NONE) => Some(Action::Export),
        (Char('i'), KeyModifiers::NONE) => Some(Action::Import),
        (Char('B'), KeyModifiers::SHIFT) => Some(Action::BatchImport),
        (Char('O'), KeyModifiers::SHIFT) => Some(Action::CopyOutline),
        (Char('S'), KeyModifiers::SHIFT) => Some(Action::SaveProject),
        (Char('P'), KeyModifiers::SHIFT) => Some(Action::LoadProject),
        (Char('N'), KeyModifiers::SHIFT) => Some(Action::EditNotes),

        // Slides
        (Char('n'), KeyModifiers::NONE) => Some(Action::CaptureSlide),
        (Char('p'), KeyModifiers::NONE) => Some(Action::StartPresentation),

        // Canvas
        (Char('z'), KeyModifiers::NONE) => Some(Action::ToggleCanvas),
        (Char('Z'), KeyModifiers::SHIFT) => Some(Action::CyclePreset),
        (Char('#'), _) => Some(Action::ToggleGrid),
        (Char('o'), KeyModifiers::NONE) => Some(Action::ToggleConnectorMode),

        // Help
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Basic editing
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),

        // Deletion
        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::Delete),
        (Char('k'), KeyModifiers::CONTROL) => Some(Action::DeleteToEnd),
        (Char('u'), KeyModifiers::CONTROL) => Some(Action::DeleteToStart),

        // Movement
        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) => Some(Action::MoveCursorHome),
        (End, _) => Some(Action::MoveCursorEnd),
        (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        _ => None,
    }
}

fn handle_grab_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    if let Some(action) = handle_movement(key) {
        return Some(action);
    }

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelGrab),
        (Enter, KeyModifiers::CONTROL) | (Char('y'), KeyModifiers::NONE) => {
            Some(Action::DropCopy)
        }
        (Enter, KeyModifiers::ALT) | (Char('a'), KeyModifiers::NONE) => {
            Some(Action::DropKeepNormal)
        }
        (Enter, _) => Some(Action::Drop),
        _ => None,
    }
}

fn handle_presentation_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match key.code {
        Right | Char('l') | Char(' ') | PageDown => Some(Action::NextSlide),
        Left | Char('h') | PageUp => Some(Action::PreviousSlide),
        Esc | Char('q') => Some(Action::StopPresentation),
        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}
