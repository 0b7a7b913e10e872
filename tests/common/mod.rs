use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use explainator::{actions, event, ui, AppConfig, AppState, LayoutState, Workspace};
use ratatui::{backend::TestBackend, Terminal};
use std::path::Path;

/// In-memory app over the demo layout.
pub fn demo_app() -> AppState {
    let workspace = Workspace {
        layout: LayoutState::demo(),
        ..Workspace::default()
    };
    AppState::new(AppConfig::with_data_dir("unused"), workspace)
}

#[allow(dead_code)]
pub fn empty_app() -> AppState {
    AppState::new(AppConfig::with_data_dir("unused"), Workspace::default())
}

/// App backed by storage under `dir`.
#[allow(dead_code)]
pub fn stored_app(dir: &Path) -> AppState {
    AppState::open(AppConfig::with_data_dir(dir)).unwrap()
}

/// Feeds one key through the keymap and runs the resulting action.
pub fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) {
    if let Some(action) = event::handle_key_event(app, KeyEvent::new(code, modifiers)) {
        actions::execute_action(action, app).unwrap();
    }
}

#[allow(dead_code)]
pub fn key(app: &mut AppState, c: char) {
    let modifiers = if c.is_ascii_uppercase() {
        KeyModifiers::SHIFT
    } else {
        KeyModifiers::NONE
    };
    press(app, KeyCode::Char(c), modifiers);
}

#[allow(dead_code)]
pub fn enter(app: &mut AppState) {
    press(app, KeyCode::Enter, KeyModifiers::NONE);
}

/// Replaces whatever the prompt holds with `text` and confirms it.
#[allow(dead_code)]
pub fn answer(app: &mut AppState, text: &str) {
    press(app, KeyCode::End, KeyModifiers::NONE);
    press(app, KeyCode::Char('u'), KeyModifiers::CONTROL);
    for c in text.chars() {
        key(app, c);
    }
    enter(app);
}

/// Box texts of every section of a column, top to bottom.
#[allow(dead_code)]
pub fn box_texts(layout: &LayoutState, column: usize) -> Vec<String> {
    layout.columns[column]
        .sections
        .iter()
        .flat_map(|s| s.boxes.iter().map(|b| b.text.clone()))
        .collect()
}

/// Draws one frame and returns the screen as text, one line per row.
#[allow(dead_code)]
pub fn render_to_string(app: &mut AppState, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        let line: String = (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
