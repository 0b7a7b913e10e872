pub mod board;
pub mod help;
pub mod status_line;
pub mod text;

use crate::app::{AppMode, AppState};
use board::{first_visible_column, BoardRenderer};
use help::HelpRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use status_line::StatusLineRenderer;

pub const CURSOR_INDICATOR: char = '▌';

pub fn render(frame: &mut Frame, app: &mut AppState) {
    // Update terminal size
    let size = frame.area();
    app.terminal_width = size.width;
    app.terminal_height = size.height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    if !app.workspace.layout.columns.is_empty() {
        app.first_column = first_visible_column(
            &app.workspace.layout.columns,
            app.first_column,
            app.cursor.column,
            chunks[0].width,
        );
    }

    match &app.mode {
        AppMode::Help => HelpRenderer::render(frame, chunks[0]),
        _ => BoardRenderer::new(app).render(frame, chunks[0]),
    }

    StatusLineRenderer::render(frame, app, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::layout::LayoutState;
    use crate::workspace::Workspace;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn demo_app() -> AppState {
        let workspace = Workspace {
            layout: LayoutState::demo(),
            ..Workspace::default()
        };
        AppState::new(AppConfig::with_data_dir("unused"), workspace)
    }

    #[test]
    fn test_render_shows_columns_and_status() {
        let mut app = demo_app();
        let out = screen(&mut app, 100, 12);
        assert!(out.contains("Welcome to Explainator"));
        assert!(out.contains("Features"));
        assert!(out.contains("Getting Started"));
        assert!(out.contains("Press s to add sections"));
        assert!(out.contains("2 columns | 7 boxes | 0 slides"));
        assert_eq!(app.terminal_width, 100);
    }

    #[test]
    fn test_render_scrolls_to_cursor_column() {
        let mut app = demo_app();
        app.cursor.column = 1;
        screen(&mut app, 45, 10);
        assert_eq!(app.first_column, 1);
        app.cursor.column = 0;
        screen(&mut app, 45, 10);
        assert_eq!(app.first_column, 0);
    }

    #[test]
    fn test_render_help_and_empty_board() {
        let mut app = AppState::new(AppConfig::with_data_dir("unused"), Workspace::default());
        let out = screen(&mut app, 80, 10);
        assert!(out.contains("No columns yet"));

        app.mode = AppMode::Help;
        let out = screen(&mut app, 80, 30);
        assert!(out.contains("Help"));
        assert!(out.contains("Add column"));
        assert!(out.contains("Press ESC or q to close help"));
    }

    #[test]
    fn test_edit_prompt_in_status_line() {
        let mut app = demo_app();
        app.mode = AppMode::Editing {
            target: crate::app::EditTarget::NewSlide,
            buffer: "Intro".to_string(),
            cursor_pos: 5,
        };
        let out = screen(&mut app, 60, 6);
        assert!(out.contains(&format!("Intro{}", CURSOR_INDICATOR)));
    }
}
