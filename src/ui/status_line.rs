use crate::app::{AppMode, AppState};
use crate::dnd::DragItem;
use crate::ui::text::truncate;
use crate::ui::CURSOR_INDICATOR;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area);
        let content = truncate(&content, area.width as usize);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    fn get_content_and_style(app: &AppState, area: Rect) -> (String, Style) {
        match &app.mode {
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Editing {
                target,
                buffer,
                cursor_pos,
            } => Self::render_edit_mode(target.label(), buffer, *cursor_pos, area.width),
            AppMode::Grab { item } => Self::render_grab_mode(app, item),
            AppMode::Presentation { .. } => Self::render_presentation_mode(app),
            AppMode::Help => Self::highlighted("Press ESC or q to close help".to_string()),
        }
    }

    fn highlighted(content: String) -> (String, Style) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        (content, style)
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if let Some(ref msg) = app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let layout = &app.workspace.layout;
        let boxes: usize = layout
            .columns
            .iter()
            .flat_map(|c| c.sections.iter())
            .map(|s| s.boxes.len())
            .sum();
        let mut content = format!(
            "explainator | {} columns | {} boxes | {} slides | ? help",
            layout.columns.len(),
            boxes,
            app.workspace.slides.slides.len()
        );
        let canvas = &app.workspace.canvas;
        if canvas.enabled {
            content.push_str(&format!(" | canvas {}x{}", canvas.width, canvas.height));
        }
        if canvas.connector_mode {
            content.push_str(" | linking");
        }
        if !app.marked.is_empty() {
            content.push_str(&format!(" | {} marked", app.marked.len()));
        }
        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }

    fn render_edit_mode(label: &str, buffer: &str, cursor_pos: usize, width: u16) -> (String, Style) {
        let prefix = format!("{}: ", label);
        let chars: Vec<char> = buffer.chars().collect();

        // Keep the cursor in view when the text is longer than the line
        let available = (width as usize).saturating_sub(prefix.chars().count() + 1);
        let start = if cursor_pos > available {
            cursor_pos - available
        } else {
            0
        };
        let end = (start + available).min(chars.len());

        let mut display = prefix;
        display.extend(&chars[start..cursor_pos.min(end).max(start)]);
        display.push(CURSOR_INDICATOR);
        if cursor_pos < end {
            display.extend(&chars[cursor_pos..end]);
        }
        Self::highlighted(display)
    }

    fn render_grab_mode(app: &AppState, item: &DragItem) -> (String, Style) {
        let content = app.message.clone().unwrap_or_else(|| match item {
            DragItem::Box { .. } => "Moving box".to_string(),
            DragItem::Section { .. } => "Moving section".to_string(),
            DragItem::Column { .. } => "Moving column".to_string(),
        });
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        (content, style)
    }

    fn render_presentation_mode(app: &AppState) -> (String, Style) {
        let slide = app.message.clone().unwrap_or_default();
        Self::highlighted(format!("{} | ←/→ slides, Esc ends", slide))
    }
}
