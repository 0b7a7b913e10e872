use crate::app::{column_rows, AppMode, AppState, Row};
use crate::categories::parse_hex;
use crate::model::{BoxContent, BoxWidth, Column, LayoutBox, TextAlign};
use crate::ui::text::{align, pad, truncate};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Terminal cells per column are its pixel width divided by this.
const PIXELS_PER_CELL: u32 = 10;
const MIN_CELL_WIDTH: u16 = 20;

const HALF_WIDTH_MARK: &str = "½ ";
const MARKED_MARK: &str = "* ";
const SECTION_MARK: &str = "▸ ";

pub fn cell_width(column: &Column) -> u16 {
    let cells = (column.width / PIXELS_PER_CELL).min(u16::MAX as u32) as u16;
    cells.max(MIN_CELL_WIDTH)
}

/// Leftmost column to draw so that the cursor column fits in `width` cells.
pub fn first_visible_column(columns: &[Column], first: usize, cursor: usize, width: u16) -> usize {
    if cursor < first {
        return cursor;
    }
    let mut first = first;
    while first < cursor {
        let used: u32 = columns[first..=cursor]
            .iter()
            .map(|c| cell_width(c) as u32)
            .sum();
        if used <= width as u32 {
            break;
        }
        first += 1;
    }
    first
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub struct BoardRenderer<'a> {
    app: &'a AppState,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(app: &'a AppState) -> Self {
        Self { app }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = &self.app.workspace.layout.columns;
        if columns.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from("No columns yet. Press c to add one, ? for help."),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(hint, area);
            return;
        }

        let mut x = area.x;
        let right = area.x + area.width;
        for (index, column) in columns.iter().enumerate().skip(self.app.first_column) {
            if x >= right {
                break;
            }
            let width = cell_width(column).min(right - x);
            let cell = Rect::new(x, area.y, width, area.height);
            self.render_column(frame, index, column, cell);
            x += width;
        }
    }

    fn is_current(&self, index: usize) -> bool {
        index == self.app.cursor.column && !matches!(self.app.mode, AppMode::Presentation { .. })
    }

    fn grabbed_id(&self) -> Option<&str> {
        match &self.app.mode {
            AppMode::Grab { item } => Some(item.id()),
            _ => None,
        }
    }

    fn render_column(&self, frame: &mut Frame, index: usize, column: &Column, area: Rect) {
        let current = self.is_current(index);
        let mut border = Style::default().fg(column
            .header_color
            .as_deref()
            .and_then(parse_hex)
            .map_or(Color::DarkGray, rgb));
        if current {
            border = border.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if self.grabbed_id() == Some(column.id.as_str()) {
            border = border.fg(Color::Yellow);
        }

        let mut block = Block::default().borders(Borders::ALL).border_style(border);
        if !column.hide_column_header {
            block = block.title(self.column_title(column, area.width));
        }
        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;

        let (lines, cursor_line) = self.column_lines(column, current, inner_width);
        let offset = cursor_line
            .map_or(0, |line| line.saturating_sub(inner_height.saturating_sub(1)));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((offset.min(u16::MAX as usize) as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn column_title(&self, column: &Column, width: u16) -> String {
        let mut title = column.title.clone();
        if column.is_split() {
            title.push_str(&format!(" [{}]", column.split_state()));
        }
        let canvas = &self.app.workspace.canvas;
        if canvas.enabled {
            if let Some(pos) = &column.canvas_position {
                title.push_str(&format!(" @{:.0},{:.0}", pos.x, pos.y));
            }
        }
        format!(" {} ", truncate(&title, (width as usize).saturating_sub(4)))
    }

    /// Lines of one column plus the index of the line holding the cursor.
    fn column_lines(
        &self,
        column: &Column,
        current: bool,
        width: usize,
    ) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut cursor_line = None;
        let sections: Vec<_> = column.sections.iter().collect();
        let grabbed = self.grabbed_id();

        for (row_index, row) in column_rows(column).into_iter().enumerate() {
            let selected = current && row_index == self.app.cursor.row;
            let (mut line, id) = match &row {
                Row::Section { id, part, index } => {
                    if let (Some(part), 0) = (part, index) {
                        lines.push(Line::styled(
                            pad(&format!("── Part {} ──", part + 1), width),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    let Some(section) = sections.iter().find(|s| &s.id == id) else {
                        continue;
                    };
                    let mut style = Style::default().add_modifier(Modifier::BOLD);
                    if column.hide_section_headers {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    if let Some((r, g, b)) = section.color.as_deref().and_then(parse_hex) {
                        style = style.fg(Color::Rgb(r, g, b));
                    }
                    let text = format!("{}{}", SECTION_MARK, section.title);
                    (Line::styled(pad(&text, width), style), id.as_str())
                }
                Row::Box { section, id, .. } => {
                    let Some(item) = sections
                        .iter()
                        .find(|s| &s.id == section)
                        .and_then(|s| s.boxes.iter().find(|b| &b.id == id))
                    else {
                        continue;
                    };
                    (self.box_line(item, width), id.as_str())
                }
            };
            if grabbed == Some(id) {
                line = line.patch_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
            if selected {
                line = line.patch_style(Style::default().add_modifier(Modifier::REVERSED));
                cursor_line = Some(lines.len());
            }
            lines.push(line);
        }

        let layout = &self.app.workspace.layout;
        for connector in self
            .app
            .workspace
            .canvas
            .connectors
            .iter()
            .filter(|c| c.from_column_id == column.id)
        {
            let target = layout
                .column(&connector.to_column_id)
                .map_or("?", |c| c.title.as_str());
            lines.push(Line::styled(
                truncate(&format!("→ {}", target), width),
                Style::default().fg(Color::DarkGray),
            ));
        }

        (lines, cursor_line)
    }

    fn box_line(&self, item: &LayoutBox, width: usize) -> Line<'static> {
        let categories = &self.app.workspace.categories;
        let bg = rgb(categories.rgb(&item.category));
        let fg = item
            .text_color
            .as_deref()
            .and_then(parse_hex)
            .or_else(|| parse_hex(categories.text_color(&item.category)))
            .map_or(Color::White, rgb);

        let mut prefix = String::from(" ");
        if self.app.marked.contains(&item.id) {
            prefix.push_str(MARKED_MARK);
        }
        if item.width == BoxWidth::Half {
            prefix.push_str(HALF_WIDTH_MARK);
        }
        let width = if item.width == BoxWidth::Half {
            width / 2 + 1
        } else {
            width
        };
        let room = width.saturating_sub(prefix.width());
        let body = match &item.content {
            BoxContent::Text => align(&item.text, room, item.text_align.unwrap_or(TextAlign::Left)),
            BoxContent::Image { src } => pad(&format!("[image] {}", src), room),
            BoxContent::Line { style } => divider(style).repeat(room.saturating_sub(1)),
        };
        Line::styled(pad(&(prefix + &body), width), Style::default().fg(fg).bg(bg))
    }
}

/// Character a divider box is drawn with.
fn divider(style: &str) -> &'static str {
    match style {
        "line-medium" => "━",
        "line-thick" => "█",
        "line-dashed" => "╌",
        "line-dotted" => "┄",
        _ => "─",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutState;

    fn columns(widths: &[u32]) -> Vec<Column> {
        widths
            .iter()
            .map(|w| {
                let mut c = Column::new("c");
                c.width = *w;
                c
            })
            .collect()
    }

    #[test]
    fn test_cell_width_has_a_floor() {
        let mut column = Column::new("c");
        column.width = 400;
        assert_eq!(cell_width(&column), 40);
        column.width = 100;
        assert_eq!(cell_width(&column), MIN_CELL_WIDTH);
    }

    #[test]
    fn test_first_visible_column_scrolls_to_cursor() {
        let cols = columns(&[400, 400, 400, 400]);
        assert_eq!(first_visible_column(&cols, 0, 1, 80), 0);
        assert_eq!(first_visible_column(&cols, 0, 3, 80), 2);
        assert_eq!(first_visible_column(&cols, 3, 1, 80), 1);
        // a column wider than the screen is still drawn from its left edge
        assert_eq!(first_visible_column(&cols, 0, 2, 10), 2);
    }

    #[test]
    fn test_demo_columns_have_lines_for_every_row() {
        let app = AppState::new(
            crate::config::AppConfig::with_data_dir("unused"),
            crate::workspace::Workspace {
                layout: LayoutState::demo(),
                ..Default::default()
            },
        );
        let renderer = BoardRenderer::new(&app);
        let column = &app.workspace.layout.columns[0];
        let (lines, cursor) = renderer.column_lines(column, true, 30);
        assert_eq!(lines.len(), column_rows(column).len());
        assert_eq!(cursor, Some(0));
    }
}
