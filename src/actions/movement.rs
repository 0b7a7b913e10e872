use crate::app::AppState;

pub fn go_up(app: &mut AppState) {
    app.cursor.row = app.cursor.row.saturating_sub(1);
    app.clamp_cursor();
}

pub fn go_down(app: &mut AppState) {
    app.cursor.row += 1;
    app.clamp_cursor();
}

pub fn go_left(app: &mut AppState) {
    app.cursor.column = app.cursor.column.saturating_sub(1);
    app.clamp_cursor();
}

pub fn go_right(app: &mut AppState) {
    app.cursor.column += 1;
    app.clamp_cursor();
}

pub fn go_to_top(app: &mut AppState) {
    app.cursor.row = 0;
    app.clamp_cursor();
}

pub fn go_to_bottom(app: &mut AppState) {
    app.cursor.row = usize::MAX;
    app.clamp_cursor();
}
