use crate::app::{AppState, EditTarget};
use crate::layout::LayoutResult;
use crate::model::ColumnPatch;
use tracing::debug;

use super::editing::start_editing;

pub const WIDTH_STEP: i64 = 50;

pub fn add_column(app: &mut AppState) {
    let layout = &mut app.workspace.layout;
    let title = format!("Column {}", layout.columns.len() + 1);
    let id = layout.add_column(title.clone());
    let width = app.config.default_column_width;
    if let Err(e) = layout.update_column(
        &id,
        ColumnPatch {
            width: Some(width),
            ..ColumnPatch::default()
        },
    ) {
        app.report(e);
    }
    app.focus_column(&id);
    app.commit();
    start_editing(app, EditTarget::ColumnTitle { column: id }, title);
}

pub fn rename_column(app: &mut AppState) {
    if let Some(column) = app.current_column() {
        let title = column.title.clone();
        let target = EditTarget::ColumnTitle {
            column: column.id.clone(),
        };
        start_editing(app, target, title);
    }
}

pub fn delete_column(app: &mut AppState) {
    let Some(id) = app.current_column_id() else {
        return;
    };
    match app.workspace.layout.delete_column(&id) {
        Ok(removed) => {
            let pruned = app.workspace.prune_connectors();
            if pruned > 0 {
                debug!(pruned, "connectors removed with their column");
            }
            app.set_message(format!("Deleted column \"{}\"", removed.title));
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn clone_column(app: &mut AppState) {
    let Some(id) = app.current_column_id() else {
        return;
    };
    match app.workspace.layout.clone_column(&id) {
        Ok(copy) => {
            app.focus_column(&copy);
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn move_column(app: &mut AppState, delta: isize) {
    let from = app.cursor.column;
    let Some(to) = from.checked_add_signed(delta) else {
        return;
    };
    if app.workspace.layout.columns.is_empty() || to >= app.workspace.layout.columns.len() {
        return;
    }
    match app.workspace.layout.move_column(from, to) {
        Ok(()) => {
            app.cursor.column = to;
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn resize_column(app: &mut AppState, delta: i64) {
    let Some(column) = app.current_column() else {
        return;
    };
    let id = column.id.clone();
    let width = (i64::from(column.width) + delta).max(0) as u32;
    let patch = ColumnPatch {
        width: Some(width),
        ..ColumnPatch::default()
    };
    match app.workspace.layout.update_column(&id, patch) {
        Ok(()) => {
            let width = app.current_column().map_or(width, |c| c.width);
            app.set_message(format!("Width {}px", width));
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn start_split(app: &mut AppState) {
    if let Some(column) = app.current_column() {
        let parts = column.split_parts().max(2).to_string();
        let target = EditTarget::SplitParts {
            column: column.id.clone(),
        };
        start_editing(app, target, parts);
    }
}

pub fn split_into(app: &mut AppState, column: &str, parts: usize) -> LayoutResult<()> {
    app.workspace.layout.split_column(column, parts)?;
    app.set_message(format!("Split into {} parts", parts));
    app.commit();
    Ok(())
}

pub fn unsplit_column(app: &mut AppState) {
    let Some(id) = app.current_column_id() else {
        return;
    };
    match app.workspace.layout.unsplit_column(&id) {
        Ok(()) => app.commit(),
        Err(e) => app.report(e),
    }
}
