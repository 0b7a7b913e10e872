use crate::app::{AppState, EditTarget, Row};
use crate::layout::LayoutResult;
use crate::model::{BoxPatch, BoxWidth, DEFAULT_BOX_TEXT};

use super::editing::start_editing;

const NEW_SECTION_TITLE: &str = "New Section";

pub fn add_section(app: &mut AppState) {
    let Some(column) = app.current_column() else {
        app.set_message("Add a column first");
        return;
    };
    let column_id = column.id.clone();
    if column.is_split() {
        let part = app.current_part().unwrap_or(0);
        let target = EditTarget::NewSectionInPart {
            column: column_id,
            part,
        };
        start_editing(app, target, NEW_SECTION_TITLE);
        return;
    }
    match app.workspace.layout.add_section(&column_id, NEW_SECTION_TITLE) {
        Ok(section) => {
            app.focus_section(&section);
            app.commit();
            let target = EditTarget::SectionTitle {
                column: column_id,
                section,
            };
            start_editing(app, target, NEW_SECTION_TITLE);
        }
        Err(e) => app.report(e),
    }
}

/// Creates a titled section at the end of one split part.
pub fn create_section_in_part(app: &mut AppState, column: &str, part: usize, title: &str) -> LayoutResult<()> {
    let title = if title.is_empty() { NEW_SECTION_TITLE } else { title };
    let section = app.workspace.layout.add_section_to_part(column, part, title)?;
    app.focus_section(&section);
    app.commit();
    Ok(())
}

pub fn add_box(app: &mut AppState) {
    let Some((column, section)) = app.focused_section() else {
        app.set_message("Add a section first");
        return;
    };
    let patch = BoxPatch::text(DEFAULT_BOX_TEXT).with_category(app.config.default_category.clone());
    match app.workspace.layout.add_box(&column, &section, patch) {
        Ok(box_id) => {
            app.focus_box(&box_id);
            app.commit();
            let target = EditTarget::BoxText {
                column,
                section,
                box_id,
            };
            start_editing(app, target, "");
        }
        Err(e) => app.report(e),
    }
}

pub fn edit_row(app: &mut AppState) {
    let Some(column) = app.current_column() else {
        return;
    };
    let column_id = column.id.clone();
    let (target, initial) = match app.current_row() {
        Some(Row::Section { id, .. }) => {
            let title = column
                .sections
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.title.clone())
                .unwrap_or_default();
            let target = EditTarget::SectionTitle {
                column: column_id,
                section: id,
            };
            (target, title)
        }
        Some(Row::Box { section, id, .. }) => {
            let text = column
                .sections
                .iter()
                .find(|s| s.id == section)
                .and_then(|s| s.boxes.iter().find(|b| b.id == id))
                .map(|b| b.text.clone())
                .unwrap_or_default();
            let target = EditTarget::BoxText {
                column: column_id,
                section,
                box_id: id,
            };
            (target, text)
        }
        None => return,
    };
    start_editing(app, target, initial);
}

pub fn delete_row(app: &mut AppState) {
    let Some(column) = app.current_column_id() else {
        return;
    };
    let result = match app.current_row() {
        Some(Row::Section { id, .. }) => app
            .workspace
            .layout
            .delete_section(&column, &id)
            .map(|s| format!("Deleted section \"{}\"", s.title)),
        Some(Row::Box { section, id, .. }) => app
            .workspace
            .layout
            .delete_box(&column, &section, &id)
            .map(|b| format!("Deleted \"{}\"", b.text)),
        None => return,
    };
    match result {
        Ok(msg) => {
            app.set_message(msg);
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn clone_row(app: &mut AppState) {
    let Some(column) = app.current_column_id() else {
        return;
    };
    match app.current_row() {
        Some(Row::Section { id, .. }) => match app.workspace.layout.clone_section(&column, &id) {
            Ok(copy) => {
                app.focus_section(&copy);
                app.commit();
            }
            Err(e) => app.report(e),
        },
        Some(Row::Box { section, id, index }) => {
            let copied = app.workspace.layout.clone_box_to(
                &column,
                &section,
                &id,
                &column,
                &section,
                Some(index + 1),
            );
            match copied {
                Ok(copy) => {
                    app.focus_box(&copy);
                    app.commit();
                }
                Err(e) => app.report(e),
            }
        }
        None => {}
    }
}

/// Shifts the focused box inside its section, or the focused section inside
/// its column, by one place.
pub fn move_row(app: &mut AppState, delta: isize) {
    let Some(column) = app.current_column_id() else {
        return;
    };
    let Some(row) = app.current_row() else {
        return;
    };
    let (index, len) = match &row {
        Row::Section { part: Some(_), .. } => {
            app.set_message("Grab the section (m) to move it between parts");
            return;
        }
        Row::Section { index, .. } => (*index, app.current_column().map_or(0, |c| c.sections.total())),
        Row::Box { section, index, .. } => {
            let len = app
                .current_column()
                .and_then(|c| c.sections.iter().find(|s| &s.id == section))
                .map_or(0, |s| s.boxes.len());
            (*index, len)
        }
    };
    let Some(to) = index.checked_add_signed(delta).filter(|to| *to < len) else {
        return;
    };
    let result = match &row {
        Row::Section { id, .. } => app
            .workspace
            .layout
            .move_section(&column, &column, id, Some(to)),
        Row::Box { section, id, .. } => app
            .workspace
            .layout
            .move_box(&column, section, &column, section, id, Some(to)),
    };
    match result {
        Ok(()) => {
            match &row {
                Row::Section { id, .. } => app.focus_section(id),
                Row::Box { id, .. } => app.focus_box(id),
            };
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn cycle_category(app: &mut AppState) {
    let Some((column, section, box_id)) = app.focused_box() else {
        return;
    };
    let current = app
        .current_column()
        .and_then(|c| c.sections.iter().find(|s| s.id == section))
        .and_then(|s| s.boxes.iter().find(|b| b.id == box_id))
        .map(|b| b.category.clone())
        .unwrap_or_default();
    let keys: Vec<&str> = app.workspace.categories.keys().collect();
    if keys.is_empty() {
        return;
    }
    let next = keys
        .iter()
        .position(|k| *k == current)
        .map_or(0, |i| (i + 1) % keys.len());
    let category = keys[next].to_string();
    let patch = BoxPatch {
        category: Some(category.clone()),
        ..BoxPatch::default()
    };
    match app.workspace.layout.update_box(&column, &section, &box_id, patch) {
        Ok(()) => {
            app.set_message(format!("Category: {}", category));
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn toggle_box_width(app: &mut AppState) {
    let Some((column, section, box_id)) = app.focused_box() else {
        return;
    };
    let width = app
        .current_column()
        .and_then(|c| c.sections.iter().find(|s| s.id == section))
        .and_then(|s| s.boxes.iter().find(|b| b.id == box_id))
        .map(|b| match b.width {
            BoxWidth::Full => BoxWidth::Half,
            BoxWidth::Half => BoxWidth::Full,
        })
        .unwrap_or_default();
    let patch = BoxPatch {
        width: Some(width),
        ..BoxPatch::default()
    };
    match app.workspace.layout.update_box(&column, &section, &box_id, patch) {
        Ok(()) => app.commit(),
        Err(e) => app.report(e),
    }
}

pub fn toggle_mark(app: &mut AppState) {
    let Some((_, _, box_id)) = app.focused_box() else {
        return;
    };
    if let Some(pos) = app.marked.iter().position(|id| *id == box_id) {
        app.marked.remove(pos);
    } else {
        app.marked.push(box_id);
    }
    app.set_message(format!("{} marked", app.marked.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppMode;
    use crate::config::AppConfig;
    use crate::layout::LayoutState;
    use crate::workspace::Workspace;

    fn demo_app() -> AppState {
        let workspace = Workspace {
            layout: LayoutState::demo(),
            ..Workspace::default()
        };
        AppState::new(AppConfig::with_data_dir("unused"), workspace)
    }

    fn texts(app: &AppState, column: usize) -> Vec<String> {
        app.workspace.layout.columns[column]
            .sections
            .iter()
            .flat_map(|s| s.boxes.iter().map(|b| b.text.clone()))
            .collect()
    }

    #[test]
    fn test_add_box_uses_default_category() {
        let mut app = demo_app();
        app.config.default_category = "green".to_string();
        add_box(&mut app);
        let (_, _, id) = app.focused_box().unwrap();
        let section = app.workspace.layout.columns[0].sections.iter().next().unwrap();
        let added = section.boxes.iter().find(|b| b.id == id).unwrap();
        assert_eq!(added.category, "green");
        assert!(matches!(app.mode, AppMode::Editing { .. }));
    }

    #[test]
    fn test_move_row_down_and_up() {
        let mut app = demo_app();
        app.cursor.row = 1;
        move_row(&mut app, 1);
        assert_eq!(
            texts(&app, 0),
            ["Press s to add sections", "Press c to create more columns", "Press b to create content boxes"]
        );
        assert_eq!(app.cursor.row, 2);
        move_row(&mut app, -1);
        assert_eq!(texts(&app, 0)[0], "Press c to create more columns");
        // top of the section
        move_row(&mut app, -1);
        assert_eq!(app.cursor.row, 1);
    }

    #[test]
    fn test_clone_box_lands_after_original() {
        let mut app = demo_app();
        app.cursor.row = 1;
        clone_row(&mut app);
        let texts = texts(&app, 0);
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0], texts[1]);
        assert_eq!(app.cursor.row, 2);
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut app = demo_app();
        app.cursor.row = 1;
        let keys: Vec<String> = app.workspace.categories.keys().map(String::from).collect();
        for _ in 0..keys.len() {
            cycle_category(&mut app);
        }
        let (_, section, id) = app.focused_box().unwrap();
        let current = app.workspace.layout.columns[0]
            .sections
            .iter()
            .find(|s| s.id == section)
            .and_then(|s| s.boxes.iter().find(|b| b.id == id))
            .map(|b| b.category.clone());
        assert_eq!(current.as_deref(), Some("blue"));
    }

    #[test]
    fn test_delete_box_in_split_column_is_reported() {
        let mut app = demo_app();
        let id = app.workspace.layout.columns[0].id.clone();
        app.workspace.layout.split_column(&id, 2).unwrap();
        app.cursor.row = 1;
        delete_row(&mut app);
        assert_eq!(texts(&app, 0).len(), 3);
        assert!(app.message.as_deref().unwrap_or_default().contains("split"));
    }

    #[test]
    fn test_marks_toggle() {
        let mut app = demo_app();
        app.cursor.row = 1;
        toggle_mark(&mut app);
        app.cursor.row = 2;
        toggle_mark(&mut app);
        assert_eq!(app.marked.len(), 2);
        toggle_mark(&mut app);
        assert_eq!(app.marked.len(), 1);
    }
}
