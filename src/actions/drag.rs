use crate::app::{AppMode, AppState, Row};
use crate::dnd::{plan_drop, DragItem, DropTarget, Modifiers};

pub fn grab(app: &mut AppState) {
    let Some(column) = app.current_column_id() else {
        return;
    };
    let item = match app.current_row() {
        Some(Row::Box { section, id, .. }) => DragItem::Box { column, section, id },
        Some(Row::Section { id, part, .. }) => DragItem::Section { column, part, id },
        None => return,
    };
    start_grab(app, item);
}

pub fn grab_column(app: &mut AppState) {
    if let Some(id) = app.current_column_id() {
        start_grab(app, DragItem::Column { id });
    }
}

fn start_grab(app: &mut AppState, item: DragItem) {
    let what = match &item {
        DragItem::Box { .. } if app.marked.len() > 1 => "marked boxes",
        DragItem::Box { .. } => "box",
        DragItem::Section { .. } => "section",
        DragItem::Column { .. } => "column",
    };
    app.set_message(format!(
        "Moving {}: Enter drops, y drops a copy, a keeps the target normal, Esc cancels",
        what
    ));
    app.mode = AppMode::Grab { item };
}

pub fn cancel_grab(app: &mut AppState) {
    app.mode = AppMode::Normal;
    app.clear_message();
}

/// Where the held item would land if dropped at the cursor.
pub fn drop_target(app: &AppState, item: &DragItem) -> Option<DropTarget> {
    let column = app.current_column()?;
    let row = app.current_row();
    match item {
        DragItem::Box { .. } => match row? {
            Row::Box { section, id, index } => Some(DropTarget::Box {
                column: column.id.clone(),
                section,
                box_id: id,
                index,
            }),
            Row::Section { id, part, index } => Some(DropTarget::Section {
                column: column.id.clone(),
                part,
                section: id,
                index,
            }),
        },
        DragItem::Section { .. } => {
            let section = match row {
                Some(Row::Section { id, .. }) | Some(Row::Box { section: id, .. }) => Some(id),
                None => None,
            };
            match section.and_then(|id| app.workspace.layout.find_section(&id).map(|l| (id, l))) {
                Some((section, location)) => Some(DropTarget::Section {
                    column: location.column,
                    part: location.part,
                    section,
                    index: location.index,
                }),
                None if column.is_split() => Some(DropTarget::SplitPart {
                    column: column.id.clone(),
                    part: 0,
                    index: None,
                }),
                None => Some(DropTarget::Column {
                    id: column.id.clone(),
                }),
            }
        }
        DragItem::Column { .. } => Some(DropTarget::Column {
            id: column.id.clone(),
        }),
    }
}

pub fn drop_here(app: &mut AppState, modifiers: Modifiers) {
    let AppMode::Grab { item } = app.mode.clone() else {
        return;
    };
    let Some(target) = drop_target(app, &item) else {
        app.set_message("Nothing to drop onto here");
        return;
    };
    app.mode = AppMode::Normal;

    let ops = plan_drop(&item, &target, modifiers, &app.marked, &app.workspace.layout);
    if ops.is_empty() {
        app.clear_message();
        return;
    }
    let applied = app.workspace.layout.apply_all(&ops);
    let verb = if modifiers.clone { "Copied" } else { "Moved" };
    if applied == ops.len() {
        app.set_message(verb);
    } else {
        app.set_message(format!("{}: {} of {} steps applied", verb, applied, ops.len()));
    }

    if !modifiers.clone {
        match &item {
            DragItem::Box { id, .. } => {
                app.focus_box(id);
            }
            DragItem::Section { id, .. } => {
                app.focus_section(id);
            }
            DragItem::Column { id } => app.focus_column(id),
        }
    }
    if matches!(item, DragItem::Box { .. }) {
        app.marked.clear();
    }
    app.commit();
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn box_texts(app: &AppState, column: usize) -> Vec<String> {
        app.workspace.layout.columns[column]
            .sections
            .iter()
            .flat_map(|s| s.boxes.iter().map(|b| b.text.clone()))
            .collect()
    }

    #[test]
    fn test_grab_box_and_drop_on_other_column() {
        let mut app = demo_app();
        app.cursor.row = 1;
        grab(&mut app);
        assert!(matches!(app.mode, AppMode::Grab { .. }));

        // onto the first box of the second column
        app.cursor.column = 1;
        app.cursor.row = 1;
        drop_here(&mut app, Modifiers::default());

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(box_texts(&app, 0).len(), 2);
        assert_eq!(box_texts(&app, 1)[0], "Press c to create more columns");
        assert_eq!(app.cursor.column, 1);
        assert_eq!(app.cursor.row, 1);
    }

    #[test]
    fn test_copy_drop_keeps_source() {
        let mut app = demo_app();
        app.cursor.row = 1;
        grab(&mut app);
        app.cursor.column = 1;
        app.cursor.row = 0;
        drop_here(&mut app, Modifiers { clone: true, alt: false });
        assert_eq!(box_texts(&app, 0).len(), 3);
        assert_eq!(box_texts(&app, 1).len(), 5);
        assert_eq!(box_texts(&app, 1)[4], "Press c to create more columns");
    }

    #[test]
    fn test_group_drop_moves_marked_in_order() {
        let mut app = demo_app();
        app.cursor.row = 3;
        crate::actions::toggle_mark(&mut app);
        app.cursor.row = 1;
        crate::actions::toggle_mark(&mut app);
        grab(&mut app);
        app.cursor.column = 1;
        app.cursor.row = 1;
        drop_here(&mut app, Modifiers::default());
        let second = box_texts(&app, 1);
        assert_eq!(second[0], "Press b to create content boxes");
        assert_eq!(second[1], "Press c to create more columns");
        assert!(app.marked.is_empty());
    }

    #[test]
    fn test_drop_column_reorders() {
        let mut app = demo_app();
        let first = app.workspace.layout.columns[0].id.clone();
        grab_column(&mut app);
        app.cursor.column = 1;
        drop_here(&mut app, Modifiers::default());
        assert_eq!(app.workspace.layout.columns[1].id, first);
        assert_eq!(app.cursor.column, 1);
    }

    #[test]
    fn test_drop_on_itself_is_a_no_op() {
        let mut app = demo_app();
        let before = app.workspace.layout.clone();
        app.cursor.row = 2;
        grab(&mut app);
        drop_here(&mut app, Modifiers::default());
        assert_eq!(app.workspace.layout.columns, before.columns);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_section_drop_into_split_column() {
        let mut app = demo_app();
        let second = app.workspace.layout.columns[1].id.clone();
        app.workspace.layout.add_section(&second, "Extra").unwrap();
        app.workspace.layout.split_column(&second, 2).unwrap();
        app.commit();

        grab(&mut app);
        app.cursor.column = 1;
        app.cursor.row = 0;
        drop_here(&mut app, Modifiers::default());

        assert!(app.workspace.layout.columns[0].sections.iter().next().is_none());
        let parts = app.workspace.layout.columns[1].sections.parts().unwrap();
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[0][0].title, "Getting Started");
    }
}
