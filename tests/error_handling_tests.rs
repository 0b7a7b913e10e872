use explainator::app::AppMode;
use explainator::errors::AppError;
use explainator::export::{self, ExportError};
use explainator::model::{BoxPatch, ColumnPatch};
use explainator::storage::{Storage, LAYOUT_KEY};
use explainator::{actions, AppConfig, AppState, LayoutError};
use std::fs;
use tempfile::TempDir;

mod common;
use common::*;

#[test]
fn test_corrupt_store_fails_to_open() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::open(temp_dir.path()).unwrap();
    fs::write(storage.path_for(LAYOUT_KEY), "{ not json").unwrap();

    let result = AppState::open(AppConfig::with_data_dir(temp_dir.path()));
    assert!(matches!(result, Err(AppError::Storage(_))));
}

#[test]
fn test_failed_operations_leave_layout_untouched() {
    let mut app = demo_app();
    let before = app.workspace.layout.clone();
    let layout = &mut app.workspace.layout;
    let column = layout.columns[0].id.clone();

    assert_eq!(
        layout.update_column("missing", ColumnPatch::title("x")),
        Err(LayoutError::ColumnNotFound("missing".into()))
    );
    assert!(matches!(
        layout.add_box(&column, "missing", BoxPatch::text("x")),
        Err(LayoutError::SectionNotFound { .. })
    ));
    assert_eq!(
        layout.split_column(&column, 1),
        Err(LayoutError::InvalidSplitParts(1))
    );
    assert_eq!(
        layout.unsplit_column(&column),
        Err(LayoutError::NotSplit(column.clone()))
    );
    assert_eq!(app.workspace.layout, before);
}

#[test]
fn test_bad_prompt_input_shows_in_status_line() {
    let mut app = demo_app();
    key(&mut app, 'v');
    answer(&mut app, "many");
    assert_eq!(app.mode, AppMode::Normal);
    assert!(app
        .message
        .as_deref()
        .is_some_and(|m| m.starts_with("Not a number: many")));

    key(&mut app, 'v');
    answer(&mut app, "12");
    assert!(app
        .message
        .as_deref()
        .is_some_and(|m| m.contains("between 2 and 8")));
    assert!(!app.workspace.layout.columns[0].is_split());
}

#[test]
fn test_import_rejects_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("broken.json");
    fs::write(&file, "[1, 2").unwrap();

    let mut app = demo_app();
    let err = actions::import_from(&mut app, file.to_str().unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON file");
    assert_eq!(app.workspace.layout.columns.len(), 2);

    assert!(matches!(
        export::import_document("not json"),
        Err(ExportError::InvalidJson(_))
    ));
}

#[test]
fn test_missing_import_file_names_the_path() {
    let mut app = demo_app();
    let err = actions::import_from(&mut app, "/nonexistent/layout.json").unwrap_err();
    assert_eq!(err.to_string(), "Failed to read /nonexistent/layout.json");
}

#[test]
fn test_unknown_delimiter() {
    assert!(matches!(
        export::parse_delimiter("colon-ish"),
        Err(ExportError::UnknownDelimiter(_))
    ));
    assert_eq!(export::parse_delimiter(";").unwrap(), ';');
}

#[test]
fn test_editing_in_split_column_reports_error() {
    let mut app = demo_app();
    let column = app.workspace.layout.columns[0].id.clone();
    app.workspace.layout.split_column(&column, 2).unwrap();
    app.clamp_cursor();

    key(&mut app, 'j');
    key(&mut app, 'e');
    answer(&mut app, "Changed");
    assert_eq!(app.mode, AppMode::Normal);
    assert!(app.message.is_some());
    assert!(!box_texts(&app.workspace.layout, 0).contains(&"Changed".to_string()));
}
