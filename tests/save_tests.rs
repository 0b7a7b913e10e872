use explainator::actions::{self, Action};
use explainator::export::ExportFormat;
use explainator::storage::{Storage, LAYOUT_KEY, NOTES_KEY, PROJECTS_KEY};
use explainator::{AppConfig, AppState};
use std::fs;
use tempfile::TempDir;

mod common;
use common::*;

#[test]
fn test_every_change_is_written_through() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = stored_app(temp_dir.path());
    assert_eq!(app.workspace.layout.columns.len(), 2);

    key(&mut app, 'c');
    answer(&mut app, "Later");

    let reopened = stored_app(temp_dir.path());
    let titles: Vec<_> = reopened
        .workspace
        .layout
        .columns
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Welcome to Explainator", "Features", "Later"]);
}

#[test]
fn test_without_write_through_quit_saves() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig {
        write_through: false,
        ..AppConfig::with_data_dir(temp_dir.path())
    };
    let mut app = AppState::open(config).unwrap();
    key(&mut app, 'D');
    assert_eq!(app.workspace.layout.columns.len(), 1);

    let storage = Storage::open(temp_dir.path()).unwrap();
    assert!(!storage.contains(LAYOUT_KEY));

    actions::execute_action(Action::Quit, &mut app).unwrap();
    assert!(!app.running);
    assert_eq!(stored_app(temp_dir.path()).workspace.layout.columns.len(), 1);
}

#[test]
fn test_projects_survive_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = stored_app(temp_dir.path());
    key(&mut app, 'S');
    answer(&mut app, "Pitch");
    assert_eq!(app.message.as_deref(), Some("Saved project \"Pitch\""));

    key(&mut app, 'D');
    key(&mut app, 'D');
    assert!(app.workspace.layout.columns.is_empty());

    let mut reopened = stored_app(temp_dir.path());
    assert!(reopened.workspace.layout.columns.is_empty());
    assert!(reopened.projects.get("Pitch").is_some());

    // the prompt defaults to the most recent project
    key(&mut reopened, 'P');
    enter(&mut reopened);
    assert_eq!(reopened.workspace.layout.columns.len(), 2);
    assert_eq!(stored_app(temp_dir.path()).workspace.layout.columns.len(), 2);

    let storage = Storage::open(temp_dir.path()).unwrap();
    assert!(storage.contains(PROJECTS_KEY));
}

#[test]
fn test_saving_a_project_twice_replaces_it() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = stored_app(temp_dir.path());
    actions::save_project(&mut app, "Deck").unwrap();
    key(&mut app, 'D');
    actions::save_project(&mut app, "Deck").unwrap();

    assert_eq!(app.message.as_deref(), Some("Replaced project \"Deck\""));
    assert_eq!(app.projects.projects.len(), 1);
}

#[test]
fn test_export_picks_format_from_extension() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = demo_app();

    let html = temp_dir.path().join("layout.html");
    actions::export_to(&mut app, ExportFormat::Json, html.to_str().unwrap()).unwrap();
    let page = fs::read_to_string(&html).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("Welcome to Explainator"));

    let outline = temp_dir.path().join("layout.txt");
    actions::export_to(&mut app, ExportFormat::Json, outline.to_str().unwrap()).unwrap();
    assert!(fs::read_to_string(&outline)
        .unwrap()
        .starts_with("Welcome to Explainator\n\t[Getting Started]\n"));
}

#[test]
fn test_json_export_imports_into_an_empty_workspace() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("layout.json");
    let mut source = demo_app();
    source.workspace.canvas.toggle_mode();
    key(&mut source, 'x');
    answer(&mut source, file.to_str().unwrap());
    assert!(file.exists());

    let mut target = empty_app();
    actions::import_from(&mut target, file.to_str().unwrap()).unwrap();
    assert_eq!(
        target.workspace.layout.columns,
        source.workspace.layout.columns
    );
    assert!(target.workspace.canvas.enabled);
    assert_eq!(target.message.as_deref(), Some("Imported 2 columns"));
}

#[test]
fn test_batch_import_into_focused_section() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("boxes.tsv");
    fs::write(&file, "First\tgreen\nSecond\n").unwrap();

    let mut app = demo_app();
    key(&mut app, 'B');
    answer(&mut app, file.to_str().unwrap());

    assert_eq!(app.message.as_deref(), Some("Added 2 boxes"));
    let column = &app.workspace.layout.columns[0];
    let boxes = &column.sections.iter().next().unwrap().boxes;
    assert_eq!(boxes.len(), 5);
    assert_eq!(boxes[3].text, "First");
    assert_eq!(boxes[3].category, "green");
    assert_eq!(boxes[4].category, "blue");
}

#[test]
fn test_notes_survive_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = stored_app(temp_dir.path());
    key(&mut app, 'N');
    answer(&mut app, "Ask about Q3 numbers");
    assert_eq!(app.message.as_deref(), Some("Notes saved"));

    let mut reopened = stored_app(temp_dir.path());
    assert_eq!(reopened.workspace.notes, "Ask about Q3 numbers");

    key(&mut reopened, 'N');
    answer(&mut reopened, "");
    assert_eq!(reopened.message.as_deref(), Some("Notes cleared"));
    let storage = Storage::open(temp_dir.path()).unwrap();
    assert!(!storage.contains(NOTES_KEY));
}
