use crate::app::{AppState, EditTarget};
use crate::export::{self, ExportFormat};
use anyhow::{bail, Context, Result};
use clipboard::{ClipboardContext, ClipboardProvider};
use std::fs;
use std::path::Path;
use tracing::info;

use super::editing::start_editing;

pub fn start_export(app: &mut AppState) {
    let format = ExportFormat::Json;
    start_editing(app, EditTarget::ExportFile(format), format.default_file_name());
}

pub fn start_import(app: &mut AppState) {
    start_editing(app, EditTarget::ImportFile, "");
}

pub fn start_batch_import(app: &mut AppState) {
    let Some((column, section)) = app.focused_section() else {
        app.set_message("Put the cursor on a section to import into");
        return;
    };
    start_editing(app, EditTarget::BatchImport { column, section }, "");
}

pub fn start_save_project(app: &mut AppState) {
    start_editing(app, EditTarget::SaveProject, "");
}

pub fn start_load_project(app: &mut AppState) {
    let Some(latest) = app.projects.projects.iter().max_by_key(|p| p.timestamp) else {
        app.set_message("No saved projects");
        return;
    };
    let name = latest.name.clone();
    start_editing(app, EditTarget::LoadProject, name);
}

/// Writes the workspace to `path`; the extension picks the format when it names one.
pub fn export_to(app: &mut AppState, format: ExportFormat, path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("No file name given");
    }
    let path = Path::new(path);
    let format = ExportFormat::for_path(path).unwrap_or(format);
    let content = export::render(&app.workspace, format)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), ?format, "exported");
    app.set_message(format!("Exported to {}", path.display()));
    Ok(())
}

pub fn import_from(app: &mut AppState, path: &str) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let document = export::import_document(&text)?;
    export::apply_import(document, &mut app.workspace);
    app.marked.clear();
    app.cursor = Default::default();
    app.commit();
    app.set_message(format!(
        "Imported {} columns",
        app.workspace.layout.columns.len()
    ));
    Ok(())
}

pub fn batch_import_from(app: &mut AppState, column: &str, section: &str, path: &str) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let delimiter = export::parse_delimiter(&app.config.batch_delimiter)?;
    let added = export::batch_import(
        &mut app.workspace.layout,
        column,
        section,
        &text,
        delimiter,
        &app.config.default_category,
    )?;
    app.commit();
    app.set_message(format!("Added {} boxes", added));
    Ok(())
}

pub fn copy_outline(app: &mut AppState) {
    let output = export::outline(&app.workspace.layout);

    // Copy to clipboard
    if let Ok(mut ctx) = ClipboardContext::new() {
        let _ = ctx.set_contents(output.clone());
    }
    app.clipboard = Some(output);

    app.set_message("Copied the outline to clipboard.");
}

pub fn save_project(app: &mut AppState, name: &str) -> Result<()> {
    let replaced = app.projects.save(name, "", &app.workspace)?;
    if app.persist_projects() {
        let verb = if replaced { "Replaced" } else { "Saved" };
        app.set_message(format!("{} project \"{}\"", verb, name));
    }
    Ok(())
}

pub fn load_project(app: &mut AppState, name: &str) -> Result<()> {
    app.projects.load(name, &mut app.workspace)?;
    app.marked.clear();
    app.cursor = Default::default();
    app.commit();
    app.set_message(format!("Loaded project \"{}\"", name));
    Ok(())
}

pub fn start_edit_notes(app: &mut AppState) {
    let notes = app.workspace.notes.clone();
    start_editing(app, EditTarget::Notes, notes);
}

pub fn save_notes(app: &mut AppState, notes: &str) {
    app.workspace.notes = notes.to_string();
    app.commit();
    let msg = if notes.is_empty() { "Notes cleared" } else { "Notes saved" };
    app.set_message(msg);
}
