//! Non-interactive subcommands run against the stored workspace.

use crate::app::AppState;
use crate::config::Command;
use crate::export::{self, ExportFormat};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Runs one subcommand, writing anything meant for the user to `out`.
/// `Edit` has nothing to do here; the caller opens the terminal editor.
pub fn run_command(command: &Command, app: &mut AppState, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Edit => Ok(()),
        Command::Outline => {
            write!(out, "{}", export::outline(&app.workspace.layout))?;
            Ok(())
        }
        Command::Export { format, output } => export_to(app, *format, output.as_deref(), out),
        Command::Import { file } => import(app, file, out),
        Command::BatchImport {
            column,
            section,
            delimiter,
            category,
            file,
        } => {
            let delimiter = delimiter
                .clone()
                .unwrap_or_else(|| app.config.batch_delimiter.clone());
            let category = category
                .clone()
                .unwrap_or_else(|| app.config.default_category.clone());
            batch_import(app, *column, *section, &delimiter, &category, file, out)
        }
        Command::Reset { demo } => {
            if *demo {
                app.workspace.layout = crate::layout::LayoutState::demo();
            } else {
                app.workspace.layout.clear_layout();
            }
            app.workspace.prune_connectors();
            save(app)?;
            writeln!(out, "Layout reset")?;
            Ok(())
        }
    }
}

fn save(app: &AppState) -> Result<()> {
    if let Some(storage) = &app.storage {
        app.workspace
            .persist(storage)
            .context("Failed to save the workspace")?;
    }
    Ok(())
}

fn export_to(
    app: &AppState,
    format: ExportFormat,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let content = export::render(&app.workspace, format)?;
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), ?format, "exported");
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => write!(out, "{}", content)?,
    }
    Ok(())
}

fn import(app: &mut AppState, file: &Path, out: &mut impl Write) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document = export::import_document(&text)?;
    export::apply_import(document, &mut app.workspace);
    save(app)?;
    writeln!(
        out,
        "Imported {} columns",
        app.workspace.layout.columns.len()
    )?;
    Ok(())
}

/// `column` and `section` count from 1, the way they appear on screen.
fn batch_import(
    app: &mut AppState,
    column: usize,
    section: usize,
    delimiter: &str,
    category: &str,
    file: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let (column_id, section_id) = {
        let target = column
            .checked_sub(1)
            .and_then(|i| app.workspace.layout.columns.get(i))
            .ok_or_else(|| anyhow!("No column at position {}", column))?;
        let section_id = section
            .checked_sub(1)
            .and_then(|i| target.sections.iter().nth(i))
            .map(|s| s.id.clone())
            .ok_or_else(|| anyhow!("No section at position {} in \"{}\"", section, target.title))?;
        (target.id.clone(), section_id)
    };

    let delimiter = export::parse_delimiter(delimiter)?;
    let input = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let added = export::batch_import(
        &mut app.workspace.layout,
        &column_id,
        &section_id,
        &input,
        delimiter,
        category,
    )?;
    save(app)?;
    writeln!(out, "Added {} boxes", added)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::tempdir;

    fn open(dir: &Path) -> AppState {
        AppState::open(AppConfig::with_data_dir(dir)).unwrap()
    }

    fn run(app: &mut AppState, command: Command) -> String {
        let mut out = Vec::new();
        run_command(&command, app, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_batch_import_uses_one_based_positions() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("boxes.csv");
        fs::write(&file, "Alpha,red\nBeta\n\n").unwrap();

        let mut app = open(dir.path());
        let out = run(
            &mut app,
            Command::BatchImport {
                column: 2,
                section: 1,
                delimiter: Some("comma".into()),
                category: None,
                file: file.clone(),
            },
        );
        assert_eq!(out, "Added 2 boxes\n");

        let reopened = open(dir.path());
        let boxes = &reopened.workspace.layout.columns[1]
            .sections
            .iter()
            .next()
            .unwrap()
            .boxes;
        let added: Vec<_> = boxes[boxes.len() - 2..]
            .iter()
            .map(|b| (b.text.as_str(), b.category.as_str()))
            .collect();
        assert_eq!(added, vec![("Alpha", "red"), ("Beta", "blue")]);

        let mut out = Vec::new();
        let bad = Command::BatchImport {
            column: 0,
            section: 1,
            delimiter: None,
            category: None,
            file,
        };
        let err = run_command(&bad, &mut app, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "No column at position 0");
    }

    #[test]
    fn test_export_then_import_into_fresh_dir() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();
        let file = source.path().join("layout.json");

        let mut app = open(source.path());
        run(
            &mut app,
            Command::Export {
                format: ExportFormat::Json,
                output: Some(file.clone()),
            },
        );

        let mut fresh = AppState::open(AppConfig {
            demo_on_first_run: false,
            ..AppConfig::with_data_dir(target.path())
        })
        .unwrap();
        assert!(fresh.workspace.layout.columns.is_empty());
        let out = run(&mut fresh, Command::Import { file });
        assert_eq!(out, "Imported 2 columns\n");
        assert_eq!(
            open(target.path()).workspace.layout.columns,
            app.workspace.layout.columns
        );
    }

    #[test]
    fn test_outline_and_reset() {
        let dir = tempdir().unwrap();
        let mut app = open(dir.path());
        let outline = run(&mut app, Command::Outline);
        assert!(outline.starts_with("Welcome to Explainator\n"));

        run(&mut app, Command::Reset { demo: false });
        assert!(open(dir.path()).workspace.layout.columns.is_empty());
        run(&mut app, Command::Reset { demo: true });
        assert_eq!(open(dir.path()).workspace.layout.columns.len(), 2);
    }
}
