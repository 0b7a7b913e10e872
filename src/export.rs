//! JSON export/import, the standalone HTML page, the text outline and
//! delimited batch import of boxes.

use crate::categories::CategoryStore;
use crate::layout::{LayoutError, LayoutState};
use crate::model::{
    BoxContent, BoxPatch, BoxWidth, CanvasConfig, CategoryMap, Column, Section, Sections,
};
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const EXPORT_VERSION: &str = "1.0";
const DEFAULT_HEADER_BACKGROUND: &str = "linear-gradient(to bottom, #8B4513, #A0522D)";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid JSON file")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown delimiter: {0}")]
    UnknownDelimiter(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Html,
    Outline,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "explainator-export.json",
            ExportFormat::Html => "explainator-export.html",
            ExportFormat::Outline => "explainator-outline.txt",
        }
    }

    /// Guesses the format from a file extension.
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ExportFormat::Json),
            "html" | "htm" => Some(ExportFormat::Html),
            "txt" => Some(ExportFormat::Outline),
            _ => None,
        }
    }
}

/// The workspace rendered in `format`.
pub fn render(workspace: &Workspace, format: ExportFormat) -> ExportResult<String> {
    Ok(match format {
        ExportFormat::Json => to_json(workspace)?,
        ExportFormat::Html => to_html(&workspace.layout, &workspace.categories),
        ExportFormat::Outline => outline(&workspace.layout),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasConfig>,
}

impl ExportDocument {
    pub fn capture(workspace: &Workspace) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: chrono::Utc::now().to_rfc3339(),
            columns: workspace.layout.columns.clone(),
            categories: Some(workspace.categories.categories.clone()),
            canvas: Some(workspace.canvas.config()),
        }
    }
}

pub fn to_json(workspace: &Workspace) -> ExportResult<String> {
    let json = serde_json::to_string_pretty(&ExportDocument::capture(workspace))?;
    info!(columns = workspace.layout.columns.len(), "exported JSON");
    Ok(json)
}

pub fn import_document(text: &str) -> ExportResult<ExportDocument> {
    serde_json::from_str(text).map_err(ExportError::InvalidJson)
}

/// Loads the document's columns as-is; categories and canvas settings are
/// replaced only when the document carries them.
pub fn apply_import(document: ExportDocument, workspace: &mut Workspace) {
    workspace.layout.load_layout(document.columns);
    if let Some(categories) = document.categories {
        workspace.categories.load(categories);
    }
    if let Some(canvas) = document.canvas {
        workspace.canvas.apply_config(canvas);
    }
    workspace.prune_connectors();
    info!(columns = workspace.layout.columns.len(), "imported document");
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Explainator Export</title>
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: Arial, sans-serif; background: #f5f5f5; padding: 20px; }
    .container { display: flex; gap: 20px; max-width: 1400px; margin: 0 auto; }
    .column { background: white; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); min-width: 300px; }
    .column-header { padding: 15px; color: white; font-weight: bold; font-size: 18px; border-radius: 8px 8px 0 0; }
    .column-content { padding: 15px; }
    .section { margin-bottom: 20px; }
    .section-title { padding: 8px 12px; background: #f0f0f0; border-radius: 4px; margin-bottom: 10px; font-weight: bold; font-size: 14px; }
    .box { padding: 10px 12px; margin-bottom: 8px; border-radius: 4px; font-size: 14px; color: white; }
    .box.half-width { display: inline-block; width: calc(50% - 4px); }
    .box hr { border: none; border-top: 2px solid currentColor; }
    .box img { max-width: 100%; }
  </style>
</head>
<body>
  <div class="container">
"#;

/// Standalone page with one `.column` per column. Split columns show their
/// header only.
pub fn to_html(layout: &LayoutState, categories: &CategoryStore) -> String {
    let mut html = String::from(HTML_HEAD);
    for column in &layout.columns {
        let header = column
            .header_color
            .as_deref()
            .unwrap_or(DEFAULT_HEADER_BACKGROUND);
        let _ = write!(
            html,
            "    <div class=\"column\">\n      <div class=\"column-header\" style=\"background: {}\">\n        {}\n      </div>\n      <div class=\"column-content\">\n",
            escape_html(header),
            escape_html(&column.title)
        );
        for section in column.sections.flat().into_iter().flatten() {
            let _ = write!(
                html,
                "        <div class=\"section\">\n          <div class=\"section-title\">{}</div>\n",
                escape_html(&section.title)
            );
            for item in &section.boxes {
                let background = categories.gradient(&item.category);
                let color = item
                    .text_color
                    .as_deref()
                    .unwrap_or_else(|| categories.text_color(&item.category));
                let body = match &item.content {
                    BoxContent::Text => escape_html(&item.text),
                    BoxContent::Image { src } => format!("<img src=\"{}\" alt=\"\">", escape_html(src)),
                    BoxContent::Line { style } => format!("<hr class=\"{}\">", escape_html(style)),
                };
                let width = if item.width == BoxWidth::Half {
                    " half-width"
                } else {
                    ""
                };
                let _ = write!(
                    html,
                    "          <div class=\"box{width}\" style=\"background: {background}; color: {};\">\n            {body}\n          </div>\n",
                    escape_html(color)
                );
            }
            html.push_str("        </div>\n");
        }
        html.push_str("      </div>\n    </div>\n");
    }
    html.push_str("  </div>\n</body>\n</html>\n");
    debug!(bytes = html.len(), "rendered HTML");
    html
}

fn outline_section(out: &mut String, depth: usize, section: &Section) {
    let indent = "\t".repeat(depth);
    let _ = writeln!(out, "{indent}[{}]", section.title);
    for item in &section.boxes {
        let text = match &item.content {
            BoxContent::Text => item.text.as_str(),
            BoxContent::Image { .. } => "(image)",
            BoxContent::Line { .. } => "----",
        };
        let _ = writeln!(out, "{indent}\t{text}");
    }
}

/// Plain-text outline: column titles flush left, `[section]` lines one tab
/// in, box texts two tabs in. Split parts add a `Part N` level.
pub fn outline(layout: &LayoutState) -> String {
    let mut out = String::new();
    for column in &layout.columns {
        let _ = writeln!(out, "{}", column.title);
        match &column.sections {
            Sections::Flat(list) => {
                for section in list {
                    outline_section(&mut out, 1, section);
                }
            }
            Sections::Split(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    let _ = writeln!(out, "\tPart {}", i + 1);
                    for section in part {
                        outline_section(&mut out, 2, section);
                    }
                }
            }
        }
    }
    out
}

/// Resolves a delimiter name (`comma`, `semicolon`, `tab`, `pipe`) or a
/// literal single character.
pub fn parse_delimiter(name: &str) -> ExportResult<char> {
    match name.to_ascii_lowercase().as_str() {
        "comma" => Ok(','),
        "semicolon" => Ok(';'),
        "tab" => Ok('\t'),
        "pipe" => Ok('|'),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(ExportError::UnknownDelimiter(name.to_string())),
            }
        }
    }
}

/// Adds one box per line of `text<delimiter>category`. Blank lines and lines
/// without text are skipped; a missing category uses `default_category`.
/// Returns how many boxes were added.
pub fn batch_import(
    layout: &mut LayoutState,
    column_id: &str,
    section_id: &str,
    input: &str,
    delimiter: char,
    default_category: &str,
) -> ExportResult<usize> {
    // Fail on a bad target before touching anything.
    layout.update_section(column_id, section_id, Default::default())?;
    let mut added = 0;
    for line in input.lines() {
        let mut fields = line.split(delimiter).map(str::trim);
        let text = fields.next().unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        let category = fields
            .next()
            .filter(|c| !c.is_empty())
            .unwrap_or(default_category);
        layout.add_box(
            column_id,
            section_id,
            BoxPatch::text(text).with_category(category),
        )?;
        added += 1;
    }
    info!(added, column = column_id, section = section_id, "batch import");
    Ok(added)
}
