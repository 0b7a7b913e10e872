use crate::canvas::ConnectorDraft;
use crate::errors::StoreError;
use crate::model::{CategoryMap, Column, Connector};
use crate::slides::{Slide, SlideDeck};
use crate::workspace::Workspace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::info;

pub const PROJECT_VERSION: &str = "1.0.0";
pub const UNTITLED_PROJECT: &str = "Untitled Project";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLayout {
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCanvas {
    #[serde(default)]
    pub canvas_mode: bool,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default)]
    pub snap_to_grid: bool,
    #[serde(default)]
    pub grid_size: u32,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSlides {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub current_slide_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
    pub version: String,
    pub layout: ProjectLayout,
    #[serde(default)]
    pub categories: Option<CategoryMap>,
    #[serde(default)]
    pub canvas: Option<ProjectCanvas>,
    #[serde(default)]
    pub slides: Option<ProjectSlides>,
}

impl Project {
    pub fn capture(name: &str, description: &str, workspace: &Workspace) -> Self {
        let canvas = &workspace.canvas;
        Self {
            name: name.to_string(),
            description: description.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            version: PROJECT_VERSION.to_string(),
            layout: ProjectLayout {
                columns: workspace.layout.columns.clone(),
            },
            categories: Some(workspace.categories.categories.clone()),
            canvas: Some(ProjectCanvas {
                canvas_mode: canvas.enabled,
                width: canvas.width,
                height: canvas.height,
                show_grid: canvas.show_grid,
                snap_to_grid: canvas.snap_to_grid,
                grid_size: canvas.grid_size,
                connectors: canvas.connectors.clone(),
            }),
            slides: Some(ProjectSlides {
                slides: workspace.slides.slides.clone(),
                current_slide_id: workspace.slides.current.clone(),
            }),
        }
    }

    /// Replaces the workspace contents with this project. Columns, connectors
    /// and slides are recreated, so they all get fresh ids.
    pub fn restore(&self, workspace: &mut Workspace) -> Result<(), StoreError> {
        workspace
            .layout
            .rehydrate(&self.layout.columns)
            .map_err(|e| StoreError::InvalidProject(e.to_string()))?;
        // rehydrate keeps column order, so saved ids map to new ids by position
        let renamed: HashMap<&str, String> = self
            .layout
            .columns
            .iter()
            .zip(&workspace.layout.columns)
            .map(|(old, new)| (old.id.as_str(), new.id.clone()))
            .collect();

        if let Some(categories) = &self.categories {
            workspace.categories.load(categories.clone());
        }

        if let Some(saved) = &self.canvas {
            let canvas = &mut workspace.canvas;
            canvas.enabled = saved.canvas_mode;
            if saved.width > 0 && saved.height > 0 {
                canvas.set_custom_size(saved.width, saved.height);
            }
            canvas.clear_connectors();
            for connector in &saved.connectors {
                let (Some(from), Some(to)) = (
                    renamed.get(connector.from_column_id.as_str()),
                    renamed.get(connector.to_column_id.as_str()),
                ) else {
                    continue;
                };
                canvas.add_connector(ConnectorDraft {
                    from_column_id: from.to_string(),
                    to_column_id: to.to_string(),
                    from_anchor: connector.from_anchor,
                    to_anchor: connector.to_anchor,
                    color: connector.color.clone(),
                    stroke_width: connector.stroke_width,
                });
            }
        }

        workspace.slides.clear();
        if let Some(saved) = &self.slides {
            let mut ordered: Vec<&Slide> = saved.slides.iter().collect();
            ordered.sort_by_key(|s| s.order);
            for slide in ordered {
                let id = add_restored_slide(&mut workspace.slides, slide)?;
                if saved.current_slide_id.as_deref() == Some(slide.id.as_str()) {
                    workspace.slides.set_current(Some(id));
                }
            }
        }
        info!(project = %self.name, "project restored");
        Ok(())
    }
}

fn add_restored_slide(deck: &mut SlideDeck, slide: &Slide) -> Result<String, StoreError> {
    let name = if slide.name.trim().is_empty() {
        "Slide"
    } else {
        slide.name.as_str()
    };
    deck.add(name, slide.layout_snapshot.clone())
}

/// `My Project!` becomes `my_project__project.json`.
pub fn download_file_name(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("static regex"));
    format!("{}_project.json", re.replace_all(name, "_").to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectLibrary {
    pub projects: Vec<Project>,
}

impl ProjectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Stores a project, replacing one of the same name. Returns `true` when
    /// something was replaced.
    fn upsert(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.name == project.name) {
            Some(existing) => {
                *existing = project;
                true
            }
            None => {
                self.projects.push(project);
                false
            }
        }
    }

    pub fn save(
        &mut self,
        name: &str,
        description: &str,
        workspace: &Workspace,
    ) -> Result<bool, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        let replaced = self.upsert(Project::capture(name, description, workspace));
        info!(project = name, replaced, "project saved");
        Ok(replaced)
    }

    pub fn load(&self, name: &str, workspace: &mut Workspace) -> Result<(), StoreError> {
        self.get(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?
            .restore(workspace)
    }

    pub fn delete(&mut self, name: &str) -> Result<Project, StoreError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        Ok(self.projects.remove(index))
    }

    /// File name and pretty JSON body for a stored project.
    pub fn download(&self, name: &str) -> Result<(String, String), StoreError> {
        let project = self
            .get(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        render_download(project)
    }

    /// Same as [`download`](Self::download) for the unsaved current workspace.
    pub fn download_current(
        name: Option<&str>,
        description: Option<&str>,
        workspace: &Workspace,
    ) -> Result<(String, String), StoreError> {
        let project = Project::capture(
            name.filter(|n| !n.trim().is_empty()).unwrap_or(UNTITLED_PROJECT),
            description.unwrap_or("Exported project"),
            workspace,
        );
        render_download(&project)
    }

    /// Adds a project from an uploaded file. Returns the project name and
    /// whether an existing project was overwritten.
    pub fn upload(&mut self, json: &str) -> Result<(String, bool), StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidProject(e.to_string()))?;
        let present = |field: &str| match value.get(field) {
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        };
        for field in ["name", "version", "layout"] {
            if !present(field) {
                return Err(StoreError::InvalidProject(format!("missing {field}")));
            }
        }
        let project: Project = serde_json::from_value(value)
            .map_err(|e| StoreError::InvalidProject(e.to_string()))?;
        let name = project.name.clone();
        let replaced = self.upsert(project);
        info!(project = %name, replaced, "project uploaded");
        Ok((name, replaced))
    }
}

fn render_download(project: &Project) -> Result<(String, String), StoreError> {
    let body = serde_json::to_string_pretty(project)
        .map_err(|e| StoreError::InvalidProject(e.to_string()))?;
    Ok((download_file_name(&project.name), body))
}
