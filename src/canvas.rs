use crate::errors::StoreError;
use crate::model::{new_id, Anchor, CanvasConfig, Connector};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_GRID_SIZE: u32 = 40;

pub struct Preset {
    pub key: &'static str,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub static PRESETS: [Preset; 9] = [
    Preset { key: "hd-720", name: "HD 720p", width: 1280, height: 720 },
    Preset { key: "full-hd", name: "Full HD 1080p", width: 1920, height: 1080 },
    Preset { key: "4k", name: "4K UHD", width: 3840, height: 2160 },
    Preset { key: "instagram-post", name: "Instagram Post", width: 1080, height: 1080 },
    Preset { key: "instagram-story", name: "Instagram Story", width: 1080, height: 1920 },
    Preset { key: "twitter-post", name: "Twitter Post", width: 1200, height: 675 },
    Preset { key: "linkedin-post", name: "LinkedIn Post", width: 1200, height: 627 },
    Preset { key: "a4-landscape", name: "A4 Landscape", width: 1754, height: 1240 },
    Preset { key: "a4-portrait", name: "A4 Portrait", width: 1240, height: 1754 },
];

pub fn preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key == key)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorDraft {
    pub from_column_id: String,
    pub to_column_id: String,
    pub from_anchor: Anchor,
    pub to_anchor: Anchor,
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
}

impl ConnectorDraft {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_column_id: from.into(),
            to_column_id: to.into(),
            from_anchor: Anchor::Right,
            to_anchor: Anchor::Left,
            color: None,
            stroke_width: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorPatch {
    pub from_anchor: Option<Anchor>,
    pub to_anchor: Option<Anchor>,
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
}

/// Canvas mode settings plus the transient connector-editing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    #[serde(rename = "canvasMode")]
    pub enabled: bool,
    #[serde(rename = "canvasWidth")]
    pub width: u32,
    #[serde(rename = "canvasHeight")]
    pub height: u32,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: u32,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub connector_mode: bool,
    #[serde(default, rename = "selectedConnectorId")]
    pub selected_connector: Option<String>,
    #[serde(default)]
    pub pending_from_column: Option<String>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1920,
            height: 1080,
            show_grid: true,
            snap_to_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
            connectors: Vec::new(),
            connector_mode: false,
            selected_connector: None,
            pending_from_column: None,
        }
    }
}

impl CanvasState {
    pub fn toggle_mode(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn set_preset(&mut self, key: &str) -> Result<(), StoreError> {
        let preset = preset(key).ok_or_else(|| StoreError::UnknownPreset(key.to_string()))?;
        self.width = preset.width;
        self.height = preset.height;
        Ok(())
    }

    pub fn set_custom_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_snap(&mut self) {
        self.snap_to_grid = !self.snap_to_grid;
    }

    /// Rounds a coordinate to the nearest grid line when snapping is on.
    pub fn snap(&self, value: f64) -> f64 {
        if !self.snap_to_grid || self.grid_size == 0 {
            return value;
        }
        let grid = f64::from(self.grid_size);
        (value / grid).round() * grid
    }

    pub fn add_connector(&mut self, draft: ConnectorDraft) -> String {
        let id = format!("connector-{}", new_id());
        self.connectors.push(Connector {
            id: id.clone(),
            from_column_id: draft.from_column_id,
            to_column_id: draft.to_column_id,
            from_anchor: draft.from_anchor,
            to_anchor: draft.to_anchor,
            color: draft.color,
            stroke_width: draft.stroke_width,
        });
        debug!(connector = %id, "connector added");
        id
    }

    pub fn update_connector(&mut self, id: &str, patch: ConnectorPatch) -> Result<(), StoreError> {
        let connector = self
            .connectors
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::ConnectorNotFound(id.to_string()))?;
        if let Some(anchor) = patch.from_anchor {
            connector.from_anchor = anchor;
        }
        if let Some(anchor) = patch.to_anchor {
            connector.to_anchor = anchor;
        }
        if let Some(color) = patch.color {
            connector.color = Some(color);
        }
        if let Some(width) = patch.stroke_width {
            connector.stroke_width = Some(width);
        }
        Ok(())
    }

    pub fn delete_connector(&mut self, id: &str) -> Result<Connector, StoreError> {
        let index = self
            .connectors
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::ConnectorNotFound(id.to_string()))?;
        if self.selected_connector.as_deref() == Some(id) {
            self.selected_connector = None;
        }
        Ok(self.connectors.remove(index))
    }

    pub fn select_connector(&mut self, id: Option<String>) {
        self.selected_connector = id;
    }

    pub fn toggle_connector_mode(&mut self) -> bool {
        self.connector_mode = !self.connector_mode;
        self.pending_from_column = None;
        self.connector_mode
    }

    pub fn clear_connectors(&mut self) {
        self.connectors.clear();
        self.selected_connector = None;
    }

    /// Two-step connector creation. The first column picked becomes the
    /// source; picking a second, different column links them right to left.
    /// Returns the new connector id once both ends are known.
    pub fn connect_pending(&mut self, column_id: &str) -> Option<String> {
        match self.pending_from_column.take() {
            Some(from) if from != column_id => {
                Some(self.add_connector(ConnectorDraft::new(from, column_id)))
            }
            _ => {
                self.pending_from_column = Some(column_id.to_string());
                None
            }
        }
    }

    /// Drops connectors whose endpoints are no longer among `column_ids`.
    pub fn prune(&mut self, column_ids: &[&str]) -> usize {
        let before = self.connectors.len();
        self.connectors.retain(|c| {
            column_ids.contains(&c.from_column_id.as_str())
                && column_ids.contains(&c.to_column_id.as_str())
        });
        if let Some(selected) = &self.selected_connector {
            if !self.connectors.iter().any(|c| &c.id == selected) {
                self.selected_connector = None;
            }
        }
        before - self.connectors.len()
    }

    pub fn config(&self) -> CanvasConfig {
        CanvasConfig {
            enabled: self.enabled,
            width: self.width,
            height: self.height,
            show_grid: self.show_grid,
            snap_to_grid: self.snap_to_grid,
            grid_size: self.grid_size,
            connectors: self.connectors.clone(),
        }
    }

    /// Replaces settings and connectors; editing state is reset.
    pub fn apply_config(&mut self, config: CanvasConfig) {
        *self = Self {
            enabled: config.enabled,
            width: config.width,
            height: config.height,
            show_grid: config.show_grid,
            snap_to_grid: config.snap_to_grid,
            grid_size: config.grid_size,
            connectors: config.connectors,
            ..Self::default()
        };
    }
}
