use crate::errors::StoreError;
use crate::layout::LayoutState;
use crate::model::{new_id, Column};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub name: String,
    /// JSON text of `{"columns": [...]}`.
    pub layout_snapshot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub order: usize,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
    #[serde(rename = "currentSlideId")]
    pub current: Option<String>,
    #[serde(default, rename = "presentationMode")]
    pub presentation: bool,
}

/// Serializes the current columns the way slides store them.
pub fn capture(layout: &LayoutState) -> Result<String, StoreError> {
    serde_json::to_string(&Snapshot {
        columns: layout.columns.clone(),
    })
    .map_err(|e| StoreError::InvalidSnapshot(e.to_string()))
}

pub fn parse_snapshot(snapshot: &str) -> Result<Vec<Column>, StoreError> {
    serde_json::from_str::<Snapshot>(snapshot)
        .map(|s| s.columns)
        .map_err(|e| StoreError::InvalidSnapshot(e.to_string()))
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::SlideNotFound(id.to_string())
    }

    fn sorted_ids(&self) -> Vec<&str> {
        let mut sorted: Vec<&Slide> = self.slides.iter().collect();
        sorted.sort_by_key(|s| s.order);
        sorted.into_iter().map(|s| s.id.as_str()).collect()
    }

    fn renumber(&mut self) {
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.order = i;
        }
    }

    pub fn add(&mut self, name: &str, snapshot: String) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        let id = new_id();
        self.slides.push(Slide {
            id: id.clone(),
            name: name.to_string(),
            layout_snapshot: snapshot,
            thumbnail: None,
            order: self.slides.len(),
        });
        info!(slide = %id, name, "slide added");
        Ok(id)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        let slide = self
            .slides
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        slide.name = name.to_string();
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Slide, StoreError> {
        let index = self
            .slides
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        let removed = self.slides.remove(index);
        self.renumber();
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Ok(removed)
    }

    /// Puts the listed slides first in the given order; unlisted slides follow
    /// in their previous order. Unknown ids are rejected.
    pub fn reorder(&mut self, ids: &[String]) -> Result<(), StoreError> {
        if let Some(unknown) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(Self::not_found(unknown));
        }
        let mut remaining = std::mem::take(&mut self.slides);
        remaining.sort_by_key(|s| s.order);
        for id in ids {
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                self.slides.push(remaining.remove(pos));
            }
        }
        self.slides.append(&mut remaining);
        self.renumber();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Slides in presentation order.
    pub fn ordered(&self) -> Vec<&Slide> {
        self.sorted_ids()
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_current(&mut self, id: Option<String>) {
        self.current = id;
    }

    pub fn toggle_presentation(&mut self) -> bool {
        self.presentation = !self.presentation;
        self.presentation
    }

    /// Advances to the next slide; with no current slide that is the first one.
    pub fn next(&mut self) -> Option<&Slide> {
        let ids = self.sorted_ids();
        let next = match self.current.as_deref() {
            None => ids.first(),
            Some(current) => {
                let position = ids.iter().position(|id| *id == current);
                match position {
                    Some(i) => ids.get(i + 1),
                    None => ids.first(),
                }
            }
        }
        .map(|id| id.to_string());
        if let Some(id) = next {
            self.current = Some(id);
        }
        self.current_slide()
    }

    pub fn previous(&mut self) -> Option<&Slide> {
        let ids = self.sorted_ids();
        let previous = self
            .current
            .as_deref()
            .and_then(|current| ids.iter().position(|id| *id == current))
            .filter(|i| *i > 0)
            .map(|i| ids[i - 1].to_string());
        if let Some(id) = previous {
            self.current = Some(id);
        }
        self.current_slide()
    }

    pub fn go_to(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(Self::not_found(id));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Rebuilds `layout` from the slide's snapshot and makes it current.
    pub fn load_into(&mut self, id: &str, layout: &mut LayoutState) -> Result<(), StoreError> {
        let slide = self.get(id).ok_or_else(|| Self::not_found(id))?;
        let columns = parse_snapshot(&slide.layout_snapshot)?;
        layout
            .rehydrate(&columns)
            .map_err(|e| StoreError::InvalidSnapshot(e.to_string()))?;
        info!(slide = %id, "slide loaded");
        self.current = Some(id.to_string());
        Ok(())
    }
}
