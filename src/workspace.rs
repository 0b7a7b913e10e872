use crate::canvas::CanvasState;
use crate::categories::CategoryStore;
use crate::layout::LayoutState;
use crate::slides::SlideDeck;
use crate::storage::{
    Storage, StorageResult, CANVAS_KEY, CATEGORIES_KEY, LAYOUT_KEY, NOTES_KEY, SLIDES_KEY,
};
use tracing::{info, warn};

/// Everything a user edits: the column tree plus the stores hanging off it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub layout: LayoutState,
    pub categories: CategoryStore,
    pub canvas: CanvasState,
    pub slides: SlideDeck,
    /// Free-form scratch pad. Not part of exports or projects.
    pub notes: String,
}

impl Workspace {
    /// Reads every store from `storage`. A store that was never written gets
    /// its default; the layout falls back to the demo when `demo_on_first_run`.
    pub fn load(storage: &Storage, demo_on_first_run: bool) -> StorageResult<Self> {
        let layout = match storage.load::<LayoutState>(LAYOUT_KEY)? {
            Some(layout) => layout,
            None if demo_on_first_run => {
                info!("no stored layout, starting with the demo");
                LayoutState::demo()
            }
            None => LayoutState::default(),
        };
        let categories = storage.load(CATEGORIES_KEY)?.unwrap_or_default();
        let canvas: CanvasState = storage.load(CANVAS_KEY)?.unwrap_or_default();
        let slides = storage.load(SLIDES_KEY)?.unwrap_or_default();
        let notes = storage.load(NOTES_KEY)?.unwrap_or_default();

        let mut workspace = Self {
            layout,
            categories,
            canvas,
            slides,
            notes,
        };
        let pruned = workspace.prune_connectors();
        if pruned > 0 {
            warn!(pruned, "dropped connectors pointing at missing columns");
        }
        Ok(workspace)
    }

    /// Drops connectors whose columns no longer exist.
    pub fn prune_connectors(&mut self) -> usize {
        let ids: Vec<&str> = self.layout.columns.iter().map(|c| c.id.as_str()).collect();
        self.canvas.prune(&ids)
    }

    pub fn persist(&self, storage: &Storage) -> StorageResult<()> {
        storage.save(LAYOUT_KEY, &self.layout)?;
        storage.save(CATEGORIES_KEY, &self.categories)?;
        storage.save(CANVAS_KEY, &self.canvas)?;
        storage.save(SLIDES_KEY, &self.slides)?;
        if self.notes.is_empty() {
            storage.remove(NOTES_KEY)?;
        } else {
            storage.save(NOTES_KEY, &self.notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_run_uses_demo_only_when_asked() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let demo = Workspace::load(&storage, true).unwrap();
        assert_eq!(demo.layout.columns.len(), 2);
        let empty = Workspace::load(&storage, false).unwrap();
        assert!(empty.layout.columns.is_empty());
        assert_eq!(empty.categories, CategoryStore::default());
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let mut workspace = Workspace::load(&storage, true).unwrap();
        workspace.canvas.toggle_mode();
        workspace.categories.reset();
        workspace.persist(&storage).unwrap();

        let reloaded = Workspace::load(&storage, false).unwrap();
        assert_eq!(reloaded.layout.columns, workspace.layout.columns);
        assert!(reloaded.canvas.enabled);
    }

    #[test]
    fn test_notes_are_stored_separately() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let mut workspace = Workspace::load(&storage, false).unwrap();
        assert!(workspace.notes.is_empty());

        workspace.notes = "ask about the Q3 numbers".to_string();
        workspace.persist(&storage).unwrap();
        assert!(storage.contains(NOTES_KEY));
        assert_eq!(Workspace::load(&storage, false).unwrap().notes, "ask about the Q3 numbers");

        workspace.notes.clear();
        workspace.persist(&storage).unwrap();
        assert!(!storage.contains(NOTES_KEY));
    }
}
