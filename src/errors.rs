use thiserror::Error;

// Bring in specific errors from the modules we want to wrap
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::layout::LayoutError;
use crate::storage::StorageError;

/// Failures of the category, canvas, slide and project stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Name must not be blank")]
    BlankName,

    #[error("Category {0} not found")]
    CategoryNotFound(String),

    #[error("Not a #rrggbb color: {0}")]
    InvalidColor(String),

    #[error("Connector {0} not found")]
    ConnectorNotFound(String),

    #[error("Unknown canvas preset: {0}")]
    UnknownPreset(String),

    #[error("Slide {0} not found")]
    SlideNotFound(String),

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error("Invalid project file: {0}")]
    InvalidProject(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Import/Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Serialization/Deserialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
