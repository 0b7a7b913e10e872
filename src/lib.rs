pub mod app;
pub mod canvas;
pub mod categories;
pub mod cli;
pub mod config;
pub mod dnd;
pub mod errors;
pub mod export;
pub mod layout;
pub mod logging;
pub mod model;
pub mod projects;
pub mod slides;
pub mod storage;
pub mod ui;
pub mod workspace;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use layout::{LayoutError, LayoutState};
pub use model::{Column, LayoutBox, Section};
pub use workspace::Workspace;
