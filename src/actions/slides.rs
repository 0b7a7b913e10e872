use crate::app::{AppMode, AppState, EditTarget};
use crate::slides;
use anyhow::Result;

use super::editing::start_editing;

pub fn start_capture(app: &mut AppState) {
    let name = format!("Slide {}", app.workspace.slides.slides.len() + 1);
    start_editing(app, EditTarget::NewSlide, name);
}

pub fn capture_slide(app: &mut AppState, name: &str) -> Result<()> {
    let snapshot = slides::capture(&app.workspace.layout)?;
    let id = app.workspace.slides.add(name, snapshot)?;
    app.workspace.slides.set_current(Some(id));
    app.commit();
    app.set_message(format!("Captured slide \"{}\"", name));
    Ok(())
}

/// Loads the deck's current slide into the layout without persisting it.
fn show_current(app: &mut AppState) {
    let Some(id) = app.workspace.slides.current.clone() else {
        return;
    };
    let deck = &mut app.workspace.slides;
    match deck.load_into(&id, &mut app.workspace.layout) {
        Ok(()) => {
            let total = deck.slides.len();
            let (name, order) = deck
                .current_slide()
                .map(|s| (s.name.clone(), s.order))
                .unwrap_or_default();
            app.cursor = Default::default();
            app.clamp_cursor();
            app.set_message(format!("{} ({}/{})", name, order + 1, total));
        }
        Err(e) => app.report(e),
    }
}

pub fn start_presentation(app: &mut AppState) {
    if app.workspace.slides.slides.is_empty() {
        app.set_message("No slides yet, press n to capture one");
        return;
    }
    let working = app.workspace.layout.columns.clone();
    app.workspace.slides.presentation = true;
    app.workspace.slides.set_current(None);
    app.workspace.slides.next();
    app.mode = AppMode::Presentation { working };
    show_current(app);
}

pub fn next_slide(app: &mut AppState) {
    let before = app.workspace.slides.current.clone();
    app.workspace.slides.next();
    if app.workspace.slides.current != before {
        show_current(app);
    }
}

pub fn previous_slide(app: &mut AppState) {
    let before = app.workspace.slides.current.clone();
    app.workspace.slides.previous();
    if app.workspace.slides.current != before {
        show_current(app);
    }
}

pub fn stop_presentation(app: &mut AppState) {
    let AppMode::Presentation { working } = std::mem::replace(&mut app.mode, AppMode::Normal)
    else {
        return;
    };
    app.workspace.layout.load_layout(working);
    app.workspace.slides.presentation = false;
    app.clear_message();
    app.commit();
}
