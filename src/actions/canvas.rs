use crate::app::AppState;
use crate::canvas::PRESETS;

pub fn toggle_canvas(app: &mut AppState) {
    let on = app.workspace.canvas.toggle_mode();
    let canvas = &app.workspace.canvas;
    let msg = if on {
        format!("Canvas mode on ({}x{})", canvas.width, canvas.height)
    } else {
        "Canvas mode off".to_string()
    };
    app.set_message(msg);
    app.commit();
}

pub fn toggle_grid(app: &mut AppState) {
    app.workspace.canvas.toggle_grid();
    let state = if app.workspace.canvas.show_grid { "shown" } else { "hidden" };
    app.set_message(format!("Grid {}", state));
    app.commit();
}

/// Steps through the size presets in order.
pub fn cycle_preset(app: &mut AppState) {
    let canvas = &app.workspace.canvas;
    let next = PRESETS
        .iter()
        .position(|p| p.width == canvas.width && p.height == canvas.height)
        .map_or(0, |i| (i + 1) % PRESETS.len());
    let preset = &PRESETS[next];
    match app.workspace.canvas.set_preset(preset.key) {
        Ok(()) => {
            app.set_message(format!(
                "Canvas {} ({}x{})",
                preset.name, preset.width, preset.height
            ));
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn toggle_connector_mode(app: &mut AppState) {
    let on = app.workspace.canvas.toggle_connector_mode();
    app.set_message(if on {
        "Connector mode: press Enter on two columns to link them"
    } else {
        "Connector mode off"
    });
    app.commit();
}

pub fn link_column(app: &mut AppState) {
    let Some(column) = app.current_column_id() else {
        return;
    };
    if !app.workspace.canvas.connector_mode {
        return;
    }
    match app.workspace.canvas.connect_pending(&column) {
        Some(_) => {
            app.set_message(format!(
                "Connected ({} connectors)",
                app.workspace.canvas.connectors.len()
            ));
            app.commit();
        }
        None => app.set_message("Now pick the column to connect to"),
    }
}
