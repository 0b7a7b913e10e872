use crate::app::{AppMode, AppState, EditTarget};
use crate::model::{BoxPatch, ColumnPatch, SectionPatch};
use anyhow::{Context, Result};

/// `cursor_pos` counts characters; this turns it into a byte offset.
fn byte_offset(buffer: &str, cursor_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(cursor_pos)
        .map_or(buffer.len(), |(i, _)| i)
}

pub fn start_editing(app: &mut AppState, target: EditTarget, initial: impl Into<String>) {
    let buffer = initial.into();
    let cursor_pos = buffer.chars().count();
    app.mode = AppMode::Editing {
        target,
        buffer,
        cursor_pos,
    };
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        buffer.insert(byte_offset(buffer, *cursor_pos), c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            buffer.remove(byte_offset(buffer, *cursor_pos));
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            buffer.remove(byte_offset(buffer, *cursor_pos));
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = buffer.chars().count();
    }
}

pub fn delete_to_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        buffer.truncate(byte_offset(buffer, *cursor_pos));
    }
}

pub fn delete_to_start(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        buffer.replace_range(..byte_offset(buffer, *cursor_pos), "");
        *cursor_pos = 0;
    }
}

pub fn cancel_edit(app: &mut AppState) {
    app.mode = AppMode::Normal;
    app.clear_message();
}

pub fn confirm_edit(app: &mut AppState) {
    let AppMode::Editing { target, buffer, .. } =
        std::mem::replace(&mut app.mode, AppMode::Normal)
    else {
        return;
    };
    app.clear_message();
    if let Err(e) = apply_edit(app, target, buffer.trim()) {
        app.report(format!("{:#}", e));
    }
}

fn apply_edit(app: &mut AppState, target: EditTarget, text: &str) -> Result<()> {
    match target {
        EditTarget::ColumnTitle { column } => {
            app.workspace
                .layout
                .update_column(&column, ColumnPatch::title(text))?;
            app.commit();
        }
        EditTarget::SectionTitle { column, section } => {
            let patch = SectionPatch {
                title: Some(text.to_string()),
                ..SectionPatch::default()
            };
            app.workspace.layout.update_section(&column, &section, patch)?;
            app.commit();
        }
        EditTarget::NewSectionInPart { column, part } => {
            super::content::create_section_in_part(app, &column, part, text)?
        }
        EditTarget::BoxText {
            column,
            section,
            box_id,
        } => {
            app.workspace
                .layout
                .update_box(&column, &section, &box_id, BoxPatch::text(text))?;
            app.commit();
        }
        EditTarget::SplitParts { column } => {
            let parts: usize = text
                .parse()
                .with_context(|| format!("Not a number: {}", text))?;
            super::column::split_into(app, &column, parts)?;
        }
        EditTarget::NewSlide => super::slides::capture_slide(app, text)?,
        EditTarget::SaveProject => super::file::save_project(app, text)?,
        EditTarget::LoadProject => super::file::load_project(app, text)?,
        EditTarget::ExportFile(format) => super::file::export_to(app, format, text)?,
        EditTarget::ImportFile => super::file::import_from(app, text)?,
        EditTarget::BatchImport { column, section } => {
            super::file::batch_import_from(app, &column, &section, text)?
        }
        EditTarget::ImageSource { .. } => super::style::add_image(app, text)?,
        EditTarget::TextColor {
            column,
            section,
            box_id,
        } => super::style::set_text_color(app, &column, &section, &box_id, text)?,
        EditTarget::HeaderColor { column } => super::style::set_header_color(app, &column, text)?,
        EditTarget::NewCategory => super::style::add_category(app, text)?,
        EditTarget::EditCategory { key } => super::style::edit_category(app, &key, text)?,
        EditTarget::Notes => super::file::save_notes(app, text),
    }
    Ok(())
}
