//! Box formatting, divider and image boxes, column header colors and the
//! category palette.

use crate::app::{AppState, EditTarget};
use crate::categories::{check_color, describe_category, parse_category};
use crate::model::{
    BoxContent, BoxPatch, ColumnPatch, LayoutBox, TextAlign, DEFAULT_LINE_STYLE, LINE_STYLES,
};
use anyhow::{bail, Result};
use tracing::info;

use super::editing::start_editing;

const DIVIDER_CATEGORY: &str = "gray";
const IMAGE_CATEGORY: &str = "blue";
const IMAGE_TEXT: &str = "Image";
const NEW_CATEGORY_PROMPT: &str = "New category #8B4513 #A0522D #ffffff";

fn focused_item(app: &AppState) -> Option<LayoutBox> {
    let (_, section, box_id) = app.focused_box()?;
    app.current_column()?
        .sections
        .iter()
        .find(|s| s.id == section)?
        .boxes
        .iter()
        .find(|b| b.id == box_id)
        .cloned()
}

fn next_line_style(style: &str) -> &'static str {
    LINE_STYLES
        .iter()
        .position(|s| *s == style)
        .map_or(DEFAULT_LINE_STYLE, |i| LINE_STYLES[(i + 1) % LINE_STYLES.len()])
}

/// On a divider, switches to the next line style. Anywhere else, inserts a
/// divider below the cursor.
pub fn insert_divider(app: &mut AppState) {
    if let (Some((column, section, box_id)), Some(item)) = (app.focused_box(), focused_item(app)) {
        if let BoxContent::Line { style } = &item.content {
            let style = next_line_style(style);
            let patch = BoxPatch {
                content: Some(BoxContent::Line {
                    style: style.to_string(),
                }),
                ..BoxPatch::default()
            };
            match app.workspace.layout.update_box(&column, &section, &box_id, patch) {
                Ok(()) => {
                    app.set_message(format!("Divider: {}", style));
                    app.commit();
                }
                Err(e) => app.report(e),
            }
            return;
        }
    }

    let patch = BoxPatch {
        text: Some(String::new()),
        content: Some(BoxContent::Line {
            style: DEFAULT_LINE_STYLE.to_string(),
        }),
        ..BoxPatch::default()
    }
    .with_category(DIVIDER_CATEGORY);
    insert_below_cursor(app, patch);
}

/// Adds a box right after the focused box, or at the end of the focused section.
fn insert_below_cursor(app: &mut AppState, patch: BoxPatch) {
    let Some((column, section)) = app.focused_section() else {
        app.set_message("Add a section first");
        return;
    };
    let after = app.focused_box().and_then(|(_, _, id)| {
        app.current_column()?
            .sections
            .iter()
            .find(|s| s.id == section)?
            .position_of(&id)
    });
    let layout = &mut app.workspace.layout;
    let result = layout.add_box(&column, &section, patch).and_then(|id| {
        if let Some(index) = after {
            layout.move_box(&column, &section, &column, &section, &id, Some(index + 1))?;
        }
        Ok(id)
    });
    match result {
        Ok(id) => {
            app.focus_box(&id);
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn start_add_image(app: &mut AppState) {
    let Some((column, section)) = app.focused_section() else {
        app.set_message("Add a section first");
        return;
    };
    start_editing(app, EditTarget::ImageSource { column, section }, "");
}

/// `src` is a file path, URL or data URL; it is stored as given.
pub fn add_image(app: &mut AppState, src: &str) -> Result<()> {
    if src.is_empty() {
        bail!("No image given");
    }
    let patch = BoxPatch {
        content: Some(BoxContent::Image {
            src: src.to_string(),
        }),
        ..BoxPatch::text(IMAGE_TEXT)
    }
    .with_category(IMAGE_CATEGORY);
    insert_below_cursor(app, patch);
    Ok(())
}

pub fn cycle_alignment(app: &mut AppState) {
    let (Some((column, section, box_id)), Some(item)) = (app.focused_box(), focused_item(app))
    else {
        return;
    };
    let align = match item.text_align {
        None | Some(TextAlign::Right) => TextAlign::Left,
        Some(TextAlign::Left) => TextAlign::Center,
        Some(TextAlign::Center) => TextAlign::Right,
    };
    let patch = BoxPatch {
        text_align: Some(align),
        ..BoxPatch::default()
    };
    match app.workspace.layout.update_box(&column, &section, &box_id, patch) {
        Ok(()) => {
            app.set_message(format!("Align {:?}", align).to_lowercase());
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

pub fn start_text_color(app: &mut AppState) {
    let (Some((column, section, box_id)), Some(item)) = (app.focused_box(), focused_item(app))
    else {
        return;
    };
    let current = item
        .text_color
        .unwrap_or_else(|| app.workspace.categories.text_color(&item.category).to_string());
    let target = EditTarget::TextColor {
        column,
        section,
        box_id,
    };
    start_editing(app, target, current);
}

pub fn set_text_color(app: &mut AppState, column: &str, section: &str, box_id: &str, color: &str) -> Result<()> {
    let patch = BoxPatch {
        text_color: Some(check_color(color)?),
        ..BoxPatch::default()
    };
    app.workspace.layout.update_box(column, section, box_id, patch)?;
    app.commit();
    Ok(())
}

pub fn start_header_color(app: &mut AppState) {
    let Some(column) = app.current_column() else {
        return;
    };
    let current = column.header_color.clone().unwrap_or_default();
    let target = EditTarget::HeaderColor {
        column: column.id.clone(),
    };
    start_editing(app, target, current);
}

pub fn set_header_color(app: &mut AppState, column: &str, color: &str) -> Result<()> {
    let patch = ColumnPatch {
        header_color: Some(check_color(color)?),
        ..ColumnPatch::default()
    };
    app.workspace.layout.update_column(column, patch)?;
    app.commit();
    Ok(())
}

// Categories

pub fn start_add_category(app: &mut AppState) {
    start_editing(app, EditTarget::NewCategory, NEW_CATEGORY_PROMPT);
}

/// Adds a category from `name #color1 #color2 [#text]` and gives it to the focused box.
pub fn add_category(app: &mut AppState, spec: &str) -> Result<()> {
    let category = parse_category(spec)?;
    let key = app.workspace.categories.key_for(&category.name);
    app.workspace.categories.add(&key, category)?;
    info!(key = %key, "category added");
    if let Some((column, section, box_id)) = app.focused_box() {
        let patch = BoxPatch::default().with_category(key.clone());
        if let Err(e) = app.workspace.layout.update_box(&column, &section, &box_id, patch) {
            app.report(e);
        }
    }
    app.commit();
    app.set_message(format!("Added category {}", key));
    Ok(())
}

/// Edits the category of the focused box.
pub fn start_edit_category(app: &mut AppState) {
    let Some(item) = focused_item(app) else {
        app.set_message("Put the cursor on a box to edit its category");
        return;
    };
    let current = app
        .workspace
        .categories
        .get(&item.category)
        .map(describe_category)
        .unwrap_or_else(|| format!("{} #95a5a6 #7f8c8d #ffffff", item.category));
    start_editing(app, EditTarget::EditCategory { key: item.category }, current);
}

pub fn edit_category(app: &mut AppState, key: &str, spec: &str) -> Result<()> {
    let category = parse_category(spec)?;
    let patch = crate::categories::CategoryPatch {
        name: Some(category.name),
        color1: Some(category.color1),
        color2: Some(category.color2),
        text_color: Some(category.text_color),
    };
    app.workspace.categories.update(key, patch);
    app.commit();
    app.set_message(format!("Updated category {}", key));
    Ok(())
}

/// Deletes the category of the focused box. The configured default category stays.
pub fn delete_category(app: &mut AppState) {
    let Some(item) = focused_item(app) else {
        app.set_message("Put the cursor on a box to delete its category");
        return;
    };
    if item.category == app.config.default_category {
        app.set_message(format!("{} is the default category", item.category));
        return;
    }
    match app.workspace.categories.delete(&item.category) {
        Ok(removed) => {
            app.set_message(format!("Deleted category {}", removed.name));
            app.commit();
        }
        Err(e) => app.report(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_styles_cycle() {
        assert_eq!(next_line_style("line-thin"), "line-medium");
        assert_eq!(next_line_style("line-dotted"), "line-thin");
        assert_eq!(next_line_style("solid"), DEFAULT_LINE_STYLE);
    }
}
