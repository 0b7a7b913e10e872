use crate::model::TextAlign;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: char = '…';

/// Cuts `text` to at most `max_width` terminal cells, ending in an ellipsis
/// when anything was dropped.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Pads with spaces up to `width` cells.
pub fn pad(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Pads to `width` cells with the text placed left, centered or right.
pub fn align(text: &str, width: usize, align: TextAlign) -> String {
    let text = truncate(text, width);
    let free = width.saturating_sub(text.width());
    let left = match align {
        TextAlign::Left => 0,
        TextAlign::Center => free / 2,
        TextAlign::Right => free,
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(free - left))
}
