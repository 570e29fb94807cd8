//! View rendering modules

mod single;
mod split;

pub use single::render_single;
pub use split::render_split;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Repeat `pattern` to exactly `width` columns
pub fn fill_pattern(pattern: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    if !pattern.is_empty() {
        'outer: loop {
            for ch in pattern.chars() {
                let w = ch.width().unwrap_or(0);
                if w == 0 {
                    continue;
                }
                if used + w > width {
                    break 'outer;
                }
                out.push(ch);
                used += w;
            }
            if pattern.width() == 0 {
                break;
            }
        }
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Expand tabs and pad with spaces to at least `width` columns
pub fn display_text(content: &str, width: usize) -> String {
    let mut text = content.replace('\t', "    ");
    let current = text.width();
    if current < width {
        text.push_str(&" ".repeat(width - current));
    }
    text
}
