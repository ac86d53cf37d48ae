//! Tab strip widget
//!
//! The [`TabStrip`] widget draws the tab titles of a [`StripLayout`], each
//! centered in its cell, scrolled by the strip's auto-scroll offset.
//!
//! ## Features
//!
//! - Fill mode and natural mode come straight from the layout widths
//! - The highlighted tab uses the theme's selected title style
//! - Cells scrolled partly out of view are clipped per character
//!
//! ## Example
//!
//! ```ignore
//! use tabpager_ui::widgets::TabStrip;
//!
//! let layout = controller.strip_layout();
//! TabStrip::new(&layout, controller.theme()).render(strip_area, buf);
//! ```

use ratatui::prelude::*;
use ratatui::widgets::Widget;
use tabpager_core::Theme;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::controller::{StripLayout, TabCell};

/// Writes `text` starting at column `x` of `area`, dropping characters that
/// fall outside `[min_x, max_x)`.
fn put_clipped(
    buf: &mut Buffer,
    area: Rect,
    (x, y): (i32, u16),
    (min_x, max_x): (i32, i32),
    text: &str,
    style: Style,
) {
    let mut column = x;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0) as i32;
        if width == 0 {
            continue;
        }
        if column >= min_x && column + width <= max_x {
            let mut utf8 = [0u8; 4];
            buf.set_string(area.x + column as u16, y, ch.encode_utf8(&mut utf8), style);
        }
        column += width;
    }
}

/// Tab strip widget over a layout snapshot.
pub struct TabStrip<'a> {
    layout: &'a StripLayout<'a>,
    theme: &'a Theme,
}

impl<'a> TabStrip<'a> {
    /// Creates a new tab strip
    ///
    /// # Arguments
    ///
    /// * `layout` - Cell geometry from the controller
    /// * `theme` - Theme for title colours
    pub fn new(layout: &'a StripLayout<'a>, theme: &'a Theme) -> Self {
        TabStrip { layout, theme }
    }

    fn render_cell(&self, cell: &TabCell<'_>, area: Rect, buf: &mut Buffer) {
        let left = (cell.leading - self.layout.strip_offset).round() as i32;
        let right = (cell.trailing() - self.layout.strip_offset).round() as i32;
        let min_x = left.max(0);
        let max_x = right.min(area.width as i32);
        if max_x <= min_x {
            return;
        }

        let style = self.theme.title_style(cell.selected);
        let y = area.y + area.height / 2;
        let title_width = cell.title.width() as i32;
        let start = left + ((right - left - title_width) / 2).max(0);
        put_clipped(buf, area, (start, y), (min_x, max_x), cell.title, style);
    }
}

impl Widget for TabStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.theme.background_style());
        if !self.layout.visible {
            return;
        }
        for cell in &self.layout.cells {
            self.render_cell(cell, area, buf);
        }
    }
}
