//! Rendering and layout utilities
//!
//! This module lays out the container's vertical bands and renders views
//! that are only partly on screen.
//!
//! # Overview
//!
//! The renderer module handles two main concerns:
//!
//! 1. **Page Layout**: Stacking the header, tab strip, separator and pager
//!    and shifting the stack up as the header collapses, via [`PageLayout`].
//!
//! 2. **Clipped Rendering**: Drawing a view at its full size and keeping only
//!    the part inside a clip rectangle, via [`render_clipped`]. Pages sliding
//!    in from the side and a half-collapsed header both go through it.

use ratatui::prelude::*;
use tabpager_core::StripConfig;

/// One vertical band of the container.
///
/// `top` is relative to the container's top edge and may be negative once
/// the header has scrolled the band partly out of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Band {
    pub top: i32,
    pub height: u16,
}

impl Band {
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }
}

/// Container layout areas
///
/// Bands are stacked top to bottom and shifted up by the header offset.
///
/// # Layout Structure
///
/// ```text
/// +---------------------------------+
/// | Header (collapses upwards)      |
/// +---------------------------------+
/// | Tab strip                       |
/// |   strip bottom offset           |
/// | Separator + indicator           |
/// |   separator bottom offset       |
/// +---------------------------------+
/// |                                 |
/// | Pager (container height minus   |
/// | strip chrome)                   |
/// |                                 |
/// +---------------------------------+
/// ```
///
/// # Example
///
/// ```
/// use tabpager_core::StripConfig;
/// use tabpager_ui::renderer::PageLayout;
/// use ratatui::prelude::Rect;
///
/// let area = Rect::new(0, 0, 80, 24);
/// let layout = PageLayout::new(area, &StripConfig::terminal(), 3, 0.0, true);
///
/// assert_eq!(layout.strip.top, 3);
/// assert_eq!(layout.separator.top, 4);
/// assert_eq!(layout.pager.top, 5);
/// assert_eq!(layout.pager.height, 22);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageLayout {
    /// The whole container
    pub area: Rect,
    pub header: Band,
    /// Empty when the strip is hidden
    pub strip: Band,
    /// Empty when the strip is hidden
    pub separator: Band,
    pub pager: Band,
}

/// Rounds a layout length to whole cells.
pub fn cells(length: f64) -> u16 {
    if length.is_finite() {
        length.round().clamp(0.0, u16::MAX as f64) as u16
    } else {
        0
    }
}

impl PageLayout {
    /// Calculate layout bands for `area`
    ///
    /// # Arguments
    ///
    /// * `area` - The container's area
    /// * `strip` - Strip knobs; gaps count towards the chrome
    /// * `header_height` - Full header height in rows
    /// * `header_offset` - How far the header has collapsed; negative
    ///   values pull everything down
    /// * `strip_visible` - False hides the strip and separator entirely
    #[must_use]
    pub fn new(
        area: Rect,
        strip: &StripConfig,
        header_height: u16,
        header_offset: f64,
        strip_visible: bool,
    ) -> Self {
        let shift = if header_offset.is_finite() {
            (header_offset.round() as i32).clamp(-(area.height as i32), header_height as i32)
        } else {
            0
        };

        let mut cursor = -shift;
        let mut take = |height: u16| {
            let band = Band {
                top: cursor,
                height,
            };
            cursor += height as i32;
            band
        };

        let header = take(header_height);
        let (strip_band, separator, chrome) = if strip_visible {
            let strip_band = take(cells(strip.tab_strip_height));
            take(cells(strip.tab_strip_bottom_offset));
            let separator = take(cells(strip.separator_height));
            take(cells(strip.separator_bottom_offset));
            (strip_band, separator, cells(strip.chrome_height()))
        } else {
            (
                Band {
                    top: header.bottom(),
                    height: 0,
                },
                Band {
                    top: header.bottom(),
                    height: 0,
                },
                0,
            )
        };
        let pager = take(area.height.saturating_sub(chrome));

        PageLayout {
            area,
            header,
            strip: strip_band,
            separator,
            pager,
        }
    }

    /// On-screen part of `band`, if any.
    pub fn visible(&self, band: Band) -> Option<Rect> {
        let top = band.top.max(0);
        let bottom = band.bottom().min(self.area.height as i32);
        if bottom <= top || self.area.width == 0 {
            return None;
        }
        Some(Rect::new(
            self.area.x,
            self.area.y + top as u16,
            self.area.width,
            (bottom - top) as u16,
        ))
    }
}

/// Renders `draw` at full `size` with its origin at `origin` relative to
/// `clip`, keeping only the cells inside `clip`.
///
/// Views that fit entirely inside the clip are drawn in place; anything
/// else is drawn into a scratch buffer and copied.
pub fn render_clipped(
    buf: &mut Buffer,
    clip: Rect,
    origin: (i32, i32),
    size: (u16, u16),
    draw: impl FnOnce(Rect, &mut Buffer),
) {
    let (width, height) = size;
    if width == 0 || height == 0 || clip.is_empty() {
        return;
    }
    let left = clip.x as i32 + origin.0;
    let top = clip.y as i32 + origin.1;
    let fits = origin.0 >= 0
        && origin.1 >= 0
        && origin.0 + width as i32 <= clip.width as i32
        && origin.1 + height as i32 <= clip.height as i32;
    if fits {
        draw(Rect::new(left as u16, top as u16, width, height), buf);
        return;
    }

    let mut scratch = Buffer::empty(Rect::new(0, 0, width, height));
    draw(scratch.area, &mut scratch);

    let clip_right = clip.x as i32 + clip.width as i32;
    let clip_bottom = clip.y as i32 + clip.height as i32;
    for sy in 0..height {
        let y = top + sy as i32;
        if y < clip.y as i32 || y >= clip_bottom {
            continue;
        }
        for sx in 0..width {
            let x = left + sx as i32;
            if x < clip.x as i32 || x >= clip_right {
                continue;
            }
            if let (Some(src), Some(dst)) = (scratch.cell((sx, sy)), buf.cell_mut((x as u16, y as u16))) {
                *dst = src.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, y)].symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn test_layout_without_header() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = PageLayout::new(area, &StripConfig::terminal(), 0, 0.0, true);

        assert_eq!(layout.header.height, 0);
        assert_eq!(layout.strip, Band { top: 0, height: 1 });
        assert_eq!(layout.separator, Band { top: 1, height: 1 });
        assert_eq!(layout.pager, Band { top: 2, height: 22 });
        assert_eq!(layout.visible(layout.pager), Some(Rect::new(0, 2, 80, 22)));
    }

    #[test]
    fn test_layout_with_gaps() {
        let strip = StripConfig {
            tab_strip_bottom_offset: 1.0,
            separator_bottom_offset: 2.0,
            ..StripConfig::terminal()
        };
        let layout = PageLayout::new(Rect::new(0, 0, 40, 20), &strip, 0, 0.0, true);
        assert_eq!(layout.separator.top, 2);
        assert_eq!(layout.pager.top, 5);
        assert_eq!(layout.pager.height, 15);
    }

    #[test]
    fn test_hidden_strip_gives_pager_everything() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = PageLayout::new(area, &StripConfig::terminal(), 0, 0.0, false);
        assert_eq!(layout.strip.height, 0);
        assert_eq!(layout.visible(layout.strip), None);
        assert_eq!(layout.pager, Band { top: 0, height: 24 });
    }

    #[test]
    fn test_header_collapse_shifts_bands() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = PageLayout::new(area, &StripConfig::terminal(), 4, 3.0, true);
        assert_eq!(layout.header, Band { top: -3, height: 4 });
        assert_eq!(layout.visible(layout.header), Some(Rect::new(0, 0, 80, 1)));
        assert_eq!(layout.strip.top, 1);

        // fully collapsed: pager bottom reaches the container bottom
        let collapsed = PageLayout::new(area, &StripConfig::terminal(), 4, 9.0, true);
        assert_eq!(collapsed.header.bottom(), 0);
        assert_eq!(collapsed.pager.bottom(), 24);
    }

    #[test]
    fn test_render_clipped_in_place() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        render_clipped(&mut buf, area, (2, 0), (3, 1), |rect, buf| {
            "abc".render(rect, buf);
        });
        assert_eq!(row(&buf, 0), "  abc     ");
    }

    #[test]
    fn test_render_clipped_cuts_leading_columns() {
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        render_clipped(&mut buf, area, (-2, 0), (6, 1), |rect, buf| {
            "abcdef".render(rect, buf);
        });
        assert_eq!(row(&buf, 0), "cdef  ");
    }

    #[test]
    fn test_render_clipped_cuts_top_rows() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        render_clipped(&mut buf, area, (0, -1), (4, 2), |rect, buf| {
            Text::from(vec![Line::from("top"), Line::from("low")]).render(rect, buf);
        });
        assert_eq!(row(&buf, 0), "low ");
        assert_eq!(row(&buf, 1), "    ");
    }
}
