//! Separator line and selection indicator
//!
//! The separator runs under the strip from the inset to the width minus the
//! inset. The indicator sits on it, bottom-aligned, at the synchronizer's
//! leading offset measured from the separator's leading edge.

use ratatui::prelude::*;
use ratatui::widgets::Widget;
use tabpager_core::Theme;

use crate::controller::StripLayout;
use crate::renderer::cells;

const SEPARATOR_SYMBOL: &str = "─";
const INDICATOR_SYMBOL: &str = "━";

/// Separator and indicator widget over a layout snapshot.
pub struct Indicator<'a> {
    layout: &'a StripLayout<'a>,
    theme: &'a Theme,
}

impl<'a> Indicator<'a> {
    pub fn new(layout: &'a StripLayout<'a>, theme: &'a Theme) -> Self {
        Indicator { layout, theme }
    }
}

impl Widget for Indicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || !self.layout.visible {
            return;
        }
        let inset = cells(self.layout.inset).min(area.width);
        let separator_end = area.width.saturating_sub(inset);
        let separator_style = self.theme.separator_style();
        for y in area.top()..area.bottom() {
            for x in inset..separator_end {
                if let Some(cell) = buf.cell_mut((area.x + x, y)) {
                    cell.set_symbol(SEPARATOR_SYMBOL).set_style(separator_style);
                }
            }
        }

        // the indicator has no upper clamp, so it may run past the separator
        let geometry = self.layout.indicator;
        let start = (self.layout.inset + geometry.leading).round().max(0.0);
        let end = (self.layout.inset + geometry.leading + geometry.width).round();
        let rows = cells(self.layout.indicator_height).min(area.height);
        let indicator_style = self.theme.indicator_style();
        for y in (area.bottom() - rows)..area.bottom() {
            let mut x = start;
            while x < end && x < area.width as f64 {
                if let Some(cell) = buf.cell_mut((area.x + x as u16, y)) {
                    cell.set_symbol(INDICATOR_SYMBOL).set_style(indicator_style);
                }
                x += 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::IndicatorGeometry;

    fn layout(leading: f64, width: f64, indicator_height: f64) -> StripLayout<'static> {
        StripLayout {
            visible: true,
            cells: Vec::new(),
            strip_offset: 0.0,
            indicator: IndicatorGeometry { leading, width },
            inset: 2.0,
            indicator_height,
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_separator_spans_between_insets() {
        let layout = layout(0.0, 0.0, 1.0);
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        Indicator::new(&layout, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  ──────  ");
    }

    #[test]
    fn test_indicator_at_leading_offset() {
        let layout = layout(3.0, 2.0, 1.0);
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        Indicator::new(&layout, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  ───━━───  ");
        assert_eq!(buf[(5, 0)].fg, theme.colors.indicator);
    }

    #[test]
    fn test_indicator_bottom_aligned() {
        let layout = layout(0.0, 3.0, 1.0);
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        Indicator::new(&layout, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  ────  ");
        assert_eq!(row(&buf, 1), "  ━━━─  ");
    }

    #[test]
    fn test_indicator_past_separator_is_clipped_to_area() {
        let layout = layout(5.0, 10.0, 1.0);
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        Indicator::new(&layout, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  ─────━━━");
    }
}
