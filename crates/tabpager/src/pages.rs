//! Demo content: scrollable text pages and a banner header.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tabpager_core::{Appearance, ContentUnit, HeaderView, InnerScroll};
use tracing::debug;

/// A page of numbered lines with its own vertical scroll.
pub struct TextPage {
    title: String,
    lines: Vec<String>,
    offset: f64,
    scroll_enabled: bool,
    visible: bool,
    appearances: usize,
}

impl TextPage {
    pub fn new(title: impl Into<String>, line_count: usize) -> Self {
        let title = title.into();
        let lines = (1..=line_count)
            .map(|n| format!("{} line {:>3}  {}", title, n, filler(n)))
            .collect();
        TextPage {
            title,
            lines,
            offset: 0.0,
            scroll_enabled: true,
            visible: false,
            appearances: 0,
        }
    }
}

fn filler(n: usize) -> &'static str {
    const WORDS: [&str; 5] = [
        "drag sideways to page",
        "drag up to collapse the header",
        "tap a title to jump",
        "tab and shift-tab cycle",
        "the indicator follows the pages",
    ];
    WORDS[n % WORDS.len()]
}

impl ContentUnit for TextPage {
    fn attached(&mut self) {
        debug!(page = %self.title, "page attached");
    }

    fn detached(&mut self) {
        debug!(page = %self.title, "page detached");
    }

    fn appearance(&mut self, phase: Appearance, animated: bool) {
        debug!(page = %self.title, ?phase, animated, "page appearance");
        self.visible = phase.is_appearing();
        if phase == Appearance::DidAppear {
            self.appearances += 1;
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let status = if self.visible { "selected" } else { "hidden" };
        let linked = if self.scroll_enabled { "" } else { ", follows header" };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_bottom(format!(" {}, shown {}x{} ", status, self.appearances, linked));
        let scroll = self.offset.max(0.0).round().min(u16::MAX as f64) as u16;
        Paragraph::new(self.lines.iter().map(|line| Line::from(line.as_str())).collect::<Vec<_>>())
            .block(block)
            .scroll((scroll, 0))
            .render(area, buf);
    }

    fn inner_scroll(&self) -> Option<&dyn InnerScroll> {
        Some(self)
    }

    fn inner_scroll_mut(&mut self) -> Option<&mut dyn InnerScroll> {
        Some(self)
    }
}

impl InnerScroll for TextPage {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn content_height(&self) -> f64 {
        // two border rows around the text
        self.lines.len() as f64 + 2.0
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }
}

/// Header shown above the tab strip.
pub struct Banner {
    lines: Vec<Line<'static>>,
}

impl Default for Banner {
    fn default() -> Self {
        Banner {
            lines: vec![
                Line::from("tabpager").bold(),
                Line::from("drag vertically to collapse this header"),
                Line::from("drag horizontally to page, click a title to select"),
                Line::from("tab / shift-tab / arrows switch tabs, q quits"),
            ],
        }
    }
}

impl HeaderView for Banner {
    fn height(&self) -> f64 {
        self.lines.len() as f64 + 2.0
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines.clone())
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }
}
