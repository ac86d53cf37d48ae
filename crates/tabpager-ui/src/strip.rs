//! Tab strip model
//!
//! Holds the display models shown in the strip and answers width queries.
//! Natural widths come from a pluggable width function and are cached per
//! item until the function is replaced.
//!
//! Two layout modes exist. When every title fits, the strip is in *fill*
//! mode and tabs share the available width evenly. Otherwise it is in
//! *natural* mode: each tab is as wide as its title plus internal spacing on
//! both sides, and the strip scrolls horizontally.

use std::cell::Cell;

use tabpager_core::TabModel;
use unicode_width::UnicodeWidthStr;

/// Measures the natural width of a display model.
pub type WidthFn<M> = Box<dyn Fn(&M) -> f64>;

/// Natural width assumed for an index past the last item.
pub const FALLBACK_TAB_WIDTH: f64 = 150.0;

/// Display width of a model's title in terminal cells.
pub fn title_width<M: TabModel>(model: &M) -> f64 {
    UnicodeWidthStr::width(model.title()) as f64
}

/// Boxed [`title_width`], the usual width function for terminal hosts.
pub fn title_width_fn<M: TabModel + 'static>() -> WidthFn<M> {
    Box::new(title_width::<M>)
}

struct StripEntry<M> {
    model: M,
    cached_width: Cell<Option<f64>>,
}

/// Ordered display models with cached natural widths.
pub struct TabStripModel<M> {
    entries: Vec<StripEntry<M>>,
    width_fn: WidthFn<M>,
    fallback_width: f64,
}

impl<M> TabStripModel<M> {
    pub fn new(width_fn: WidthFn<M>) -> Self {
        TabStripModel {
            entries: Vec::new(),
            width_fn,
            fallback_width: FALLBACK_TAB_WIDTH,
        }
    }

    /// Overrides the natural width used past the last item.
    pub fn with_fallback_width(mut self, width: f64) -> Self {
        self.fallback_width = width;
        self
    }

    pub fn set_fallback_width(&mut self, width: f64) {
        self.fallback_width = width;
    }

    /// Replaces every model. Widths are measured lazily.
    pub fn set_models(&mut self, models: Vec<M>) {
        self.entries = models
            .into_iter()
            .map(|model| StripEntry {
                model,
                cached_width: Cell::new(None),
            })
            .collect();
    }

    /// Removes and returns every model.
    pub fn take_models(&mut self) -> Vec<M> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|entry| entry.model)
            .collect()
    }

    /// Replaces the width function and forgets all cached widths.
    pub fn set_width_fn(&mut self, width_fn: WidthFn<M>) {
        self.width_fn = width_fn;
        for entry in &self.entries {
            entry.cached_width.set(None);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model(&self, index: usize) -> Option<&M> {
        self.entries.get(index).map(|entry| &entry.model)
    }

    pub fn models(&self) -> impl Iterator<Item = &M> {
        self.entries.iter().map(|entry| &entry.model)
    }

    /// Cached natural width of `index`, measuring it on first use.
    ///
    /// Returns `None` for an index past the last item.
    pub fn width_of(&self, index: usize) -> Option<f64> {
        let entry = self.entries.get(index)?;
        if let Some(width) = entry.cached_width.get() {
            return Some(width);
        }
        let width = (self.width_fn)(&entry.model).max(0.0);
        entry.cached_width.set(Some(width));
        Some(width)
    }

    /// Natural width of `index`, or the fallback width past the last item.
    pub fn natural_width(&self, index: usize) -> f64 {
        self.width_of(index).unwrap_or(self.fallback_width)
    }

    /// Sum of all natural widths plus the inset on both sides.
    pub fn total_natural_width(&self, inset: f64) -> f64 {
        (0..self.len()).map(|i| self.natural_width(i)).sum::<f64>() + 2.0 * inset
    }

    /// True when every title fits in `available_width`.
    pub fn is_fill_mode(&self, available_width: f64, inset: f64) -> bool {
        !self.is_empty() && self.total_natural_width(inset) <= available_width
    }

    /// Width the strip gives tab `index` in the current layout mode.
    pub fn layout_width(&self, index: usize, available_width: f64, inset: f64, spacing: f64) -> f64 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        if self.total_natural_width(inset) <= available_width {
            ((available_width - 2.0 * inset) / count as f64).max(0.0)
        } else {
            2.0 * spacing + self.natural_width(index)
        }
    }

    /// Layout widths of every tab, in order.
    pub fn layout_widths(&self, available_width: f64, inset: f64, spacing: f64) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.layout_width(i, available_width, inset, spacing))
            .collect()
    }

    /// Full scrollable width of the strip: all layout widths plus insets.
    pub fn content_width(&self, available_width: f64, inset: f64, spacing: f64) -> f64 {
        self.layout_widths(available_width, inset, spacing)
            .iter()
            .sum::<f64>()
            + 2.0 * inset
    }
}

impl<M: TabModel> TabStripModel<M> {
    pub fn title(&self, index: usize) -> Option<&str> {
        self.model(index).map(TabModel::title)
    }
}

impl<M> std::fmt::Debug for TabStripModel<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStripModel")
            .field("len", &self.entries.len())
            .field("fallback_width", &self.fallback_width)
            .finish()
    }
}
