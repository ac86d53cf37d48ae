//! Tab page container
//!
//! The [`TabPageController`] is the public face of the crate. It owns the
//! tab strip model, the paged content host, and the collapsible-header
//! coordinator, and keeps them in step: selecting a tab pages the content,
//! paging the content moves the indicator, and a vertical drag collapses the
//! header before scrolling the selected page.
//!
//! # Example
//!
//! ```ignore
//! use tabpager_ui::{title_width_fn, TabPageController};
//!
//! let mut pager = TabPageController::new(title_width_fn::<String>());
//! pager.set_viewport(80.0, 24.0);
//! pager.set_items(vec![
//!     (Box::new(inbox) as Box<dyn ContentUnit>, "Inbox".to_string()),
//!     (Box::new(archive) as Box<dyn ContentUnit>, "Archive".to_string()),
//! ]);
//! pager.set_selected_index(1);
//!
//! loop {
//!     pager.tick(Instant::now());
//!     terminal.draw(|f| pager.render(f.area(), f.buffer_mut()))?;
//! }
//! ```

use std::time::Instant;

use ratatui::prelude::*;
use tabpager_core::physics::{lerp, TimerAnimation};
use tabpager_core::{
    BusReceiver, ContentUnit, CoreError, CoreResult, GesturePhase, GestureSignal, HeaderView,
    Message, MessageBus, StripConfig, TabModel, TabPagerConfig, Theme,
};
use tracing::{debug, info, trace};

use crate::header::{GestureCoordinator, HeaderMetrics, SplitScroll};
use crate::pager::PagedContentHost;
use crate::renderer::{cells, render_clipped, PageLayout};
use crate::strip::{TabStripModel, WidthFn};
use crate::sync::{synchronize, IndicatorGeometry, StripMetrics, SyncFrame};
use crate::widgets::{Indicator, TabStrip};

/// One tab cell as laid out in the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct TabCell<'a> {
    pub index: usize,
    pub title: &'a str,
    /// Leading edge in strip content coordinates, inset included
    pub leading: f64,
    pub width: f64,
    /// Drawn with the selected title style
    pub selected: bool,
}

impl TabCell<'_> {
    pub fn trailing(&self) -> f64 {
        self.leading + self.width
    }
}

/// Snapshot of the strip geometry for rendering and hit testing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StripLayout<'a> {
    /// False with fewer than two items
    pub visible: bool,
    pub cells: Vec<TabCell<'a>>,
    /// Horizontal auto-scroll of the strip content
    pub strip_offset: f64,
    /// Relative to the separator's leading edge
    pub indicator: IndicatorGeometry,
    pub inset: f64,
    pub indicator_height: f64,
}

/// Selection change in flight.
#[derive(Debug)]
struct SelectionTransition {
    from: Option<usize>,
    to: usize,
    start_offset: f64,
    timer: TimerAnimation,
}

impl SelectionTransition {
    /// True when the transition moves between two different tabs.
    fn changes_tab(&self) -> bool {
        self.from != Some(self.to)
    }
}

/// Tabbed page container.
///
/// `TabPageController` handles:
/// - Installing (content unit, display model) pairs atomically
/// - Selection with paired appearance transitions on the affected units
/// - Keeping the indicator and strip scroll in step with paging
/// - Coordinating the optional collapsible header with page scrolling
///
/// There is exactly one constructor and it requires the width function;
/// the container has no `Default`.
///
/// # Thread Safety
///
/// The controller is driven from the UI thread and is not `Send`. Observers
/// on other tasks receive notifications through [`subscribe`].
///
/// [`subscribe`]: TabPageController::subscribe
pub struct TabPageController<M> {
    strip: TabStripModel<M>,
    pager: PagedContentHost,
    selected: Option<usize>,
    /// Tab drawn as selected; trails `selected` until the transition lands
    highlighted: Option<usize>,
    transition: Option<SelectionTransition>,
    config: TabPagerConfig,
    theme: Theme,
    header: Option<Box<dyn HeaderView>>,
    header_offset: f64,
    coordinator: GestureCoordinator,
    bus: MessageBus,
    viewport: (f64, f64),
    sync: SyncFrame,
    paging: bool,
}

/// Header offset and the selected page's inner scroll as one virtual offset.
fn split_scroll<'a>(
    header_offset: &'a mut f64,
    pager: &'a mut PagedContentHost,
    selected: Option<usize>,
    metrics: HeaderMetrics,
) -> SplitScroll<'a> {
    let inner = selected
        .and_then(|index| pager.unit_mut(index))
        .and_then(|unit| unit.inner_scroll_mut());
    SplitScroll {
        header_offset,
        inner,
        metrics,
    }
}

impl<M: TabModel> TabPageController<M> {
    /// Creates an empty container measuring titles with `width_fn`.
    #[must_use]
    pub fn new(width_fn: WidthFn<M>) -> Self {
        let config = TabPagerConfig::default();
        TabPageController {
            strip: TabStripModel::new(width_fn).with_fallback_width(config.physics.fallback_tab_width),
            pager: PagedContentHost::new(),
            selected: None,
            highlighted: None,
            transition: None,
            theme: config.resolve_theme(),
            coordinator: GestureCoordinator::new(config.physics),
            config,
            header: None,
            header_offset: 0.0,
            bus: MessageBus::default(),
            viewport: (0.0, 0.0),
            sync: SyncFrame::default(),
            paging: false,
        }
    }

    /// Builder form of [`set_config`](Self::set_config).
    #[must_use]
    pub fn with_config(mut self, config: TabPagerConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Replaces the whole configuration, theme included, and relayouts.
    pub fn set_config(&mut self, config: TabPagerConfig) {
        self.strip.set_fallback_width(config.physics.fallback_tab_width);
        self.coordinator.set_physics(config.physics);
        self.theme = config.resolve_theme();
        self.config = config;
        self.relayout();
    }

    pub fn config(&self) -> &TabPagerConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Replaces the width function; every cached width is measured again.
    pub fn set_width_fn(&mut self, width_fn: WidthFn<M>) {
        self.strip.set_width_fn(width_fn);
        self.relayout();
    }

    // === Items ===

    /// Replaces every item.
    ///
    /// The previous units are detached before any new unit is attached.
    /// The first item becomes selected without appearance transitions, or
    /// nothing is selected when `items` is empty.
    pub fn set_items(&mut self, items: Vec<(Box<dyn ContentUnit>, M)>) {
        self.finish_transition(true);
        self.coordinator.stop_animation();
        self.selected = None;
        self.highlighted = None;
        self.paging = false;

        let (units, models): (Vec<_>, Vec<_>) = items.into_iter().unzip();
        drop(self.pager.uninstall());
        self.strip.set_models(models);
        self.pager.install(units);
        self.header_offset = 0.0;
        self.set_inner_scroll_enabled(self.header.is_none());
        info!(count = self.strip.len(), "tab items replaced");

        if !self.strip.is_empty() {
            self.start_transition(None, 0);
            self.selected = Some(0);
            self.publish(Message::SelectionChanged {
                from: None,
                to: Some(0),
            });
        }
        self.relayout();
    }

    pub fn len(&self) -> usize {
        self.strip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strip.is_empty()
    }

    pub fn model(&self, index: usize) -> Option<&M> {
        self.strip.model(index)
    }

    pub fn unit(&self, index: usize) -> Option<&dyn ContentUnit> {
        self.pager.unit(index)
    }

    pub fn unit_mut(&mut self, index: usize) -> Option<&mut (dyn ContentUnit + 'static)> {
        self.pager.unit_mut(index)
    }

    pub fn pager(&self) -> &PagedContentHost {
        &self.pager
    }

    // === Selection ===

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_unit(&self) -> Option<&dyn ContentUnit> {
        self.selected.and_then(|index| self.pager.unit(index))
    }

    /// Selects `index`, paging the content to it.
    ///
    /// An out-of-range index or the current selection is ignored.
    pub fn set_selected_index(&mut self, index: usize) {
        if let Err(err) = self.try_select(index) {
            debug!(%err, "selection ignored");
        }
    }

    /// Selects `index`, reporting why nothing happened for a bad index.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidIndex` if `index` is past the last item.
    pub fn try_select(&mut self, index: usize) -> CoreResult<()> {
        let len = self.strip.len();
        if index >= len {
            return Err(CoreError::InvalidIndex { index, len });
        }
        if self.selected == Some(index) {
            trace!(index, "tab already selected");
            return Ok(());
        }

        self.finish_transition(false);
        self.coordinator.stop_animation();
        self.paging = false;

        let from = self.selected;
        if let Some(previous) = from {
            self.pager.begin_appearance(previous, false, true)?;
            self.pager.begin_appearance(index, true, true)?;
        }
        self.selected = Some(index);
        debug!(?from, to = index, "selection changed");
        self.publish(Message::SelectionChanged {
            from,
            to: Some(index),
        });
        self.start_transition(from, index);
        Ok(())
    }

    /// Selects the next tab, wrapping to the first.
    pub fn next_tab(&mut self) {
        let len = self.strip.len();
        if len <= 1 {
            return;
        }
        let next = self.selected.map_or(0, |index| (index + 1) % len);
        self.set_selected_index(next);
    }

    /// Selects the previous tab, wrapping to the last.
    pub fn prev_tab(&mut self) {
        let len = self.strip.len();
        if len <= 1 {
            return;
        }
        let prev = self.selected.map_or(0, |index| (index + len - 1) % len);
        self.set_selected_index(prev);
    }

    /// True while a selection transition or header animation runs.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || self.coordinator.is_animating()
    }

    fn start_transition(&mut self, from: Option<usize>, to: usize) {
        self.transition = Some(SelectionTransition {
            from,
            to,
            start_offset: self.pager.offset(),
            timer: TimerAnimation::new(self.config.physics.transition_duration()),
        });
    }

    /// Resolves a pending transition, optionally jumping to its target.
    ///
    /// Refreshes the two affected cells, then completes both appearance
    /// transitions.
    fn finish_transition(&mut self, jump: bool) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        if jump {
            self.pager
                .set_offset(self.pager.offset_for_page(transition.to));
        }
        self.resync();

        if transition.changes_tab() {
            let refreshed: Vec<usize> = transition
                .from
                .into_iter()
                .chain(std::iter::once(transition.to))
                .collect();
            self.highlighted = Some(transition.to);
            self.publish(Message::TabsRefreshed(refreshed));
        }
        if let Some(from) = transition.from.filter(|&from| from != transition.to) {
            if let Err(err) = self.complete_appearances(from, transition.to) {
                debug!(%err, "appearance completion skipped");
            }
        }
        debug!(from = ?transition.from, to = transition.to, "selection transition finished");
    }

    fn complete_appearances(&mut self, from: usize, to: usize) -> CoreResult<()> {
        self.pager.end_appearance(from, true)?;
        self.pager.end_appearance(to, true)
    }

    // === Paging ===

    /// The user started dragging the pages; a running transition resolves
    /// where it is.
    pub fn begin_paging(&mut self) {
        self.finish_transition(false);
        self.paging = true;
        debug!(offset = self.pager.offset(), "paging began");
    }

    /// Moves the pages to `offset` as the user drags.
    pub fn scroll_pager(&mut self, offset: f64) {
        if !self.paging {
            self.begin_paging();
        }
        self.pager.set_offset(offset);
        self.resync();
    }

    /// Paging deceleration came to rest; selects the page at the offset.
    pub fn paging_did_end_decelerating(&mut self) {
        self.paging = false;
        if let Some(page) = self.pager.page_at(self.pager.offset()) {
            self.settle_on(page);
        }
    }

    /// Ends a drag without deceleration by snapping to the nearest page.
    pub fn settle_paging(&mut self) {
        self.paging = false;
        let width = self.pager.viewport_width();
        if self.pager.is_empty() || width <= 0.0 {
            return;
        }
        let nearest = (self.pager.offset() / width).round().max(0.0) as usize;
        self.settle_on(nearest.min(self.pager.len() - 1));
    }

    fn settle_on(&mut self, page: usize) {
        debug!(page, offset = self.pager.offset(), "paging settled");
        if self.selected == Some(page) {
            if self.pager.offset() != self.pager.offset_for_page(page) {
                self.finish_transition(false);
                self.start_transition(Some(page), page);
            }
        } else {
            self.set_selected_index(page);
        }
    }

    // === Layout ===

    /// Resizes the container.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(0.0), height.max(0.0));
        self.relayout();
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// The strip is shown only with two or more items.
    pub fn is_strip_visible(&self) -> bool {
        self.strip.len() >= 2
    }

    /// Height taken by the strip, separator and their gaps.
    pub fn chrome_height(&self) -> f64 {
        if self.is_strip_visible() {
            self.config.strip.chrome_height()
        } else {
            0.0
        }
    }

    pub fn strip_config(&self) -> &StripConfig {
        &self.config.strip
    }

    pub fn set_tab_inset(&mut self, inset: f64) {
        self.config.strip.tab_inset = inset;
        self.relayout();
    }

    pub fn set_tab_internal_spacing(&mut self, spacing: f64) {
        self.config.strip.tab_internal_spacing = spacing;
        self.relayout();
    }

    pub fn set_tab_strip_height(&mut self, height: f64) {
        self.config.strip.tab_strip_height = height;
        self.relayout();
    }

    pub fn set_tab_strip_bottom_offset(&mut self, offset: f64) {
        self.config.strip.tab_strip_bottom_offset = offset;
        self.relayout();
    }

    pub fn set_separator_height(&mut self, height: f64) {
        self.config.strip.separator_height = height;
        self.relayout();
    }

    pub fn set_separator_bottom_offset(&mut self, offset: f64) {
        self.config.strip.separator_bottom_offset = offset;
        self.relayout();
    }

    pub fn set_indicator_height(&mut self, height: f64) {
        self.config.strip.indicator_height = height;
        self.relayout();
    }

    fn strip_metrics(&self) -> StripMetrics {
        StripMetrics {
            available_width: self.viewport.0,
            inset: self.config.strip.tab_inset,
            spacing: self.config.strip.tab_internal_spacing,
        }
    }

    fn relayout(&mut self) {
        let (width, height) = self.viewport;
        self.pager
            .set_viewport(width, (height - self.chrome_height()).max(0.0));
        if self.transition.is_none() && !self.paging {
            if let Some(index) = self.selected {
                self.pager.set_offset(self.pager.offset_for_page(index));
            }
        }
        self.resync();
    }

    fn resync(&mut self) {
        self.sync = synchronize(&self.strip, &self.pager.scroll_signal(), &self.strip_metrics());
    }

    /// Geometry derived from the latest paging offset.
    pub fn sync_frame(&self) -> &SyncFrame {
        &self.sync
    }

    /// Strip geometry for the current frame.
    pub fn strip_layout(&self) -> StripLayout<'_> {
        let StripMetrics {
            available_width,
            inset,
            spacing,
        } = self.strip_metrics();

        let mut leading = inset;
        let cells = (0..self.strip.len())
            .map(|index| {
                let width = self.strip.layout_width(index, available_width, inset, spacing);
                let cell = TabCell {
                    index,
                    title: self.strip.title(index).unwrap_or_default(),
                    leading,
                    width,
                    selected: self.highlighted == Some(index),
                };
                leading += width;
                cell
            })
            .collect();

        StripLayout {
            visible: self.is_strip_visible(),
            cells,
            strip_offset: self.sync.strip_offset,
            indicator: self.sync.indicator,
            inset,
            indicator_height: self.config.strip.indicator_height,
        }
    }

    /// Tab under horizontal position `x` of the strip's visible area.
    pub fn tab_at(&self, x: f64) -> Option<usize> {
        if !self.is_strip_visible() {
            return None;
        }
        let layout = self.strip_layout();
        let content_x = x + layout.strip_offset;
        layout
            .cells
            .iter()
            .find(|cell| content_x >= cell.leading && content_x < cell.trailing())
            .map(|cell| cell.index)
    }

    // === Header ===

    /// Installs or removes the collapsible header.
    ///
    /// While a header is present the coordinator drives page scrolling, so
    /// the units' own scroll handling is switched off.
    pub fn set_header_view(&mut self, header: Option<Box<dyn HeaderView>>) {
        self.coordinator.stop_animation();
        self.header = header;
        self.header_offset = 0.0;
        self.set_inner_scroll_enabled(self.header.is_none());
        debug!(present = self.header.is_some(), "header view replaced");
        self.relayout();
    }

    pub fn header_view(&self) -> Option<&dyn HeaderView> {
        self.header.as_deref()
    }

    /// How far the header has collapsed.
    pub fn header_offset(&self) -> f64 {
        self.header_offset
    }

    fn set_inner_scroll_enabled(&mut self, enabled: bool) {
        for index in 0..self.pager.len() {
            if let Some(scroll) = self
                .pager
                .unit_mut(index)
                .and_then(|unit| unit.inner_scroll_mut())
            {
                scroll.set_scroll_enabled(enabled);
            }
        }
    }

    fn header_metrics(&self) -> HeaderMetrics {
        HeaderMetrics {
            header_height: self.header.as_ref().map_or(0.0, |header| header.height()),
            chrome_height: self.chrome_height(),
            viewport_height: self.viewport.1,
        }
    }

    /// Feeds a vertical drag update to the header coordinator.
    ///
    /// Ignored without a header; pages then scroll themselves.
    pub fn handle_gesture(&mut self, signal: &GestureSignal) {
        if self.header.is_none() {
            trace!(phase = ?signal.phase, "no header, gesture ignored");
            return;
        }
        if signal.phase == GesturePhase::Began {
            // the pages land on the selected tab before the drag takes over
            self.finish_transition(true);
        }
        let metrics = self.header_metrics();
        let mut scroll = split_scroll(&mut self.header_offset, &mut self.pager, self.selected, metrics);
        self.coordinator.handle_gesture(signal, &mut scroll);
    }

    /// A new touch landed; stops the header animation in place.
    pub fn touch_began(&mut self) {
        self.coordinator.touch_began();
    }

    pub fn coordinator(&self) -> &GestureCoordinator {
        &self.coordinator
    }

    // === Driving ===

    /// Advances running animations to `now`.
    ///
    /// Returns true while anything is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut running = self.tick_transition(now);
        if self.header.is_some() {
            let metrics = self.header_metrics();
            let mut scroll =
                split_scroll(&mut self.header_offset, &mut self.pager, self.selected, metrics);
            running |= self.coordinator.tick(now, &mut scroll);
        }
        running
    }

    fn tick_transition(&mut self, now: Instant) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let target = self.pager.offset_for_page(transition.to);
        let finished = match transition.timer.tick(now) {
            Some(frame) => {
                let offset = if frame.finished {
                    target
                } else {
                    lerp(transition.start_offset, target, frame.progress)
                };
                trace!(offset, progress = frame.progress, "selection transition");
                self.pager.set_offset(offset);
                frame.finished
            }
            None => true,
        };

        if finished {
            self.finish_transition(true);
        } else {
            self.resync();
        }
        !finished
    }

    // === Appearance ===

    pub fn view_will_appear(&mut self, animated: bool) {
        self.forward_appearance(Some(true), animated);
    }

    pub fn view_did_appear(&mut self, animated: bool) {
        self.forward_appearance(None, animated);
    }

    pub fn view_will_disappear(&mut self, animated: bool) {
        self.forward_appearance(Some(false), animated);
    }

    pub fn view_did_disappear(&mut self, animated: bool) {
        self.forward_appearance(None, animated);
    }

    /// `Some(appearing)` begins a transition on the selected unit, `None`
    /// completes it.
    fn forward_appearance(&mut self, begin: Option<bool>, animated: bool) {
        let Some(index) = self.selected else {
            return;
        };
        let result = match begin {
            Some(appearing) => self.pager.begin_appearance(index, appearing, animated),
            None => self.pager.end_appearance(index, animated),
        };
        if let Err(err) = result {
            debug!(%err, "container appearance not forwarded");
        }
    }

    // === Messages ===

    /// Subscribe to selection and refresh notifications.
    pub fn subscribe(&self) -> BusReceiver {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    fn publish(&self, msg: Message) {
        if let Err(err) = self.bus.send(msg) {
            trace!(%err, "notification dropped");
        }
    }

    /// Handles container messages.
    ///
    /// Returns messages the container does not handle so the host can
    /// process them.
    pub fn handle_message(&mut self, msg: &Message) -> Option<Message> {
        match msg {
            Message::SelectTab(index) | Message::TapTab(index) => {
                self.set_selected_index(*index);
                None
            }
            Message::NextTab => {
                self.next_tab();
                None
            }
            Message::PrevTab => {
                self.prev_tab();
                None
            }
            Message::PagingBegan => {
                self.begin_paging();
                None
            }
            Message::PagingScrolled(offset) => {
                self.scroll_pager(*offset);
                None
            }
            Message::PagingSettled => {
                self.paging_did_end_decelerating();
                None
            }
            Message::TouchBegan => {
                self.touch_began();
                None
            }
            Message::Gesture(signal) => {
                self.handle_gesture(signal);
                None
            }
            Message::Batch(msgs) => {
                let unhandled: Vec<Message> = msgs
                    .iter()
                    .filter_map(|msg| self.handle_message(msg))
                    .collect();
                if unhandled.is_empty() {
                    None
                } else {
                    Some(Message::Batch(unhandled))
                }
            }
            _ => Some(msg.clone()),
        }
    }

    // === Rendering ===

    /// Draws the header, strip, separator and visible pages into `area`.
    ///
    /// `area` should match the last [`set_viewport`](Self::set_viewport).
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.background_style());
        let header_height = self.header.as_ref().map_or(0, |header| cells(header.height()));
        let layout = PageLayout::new(
            area,
            &self.config.strip,
            header_height,
            self.header_offset,
            self.is_strip_visible(),
        );

        if let Some(header) = &self.header {
            render_clipped(
                buf,
                area,
                (0, layout.header.top),
                (area.width, layout.header.height),
                |rect, buf| header.render(rect, buf),
            );
        }

        if self.is_strip_visible() {
            let strip = self.strip_layout();
            render_clipped(
                buf,
                area,
                (0, layout.strip.top),
                (area.width, layout.strip.height),
                |rect, buf| TabStrip::new(&strip, &self.theme).render(rect, buf),
            );
            render_clipped(
                buf,
                area,
                (0, layout.separator.top),
                (area.width, layout.separator.height),
                |rect, buf| Indicator::new(&strip, &self.theme).render(rect, buf),
            );
        }

        for (index, leading) in self.pager.visible_pages() {
            let Some(unit) = self.pager.unit(index) else {
                continue;
            };
            render_clipped(
                buf,
                area,
                (leading.round() as i32, layout.pager.top),
                (area.width, layout.pager.height),
                |rect, buf| unit.render(rect, buf),
            );
        }
    }
}

impl<M> std::fmt::Debug for TabPageController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabPageController")
            .field("strip", &self.strip)
            .field("pager", &self.pager)
            .field("selected", &self.selected)
            .field("transition", &self.transition)
            .field("header", &self.header.is_some())
            .field("header_offset", &self.header_offset)
            .field("viewport", &self.viewport)
            .finish()
    }
}
