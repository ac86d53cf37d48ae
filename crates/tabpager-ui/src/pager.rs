//! Paged content host
//!
//! Owns the installed content units and lays them out edge-to-edge, one
//! viewport wide each, along a horizontally scrolling strip of pages. It
//! tracks the paging offset and forwards appearance transitions, keeping
//! every `Will*` phase paired with its `Did*`.

use tabpager_core::{Appearance, ContentUnit, CoreError, CoreResult, ScrollSignal};
use tracing::{debug, info, trace};

/// Horizontal placement of one page in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub index: usize,
    /// Leading edge
    pub x: f64,
    pub width: f64,
    /// Pinned to the leading edge of the scroll content
    pub pinned_leading: bool,
    /// Pinned to the trailing edge of the scroll content
    pub pinned_trailing: bool,
}

impl PageFrame {
    pub fn trailing(&self) -> f64 {
        self.x + self.width
    }
}

struct HostedUnit {
    unit: Box<dyn ContentUnit>,
    /// Appearance begun but not yet completed
    pending: Option<Appearance>,
}

impl HostedUnit {
    /// Completes any begun appearance, then detaches the unit.
    fn detach(&mut self) {
        if let Some(pending) = self.pending.take() {
            let phase = pending.completion();
            debug!(?phase, "completing appearance before detach");
            self.unit.appearance(phase, false);
        }
        self.unit.detached();
    }
}

/// Hosts content units for horizontal paging.
pub struct PagedContentHost {
    units: Vec<HostedUnit>,
    offset: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl Default for PagedContentHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PagedContentHost {
    pub fn new() -> Self {
        PagedContentHost {
            units: Vec::new(),
            offset: 0.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    /// Installs `units`, notifying each that it was attached.
    ///
    /// Any previously installed units are detached and dropped first.
    pub fn install(&mut self, units: Vec<Box<dyn ContentUnit>>) {
        drop(self.uninstall());
        self.units = units
            .into_iter()
            .map(|mut unit| {
                unit.attached();
                HostedUnit {
                    unit,
                    pending: None,
                }
            })
            .collect();
        self.offset = 0.0;
        info!(count = self.units.len(), "installed content units");
    }

    /// Detaches every unit and hands them back to the caller.
    pub fn uninstall(&mut self) -> Vec<Box<dyn ContentUnit>> {
        let hosted = std::mem::take(&mut self.units);
        if !hosted.is_empty() {
            debug!(count = hosted.len(), "detaching content units");
        }
        self.offset = 0.0;
        hosted
            .into_iter()
            .map(|mut hosted| {
                hosted.detach();
                hosted.unit
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit(&self, index: usize) -> Option<&dyn ContentUnit> {
        self.units.get(index).map(|hosted| hosted.unit.as_ref())
    }

    pub fn unit_mut(&mut self, index: usize) -> Option<&mut (dyn ContentUnit + 'static)> {
        self.units.get_mut(index).map(|hosted| hosted.unit.as_mut())
    }

    /// Resizes the viewport; every page takes the new width.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Width of all pages laid out edge-to-edge.
    pub fn content_width(&self) -> f64 {
        self.units.len() as f64 * self.viewport_width
    }

    pub fn max_offset(&self) -> f64 {
        (self.content_width() - self.viewport_width).max(0.0)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Moves the paging offset, clamped to the content.
    pub fn set_offset(&mut self, offset: f64) {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            0.0
        };
        trace!(offset = clamped, "paging offset");
        self.offset = clamped;
    }

    /// Offset at which page `index` fills the viewport.
    pub fn offset_for_page(&self, index: usize) -> f64 {
        index as f64 * self.viewport_width
    }

    pub fn scroll_signal(&self) -> ScrollSignal {
        ScrollSignal::new(self.offset, self.viewport_width, self.content_width())
    }

    /// Page whose leading edge is at or before `offset`.
    pub fn page_at(&self, offset: f64) -> Option<usize> {
        if self.units.is_empty() {
            return None;
        }
        if self.viewport_width <= 0.0 || offset <= 0.0 {
            return Some(0);
        }
        let page = (offset / self.viewport_width).floor() as usize;
        Some(page.min(self.units.len() - 1))
    }

    /// Page frames in content coordinates.
    ///
    /// The first page is pinned to the leading edge and the last to the
    /// trailing edge, so a single page is pinned to both.
    pub fn frames(&self) -> Vec<PageFrame> {
        let count = self.units.len();
        (0..count)
            .map(|index| PageFrame {
                index,
                x: index as f64 * self.viewport_width,
                width: self.viewport_width,
                pinned_leading: index == 0,
                pinned_trailing: index + 1 == count,
            })
            .collect()
    }

    /// Pages intersecting the viewport, with their leading edge relative to
    /// the viewport.
    pub fn visible_pages(&self) -> Vec<(usize, f64)> {
        self.frames()
            .into_iter()
            .filter(|frame| {
                frame.trailing() > self.offset && frame.x < self.offset + self.viewport_width
            })
            .map(|frame| (frame.index, frame.x - self.offset))
            .collect()
    }

    /// Starts an appearance transition on `index`.
    ///
    /// A transition still pending on the unit is completed first so its
    /// `Did*` phase is never lost.
    pub fn begin_appearance(&mut self, index: usize, appearing: bool, animated: bool) -> CoreResult<()> {
        let len = self.units.len();
        let hosted = self
            .units
            .get_mut(index)
            .ok_or(CoreError::InvalidIndex { index, len })?;

        if let Some(pending) = hosted.pending.take() {
            debug!(index, ?pending, "completing superseded appearance");
            hosted.unit.appearance(pending.completion(), animated);
        }
        let phase = Appearance::begin(appearing);
        debug!(index, ?phase, animated, "appearance");
        hosted.unit.appearance(phase, animated);
        hosted.pending = Some(phase);
        Ok(())
    }

    /// Completes the transition begun on `index`, if any.
    pub fn end_appearance(&mut self, index: usize, animated: bool) -> CoreResult<()> {
        let len = self.units.len();
        let hosted = self
            .units
            .get_mut(index)
            .ok_or(CoreError::InvalidIndex { index, len })?;

        match hosted.pending.take() {
            Some(pending) => {
                let phase = pending.completion();
                debug!(index, ?phase, "appearance");
                hosted.unit.appearance(phase, animated);
            }
            None => debug!(index, "no appearance transition to complete"),
        }
        Ok(())
    }

    /// True while `index` has a `Will*` phase awaiting its `Did*`.
    #[cfg(test)]
    pub(crate) fn has_pending_appearance(&self, index: usize) -> bool {
        self.units
            .get(index)
            .is_some_and(|hosted| hosted.pending.is_some())
    }
}

impl Drop for PagedContentHost {
    fn drop(&mut self) {
        for hosted in &mut self.units {
            hosted.detach();
        }
    }
}

impl std::fmt::Debug for PagedContentHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedContentHost")
            .field("units", &self.units.len())
            .field("offset", &self.offset)
            .field("viewport_width", &self.viewport_width)
            .field("viewport_height", &self.viewport_height)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Lifecycle entries recorded by [`RecordingUnit`]
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Attached(usize),
        Detached(usize),
        Phase(usize, Appearance),
    }

    pub(crate) type Log = Rc<RefCell<Vec<Event>>>;

    pub(crate) struct RecordingUnit {
        pub id: usize,
        pub log: Log,
    }

    impl ContentUnit for RecordingUnit {
        fn attached(&mut self) {
            self.log.borrow_mut().push(Event::Attached(self.id));
        }

        fn detached(&mut self) {
            self.log.borrow_mut().push(Event::Detached(self.id));
        }

        fn appearance(&mut self, phase: Appearance, _animated: bool) {
            self.log.borrow_mut().push(Event::Phase(self.id, phase));
        }

        fn render(&self, _area: Rect, _buf: &mut Buffer) {}
    }

    pub(crate) fn units(ids: std::ops::Range<usize>, log: &Log) -> Vec<Box<dyn ContentUnit>> {
        ids.map(|id| {
            Box::new(RecordingUnit {
                id,
                log: Rc::clone(log),
            }) as Box<dyn ContentUnit>
        })
        .collect()
    }

    fn host_with(count: usize, log: &Log) -> PagedContentHost {
        let mut host = PagedContentHost::new();
        host.set_viewport(320.0, 200.0);
        host.install(units(0..count, log));
        host
    }

    #[test]
    fn test_frames_edge_to_edge() {
        let log = Log::default();
        let host = host_with(3, &log);
        let frames = host.frames();

        assert_eq!(frames.len(), 3);
        assert!(frames[0].pinned_leading);
        assert_eq!(frames[0].x, 0.0);
        assert_eq!(frames[1].x, frames[0].trailing());
        assert_eq!(frames[2].x, frames[1].trailing());
        assert!(frames[2].pinned_trailing);
        assert!(!frames[1].pinned_leading && !frames[1].pinned_trailing);
        assert_eq!(host.content_width(), 960.0);
    }

    #[test]
    fn test_single_unit_pinned_both_edges() {
        let log = Log::default();
        let host = host_with(1, &log);
        let frames = host.frames();
        assert!(frames[0].pinned_leading && frames[0].pinned_trailing);
        assert_eq!(frames[0].width, 320.0);
        assert_eq!(host.max_offset(), 0.0);
    }

    #[test]
    fn test_install_replaces_and_detaches_first() {
        let log = Log::default();
        let mut host = host_with(2, &log);
        host.install(units(10..11, &log));

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Attached(0),
                Event::Attached(1),
                Event::Detached(0),
                Event::Detached(1),
                Event::Attached(10),
            ]
        );
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_uninstall_completes_begun_appearance() {
        let log = Log::default();
        let mut host = host_with(2, &log);
        host.begin_appearance(0, true, false).expect("valid index");
        drop(host.uninstall());

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Attached(0),
                Event::Attached(1),
                Event::Phase(0, Appearance::WillAppear),
                Event::Phase(0, Appearance::DidAppear),
                Event::Detached(0),
                Event::Detached(1),
            ]
        );
        assert!(!host.has_pending_appearance(0));
    }

    #[test]
    fn test_drop_detaches_units() {
        let log = Log::default();
        drop(host_with(2, &log));
        assert!(log.borrow().contains(&Event::Detached(0)));
        assert!(log.borrow().contains(&Event::Detached(1)));
    }

    #[test]
    fn test_offset_clamped_to_content() {
        let log = Log::default();
        let mut host = host_with(3, &log);
        host.set_offset(5000.0);
        assert_eq!(host.offset(), 640.0);
        host.set_offset(-20.0);
        assert_eq!(host.offset(), 0.0);
        host.set_offset(f64::NAN);
        assert_eq!(host.offset(), 0.0);
    }

    #[test]
    fn test_page_at() {
        let log = Log::default();
        let host = host_with(3, &log);
        assert_eq!(host.page_at(0.0), Some(0));
        assert_eq!(host.page_at(319.0), Some(0));
        assert_eq!(host.page_at(320.0), Some(1));
        assert_eq!(host.page_at(10_000.0), Some(2));
        assert_eq!(PagedContentHost::new().page_at(10.0), None);
    }

    #[test]
    fn test_visible_pages_while_paging() {
        let log = Log::default();
        let mut host = host_with(3, &log);
        host.set_offset(480.0);
        assert_eq!(host.visible_pages(), vec![(1, -160.0), (2, 160.0)]);
        host.set_offset(320.0);
        assert_eq!(host.visible_pages(), vec![(1, 0.0)]);
    }

    #[test]
    fn test_appearance_pairs() {
        let log = Log::default();
        let mut host = host_with(2, &log);
        log.borrow_mut().clear();

        host.begin_appearance(1, true, true).expect("valid index");
        assert!(host.has_pending_appearance(1));
        host.end_appearance(1, true).expect("valid index");
        assert!(!host.has_pending_appearance(1));

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Phase(1, Appearance::WillAppear),
                Event::Phase(1, Appearance::DidAppear),
            ]
        );
    }

    #[test]
    fn test_superseded_appearance_completed() {
        let log = Log::default();
        let mut host = host_with(1, &log);
        log.borrow_mut().clear();

        host.begin_appearance(0, true, true).expect("valid index");
        host.begin_appearance(0, false, true).expect("valid index");
        host.end_appearance(0, true).expect("valid index");

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Phase(0, Appearance::WillAppear),
                Event::Phase(0, Appearance::DidAppear),
                Event::Phase(0, Appearance::WillDisappear),
                Event::Phase(0, Appearance::DidDisappear),
            ]
        );
    }

    #[test]
    fn test_appearance_invalid_index() {
        let mut host = PagedContentHost::new();
        assert!(matches!(
            host.begin_appearance(0, true, false),
            Err(CoreError::InvalidIndex { index: 0, len: 0 })
        ));
        assert!(host.end_appearance(3, false).is_err());
    }
}
