//! # tabpager-ui
//!
//! Tabbed page container for terminal user interfaces.
//!
//! This crate builds the container on top of [`tabpager_core`]'s traits and
//! physics:
//!
//! - [`TabPageController`] - The container: items, selection, paging and
//!   the collapsible header
//! - [`TabStripModel`] - Display models with cached natural widths
//! - [`synchronize`] - Paging offset to indicator geometry and strip scroll
//! - [`PagedContentHost`] - Content units laid out edge-to-edge
//! - [`GestureCoordinator`] - Drag, deceleration and bounce for the header
//! - [`PageLayout`] - Vertical bands of the container
//!
//! ## Overview
//!
//! Input arrives as selection requests, paging offsets and vertical drag
//! updates. The controller funnels taps and settled paging into one
//! selection path, keeps every appearance transition paired, and derives
//! the indicator from the paging offset on every frame.
//!
//! ## Example
//!
//! ```ignore
//! use tabpager_ui::{title_width_fn, TabPageController};
//! use tabpager_core::Message;
//!
//! let mut pager = TabPageController::new(title_width_fn::<String>());
//! pager.set_items(items);
//!
//! loop {
//!     pager.tick(Instant::now());
//!     terminal.draw(|f| pager.render(f.area(), f.buffer_mut()))?;
//!
//!     if let Event::Key(key) = event::read()? {
//!         pager.handle_message(&Message::NextTab);
//!     }
//! }
//! ```
//!
//! ## Layout Calculation
//!
//! ```
//! use tabpager_core::StripConfig;
//! use tabpager_ui::PageLayout;
//! use ratatui::prelude::Rect;
//!
//! let area = Rect::new(0, 0, 80, 24);
//! let layout = PageLayout::new(area, &StripConfig::terminal(), 0, 0.0, true);
//!
//! // pages take everything below the strip and separator
//! assert_eq!(layout.pager.top, 2);
//! assert_eq!(layout.pager.height, 22);
//! ```

pub mod controller;
pub mod header;
pub mod pager;
pub mod renderer;
pub mod strip;
pub mod sync;
pub mod widgets;

pub use controller::{StripLayout, TabCell, TabPageController};
pub use header::{GestureCoordinator, GestureState, HeaderMetrics, MotionKind, VirtualScroll};
pub use pager::{PageFrame, PagedContentHost};
pub use renderer::{render_clipped, PageLayout};
pub use strip::{title_width, title_width_fn, TabStripModel, WidthFn};
pub use sync::{synchronize, IndicatorGeometry, ScrollFraction, StripMetrics, SyncFrame};
pub use widgets::{Indicator, TabStrip};
