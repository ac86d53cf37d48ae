//! # tabpager-core
//!
//! Core traits and types for the tabpager container.
//!
//! This crate holds everything the container needs that does not depend on
//! its layout: the content-unit and display-model traits, the signals and
//! messages it exchanges with a host, configuration, themes, and the
//! closed-form physics used for paging and the collapsible header.
//!
//! ## Core Abstractions
//!
//! - [`ContentUnit`] - One page of content owned by the container
//! - [`TabModel`] - Display model providing a tab title
//! - [`InnerScroll`] - A page's own vertical scroll content
//! - [`HeaderView`] - Optional collapsible header above the tab strip
//! - [`Message`] / [`MessageBus`] - Host input and container notifications
//! - [`TabPagerConfig`] - Layout knobs and physics constants
//! - [`Theme`] - Tab strip colours
//! - [`physics`] - Deceleration, spring, rubber band and timer animation
//! - [`CoreError`] - Error types for container operations
//!
//! ## Example
//!
//! ```ignore
//! use tabpager_core::{Appearance, ContentUnit, MessageBus, TabPagerConfig};
//! use ratatui::prelude::*;
//!
//! struct Page {
//!     text: String,
//! }
//!
//! impl ContentUnit for Page {
//!     fn appearance(&mut self, _phase: Appearance, _animated: bool) {}
//!     fn render(&self, area: Rect, buf: &mut Buffer) {
//!         self.text.as_str().render(area, buf);
//!     }
//! }
//!
//! let config = TabPagerConfig::load()?;
//! let bus = MessageBus::new(64);
//! let rx = bus.subscribe();
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod physics;
pub mod tab;
pub mod theme;

pub use config::{PhysicsConfig, StripConfig, TabPagerConfig};
pub use error::{CoreError, CoreResult};
pub use event::{Appearance, BusReceiver, GesturePhase, GestureSignal, Message, MessageBus, ScrollSignal};
pub use physics::OffsetBounds;
pub use tab::{ContentUnit, HeaderView, InnerScroll, TabModel};
pub use theme::{StripColors, Theme};
