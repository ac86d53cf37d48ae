//! Widgets for the tab page container
//!
//! ## Available Widgets
//!
//! - [`TabStrip`] - Tab titles laid out by the strip model, highlighted tab
//!   in the selected style
//! - [`Indicator`] - Separator line with the sliding selection indicator
//!
//! ## Example
//!
//! ```ignore
//! use tabpager_ui::widgets::{Indicator, TabStrip};
//!
//! let layout = controller.strip_layout();
//! TabStrip::new(&layout, &theme).render(strip_area, buf);
//! Indicator::new(&layout, &theme).render(separator_area, buf);
//! ```

pub mod indicator;
pub mod tab_strip;

pub use indicator::Indicator;
pub use tab_strip::TabStrip;
