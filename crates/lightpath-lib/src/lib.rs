//! lightpath — service indicator (LED) management for platform firmware and
//! enclosure-managed indicators.
//!
//! A [`Dispatcher`] routes per-indicator reads and writes to the backend that
//! owns each record, builds merged indicator lists, detects the operating
//! mode and drives the check-log indicator.

pub mod backend;
pub mod checklog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod kind;
pub mod list;
pub mod location;
pub mod mode;
pub mod sync;

pub use dispatch::{Dispatcher, MergePolicy};
pub use error::IndicatorError;
pub use kind::{IndicatorKind, LedState};
pub use list::{Indicator, IndicatorList};
pub use mode::OperatingMode;
