//! Operating mode detection.
//!
//! There is no platform property that states the indicator topology, so it
//! is inferred from the number of platform fault indicators: a single one
//! (the check-log indicator) means Guiding Light, more than one means Light
//! Path. The detected mode is returned as a value and passed explicitly to
//! [`Dispatcher::build_list`].

use std::fmt;

use serde::Serialize;

use crate::backend::{EnclosureBackend, PlatformBackend};
use crate::dispatch::Dispatcher;
use crate::error::{IndicatorError, Result};
use crate::kind::IndicatorKind;

/// Service indicator topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatingMode {
    /// Not detected yet, or detection failed.
    #[default]
    Undetermined,
    /// Single aggregate fault (check-log) indicator.
    GuidingLight,
    /// Per-component fault indicators.
    LightPath,
}

impl OperatingMode {
    pub fn code(self) -> i32 {
        match self {
            OperatingMode::Undetermined => 0,
            OperatingMode::GuidingLight => 1,
            OperatingMode::LightPath => 2,
        }
    }

    /// Classify a platform fault indicator count. Zero is not classifiable.
    pub fn from_fault_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(OperatingMode::GuidingLight),
            _ => Some(OperatingMode::LightPath),
        }
    }

    /// Whether enclosure fault indicators belong in fault lists. Component
    /// fault indicators are meaningless in Guiding Light mode.
    pub fn includes_enclosure_faults(self) -> bool {
        self != OperatingMode::GuidingLight
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Undetermined => write!(f, "undetermined"),
            OperatingMode::GuidingLight => write!(f, "guiding light"),
            OperatingMode::LightPath => write!(f, "light path"),
        }
    }
}

impl<P: PlatformBackend, E: EnclosureBackend> Dispatcher<P, E> {
    /// Detect the operating mode from the platform fault indicators.
    ///
    /// Only the platform backend is consulted. An empty fault list is an
    /// error here, unlike in list construction where zero matches is valid.
    pub fn detect_operating_mode(&self) -> Result<OperatingMode> {
        let list = self.platform().query_indicators(IndicatorKind::Fault)?;
        let count = list.release();
        let mode = OperatingMode::from_fault_count(count).ok_or(IndicatorError::ModeUndetermined)?;
        log::debug!("{count} platform fault indicator(s): {mode} mode");
        Ok(mode)
    }
}
