//! Check-log indicator control.
//!
//! The check-log indicator is the first record of the platform fault list
//! (see [`PlatformBackend::query_indicators`]).

use crate::backend::{EnclosureBackend, PlatformBackend};
use crate::dispatch::Dispatcher;
use crate::error::{IndicatorError, Result};
use crate::kind::{IndicatorKind, LedState};

impl<P: PlatformBackend, E: EnclosureBackend> Dispatcher<P, E> {
    /// Turn the check-log indicator on or off.
    pub fn set_check_log(&self, state: LedState) -> Result<()> {
        let list = self.platform().query_indicators(IndicatorKind::Fault)?;
        let check_log = list.first().ok_or(IndicatorError::NoCheckLogIndicator)?;
        log::debug!("check-log indicator is {}", check_log.code());
        self.write_state(IndicatorKind::Fault, check_log, state)
    }

    pub fn enable_check_log(&self) -> Result<()> {
        self.set_check_log(LedState::On)
    }

    pub fn disable_check_log(&self) -> Result<()> {
        self.set_check_log(LedState::Off)
    }
}
