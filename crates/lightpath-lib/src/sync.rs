//! Bulk state synchronization — refresh or drive every indicator in a list.

use serde::Serialize;

use crate::backend::{EnclosureBackend, PlatformBackend};
use crate::dispatch::Dispatcher;
use crate::kind::{IndicatorKind, LedState};
use crate::list::{Indicator, IndicatorList};

/// Per-pass counters. Informational only: bulk operations never fail as a
/// whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Records whose state was read successfully.
    pub read: usize,
    /// Records whose read failed (state left unknown / forced a write).
    pub read_failed: usize,
    /// Writes issued, including the enclosure identify re-write.
    pub written: usize,
    /// Records skipped because they already had the target state.
    pub skipped: usize,
    /// Writes that failed.
    pub write_failed: usize,
}

impl<P: PlatformBackend, E: EnclosureBackend> Dispatcher<P, E> {
    /// Refresh the state of every record in `list`.
    ///
    /// A failed read marks that record unknown (`None`) and moves on.
    pub fn read_all_states(&self, kind: IndicatorKind, list: &mut IndicatorList) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for record in list.iter_mut() {
            match self.read_state(kind, record) {
                Ok(state) => {
                    record.state = Some(state);
                    summary.read += 1;
                }
                Err(e) => {
                    log::debug!("{kind} {}: state unknown ({e})", record.code());
                    record.state = None;
                    summary.read_failed += 1;
                }
            }
        }
        summary
    }

    /// Drive every record in `list` to `target`.
    ///
    /// Each record is read first and only written if the read failed or the
    /// state differs. When turning identify indicators off, the first record
    /// (the enclosure identify indicator) is written off again at the end:
    /// enclosure firmware does not clear an enclosure identify indicator that
    /// was turned on by itself when its components are turned off.
    pub fn write_all_states(
        &self,
        kind: IndicatorKind,
        list: &IndicatorList,
        target: LedState,
    ) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for record in list {
            let needs_write = match self.read_state(kind, record) {
                Ok(state) => {
                    summary.read += 1;
                    state != target
                }
                Err(_) => {
                    summary.read_failed += 1;
                    true
                }
            };
            if !needs_write {
                summary.skipped += 1;
                continue;
            }
            self.write_counted(kind, record, target, &mut summary);
        }

        if kind == IndicatorKind::Identify
            && target == LedState::Off
            && let Some(enclosure) = list.first()
        {
            self.write_counted(kind, enclosure, target, &mut summary);
        }
        summary
    }

    fn write_counted(
        &self,
        kind: IndicatorKind,
        record: &Indicator,
        target: LedState,
        summary: &mut SyncSummary,
    ) {
        summary.written += 1;
        if let Err(e) = self.write_state(kind, record, target) {
            log::debug!("{kind} {}: write {target} failed ({e})", record.code());
            summary.write_failed += 1;
        }
    }
}
