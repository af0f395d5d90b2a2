//! Access dispatcher — routes per-indicator reads/writes to the owning
//! backend, and builds indicator lists from both backends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::{EnclosureBackend, IndicatorBackend, NoEnclosure, PlatformBackend};
use crate::error::{IndicatorError, Result};
use crate::kind::{IndicatorKind, LedState};
use crate::list::{Address, BackendKind, Indicator, IndicatorList};
use crate::mode::OperatingMode;

/// What list construction does when the enclosure merge step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Log the failure and return the platform indicators alone.
    #[default]
    BestEffort,
    /// Fail the whole construction.
    Strict,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::BestEffort => write!(f, "best-effort"),
            MergePolicy::Strict => write!(f, "strict"),
        }
    }
}

/// The single seam between callers and the backends.
///
/// Owns the platform backend and, when the system has enclosure management,
/// the enclosure backend.
pub struct Dispatcher<P, E = NoEnclosure> {
    platform: P,
    enclosure: Option<E>,
    merge_policy: MergePolicy,
}

impl<P: PlatformBackend> Dispatcher<P, NoEnclosure> {
    /// Dispatcher for a system without enclosure management.
    pub fn platform_only(platform: P) -> Self {
        Dispatcher {
            platform,
            enclosure: None,
            merge_policy: MergePolicy::default(),
        }
    }
}

impl<P: PlatformBackend, E: EnclosureBackend> Dispatcher<P, E> {
    pub fn new(platform: P, enclosure: E) -> Self {
        Dispatcher {
            platform,
            enclosure: Some(enclosure),
            merge_policy: MergePolicy::default(),
        }
    }

    /// Dispatcher whose enclosure backend may be absent.
    pub fn with_optional_enclosure(platform: P, enclosure: Option<E>) -> Self {
        Dispatcher {
            platform,
            enclosure,
            merge_policy: MergePolicy::default(),
        }
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn enclosure(&self) -> Option<&E> {
        self.enclosure.as_ref()
    }

    /// Backend responsible for `indicator`, or a dispatch error if that
    /// backend is not attached.
    fn backend_for(&self, indicator: &Indicator) -> Result<&dyn IndicatorBackend> {
        match indicator.address() {
            Address::Platform(_) => Ok(&self.platform as &dyn IndicatorBackend),
            Address::Enclosure(_) => match &self.enclosure {
                Some(e) => Ok(e as &dyn IndicatorBackend),
                None => Err(IndicatorError::no_backend(
                    BackendKind::Enclosure,
                    indicator.code(),
                )),
            },
        }
    }

    /// Read the current state of one indicator from its backend.
    pub fn read_state(&self, kind: IndicatorKind, indicator: &Indicator) -> Result<LedState> {
        let backend = self.backend_for(indicator)?;
        let state = backend.read_indicator(kind, indicator)?;
        log::debug!(
            "read {kind} {} via {}: {state}",
            indicator.code(),
            indicator.backend()
        );
        Ok(state)
    }

    /// Set one indicator to `state` through its backend.
    pub fn write_state(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        state: LedState,
    ) -> Result<()> {
        let backend = self.backend_for(indicator)?;
        log::debug!(
            "write {kind} {} via {}: {state}",
            indicator.code(),
            indicator.backend()
        );
        backend.write_indicator(kind, indicator, state)?;
        Ok(())
    }

    /// Build the list of every indicator of `kind`.
    ///
    /// Platform indicators come first, in platform order, followed by the
    /// enclosure indicators. A platform failure aborts with no list. In
    /// Guiding Light mode fault indicators are platform-only and the
    /// enclosure backend is not consulted.
    pub fn build_list(&self, kind: IndicatorKind, mode: OperatingMode) -> Result<IndicatorList> {
        let mut list = self.platform.query_indicators(kind)?;

        if kind == IndicatorKind::Fault && !mode.includes_enclosure_faults() {
            return Ok(list);
        }

        let Some(enclosure) = &self.enclosure else {
            return Ok(list);
        };

        if let Err(e) = enclosure.append_indicators(kind, &mut list) {
            match self.merge_policy {
                MergePolicy::BestEffort => {
                    log::warn!("enclosure {kind} indicators unavailable, continuing without: {e}");
                }
                MergePolicy::Strict => return Err(e.into()),
            }
        }
        Ok(list)
    }
}
