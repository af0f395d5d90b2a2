//! Unified error type for the lightpath-lib crate.
//!
//! [`IndicatorError`] wraps [`BackendError`] and the core's own failure kinds
//! (dispatch, mode detection, check-log, config). `From` impls allow `?` to
//! propagate across module boundaries, and [`IndicatorError::code`] maps every
//! error to the integer code surfaced to callers.

use std::fmt;

use crate::backend::BackendError;
use crate::kind::IndicatorKind;
use crate::list::BackendKind;

/// Code for errors raised by the core itself (dispatch, mode detection).
pub const RC_GENERIC: i32 = -1;
/// Code for a backend that does not know the requested indicator.
pub const RC_NOT_FOUND: i32 = -2;
/// Code for file or storage errors.
pub const RC_IO: i32 = -5;
/// Code for configuration or inventory content errors.
pub const RC_INVALID: i32 = -22;

/// Unified error type for lightpath-lib operations.
#[derive(Debug)]
pub enum IndicatorError {
    /// A backend primitive failed.
    Backend(BackendError),
    /// No backend is attached for the record's address.
    Dispatch(String),
    /// The platform returned no fault indicators, so the operating mode
    /// cannot be inferred.
    ModeUndetermined,
    /// The platform returned no fault indicators, so there is no check-log
    /// indicator to drive.
    NoCheckLogIndicator,
    /// No indicator of this kind at a location (or any ancestor, when
    /// searching with fallback).
    NoIndicator {
        kind: IndicatorKind,
        location: String,
    },
    /// Standard I/O error (config or inventory persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Inventory file content error.
    Inventory(String),
}

impl IndicatorError {
    pub(crate) fn no_backend(backend: BackendKind, code: &str) -> Self {
        IndicatorError::Dispatch(format!("no {backend} backend attached for {code}"))
    }

    /// Integer code for this error. Backend return codes pass through
    /// verbatim; a failure reported as 0 becomes [`RC_GENERIC`].
    pub fn code(&self) -> i32 {
        match self {
            IndicatorError::Backend(BackendError::Failed { code, .. }) if *code != 0 => *code,
            IndicatorError::Backend(BackendError::Failed { .. }) => RC_GENERIC,
            IndicatorError::Backend(BackendError::NotFound { .. })
            | IndicatorError::NoIndicator { .. } => RC_NOT_FOUND,
            IndicatorError::Backend(BackendError::Io(_)) => RC_IO,
            IndicatorError::Dispatch(_)
            | IndicatorError::ModeUndetermined
            | IndicatorError::NoCheckLogIndicator => RC_GENERIC,
            IndicatorError::Io(_) => RC_IO,
            IndicatorError::Config(_) | IndicatorError::Inventory(_) => RC_INVALID,
        }
    }
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorError::Backend(e) => write!(f, "{e}"),
            IndicatorError::Dispatch(e) => write!(f, "Dispatch error: {e}"),
            IndicatorError::ModeUndetermined => write!(
                f,
                "Cannot determine operating mode: platform reported no fault indicators"
            ),
            IndicatorError::NoCheckLogIndicator => {
                write!(f, "No check-log indicator: platform reported no fault indicators")
            }
            IndicatorError::NoIndicator { kind, location } => {
                write!(f, "No {kind} indicator at {location}")
            }
            IndicatorError::Io(e) => write!(f, "I/O error: {e}"),
            IndicatorError::Config(e) => write!(f, "Config error: {e}"),
            IndicatorError::Inventory(e) => write!(f, "Inventory error: {e}"),
        }
    }
}

impl std::error::Error for IndicatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndicatorError::Backend(e) => Some(e),
            IndicatorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for IndicatorError {
    fn from(e: BackendError) -> Self {
        IndicatorError::Backend(e)
    }
}

impl From<std::io::Error> for IndicatorError {
    fn from(e: std::io::Error) -> Self {
        IndicatorError::Io(e)
    }
}

/// Crate-level Result alias using [`IndicatorError`].
pub type Result<T> = std::result::Result<T, IndicatorError>;
