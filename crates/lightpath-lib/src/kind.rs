//! Indicator type registry — kind ↔ description lookup and LED state values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Description returned for integer kinds that are not in the registry.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Service indicator kind.
///
/// The integer codes and description strings are fixed at the backend
/// boundary; [`IndicatorKind::code`] and [`IndicatorKind::description`] are
/// the single source of truth for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Identify,
    Fault,
    Attention,
}

impl IndicatorKind {
    /// All kinds, in registry order.
    pub const ALL: [IndicatorKind; 3] = [
        IndicatorKind::Identify,
        IndicatorKind::Fault,
        IndicatorKind::Attention,
    ];

    /// Human-readable description, e.g. `"identify"`.
    pub fn description(self) -> &'static str {
        match self {
            IndicatorKind::Identify => "identify",
            IndicatorKind::Fault => "fault",
            IndicatorKind::Attention => "attention",
        }
    }

    /// Integer code used at the backend boundary.
    pub fn code(self) -> i32 {
        match self {
            IndicatorKind::Identify => 1,
            IndicatorKind::Fault => 2,
            IndicatorKind::Attention => 3,
        }
    }

    /// Exact, case-sensitive match against the registry descriptions.
    ///
    /// Returns `None` for anything that is not a registered description.
    pub fn from_description(desc: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.description() == desc)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }
}

/// Description for a raw integer kind, `"Unknown"` if unregistered.
pub fn description_for_code(code: i32) -> &'static str {
    IndicatorKind::from_code(code)
        .map(IndicatorKind::description)
        .unwrap_or(UNKNOWN_DESCRIPTION)
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_description(s).ok_or_else(|| {
            format!("unknown indicator kind \"{s}\" (expected identify, fault or attention)")
        })
    }
}

// ── LED state ──

/// Physical state of an indicator as read from, or written to, a backend.
///
/// A record whose last read failed carries no `LedState` at all
/// (`Option<LedState>::None`), which is the "unknown" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedState {
    Off,
    On,
}

impl LedState {
    pub fn code(self) -> i32 {
        match self {
            LedState::Off => 0,
            LedState::On => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(LedState::Off),
            1 => Some(LedState::On),
            _ => None,
        }
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedState::Off => write!(f, "off"),
            LedState::On => write!(f, "on"),
        }
    }
}

impl FromStr for LedState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("on") || v == "1" => Ok(LedState::On),
            v if v.eq_ignore_ascii_case("off") || v == "0" => Ok(LedState::Off),
            other => Err(format!("invalid state \"{other}\" (expected on or off)")),
        }
    }
}

/// Render a tri-state record state for display.
pub fn format_state(state: Option<LedState>) -> &'static str {
    match state {
        Some(LedState::On) => "on",
        Some(LedState::Off) => "off",
        None => "unknown",
    }
}
