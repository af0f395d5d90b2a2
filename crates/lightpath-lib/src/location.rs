//! Location code helpers — enclosure-level check, truncation, fallback search.
//!
//! Location codes are `-`-separated paths from the enclosure root down to a
//! component, e.g. `U78C9.001.RST0027-P1-D3`. When no indicator exists at a
//! device's exact location, the nearest ancestor's indicator is used instead.

use crate::list::{Indicator, IndicatorList};

/// Segment separator within a location code.
pub const SEPARATOR: char = '-';

/// True if `code` addresses the enclosure itself (no component suffix).
pub fn is_enclosure_level(code: &str) -> bool {
    !code.contains(SEPARATOR)
}

/// Drop the last segment of `code`.
///
/// Returns `None` when there is nothing left to drop (already at the
/// enclosure root); the caller keeps the original code in that case.
pub fn truncate_one_level(code: &str) -> Option<&str> {
    code.rfind(SEPARATOR).map(|pos| &code[..pos])
}

/// Iterator over `code` and each of its ancestors, nearest first.
pub fn ancestors(code: &str) -> Ancestors<'_> {
    Ancestors { next: Some(code) }
}

pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;
        self.next = truncate_one_level(current);
        Some(current)
    }
}

/// Find the indicator for `code`, falling back to the closest ancestor
/// location that has one.
pub fn find_with_fallback<'l>(list: &'l IndicatorList, code: &str) -> Option<&'l Indicator> {
    ancestors(code).find_map(|loc| {
        let hit = list.find_by_code(loc);
        if hit.is_some() && loc != code {
            log::debug!("no indicator at {code}, using ancestor {loc}");
        }
        hit
    })
}
