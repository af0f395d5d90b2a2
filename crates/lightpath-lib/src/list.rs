//! Indicator records and the owned indicator list.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::kind::{IndicatorKind, LedState};

// ── Addressing ──

/// Which backend owns an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Platform,
    Enclosure,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Platform => write!(f, "platform"),
            BackendKind::Enclosure => write!(f, "enclosure"),
        }
    }
}

/// Firmware indicator index, as handed out by the platform query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformAddress {
    pub index: u32,
}

/// Enclosure device and element slot of an enclosure-managed indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnclosureAddress {
    /// Enclosure device path, e.g. `/dev/sg4`.
    pub device: String,
    pub element: u32,
}

/// Backend-specific addressing payload. Only the dispatcher and the owning
/// backend look inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Address {
    Platform(PlatformAddress),
    Enclosure(EnclosureAddress),
}

impl Address {
    pub fn backend(&self) -> BackendKind {
        match self {
            Address::Platform(_) => BackendKind::Platform,
            Address::Enclosure(_) => BackendKind::Enclosure,
        }
    }
}

// ── Record ──

/// One addressable indicator.
///
/// `code`, `kind` and `address` are fixed at creation; only `state` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    code: String,
    kind: IndicatorKind,
    address: Address,
    /// Last read state. `None` means unknown (never read, or the read failed).
    pub state: Option<LedState>,
    /// Liveness token shared with the issuing backend, if it tracks
    /// outstanding records.
    #[serde(skip)]
    lease: Option<Rc<()>>,
}

impl Indicator {
    /// Create a record. Returns `None` for an empty location code.
    pub fn new(code: impl Into<String>, kind: IndicatorKind, address: Address) -> Option<Self> {
        let code = code.into();
        if code.is_empty() {
            return None;
        }
        Some(Indicator {
            code,
            kind,
            address,
            state: None,
            lease: None,
        })
    }

    /// Attach a liveness token. The issuing backend can count outstanding
    /// records with [`Rc::strong_count`].
    #[doc(hidden)]
    pub fn with_lease(mut self, lease: Rc<()>) -> Self {
        self.lease = Some(lease);
        self
    }

    pub fn platform(code: impl Into<String>, kind: IndicatorKind, index: u32) -> Option<Self> {
        Self::new(code, kind, Address::Platform(PlatformAddress { index }))
    }

    pub fn enclosure(
        code: impl Into<String>,
        kind: IndicatorKind,
        device: impl Into<String>,
        element: u32,
    ) -> Option<Self> {
        Self::new(
            code,
            kind,
            Address::Enclosure(EnclosureAddress {
                device: device.into(),
                element,
            }),
        )
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn backend(&self) -> BackendKind {
        self.address.backend()
    }
}

// ── List ──

/// Ordered, singly-owned sequence of indicators.
///
/// Construction hands ownership to the caller; dropping the list (or calling
/// [`IndicatorList::release`]) frees every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IndicatorList {
    records: Vec<Indicator>,
}

impl IndicatorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, indicator: Indicator) {
        self.records.push(indicator);
    }

    /// Move every record of `other` to the end of this list, keeping order.
    pub fn append(&mut self, other: IndicatorList) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Head of the list. Several conventions key off it (check-log
    /// indicator, enclosure-level identify indicator).
    pub fn first(&self) -> Option<&Indicator> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Indicator> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Indicator> {
        self.records.iter_mut()
    }

    /// First record whose location code equals `code` exactly.
    pub fn find_by_code(&self, code: &str) -> Option<&Indicator> {
        self.records.iter().find(|r| r.code == code)
    }

    pub fn find_by_code_mut(&mut self, code: &str) -> Option<&mut Indicator> {
        self.records.iter_mut().find(|r| r.code == code)
    }

    /// Consume the list and free every record. Returns how many were freed.
    pub fn release(self) -> usize {
        let count = self.records.len();
        log::debug!("releasing indicator list ({count} records)");
        count
    }
}

impl FromIterator<Indicator> for IndicatorList {
    fn from_iter<T: IntoIterator<Item = Indicator>>(iter: T) -> Self {
        IndicatorList {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for IndicatorList {
    type Item = Indicator;
    type IntoIter = std::vec::IntoIter<Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a IndicatorList {
    type Item = &'a Indicator;
    type IntoIter = std::slice::Iter<'a, Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
