//! File-backed inventory — platform and enclosure backends served from a
//! JSON description of the machine's indicators.
//!
//! Used where the firmware and enclosure primitives are not reachable (test
//! rigs, offline inspection). Writes update the in-memory copy; call
//! [`InventoryStore::save`] to persist them.
//!
//! ```json
//! {
//!   "platform": [
//!     { "code": "U78C9.001.RST0027", "kind": "fault", "index": 0, "state": "off" }
//!   ],
//!   "enclosure": [
//!     { "code": "U78C9.001.RST0027-P1-D1", "kind": "identify",
//!       "device": "/dev/sg4", "element": 2, "state": "on", "fail_code": -5 }
//!   ]
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::backend::{
    self, BackendError, EnclosureBackend, IndicatorBackend, PlatformBackend,
};
use crate::error::{IndicatorError, Result};
use crate::kind::{IndicatorKind, LedState};
use crate::list::{Address, BackendKind, Indicator, IndicatorList};

/// A platform (firmware) indicator entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub code: String,
    pub kind: IndicatorKind,
    pub index: u32,
    pub state: LedState,
    /// If set, every access to this indicator fails with this return code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_code: Option<i32>,
}

/// An enclosure-managed indicator entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureEntry {
    pub code: String,
    pub kind: IndicatorKind,
    pub device: String,
    pub element: u32,
    pub state: LedState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_code: Option<i32>,
}

/// On-disk inventory document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Platform indicators in firmware order. The first fault entry is the
    /// check-log indicator.
    #[serde(default)]
    pub platform: Vec<PlatformEntry>,
    #[serde(default)]
    pub enclosure: Vec<EnclosureEntry>,
}

impl Inventory {
    /// Parse and check an inventory document.
    pub fn parse(json: &str) -> Result<Self> {
        let inv: Inventory = serde_json::from_str(json)
            .map_err(|e| IndicatorError::Inventory(format!("invalid inventory JSON: {e}")))?;
        inv.check()?;
        Ok(inv)
    }

    /// Reject empty location codes, zero failure codes and duplicate
    /// addresses.
    fn check(&self) -> Result<()> {
        let mut seen_platform = HashSet::new();
        for e in &self.platform {
            check_fail_code(&e.code, e.fail_code)?;
            if e.code.is_empty() {
                return Err(IndicatorError::Inventory(format!(
                    "platform {} index {} has an empty location code",
                    e.kind, e.index
                )));
            }
            if !seen_platform.insert((e.kind, e.index)) {
                return Err(IndicatorError::Inventory(format!(
                    "duplicate platform {} index {}",
                    e.kind, e.index
                )));
            }
        }
        let mut seen_enclosure = HashSet::new();
        for e in &self.enclosure {
            check_fail_code(&e.code, e.fail_code)?;
            if e.code.is_empty() {
                return Err(IndicatorError::Inventory(format!(
                    "enclosure {} {} element {} has an empty location code",
                    e.kind, e.device, e.element
                )));
            }
            if !seen_enclosure.insert((e.kind, e.device.as_str(), e.element)) {
                return Err(IndicatorError::Inventory(format!(
                    "duplicate enclosure {} {} element {}",
                    e.kind, e.device, e.element
                )));
            }
        }
        Ok(())
    }
}

/// A failure code of 0 would read as success.
fn check_fail_code(code: &str, fail_code: Option<i32>) -> Result<()> {
    if fail_code == Some(0) {
        return Err(IndicatorError::Inventory(format!(
            "{code}: fail_code must be non-zero"
        )));
    }
    Ok(())
}

/// Shared, mutable inventory behind the simulated backends.
#[derive(Debug)]
pub struct InventoryStore {
    path: Option<PathBuf>,
    data: RefCell<Inventory>,
    dirty: Cell<bool>,
}

impl InventoryStore {
    /// In-memory store with no backing file.
    pub fn from_inventory(inventory: Inventory) -> Rc<Self> {
        Rc::new(InventoryStore {
            path: None,
            data: RefCell::new(inventory),
            dirty: Cell::new(false),
        })
    }

    /// Load the inventory at `path`.
    pub fn load(path: &Path) -> Result<Rc<Self>> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            IndicatorError::Inventory(format!("cannot read {}: {e}", path.display()))
        })?;
        let inventory = Inventory::parse(&contents)?;
        log::debug!(
            "loaded inventory {} ({} platform, {} enclosure)",
            path.display(),
            inventory.platform.len(),
            inventory.enclosure.len()
        );
        Ok(Rc::new(InventoryStore {
            path: Some(path.to_path_buf()),
            data: RefCell::new(inventory),
            dirty: Cell::new(false),
        }))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether any write changed the inventory since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Copy of the current inventory contents.
    pub fn snapshot(&self) -> Inventory {
        self.data.borrow().clone()
    }

    /// Persist pending writes atomically. No-op if nothing changed or the
    /// store has no backing file.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty.get() {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&*self.data.borrow())
            .map_err(|e| IndicatorError::Inventory(format!("serializing inventory: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        if std::fs::rename(&tmp, path).is_err() {
            // Rename can fail across filesystems; fall back to direct write + cleanup
            let result = std::fs::write(path, &json);
            let _ = std::fs::remove_file(&tmp);
            result?;
        }
        self.dirty.set(false);
        Ok(())
    }

    pub fn platform(self: &Rc<Self>) -> SimPlatform {
        SimPlatform(Rc::clone(self))
    }

    pub fn enclosure(self: &Rc<Self>) -> SimEnclosure {
        SimEnclosure(Rc::clone(self))
    }

    fn not_found(backend: BackendKind, indicator: &Indicator) -> BackendError {
        BackendError::NotFound {
            backend,
            location: indicator.code().to_string(),
        }
    }

    /// Apply `f` to the entry behind `indicator`, honouring `fail_code`.
    fn with_entry<T>(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        f: impl FnOnce(&mut LedState) -> T,
    ) -> backend::Result<T> {
        let mut data = self.data.borrow_mut();
        let (state, fail_code) = match indicator.address() {
            Address::Platform(addr) => {
                let entry = data
                    .platform
                    .iter_mut()
                    .find(|e| e.kind == kind && e.index == addr.index && e.code == indicator.code())
                    .ok_or_else(|| Self::not_found(BackendKind::Platform, indicator))?;
                (&mut entry.state, entry.fail_code)
            }
            Address::Enclosure(addr) => {
                let entry = data
                    .enclosure
                    .iter_mut()
                    .find(|e| {
                        e.kind == kind
                            && e.device == addr.device
                            && e.element == addr.element
                            && e.code == indicator.code()
                    })
                    .ok_or_else(|| Self::not_found(BackendKind::Enclosure, indicator))?;
                (&mut entry.state, entry.fail_code)
            }
        };
        if let Some(code) = fail_code {
            return Err(BackendError::failed(
                indicator.backend(),
                code,
                format!("{kind} indicator at {} is marked faulty", indicator.code()),
            ));
        }
        Ok(f(state))
    }

    fn read(&self, kind: IndicatorKind, indicator: &Indicator) -> backend::Result<LedState> {
        self.with_entry(kind, indicator, |state| *state)
    }

    fn write(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        new_state: LedState,
    ) -> backend::Result<()> {
        let changed = self.with_entry(kind, indicator, |state| {
            let changed = *state != new_state;
            *state = new_state;
            changed
        })?;
        if changed {
            self.dirty.set(true);
        }
        Ok(())
    }
}

fn empty_code(backend: BackendKind) -> BackendError {
    BackendError::Io(format!("{backend} inventory entry has an empty location code"))
}

/// Platform backend served from an [`InventoryStore`].
#[derive(Debug, Clone)]
pub struct SimPlatform(Rc<InventoryStore>);

impl IndicatorBackend for SimPlatform {
    fn read_indicator(&self, kind: IndicatorKind, indicator: &Indicator) -> backend::Result<LedState> {
        self.0.read(kind, indicator)
    }

    fn write_indicator(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        state: LedState,
    ) -> backend::Result<()> {
        self.0.write(kind, indicator, state)
    }
}

impl PlatformBackend for SimPlatform {
    fn query_indicators(&self, kind: IndicatorKind) -> backend::Result<IndicatorList> {
        self.0
            .data
            .borrow()
            .platform
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| {
                Indicator::platform(e.code.as_str(), kind, e.index)
                    .ok_or_else(|| empty_code(BackendKind::Platform))
            })
            .collect()
    }
}

/// Enclosure backend served from an [`InventoryStore`].
#[derive(Debug, Clone)]
pub struct SimEnclosure(Rc<InventoryStore>);

impl IndicatorBackend for SimEnclosure {
    fn read_indicator(&self, kind: IndicatorKind, indicator: &Indicator) -> backend::Result<LedState> {
        self.0.read(kind, indicator)
    }

    fn write_indicator(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        state: LedState,
    ) -> backend::Result<()> {
        self.0.write(kind, indicator, state)
    }
}

impl EnclosureBackend for SimEnclosure {
    fn append_indicators(&self, kind: IndicatorKind, list: &mut IndicatorList) -> backend::Result<()> {
        let data = self.0.data.borrow();
        for e in data.enclosure.iter().filter(|e| e.kind == kind) {
            let record = Indicator::enclosure(e.code.as_str(), kind, e.device.as_str(), e.element)
                .ok_or_else(|| empty_code(BackendKind::Enclosure))?;
            list.push(record);
        }
        Ok(())
    }
}
