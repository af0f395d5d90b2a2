//! Backend contract — the primitives the core consumes from the platform
//! (firmware) and enclosure-management access paths.

use std::fmt;

use crate::kind::{IndicatorKind, LedState};
use crate::list::{BackendKind, Indicator, IndicatorList};

// ── Error type ──

/// Failure reported by a backend primitive.
///
/// `Failed` carries the backend's own integer return code unchanged; the core
/// never reinterprets or retries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    Failed {
        backend: BackendKind,
        code: i32,
        context: String,
    },
    /// The backend has no indicator at this address.
    NotFound { backend: BackendKind, location: String },
    /// The backend's own storage could not be read or written.
    Io(String),
}

impl BackendError {
    pub fn failed(backend: BackendKind, code: i32, context: impl Into<String>) -> Self {
        BackendError::Failed {
            backend,
            code,
            context: context.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Failed {
                backend,
                code,
                context,
            } => write!(f, "{backend} backend failed (rc={code}): {context}"),
            BackendError::NotFound { backend, location } => {
                write!(f, "{backend} backend has no indicator at {location}")
            }
            BackendError::Io(e) => write!(f, "backend I/O error: {e}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub type Result<T> = std::result::Result<T, BackendError>;

// ── Traits ──

/// Per-record state access, implemented once per backend.
pub trait IndicatorBackend {
    fn read_indicator(&self, kind: IndicatorKind, indicator: &Indicator) -> Result<LedState>;
    fn write_indicator(
        &self,
        kind: IndicatorKind,
        indicator: &Indicator,
        state: LedState,
    ) -> Result<()>;
}

/// Firmware sensor/indicator access path.
pub trait PlatformBackend: IndicatorBackend {
    /// Return a new, caller-owned list of every platform indicator of `kind`.
    ///
    /// Ordering contract: for [`IndicatorKind::Fault`] the first record is the
    /// check-log indicator. An empty list is valid data.
    fn query_indicators(&self, kind: IndicatorKind) -> Result<IndicatorList>;
}

/// Enclosure-management access path.
pub trait EnclosureBackend: IndicatorBackend {
    /// Append every enclosure indicator of `kind` to `list`, in place.
    fn append_indicators(&self, kind: IndicatorKind, list: &mut IndicatorList) -> Result<()>;
}

/// Enclosure backend for systems without enclosure management.
///
/// Uninhabited: a dispatcher typed with it can never hold one, so every
/// enclosure-addressed record is a dispatch error.
#[derive(Debug)]
pub enum NoEnclosure {}

impl IndicatorBackend for NoEnclosure {
    fn read_indicator(&self, _kind: IndicatorKind, _indicator: &Indicator) -> Result<LedState> {
        match *self {}
    }

    fn write_indicator(
        &self,
        _kind: IndicatorKind,
        _indicator: &Indicator,
        _state: LedState,
    ) -> Result<()> {
        match *self {}
    }
}

impl EnclosureBackend for NoEnclosure {
    fn append_indicators(&self, _kind: IndicatorKind, _list: &mut IndicatorList) -> Result<()> {
        match *self {}
    }
}

// ── Test double ──

/// In-memory backend double for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    /// In-memory backend for tests. Serves as either the platform or the
    /// enclosure backend; records every call so tests can assert on the
    /// exact sequence of reads and writes.
    pub struct MockBackend {
        backend: BackendKind,
        /// Indicators handed out by query/append, per kind, in order.
        pub listing: RefCell<HashMap<IndicatorKind, Vec<Indicator>>>,
        /// Current state per (kind, location code).
        pub states: RefCell<HashMap<(IndicatorKind, String), LedState>>,
        /// Recorded reads: location codes.
        pub reads: RefCell<Vec<String>>,
        /// Recorded writes: (location code, state).
        pub writes: RefCell<Vec<(String, LedState)>>,
        /// Recorded query/append calls.
        pub queries: RefCell<Vec<IndicatorKind>>,
        /// Location codes whose reads fail.
        pub fail_read: RefCell<HashSet<String>>,
        /// Location codes whose writes fail.
        pub fail_write: RefCell<HashSet<String>>,
        /// If set, query/append returns this code as a failure.
        pub fail_query: Cell<Option<i32>>,
        /// Number of records handed out by query/append.
        pub issued: Cell<usize>,
        /// Lease attached to every record handed out; see
        /// [`MockBackend::outstanding`].
        lease: Rc<()>,
    }

    impl MockBackend {
        pub fn new(backend: BackendKind) -> Self {
            MockBackend {
                backend,
                listing: RefCell::new(HashMap::new()),
                states: RefCell::new(HashMap::new()),
                reads: RefCell::new(Vec::new()),
                writes: RefCell::new(Vec::new()),
                queries: RefCell::new(Vec::new()),
                fail_read: RefCell::new(HashSet::new()),
                fail_write: RefCell::new(HashSet::new()),
                fail_query: Cell::new(None),
                issued: Cell::new(0),
                lease: Rc::new(()),
            }
        }

        pub fn platform() -> Self {
            Self::new(BackendKind::Platform)
        }

        pub fn enclosure() -> Self {
            Self::new(BackendKind::Enclosure)
        }

        /// Register an indicator at `code` with an initial state.
        pub fn add_indicator(&self, kind: IndicatorKind, code: &str, state: LedState) {
            let mut listing = self.listing.borrow_mut();
            let entries = listing.entry(kind).or_default();
            let slot = entries.len() as u32;
            let indicator = match self.backend {
                BackendKind::Platform => Indicator::platform(code, kind, slot),
                BackendKind::Enclosure => Indicator::enclosure(code, kind, "/dev/sg-mock", slot),
            }
            .expect("mock location code must be non-empty");
            entries.push(indicator);
            self.states
                .borrow_mut()
                .insert((kind, code.to_string()), state);
        }

        pub fn state_of(&self, kind: IndicatorKind, code: &str) -> Option<LedState> {
            self.states
                .borrow()
                .get(&(kind, code.to_string()))
                .copied()
        }

        /// Records handed out by this backend that are still alive.
        pub fn outstanding(&self) -> usize {
            Rc::strong_count(&self.lease) - 1
        }

        pub fn write_count(&self) -> usize {
            self.writes.borrow().len()
        }

        fn listed(&self, kind: IndicatorKind) -> Result<Vec<Indicator>> {
            self.queries.borrow_mut().push(kind);
            if let Some(code) = self.fail_query.get() {
                return Err(BackendError::failed(
                    self.backend,
                    code,
                    "mock: query failure injected",
                ));
            }
            let records = self
                .listing
                .borrow()
                .get(&kind)
                .cloned()
                .unwrap_or_default();
            self.issued.set(self.issued.get() + records.len());
            Ok(records
                .into_iter()
                .map(|r| r.with_lease(Rc::clone(&self.lease)))
                .collect())
        }

        fn check_owned(&self, indicator: &Indicator) -> Result<()> {
            if indicator.backend() != self.backend {
                return Err(BackendError::NotFound {
                    backend: self.backend,
                    location: indicator.code().to_string(),
                });
            }
            Ok(())
        }
    }

    impl IndicatorBackend for MockBackend {
        fn read_indicator(&self, kind: IndicatorKind, indicator: &Indicator) -> Result<LedState> {
            self.check_owned(indicator)?;
            self.reads.borrow_mut().push(indicator.code().to_string());
            if self.fail_read.borrow().contains(indicator.code()) {
                return Err(BackendError::failed(
                    self.backend,
                    -3,
                    format!("mock: read failure injected at {}", indicator.code()),
                ));
            }
            self.state_of(kind, indicator.code())
                .ok_or_else(|| BackendError::NotFound {
                    backend: self.backend,
                    location: indicator.code().to_string(),
                })
        }

        fn write_indicator(
            &self,
            kind: IndicatorKind,
            indicator: &Indicator,
            state: LedState,
        ) -> Result<()> {
            self.check_owned(indicator)?;
            self.writes
                .borrow_mut()
                .push((indicator.code().to_string(), state));
            if self.fail_write.borrow().contains(indicator.code()) {
                return Err(BackendError::failed(
                    self.backend,
                    -4,
                    format!("mock: write failure injected at {}", indicator.code()),
                ));
            }
            self.states
                .borrow_mut()
                .insert((kind, indicator.code().to_string()), state);
            Ok(())
        }
    }

    impl PlatformBackend for MockBackend {
        fn query_indicators(&self, kind: IndicatorKind) -> Result<IndicatorList> {
            Ok(self.listed(kind)?.into_iter().collect())
        }
    }

    impl EnclosureBackend for MockBackend {
        fn append_indicators(&self, kind: IndicatorKind, list: &mut IndicatorList) -> Result<()> {
            for record in self.listed(kind)? {
                list.push(record);
            }
            Ok(())
        }
    }
}
