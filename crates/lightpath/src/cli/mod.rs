//! CLI subcommands — registry, mode detection, indicator lists and control.

mod all;
mod check_log;
mod config_cmd;
mod indicator;
mod kinds;
mod list;
mod mode;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Subcommand;
use serde::Serialize;

pub(super) use lightpath_lib::config::Config;
pub(super) use lightpath_lib::error::Result;
pub(super) use lightpath_lib::inventory::{InventoryStore, SimEnclosure, SimPlatform};
pub(super) use lightpath_lib::kind::format_state;
pub(super) use lightpath_lib::list::BackendKind;
pub(super) use lightpath_lib::sync::SyncSummary;
pub(super) use lightpath_lib::{
    Dispatcher, IndicatorError, IndicatorKind, IndicatorList, LedState, OperatingMode,
};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Pretty-print `value` as JSON on stdout.
pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| IndicatorError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct KindJson {
    pub code: i32,
    pub description: &'static str,
}

#[derive(Serialize)]
pub(super) struct KindsOutput {
    pub kinds: Vec<KindJson>,
}

#[derive(Serialize)]
pub(super) struct ModeOutput {
    pub mode: OperatingMode,
    pub code: i32,
}

#[derive(Serialize)]
pub(super) struct IndicatorJson {
    pub code: String,
    pub backend: BackendKind,
    pub state: &'static str,
}

#[derive(Serialize)]
pub(super) struct ListOutput {
    pub kind: IndicatorKind,
    pub mode: OperatingMode,
    pub indicators: Vec<IndicatorJson>,
    pub summary: SyncSummary,
}

#[derive(Serialize)]
pub(super) struct IndicatorStateOutput {
    pub kind: IndicatorKind,
    /// Location code as given on the command line.
    pub requested: String,
    /// Location code of the indicator actually used.
    pub location: String,
    pub backend: BackendKind,
    pub state: LedState,
}

#[derive(Serialize)]
pub(super) struct AllOutput {
    pub kind: IndicatorKind,
    pub state: LedState,
    pub mode: OperatingMode,
    pub indicators: usize,
    pub summary: SyncSummary,
}

#[derive(Serialize)]
pub(super) struct CheckLogOutput {
    pub state: LedState,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub files: ConfigFilesJson,
}

#[derive(Serialize)]
pub(super) struct ConfigFilesJson {
    pub inventory: Option<String>,
    pub inventory_exists: bool,
}

// ── Session ──

/// Global options shared by every subcommand.
pub struct Options {
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub inventory_path: Option<PathBuf>,
}

pub(super) type System = Dispatcher<SimPlatform, SimEnclosure>;

/// Loaded config, inventory and the dispatcher serving it.
pub(super) struct Session {
    pub config: Config,
    pub store: Rc<InventoryStore>,
    pub system: System,
}

impl Session {
    /// Persist indicator writes back to the inventory file.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}

/// Load config from `custom_path` or the default location, logging parse
/// warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Effective inventory path: `--inventory` wins over the config.
pub(super) fn inventory_path(opts: &Options, config: &Config) -> Option<PathBuf> {
    opts.inventory_path.clone().or_else(|| config.inventory_path())
}

pub(super) fn open_session(opts: &Options) -> Result<Session> {
    let config = load_config(opts.config_path.as_deref());
    if let Err(errors) = config.validate() {
        let msgs: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(IndicatorError::Config(msgs.join("; ")));
    }
    let path = inventory_path(opts, &config).ok_or_else(|| {
        IndicatorError::Config("no config directory, pass --inventory".into())
    })?;
    let store = InventoryStore::load(&path)?;
    let enclosure = config.enclosure_enabled.then(|| store.enclosure());
    if enclosure.is_none() {
        log::debug!("enclosure backend disabled by config");
    }
    let system = Dispatcher::with_optional_enclosure(store.platform(), enclosure)
        .with_merge_policy(config.merge_policy);
    Ok(Session {
        config,
        store,
        system,
    })
}

/// Detect the operating mode for list construction.
///
/// A platform without fault indicators has no mode, but its lists can still
/// be built, so that case degrades to [`OperatingMode::Undetermined`].
pub(super) fn detect_mode(system: &System) -> Result<OperatingMode> {
    match system.detect_operating_mode() {
        Ok(mode) => Ok(mode),
        Err(IndicatorError::ModeUndetermined) => {
            log::warn!("operating mode undetermined: platform reported no fault indicators");
            Ok(OperatingMode::Undetermined)
        }
        Err(e) => Err(e),
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the indicator kinds
    Kinds,

    /// Detect the operating mode (guiding light or light path)
    Mode,

    /// List every indicator of a kind with its current state
    List {
        /// Indicator kind: identify, fault or attention
        kind: IndicatorKind,
    },

    /// Read the state of the indicator at a location
    Get {
        /// Indicator kind: identify, fault or attention
        kind: IndicatorKind,
        /// Location code, e.g. U78C9.001.RST0027-P1-C3
        location: String,
    },

    /// Turn the indicator at a location on or off
    Set {
        /// Indicator kind: identify, fault or attention
        kind: IndicatorKind,
        /// Location code, e.g. U78C9.001.RST0027-P1-C3
        location: String,
        /// on or off
        state: LedState,
    },

    /// Turn every indicator of a kind on or off
    All {
        /// Indicator kind: identify, fault or attention
        kind: IndicatorKind,
        /// on or off
        state: LedState,
    },

    /// Turn the check-log indicator on or off
    CheckLog {
        /// on or off
        state: LedState,
    },

    /// Show current configuration and file paths
    Config,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, opts: &Options) -> Result<()> {
    match cmd {
        Command::Kinds => kinds::cmd_kinds(opts.json),
        Command::Mode => mode::cmd_mode(opts),
        Command::List { kind } => list::cmd_list(opts, kind),
        Command::Get { kind, location } => indicator::cmd_get(opts, kind, &location),
        Command::Set {
            kind,
            location,
            state,
        } => {
            if opts.json {
                warn_json_unsupported("set");
            }
            indicator::cmd_set(opts, kind, &location, state)
        }
        Command::All { kind, state } => all::cmd_all(opts, kind, state),
        Command::CheckLog { state } => check_log::cmd_check_log(opts, state),
        Command::Config => config_cmd::cmd_config(opts),
    }
}


#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Longer key:"], &[]);
        // "Longer key:" = 11 + PADDING = 13
        assert_eq!(w, 13);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["A:"], &["Very long indent key:"]);
        // "Very long indent key:" = 21 + PADDING + 2 = 25
        assert_eq!(w, 25);
    }

    #[test]
    fn values_align_across_levels() {
        let w = kv_width(&["Top:"], &["Indent:"]);
        let top = format_kv("Top:", "V", w);
        let indent = format!("  {:<width$}{}", "Indent:", "V", width = w - 2);
        assert_eq!(top.find('V'), indent.find('V'));
    }

    #[test]
    fn kv_width_empty_both() {
        assert_eq!(kv_width(&[], &[]), 0);
    }

    #[test]
    fn format_kv_exact_width() {
        // "ExactWidth:" is 11 chars, exceeds width, no padding added
        assert_eq!(format_kv("ExactWidth:", "val", 10), "ExactWidth:val");
    }
}
