//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dispatch::MergePolicy;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# lightpath configuration — changes made outside the tool may be overwritten.\n\n";

/// Default inventory file name inside the config directory.
const INVENTORY_FILE: &str = "inventory.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inventory file for the file-backed backends. Empty = `inventory.json`
    /// in the config directory.
    #[serde(default)]
    pub inventory_path: String,

    /// Attach the enclosure backend. Disable on systems without enclosure
    /// management.
    #[serde(default = "default_true")]
    pub enclosure_enabled: bool,

    /// What to do when the enclosure indicators cannot be merged into a list.
    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// Fall back to ancestor location codes when no indicator exists at the
    /// exact location.
    #[serde(default = "default_true")]
    pub fallback_search: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inventory_path: String::new(),
            enclosure_enabled: true,
            merge_policy: MergePolicy::default(),
            fallback_search: true,
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `inventory_path` points at a directory.
    InventoryIsDirectory(String),
    /// `inventory_path` does not have a `.json` extension.
    InventoryNotJson(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InventoryIsDirectory(p) => {
                write!(f, "Invalid inventory_path: {p} is a directory")
            }
            ValidationError::InventoryNotJson(p) => {
                write!(f, "Invalid inventory_path: {p} is not a .json file")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightpath"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Effective inventory path: the configured one, or the default in the
    /// config directory.
    pub fn inventory_path(&self) -> Option<PathBuf> {
        let configured = self.inventory_path.trim();
        if configured.is_empty() {
            Self::dir().map(|d| d.join(INVENTORY_FILE))
        } else {
            Some(PathBuf::from(configured))
        }
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let configured = self.inventory_path.trim();
        if !configured.is_empty() {
            let p = Path::new(configured);
            if p.is_dir() {
                errors.push(ValidationError::InventoryIsDirectory(configured.into()));
            } else if !p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
            {
                errors.push(ValidationError::InventoryNotJson(configured.into()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert!(c.inventory_path.is_empty());
        assert!(c.enclosure_enabled);
        assert_eq!(c.merge_policy, MergePolicy::BestEffort);
        assert!(c.fallback_search);
    }

    #[test]
    fn serialize_roundtrip() {
        let c = Config {
            inventory_path: "/srv/inventory.json".into(),
            enclosure_enabled: false,
            merge_policy: MergePolicy::Strict,
            fallback_search: false,
        };
        let toml_str = toml::to_string_pretty(&c).unwrap();
        let c2: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(c2.inventory_path, "/srv/inventory.json");
        assert!(!c2.enclosure_enabled);
        assert_eq!(c2.merge_policy, MergePolicy::Strict);
        assert!(!c2.fallback_search);
    }

    #[test]
    fn merge_policy_is_kebab_case_in_toml() {
        let c: Config = toml::from_str("merge_policy = \"strict\"").unwrap();
        assert_eq!(c.merge_policy, MergePolicy::Strict);
        let c: Config = toml::from_str("merge_policy = \"best-effort\"").unwrap();
        assert_eq!(c.merge_policy, MergePolicy::BestEffort);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: Config = toml::from_str("enclosure_enabled = false").unwrap();
        assert!(!c.enclosure_enabled);
        assert!(c.fallback_search);
        assert_eq!(c.merge_policy, MergePolicy::BestEffort);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.enclosure_enabled);
        assert!(c.inventory_path.is_empty());
    }

    #[test]
    fn unknown_merge_policy_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("merge_policy = \"lenient\"");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_toml_is_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("fallback_search = \"not a bool\"");
        assert!(result.is_err());
    }

    #[test]
    fn config_path_is_some() {
        assert!(Config::dir().is_some());
        assert!(Config::path().is_some());
    }

    #[test]
    fn inventory_path_defaults_to_config_dir() {
        let c = Config::default();
        let p = c.inventory_path().unwrap();
        assert!(p.ends_with("lightpath/inventory.json"));
    }

    #[test]
    fn inventory_path_uses_configured_value() {
        let c = Config {
            inventory_path: " /tmp/inv.json ".into(),
            ..Config::default()
        };
        assert_eq!(c.inventory_path().unwrap(), PathBuf::from("/tmp/inv.json"));
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_directory_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config {
            inventory_path: dir.path().display().to_string(),
            ..Config::default()
        };
        let errs = c.validate().unwrap_err();
        assert!(matches!(errs[0], ValidationError::InventoryIsDirectory(_)));
    }

    #[test]
    fn validate_non_json_inventory() {
        let c = Config {
            inventory_path: "/tmp/inventory.yaml".into(),
            ..Config::default()
        };
        let errs = c.validate().unwrap_err();
        assert_eq!(
            errs,
            vec![ValidationError::InventoryNotJson("/tmp/inventory.yaml".into())]
        );
        assert_eq!(
            errs[0].to_string(),
            "Invalid inventory_path: /tmp/inventory.yaml is not a .json file"
        );
    }

    #[test]
    fn save_to_load_from_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let c = Config {
            merge_policy: MergePolicy::Strict,
            ..Config::default()
        };
        c.save_to(&path).unwrap();
        let (loaded, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(loaded.merge_policy, MergePolicy::Strict);
    }

    #[test]
    fn save_to_includes_header_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# lightpath configuration"));
    }

    #[test]
    fn save_to_cleans_up_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (c, warnings) = Config::load_from(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert!(c.enclosure_enabled);
    }

    #[test]
    fn load_from_invalid_toml_returns_defaults_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is { not valid toml").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("config parse error"));
        assert!(c.enclosure_enabled);
    }
}
