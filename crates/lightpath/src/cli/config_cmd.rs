//! `config` subcommand — show current configuration and file paths.

use super::{
    Config, ConfigFilesJson, ConfigOutput, Options, Result, inventory_path, kv, kv_indent,
    kv_width, load_config, print_json,
};

pub(super) fn cmd_config(opts: &Options) -> Result<()> {
    let custom_path = opts.config_path.as_deref();
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let inventory = inventory_path(opts, &config);
    let inventory_exists = inventory.as_ref().is_some_and(|p| p.exists());

    if opts.json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            files: ConfigFilesJson {
                inventory: inventory.as_ref().map(|p| p.display().to_string()),
                inventory_exists,
            },
        };
        return print_json(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "inventory_path:",
            "enclosure_enabled:",
            "merge_policy:",
            "fallback_search:",
            "Inventory:",
        ],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let inventory_setting = if config.inventory_path.trim().is_empty() {
        "(default)"
    } else {
        config.inventory_path.as_str()
    };
    kv_indent("inventory_path:", inventory_setting, w);
    kv_indent("enclosure_enabled:", config.enclosure_enabled, w);
    kv_indent("merge_policy:", config.merge_policy, w);
    kv_indent("fallback_search:", config.fallback_search, w);
    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("{e}");
        }
    }
    println!();

    println!("Files:");
    match &inventory {
        Some(p) => {
            let status = if inventory_exists {
                "present"
            } else {
                "not found"
            };
            kv_indent("Inventory:", format_args!("{} ({status})", p.display()), w);
        }
        None => kv_indent("Inventory:", "(no config directory)", w),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::options;
    use super::*;

    #[test]
    fn cmd_config_succeeds_without_config_file() {
        let (_dir, opts) = options(false);
        assert!(cmd_config(&opts).is_ok());
    }

    #[test]
    fn cmd_config_json_succeeds() {
        let (_dir, opts) = options(true);
        assert!(cmd_config(&opts).is_ok());
    }

    #[test]
    fn cmd_config_does_not_need_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let opts = Options {
            json: false,
            config_path: Some(dir.path().join("config.toml")),
            inventory_path: Some(dir.path().join("absent.json")),
        };
        assert!(cmd_config(&opts).is_ok());
    }
}
