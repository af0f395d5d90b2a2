//! `mode` subcommand — detect the operating mode.

use super::{ModeOutput, Options, Result, kv, kv_width, open_session, print_json};

pub(super) fn cmd_mode(opts: &Options) -> Result<()> {
    let session = open_session(opts)?;
    let mode = session.system.detect_operating_mode()?;

    if opts.json {
        return print_json(&ModeOutput {
            mode,
            code: mode.code(),
        });
    }

    let w = kv_width(&["Mode:", "Enclosure faults:"], &[]);
    kv("Mode:", mode, w);
    let enclosure_faults = if mode.includes_enclosure_faults() {
        "included"
    } else {
        "excluded"
    };
    kv("Enclosure faults:", enclosure_faults, w);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::options;
    use super::*;
    use crate::cli::IndicatorError;

    #[test]
    fn mode_succeeds() {
        let (_dir, opts) = options(false);
        assert!(cmd_mode(&opts).is_ok());
        let (_dir, opts) = options(true);
        assert!(cmd_mode(&opts).is_ok());
    }

    #[test]
    fn mode_without_fault_indicators_fails() {
        let (dir, opts) = options(false);
        std::fs::write(dir.path().join("inventory.json"), "{}").unwrap();
        assert!(matches!(
            cmd_mode(&opts),
            Err(IndicatorError::ModeUndetermined)
        ));
    }
}
