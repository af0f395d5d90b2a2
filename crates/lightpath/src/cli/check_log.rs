//! `check-log` subcommand — drive the check-log indicator.

use super::{CheckLogOutput, LedState, Options, Result, open_session, print_json};

pub(super) fn cmd_check_log(opts: &Options, state: LedState) -> Result<()> {
    let session = open_session(opts)?;
    session.system.set_check_log(state)?;
    session.save()?;

    if opts.json {
        return print_json(&CheckLogOutput { state });
    }
    println!("check-log indicator set {state}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{options, reload};
    use super::*;
    use crate::cli::IndicatorError;

    #[test]
    fn check_log_on_writes_first_fault_indicator() {
        let (_dir, opts) = options(false);
        cmd_check_log(&opts, LedState::On).unwrap();
        let inv = reload(&opts);
        assert_eq!(inv.platform[0].state, LedState::On);
        assert_eq!(inv.platform[1].state, LedState::Off);
    }

    #[test]
    fn check_log_without_fault_indicators_fails() {
        let (dir, opts) = options(false);
        std::fs::write(dir.path().join("inventory.json"), "{}").unwrap();
        assert!(matches!(
            cmd_check_log(&opts, LedState::On),
            Err(IndicatorError::NoCheckLogIndicator)
        ));
    }
}
