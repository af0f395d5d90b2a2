//! `get` / `set` subcommands — read or drive the indicator at one location.

use lightpath_lib::list::Indicator;
use lightpath_lib::location;

use super::{
    IndicatorError, IndicatorKind, IndicatorList, IndicatorStateOutput, LedState, Options, Result,
    Session, detect_mode, kv, kv_width, open_session, print_json,
};

/// Find the indicator serving `code`: an exact match, or with fallback search
/// enabled, the nearest ancestor location that has one.
fn resolve<'l>(
    session: &Session,
    list: &'l IndicatorList,
    kind: IndicatorKind,
    code: &str,
) -> Result<&'l Indicator> {
    let found = if session.config.fallback_search {
        location::find_with_fallback(list, code)
    } else {
        list.find_by_code(code)
    };
    found.ok_or_else(|| IndicatorError::NoIndicator {
        kind,
        location: code.to_string(),
    })
}

pub(super) fn cmd_get(opts: &Options, kind: IndicatorKind, code: &str) -> Result<()> {
    let session = open_session(opts)?;
    let mode = detect_mode(&session.system)?;
    let list = session.system.build_list(kind, mode)?;
    let record = resolve(&session, &list, kind, code)?;
    let state = session.system.read_state(kind, record)?;

    if opts.json {
        return print_json(&IndicatorStateOutput {
            kind,
            requested: code.to_string(),
            location: record.code().to_string(),
            backend: record.backend(),
            state,
        });
    }

    let w = kv_width(&["Location:", "Indicator:", "Backend:", "State:"], &[]);
    kv("Location:", code, w);
    if record.code() != code {
        kv("Indicator:", format_args!("{} (parent)", record.code()), w);
    } else {
        kv("Indicator:", record.code(), w);
    }
    kv("Backend:", record.backend(), w);
    kv("State:", state, w);
    Ok(())
}

pub(super) fn cmd_set(
    opts: &Options,
    kind: IndicatorKind,
    code: &str,
    state: LedState,
) -> Result<()> {
    let session = open_session(opts)?;
    let mode = detect_mode(&session.system)?;
    let list = session.system.build_list(kind, mode)?;
    let record = resolve(&session, &list, kind, code)?;
    session.system.write_state(kind, record, state)?;
    session.save()?;
    println!("{kind} indicator at {} set {state}", record.code());
    Ok(())
}
