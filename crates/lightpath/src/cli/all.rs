//! `all` subcommand — drive every indicator of a kind.

use super::{
    AllOutput, IndicatorKind, LedState, Options, Result, detect_mode, kv, kv_width, open_session,
    print_json,
};

pub(super) fn cmd_all(opts: &Options, kind: IndicatorKind, state: LedState) -> Result<()> {
    let session = open_session(opts)?;
    let mode = detect_mode(&session.system)?;
    let list = session.system.build_list(kind, mode)?;
    let summary = session.system.write_all_states(kind, &list, state);
    session.save()?;

    if summary.write_failed > 0 {
        log::warn!(
            "{} of {} {kind} indicator write(s) failed",
            summary.write_failed,
            summary.written
        );
    }

    if opts.json {
        return print_json(&AllOutput {
            kind,
            state,
            mode,
            indicators: list.len(),
            summary,
        });
    }

    let w = kv_width(&["Indicators:", "Written:", "Unchanged:", "Failed:"], &[]);
    kv("Indicators:", list.len(), w);
    kv("Written:", summary.written, w);
    kv("Unchanged:", summary.skipped, w);
    kv("Failed:", summary.write_failed, w);
    Ok(())
}
