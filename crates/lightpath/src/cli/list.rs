//! `list` subcommand — every indicator of a kind with its current state.

use super::{
    IndicatorJson, IndicatorKind, ListOutput, Options, Result, detect_mode, format_state, kv,
    kv_width, open_session, print_json,
};

pub(super) fn cmd_list(opts: &Options, kind: IndicatorKind) -> Result<()> {
    let session = open_session(opts)?;
    let mode = detect_mode(&session.system)?;
    let mut list = session.system.build_list(kind, mode)?;
    let summary = session.system.read_all_states(kind, &mut list);

    if opts.json {
        let output = ListOutput {
            kind,
            mode,
            indicators: list
                .iter()
                .map(|r| IndicatorJson {
                    code: r.code().to_string(),
                    backend: r.backend(),
                    state: format_state(r.state),
                })
                .collect(),
            summary,
        };
        return print_json(&output);
    }

    let w = kv_width(&["Kind:", "Mode:", "Indicators:"], &[]);
    kv("Kind:", kind, w);
    kv("Mode:", mode, w);
    kv("Indicators:", list.len(), w);
    if list.is_empty() {
        return Ok(());
    }
    println!();
    let code_w = list.iter().map(|r| r.code().len()).max().unwrap_or(0);
    for r in &list {
        println!(
            "  {:<code_w$}  {:<9}  {}",
            r.code(),
            r.backend().to_string(),
            format_state(r.state)
        );
    }
    if summary.read_failed > 0 {
        log::warn!("{} indicator state(s) could not be read", summary.read_failed);
    }
    Ok(())
}
