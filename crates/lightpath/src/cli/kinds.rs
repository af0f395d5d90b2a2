//! `kinds` subcommand — list the indicator kinds.

use super::{IndicatorKind, KindJson, KindsOutput, Result, print_json};

pub(super) fn cmd_kinds(json: bool) -> Result<()> {
    if json {
        let output = KindsOutput {
            kinds: IndicatorKind::ALL
                .into_iter()
                .map(|k| KindJson {
                    code: k.code(),
                    description: k.description(),
                })
                .collect(),
        };
        return print_json(&output);
    }

    for kind in IndicatorKind::ALL {
        println!("  {:>2}  {}", kind.code(), kind.description());
    }
    Ok(())
}
