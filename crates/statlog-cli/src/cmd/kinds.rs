//! `statlog kinds` — list the history kinds a record can carry.

use crate::output::{OutputMode, pretty_section, render_mode};
use serde::Serialize;
use statlog_core::HistoryKind;

#[derive(Debug, Serialize)]
pub struct KindRow {
    pub kind: &'static str,
    pub description: &'static str,
}

/// Every valid kind, in table order.
pub fn kind_rows() -> Vec<KindRow> {
    HistoryKind::all_kinds()
        .into_iter()
        .map(|(kind, description)| KindRow {
            kind: kind.as_str(),
            description,
        })
        .collect()
}

/// Execute `statlog kinds`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_kinds(output: OutputMode) -> anyhow::Result<()> {
    let rows = kind_rows();
    render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(w, "{}  {}", row.kind, row.description)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, "History kinds")?;
            for row in rows {
                writeln!(w, "{:<16} {}", row.kind, row.description)?;
            }
            Ok(())
        },
    )
}
