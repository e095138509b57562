use std::fmt::Write;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use crate::workflow::SessionOutcome;

/// Render the outcome as aligned `label  value` lines.
pub(crate) fn format_plain(outcome: &SessionOutcome) -> String {
    let mut out = String::new();
    let errors = if outcome.errors.is_empty() {
        "none".to_string()
    } else {
        outcome.errors.join("; ")
    };
    let summary = [
        ("key", outcome.key.clone()),
        ("mode", outcome.mode.to_string()),
        ("complete", if outcome.complete { "yes" } else { "no" }.to_string()),
        ("errors", errors),
    ];
    for (label, value) in summary {
        let _ = writeln!(out, "{}  {value}", pad(label, 8));
    }

    if outcome.components.is_empty() {
        return out;
    }

    let id_width = outcome
        .components
        .iter()
        .map(|component| component.id.width())
        .max()
        .unwrap_or(0);
    let _ = writeln!(out, "components:");
    for component in &outcome.components {
        let status = &component.status;
        let items = match status.total {
            Some(total) => format!("{} of {total}", status.items),
            None => status.items.to_string(),
        };
        let _ = writeln!(
            out,
            "  {}  {}  {items}",
            pad(&component.id, id_width),
            pad(status.kind, 5)
        );
    }
    out
}

/// Pad `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

pub(crate) fn print_plain(outcome: &SessionOutcome) {
    print!("{}", format_plain(outcome));
}

pub(crate) fn format_outcome_json(outcome: &SessionOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

pub(crate) fn print_json(outcome: &SessionOutcome) -> Result<()> {
    println!("{}", format_outcome_json(outcome)?);
    Ok(())
}
