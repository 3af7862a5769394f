use serde_json::json;

use crate::generator::RunOutcome;
use crate::prompt::Selection;

pub(crate) fn output_selection_json(selection: &Selection<'_>) -> String {
    serde_json::to_string_pretty(selection).unwrap_or_else(|_| "{}".to_string())
}

pub(crate) fn print_selection(selection: &Selection<'_>) {
    println!("Day {} -> prompt #{}", selection.day, selection.index);
    println!("{}", selection.prompt);
}

/// Machine-readable result of `run --json`
pub(crate) fn output_run_json(
    selection: &Selection<'_>,
    seed: u64,
    outcome: &RunOutcome,
) -> String {
    let status = if outcome.succeeded() { "success" } else { "error" };
    let value = json!({
        "status": status,
        "day": selection.day,
        "prompt": selection.prompt,
        "seed": seed,
        "outcome": outcome,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}
