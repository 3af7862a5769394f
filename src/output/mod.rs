mod format;
mod history;
mod summary;

pub(crate) use history::{output_history_json, print_history_table, tail};
pub(crate) use summary::{output_run_json, output_selection_json, print_selection};
