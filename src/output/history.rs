use comfy_table::Color;

use crate::recorder::HistoryRecord;

use super::format::{create_styled_table, header_cell, styled_cell};

/// Most recent `limit` records, still oldest first
pub(crate) fn tail(records: &[HistoryRecord], limit: Option<usize>) -> &[HistoryRecord] {
    match limit {
        Some(n) if n < records.len() => &records[records.len() - n..],
        _ => records,
    }
}

pub(crate) fn output_history_json(records: &[HistoryRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn print_history_table(records: &[HistoryRecord], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Generated", use_color),
        header_cell("Prompt", use_color),
        header_cell("URL", use_color),
    ]);
    let url_color = use_color.then_some(Color::Blue);
    for record in records {
        table.add_row(vec![
            styled_cell(&record.timestamp, None),
            styled_cell(&record.prompt, None),
            styled_cell(&record.public_url, url_color),
        ]);
    }
    println!("{table}");
    println!("\n  {} image(s)\n", records.len());
}
