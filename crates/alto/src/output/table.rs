//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};

use crate::report::{ItemStatus, RunReport};

/// Format a run summary as an ASCII table, one row per item status.
pub fn format_summary_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Status", "Files", "Bytes"]);

    for status in ItemStatus::ALL {
        let count = report.count(status);
        if count == 0 {
            continue;
        }
        let bytes = match status {
            ItemStatus::Copied => format_bytes(report.bytes_written()),
            _ => String::new(),
        };
        table.add_row(vec![status.to_string(), count.to_string(), bytes]);
    }
    table.add_row(vec![
        "total".to_string(),
        report.items.len().to_string(),
        format_bytes(report.bytes_written()),
    ]);

    table
}

/// Format a byte count the way the copy log does: whole megabytes plus bytes.
pub fn format_bytes(bytes: u64) -> String {
    format!("{} MB ({} bytes)", bytes.div_euclid(1_000_000), bytes)
}
