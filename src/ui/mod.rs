//! Terminal rendering for resolution results.

use std::io::IsTerminal;

use comfy_table::{presets, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::models::{BibliographicRecord, SearchResult};
use crate::utils::truncate_with_ellipsis;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Current terminal width, with a fallback for pipes.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Render a record set as a table.
pub fn records_table(records: &[BibliographicRecord], host: &str, site_id: &str) -> String {
    let title_width = (terminal_width() / 3).max(20);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["No.", "タイトル", "著者", "出版社", "年", "URL"]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.ordinal),
            Cell::new(truncate_with_ellipsis(&record.title, title_width)),
            Cell::new(record.author.as_deref().unwrap_or("-")),
            Cell::new(record.publisher.as_deref().unwrap_or("-")),
            Cell::new(record.year.as_deref().unwrap_or("-")),
            Cell::new(record.browse_url(host, site_id)),
        ]);
    }

    table.to_string()
}

/// Render the full resolution outcome for a human reader.
pub fn render_result(result: &SearchResult, host: &str, site_id: &str, colored: bool) -> String {
    let mut out = String::new();

    if result.found {
        let method = result
            .method
            .map(|m| m.id())
            .unwrap_or("unknown");
        let total = result.total_count.unwrap_or(result.records.len());
        let headline = format!(
            "{} record(s) found via {} search (catalog total: {})",
            result.records.len(),
            method,
            total
        );
        if colored {
            out.push_str(&headline.green().bold().to_string());
        } else {
            out.push_str(&headline);
        }
        out.push('\n');
        out.push_str(&records_table(&result.records, host, site_id));
        out.push('\n');
    } else {
        let headline = "No matching records in the catalog";
        if colored {
            out.push_str(&headline.yellow().to_string());
        } else {
            out.push_str(headline);
        }
        out.push('\n');
    }

    if !result.attempts.is_empty() {
        out.push_str("\nAttempts:\n");
        for (i, attempt) in result.attempts.iter().enumerate() {
            let status = match (&attempt.succeeded, &attempt.error_message) {
                (true, _) => "hit".to_string(),
                (false, Some(err)) => format!("error: {}", err),
                (false, None) => "no records".to_string(),
            };
            out.push_str(&format!(
                "  {}. {} \"{}\" -> {}\n",
                i + 1,
                attempt.method,
                attempt.query,
                status
            ));
        }
    }

    out
}
