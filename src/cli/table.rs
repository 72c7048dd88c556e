//! Tabular rendering shared by list and report output

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::escape_csv;
use crate::cli::OutputFormat;

/// Render rows under headers in the requested tabular format
///
/// Tsv gives padded terminal columns with bold headers; Csv is RFC 4180
/// escaped; Md is a markdown table. Json/Yaml are not tabular and are
/// handled by callers serializing the underlying records.
pub fn render(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Csv => render_csv(headers, rows),
        OutputFormat::Md => render_md(headers, rows),
        _ => render_tsv(headers, rows),
    }
}

fn render_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

fn render_md(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.clone());
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    format!("{}\n", table)
}

fn render_tsv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<width$}", style(h.to_uppercase()).bold(), width = w))
        .collect();
    out.push_str(&header_line.join("  "));
    out.push('\n');

    let total_width: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
