//! `mergelens diff`: parse a unified diff and summarize it.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use mergelens_core::config::DiffLimits;
use mergelens_core::diff::{DiffParser, ParsedDiff, Truncation};
use mergelens_core::models::FileStatus;

use super::style;

/// Read the diff from `path` (or stdin), parse it off the main task, and print
/// a summary table or JSON.
pub async fn run(path: Option<&Path>, limits: DiffLimits, json: bool) -> Result<()> {
    let text = read_input(path)?;
    let parser = DiffParser::with_limits(limits);
    let parsed = parser
        .parse_detailed_async(text)
        .await
        .context("failed to parse diff")?;

    if json {
        let out = serde_json::to_string_pretty(&parsed.files).context("failed to encode JSON")?;
        println!("{}", out);
    } else {
        print_summary(&parsed);
    }

    if let Some(truncation) = parsed.truncation {
        let reason = match truncation {
            Truncation::Bytes => format!("larger than {} bytes", limits.max_bytes),
            Truncation::Lines => format!("more than {} body lines", limits.max_lines),
        };
        eprintln!("{}", style::warn(&format!("diff truncated: input {}", reason)));
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read diff from stdin")?;
            Ok(text)
        }
    }
}

fn print_summary(parsed: &ParsedDiff) {
    if parsed.files.is_empty() {
        println!();
        println!("{}", style::dim("No file changes found"));
        println!();
        return;
    }

    println!();
    println!(
        "{}",
        style::header(&format!("Changed Files ({})", parsed.files.len()))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Status", "+", "-", "Hunks"]);

    for file in &parsed.files {
        let path = match (file.status, file.old_path.as_deref()) {
            (FileStatus::Renamed, Some(old)) => format!("{} → {}", old, file.new_path),
            _ => file.display_path().to_string(),
        };
        let status = match file.status {
            FileStatus::Added => Cell::new("added").fg(Color::Green),
            FileStatus::Deleted => Cell::new("deleted").fg(Color::Red),
            FileStatus::Renamed => Cell::new("renamed").fg(Color::Cyan),
            FileStatus::Modified => Cell::new("modified").fg(Color::Yellow),
        };

        table.add_row(vec![
            Cell::new(&path),
            status,
            Cell::new(file.additions).fg(Color::Green),
            Cell::new(file.deletions).fg(Color::Red),
            Cell::new(file.hunks.len()),
        ]);
    }

    println!("{}", table);

    let additions: usize = parsed.files.iter().map(|f| f.additions).sum();
    let deletions: usize = parsed.files.iter().map(|f| f.deletions).sum();
    println!(
        "  {} file(s) changed, {} {}",
        parsed.files.len(),
        style::additions(additions),
        style::deletions(deletions)
    );
    println!();
}
