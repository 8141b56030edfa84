//! `mergelens conflicts`: list and resolve conflict regions in a file.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing::info;

use mergelens_core::conflict::{apply_resolutions, parse_conflicts, unresolved_count};
use mergelens_core::models::{ConflictChunk, Resolution};

use super::style;

/// List the conflict regions in a file.
pub fn run_list(path: &Path, json: bool) -> Result<()> {
    let content = read_file(path)?;
    let chunks = parse_conflicts(&content);

    if json {
        let out = serde_json::to_string_pretty(&chunks).context("failed to encode JSON")?;
        println!("{}", out);
        return Ok(());
    }

    if chunks.is_empty() {
        println!();
        println!("{}", style::success("No conflicts found"));
        println!();
        return Ok(());
    }

    println!();
    println!(
        "{}",
        style::header(&format!(
            "Conflicts in {} ({})",
            path.display(),
            chunks.len()
        ))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Lines", "Ours", "Theirs", "Base", "Labels"]);

    for (i, chunk) in chunks.iter().enumerate() {
        let base = chunk
            .base_lines
            .as_ref()
            .map(|b| b.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        let labels = format!(
            "{} / {}",
            chunk.ours_label.as_deref().unwrap_or("?"),
            chunk.theirs_label.as_deref().unwrap_or("?")
        );

        // Displayed line numbers are 1-based.
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{}-{}", chunk.start_line + 1, chunk.end_line + 1)),
            Cell::new(chunk.ours_lines.len()),
            Cell::new(chunk.theirs_lines.len()),
            Cell::new(base),
            Cell::new(labels),
        ]);
    }

    println!("{}", table);
    println!();

    Ok(())
}

/// Resolve the selected conflict regions of a file and write the result.
pub fn run_resolve(
    path: &Path,
    resolution: Resolution,
    selection: &[usize],
    output: Option<&Path>,
    allow_partial: bool,
) -> Result<()> {
    let content = read_file(path)?;
    let mut chunks = parse_conflicts(&content);

    if chunks.is_empty() {
        println!("{}", style::success("No conflicts found, nothing to do"));
        return Ok(());
    }

    let resolved = select_and_resolve(&mut chunks, &resolution, selection)?;
    let remaining = unresolved_count(&chunks);
    if remaining > 0 && !allow_partial {
        anyhow::bail!(
            "{} conflict(s) would remain unresolved; pass --allow-partial to write anyway",
            remaining
        );
    }

    let merged = merge_preserving_newline(&content, &chunks);
    let target = output.unwrap_or(path);
    std::fs::write(target, merged)
        .with_context(|| format!("failed to write {}", target.display()))?;

    info!(path = %target.display(), resolved, remaining, "wrote resolved file");
    println!(
        "{}",
        style::success(&format!(
            "Resolved {} conflict(s) with '{}' in {}",
            resolved,
            resolution,
            target.display()
        ))
    );
    if remaining > 0 {
        println!(
            "{}",
            style::warn(&format!("{} conflict(s) left unresolved", remaining))
        );
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Resolve the chunks named by 1-based `selection` (all when empty).
/// Returns how many chunks were resolved.
fn select_and_resolve(
    chunks: &mut [ConflictChunk],
    resolution: &Resolution,
    selection: &[usize],
) -> Result<usize> {
    let total = chunks.len();
    let indices: Vec<usize> = if selection.is_empty() {
        (0..total).collect()
    } else {
        let mut indices = Vec::with_capacity(selection.len());
        for &number in selection {
            if number == 0 || number > total {
                anyhow::bail!("chunk {} does not exist (file has {} conflicts)", number, total);
            }
            if !indices.contains(&(number - 1)) {
                indices.push(number - 1);
            }
        }
        indices
    };

    for &index in &indices {
        chunks[index]
            .resolve(resolution.clone())
            .with_context(|| format!("failed to resolve chunk {}", index + 1))?;
    }
    Ok(indices.len())
}

/// Apply resolutions, keeping the input's trailing newline when text changed.
fn merge_preserving_newline(content: &str, chunks: &[ConflictChunk]) -> String {
    let mut merged = apply_resolutions(content, chunks);
    if merged != content && content.ends_with('\n') && !merged.is_empty() {
        merged.push('\n');
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFLICTED: &str = "\
top
<<<<<<< HEAD
ours one
=======
theirs one
>>>>>>> feature
middle
<<<<<<< HEAD
ours two
=======
theirs two
>>>>>>> feature
bottom
";

    #[test]
    fn test_resolve_all_keeps_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        run_resolve(&path, Resolution::Theirs, &[], None, false).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "top\ntheirs one\nmiddle\ntheirs two\nbottom\n");
    }

    #[test]
    fn test_partial_selection_requires_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let out = dir.path().join("out.txt");
        std::fs::write(&path, CONFLICTED).unwrap();

        assert!(run_resolve(&path, Resolution::Ours, &[2], Some(&out), false).is_err());
        assert!(!out.exists());

        run_resolve(&path, Resolution::Ours, &[2], Some(&out), true).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("<<<<<<< HEAD\nours one"));
        assert!(written.ends_with("middle\nours two\nbottom\n"));
        // Input untouched when writing elsewhere.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONFLICTED);
    }

    #[test]
    fn test_selection_out_of_range() {
        let mut chunks = parse_conflicts(CONFLICTED);
        assert!(select_and_resolve(&mut chunks, &Resolution::Ours, &[3]).is_err());
        assert!(select_and_resolve(&mut chunks, &Resolution::Ours, &[0]).is_err());
    }

    #[test]
    fn test_duplicate_selection_resolves_once() {
        let mut chunks = parse_conflicts(CONFLICTED);
        let count = select_and_resolve(&mut chunks, &Resolution::Both, &[1, 1]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(chunks[0].resolution, Resolution::Both);
        assert_eq!(chunks[1].resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_merge_without_changes_is_identity() {
        let chunks = parse_conflicts(CONFLICTED);
        assert_eq!(merge_preserving_newline(CONFLICTED, &chunks), CONFLICTED);
    }
}
