//! Splices resolved conflict chunks back into file content.

use tracing::{debug, warn};

use super::resolver::{resolved_content, unresolved_count};
use crate::errors::ConflictError;
use crate::models::ConflictChunk;

/// Replace every resolved chunk's line range with its resolved content.
///
/// Chunks are applied from the highest `start_line` down so that each splice
/// only shifts lines that have already been processed. Unresolved chunks keep
/// their marker lines verbatim. When no chunk carries a decision the input is
/// returned unchanged; otherwise the result is the spliced lines joined by
/// `\n` (no trailing newline).
pub fn apply_resolutions(original: &str, chunks: &[ConflictChunk]) -> String {
    let mut resolved: Vec<&ConflictChunk> = chunks
        .iter()
        .filter(|c| c.resolution.is_resolved())
        .collect();
    if resolved.is_empty() {
        debug!("no resolved conflicts to apply");
        return original.to_string();
    }
    resolved.sort_by(|a, b| b.start_line.cmp(&a.start_line));

    let mut lines: Vec<String> = original.lines().map(str::to_string).collect();
    let mut applied = 0;
    for chunk in resolved {
        if chunk.start_line > chunk.end_line || chunk.end_line >= lines.len() {
            warn!(
                start_line = chunk.start_line,
                end_line = chunk.end_line,
                total_lines = lines.len(),
                "conflict range outside content, skipping"
            );
            continue;
        }
        let replacement: Vec<String> = resolved_content(chunk)
            .lines()
            .map(str::to_string)
            .collect();
        lines.splice(chunk.start_line..=chunk.end_line, replacement);
        applied += 1;
    }

    debug!(
        applied,
        unresolved = unresolved_count(chunks),
        "applied conflict resolutions"
    );
    lines.join("\n")
}

/// Like [`apply_resolutions`], but refuses to produce output while any chunk
/// is still unresolved.
pub fn try_apply_resolutions(
    original: &str,
    chunks: &[ConflictChunk],
) -> Result<String, ConflictError> {
    let count = unresolved_count(chunks);
    if count > 0 {
        return Err(ConflictError::Unresolved { count });
    }
    Ok(apply_resolutions(original, chunks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::parse_conflicts;
    use crate::models::Resolution;

    #[test]
    fn test_both_resolution() {
        let content = "<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\n";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Both).unwrap();
        assert_eq!(apply_resolutions(content, &chunks), "foo\nbar");
    }

    #[test]
    fn test_zero_chunks_is_identity() {
        let content = "line1\nline2\n\nline4\n";
        assert_eq!(apply_resolutions(content, &[]), content);
        let chunks = parse_conflicts(content);
        assert_eq!(apply_resolutions(content, &chunks), content);
    }

    #[test]
    fn test_all_unresolved_is_identity() {
        let content = "a\n<<<<<<< HEAD\nx\n=======\ny\n>>>>>>> b\nz\n";
        let chunks = parse_conflicts(content);
        assert_eq!(apply_resolutions(content, &chunks), content);
    }

    #[test]
    fn test_multiple_chunks_keep_indices_valid() {
        let content = "\
head
<<<<<<< HEAD
o1
o2
o3
=======
t1
>>>>>>> b
middle
<<<<<<< HEAD
p1
=======
q1
q2
>>>>>>> b
tail";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Theirs).unwrap();
        chunks[1].resolve(Resolution::Ours).unwrap();
        assert_eq!(
            apply_resolutions(content, &chunks),
            "head\nt1\nmiddle\np1\ntail"
        );
    }

    #[test]
    fn test_order_of_chunk_slice_does_not_matter() {
        let content = "<<<<<<<\na\n=======\nb\n>>>>>>>\nmid\n<<<<<<<\nc\n=======\nd\n>>>>>>>";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Ours).unwrap();
        chunks[1].resolve(Resolution::Theirs).unwrap();
        let forward = apply_resolutions(content, &chunks);
        chunks.reverse();
        assert_eq!(apply_resolutions(content, &chunks), forward);
        assert_eq!(forward, "a\nmid\nd");
    }

    #[test]
    fn test_partial_application_leaves_markers() {
        let content = "<<<<<<< HEAD\na\n=======\nb\n>>>>>>> x\n<<<<<<< HEAD\nc\n=======\nd\n>>>>>>> x";
        let mut chunks = parse_conflicts(content);
        chunks[1].resolve(Resolution::Theirs).unwrap();
        assert_eq!(
            apply_resolutions(content, &chunks),
            "<<<<<<< HEAD\na\n=======\nb\n>>>>>>> x\nd"
        );
        assert!(matches!(
            try_apply_resolutions(content, &chunks),
            Err(ConflictError::Unresolved { count: 1 })
        ));
    }

    #[test]
    fn test_custom_and_empty_replacements() {
        let content = "x\n<<<<<<<\na\n=======\nb\n>>>>>>>\ny\n<<<<<<<\nc\n=======\nd\n>>>>>>>\nz";
        let mut chunks = parse_conflicts(content);
        chunks[0]
            .resolve(Resolution::Custom("merged one\nmerged two".into()))
            .unwrap();
        chunks[1].resolve(Resolution::Custom(String::new())).unwrap();
        assert_eq!(
            apply_resolutions(content, &chunks),
            "x\nmerged one\nmerged two\ny\nz"
        );
    }

    #[test]
    fn test_diff3_ours_drops_base() {
        let content = "<<<<<<< ours\nmine\n||||||| base\norig\n=======\nyours\n>>>>>>> theirs\n";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Ours).unwrap();
        assert_eq!(apply_resolutions(content, &chunks), "mine");
    }

    #[test]
    fn test_out_of_range_chunk_is_skipped() {
        let content = "<<<<<<<\na\n=======\nb\n>>>>>>>";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Ours).unwrap();
        let mut bogus = chunks[0].clone();
        bogus.start_line = 40;
        bogus.end_line = 42;
        chunks.push(bogus);
        assert_eq!(apply_resolutions(content, &chunks), "a");
    }

    #[test]
    fn test_try_apply_when_fully_resolved() {
        let content = "<<<<<<<\na\n=======\nb\n>>>>>>>\n";
        let mut chunks = parse_conflicts(content);
        chunks[0].resolve(Resolution::Theirs).unwrap();
        assert_eq!(try_apply_resolutions(content, &chunks).unwrap(), "b");
    }
}
