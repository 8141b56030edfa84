//! Conflict marker parsing.
//!
//! Scans file content for `<<<<<<<` / `|||||||` / `=======` / `>>>>>>>`
//! regions left behind by a merge and turns each complete region into a
//! [`ConflictChunk`].

use tracing::{debug, warn};

use crate::models::{ConflictChunk, Resolution};

pub const OURS_MARKER: &str = "<<<<<<<";
pub const BASE_MARKER: &str = "|||||||";
pub const SEPARATOR_MARKER: &str = "=======";
pub const THEIRS_MARKER: &str = ">>>>>>>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Ours,
    Base,
    Theirs,
}

/// A chunk that has seen its opening marker but not its closing one.
#[derive(Debug)]
struct OpenChunk {
    start_line: usize,
    section: Section,
    ours_lines: Vec<String>,
    base_lines: Option<Vec<String>>,
    theirs_lines: Vec<String>,
    ours_label: Option<String>,
    base_label: Option<String>,
}

impl OpenChunk {
    fn new(start_line: usize, label: Option<String>) -> Self {
        Self {
            start_line,
            section: Section::Ours,
            ours_lines: Vec::new(),
            base_lines: None,
            theirs_lines: Vec::new(),
            ours_label: label,
            base_label: None,
        }
    }

    fn push(&mut self, line: &str) {
        let target = match self.section {
            Section::Ours => &mut self.ours_lines,
            Section::Base => self.base_lines.get_or_insert_with(Vec::new),
            Section::Theirs => &mut self.theirs_lines,
        };
        target.push(line.to_string());
    }

    fn close(self, end_line: usize, theirs_label: Option<String>) -> ConflictChunk {
        ConflictChunk {
            start_line: self.start_line,
            end_line,
            ours_lines: self.ours_lines,
            theirs_lines: self.theirs_lines,
            base_lines: self.base_lines,
            ours_label: self.ours_label,
            base_label: self.base_label,
            theirs_label,
            resolution: Resolution::Unresolved,
        }
    }
}

/// The trimmed text following a marker, if any.
fn marker_label(line: &str, marker: &str) -> Option<String> {
    let label = line[marker.len()..].trim();
    (!label.is_empty()).then(|| label.to_string())
}

/// Parse all complete conflict regions in `content`.
///
/// Line indices are 0-based positions in `content.lines()`. Chunks come out in
/// ascending, non-overlapping order. A region with no closing `>>>>>>>` is
/// dropped.
pub fn parse_conflicts(content: &str) -> Vec<ConflictChunk> {
    let mut chunks = Vec::new();
    let mut open: Option<OpenChunk> = None;

    for (index, line) in content.lines().enumerate() {
        if line.starts_with(OURS_MARKER) {
            if let Some(stale) = open.take() {
                warn!(
                    start_line = stale.start_line,
                    restart_line = index,
                    "conflict opened again before closing, dropping the first"
                );
            }
            open = Some(OpenChunk::new(index, marker_label(line, OURS_MARKER)));
            continue;
        }

        let Some(chunk) = open.as_mut() else {
            continue;
        };

        if line.starts_with(THEIRS_MARKER) {
            if let Some(chunk) = open.take() {
                chunks.push(chunk.close(index, marker_label(line, THEIRS_MARKER)));
            }
        } else if line.starts_with(BASE_MARKER) && chunk.section == Section::Ours {
            chunk.section = Section::Base;
            chunk.base_lines = Some(Vec::new());
            chunk.base_label = marker_label(line, BASE_MARKER);
        } else if line.starts_with(SEPARATOR_MARKER) && chunk.section != Section::Theirs {
            chunk.section = Section::Theirs;
        } else {
            chunk.push(line);
        }
    }

    if let Some(stale) = open {
        warn!(
            start_line = stale.start_line,
            "unterminated conflict block, dropping"
        );
    }

    debug!(count = chunks.len(), "parsed conflict chunks");
    chunks
}

/// Whether `content` contains any line that opens a conflict region.
pub fn has_conflict_markers(content: &str) -> bool {
    content.lines().any(|line| line.starts_with(OURS_MARKER))
}
