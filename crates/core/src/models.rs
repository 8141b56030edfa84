//! Domain model types shared by the diff and conflict engines.
//!
//! Diff records ([`FileDiff`], [`DiffHunk`], [`DiffLine`]) are immutable
//! snapshots produced by a single parse. [`ConflictChunk`] values are produced
//! per conflicted-file load and only their `resolution` field is mutated
//! afterwards.

use serde::{Deserialize, Serialize};

/// Content of the synthetic line appended when a diff hits a size limit.
pub const TRUNCATION_MARKER: &str = "... [Diff truncated - file too large to display fully] ...";

/// Path git uses for the missing side of an added or deleted file.
pub const DEV_NULL: &str = "/dev/null";

// ---------------------------------------------------------------------------
// File status
// ---------------------------------------------------------------------------

/// How a file changed between the two sides of a diff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Deleted,
    Renamed,
    Modified,
}

impl FileStatus {
    /// Derive the status from the `---` and `+++` paths of a file diff.
    pub fn from_paths(old_path: Option<&str>, new_path: &str) -> Self {
        match old_path {
            None | Some(DEV_NULL) => Self::Added,
            Some(_) if new_path.is_empty() || new_path == DEV_NULL => Self::Deleted,
            Some(old) if old != new_path => Self::Renamed,
            Some(_) => Self::Modified,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Deleted => write!(f, "deleted"),
            Self::Renamed => write!(f, "renamed"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

// ---------------------------------------------------------------------------
// Diff lines and hunks
// ---------------------------------------------------------------------------

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Addition,
    Deletion,
    Context,
    HunkHeader,
}

impl LineType {
    /// The unified-diff prefix character for this line type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Deletion => "-",
            Self::Context => " ",
            Self::HunkHeader => "",
        }
    }
}

/// A single line in a diff hunk.
///
/// Additions carry only a new-side number, deletions only an old-side number,
/// context lines carry both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: LineType,
    pub content: String,
    pub old_line_number: Option<usize>,
    pub new_line_number: Option<usize>,
}

impl DiffLine {
    pub fn addition(content: impl Into<String>, new_line: usize) -> Self {
        Self {
            line_type: LineType::Addition,
            content: content.into(),
            old_line_number: None,
            new_line_number: Some(new_line),
        }
    }

    pub fn deletion(content: impl Into<String>, old_line: usize) -> Self {
        Self {
            line_type: LineType::Deletion,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: None,
        }
    }

    pub fn context(content: impl Into<String>, old_line: usize, new_line: usize) -> Self {
        Self {
            line_type: LineType::Context,
            content: content.into(),
            old_line_number: Some(old_line),
            new_line_number: Some(new_line),
        }
    }

    /// Whether this is the synthetic line appended to a truncated diff.
    pub fn is_truncation_marker(&self) -> bool {
        self.line_type == LineType::Context && self.content == TRUNCATION_MARKER
    }
}

/// A diff hunk with its header and body lines.
///
/// The four range fields are taken from the header as written and are not
/// checked against the body; see [`DiffHunk::counts_match`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffHunk {
    /// The original `@@ ... @@` header text.
    pub header: String,
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Format this hunk as unified diff text.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.header);
        text.push('\n');
        for line in &self.lines {
            text.push_str(line.line_type.prefix());
            text.push_str(&line.content);
            text.push('\n');
        }
        text
    }

    /// Whether the body agrees with the line counts declared in the header.
    pub fn counts_match(&self) -> bool {
        let mut old_seen = 0;
        let mut new_seen = 0;
        for line in self.lines.iter().filter(|l| !l.is_truncation_marker()) {
            match line.line_type {
                LineType::Addition => new_seen += 1,
                LineType::Deletion => old_seen += 1,
                LineType::Context => {
                    old_seen += 1;
                    new_seen += 1;
                }
                LineType::HunkHeader => {}
            }
        }
        old_seen == self.old_lines && new_seen == self.new_lines
    }
}

/// A file with its diff hunks and change totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDiff {
    /// Path on the old side, `None` for files that did not exist before.
    pub old_path: Option<String>,
    pub new_path: String,
    pub status: FileStatus,
    pub hunks: Vec<DiffHunk>,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiff {
    /// The most meaningful path to show for this file.
    pub fn display_path(&self) -> &str {
        match (self.status, self.old_path.as_deref()) {
            (FileStatus::Deleted, Some(old)) => old,
            _ => &self.new_path,
        }
    }

    /// Total number of body lines across all hunks.
    pub fn line_count(&self) -> usize {
        self.hunks.iter().map(|h| h.lines.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// A decision for a single conflict chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Unresolved,
    Ours,
    Theirs,
    /// Ours followed by theirs.
    Both,
    /// Hand-edited replacement text.
    Custom(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
            Self::Both => write!(f, "both"),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}

/// One conflict region of a file, bounded by `<<<<<<<` and `>>>>>>>` markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictChunk {
    /// Index (0-based) of the `<<<<<<<` line.
    pub start_line: usize,
    /// Index (0-based) of the `>>>>>>>` line, inclusive.
    pub end_line: usize,
    pub ours_lines: Vec<String>,
    pub theirs_lines: Vec<String>,
    /// Common-ancestor lines; only present for diff3-style markers.
    pub base_lines: Option<Vec<String>>,
    /// Text after the `<<<<<<<` marker (usually a ref name).
    pub ours_label: Option<String>,
    /// Text after the `|||||||` marker.
    pub base_label: Option<String>,
    /// Text after the `>>>>>>>` marker.
    pub theirs_label: Option<String>,
    pub resolution: Resolution,
}

impl ConflictChunk {
    /// Number of lines the chunk spans in the original file, markers included.
    pub fn span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn is_diff3(&self) -> bool {
        self.base_lines.is_some()
    }
}
