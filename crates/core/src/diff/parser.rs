//! Line-oriented unified diff parser.
//!
//! The parser walks the input once, tracking an optional open file and an
//! optional open hunk. It never fails: unparseable hunk headers are skipped,
//! and oversized input is cut at the configured limits with an in-band
//! [`TRUNCATION_MARKER`] line.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::truncate::truncate_utf8;
use crate::config::DiffLimits;
use crate::errors::DiffError;
use crate::models::{DiffHunk, DiffLine, FileDiff, FileStatus, DEV_NULL, TRUNCATION_MARKER};

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid hunk header regex")
});

/// Which limit cut a parse short.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// The input exceeded [`DiffLimits::max_bytes`].
    Bytes,
    /// The input exceeded [`DiffLimits::max_lines`].
    Lines,
}

/// Parse output together with the truncation flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiff {
    pub files: Vec<FileDiff>,
    pub truncation: Option<Truncation>,
}

/// Unified diff parser with configurable safety limits.
///
/// The parser holds no state between calls and is cheap to copy, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffParser {
    limits: DiffLimits,
}

impl From<DiffLimits> for DiffParser {
    fn from(limits: DiffLimits) -> Self {
        Self::with_limits(limits)
    }
}

impl DiffParser {
    /// A parser using the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DiffLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> DiffLimits {
        self.limits
    }

    /// Parse unified diff text into per-file records.
    pub fn parse(&self, text: &str) -> Vec<FileDiff> {
        self.parse_detailed(text).files
    }

    /// Like [`parse`](Self::parse), but also reports which limit (if any)
    /// truncated the input.
    pub fn parse_detailed(&self, text: &str) -> ParsedDiff {
        debug!(
            bytes = text.len(),
            max_bytes = self.limits.max_bytes,
            max_lines = self.limits.max_lines,
            "parsing diff"
        );

        let (text, cut) = truncate_utf8(text, self.limits.max_bytes);
        let mut truncation = None;
        if cut {
            warn!(
                max_bytes = self.limits.max_bytes,
                "diff exceeds byte limit, truncating"
            );
            truncation = Some(Truncation::Bytes);
        }

        let mut state = ParseState::new(self.limits.max_lines);
        for line in text.lines() {
            if !state.feed(line) {
                warn!(
                    max_lines = self.limits.max_lines,
                    "diff exceeds line limit, truncating"
                );
                truncation.get_or_insert(Truncation::Lines);
                break;
            }
        }

        if truncation.is_some() {
            state.mark_truncated();
        }
        let files = state.finish();

        debug!(files = files.len(), truncated = truncation.is_some(), "diff parsed");
        ParsedDiff { files, truncation }
    }

    /// Run [`parse`](Self::parse) on tokio's blocking pool.
    ///
    /// The result is identical to the synchronous call. There is no
    /// cancellation and no ordering between concurrent calls; callers that
    /// want only the latest result must discard stale ones themselves.
    pub async fn parse_async(&self, text: String) -> Result<Vec<FileDiff>, DiffError> {
        Ok(self.parse_detailed_async(text).await?.files)
    }

    /// Run [`parse_detailed`](Self::parse_detailed) on tokio's blocking pool.
    pub async fn parse_detailed_async(&self, text: String) -> Result<ParsedDiff, DiffError> {
        let parser = *self;
        tokio::task::spawn_blocking(move || parser.parse_detailed(&text))
            .await
            .map_err(|e| DiffError::TaskFailed(e.to_string()))
    }
}

/// Parse unified diff text with the default limits.
pub fn parse_diff(text: &str) -> Vec<FileDiff> {
    DiffParser::new().parse(text)
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct OpenFile {
    old_path: Option<String>,
    new_path: String,
    hunks: Vec<DiffHunk>,
    additions: usize,
    deletions: usize,
}

impl OpenFile {
    fn into_file_diff(self) -> FileDiff {
        let status = FileStatus::from_paths(self.old_path.as_deref(), &self.new_path);
        FileDiff {
            old_path: self.old_path,
            new_path: self.new_path,
            status,
            hunks: self.hunks,
            additions: self.additions,
            deletions: self.deletions,
        }
    }
}

#[derive(Debug)]
struct ParseState {
    files: Vec<FileDiff>,
    file: Option<OpenFile>,
    hunk: Option<DiffHunk>,
    old_line: usize,
    new_line: usize,
    body_lines: usize,
    max_body_lines: usize,
}

impl ParseState {
    fn new(max_body_lines: usize) -> Self {
        Self {
            files: Vec::new(),
            file: None,
            hunk: None,
            old_line: 0,
            new_line: 0,
            body_lines: 0,
            max_body_lines,
        }
    }

    /// Consume one input line. Returns `false`, without consuming the line,
    /// when it is a body line past the line cap.
    fn feed(&mut self, line: &str) -> bool {
        if line.starts_with("diff --git") {
            self.flush_file();
            return true;
        }

        if let Some(path) = line.strip_prefix("--- ") {
            let path = path.strip_prefix("a/").unwrap_or(path);
            let old_path = (path != DEV_NULL).then(|| path.to_string());
            self.file.get_or_insert_with(OpenFile::default).old_path = old_path;
            return true;
        }
        if let Some(path) = line.strip_prefix("+++ ") {
            let path = path.strip_prefix("b/").unwrap_or(path);
            self.file.get_or_insert_with(OpenFile::default).new_path = path.to_string();
            return true;
        }

        if line.starts_with("@@") {
            self.flush_hunk();
            match parse_hunk_header(line) {
                Some(hunk) => {
                    self.old_line = hunk.old_start;
                    self.new_line = hunk.new_start;
                    self.hunk = Some(hunk);
                }
                None => warn!(header = line, "skipping unparseable hunk header"),
            }
            return true;
        }

        let Some(hunk) = self.hunk.as_mut() else {
            return true;
        };

        if self.body_lines >= self.max_body_lines {
            return false;
        }
        self.body_lines += 1;

        // Counters saturate so absurd header starts cannot overflow.
        if let Some(content) = line.strip_prefix('+') {
            hunk.lines.push(DiffLine::addition(content, self.new_line));
            self.new_line = self.new_line.saturating_add(1);
            if let Some(file) = self.file.as_mut() {
                file.additions += 1;
            }
        } else if let Some(content) = line.strip_prefix('-') {
            hunk.lines.push(DiffLine::deletion(content, self.old_line));
            self.old_line = self.old_line.saturating_add(1);
            if let Some(file) = self.file.as_mut() {
                file.deletions += 1;
            }
        } else {
            let content = line.strip_prefix(' ').unwrap_or(line);
            hunk.lines.push(DiffLine::context(content, self.old_line, self.new_line));
            self.old_line = self.old_line.saturating_add(1);
            self.new_line = self.new_line.saturating_add(1);
        }
        true
    }

    /// Append the truncation marker to the open hunk, or to the open file's
    /// last hunk when no hunk is open.
    fn mark_truncated(&mut self) {
        let marker = DiffLine::context(TRUNCATION_MARKER, self.old_line, self.new_line);
        if let Some(hunk) = self.hunk.as_mut() {
            hunk.lines.push(marker);
        } else if let Some(hunk) = self.file.as_mut().and_then(|f| f.hunks.last_mut()) {
            hunk.lines.push(marker);
        } else {
            warn!("diff truncated before any hunk was opened, no marker line added");
        }
    }

    fn flush_hunk(&mut self) {
        let Some(hunk) = self.hunk.take() else {
            return;
        };
        if !hunk.counts_match() {
            debug!(header = %hunk.header, "hunk body does not match header counts");
        }
        match self.file.as_mut() {
            Some(file) => file.hunks.push(hunk),
            None => warn!(header = %hunk.header, "dropping hunk with no file header"),
        }
    }

    fn flush_file(&mut self) {
        self.flush_hunk();
        if let Some(file) = self.file.take() {
            self.files.push(file.into_file_diff());
        }
    }

    fn finish(mut self) -> Vec<FileDiff> {
        self.flush_file();
        self.files
    }
}

/// Parse a hunk header like `@@ -10,4 +10,15 @@ fn foo()`.
///
/// Counts default to 1 when the `,N` group is absent.
fn parse_hunk_header(line: &str) -> Option<DiffHunk> {
    let caps = HUNK_HEADER.captures(line)?;
    let number = |i: usize| -> Option<Option<usize>> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok().map(Some),
            None => Some(None),
        }
    };

    let old_start = number(1)??;
    let old_lines = number(2)?.unwrap_or(1);
    let new_start = number(3)??;
    let new_lines = number(4)?.unwrap_or(1);

    Some(DiffHunk {
        header: line.to_string(),
        old_start,
        old_lines,
        new_start,
        new_lines,
        lines: Vec::new(),
    })
}
