//! Conflict resolution decisions.
//!
//! A chunk moves from [`Resolution::Unresolved`] to one of the resolved states
//! on a decision, and back to `Unresolved` on an explicit undo. Resolved to
//! resolved is not a valid transition; callers undo first.

use tracing::{debug, info};

use crate::errors::ConflictError;
use crate::models::{ConflictChunk, Resolution};

impl ConflictChunk {
    /// Record a decision for an unresolved chunk.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<(), ConflictError> {
        if !resolution.is_resolved() {
            return Err(ConflictError::InvalidResolution(
                "cannot resolve a conflict to 'unresolved'; use unresolve".into(),
            ));
        }
        if self.resolution.is_resolved() {
            return Err(ConflictError::AlreadyResolved {
                start_line: self.start_line,
            });
        }

        info!(start_line = self.start_line, %resolution, "resolving conflict");
        self.resolution = resolution;
        Ok(())
    }

    /// Undo a previous decision.
    pub fn unresolve(&mut self) -> Result<(), ConflictError> {
        if !self.resolution.is_resolved() {
            return Err(ConflictError::NotResolved {
                start_line: self.start_line,
            });
        }

        info!(start_line = self.start_line, previous = %self.resolution, "undoing conflict resolution");
        self.resolution = Resolution::Unresolved;
        Ok(())
    }

    /// The replacement text for this chunk under its current resolution.
    pub fn resolved_content(&self) -> String {
        resolved_content(self)
    }
}

/// Get the text that replaces a chunk under its current resolution.
///
/// `Both` places ours strictly before theirs. `Unresolved` yields an empty
/// string and should not be applied.
pub fn resolved_content(chunk: &ConflictChunk) -> String {
    match &chunk.resolution {
        Resolution::Ours => chunk.ours_lines.join("\n"),
        Resolution::Theirs => chunk.theirs_lines.join("\n"),
        Resolution::Both => format!(
            "{}\n{}",
            chunk.ours_lines.join("\n"),
            chunk.theirs_lines.join("\n")
        ),
        Resolution::Custom(text) => text.clone(),
        Resolution::Unresolved => String::new(),
    }
}

/// Number of chunks still awaiting a decision.
pub fn unresolved_count(chunks: &[ConflictChunk]) -> usize {
    chunks.iter().filter(|c| !c.resolution.is_resolved()).count()
}

pub fn is_fully_resolved(chunks: &[ConflictChunk]) -> bool {
    unresolved_count(chunks) == 0
}

/// Apply one decision to every chunk that is still unresolved.
///
/// Chunks that already carry a decision keep it. Returns how many chunks were
/// changed.
pub fn resolve_all(
    chunks: &mut [ConflictChunk],
    resolution: &Resolution,
) -> Result<usize, ConflictError> {
    let mut changed = 0;
    for chunk in chunks.iter_mut().filter(|c| !c.resolution.is_resolved()) {
        chunk.resolve(resolution.clone())?;
        changed += 1;
    }
    debug!(changed, %resolution, "bulk resolution applied");
    Ok(changed)
}
