//! Conflict marker parsing, resolution, and application.
//!
//! The conflict subsystem is responsible for:
//! 1. **Parsing** -- finding `<<<<<<<` / `=======` / `>>>>>>>` regions in file content.
//! 2. **Resolution** -- recording a per-chunk decision (ours, theirs, both, custom).
//! 3. **Application** -- splicing decided chunks back into the original text.

pub mod applier;
pub mod parser;
pub mod resolver;

pub use applier::{apply_resolutions, try_apply_resolutions};
pub use parser::{has_conflict_markers, parse_conflicts};
pub use resolver::{is_fully_resolved, resolve_all, resolved_content, unresolved_count};
