//! Shared styling utilities for CLI output.

use console::Style;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// `+N` in green.
pub fn additions(count: usize) -> String {
    Style::new().green().apply_to(format!("+{count}")).to_string()
}

/// `-N` in red.
pub fn deletions(count: usize) -> String {
    Style::new().red().apply_to(format!("-{count}")).to_string()
}
