//! Status colors for terminal listings.
//!
//! - **Added**: green
//! - **Modified**: yellow
//! - **Deleted**: red
//! - **Renamed**: blue
//! - **Untracked**: cyan
//! - **Conflict**: bold red

use crate::core::{git_status::FileStatusKind, state::FileStatus};
use colored::*;

pub fn status_color(status: FileStatusKind, text: &str) -> ColoredString {
    match status {
        FileStatusKind::Added => text.green(),
        FileStatusKind::Modified => text.yellow(),
        FileStatusKind::Deleted => text.red(),
        FileStatusKind::Renamed => text.blue(),
        FileStatusKind::Untracked => text.cyan(),
        FileStatusKind::Conflict => text.red().bold(),
    }
}

/// Status code padded to two columns
pub fn aligned_status(status: FileStatusKind) -> ColoredString {
    status_color(status, &format!("{:<2}", status.as_str()))
}

/// One numbered line of the status listing, e.g. `[3] M  src/lib.rs`
pub fn format_file_line(index: usize, file: &FileStatus) -> String {
    let path = match &file.old_path {
        Some(old) => format!("{} -> {}", old.display(), file.path.display()),
        None => file.path.display().to_string(),
    };
    format!(
        "{} {} {}",
        format!("[{index}]").cyan().bold(),
        aligned_status(file.status),
        status_color(file.status, &path)
    )
}
