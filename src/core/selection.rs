//! Numbered file selection.
//!
//! Commands that act on files accept either plain paths or index expressions referring
//! to the numbered `status` listing:
//!
//! - single indices: `1`, `3`
//! - space or comma separated: `1 3 5`, `1,3,5`
//! - inclusive ranges: `3-6`
//! - any mix of the above: `1 3-5,8`
//!
//! Indices are resolved against a status listing taken right before the command runs,
//! never against an older one.

use crate::core::{
    error::{ConductorError, Result},
    state::FileStatus,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

pub struct Selection;

impl Selection {
    /// Parse an index expression into sorted, deduplicated 1-based indices
    pub fn parse(input: &str) -> Result<Vec<usize>> {
        let mut indices = BTreeSet::new();

        for part in input.split([' ', ',']).map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(input, start)?;
                    let end = parse_index(input, end)?;
                    if start > end {
                        return Err(ConductorError::invalid_selection(
                            input,
                            format!("range start ({start}) must be <= end ({end})"),
                        ));
                    }
                    indices.extend(start..=end);
                }
                None => {
                    indices.insert(parse_index(input, part)?);
                }
            }
        }

        Ok(indices.into_iter().collect())
    }

    pub fn validate(indices: &[usize], max: usize) -> Result<()> {
        if max == 0 {
            return Err(ConductorError::NoFilesAvailable);
        }
        for &index in indices {
            if index == 0 || index > max {
                return Err(ConductorError::index_out_of_range(index, max));
            }
        }
        Ok(())
    }

    /// Whether every argument looks like an index expression rather than a path
    pub fn is_index_expression(args: &[String]) -> bool {
        !args.is_empty()
            && args.iter().all(|arg| {
                arg.chars()
                    .any(|c| c.is_ascii_digit())
                    && arg
                        .chars()
                        .all(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | ' '))
            })
    }

    /// Turn command arguments into paths.
    ///
    /// Index expressions are looked up in `files`, with a path listed once even when it
    /// has both staged and unstaged entries. Anything else is taken as a path as given.
    pub fn resolve(args: &[String], files: &[FileStatus]) -> Result<Vec<PathBuf>> {
        if args.is_empty() {
            return Err(ConductorError::NothingSelected);
        }
        if !Self::is_index_expression(args) {
            return Ok(args.iter().map(PathBuf::from).collect());
        }

        let indices = Self::parse(&args.join(" "))?;
        if indices.is_empty() {
            return Err(ConductorError::NothingSelected);
        }
        Self::validate(&indices, files.len())?;

        let mut paths: Vec<PathBuf> = Vec::with_capacity(indices.len());
        for index in indices {
            let path = &files[index - 1].path;
            if !paths.contains(path) {
                paths.push(path.clone());
            }
        }
        log::debug!("Selection {args:?} resolved to {paths:?}");
        Ok(paths)
    }
}

fn parse_index(input: &str, part: &str) -> Result<usize> {
    part.trim()
        .parse()
        .map_err(|_| ConductorError::invalid_selection(input, format!("'{part}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::git_status::FileStatusKind;

    fn listing() -> Vec<FileStatus> {
        vec![
            FileStatus::new("a.txt", FileStatusKind::Added, true),
            FileStatus::new("b.txt", FileStatusKind::Modified, true),
            FileStatus::new("b.txt", FileStatusKind::Modified, false),
            FileStatus::new("c.txt", FileStatusKind::Untracked, false),
        ]
    }

    #[test]
    fn test_parse_mixed_format() -> Result<()> {
        assert_eq!(Selection::parse("1 3-5,8")?, vec![1, 3, 4, 5, 8]);
        assert_eq!(Selection::parse("2,2,1")?, vec![1, 2]);
        assert!(Selection::parse("  ")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let err = Selection::parse("5-3").unwrap_err();
        assert!(err.to_string().contains("range start (5) must be <= end (3)"));

        let err = Selection::parse("1-2-3").unwrap_err();
        assert!(err.to_string().contains("is not a number"));
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Selection::validate(&[1, 4], 4).is_ok());
        assert!(matches!(
            Selection::validate(&[0], 4),
            Err(ConductorError::IndexOutOfRange { index: 0, max: 4 })
        ));
        assert!(matches!(
            Selection::validate(&[5], 4),
            Err(ConductorError::IndexOutOfRange { index: 5, max: 4 })
        ));
        assert!(matches!(
            Selection::validate(&[1], 0),
            Err(ConductorError::NoFilesAvailable)
        ));
    }

    #[test]
    fn test_resolve_indices_against_listing() -> Result<()> {
        let paths = Selection::resolve(&["1".to_string(), "2-3".to_string()], &listing())?;
        assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        Ok(())
    }

    #[test]
    fn test_resolve_plain_paths() -> Result<()> {
        let paths = Selection::resolve(&["src/main.rs".to_string()], &[])?;
        assert_eq!(paths, vec![PathBuf::from("src/main.rs")]);
        Ok(())
    }

    #[test]
    fn test_resolve_requires_arguments() {
        assert!(matches!(
            Selection::resolve(&[], &listing()),
            Err(ConductorError::NothingSelected)
        ));
    }
}
