//! Commands that act on individual files: stage, unstage, discard and conflict resolution.
//!
//! File arguments are either paths or index expressions into the numbered `status` listing.

use crate::core::{
    command_init::CommandContext, selection::Selection, ConductorError, ConflictStrategy,
    OperationReport, Result, VcsBackend,
};
use std::path::PathBuf;

fn resolve_paths(context: &CommandContext, args: &[String]) -> Result<Vec<PathBuf>> {
    let files = if Selection::is_index_expression(args) {
        context.orchestrator.backend().status(&context.repo_path)?
    } else {
        Vec::new()
    };
    Selection::resolve(args, &files)
}

fn single_path(context: &CommandContext, args: &[String]) -> Result<PathBuf> {
    let mut paths = resolve_paths(context, args)?;
    if paths.len() != 1 {
        return Err(ConductorError::invalid_selection(
            args.join(" "),
            format!("expected exactly one file, got {}", paths.len()),
        ));
    }
    Ok(paths.remove(0))
}

pub fn execute_stage(context: &mut CommandContext, args: &[String]) -> Result<OperationReport> {
    let paths = resolve_paths(context, args)?;
    context.orchestrator.stage_files(&paths)
}

pub fn execute_unstage(context: &mut CommandContext, args: &[String]) -> Result<OperationReport> {
    let paths = resolve_paths(context, args)?;
    context.orchestrator.unstage_files(&paths)
}

pub fn execute_discard(context: &mut CommandContext, args: &[String]) -> Result<OperationReport> {
    let path = single_path(context, args)?;
    context.orchestrator.discard_file(&path)
}

pub fn execute_resolve(
    context: &mut CommandContext,
    args: &[String],
    strategy: ConflictStrategy,
) -> Result<OperationReport> {
    let path = single_path(context, args)?;
    let report = context.orchestrator.resolve_conflict(&path, strategy)?;

    let still_conflicted = context.orchestrator.session().is_some_and(|session| {
        session
            .files()
            .iter()
            .any(|f| f.path == path && f.is_conflict())
    });
    if still_conflicted {
        log::warn!("{} is still reported as conflicted", path.display());
    }
    Ok(report)
}
