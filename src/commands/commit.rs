//! Commit and history-rewriting commands.

use crate::core::{command_init::CommandContext, OperationReport, Result};

pub fn execute_commit(
    context: &mut CommandContext,
    message: &str,
    push: bool,
) -> Result<OperationReport> {
    if push {
        context.orchestrator.commit_and_push(message)
    } else {
        context.orchestrator.commit(message)
    }
}

pub fn execute_undo(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.undo_last_commit()
}

pub fn execute_delete_last(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.delete_last_commit()
}

pub fn execute_cherry_pick(context: &mut CommandContext, hash: &str) -> Result<OperationReport> {
    context.orchestrator.cherry_pick(hash)
}

pub fn execute_squash(
    context: &mut CommandContext,
    count: usize,
    message: &str,
) -> Result<OperationReport> {
    context.orchestrator.squash_commits(count, message)
}

pub fn execute_reword(context: &mut CommandContext, message: &str) -> Result<OperationReport> {
    context.orchestrator.reword_commit(message)
}
