//! Branch switching, merging and stashing.
//!
//! Checkout, merge and rebase put uncommitted changes on the stash first and bring them
//! back afterwards; see [`crate::core::stash_guard`].

use crate::core::{command_init::CommandContext, OperationReport, Result};

pub fn execute_checkout(
    context: &mut CommandContext,
    name: &str,
    create: bool,
) -> Result<OperationReport> {
    context.orchestrator.checkout_branch(name, create)
}

pub fn execute_merge(context: &mut CommandContext, name: &str) -> Result<OperationReport> {
    context.orchestrator.merge_branch(name)
}

pub fn execute_rebase(context: &mut CommandContext, name: &str) -> Result<OperationReport> {
    context.orchestrator.rebase_branch(name)
}

pub fn execute_branch_delete(context: &mut CommandContext, name: &str) -> Result<OperationReport> {
    context.orchestrator.delete_branch(name)
}

pub fn execute_stash(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.stash_changes()
}

pub fn execute_stash_pop(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.pop_stash()
}
