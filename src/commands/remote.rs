//! Commands that talk to the remote.

use crate::core::{
    command_init::CommandContext, print_error, OperationReport, OperationStatus, Reportable,
    Result,
};

const NO_CREDENTIAL: &str = "No credential found. Set GIT_CONDUCTOR_TOKEN (or \
     GIT_CONDUCTOR_TOKEN_<IDENTITY>) and link an identity with --identity or the config file.";

pub fn execute_push(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.push()
}

pub fn execute_publish(context: &mut CommandContext) -> Result<OperationReport> {
    context.orchestrator.publish_branch()
}

/// Pull then push. Sync always needs a token, so a missing one fails up front.
pub fn execute_sync(context: &mut CommandContext) -> Result<OperationReport> {
    let Some(token) = context.token() else {
        print_error(NO_CREDENTIAL);
        return Ok(OperationReport::new(OperationStatus::Failed(
            NO_CREDENTIAL.to_string(),
        )));
    };

    Ok(match context.orchestrator.sync(&token)? {
        Some(result) => {
            log::debug!(
                "Sync pulled={} pushed={} conflicts={}",
                result.pulled,
                result.pushed,
                result.conflicts.len()
            );
            result.to_report()
        }
        None => OperationReport::skipped(),
    })
}
