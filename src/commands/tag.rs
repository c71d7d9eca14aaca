use crate::core::{
    command_init::CommandContext, print_info, print_section_header, OperationReport, Result,
};
use colored::*;

pub fn execute_tag_list(context: &mut CommandContext) -> Result<()> {
    let Some(session) = context.orchestrator.session() else {
        return Ok(());
    };
    if session.tags().is_empty() {
        print_info("No tags");
        return Ok(());
    }

    print_section_header("Tags");
    for tag in session.tags() {
        let short = tag.hash.get(..7).unwrap_or(tag.hash.as_str());
        println!(
            "  {} {} {}",
            tag.name.blue(),
            short.bright_black(),
            tag.message.lines().next().unwrap_or_default().white()
        );
    }
    println!();
    Ok(())
}

pub fn execute_tag_create(
    context: &mut CommandContext,
    name: &str,
    message: Option<&str>,
    target: Option<&str>,
) -> Result<OperationReport> {
    context.orchestrator.create_tag(name, message, target)
}

pub fn execute_tag_push(context: &mut CommandContext, name: &str) -> Result<OperationReport> {
    context.orchestrator.push_tag(name)
}

pub fn execute_tag_delete(context: &mut CommandContext, name: &str) -> Result<OperationReport> {
    context.orchestrator.delete_tag(name)
}
