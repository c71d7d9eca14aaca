use crate::core::{
    colors::format_file_line, command_init::CommandContext, print_info, print_section_header,
    state::FileStatus, FileStatusKind, Result, VcsBackend,
};
use colored::*;

pub fn execute_status(context: &mut CommandContext) -> Result<()> {
    // Fresh listing, so the numbers shown are the numbers `stage 1 3-5` will resolve
    let files = context
        .orchestrator
        .backend()
        .status(&context.repo_path)?;

    let branch = context
        .orchestrator
        .backend()
        .current_branch(&context.repo_path)?
        .unwrap_or_else(|| "-detached-".to_string());
    let head = context
        .orchestrator
        .session()
        .and_then(|session| session.commits().first())
        .map(|commit| format!("{} {}", commit.short_hash.bright_black(), commit.message))
        .unwrap_or_else(|| "- no commits yet -".bright_black().to_string());

    println!();
    println!("{} {}", "On branch".bright_black(), branch.blue());
    println!("{} {}", "Last commit".bright_black(), head);

    if files.is_empty() {
        print_info("Nothing to commit, working tree clean");
        return Ok(());
    }

    print_grouped(&files);
    Ok(())
}

fn print_grouped(files: &[FileStatus]) {
    let sections: [(&str, fn(&FileStatus) -> bool); 4] = [
        ("Conflicts", |f| f.is_conflict()),
        ("Staged changes", |f| f.staged && !f.is_conflict()),
        ("Unstaged changes", |f| {
            !f.staged && !f.is_conflict() && f.status != FileStatusKind::Untracked
        }),
        ("Untracked files", |f| f.status == FileStatusKind::Untracked),
    ];

    for (title, belongs) in sections {
        let entries: Vec<_> = files
            .iter()
            .enumerate()
            .filter(|(_, file)| belongs(file))
            .collect();
        if entries.is_empty() {
            continue;
        }

        print_section_header(title);
        for (position, file) in entries {
            println!("  {}", format_file_line(position + 1, file));
        }
    }
    println!();
}

pub fn execute_log(context: &mut CommandContext, limit: Option<usize>) -> Result<()> {
    let Some(session) = context.orchestrator.session() else {
        return Ok(());
    };
    if session.commits().is_empty() {
        print_info("No commits yet");
        return Ok(());
    }

    let limit = limit.unwrap_or(context.config.log_limit);
    println!();
    for commit in session.commits().iter().take(limit) {
        let refs = if commit.refs.is_empty() {
            String::new()
        } else {
            format!(" ({})", commit.refs.join(", ")).yellow().to_string()
        };
        println!(
            "{} {}{} {}",
            commit.short_hash.yellow(),
            commit.message.white(),
            refs,
            format!(
                "- {} {}",
                commit.author,
                commit.date.format("%Y-%m-%d %H:%M")
            )
            .bright_black()
        );
    }
    println!();
    Ok(())
}

pub fn execute_branches(context: &mut CommandContext) -> Result<()> {
    let Some(session) = context.orchestrator.session() else {
        return Ok(());
    };
    if session.branches().is_empty() {
        print_info("No branches found. Make your first commit to create one.");
        return Ok(());
    }

    for (title, remote) in [("Local branches", false), ("Remote branches", true)] {
        let branches: Vec<_> = session
            .branches()
            .iter()
            .filter(|b| b.remote == remote)
            .collect();
        if branches.is_empty() {
            continue;
        }

        print_section_header(title);
        for branch in branches {
            let marker = if branch.current { "*" } else { " " };
            println!(
                "{}{}{} {} {}",
                "[".bright_black(),
                marker.white(),
                "]".bright_black(),
                if branch.current {
                    branch.name.blue().bold()
                } else {
                    branch.name.normal()
                },
                branch
                    .last_commit
                    .as_deref()
                    .unwrap_or_default()
                    .bright_black()
            );
        }
    }
    println!();
    Ok(())
}
