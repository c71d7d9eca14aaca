use clap::{Args, Parser, Subcommand};
use git_conductor::commands::*;
use git_conductor::core::{
    command_init::{CommandContext, GlobalOptions},
    error::{ConductorError, Result},
    print_error, ConflictStrategy, OperationReport,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-conductor")]
#[command(about = "Multi-step git operations with graceful partial-failure handling")]
#[command(version = "0.1.0")]
struct Cli {
    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Identity whose token authenticates pushes and pulls
    #[arg(long, global = true)]
    identity: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show numbered working tree status
    Status,
    /// Show recent commits
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List local and remote branches
    Branches,
    /// List tags
    Tags,
    /// Stage files by path or index (e.g. "1 3-5,8")
    Stage { files: Vec<String> },
    /// Unstage files by path or index
    Unstage { files: Vec<String> },
    /// Commit staged changes
    Commit {
        #[arg(short, long)]
        message: String,
        /// Push after committing
        #[arg(long)]
        push: bool,
    },
    /// Push the current branch
    Push,
    /// Pull, then push
    Sync,
    /// Push the current branch and set its upstream
    Publish,
    /// Switch branches, stashing local changes around the switch
    Checkout {
        name: String,
        /// Create the branch
        #[arg(short = 'b', long = "create")]
        create: bool,
    },
    /// Merge a branch into the current one
    Merge { name: String },
    /// Rebase the current branch onto another
    Rebase { name: String },
    /// Stash local changes, untracked files included
    Stash,
    /// Re-apply the most recent stash
    StashPop,
    /// Resolve a conflicted file by taking one side
    Resolve {
        file: String,
        #[command(flatten)]
        side: ResolveSide,
    },
    /// Throw away local changes to a file
    Discard { file: String },
    /// Undo the last commit, keeping its changes staged
    Undo,
    /// Delete the last commit locally and on the remote
    DeleteLast,
    /// Apply a commit onto the current branch
    CherryPick { hash: String },
    /// Squash the last N commits into one
    Squash {
        count: usize,
        #[arg(short, long)]
        message: String,
    },
    /// Change the message of the last commit
    Reword {
        #[arg(short, long)]
        message: String,
    },
    /// Create, push or delete tags
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Delete a local branch
    BranchDelete { name: String },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ResolveSide {
    /// Keep our version
    #[arg(long)]
    ours: bool,
    /// Keep their version
    #[arg(long)]
    theirs: bool,
}

impl ResolveSide {
    fn strategy(&self) -> ConflictStrategy {
        if self.ours {
            ConflictStrategy::Ours
        } else {
            ConflictStrategy::Theirs
        }
    }
}

#[derive(Subcommand)]
enum TagAction {
    /// Create a tag (annotated when a message is given)
    Create {
        name: String,
        #[arg(short, long)]
        message: Option<String>,
        /// Commit to tag instead of HEAD
        #[arg(long)]
        target: Option<String>,
    },
    /// Push a tag to the remote
    Push { name: String },
    /// Delete a local tag
    Delete { name: String },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// `Ok(true)` when the command's outcome counts as a failure
fn run(cli: Cli) -> Result<bool> {
    let options = GlobalOptions {
        repo: cli.repo,
        identity: cli.identity,
        assume_yes: cli.yes,
    };
    let mut context = CommandContext::initialize(&options)?;
    let ctx = &mut context;

    let report: OperationReport = match cli.command {
        Commands::Status => return execute_status(ctx).map(|_| false),
        Commands::Log { limit } => return execute_log(ctx, limit).map(|_| false),
        Commands::Branches => return execute_branches(ctx).map(|_| false),
        Commands::Tags => return execute_tag_list(ctx).map(|_| false),
        Commands::Stage { files } => execute_stage(ctx, &files)?,
        Commands::Unstage { files } => execute_unstage(ctx, &files)?,
        Commands::Commit { message, push } => execute_commit(ctx, &message, push)?,
        Commands::Push => execute_push(ctx)?,
        Commands::Sync => execute_sync(ctx)?,
        Commands::Publish => execute_publish(ctx)?,
        Commands::Checkout { name, create } => execute_checkout(ctx, &name, create)?,
        Commands::Merge { name } => execute_merge(ctx, &name)?,
        Commands::Rebase { name } => execute_rebase(ctx, &name)?,
        Commands::Stash => execute_stash(ctx)?,
        Commands::StashPop => execute_stash_pop(ctx)?,
        Commands::Resolve { file, side } => {
            execute_resolve(ctx, &[file], side.strategy())?
        }
        Commands::Discard { file } => execute_discard(ctx, &[file])?,
        Commands::Undo => execute_undo(ctx)?,
        Commands::DeleteLast => execute_delete_last(ctx)?,
        Commands::CherryPick { hash } => execute_cherry_pick(ctx, &hash)?,
        Commands::Squash { count, message } => execute_squash(ctx, count, &message)?,
        Commands::Reword { message } => execute_reword(ctx, &message)?,
        Commands::Tag { action } => match action {
            TagAction::Create {
                name,
                message,
                target,
            } => execute_tag_create(ctx, &name, message.as_deref(), target.as_deref())?,
            TagAction::Push { name } => execute_tag_push(ctx, &name)?,
            TagAction::Delete { name } => execute_tag_delete(ctx, &name)?,
        },
        Commands::BranchDelete { name } => execute_branch_delete(ctx, &name)?,
    };

    Ok(report.is_failure())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(false) => {}
        Ok(true) => std::process::exit(1),
        Err(e) => {
            if let ConductorError::NotInGitRepo = e {
                print_error("Not in a git repository");
            } else {
                print_error(&e.to_string());
            }
            std::process::exit(1);
        }
    }
}
