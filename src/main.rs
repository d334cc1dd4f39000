use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use svnkit::core::{
    app::App,
    command::Depth,
    config::Settings,
    error::{AppError, AppResult},
};

use crate::commands::{
    branch::{handle_branch, BranchArgs},
    conflicts::{handle_conflicts, handle_resolve},
    history::{
        handle_blame, handle_cat, handle_compare, handle_diff, handle_info, handle_list, handle_log, handle_version,
        DiffArgs, LogArgs,
    },
    working_copy::*,
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "svnkit", version, about = "A friendlier front end for the svn command line client")]
struct Cli {
    /// Working copy directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// svn executable to use instead of the one in the settings / PATH
    #[arg(long, global = true)]
    svn: Option<PathBuf>,

    /// Kill svn commands running longer than this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the working copy status.
    Status {
        path: Option<String>,
        /// Contact the repository and show out-of-date items
        #[arg(short = 'u', long)]
        show_updates: bool,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        no_ignore: bool,
    },
    /// Show history logs.
    Log {
        target: Option<String>,
        /// Revision or range (e.g., "100", "HEAD:1")
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        /// Show changed paths
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        stop_on_copy: bool,
        /// Include revisions merged into each entry
        #[arg(short = 'g', long)]
        use_merge_history: bool,
    },
    /// Show changes as a unified diff.
    Diff {
        target: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
        /// The change made by revision N
        #[arg(short, long)]
        change: Option<String>,
        #[arg(short = 'x', long)]
        ignore_whitespace: bool,
        /// Print svn's output unchanged
        #[arg(long)]
        raw: bool,
    },
    /// Compare two local files.
    Compare {
        original: PathBuf,
        modified: PathBuf,
        #[arg(long)]
        raw: bool,
    },
    /// Show information about a working copy path or URL.
    Info {
        target: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
    },
    /// Show who changed each line of a file.
    Blame {
        target: String,
        #[arg(short, long)]
        revision: Option<String>,
    },
    /// List directory entries in the repository.
    List {
        target: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(short = 'R', long)]
        recursive: bool,
    },
    /// Print the contents of a file.
    Cat {
        target: String,
        #[arg(short, long)]
        revision: Option<String>,
    },
    /// Update the working copy and resolve conflicts.
    Update {
        paths: Vec<String>,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(long, value_parser = parse_depth)]
        depth: Option<Depth>,
        #[arg(long)]
        accept: Option<String>,
    },
    /// Update, resolve conflicts, then commit.
    Commit {
        paths: Vec<String>,
        #[arg(short, long)]
        message: Option<String>,
        /// Commit without updating first
        #[arg(long)]
        no_update: bool,
    },
    /// Schedule files for addition.
    Add {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        parents: bool,
    },
    /// Schedule files for deletion.
    Delete {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        keep_local: bool,
    },
    /// Discard local changes.
    Revert {
        paths: Vec<String>,
        #[arg(short = 'R', long)]
        recursive: bool,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Recover from an interrupted operation.
    Cleanup {
        #[arg(long)]
        remove_unversioned: bool,
        #[arg(long)]
        remove_ignored: bool,
    },
    /// Resolve conflicts, interactively when --accept is omitted.
    Resolve {
        path: Option<String>,
        /// postpone, base, working, mine-conflict, theirs-conflict, mine-full, theirs-full
        #[arg(long)]
        accept: Option<String>,
    },
    /// List conflicted items.
    Conflicts,
    /// Create a branch (or tag) from the current trunk/branch.
    Branch {
        name: String,
        #[arg(short, long)]
        tag: bool,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
        /// Switch the working copy to the new branch
        #[arg(short, long)]
        switch: bool,
    },
    /// Switch the working copy to another URL.
    Switch {
        url: String,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(long)]
        ignore_ancestry: bool,
    },
    /// Merge changes from a URL into the working copy.
    Merge {
        source: String,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        record_only: bool,
        #[arg(long)]
        accept: Option<String>,
    },
    /// Rewrite the repository root URL of the working copy.
    Relocate {
        #[arg(long)]
        from: Option<String>,
        to: String,
    },
    /// Check out a working copy.
    Checkout {
        url: String,
        path: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(long, value_parser = parse_depth)]
        depth: Option<Depth>,
    },
    /// Export a clean directory tree.
    Export {
        source: String,
        destination: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(long)]
        force: bool,
    },
    /// Import an unversioned tree into the repository.
    Import {
        url: String,
        #[arg(long)]
        path: Option<String>,
        #[arg(short, long)]
        message: String,
    },
    /// Create directories.
    Mkdir {
        #[arg(required = true)]
        targets: Vec<String>,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        parents: bool,
    },
    /// Move or rename an item.
    Move {
        source: String,
        destination: String,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        parents: bool,
    },
    /// Copy an item inside the working copy.
    Copy {
        source: String,
        destination: String,
        #[arg(long)]
        parents: bool,
    },
    /// Manage versioned properties.
    Prop {
        #[command(subcommand)]
        action: PropCommand,
    },
    /// Lock files in the repository.
    Lock {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        force: bool,
    },
    /// Release locks.
    Unlock {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        force: bool,
    },
    /// Check the svn executable and show its version.
    Version,
}

#[derive(Subcommand, Debug)]
enum PropCommand {
    List {
        target: Option<String>,
    },
    Get {
        name: String,
        target: Option<String>,
        #[arg(short, long)]
        revision: Option<String>,
    },
    Set {
        name: String,
        value: String,
        targets: Vec<String>,
        #[arg(short = 'R', long)]
        recursive: bool,
    },
    Del {
        name: String,
        target: Option<String>,
        #[arg(short = 'R', long)]
        recursive: bool,
    },
}

impl Commands {
    /// 不依赖现有工作副本的指令
    fn is_standalone(&self) -> bool {
        matches!(
            self,
            Commands::Compare { .. } | Commands::Version | Commands::Checkout { .. } | Commands::Export { .. } | Commands::Import { .. }
        )
    }
}

fn parse_depth(value: &str) -> Result<Depth, String> {
    match value {
        "empty" => Ok(Depth::Empty),
        "files" => Ok(Depth::Files),
        "immediates" => Ok(Depth::Immediates),
        "infinity" => Ok(Depth::Infinity),
        other => Err(format!("unknown depth '{}' (empty, files, immediates, infinity)", other)),
    }
}

async fn run(app: &App, dir: &Path, command: Commands) -> AppResult<()> {
    match command {
        Commands::Status { path, show_updates, verbose, no_ignore } => {
            handle_status(app, dir, path.as_deref(), show_updates, verbose, no_ignore).await
        }
        Commands::Log { target, revision, limit, verbose, stop_on_copy, use_merge_history } => {
            let args = LogArgs {
                target: target.as_deref(),
                revisions: revision.as_deref(),
                limit,
                verbose,
                stop_on_copy,
                use_merge_history,
            };
            handle_log(app, dir, args).await
        }
        Commands::Diff { target, revision, change, ignore_whitespace, raw } => {
            let args = DiffArgs {
                target: target.as_deref(),
                revisions: revision.as_deref(),
                change: change.as_deref(),
                ignore_whitespace,
                raw,
            };
            handle_diff(app, dir, args).await
        }
        Commands::Compare { original, modified, raw } => handle_compare(app, &original, &modified, raw),
        Commands::Info { target, revision } => handle_info(app, dir, target.as_deref(), revision.as_deref()).await,
        Commands::Blame { target, revision } => handle_blame(app, dir, &target, revision.as_deref()).await,
        Commands::List { target, revision, recursive } => {
            handle_list(app, dir, target.as_deref(), revision.as_deref(), recursive).await
        }
        Commands::Cat { target, revision } => handle_cat(app, dir, &target, revision.as_deref()).await,
        Commands::Update { paths, revision, depth, accept } => {
            handle_update(app, dir, &paths, revision.as_deref(), depth, accept.as_deref()).await
        }
        Commands::Commit { paths, message, no_update } => {
            handle_commit(app, dir, &paths, message.as_deref(), no_update).await
        }
        Commands::Add { paths, force, parents } => handle_add(app, dir, &paths, force, parents).await,
        Commands::Delete { paths, force, keep_local } => handle_delete(app, dir, &paths, force, keep_local).await,
        Commands::Revert { paths, recursive, yes } => handle_revert(app, dir, &paths, recursive, yes).await,
        Commands::Cleanup { remove_unversioned, remove_ignored } => {
            handle_cleanup(app, dir, remove_unversioned, remove_ignored).await
        }
        Commands::Resolve { path, accept } => handle_resolve(app, dir, path.as_deref(), accept.as_deref()).await,
        Commands::Conflicts => handle_conflicts(app, dir).await,
        Commands::Branch { name, tag, message, revision, switch } => {
            let args = BranchArgs {
                name: &name,
                tag,
                message: message.as_deref(),
                revision: revision.as_deref(),
                switch,
            };
            handle_branch(app, dir, args).await
        }
        Commands::Switch { url, revision, ignore_ancestry } => {
            handle_switch(app, dir, &url, revision.as_deref(), ignore_ancestry).await
        }
        Commands::Merge { source, revision, dry_run, record_only, accept } => {
            handle_merge(app, dir, &source, revision.as_deref(), dry_run, record_only, accept.as_deref()).await
        }
        Commands::Relocate { from, to } => handle_relocate(app, dir, from.as_deref(), &to).await,
        Commands::Checkout { url, path, revision, depth } => {
            handle_checkout(app, dir, &url, path.as_deref(), revision.as_deref(), depth).await
        }
        Commands::Export { source, destination, revision, force } => {
            handle_export(app, dir, &source, destination.as_deref(), revision.as_deref(), force).await
        }
        Commands::Import { url, path, message } => handle_import(app, dir, path.as_deref(), &url, &message).await,
        Commands::Mkdir { targets, message, parents } => {
            handle_mkdir(app, dir, &targets, message.as_deref(), parents).await
        }
        Commands::Move { source, destination, force, parents } => {
            handle_move(app, dir, &source, &destination, force, parents).await
        }
        Commands::Copy { source, destination, parents } => handle_copy(app, dir, &source, &destination, parents).await,
        Commands::Prop { action } => {
            let action = match action {
                PropCommand::List { target } => PropAction::List { target },
                PropCommand::Get { name, target, revision } => PropAction::Get { name, target, revision },
                PropCommand::Set { name, value, targets, recursive } => PropAction::Set { name, value, targets, recursive },
                PropCommand::Del { name, target, recursive } => PropAction::Delete { name, target, recursive },
            };
            handle_prop(app, dir, action).await
        }
        Commands::Lock { paths, message, force } => handle_lock(app, dir, &paths, message.as_deref(), force).await,
        Commands::Unlock { paths, force } => handle_unlock(app, dir, &paths, force).await,
        Commands::Version => handle_version(app).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            e.print().ok();
            std::process::exit(e.exit_code());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings_path = Settings::default_path();
    let mut settings = settings_path.as_deref().map(Settings::load).unwrap_or_default();
    if let Some(svn) = cli.svn {
        settings.svn_path = Some(svn);
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = Some(timeout);
    }
    let mut app = App::new(settings, settings_path);

    // Ctrl-C 取消正在运行的 svn 进程
    let cancel = app.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt received, cancelling");
            cancel.cancel();
        }
    });

    let dir = cli.dir;
    let standalone = cli.command.is_standalone();
    let command_result = run(&app, &dir, cli.command).await;

    let failed = command_result.is_err();
    match command_result {
        Ok(()) => {
            if !standalone {
                let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
                app.remember_working_copy(&dir);
            }
        }
        Err(e) => {
            app.ui.finish_step();
            match e {
                AppError::OperationCancelled => app.ui.success("Operation cancelled by user."),
                e if e.is_tool_missing() => app.ui.error(&format!("{}\nInstall Subversion or pass --svn <path>.", e)),
                _ => app.ui.error(&format!("{}", e)),
            }
        }
    }

    // 先恢复光标再退出
    drop(app);
    if failed {
        std::process::exit(1);
    }
}
