//! ### 只读指令
//!
//! log / diff / blame / cat / info / list / version，以及不依赖 svn 的本地文件比较。

use std::path::Path;

use svnkit::{
    core::{
        app::App,
        command::{DiffOptions, LogOptions, SvnCommand},
        error::{AppError, AppResult},
        utils::{parse_revision_arg, parse_revision_range, Revision},
    },
    parse::diff::create_named_unified_diff,
};

use crate::commands::utils::{read_text, to_log_rows};

pub struct LogArgs<'a> {
    pub target: Option<&'a str>,
    pub revisions: Option<&'a str>,
    pub limit: Option<u32>,
    pub verbose: bool,
    pub stop_on_copy: bool,
    pub use_merge_history: bool,
}

/// 显示历史记录，标记工作副本当前所在的版本
pub async fn handle_log(app: &App, dir: &Path, args: LogArgs<'_>) -> AppResult<()> {
    app.ui.update_step("Reading history");
    let opts = LogOptions {
        revisions: args.revisions.map(parse_revision_range).transpose()?,
        limit: args.limit,
        verbose: args.verbose,
        stop_on_copy: args.stop_on_copy,
        use_merge_history: args.use_merge_history,
        quiet: false,
    };
    let entries = app.svn.log(dir, args.target, &opts, &app.cancel).await?;

    // 不在工作副本中 (target 是 URL) 时没有当前版本
    let current = match app.svn.info(dir, None, None, &app.cancel).await {
        Ok(info) => info.first().and_then(|i| i.revision),
        Err(e) => {
            log::debug!("no working copy revision to mark: {}", e);
            None
        }
    };
    app.ui.finish_step();

    if entries.is_empty() {
        app.ui.info("No log entries");
        return Ok(());
    }
    app.ui.show_log(to_log_rows(&entries, current));

    if args.verbose {
        for entry in &entries {
            if entry.changed_paths.is_empty() {
                continue;
            }
            let mut text = format!("r{}:", entry.revision);
            for changed in &entry.changed_paths {
                text.push_str(&format!("\n   {} {}", changed.action.code(), changed.path));
                if let (Some(from), Some(rev)) = (&changed.copy_from_path, changed.copy_from_revision) {
                    text.push_str(&format!(" (from {}:{})", from, rev));
                }
            }
            app.ui.plain(&text);
        }
    }
    Ok(())
}

pub struct DiffArgs<'a> {
    pub target: Option<&'a str>,
    pub revisions: Option<&'a str>,
    pub change: Option<&'a str>,
    pub ignore_whitespace: bool,
    pub raw: bool,
}

/// 显示差异；`raw` 时原样输出 svn diff
pub async fn handle_diff(app: &App, dir: &Path, args: DiffArgs<'_>) -> AppResult<()> {
    let change = match args.change {
        Some(c) => match parse_revision_arg(c)? {
            Revision::Number(n) => Some(n),
            other => return Err(AppError::RevisionParse(other.as_arg())),
        },
        None => None,
    };
    let opts = DiffOptions {
        revisions: args.revisions.map(parse_revision_range).transpose()?,
        change,
        ignore_whitespace: args.ignore_whitespace,
        ..Default::default()
    };

    if args.raw {
        let command = SvnCommand::diff(args.target, &opts).in_dir(dir);
        let text = app.svn.execute_with(&command, &app.cancel, &mut app.ui.observer()).await?.into_output()?;
        app.ui.plain(&text);
        return Ok(());
    }

    app.ui.update_step("Computing diff");
    let documents = app.svn.diff(dir, args.target, &opts, &app.cancel).await?;
    app.ui.finish_step();
    app.ui.show_diff(&documents);
    Ok(())
}

/// 比较两个本地文件，不需要工作副本
pub fn handle_compare(app: &App, original: &Path, modified: &Path, raw: bool) -> AppResult<()> {
    let old = read_text(original)?;
    let new = read_text(modified)?;
    let document = create_named_unified_diff(
        &old,
        &new,
        &original.to_string_lossy(),
        &modified.to_string_lossy(),
    );

    if !document.has_changes() {
        app.ui.success("Files are identical");
        return Ok(());
    }
    if raw {
        for file in &document.files {
            app.ui.plain(&file.to_unified_string());
        }
    } else {
        app.ui.show_diff(std::slice::from_ref(&document));
    }
    Ok(())
}

pub async fn handle_blame(app: &App, dir: &Path, target: &str, revision: Option<&str>) -> AppResult<()> {
    app.ui.update_step(&format!("Annotating {}", target));
    let range = revision.map(parse_revision_range).transpose()?;
    let lines = app.svn.blame(dir, target, range, &app.cancel).await?;
    app.ui.finish_step();
    app.ui.show_blame(&lines);
    Ok(())
}

pub async fn handle_cat(app: &App, dir: &Path, target: &str, revision: Option<&str>) -> AppResult<()> {
    let revision = revision.map(parse_revision_arg).transpose()?;
    let text = app.svn.cat(dir, target, revision, &app.cancel).await?;
    app.ui.plain(text.trim_end_matches('\n'));
    Ok(())
}

pub async fn handle_info(app: &App, dir: &Path, target: Option<&str>, revision: Option<&str>) -> AppResult<()> {
    app.ui.update_step("Reading info");
    let revision = revision.map(parse_revision_arg).transpose()?;
    let entries = app.svn.info(dir, target, revision, &app.cancel).await?;
    app.ui.finish_step();
    app.ui.show_info(&entries);
    Ok(())
}

pub async fn handle_list(app: &App, dir: &Path, target: Option<&str>, revision: Option<&str>, recursive: bool) -> AppResult<()> {
    app.ui.update_step("Listing");
    let revision = revision.map(parse_revision_arg).transpose()?;
    let entries = app.svn.list(dir, target, revision, recursive, &app.cancel).await?;
    app.ui.finish_step();
    app.ui.show_list(&entries);
    Ok(())
}

/// 检查 svn 是否可用并显示版本
pub async fn handle_version(app: &App) -> AppResult<()> {
    match app.svn.version().await {
        Some(version) => {
            app.ui.success(&format!("svn {} ({})", version, app.svn.settings().svn_program()));
            if !version.at_least(1, 7) {
                app.ui.warn("svn older than 1.7 is not supported; XML output may be incomplete");
            }
            Ok(())
        }
        None => Err(AppError::Validation(format!(
            "'{}' is not available. Install Subversion or set svn_path in the settings file.",
            app.svn.settings().svn_program()
        ))),
    }
}
