//! ### 工作副本层级的指令
//!
//! 修改本地工作副本或直接修改仓库的指令：
//!
//! - status / update / commit
//! - add / delete / revert / cleanup / mkdir / move / copy
//! - checkout / export / import / switch / relocate / merge
//! - lock / unlock / prop*

use std::path::Path;

use crossterm::style::Stylize;
use svnkit::core::{
    app::App,
    command::{ConflictAccept, Depth, MergeOptions, StatusOptions, SvnCommand, UpdateOptions},
    error::{AppError, AppResult},
    utils::{parse_revision_arg, parse_revision_range, Revision},
};

use crate::commands::{
    conflicts::resolve_conflicts,
    utils::{as_strs, has_local_changes, run_with_progress},
};

fn parse_optional_revision(revision: Option<&str>) -> AppResult<Option<Revision>> {
    revision.map(parse_revision_arg).transpose()
}

/// 查看工作副本状态
pub async fn handle_status(app: &App, dir: &Path, path: Option<&str>, show_updates: bool, verbose: bool, no_ignore: bool) -> AppResult<()> {
    app.ui.update_step("Reading status");
    let opts = StatusOptions {
        show_updates,
        verbose,
        no_ignore,
        ..Default::default()
    };
    let entries = app.svn.status(dir, path, &opts, &app.cancel).await?;
    app.ui.finish_step();
    app.ui.show_status(&entries);
    Ok(())
}

/// 更新工作副本，随后处理冲突
pub async fn handle_update(app: &App, dir: &Path, paths: &[String], revision: Option<&str>, depth: Option<Depth>, accept: Option<&str>) -> AppResult<()> {
    let opts = UpdateOptions {
        revision: parse_optional_revision(revision)?,
        depth,
        accept: accept.map(ConflictAccept::parse),
        ignore_externals: false,
    };
    let command = SvnCommand::update(&as_strs(paths), &opts).in_dir(dir);
    let output = run_with_progress(app, command, "Updating working copy").await?;

    let summary = output.lines().rev().find(|l| l.contains("revision")).unwrap_or("Updated");
    app.ui.success(summary.trim());

    resolve_conflicts(app, dir).await
}

/// 提交：先更新并解决冲突，然后提交
pub async fn handle_commit(app: &App, dir: &Path, paths: &[String], message: Option<&str>, no_update: bool) -> AppResult<()> {
    app.ui.update_step("Checking for changes");
    let entries = app.svn.status(dir, None, &StatusOptions::default(), &app.cancel).await?;
    if !has_local_changes(&entries) {
        app.ui.success("Nothing to commit");
        return Ok(());
    }

    if !no_update {
        let command = SvnCommand::update(&[], &UpdateOptions::default()).in_dir(dir);
        run_with_progress(app, command, "Updating before commit").await?;
        resolve_conflicts(app, dir).await?;
    }
    app.ui.finish_step();

    let message = match message {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => app.ui.input_commit_message()?,
    };

    let command = SvnCommand::commit(&as_strs(paths), &message).in_dir(dir);
    let output = run_with_progress(app, command, "Committing").await?;
    match output.lines().rev().find(|l| l.starts_with("Committed revision")) {
        Some(line) => app.ui.success(line.trim_end_matches('.')),
        None => app.ui.success("Nothing was committed"),
    }
    Ok(())
}

pub async fn handle_add(app: &App, dir: &Path, paths: &[String], force: bool, parents: bool) -> AppResult<()> {
    let command = SvnCommand::add(&as_strs(paths), force, parents, false).in_dir(dir);
    let output = run_with_progress(app, command, "Adding").await?;
    app.ui.success(&format!("Scheduled {} item(s) for addition", output.lines().filter(|l| l.starts_with('A')).count()));
    Ok(())
}

pub async fn handle_delete(app: &App, dir: &Path, paths: &[String], force: bool, keep_local: bool) -> AppResult<()> {
    let command = SvnCommand::delete(&as_strs(paths), force, keep_local).in_dir(dir);
    run_with_progress(app, command, "Deleting").await?;
    app.ui.success(&format!("Scheduled {} path(s) for deletion", paths.len()));
    Ok(())
}

/// 还原本地修改，需要确认
pub async fn handle_revert(app: &App, dir: &Path, paths: &[String], recursive: bool, yes: bool) -> AppResult<()> {
    let targets = if paths.is_empty() { vec![".".to_string()] } else { paths.to_vec() };
    if !yes {
        let prompt = format!("Discard local changes in {}?", targets.join(", ").yellow().bold());
        if !app.ui.selector_yes_or_no(&prompt)? {
            return Err(AppError::OperationCancelled);
        }
    }
    let recursive = recursive || paths.is_empty();
    let command = SvnCommand::revert(&as_strs(&targets), recursive).in_dir(dir);
    let output = run_with_progress(app, command, "Reverting").await?;
    app.ui.success(&format!("Reverted {} item(s)", output.lines().filter(|l| l.starts_with("Reverted")).count()));
    Ok(())
}

pub async fn handle_cleanup(app: &App, dir: &Path, remove_unversioned: bool, remove_ignored: bool) -> AppResult<()> {
    let command = SvnCommand::cleanup(None, remove_unversioned, remove_ignored).in_dir(dir);
    run_with_progress(app, command, "Cleaning up working copy").await?;
    app.ui.success("Cleanup finished");
    Ok(())
}

pub async fn handle_lock(app: &App, dir: &Path, paths: &[String], message: Option<&str>, force: bool) -> AppResult<()> {
    let command = SvnCommand::lock(&as_strs(paths), message, force).in_dir(dir);
    run_with_progress(app, command, "Locking").await?;
    app.ui.success(&format!("Locked {}", paths.join(", ")));
    Ok(())
}

pub async fn handle_unlock(app: &App, dir: &Path, paths: &[String], force: bool) -> AppResult<()> {
    let command = SvnCommand::unlock(&as_strs(paths), force).in_dir(dir);
    run_with_progress(app, command, "Unlocking").await?;
    app.ui.success(&format!("Unlocked {}", paths.join(", ")));
    Ok(())
}

pub async fn handle_checkout(app: &App, dir: &Path, url: &str, path: Option<&str>, revision: Option<&str>, depth: Option<Depth>) -> AppResult<()> {
    let command = SvnCommand::checkout(url, path, parse_optional_revision(revision)?, depth).in_dir(dir);
    let output = run_with_progress(app, command, &format!("Checking out {}", url)).await?;
    app.ui.success(output.lines().last().unwrap_or("Checked out").trim());
    Ok(())
}

pub async fn handle_export(app: &App, dir: &Path, source: &str, destination: Option<&str>, revision: Option<&str>, force: bool) -> AppResult<()> {
    let command = SvnCommand::export(source, destination, parse_optional_revision(revision)?, force).in_dir(dir);
    let output = run_with_progress(app, command, &format!("Exporting {}", source)).await?;
    app.ui.success(output.lines().last().unwrap_or("Exported").trim());
    Ok(())
}

pub async fn handle_import(app: &App, dir: &Path, path: Option<&str>, url: &str, message: &str) -> AppResult<()> {
    let command = SvnCommand::import(path, url, message).in_dir(dir);
    let output = run_with_progress(app, command, &format!("Importing into {}", url)).await?;
    app.ui.success(output.lines().last().unwrap_or("Imported").trim());
    Ok(())
}

pub async fn handle_switch(app: &App, dir: &Path, url: &str, revision: Option<&str>, ignore_ancestry: bool) -> AppResult<()> {
    let command = SvnCommand::switch(url, None, parse_optional_revision(revision)?, ignore_ancestry).in_dir(dir);
    run_with_progress(app, command, &format!("Switching to {}", url)).await?;
    app.ui.success(&format!("Switched to {}", url));
    resolve_conflicts(app, dir).await
}

pub async fn handle_relocate(app: &App, dir: &Path, from: Option<&str>, to: &str) -> AppResult<()> {
    let command = SvnCommand::relocate(from, to, None).in_dir(dir);
    run_with_progress(app, command, "Relocating").await?;
    app.ui.success(&format!("Relocated to {}", to));
    Ok(())
}

pub async fn handle_merge(app: &App, dir: &Path, source: &str, revisions: Option<&str>, dry_run: bool, record_only: bool, accept: Option<&str>) -> AppResult<()> {
    let opts = MergeOptions {
        revisions: revisions.map(parse_revision_range).transpose()?,
        dry_run,
        record_only,
        ignore_ancestry: false,
        accept: accept.map(ConflictAccept::parse),
    };
    let command = SvnCommand::merge(source, None, &opts).in_dir(dir);
    let output = run_with_progress(app, command, &format!("Merging {}", source)).await?;
    if dry_run {
        app.ui.plain(&output);
        return Ok(());
    }
    app.ui.success(&format!("Merged {}", source));
    resolve_conflicts(app, dir).await
}

pub async fn handle_mkdir(app: &App, dir: &Path, targets: &[String], message: Option<&str>, parents: bool) -> AppResult<()> {
    let command = SvnCommand::mkdir(&as_strs(targets), message, parents).in_dir(dir);
    run_with_progress(app, command, "Creating directories").await?;
    app.ui.success(&format!("Created {}", targets.join(", ")));
    Ok(())
}

pub async fn handle_move(app: &App, dir: &Path, source: &str, destination: &str, force: bool, parents: bool) -> AppResult<()> {
    let command = SvnCommand::move_to(source, destination, force, parents).in_dir(dir);
    run_with_progress(app, command, "Moving").await?;
    app.ui.success(&format!("Moved {} to {}", source, destination));
    Ok(())
}

pub async fn handle_copy(app: &App, dir: &Path, source: &str, destination: &str, parents: bool) -> AppResult<()> {
    let command = SvnCommand::copy(source, destination, parents).in_dir(dir);
    run_with_progress(app, command, "Copying").await?;
    app.ui.success(&format!("Copied {} to {}", source, destination));
    Ok(())
}

/// 属性操作
pub enum PropAction {
    List { target: Option<String> },
    Get { name: String, target: Option<String>, revision: Option<String> },
    Set { name: String, value: String, targets: Vec<String>, recursive: bool },
    Delete { name: String, target: Option<String>, recursive: bool },
}

pub async fn handle_prop(app: &App, dir: &Path, action: PropAction) -> AppResult<()> {
    match action {
        PropAction::List { target } => {
            let command = SvnCommand::proplist(target.as_deref(), true).in_dir(dir);
            let output = app.svn.execute_with(&command, &app.cancel, &mut app.ui.observer()).await?.into_output()?;
            app.ui.finish_step();
            app.ui.plain(&output);
        }
        PropAction::Get { name, target, revision } => {
            let command = SvnCommand::propget(&name, target.as_deref(), parse_optional_revision(revision.as_deref())?).in_dir(dir);
            let output = app.svn.execute(&command).await?.into_output()?;
            app.ui.plain(&output);
        }
        PropAction::Set { name, value, targets, recursive } => {
            let command = SvnCommand::propset(&name, &value, &as_strs(&targets), recursive).in_dir(dir);
            run_with_progress(app, command, &format!("Setting {}", name)).await?;
            app.ui.success(&format!("Property '{}' set", name));
        }
        PropAction::Delete { name, target, recursive } => {
            let command = SvnCommand::propdel(&name, target.as_deref(), recursive).in_dir(dir);
            run_with_progress(app, command, &format!("Deleting {}", name)).await?;
            app.ui.success(&format!("Property '{}' deleted", name));
        }
    }
    Ok(())
}
