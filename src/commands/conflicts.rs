//! ### 冲突处理
//!
//! 列出冲突，逐个交互式解决，或直接按 `--accept` 解决。

use std::path::Path;

use crossterm::style::Stylize;
use svnkit::{
    core::{
        app::App,
        command::{ConflictAccept, SvnCommand, UpdateOptions},
        error::{AppError, AppResult},
    },
    parse::conflict::{ConflictItem, ConflictKind},
};

use crate::commands::utils::run_with_progress;

/// 列出所有冲突以及对应的 mine/base/theirs 文件
pub async fn handle_conflicts(app: &App, dir: &Path) -> AppResult<()> {
    app.ui.update_step("Looking for conflicts");
    let items = app.svn.conflicts(dir, &app.cancel).await?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let files = app.svn.conflict_files(dir, &item.path, &app.cancel).await?;
        rows.push((item, files));
    }
    app.ui.finish_step();
    app.ui.show_conflicts(&rows);
    Ok(())
}

/// 解决指定路径的冲突；未指定路径时处理全部冲突
pub async fn handle_resolve(app: &App, dir: &Path, path: Option<&str>, accept: Option<&str>) -> AppResult<()> {
    match (path, accept) {
        (Some(path), Some(accept)) => {
            let accept = ConflictAccept::parse(accept);
            if let ConflictAccept::Unrecognized(raw) = &accept {
                return Err(AppError::Validation(format!("Unknown --accept value '{}'", raw)));
            }
            let command = SvnCommand::resolve(path, &accept, false).in_dir(dir);
            run_with_progress(app, command, &format!("Resolving {}", path)).await?;
            app.ui.success(&format!("Resolved {} using {}", path, accept.as_str()));
            Ok(())
        }
        (Some(path), None) => {
            let items = app.svn.conflicts(dir, &app.cancel).await?;
            match items.into_iter().find(|i| i.path == path) {
                Some(item) => resolve_single_conflict(app, dir, &item).await,
                None => {
                    app.ui.info(&format!("{} is not in conflict", path));
                    Ok(())
                }
            }
        }
        (None, Some(_)) => Err(AppError::Validation("--accept needs a path".to_string())),
        (None, None) => resolve_conflicts(app, dir).await,
    }
}

/// 获取冲突文件列表，逐个解决
pub async fn resolve_conflicts(app: &App, dir: &Path) -> AppResult<()> {
    let conflicted = app.svn.conflicts(dir, &app.cancel).await?;

    if !conflicted.is_empty() {
        app.ui.warn(&format!("Conflict detected in {} item(s). Need to resolve them", conflicted.len()));
        for item in &conflicted {
            resolve_single_conflict(app, dir, item).await?;
        }
        app.ui.success("All conflicts resolved");
    }
    Ok(())
}

/// 交互式解决单个冲突
async fn resolve_single_conflict(app: &App, dir: &Path, item: &ConflictItem) -> AppResult<()> {
    if item.kind == ConflictKind::Incomplete {
        return Err(AppError::Validation(
            "Working copy is in an incomplete state. Please run 'svnkit cleanup' and try again.".to_string(),
        ));
    }

    let choices = vec![
        "Keep My Version (Keep Local Changes)",
        "Discard My Version (Use Incoming Changes)",
        "Postpone",
    ];
    let prompt = format!("Conflict ({}) in: {}", kind_label(&item.kind), item.path.clone().yellow().bold());
    let selection = app.ui.selector(&prompt, choices)?;
    if selection == 2 {
        app.ui.info(&format!("Postponed {}", item.path));
        return Ok(());
    }
    let keep_mine = selection == 0;
    let path = item.path.as_str();

    match item.kind {
        ConflictKind::Standard | ConflictKind::Property => {
            let accept = if keep_mine { ConflictAccept::MineFull } else { ConflictAccept::TheirsFull };
            run_with_progress(app, SvnCommand::resolve(path, &accept, false).in_dir(dir), "Resolving").await?;
        }
        ConflictKind::Tree => {
            run_with_progress(app, SvnCommand::resolve(path, &ConflictAccept::Working, false).in_dir(dir), "Resolving").await?;
            if keep_mine {
                run_with_progress(app, SvnCommand::add(&[path], true, true, false).in_dir(dir), "Re-adding").await?;
            } else {
                run_with_progress(app, SvnCommand::revert(&[path], true).in_dir(dir), "Reverting").await?;
                run_with_progress(app, SvnCommand::update(&[path], &UpdateOptions::default()).in_dir(dir), "Updating").await?;
            }
        }
        ConflictKind::Obstructed => {
            if keep_mine {
                run_with_progress(app, SvnCommand::delete(&[path], true, true).in_dir(dir), "Unscheduling").await?;
                run_with_progress(app, SvnCommand::add(&[path], true, true, false).in_dir(dir), "Re-adding").await?;
            } else {
                let full = dir.join(path);
                if full.is_dir() {
                    std::fs::remove_dir_all(&full)?;
                } else if full.exists() {
                    std::fs::remove_file(&full)?;
                }
                run_with_progress(app, SvnCommand::revert(&[path], false).in_dir(dir), "Reverting").await?;
                run_with_progress(app, SvnCommand::update(&[path], &UpdateOptions::default()).in_dir(dir), "Updating").await?;
            }
        }
        ConflictKind::Incomplete => {}
    }

    app.ui.success(&format!("Resolved {}", path));
    Ok(())
}

fn kind_label(kind: &ConflictKind) -> &'static str {
    match kind {
        ConflictKind::Standard => "text",
        ConflictKind::Tree => "tree",
        ConflictKind::Property => "property",
        ConflictKind::Obstructed => "obstructed",
        ConflictKind::Incomplete => "incomplete",
    }
}
