//! 工具函数集合

use std::path::Path;

use svnkit::{
    core::{app::App, command::SvnCommand, error::{AppError, AppResult}, utils::auto_decode},
    parse::{log::LogEntry, status::{StatusEntry, StatusKind}},
    ui::{display::date_cell, models::LogRow},
};

/// 执行会修改工作副本的命令，svn 的输出实时显示在 spinner 上
pub async fn run_with_progress(app: &App, command: SvnCommand, step: &str) -> AppResult<String> {
    app.ui.update_step(step);
    let result = {
        let mut observer = app.ui.observer();
        app.svn.execute_with(&command, &app.cancel, &mut observer).await
    };
    app.ui.finish_step();
    result?.into_output()
}

pub fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

/// 读取本地文件，自动识别编码
pub fn read_text(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Validation(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(auto_decode(&bytes))
}

/// 是否有需要提交的改动
pub fn has_local_changes(entries: &[StatusEntry]) -> bool {
    entries.iter().any(|e| {
        !matches!(
            e.item,
            StatusKind::None | StatusKind::Normal | StatusKind::Unversioned | StatusKind::Ignored | StatusKind::External
        ) || e.props == StatusKind::Modified
    })
}

/// 转换为 log 表格的行，合并进来的版本缩进显示在下面
pub fn to_log_rows(entries: &[LogEntry], current: Option<u64>) -> Vec<LogRow> {
    let mut rows = Vec::new();
    for entry in entries {
        let is_current = current == Some(entry.revision);
        rows.push(LogRow {
            revision: format!("{} r{}", if is_current { ">" } else { " " }, entry.revision),
            author: entry.author.clone().unwrap_or_else(|| "(no author)".to_string()),
            date: date_cell(entry.date.as_ref()),
            message: entry.message.lines().next().unwrap_or("").to_string(),
            is_current,
            is_merged: false,
        });
        for merged in &entry.merged {
            rows.push(LogRow {
                revision: format!("   ↳ r{}", merged.revision),
                author: merged.author.clone().unwrap_or_default(),
                date: date_cell(merged.date.as_ref()),
                message: merged.message.lines().next().unwrap_or("").to_string(),
                is_current: false,
                is_merged: true,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use svnkit::parse::{log::parse_log_text, status::parse_status_text};

    #[test]
    fn test_has_local_changes() {
        assert!(!has_local_changes(&parse_status_text("?       new.txt\nX       ext\n")));
        assert!(has_local_changes(&parse_status_text("?       new.txt\nM       a.txt\n")));
        assert!(has_local_changes(&parse_status_text(" M      dir\n")));
    }

    #[test]
    fn test_log_rows_mark_current_revision() {
        let entries = parse_log_text(
            "----\nr5 | bob | 2024-01-01 00:00:00 +0000 (Mon, 01 Jan 2024) | 2 lines\n\nsubject\nbody\n----\nr4 | bob | 2024-01-01 00:00:00 +0000 (Mon, 01 Jan 2024) | 1 line\n\nolder\n",
        );
        let rows = to_log_rows(&entries, Some(4));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].message, "subject");
        assert!(!rows[0].is_current);
        assert!(rows[1].is_current);
        assert_eq!(rows[1].revision, "> r4");
    }
}
