use std::{cell::RefCell, io};

use comfy_table::{Cell, ContentArrangement, Table, presets};
use crossterm::{cursor, execute, style::{self, SetForegroundColor, Stylize}, terminal};
use dialoguer::{Select, theme};
use unicode_width::UnicodeWidthStr;

use crate::{
    core::{error::{AppError, AppResult}, path::display_url, result::{OutputLine, OutputStream}, utils::format_relative_time},
    parse::{
        blame::BlameLine,
        conflict::{ConflictFiles, ConflictItem, ConflictKind},
        diff::{DiffDocument, LineType},
        info::InfoEntry,
        list::ListEntry,
        models::SvnDate,
        status::{StatusEntry, StatusKind},
    },
    ui::models::{LogRow, SpinnerInfo},
};

/// 隐藏光标，离开作用域时恢复
pub struct CursorGuard;

impl CursorGuard {
    pub fn new() -> Self {
        execute!(io::stdout(), crossterm::cursor::Hide).ok();
        execute!(io::stderr(), crossterm::cursor::Hide).ok();
        CursorGuard
    }
}

impl Default for CursorGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), crossterm::cursor::Show).ok();
        execute!(io::stderr(), crossterm::cursor::Show).ok();
    }
}

pub struct AppUI {
    spinner: RefCell<Option<SpinnerInfo>>,
    dialoguer_color_theme: theme::ColorfulTheme,
    _cursor_guard: CursorGuard,
}

impl Default for AppUI {
    fn default() -> Self {
        Self::new()
    }
}

impl AppUI {
    pub fn new() -> Self {
        let mut color_theme = dialoguer::theme::ColorfulTheme::default();
        color_theme.success_prefix = dialoguer::console::style(String::from("[ OK ]")).green().bold().bright();
        color_theme.error_prefix = dialoguer::console::style(String::from("[ERR!]")).red().bright().bold();
        color_theme.prompt_prefix = dialoguer::console::style(String::from("[INFO]")).blue().bright().bold();
        color_theme.active_item_style = dialoguer::console::Style::new().for_stderr().green();
        color_theme.success_suffix = dialoguer::console::style(String::new());
        color_theme.prompt_style = dialoguer::console::Style::new().for_stderr();
        color_theme.prompt_suffix = dialoguer::console::style(String::new()).for_stderr().black().bright();
        color_theme.active_item_prefix = dialoguer::console::style(">".to_string()).for_stderr().green();

        AppUI {
            spinner: RefCell::new(None),
            dialoguer_color_theme: color_theme,
            _cursor_guard: CursorGuard::new(),
        }
    }

    /// 打印普通信息
    pub fn info(&self, msg: &str) {
        self.print_safe(format!("{} {}", "[INFO]".blue().bold(), msg));
    }

    /// 打印警告信息
    pub fn warn(&self, msg: &str) {
        let style_prefix = format!("{}", SetForegroundColor(style::Color::Yellow));
        let reset_all = format!("{}", style::Attribute::Reset);
        let reset_fg = format!("{}", SetForegroundColor(style::Color::Reset));
        let restore_patch = format!("{}{}", reset_all, style_prefix);
        let fixed_msg = msg.replace(&reset_all, &restore_patch).replace(&reset_fg, &restore_patch);

        self.print_safe(format!("{} {}{}{}", "[WARN]".dark_yellow().bold(), style_prefix, fixed_msg, reset_all));
    }

    /// 打印成功信息
    pub fn success(&self, msg: &str) {
        self.finish_step();
        self.print_safe(format!("{} {}", "[ OK ]".green().bold(), msg));
    }

    /// 打印错误
    pub fn error(&self, msg: &str) {
        self.finish_step();

        let style_prefix = format!("{}", SetForegroundColor(style::Color::Red));
        let reset_all = format!("{}", style::Attribute::Reset);
        let reset_fg = format!("{}", SetForegroundColor(style::Color::Reset));
        let restore_patch = format!("{}{}", reset_all, style_prefix);
        let fixed_msg = msg.replace(&reset_all, &restore_patch).replace(&reset_fg, &restore_patch);

        self.print_safe(format!("{} {}{}{}", "[ERR!]".red().bold(), style_prefix, fixed_msg, reset_all));
    }

    /// 更新 spinner
    pub fn update_step(&self, msg: &str) {
        if let Some(pb_info) = self.spinner.borrow().as_ref() {
            pb_info.pb.set_message(msg.to_string());
            return;
        }
        self.start_step(msg);
    }

    /// 结束 spinner
    pub fn finish_step(&self) {
        if let Some(pb_info) = self.spinner.borrow_mut().take() {
            pb_info.pb.finish_and_clear();
        }
    }

    /// 把 svn 的实时输出显示在 spinner 上，stderr 直接打印
    pub fn observer(&self) -> impl FnMut(&OutputLine) + '_ {
        move |line: &OutputLine| match line.stream {
            OutputStream::Stdout => {
                let text = line.text.trim();
                if !text.is_empty() {
                    self.update_step(text);
                }
            }
            OutputStream::Stderr => self.warn(&line.text),
        }
    }

    /// status 显示
    pub fn show_status(&self, entries: &[StatusEntry]) {
        if entries.is_empty() {
            self.success("Working copy is clean");
            return;
        }

        let mut table = self.create_clean_table();
        table.set_header([
            Cell::new("  ST").fg(comfy_table::Color::DarkGrey),
            Cell::new("REV").fg(comfy_table::Color::DarkGrey),
            Cell::new("PATH").fg(comfy_table::Color::DarkGrey),
        ]);
        for column in table.column_iter_mut() {
            column.set_padding((0, 2));
        }

        for entry in entries {
            let flags = format!(
                "  {}{}{}{}",
                entry.item.code(),
                entry.props.code(),
                if entry.tree_conflicted { 'C' } else { ' ' },
                if entry.repos_status.is_some() { '*' } else { ' ' },
            );
            let color = match &entry.item {
                StatusKind::Added => comfy_table::Color::Green,
                StatusKind::Deleted | StatusKind::Missing => comfy_table::Color::Red,
                StatusKind::Modified | StatusKind::Replaced | StatusKind::Merged => comfy_table::Color::Yellow,
                StatusKind::Conflicted | StatusKind::Obstructed | StatusKind::Incomplete => comfy_table::Color::Magenta,
                _ if entry.is_conflicted() => comfy_table::Color::Magenta,
                _ => comfy_table::Color::DarkGrey,
            };
            let revision = entry.revision.map(|r| format!("r{}", r)).unwrap_or_default();
            let mut path = entry.path.clone();
            if let Some(changelist) = &entry.changelist {
                path = format!("{} [{}]", path, changelist);
            }
            table.add_row([
                Cell::new(flags).fg(color).add_attribute(comfy_table::Attribute::Bold),
                Cell::new(revision).fg(comfy_table::Color::DarkGrey),
                Cell::new(path).fg(color),
            ]);
        }

        self.print_safe(format!("{}", table));
    }

    /// log 显示
    pub fn show_log(&self, log_entries: Vec<LogRow>) {
        let mut table = self.create_clean_table();

        let hander_cell1 = Cell::new("  REV").fg(comfy_table::Color::DarkGrey).add_attribute(comfy_table::Attribute::Bold);
        let hander_cell2 = Cell::new("AUTHOR").fg(comfy_table::Color::DarkGrey).add_attribute(comfy_table::Attribute::Bold);
        let hander_cell3 = Cell::new("DATE").fg(comfy_table::Color::DarkGrey).add_attribute(comfy_table::Attribute::Bold);
        let hander_cell4 = Cell::new("MESSAGE").fg(comfy_table::Color::DarkGrey).add_attribute(comfy_table::Attribute::Bold);

        table.set_header([hander_cell1, hander_cell2, hander_cell3, hander_cell4]);

        for column in table.column_iter_mut() {
            column.set_padding((0, 3));
        }

        for log in log_entries {
            // 1. 版本号
            let mut c_rev = if log.is_merged {
                Cell::new(log.revision).add_attribute(comfy_table::Attribute::Italic).fg(comfy_table::Color::DarkCyan)
            } else {
                Cell::new(log.revision).fg(comfy_table::Color::Yellow)
            };

            c_rev = if log.is_current {
                c_rev.add_attribute(comfy_table::Attribute::Bold).fg(comfy_table::Color::Green)
            } else {
                c_rev
            };

            let c_author = Cell::new(log.author).fg(comfy_table::Color::Cyan);
            // 时间 灰色
            let c_date = Cell::new(log.date).fg(comfy_table::Color::DarkGrey);

            let c_msg = if log.is_merged {
                Cell::new(log.message).add_attribute(comfy_table::Attribute::Italic)
            } else {
                Cell::new(log.message).fg(comfy_table::Color::Yellow)
            };

            table.add_row([c_rev, c_author, c_date, c_msg]);
        }

        self.print_safe(format!("{}", table));
    }

    /// diff 显示
    pub fn show_diff(&self, documents: &[DiffDocument]) {
        if documents.is_empty() {
            self.info("No differences");
            return;
        }

        let mut out = String::new();
        for file in documents.iter().flat_map(|d| d.files.iter()) {
            let summary = format!(
                "{} {} {}",
                file.display_path().bold(),
                format!("+{}", file.addition_count()).green(),
                format!("-{}", file.deletion_count()).red(),
            );
            out.push_str(&summary);
            out.push('\n');

            if file.is_binary {
                out.push_str(&format!("{}\n", "  (binary file)".dark_grey().italic()));
                continue;
            }

            for line in &file.lines {
                let number = |n: Option<u32>| n.map(|n| format!("{:>5}", n)).unwrap_or_else(|| " ".repeat(5));
                let gutter = format!("{} {} ", number(line.old_line_number), number(line.new_line_number)).dark_grey();
                let rendered = match line.line_type {
                    LineType::FileHeader => continue,
                    LineType::Header => {
                        if !line.content.starts_with("@@") {
                            continue;
                        }
                        format!("{}", line.content.as_str().cyan())
                    }
                    LineType::Added => format!("{}{}", gutter, format!("+{}", line.content).green()),
                    LineType::Removed => format!("{}{}", gutter, format!("-{}", line.content).red()),
                    LineType::Context => format!("{} {}", gutter, line.content),
                };
                out.push_str(&rendered);
                out.push('\n');
            }
            out.push('\n');
        }

        self.print_safe(out.trim_end().to_string());
    }

    /// blame 显示
    pub fn show_blame(&self, lines: &[BlameLine]) {
        let rev_width = lines
            .iter()
            .filter_map(|l| l.revision)
            .map(|r| r.to_string().len() + 1)
            .max()
            .unwrap_or(2);
        let author_width = lines
            .iter()
            .filter_map(|l| l.author.as_deref())
            .map(|a| a.width())
            .max()
            .unwrap_or(1);

        let mut out = String::new();
        for line in lines {
            let revision = line.revision.map(|r| format!("r{}", r)).unwrap_or_else(|| "-".to_string());
            let author = line.author.as_deref().unwrap_or("-");
            let padding = " ".repeat(author_width.saturating_sub(author.width()));
            out.push_str(&format!(
                "{} {} {}{} {}\n",
                format!("{:>5}", line.line_number).dark_grey(),
                format!("{:>rev_width$}", revision, rev_width = rev_width).yellow(),
                author.cyan(),
                padding,
                line.content,
            ));
        }
        self.print_safe(out.trim_end().to_string());
    }

    /// info 显示
    pub fn show_info(&self, entries: &[InfoEntry]) {
        for (i, info) in entries.iter().enumerate() {
            if i > 0 {
                self.print_safe(String::new());
            }
            let mut table = self.create_clean_table();
            for column in table.column_iter_mut() {
                column.set_padding((0, 2));
            }

            let mut row = |key: &str, value: Option<String>| {
                if let Some(value) = value {
                    table.add_row([Cell::new(key).fg(comfy_table::Color::DarkGrey), Cell::new(value)]);
                }
            };
            row("Path", Some(info.path.clone()));
            row("Kind", Some(format!("{:?}", info.kind).to_lowercase()));
            row("URL", info.url.as_deref().map(display_url));
            row("Relative URL", info.relative_url.as_deref().map(display_url));
            row("Repository Root", info.repository_root.as_deref().map(display_url));
            row("Repository UUID", info.repository_uuid.clone());
            row("Working Copy Root", info.working_copy_root.clone());
            row("Revision", info.revision.map(|r| format!("r{}", r)));
            row("Last Changed Rev", info.last_changed_revision.map(|r| format!("r{}", r)));
            row("Last Changed Author", info.last_changed_author.clone());
            row("Last Changed Date", info.last_changed_date.as_ref().map(format_date));
            if let Some(lock) = &info.lock {
                row("Locked By", lock.owner.clone());
                row("Lock Comment", lock.comment.clone());
            }
            if info.tree_conflicted {
                row("Tree Conflict", Some("yes".to_string()));
            }
            if let Some(conflict) = &info.conflict {
                row("Conflict Mine", conflict.mine.as_ref().map(|p| p.display().to_string()));
                row("Conflict Base", conflict.base.as_ref().map(|p| p.display().to_string()));
                row("Conflict Theirs", conflict.theirs.as_ref().map(|p| p.display().to_string()));
            }

            self.print_safe(format!("{}", table));
        }
    }

    /// list 显示
    pub fn show_list(&self, entries: &[ListEntry]) {
        let mut table = self.create_clean_table();
        table.set_header([
            Cell::new("  NAME").fg(comfy_table::Color::DarkGrey),
            Cell::new("REV").fg(comfy_table::Color::DarkGrey),
            Cell::new("AUTHOR").fg(comfy_table::Color::DarkGrey),
            Cell::new("SIZE").fg(comfy_table::Color::DarkGrey),
        ]);
        for column in table.column_iter_mut() {
            column.set_padding((0, 3));
        }

        for entry in entries {
            let name = if entry.is_dir() {
                Cell::new(format!("  {}/", entry.name)).fg(comfy_table::Color::Blue).add_attribute(comfy_table::Attribute::Bold)
            } else {
                Cell::new(format!("  {}", entry.name))
            };
            let locked = if entry.lock.is_some() { " (locked)" } else { "" };
            table.add_row([
                name,
                Cell::new(entry.revision.map(|r| format!("r{}", r)).unwrap_or_default()).fg(comfy_table::Color::Yellow),
                Cell::new(format!("{}{}", entry.author.as_deref().unwrap_or(""), locked)).fg(comfy_table::Color::Cyan),
                Cell::new(entry.size.map(|s| s.to_string()).unwrap_or_default()).fg(comfy_table::Color::DarkGrey),
            ]);
        }
        self.print_safe(format!("{}", table));
    }

    /// 冲突列表显示
    pub fn show_conflicts(&self, conflicts: &[(ConflictItem, ConflictFiles)]) {
        if conflicts.is_empty() {
            self.success("No conflicts");
            return;
        }

        let mut table = self.create_clean_table();
        table.set_header([
            Cell::new("  KIND").fg(comfy_table::Color::DarkGrey),
            Cell::new("PATH").fg(comfy_table::Color::DarkGrey),
            Cell::new("FILES").fg(comfy_table::Color::DarkGrey),
        ]);
        for column in table.column_iter_mut() {
            column.set_padding((0, 3));
        }

        for (item, files) in conflicts {
            let kind = match item.kind {
                ConflictKind::Standard => "text",
                ConflictKind::Tree => "tree",
                ConflictKind::Property => "property",
                ConflictKind::Obstructed => "obstructed",
                ConflictKind::Incomplete => "incomplete",
            };
            let name = |p: &Option<std::path::PathBuf>| {
                p.as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            let detail = if files.is_empty() {
                String::new()
            } else {
                format!("mine: {}  base: {}  theirs: {}", name(&files.mine), name(&files.base), name(&files.theirs))
            };
            table.add_row([
                Cell::new(format!("  {}", kind)).fg(comfy_table::Color::Magenta),
                Cell::new(&item.path).fg(comfy_table::Color::Yellow),
                Cell::new(detail).fg(comfy_table::Color::DarkGrey),
            ]);
        }
        self.print_safe(format!("{}", table));
    }

    /// 原样输出 (cat / raw diff)
    pub fn plain(&self, text: &str) {
        self.print_safe(text.to_string());
    }

    /// 选择 yes/no
    pub fn selector_yes_or_no(&self, prompt: &str) -> AppResult<bool> {
        Ok(self.selector(prompt, vec!["Yes", "No"])? == 0)
    }

    /// 选择器，返回选中项的索引
    pub fn selector(&self, prompt: &str, items: Vec<&str>) -> AppResult<usize> {
        if let Some(pb_info) = &self.spinner.borrow().as_ref() {
            let message = pb_info.get_current_message();
            return pb_info.pb.suspend(|| self.get_selector_result(prompt, items, Some(&message)));
        }
        self.get_selector_result(prompt, items, None)
    }

    /// 输入提交信息，为空时视为取消
    pub fn input_commit_message(&self) -> AppResult<String> {
        let msg = self.input("Input commit message:")?;
        if msg.trim().is_empty() {
            return Err(AppError::OperationCancelled);
        }
        Ok(msg)
    }

    /// 开启一个 Input，返回输入结果，可以为空 String
    pub fn input(&self, prompt: &str) -> AppResult<String> {
        if let Some(pb_info) = &self.spinner.borrow().as_ref() {
            let message = pb_info.get_current_message();
            return pb_info.pb.suspend(|| self.get_input_result(prompt, Some(&message)));
        }
        self.get_input_result(prompt, None)
    }

    fn get_input_result(&self, prompt: &str, message: Option<&str>) -> AppResult<String> {
        let mut stderr_io = io::stderr();
        execute!(stderr_io, crossterm::style::Print("\n")).ok();
        if let Some(msg) = message {
            execute!(stderr_io, crossterm::style::Print(msg)).ok();
            execute!(stderr_io, cursor::MoveLeft(msg.width() as u16)).ok();
        }
        execute!(stderr_io, cursor::MoveUp(1)).ok();
        execute!(stderr_io, crossterm::cursor::Show).ok();

        let result = dialoguer::Input::<String>::with_theme(&self.dialoguer_color_theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AppError::Validation(e.to_string()));
        execute!(stderr_io, crossterm::cursor::Hide).ok();
        result
    }

    fn get_selector_result(&self, prompt: &str, items: Vec<&str>, message: Option<&str>) -> AppResult<usize> {
        let mut stderr_io = io::stderr();
        let menu_height = items.len() + 1;
        let (_cur_col, cur_row) = cursor::position().unwrap_or((0, 0));
        let (_, term_rows) = terminal::size().unwrap_or((80, 24));
        let available_lines_below = term_rows.saturating_sub(cur_row).saturating_sub(1);
        let will_scroll = available_lines_below < menu_height as u16;

        for _ in 0..menu_height {
            execute!(stderr_io, crossterm::style::Print("\n")).ok();
        }

        if let Some(msg) = message {
            execute!(stderr_io, crossterm::style::Print(msg)).ok();
            execute!(stderr_io, cursor::MoveLeft(msg.width() as u16)).ok();
        }
        execute!(stderr_io, cursor::MoveUp(menu_height as u16)).ok();

        println!("{} {}", "[INFO]".blue().bold(), prompt);
        let result = Select::with_theme(&self.dialoguer_color_theme)
            .default(0)
            .items(&items)
            .interact()
            .map_err(|e| AppError::Validation(e.to_string()));

        execute!(stderr_io, cursor::MoveDown(items.len() as u16)).ok();
        execute!(stderr_io, terminal::Clear(terminal::ClearType::CurrentLine)).ok();

        if will_scroll {
            execute!(stderr_io, terminal::ScrollDown(items.len() as u16)).ok();
        } else {
            execute!(stderr_io, cursor::MoveUp(items.len() as u16)).ok();
        }

        if let Ok(index) = &result {
            println!("{} Choose: {}", "[ OK ]".green().bold(), items[*index]);
        }
        execute!(stderr_io, cursor::Hide).ok();

        result
    }

    /// 开启一个 spinner
    fn start_step(&self, msg: &str) {
        let has_spinner = self.spinner.borrow().is_some();
        if has_spinner {
            self.finish_step();
        }

        let spinner_info = SpinnerInfo::new();
        spinner_info.pb.set_message(msg.to_string());
        *self.spinner.borrow_mut() = Some(spinner_info);
    }

    fn print_safe(&self, msg: String) {
        if let Some(pb_info) = &self.spinner.borrow().as_ref() {
            pb_info.pb.suspend(|| println!("{}", msg));
        } else {
            println!("{}", msg);
        }
    }

    /// 创建一个无边框且动态宽度的表格
    fn create_clean_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING) // 无边框
            .set_content_arrangement(ContentArrangement::Dynamic); // 动态宽度
        table
    }
}

fn format_date(date: &SvnDate) -> String {
    match &date.parsed {
        Some(parsed) => format_relative_time(parsed),
        None => date.raw.clone(),
    }
}

/// 日期列：能解析时显示相对时间，否则原样显示
pub fn date_cell(date: Option<&SvnDate>) -> String {
    date.map(format_date).unwrap_or_default()
}
