//! UI 相关的数据模型

use std::time;

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

/// log 表格中的一行
pub struct LogRow {
    pub revision: String,
    pub author: String,
    pub date: String,
    pub message: String,
    /// 工作副本当前所在的版本
    pub is_current: bool,
    /// 通过合并引入的版本
    pub is_merged: bool,
}

pub struct SpinnerInfo {
    pub pb: ProgressBar,
    _start_time: time::Instant,
    _steady_tick: u64,
}

impl SpinnerInfo {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        let steady_tick = 50;
        let frames = ["[=   ]","[==  ]","[=== ]","[ ===]","[  ==]","[   =]","[    ]","[   =]","[  ==]","[ ===]","[====]","[=== ]","[==  ]","[=   ]", "[    ]","    "];

        let style = ProgressStyle::default_spinner()
            .tick_strings(&frames)
            .template("{spinner:.blue.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);

        pb.enable_steady_tick(std::time::Duration::from_millis(steady_tick));
        SpinnerInfo {
            pb,
            _start_time: time::Instant::now(),
            _steady_tick: steady_tick,
        }
    }

    pub fn get_current_message(&self) -> String {
        format!("{} {}", "[WAIT]".cyan().bold(), self.pb.message())
    }
}

impl Default for SpinnerInfo {
    fn default() -> Self {
        Self::new()
    }
}
