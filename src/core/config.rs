//! ### 应用设置
//! 保存在 `{config_dir}/svnkit/settings.json`

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::{error::AppResult, path::{normalize_path, paths_equal}};

const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
const DEFAULT_MAX_RECENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// svn 可执行文件路径，为空时从 PATH 中查找
    pub svn_path: Option<PathBuf>,
    /// 单个命令的最长执行时间，为空时不限制
    pub timeout_secs: Option<u64>,
    /// 轮询进程状态的间隔
    pub poll_interval_ms: u64,
    /// 追加 `--non-interactive`，避免 svn 等待输入
    pub non_interactive: bool,
    /// 最近打开的工作副本，最新的在前
    pub recent_working_copies: Vec<String>,
    pub max_recent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            svn_path: None,
            timeout_secs: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            non_interactive: true,
            recent_working_copies: Vec::new(),
            max_recent: DEFAULT_MAX_RECENT,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("svnkit").join("settings.json"))
    }

    /// Read settings from `path`. A missing file gives the defaults; a
    /// malformed one is logged and also gives the defaults, so a broken
    /// settings file never blocks version-control work.
    pub fn load(path: &Path) -> Settings {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("cannot read settings {}: {}", path.display(), e);
                }
                return Settings::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring malformed settings {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// 实际执行的程序名
    pub fn svn_program(&self) -> String {
        match &self.svn_path {
            Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().to_string(),
            _ => "svn".to_string(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// 记录最近使用的工作副本，去重后放在最前面
    pub fn add_recent_working_copy(&mut self, path: &str) {
        let normalized = normalize_path(path);
        self.recent_working_copies.retain(|p| !paths_equal(p, &normalized));
        self.recent_working_copies.insert(0, normalized);
        self.recent_working_copies.truncate(self.max_recent.max(1));
    }
}
