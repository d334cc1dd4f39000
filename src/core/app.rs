use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::{core::{config::Settings, context::SvnContext, error::AppResult, svn::SvnService}, ui::display::AppUI};

/// 入口处构造一次，传给所有指令
pub struct App {
    pub ui: AppUI,
    pub settings: Settings,
    pub svn: SvnService,
    /// Ctrl-C 时取消正在运行的 svn
    pub cancel: CancellationToken,
    settings_path: Option<PathBuf>,
}

impl App {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        App {
            ui: AppUI::new(),
            svn: SvnService::new(settings.clone()),
            settings,
            cancel: CancellationToken::new(),
            settings_path,
        }
    }

    /// Settings from the default location, or the defaults.
    pub fn from_default_settings() -> Self {
        let path = Settings::default_path();
        let settings = path.as_deref().map(Settings::load).unwrap_or_default();
        App::new(settings, path)
    }

    pub async fn context(&self, dir: &Path) -> AppResult<SvnContext> {
        SvnContext::load(&self.svn, dir, &self.cancel).await
    }

    /// 记录最近使用的工作副本，保存失败只记录日志
    pub fn remember_working_copy(&mut self, dir: &Path) {
        self.settings.add_recent_working_copy(&dir.to_string_lossy());
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save(path) {
                log::warn!("cannot save settings to {}: {}", path.display(), e);
            }
        }
    }
}
