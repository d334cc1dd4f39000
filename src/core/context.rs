//! ### SVN 上下文相关操作
//! 获取当前工作副本和仓库相关信息

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::parse::info::InfoEntry;

use super::{error::{AppError, AppResult}, path::{display_url, join_url, normalize_url}, svn::SvnService};

/// 工作副本在标准布局 (`trunk` / `branches` / `tags`) 中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchLocation {
    Trunk,
    Branch(String),
    Tag(String),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SvnContext {
    /// 本地工作副本根目录
    working_copy_root: PathBuf,
    /// 工作副本对应的 URL
    url: String,
    /// 仓库根 URL
    /// {repo_url}
    repo_root_url: String,
    /// 项目 URL，即 trunk/branches/tags 的上一级
    /// {repo_url}/{project_path}
    project_root_url: String,
    location: BranchLocation,
    revision: Option<u64>,
}

impl SvnContext {
    /// 读取 `dir` 的 svn info
    pub async fn load(svn: &SvnService, dir: &Path, cancel: &CancellationToken) -> AppResult<Self> {
        let entries = svn.info(dir, None, None, cancel).await?;
        let info = entries
            .first()
            .ok_or_else(|| AppError::Validation(format!("{} is not a working copy", dir.display())))?;
        SvnContext::from_info(dir, info)
    }

    pub fn from_info(dir: &Path, info: &InfoEntry) -> AppResult<Self> {
        let url = info
            .url
            .as_deref()
            .map(normalize_url)
            .ok_or_else(|| AppError::Validation("svn info did not report a URL".to_string()))?;
        let repo_root_url = info.repository_root.as_deref().map(normalize_url).unwrap_or_else(|| url.clone());

        let relative = url.strip_prefix(&repo_root_url).unwrap_or("").trim_start_matches('/');
        let (project, location) = split_layout(relative);

        Ok(SvnContext {
            working_copy_root: info.working_copy_root.as_deref().map(PathBuf::from).unwrap_or_else(|| dir.to_path_buf()),
            project_root_url: join_url(&repo_root_url, &project),
            url,
            repo_root_url,
            location,
            revision: info.revision,
        })
    }

    pub fn working_copy_root(&self) -> &Path {
        &self.working_copy_root
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 获取当前仓库 URL
    /// - {repo_url}
    pub fn get_repo_root_url(&self) -> &str {
        &self.repo_root_url
    }

    /// - {repo_url}/{project}
    pub fn get_project_root_url(&self) -> &str {
        &self.project_root_url
    }

    /// - {repo_url}/{project}/trunk
    pub fn get_trunk_url(&self) -> String {
        join_url(&self.project_root_url, "trunk")
    }

    /// 获取当前项目的某分支 URL
    /// - {repo_url}/{project}/branches/{branch_name}
    pub fn get_branch_url(&self, branch_name: &str) -> String {
        join_url(&join_url(&self.project_root_url, "branches"), branch_name)
    }

    /// - {repo_url}/{project}/tags/{tag_name}
    pub fn get_tag_url(&self, tag_name: &str) -> String {
        join_url(&join_url(&self.project_root_url, "tags"), tag_name)
    }

    pub fn location(&self) -> &BranchLocation {
        &self.location
    }

    /// 获取当前分支名
    /// - 如果在 trunk 上，返回 "trunk"
    /// - 如果在 branches/{branch_name} 上，返回 {branch_name}
    pub fn get_current_branch_name(&self) -> String {
        match &self.location {
            BranchLocation::Trunk => "trunk".to_string(),
            BranchLocation::Branch(name) | BranchLocation::Tag(name) => display_url(name),
            BranchLocation::Unknown => "unknown".to_string(),
        }
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

/// `proj/branches/b1/src` -> (`proj`, Branch(`b1`))
fn split_layout(relative: &str) -> (String, BranchLocation) {
    let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    for (i, segment) in segments.iter().enumerate() {
        let project = segments[..i].join("/");
        let next = segments.get(i + 1).map(|s| s.to_string());
        match (*segment, next) {
            ("trunk", _) => return (project, BranchLocation::Trunk),
            ("branches", Some(name)) => return (project, BranchLocation::Branch(name)),
            ("tags", Some(name)) => return (project, BranchLocation::Tag(name)),
            _ => {}
        }
    }
    (relative.to_string(), BranchLocation::Unknown)
}
