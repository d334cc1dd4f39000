//! ### 构建 SVN 命令
//!
//! 每个 svn 子命令对应一个工厂函数，只负责拼出参数列表，不负责执行。
//! 参数逐个传给进程，不经过 shell，因此这里不做任何转义。

use std::path::{Path, PathBuf};

use super::{
    error::{AppError, AppResult},
    path::is_repository_url,
    utils::{Revision, RevisionRange},
};

/// `--depth` 取值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Empty,
    Files,
    Immediates,
    Infinity,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Empty => "empty",
            Depth::Files => "files",
            Depth::Immediates => "immediates",
            Depth::Infinity => "infinity",
        }
    }
}

/// `--accept` 取值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAccept {
    Postpone,
    Base,
    Working,
    MineConflict,
    TheirsConflict,
    MineFull,
    TheirsFull,
    Edit,
    Launch,
    Unrecognized(String),
}

impl ConflictAccept {
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "postpone" | "p" => ConflictAccept::Postpone,
            "base" => ConflictAccept::Base,
            "working" => ConflictAccept::Working,
            "mine-conflict" | "mc" => ConflictAccept::MineConflict,
            "theirs-conflict" | "tc" => ConflictAccept::TheirsConflict,
            "mine-full" | "mf" => ConflictAccept::MineFull,
            "theirs-full" | "tf" => ConflictAccept::TheirsFull,
            "edit" | "e" => ConflictAccept::Edit,
            "launch" | "l" => ConflictAccept::Launch,
            _ => ConflictAccept::Unrecognized(token.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConflictAccept::Postpone => "postpone",
            ConflictAccept::Base => "base",
            ConflictAccept::Working => "working",
            ConflictAccept::MineConflict => "mine-conflict",
            ConflictAccept::TheirsConflict => "theirs-conflict",
            ConflictAccept::MineFull => "mine-full",
            ConflictAccept::TheirsFull => "theirs-full",
            ConflictAccept::Edit => "edit",
            ConflictAccept::Launch => "launch",
            ConflictAccept::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub show_updates: bool,
    pub verbose: bool,
    pub no_ignore: bool,
    pub quiet: bool,
    pub depth: Option<Depth>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub revision: Option<Revision>,
    pub depth: Option<Depth>,
    pub accept: Option<ConflictAccept>,
    pub ignore_externals: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    pub revisions: Option<RevisionRange>,
    /// `-c N`，与 revisions 互斥，优先使用
    pub change: Option<u64>,
    pub summarize: bool,
    pub ignore_whitespace: bool,
    pub non_recursive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub revisions: Option<RevisionRange>,
    pub limit: Option<u32>,
    pub verbose: bool,
    pub stop_on_copy: bool,
    pub use_merge_history: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub revisions: Option<RevisionRange>,
    pub dry_run: bool,
    pub record_only: bool,
    pub ignore_ancestry: bool,
    pub accept: Option<ConflictAccept>,
}

/// A single svn invocation: verb, ordered arguments, optional working
/// directory and the `--xml` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnCommand {
    verb: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    xml: bool,
}

impl SvnCommand {
    pub fn new(verb: &str) -> Self {
        SvnCommand {
            verb: verb.to_string(),
            args: Vec::new(),
            working_dir: None,
            xml: false,
        }
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn is_xml(&self) -> bool {
        self.xml
    }

    /// Run the command inside `dir` (the working copy).
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Request structured (`--xml`) output.
    pub fn with_xml(mut self) -> Self {
        self.xml = true;
        self
    }

    /// Verb first, then `--xml`, then the factory's arguments in order.
    pub fn to_args(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.args.len() + 2);
        out.push(self.verb.clone());
        if self.xml {
            out.push("--xml".to_string());
        }
        out.extend(self.args.iter().cloned());
        out
    }

    /// Display form used in logs and error messages.
    pub fn display(&self) -> String {
        format!("svn {}", self.to_args().join(" "))
    }

    fn arg(mut self, token: impl Into<String>) -> Self {
        self.args.push(token.into());
        self
    }

    fn flag(self, enabled: bool, token: &str) -> Self {
        if enabled { self.arg(token) } else { self }
    }

    /// 空路径直接忽略，不传空字符串
    fn path(self, path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.trim().is_empty() => self.arg(p),
            _ => self,
        }
    }

    fn paths(mut self, paths: &[&str]) -> Self {
        for p in paths {
            self = self.path(Some(p));
        }
        self
    }

    fn option(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.arg(name).arg(v),
            _ => self,
        }
    }

    fn revision(self, rev: Option<Revision>) -> Self {
        match rev {
            Some(r) => self.arg(RevisionRange::single(r).to_flag()),
            None => self,
        }
    }

    fn revisions(self, range: Option<RevisionRange>) -> Self {
        match range {
            Some(r) => self.arg(r.to_flag()),
            None => self,
        }
    }

    fn depth(self, depth: Option<Depth>) -> Self {
        match depth {
            Some(d) => self.arg("--depth").arg(d.as_str()),
            None => self,
        }
    }

    fn accept(self, accept: Option<&ConflictAccept>) -> Self {
        match accept {
            Some(a) => self.arg("--accept").arg(a.as_str()),
            None => self,
        }
    }

    fn message(self, message: Option<&str>) -> Self {
        match message {
            Some(m) => self.arg("-m").arg(m),
            None => self,
        }
    }

    /// ### svn status
    pub fn status(path: Option<&str>, opts: &StatusOptions) -> Self {
        SvnCommand::new("status")
            .flag(opts.show_updates, "--show-updates")
            .flag(opts.verbose, "--verbose")
            .flag(opts.no_ignore, "--no-ignore")
            .flag(opts.quiet, "--quiet")
            .depth(opts.depth)
            .path(path)
    }

    /// ### svn update
    pub fn update(paths: &[&str], opts: &UpdateOptions) -> Self {
        SvnCommand::new("update")
            .revision(opts.revision)
            .depth(opts.depth)
            .accept(opts.accept.as_ref())
            .flag(opts.ignore_externals, "--ignore-externals")
            .paths(paths)
    }

    /// ### svn commit
    pub fn commit(paths: &[&str], message: &str) -> Self {
        SvnCommand::new("commit").message(Some(message)).paths(paths)
    }

    /// ### svn add
    pub fn add(paths: &[&str], force: bool, parents: bool, non_recursive: bool) -> Self {
        SvnCommand::new("add")
            .flag(force, "--force")
            .flag(parents, "--parents")
            .flag(non_recursive, "--non-recursive")
            .paths(paths)
    }

    /// ### svn delete
    pub fn delete(paths: &[&str], force: bool, keep_local: bool) -> Self {
        SvnCommand::new("delete")
            .flag(force, "--force")
            .flag(keep_local, "--keep-local")
            .paths(paths)
    }

    /// ### svn revert
    pub fn revert(paths: &[&str], recursive: bool) -> Self {
        SvnCommand::new("revert").flag(recursive, "--recursive").paths(paths)
    }

    /// ### svn diff
    pub fn diff(path: Option<&str>, opts: &DiffOptions) -> Self {
        let cmd = SvnCommand::new("diff");
        let cmd = match opts.change {
            Some(change) => cmd.arg("-c").arg(change.to_string()),
            None => cmd.revisions(opts.revisions),
        };
        let cmd = if opts.ignore_whitespace {
            cmd.arg("-x").arg("--ignore-all-space")
        } else {
            cmd
        };
        cmd.flag(opts.summarize, "--summarize")
            .flag(opts.non_recursive, "--non-recursive")
            .path(path)
    }

    /// ### svn log
    pub fn log(target: Option<&str>, opts: &LogOptions) -> Self {
        let cmd = SvnCommand::new("log").revisions(opts.revisions);
        let cmd = match opts.limit {
            Some(limit) => cmd.arg("--limit").arg(limit.to_string()),
            None => cmd,
        };
        cmd.flag(opts.verbose, "--verbose")
            .flag(opts.stop_on_copy, "--stop-on-copy")
            .flag(opts.use_merge_history, "--use-merge-history")
            .flag(opts.quiet, "--quiet")
            .path(target)
    }

    /// ### svn info
    pub fn info(target: Option<&str>, revision: Option<Revision>, show_item: Option<&str>) -> Self {
        SvnCommand::new("info")
            .revision(revision)
            .option("--show-item", show_item)
            .path(target)
    }

    /// ### svn cleanup
    pub fn cleanup(path: Option<&str>, remove_unversioned: bool, remove_ignored: bool) -> Self {
        SvnCommand::new("cleanup")
            .flag(remove_unversioned, "--remove-unversioned")
            .flag(remove_ignored, "--remove-ignored")
            .path(path)
    }

    /// ### svn copy
    /// 工作副本内复制，不带提交信息
    pub fn copy(source: &str, destination: &str, parents: bool) -> Self {
        SvnCommand::new("copy")
            .flag(parents, "--parents")
            .path(Some(source))
            .path(Some(destination))
    }

    /// ### svn copy URL URL -m
    /// 创建分支或标签。`-m` 只对 URL 到 URL 的复制有效，两端都必须是仓库 URL，
    /// 原样保留，不会解析成本地路径。
    pub fn branch_copy(
        source_url: &str,
        destination_url: &str,
        message: &str,
        revision: Option<Revision>,
    ) -> AppResult<Self> {
        for url in [source_url, destination_url] {
            if !is_repository_url(url) {
                return Err(AppError::Validation(format!(
                    "Branch/tag copy needs repository URLs, got '{}'",
                    url
                )));
            }
        }

        Ok(SvnCommand::new("copy")
            .revision(revision)
            .arg(source_url)
            .arg(destination_url)
            .arg("-m")
            .arg(message))
    }

    /// ### svn switch
    pub fn switch(url: &str, path: Option<&str>, revision: Option<Revision>, ignore_ancestry: bool) -> Self {
        SvnCommand::new("switch")
            .revision(revision)
            .flag(ignore_ancestry, "--ignore-ancestry")
            .path(Some(url))
            .path(path)
    }

    /// ### svn relocate
    /// `from` 为空时使用 `svn relocate TO [PATH]` 形式
    pub fn relocate(from_url: Option<&str>, to_url: &str, path: Option<&str>) -> Self {
        SvnCommand::new("relocate")
            .path(from_url)
            .path(Some(to_url))
            .path(path)
    }

    /// ### svn merge
    pub fn merge(source: &str, target: Option<&str>, opts: &MergeOptions) -> Self {
        SvnCommand::new("merge")
            .revisions(opts.revisions)
            .flag(opts.dry_run, "--dry-run")
            .flag(opts.record_only, "--record-only")
            .flag(opts.ignore_ancestry, "--ignore-ancestry")
            .accept(opts.accept.as_ref())
            .path(Some(source))
            .path(target)
    }

    /// ### svn blame
    pub fn blame(target: &str, revision: Option<RevisionRange>, use_merge_history: bool) -> Self {
        SvnCommand::new("blame")
            .revisions(revision)
            .flag(use_merge_history, "--use-merge-history")
            .path(Some(target))
    }

    /// ### svn list
    pub fn list(target: Option<&str>, revision: Option<Revision>, recursive: bool, verbose: bool) -> Self {
        SvnCommand::new("list")
            .revision(revision)
            .flag(recursive, "--recursive")
            .flag(verbose, "--verbose")
            .path(target)
    }

    /// ### svn checkout
    pub fn checkout(url: &str, path: Option<&str>, revision: Option<Revision>, depth: Option<Depth>) -> Self {
        SvnCommand::new("checkout")
            .revision(revision)
            .depth(depth)
            .path(Some(url))
            .path(path)
    }

    /// ### svn export
    pub fn export(source: &str, destination: Option<&str>, revision: Option<Revision>, force: bool) -> Self {
        SvnCommand::new("export")
            .revision(revision)
            .flag(force, "--force")
            .path(Some(source))
            .path(destination)
    }

    /// ### svn import
    pub fn import(path: Option<&str>, url: &str, message: &str) -> Self {
        SvnCommand::new("import")
            .path(path)
            .path(Some(url))
            .message(Some(message))
    }

    /// ### svn proplist
    pub fn proplist(target: Option<&str>, verbose: bool) -> Self {
        SvnCommand::new("proplist").flag(verbose, "--verbose").path(target)
    }

    /// ### svn propget
    pub fn propget(name: &str, target: Option<&str>, revision: Option<Revision>) -> Self {
        SvnCommand::new("propget").revision(revision).arg(name).path(target)
    }

    /// ### svn propset
    pub fn propset(name: &str, value: &str, targets: &[&str], recursive: bool) -> Self {
        SvnCommand::new("propset")
            .flag(recursive, "--recursive")
            .arg(name)
            .arg(value)
            .paths(targets)
    }

    /// ### svn propdel
    pub fn propdel(name: &str, target: Option<&str>, recursive: bool) -> Self {
        SvnCommand::new("propdel").flag(recursive, "--recursive").arg(name).path(target)
    }

    /// ### svn move
    pub fn move_to(source: &str, destination: &str, force: bool, parents: bool) -> Self {
        SvnCommand::new("move")
            .flag(force, "--force")
            .flag(parents, "--parents")
            .path(Some(source))
            .path(Some(destination))
    }

    /// ### svn lock
    pub fn lock(paths: &[&str], message: Option<&str>, force: bool) -> Self {
        SvnCommand::new("lock").message(message).flag(force, "--force").paths(paths)
    }

    /// ### svn unlock
    pub fn unlock(paths: &[&str], force: bool) -> Self {
        SvnCommand::new("unlock").flag(force, "--force").paths(paths)
    }

    /// ### svn resolve
    pub fn resolve(path: &str, accept: &ConflictAccept, recursive: bool) -> Self {
        SvnCommand::new("resolve")
            .accept(Some(accept))
            .flag(recursive, "--recursive")
            .path(Some(path))
    }

    /// ### svn mkdir
    pub fn mkdir(targets: &[&str], message: Option<&str>, parents: bool) -> Self {
        SvnCommand::new("mkdir").flag(parents, "--parents").message(message).paths(targets)
    }

    /// ### svn cat
    pub fn cat(target: &str, revision: Option<Revision>) -> Self {
        SvnCommand::new("cat").revision(revision).path(Some(target))
    }

    /// ### svn --version
    pub fn version(quiet: bool) -> Self {
        SvnCommand::new("--version").flag(quiet, "--quiet")
    }
}
