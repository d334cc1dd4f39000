//! ### 分支与标签
//!
//! 以 `{project}/trunk|branches|tags` 布局为前提，在仓库端直接复制 URL。

use std::path::Path;

use crossterm::style::Stylize;
use svnkit::core::{
    app::App,
    command::SvnCommand,
    context::{BranchLocation, SvnContext},
    error::{AppError, AppResult},
    utils::parse_revision_arg,
};

use crate::commands::{conflicts::resolve_conflicts, utils::run_with_progress};

pub struct BranchArgs<'a> {
    pub name: &'a str,
    pub tag: bool,
    pub message: Option<&'a str>,
    /// 复制源所在的版本，默认 HEAD
    pub revision: Option<&'a str>,
    /// 创建后切换过去
    pub switch: bool,
}

/// 复制源：当前所在的 trunk / 分支 / 标签的根
fn source_url(context: &SvnContext) -> AppResult<String> {
    match context.location() {
        BranchLocation::Trunk => Ok(context.get_trunk_url()),
        BranchLocation::Branch(name) => Ok(context.get_branch_url(name)),
        BranchLocation::Tag(name) => Ok(context.get_tag_url(name)),
        BranchLocation::Unknown => Err(AppError::Validation(format!(
            "{} is not inside a trunk/branches/tags layout",
            context.url()
        ))),
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(AppError::Validation(format!("Invalid branch name '{}'", name)));
    }
    Ok(())
}

/// 创建分支或标签，可选地切换过去
pub async fn handle_branch(app: &App, dir: &Path, args: BranchArgs<'_>) -> AppResult<()> {
    validate_name(args.name)?;

    app.ui.update_step("Reading working copy");
    let context = app.context(dir).await?;
    app.ui.finish_step();

    let source = source_url(&context)?;
    let encoded = urlencoding::encode(args.name.trim());
    let destination = if args.tag {
        context.get_tag_url(&encoded)
    } else {
        context.get_branch_url(&encoded)
    };
    let kind = if args.tag { "tag" } else { "branch" };

    let message = match args.message {
        Some(m) => m.to_string(),
        None => format!("Create {} '{}' from {}", kind, args.name, context.get_current_branch_name()),
    };
    let revision = args.revision.map(parse_revision_arg).transpose()?;

    let command = SvnCommand::branch_copy(&source, &destination, &message, revision)?;
    run_with_progress(app, command, &format!("Creating {} {}", kind, args.name)).await?;
    app.ui.success(&format!("Created {} {}", kind, args.name.to_string().green().bold()));

    if args.switch {
        let command = SvnCommand::switch(&destination, None, None, false).in_dir(dir);
        run_with_progress(app, command, &format!("Switching to {}", args.name)).await?;
        app.ui.success(&format!("Switched to {}", args.name));
        resolve_conflicts(app, dir).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svnkit::parse::info::parse_info_text;

    fn context(url: &str) -> SvnContext {
        let text = format!(
            "Path: .\nURL: {}\nRepository Root: svn://host/repo\nRevision: 7\nNode Kind: directory\n",
            url
        );
        let info = parse_info_text(&text);
        SvnContext::from_info(Path::new("/wc"), &info[0]).unwrap()
    }

    #[test]
    fn test_source_is_location_root() {
        assert_eq!(source_url(&context("svn://host/repo/proj/trunk/src")).unwrap(), "svn://host/repo/proj/trunk");
        assert_eq!(
            source_url(&context("svn://host/repo/proj/branches/b1")).unwrap(),
            "svn://host/repo/proj/branches/b1"
        );
        assert!(source_url(&context("svn://host/repo/proj/misc")).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("feature-x").is_ok());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("  ").is_err());
        assert!(validate_name("..").is_err());
    }
}
