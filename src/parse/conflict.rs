//! ### 冲突
//! 从 status 中找出冲突项，并定位 mine/base/theirs 文件

use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::core::xml::child_text;

use super::status::{StatusEntry, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// 文本冲突
    Standard,
    /// 树冲突
    Tree,
    /// 仅属性冲突
    Property,
    /// 文件被阻塞 (obstructed)
    Obstructed,
    /// 未完成的更新
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictItem {
    pub path: String,
    pub kind: ConflictKind,
}

/// One conflict per entry. Precedence: incomplete, tree, obstructed, text, property.
pub fn conflicts_from_status(entries: &[StatusEntry]) -> Vec<ConflictItem> {
    let mut conflicts = Vec::new();
    for entry in entries {
        let kind = if entry.item == StatusKind::Incomplete {
            ConflictKind::Incomplete
        } else if entry.tree_conflicted {
            ConflictKind::Tree
        } else if entry.item == StatusKind::Obstructed {
            ConflictKind::Obstructed
        } else if entry.item == StatusKind::Conflicted {
            ConflictKind::Standard
        } else if entry.props == StatusKind::Conflicted {
            ConflictKind::Property
        } else {
            continue;
        };
        conflicts.push(ConflictItem {
            path: entry.path.clone(),
            kind,
        });
    }
    conflicts
}

/// The files svn leaves next to a text-conflicted file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictFiles {
    /// 本地修改 (`.mine` / `.working`)
    pub mine: Option<PathBuf>,
    /// 共同祖先 (较小的 `.rN` / `.merge-left.rN`)
    pub base: Option<PathBuf>,
    /// 传入的版本 (较大的 `.rN` / `.merge-right.rN`)
    pub theirs: Option<PathBuf>,
    /// 带冲突标记的工作文件
    pub working: Option<PathBuf>,
}

impl ConflictFiles {
    pub fn is_empty(&self) -> bool {
        self.mine.is_none() && self.base.is_none() && self.theirs.is_none()
    }

    /// From the `<conflict>` element of `svn info --xml`.
    pub fn from_info_xml(conflict: Node<'_, '_>, working: Option<&str>) -> ConflictFiles {
        ConflictFiles {
            mine: child_text(conflict, "prev-wc-file").map(PathBuf::from),
            base: child_text(conflict, "prev-base-file").map(PathBuf::from),
            theirs: child_text(conflict, "cur-base-file").map(PathBuf::from),
            working: working.map(PathBuf::from),
        }
    }

    /// Apply one `Key: Value` pair of `svn info` text output.
    pub(crate) fn apply_info_field(&mut self, key: &str, value: &str) -> bool {
        let path = Some(PathBuf::from(value.trim()));
        match key {
            "Conflict Previous Base File" => self.base = path,
            "Conflict Previous Working File" => self.mine = path,
            "Conflict Current Base File" => self.theirs = path,
            _ => return false,
        }
        true
    }

    /// svn reports these relative to the directory it ran in.
    pub fn resolved_against(self, dir: &Path) -> ConflictFiles {
        let resolve = |p: Option<PathBuf>| p.map(|p| if p.is_absolute() { p } else { dir.join(p) });
        ConflictFiles {
            mine: resolve(self.mine),
            base: resolve(self.base),
            theirs: resolve(self.theirs),
            working: resolve(self.working),
        }
    }

    /// Find the conflict files of `file` on disk by svn's naming rules.
    pub fn discover(file: &Path) -> ConflictFiles {
        let mut files = ConflictFiles {
            working: file.exists().then(|| file.to_path_buf()),
            ..Default::default()
        };
        let (Some(dir), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str())) else {
            return files;
        };
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };

        let read = match std::fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                log::debug!("cannot list {} for conflict files: {}", dir.display(), e);
                return files;
            }
        };

        let prefix = format!("{}.", name);
        let mut numbered: Vec<(u64, PathBuf)> = Vec::new();
        let mut merge_left: Option<PathBuf> = None;
        let mut merge_right: Option<PathBuf> = None;

        for entry in read.flatten() {
            let candidate = entry.file_name();
            let Some(suffix) = candidate.to_str().and_then(|c| c.strip_prefix(&prefix)) else {
                continue;
            };
            let path = entry.path();
            if suffix == "mine" || suffix == "working" {
                files.mine = Some(path);
            } else if let Some(rev) = suffix.strip_prefix("merge-left.r") {
                if rev.parse::<u64>().is_ok() {
                    merge_left = Some(path);
                }
            } else if let Some(rev) = suffix.strip_prefix("merge-right.r") {
                if rev.parse::<u64>().is_ok() {
                    merge_right = Some(path);
                }
            } else if let Some(rev) = suffix.strip_prefix('r').and_then(|r| r.parse::<u64>().ok()) {
                numbered.push((rev, path));
            }
        }

        numbered.sort();
        if merge_left.is_some() || merge_right.is_some() {
            files.base = merge_left;
            files.theirs = merge_right;
        } else if numbered.len() >= 2 {
            files.base = numbered.first().map(|(_, p)| p.clone());
            files.theirs = numbered.last().map(|(_, p)| p.clone());
        } else {
            files.base = numbered.pop().map(|(_, p)| p);
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::status::parse_status_text;

    #[test]
    fn test_conflicts_from_status_precedence() {
        let entries = parse_status_text(
            "C       text.txt\n M      plain.txt\n C      props.txt\n!     C tree\n~       blocked\nC     C both.txt\n",
        );
        let conflicts = conflicts_from_status(&entries);
        let kinds: Vec<(&str, ConflictKind)> = conflicts.iter().map(|c| (c.path.as_str(), c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("text.txt", ConflictKind::Standard),
                ("props.txt", ConflictKind::Property),
                ("tree", ConflictKind::Tree),
                ("blocked", ConflictKind::Obstructed),
                ("both.txt", ConflictKind::Tree),
            ]
        );
    }

    #[test]
    fn test_discover_update_conflict() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "a.txt.mine", "a.txt.r3", "a.txt.r12", "ab.txt.r1"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let files = ConflictFiles::discover(&dir.path().join("a.txt"));
        assert_eq!(files.mine, Some(dir.path().join("a.txt.mine")));
        assert_eq!(files.base, Some(dir.path().join("a.txt.r3")));
        assert_eq!(files.theirs, Some(dir.path().join("a.txt.r12")));
        assert_eq!(files.working, Some(dir.path().join("a.txt")));
        assert_ne!(files.base, files.theirs);
    }

    #[test]
    fn test_discover_merge_conflict() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["m.c", "m.c.working", "m.c.merge-left.r5", "m.c.merge-right.r9"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let files = ConflictFiles::discover(&dir.path().join("m.c"));
        assert_eq!(files.mine, Some(dir.path().join("m.c.working")));
        assert_eq!(files.base, Some(dir.path().join("m.c.merge-left.r5")));
        assert_eq!(files.theirs, Some(dir.path().join("m.c.merge-right.r9")));
    }

    #[test]
    fn test_discover_without_conflict_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = ConflictFiles::discover(&dir.path().join("missing.txt"));
        assert!(files.is_empty());
        assert!(files.working.is_none());
    }

    #[test]
    fn test_resolved_against_keeps_absolute_paths() {
        let files = ConflictFiles {
            mine: Some(PathBuf::from("a.txt.mine")),
            base: Some(PathBuf::from("/abs/a.txt.r1")),
            ..Default::default()
        }
        .resolved_against(Path::new("/wc"));
        assert_eq!(files.mine, Some(PathBuf::from("/wc/a.txt.mine")));
        assert_eq!(files.base, Some(PathBuf::from("/abs/a.txt.r1")));
        assert!(files.theirs.is_none());
    }
}
