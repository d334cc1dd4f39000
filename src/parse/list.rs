//! ### svn list

use roxmltree::Document;

use crate::core::xml::{attr_u64, child, child_text};

use super::{lock::LockInfo, models::{NodeKind, SvnDate}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 相对于列出目标的路径，目录不带结尾的 `/`
    pub name: String,
    pub kind: NodeKind,
    pub size: Option<u64>,
    pub revision: Option<u64>,
    pub author: Option<String>,
    pub date: Option<SvnDate>,
    pub lock: Option<LockInfo>,
}

impl ListEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }
}

pub fn parse_list_xml(doc: &Document<'_>) -> Vec<ListEntry> {
    let mut entries = Vec::new();
    for list in doc.root_element().children().filter(|n| n.has_tag_name("list")) {
        for entry in list.children().filter(|n| n.has_tag_name("entry")) {
            let Some(name) = child_text(entry, "name") else {
                continue;
            };
            let commit = child(entry, "commit");
            entries.push(ListEntry {
                name,
                kind: NodeKind::parse(entry.attribute("kind").unwrap_or("")),
                size: child_text(entry, "size").and_then(|s| s.parse().ok()),
                revision: commit.and_then(|c| attr_u64(c, "revision")),
                author: commit.and_then(|c| child_text(c, "author")),
                date: commit.and_then(|c| child_text(c, "date")).map(|d| SvnDate::parse(&d)),
                lock: child(entry, "lock").map(LockInfo::from_xml),
            });
        }
    }
    entries
}

/// Plain `svn list`: one name per line, directories end with `/`.
pub fn parse_list_text(text: &str) -> Vec<ListEntry> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, kind) = match line.strip_suffix('/') {
                Some(dir) => (dir, NodeKind::Dir),
                None => (line, NodeKind::File),
            };
            ListEntry {
                name: name.to_string(),
                kind,
                size: None,
                revision: None,
                author: None,
                date: None,
                lock: None,
            }
        })
        .collect()
}
