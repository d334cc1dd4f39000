//! ### svn info

use roxmltree::{Document, Node};

use crate::core::xml::{attr_u64, child, child_text};

use super::{conflict::ConflictFiles, lock::LockInfo, models::{NodeKind, SvnDate}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoEntry {
    pub path: String,
    pub kind: NodeKind,
    pub url: Option<String>,
    /// `^/trunk/a.txt`
    pub relative_url: Option<String>,
    pub repository_root: Option<String>,
    pub repository_uuid: Option<String>,
    pub revision: Option<u64>,
    pub working_copy_root: Option<String>,
    pub schedule: Option<String>,
    pub depth: Option<String>,
    pub checksum: Option<String>,
    pub last_changed_revision: Option<u64>,
    pub last_changed_author: Option<String>,
    pub last_changed_date: Option<SvnDate>,
    pub lock: Option<LockInfo>,
    pub conflict: Option<ConflictFiles>,
    pub tree_conflicted: bool,
}

impl InfoEntry {
    fn new(path: &str) -> Self {
        InfoEntry {
            path: path.to_string(),
            kind: NodeKind::None,
            url: None,
            relative_url: None,
            repository_root: None,
            repository_uuid: None,
            revision: None,
            working_copy_root: None,
            schedule: None,
            depth: None,
            checksum: None,
            last_changed_revision: None,
            last_changed_author: None,
            last_changed_date: None,
            lock: None,
            conflict: None,
            tree_conflicted: false,
        }
    }
}

fn parse_xml_entry(entry: Node<'_, '_>) -> InfoEntry {
    let mut info = InfoEntry::new(entry.attribute("path").unwrap_or("."));
    info.kind = NodeKind::parse(entry.attribute("kind").unwrap_or(""));
    info.revision = attr_u64(entry, "revision");
    info.url = child_text(entry, "url");
    info.relative_url = child_text(entry, "relative-url");

    if let Some(repository) = child(entry, "repository") {
        info.repository_root = child_text(repository, "root");
        info.repository_uuid = child_text(repository, "uuid");
    }
    if let Some(wc) = child(entry, "wc-info") {
        info.working_copy_root = child_text(wc, "wcroot-abspath");
        info.schedule = child_text(wc, "schedule");
        info.depth = child_text(wc, "depth");
        info.checksum = child_text(wc, "checksum");
    }
    if let Some(commit) = child(entry, "commit") {
        info.last_changed_revision = attr_u64(commit, "revision");
        info.last_changed_author = child_text(commit, "author");
        info.last_changed_date = child_text(commit, "date").map(|d| SvnDate::parse(&d));
    }
    info.lock = child(entry, "lock").map(LockInfo::from_xml);

    // 1.7 放在 entry 下，新版本放在 wc-info 下
    info.conflict = entry
        .descendants()
        .filter(|n| n.has_tag_name("conflict"))
        .map(|n| ConflictFiles::from_info_xml(n, Some(&info.path)))
        .find(|files| !files.is_empty());
    info.tree_conflicted = entry.descendants().any(|n| n.has_tag_name("tree-conflict"));
    info
}

/// Parse `svn info --xml`.
pub fn parse_info_xml(doc: &Document<'_>) -> Vec<InfoEntry> {
    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("entry"))
        .map(parse_xml_entry)
        .collect()
}

fn apply_field(info: &mut InfoEntry, key: &str, value: &str) {
    let text = || Some(value.to_string());
    match key {
        "Path" => info.path = value.to_string(),
        "Working Copy Root Path" => info.working_copy_root = text(),
        "URL" => info.url = text(),
        "Relative URL" => info.relative_url = text(),
        "Repository Root" => info.repository_root = text(),
        "Repository UUID" => info.repository_uuid = text(),
        "Revision" => info.revision = value.parse().ok(),
        "Node Kind" => info.kind = NodeKind::parse(value),
        "Schedule" => info.schedule = text(),
        "Depth" => info.depth = text(),
        "Checksum" => info.checksum = text(),
        "Last Changed Author" => info.last_changed_author = text(),
        "Last Changed Rev" => info.last_changed_revision = value.parse().ok(),
        "Last Changed Date" => info.last_changed_date = Some(SvnDate::parse(value)),
        "Tree conflict" => info.tree_conflicted = true,
        _ => {
            let mut lock = info.lock.take().unwrap_or_default();
            if lock.apply_info_field(key, value) {
                info.lock = Some(lock);
            } else if !lock.is_empty() {
                info.lock = Some(lock);
            }

            let mut conflict = info.conflict.take().unwrap_or_default();
            if conflict.apply_info_field(key, value) || !conflict.is_empty() {
                conflict.working = Some(std::path::PathBuf::from(&info.path));
                info.conflict = Some(conflict);
            }
        }
    }
}

/// Parse the `Key: Value` blocks of plain `svn info`, one block per target.
pub fn parse_info_text(text: &str) -> Vec<InfoEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let mut entries = Vec::new();
    let mut current: Option<InfoEntry> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if line.trim().is_empty() {
            if let Some(info) = current.take() {
                entries.push(info);
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let info = current.get_or_insert_with(|| InfoEntry::new("."));

        // `Lock Comment (2 lines):` 后面跟着说明
        if let Some(count) = key
            .strip_prefix("Lock Comment (")
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|n| n.parse::<usize>().ok())
        {
            let end = (i + count).min(lines.len());
            let mut lock = info.lock.take().unwrap_or_default();
            lock.comment = Some(lines[i..end].join("\n"));
            info.lock = Some(lock);
            i = end;
            continue;
        }

        apply_field(info, key.trim(), value.trim());
    }
    if let Some(info) = current.take() {
        entries.push(info);
    }
    entries
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::xml::parse_xml;

    #[test]
    fn test_parse_info_xml() {
        let doc = parse_xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<info>
<entry kind="file" path="a.txt" revision="7">
<url>file:///srv/repo/trunk/a.txt</url>
<relative-url>^/trunk/a.txt</relative-url>
<repository><root>file:///srv/repo</root><uuid>1234-abcd</uuid></repository>
<wc-info>
<wcroot-abspath>/home/me/wc</wcroot-abspath>
<schedule>normal</schedule>
<depth>infinity</depth>
<conflict type="text">
<prev-base-file>a.txt.r5</prev-base-file>
<prev-wc-file>a.txt.mine</prev-wc-file>
<cur-base-file>a.txt.r7</cur-base-file>
</conflict>
</wc-info>
<commit revision="5"><author>alice</author><date>2024-03-01T10:00:00.000000Z</date></commit>
<lock><token>opaquelocktoken:1</token><owner>bob</owner></lock>
</entry>
</info>"#,
        )
        .unwrap();
        let entries = parse_info_xml(&doc);
        assert_eq!(entries.len(), 1);
        let info = &entries[0];
        assert_eq!(info.kind, NodeKind::File);
        assert_eq!(info.revision, Some(7));
        assert_eq!(info.repository_root.as_deref(), Some("file:///srv/repo"));
        assert_eq!(info.working_copy_root.as_deref(), Some("/home/me/wc"));
        assert_eq!(info.last_changed_author.as_deref(), Some("alice"));
        assert_eq!(info.lock.as_ref().and_then(|l| l.owner.as_deref()), Some("bob"));

        let conflict = info.conflict.as_ref().unwrap();
        assert_eq!(conflict.mine, Some(PathBuf::from("a.txt.mine")));
        assert_eq!(conflict.base, Some(PathBuf::from("a.txt.r5")));
        assert_eq!(conflict.theirs, Some(PathBuf::from("a.txt.r7")));
        assert_eq!(conflict.working, Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn test_parse_info_text() {
        let text = "\
Path: .
Working Copy Root Path: /home/me/wc
URL: https://svn.example.com/repos/proj/trunk
Relative URL: ^/proj/trunk
Repository Root: https://svn.example.com/repos
Repository UUID: 1234-abcd
Revision: 42
Node Kind: directory
Schedule: normal
Last Changed Author: alice
Last Changed Rev: 40
Last Changed Date: 2024-03-01 10:00:00 +0800 (Fri, 01 Mar 2024)

Path: a.txt
Name: a.txt
Node Kind: file
Lock Owner: bob
Lock Comment (2 lines):
first
second
Conflict Previous Base File: a.txt.r40
Conflict Previous Working File: a.txt.mine
Conflict Current Base File: a.txt.r42
";
        let entries = parse_info_text(text);
        assert_eq!(entries.len(), 2);

        let root = &entries[0];
        assert_eq!(root.kind, NodeKind::Dir);
        assert_eq!(root.url.as_deref(), Some("https://svn.example.com/repos/proj/trunk"));
        assert_eq!(root.revision, Some(42));
        assert_eq!(root.last_changed_revision, Some(40));
        assert!(root.lock.is_none());
        assert!(root.conflict.is_none());

        let file = &entries[1];
        let lock = file.lock.as_ref().unwrap();
        assert_eq!(lock.owner.as_deref(), Some("bob"));
        assert_eq!(lock.comment.as_deref(), Some("first\nsecond"));
        let conflict = file.conflict.as_ref().unwrap();
        assert_eq!(conflict.theirs, Some(PathBuf::from("a.txt.r42")));
        assert_eq!(conflict.working, Some(PathBuf::from("a.txt")));
    }
}
