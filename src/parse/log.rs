//! ### svn log

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::{Document, Node};

use crate::core::xml::{attr_u64, child, child_text};

use super::models::{NodeKind, SvnDate};

static LOG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^r(\d+) \| ([^|]*?) \| ([^|]*?)(?: \| (\d+) lines?)?$").expect("log header regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Deleted,
    Modified,
    Replaced,
    Unrecognized(String),
}

impl ChangeAction {
    pub fn parse(token: &str) -> Self {
        match token {
            "A" => ChangeAction::Added,
            "D" => ChangeAction::Deleted,
            "M" => ChangeAction::Modified,
            "R" => ChangeAction::Replaced,
            other => ChangeAction::Unrecognized(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ChangeAction::Added => "A",
            ChangeAction::Deleted => "D",
            ChangeAction::Modified => "M",
            ChangeAction::Replaced => "R",
            ChangeAction::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath {
    pub action: ChangeAction,
    pub path: String,
    pub kind: NodeKind,
    pub copy_from_path: Option<String>,
    pub copy_from_revision: Option<u64>,
    pub text_mods: Option<bool>,
    pub prop_mods: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub revision: u64,
    pub author: Option<String>,
    pub date: Option<SvnDate>,
    pub message: String,
    pub changed_paths: Vec<ChangedPath>,
    /// 通过合并引入的版本 (`--use-merge-history`)
    pub merged: Vec<LogEntry>,
}

fn optional_bool(node: Node<'_, '_>, name: &str) -> Option<bool> {
    node.attribute(name).map(|v| v == "true")
}

fn parse_xml_entry(node: Node<'_, '_>) -> Option<LogEntry> {
    let revision = attr_u64(node, "revision")?;
    let mut changed_paths = Vec::new();
    if let Some(paths) = child(node, "paths") {
        for path in paths.children().filter(|n| n.has_tag_name("path")) {
            changed_paths.push(ChangedPath {
                action: ChangeAction::parse(path.attribute("action").unwrap_or("")),
                path: path.text().unwrap_or_default().to_string(),
                kind: NodeKind::parse(path.attribute("kind").unwrap_or("")),
                copy_from_path: path.attribute("copyfrom-path").map(str::to_string),
                copy_from_revision: attr_u64(path, "copyfrom-rev"),
                text_mods: optional_bool(path, "text-mods"),
                prop_mods: optional_bool(path, "prop-mods"),
            });
        }
    }

    Some(LogEntry {
        revision,
        author: child_text(node, "author"),
        date: child_text(node, "date").map(|d| SvnDate::parse(&d)),
        message: child(node, "msg").and_then(|m| m.text()).unwrap_or_default().to_string(),
        changed_paths,
        merged: node
            .children()
            .filter(|n| n.has_tag_name("logentry"))
            .filter_map(parse_xml_entry)
            .collect(),
    })
}

/// Parse `svn log --xml`, nested entries become [`LogEntry::merged`].
pub fn parse_log_xml(doc: &Document<'_>) -> Vec<LogEntry> {
    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("logentry"))
        .filter_map(parse_xml_entry)
        .collect()
}

fn is_separator(line: &str) -> bool {
    line.len() >= 20 && line.bytes().all(|b| b == b'-')
}

/// `   A /trunk/b.txt (from /trunk/a.txt:8)`
fn parse_changed_path(line: &str) -> Option<ChangedPath> {
    let line = line.trim();
    let (action, rest) = line.split_once(' ')?;
    let rest = rest.trim_start();

    let (path, copy_from_path, copy_from_revision) = match rest.strip_suffix(')').and_then(|r| r.rsplit_once(" (from ")) {
        Some((path, source)) => match source.rsplit_once(':') {
            Some((from, rev)) => (path, Some(from.to_string()), rev.parse().ok()),
            None => (path, Some(source.to_string()), None),
        },
        None => (rest, None, None),
    };

    Some(ChangedPath {
        action: ChangeAction::parse(action),
        path: path.to_string(),
        kind: NodeKind::None,
        copy_from_path,
        copy_from_revision,
        text_mods: None,
        prop_mods: None,
    })
}

/// Parse plain `svn log` output.
pub fn parse_log_text(text: &str) -> Vec<LogEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = LOG_HEADER.captures(lines[i]) else {
            i += 1;
            continue;
        };
        i += 1;

        let revision: u64 = match caps[1].parse() {
            Ok(r) => r,
            Err(_) => continue,
        };
        let author = caps[2].trim();
        let line_count: Option<usize> = caps.get(4).and_then(|m| m.as_str().parse().ok());

        while i < lines.len() && lines[i].starts_with("Merged via:") {
            i += 1;
        }

        let mut changed_paths = Vec::new();
        if i < lines.len() && lines[i].trim_end() == "Changed paths:" {
            i += 1;
            while i < lines.len() && !lines[i].trim().is_empty() && !is_separator(lines[i]) {
                if let Some(path) = parse_changed_path(lines[i]) {
                    changed_paths.push(path);
                }
                i += 1;
            }
        }

        // 提交说明前的空行
        if i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }

        let mut message_lines = Vec::new();
        match line_count {
            Some(count) => {
                while message_lines.len() < count && i < lines.len() {
                    message_lines.push(lines[i]);
                    i += 1;
                }
            }
            None => {
                while i < lines.len() && !is_separator(lines[i]) {
                    message_lines.push(lines[i]);
                    i += 1;
                }
            }
        }

        entries.push(LogEntry {
            revision,
            author: (!author.is_empty() && author != "(no author)").then(|| author.to_string()),
            date: Some(SvnDate::parse(&caps[3])),
            message: message_lines.join("\n").trim_end().to_string(),
            changed_paths,
            merged: Vec::new(),
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::xml::parse_xml;

    #[test]
    fn test_parse_log_xml() {
        let doc = parse_xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="12">
<author>alice</author>
<date>2024-03-01T10:00:00.000000Z</date>
<paths>
<path action="M" kind="file" text-mods="true" prop-mods="false">/trunk/a.txt</path>
<path action="A" kind="dir" copyfrom-path="/trunk" copyfrom-rev="10">/branches/b1</path>
<path action="X" kind="">/trunk/odd</path>
</paths>
<msg>Two
lines</msg>
<logentry revision="11"><author>bob</author><msg>merged change</msg></logentry>
</logentry>
<logentry revision="10"><msg></msg></logentry>
</log>"#,
        )
        .unwrap();
        let entries = parse_log_xml(&doc);
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.revision, 12);
        assert_eq!(first.message, "Two\nlines");
        assert_eq!(first.changed_paths.len(), 3);
        assert_eq!(first.changed_paths[0].text_mods, Some(true));
        assert_eq!(first.changed_paths[1].kind, NodeKind::Dir);
        assert_eq!(first.changed_paths[1].copy_from_revision, Some(10));
        assert_eq!(first.changed_paths[2].action, ChangeAction::Unrecognized("X".to_string()));
        assert_eq!(first.merged.len(), 1);
        assert_eq!(first.merged[0].author.as_deref(), Some("bob"));

        assert_eq!(entries[1].author, None);
        assert_eq!(entries[1].message, "");
    }

    #[test]
    fn test_parse_log_text() {
        let text = "\
------------------------------------------------------------------------
r12 | alice | 2024-03-01 10:00:00 +0800 (Fri, 01 Mar 2024) | 3 lines
Changed paths:
   M /trunk/a.txt
   A /branches/b1 (from /trunk:10)

First line

------------------------------------------------------------------------
------------------------------------------------------------------------
r11 | (no author) | 2024-02-29 09:00:00 +0000 (Thu, 29 Feb 2024) | 1 line

Import
------------------------------------------------------------------------
";
        let entries = parse_log_text(text);
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.revision, 12);
        assert_eq!(first.author.as_deref(), Some("alice"));
        assert!(first.date.as_ref().unwrap().parsed.is_some());
        // 说明中的分隔线也属于说明
        assert_eq!(first.message, "First line\n\n------------------------------------------------------------------------");
        assert_eq!(first.changed_paths[1].copy_from_path.as_deref(), Some("/trunk"));
        assert_eq!(first.changed_paths[1].copy_from_revision, Some(10));

        assert_eq!(entries[1].author, None);
        assert_eq!(entries[1].message, "Import");
    }

    #[test]
    fn test_parse_quiet_log_text() {
        let text = "-----------------------\nr3 | carol | 2024-01-01 00:00:00 +0000 (Mon, 01 Jan 2024)\n-----------------------\nr2 | carol | 2024-01-01 00:00:00 +0000 (Mon, 01 Jan 2024)\n";
        let entries = parse_log_text(text);
        let revisions: Vec<u64> = entries.iter().map(|e| e.revision).collect();
        assert_eq!(revisions, vec![3, 2]);
        assert!(entries.iter().all(|e| e.message.is_empty()));
    }
}
