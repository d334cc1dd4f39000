//! ### svn status
//! `--xml` 与纯文本两种输出的解析

use roxmltree::{Document, Node};

use crate::core::xml::{attr_bool, attr_u64, child, child_text};

use super::{lock::LockInfo, models::SvnDate};

/// Status of an item or of its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    None,
    Normal,
    Added,
    Conflicted,
    Deleted,
    External,
    Ignored,
    Incomplete,
    Merged,
    Missing,
    Modified,
    Obstructed,
    Replaced,
    Unversioned,
    Unrecognized(String),
}

impl StatusKind {
    /// From the `item`/`props` attribute of `<wc-status>`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "none" | "" => StatusKind::None,
            "normal" => StatusKind::Normal,
            "added" => StatusKind::Added,
            "conflicted" => StatusKind::Conflicted,
            "deleted" => StatusKind::Deleted,
            "external" => StatusKind::External,
            "ignored" => StatusKind::Ignored,
            "incomplete" => StatusKind::Incomplete,
            "merged" => StatusKind::Merged,
            "missing" => StatusKind::Missing,
            "modified" => StatusKind::Modified,
            "obstructed" => StatusKind::Obstructed,
            "replaced" => StatusKind::Replaced,
            "unversioned" => StatusKind::Unversioned,
            other => StatusKind::Unrecognized(other.to_string()),
        }
    }

    /// From the first column of text output.
    pub fn from_item_code(code: char) -> Self {
        match code {
            ' ' => StatusKind::Normal,
            'A' => StatusKind::Added,
            'C' => StatusKind::Conflicted,
            'D' => StatusKind::Deleted,
            'X' => StatusKind::External,
            'I' => StatusKind::Ignored,
            'G' => StatusKind::Merged,
            '!' => StatusKind::Missing,
            'M' => StatusKind::Modified,
            '~' => StatusKind::Obstructed,
            'R' => StatusKind::Replaced,
            '?' => StatusKind::Unversioned,
            other => StatusKind::Unrecognized(other.to_string()),
        }
    }

    /// From the second (property) column of text output.
    pub fn from_props_code(code: char) -> Self {
        match code {
            ' ' => StatusKind::None,
            'M' => StatusKind::Modified,
            'C' => StatusKind::Conflicted,
            other => StatusKind::Unrecognized(other.to_string()),
        }
    }

    /// 单字符表示，用于终端输出
    pub fn code(&self) -> char {
        match self {
            StatusKind::None | StatusKind::Normal => ' ',
            StatusKind::Added => 'A',
            StatusKind::Conflicted => 'C',
            StatusKind::Deleted => 'D',
            StatusKind::External => 'X',
            StatusKind::Ignored => 'I',
            StatusKind::Incomplete => '!',
            StatusKind::Merged => 'G',
            StatusKind::Missing => '!',
            StatusKind::Modified => 'M',
            StatusKind::Obstructed => '~',
            StatusKind::Replaced => 'R',
            StatusKind::Unversioned => '?',
            StatusKind::Unrecognized(_) => '*',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub item: StatusKind,
    pub props: StatusKind,
    pub revision: Option<u64>,
    pub commit_revision: Option<u64>,
    pub author: Option<String>,
    pub date: Option<SvnDate>,
    /// working copy administratively locked
    pub locked: bool,
    pub lock: Option<LockInfo>,
    pub tree_conflicted: bool,
    pub switched: bool,
    pub copied: bool,
    /// 服务器上有更新 (`--show-updates`)
    pub repos_status: Option<StatusKind>,
    pub changelist: Option<String>,
}

impl StatusEntry {
    fn new(path: &str) -> Self {
        StatusEntry {
            path: path.to_string(),
            item: StatusKind::None,
            props: StatusKind::None,
            revision: None,
            commit_revision: None,
            author: None,
            date: None,
            locked: false,
            lock: None,
            tree_conflicted: false,
            switched: false,
            copied: false,
            repos_status: None,
            changelist: None,
        }
    }

    pub fn is_conflicted(&self) -> bool {
        self.item == StatusKind::Conflicted || self.props == StatusKind::Conflicted || self.tree_conflicted
    }
}

fn parse_xml_entry(entry: Node<'_, '_>, changelist: Option<&str>) -> Option<StatusEntry> {
    let mut status = StatusEntry::new(entry.attribute("path")?);
    status.changelist = changelist.map(str::to_string);

    if let Some(wc) = child(entry, "wc-status") {
        status.item = StatusKind::from_token(wc.attribute("item").unwrap_or("none"));
        status.props = StatusKind::from_token(wc.attribute("props").unwrap_or("none"));
        status.revision = attr_u64(wc, "revision");
        status.locked = attr_bool(wc, "wc-locked");
        status.tree_conflicted = attr_bool(wc, "tree-conflicted");
        status.switched = attr_bool(wc, "switched");
        status.copied = attr_bool(wc, "copied");
        if let Some(commit) = child(wc, "commit") {
            status.commit_revision = attr_u64(commit, "revision");
            status.author = child_text(commit, "author");
            status.date = child_text(commit, "date").map(|d| SvnDate::parse(&d));
        }
        status.lock = child(wc, "lock").map(LockInfo::from_xml);
    }

    if let Some(repos) = child(entry, "repos-status") {
        let item = StatusKind::from_token(repos.attribute("item").unwrap_or("none"));
        let props = StatusKind::from_token(repos.attribute("props").unwrap_or("none"));
        if item != StatusKind::None {
            status.repos_status = Some(item);
        } else if props != StatusKind::None {
            status.repos_status = Some(props);
        }
        if status.lock.is_none() {
            status.lock = child(repos, "lock").map(LockInfo::from_xml);
        }
    }

    Some(status)
}

/// Parse `svn status --xml`.
pub fn parse_status_xml(doc: &Document<'_>) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    for group in doc.root_element().children().filter(|n| n.is_element()) {
        let changelist = if group.has_tag_name("changelist") { group.attribute("name") } else { None };
        for entry in group.children().filter(|n| n.has_tag_name("entry")) {
            if let Some(status) = parse_xml_entry(entry, changelist) {
                entries.push(status);
            }
        }
    }
    entries
}

const ITEM_CODES: &str = " ACDXIG!M~R?";

/// Split off the first whitespace-delimited token.
fn take_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn revision_token(token: &str) -> Option<Option<u64>> {
    match token {
        "?" | "-" => Some(None),
        _ => token.parse().ok().map(Some),
    }
}

fn parse_text_line(line: &str, changelist: Option<&str>) -> Option<StatusEntry> {
    if line.trim_start().starts_with('>') {
        // 树冲突的说明行
        return None;
    }
    let columns: Vec<char> = line.get(..7)?.chars().collect();
    if columns.len() != 7 || line.get(7..8)? != " " || !ITEM_CODES.contains(columns[0]) {
        return None;
    }
    let mut rest = line.get(8..)?;

    let mut status = StatusEntry::new("");
    status.item = StatusKind::from_item_code(columns[0]);
    status.props = StatusKind::from_props_code(columns[1]);
    status.locked = columns[2] == 'L';
    status.copied = columns[3] == '+';
    status.switched = columns[4] == 'S';
    if matches!(columns[5], 'K' | 'O' | 'T' | 'B') {
        status.lock = Some(LockInfo::default());
    }
    status.tree_conflicted = columns[6] == 'C';
    status.changelist = changelist.map(str::to_string);

    // `-u` / `-v` 模式：`* rev [commit-rev author] path`
    if rest.starts_with("* ") || rest.starts_with("  ") {
        if rest.starts_with('*') {
            status.repos_status = Some(StatusKind::Modified);
        }
        rest = &rest[1..];
        if let Some((token, after)) = take_token(rest) {
            if let Some(revision) = revision_token(token) {
                status.revision = revision;
                rest = after;
                // verbose 模式还有提交版本和作者
                if let Some((commit, after_commit)) = take_token(rest) {
                    if let Some(commit_revision) = revision_token(commit) {
                        if let Some((author, after_author)) = take_token(after_commit) {
                            if !after_author.trim().is_empty() {
                                status.commit_revision = commit_revision;
                                status.author = (author != "?").then(|| author.to_string());
                                rest = after_author;
                            }
                        }
                    }
                }
            }
        }
    }

    let path = rest.trim();
    if path.is_empty() {
        return None;
    }
    status.path = path.to_string();
    Some(status)
}

/// Parse the plain text form of `svn status`. Summary and changelist
/// header lines are not entries.
pub fn parse_status_text(text: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    let mut changelist: Option<String> = None;
    for line in text.lines() {
        if let Some(name) = line.strip_prefix("--- Changelist '") {
            changelist = name.strip_suffix("':").map(str::to_string);
            continue;
        }
        if let Some(entry) = parse_text_line(line, changelist.as_deref()) {
            entries.push(entry);
        }
    }
    entries
}
