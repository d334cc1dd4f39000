//! Unified diff parsing, and diff synthesis from two in-memory texts.

use std::sync::LazyLock;

use regex::Regex;
use similar::{capture_diff_slices, Algorithm, DiffOp};

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk header regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Context,
    Added,
    Removed,
    Header,
    FileHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: LineType,
    /// Body lines without their `+`/`-`/space prefix; header lines verbatim.
    pub content: String,
    pub old_line_number: Option<u32>,
    pub new_line_number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffType {
    Unified,
    Binary,
    Other,
}

/// The diff of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub original_path: String,
    pub modified_path: String,
    pub diff_type: DiffType,
    pub is_binary: bool,
    pub lines: Vec<DiffLine>,
}

impl FileDiff {
    fn new(original_path: &str, modified_path: &str) -> Self {
        FileDiff {
            original_path: original_path.to_string(),
            modified_path: modified_path.to_string(),
            diff_type: DiffType::Other,
            is_binary: false,
            lines: Vec::new(),
        }
    }

    pub fn addition_count(&self) -> usize {
        self.lines.iter().filter(|l| l.line_type == LineType::Added).count()
    }

    pub fn deletion_count(&self) -> usize {
        self.lines.iter().filter(|l| l.line_type == LineType::Removed).count()
    }

    /// Path to show for the file, preferring the modified side.
    pub fn display_path(&self) -> &str {
        if self.modified_path.is_empty() { &self.original_path } else { &self.modified_path }
    }

    /// Render back to unified diff text.
    pub fn to_unified_string(&self) -> String {
        let mut out = String::new();
        if self.is_binary {
            out.push_str(&format!("Binary files {} and {} differ\n", self.original_path, self.modified_path));
            return out;
        }
        for line in &self.lines {
            match line.line_type {
                LineType::Header | LineType::FileHeader => out.push_str(&line.content),
                LineType::Context => {
                    out.push(' ');
                    out.push_str(&line.content);
                }
                LineType::Added => {
                    out.push('+');
                    out.push_str(&line.content);
                }
                LineType::Removed => {
                    out.push('-');
                    out.push_str(&line.content);
                }
            }
            out.push('\n');
        }
        out
    }
}

/// One or more file diffs. Counts are always derived from the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    pub files: Vec<FileDiff>,
}

impl DiffDocument {
    pub fn addition_count(&self) -> usize {
        self.files.iter().map(FileDiff::addition_count).sum()
    }

    pub fn deletion_count(&self) -> usize {
        self.files.iter().map(FileDiff::deletion_count).sum()
    }

    /// No files at all. A synthesized diff always has one file, so use
    /// `has_changes` to tell identical inputs apart.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.addition_count() + self.deletion_count() > 0
    }

    pub fn lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.files.iter().flat_map(|f| f.lines.iter())
    }
}

struct Hunk {
    old_line: u32,
    new_line: u32,
    /// `None` when the body came without a hunk header
    remaining: Option<(u32, u32)>,
}

impl Hunk {
    fn implicit() -> Self {
        Hunk { old_line: 1, new_line: 1, remaining: None }
    }

    /// Classify a line against the declared counts, `None` when the hunk is over.
    fn classify(&self, line: &str) -> Option<LineType> {
        let (old_left, new_left) = self.remaining?;
        match line.as_bytes().first() {
            Some(b'+') if new_left > 0 => Some(LineType::Added),
            Some(b'-') if old_left > 0 => Some(LineType::Removed),
            Some(b' ') | None if old_left > 0 && new_left > 0 => Some(LineType::Context),
            _ => None,
        }
    }

    fn numbers(&mut self, line_type: LineType) -> (Option<u32>, Option<u32>) {
        let (old_dec, new_dec) = match line_type {
            LineType::Added => (0, 1),
            LineType::Removed => (1, 0),
            LineType::Context => (1, 1),
            _ => return (None, None),
        };
        let old = (old_dec == 1).then_some(self.old_line);
        let new = (new_dec == 1).then_some(self.new_line);
        self.old_line += old_dec;
        self.new_line += new_dec;
        if let Some((old_left, new_left)) = self.remaining.as_mut() {
            *old_left = old_left.saturating_sub(old_dec);
            *new_left = new_left.saturating_sub(new_dec);
        }
        (old, new)
    }
}

struct FileBuilder {
    diff: FileDiff,
    saw_modified_header: bool,
    has_body: bool,
}

#[derive(Default)]
struct DiffParser {
    files: Vec<FileDiff>,
    current: Option<FileBuilder>,
    hunk: Option<Hunk>,
    in_properties: bool,
}

impl DiffParser {
    fn finish(mut self) -> Vec<FileDiff> {
        self.flush();
        self.files
    }

    fn flush(&mut self) {
        if let Some(builder) = self.current.take() {
            let mut diff = builder.diff;
            diff.diff_type = if diff.is_binary {
                DiffType::Binary
            } else if builder.has_body {
                DiffType::Unified
            } else {
                DiffType::Other
            };
            self.files.push(diff);
        }
        self.hunk = None;
        self.in_properties = false;
    }

    fn start_file(&mut self, original: &str, modified: &str) {
        self.flush();
        self.current = Some(FileBuilder {
            diff: FileDiff::new(original, modified),
            saw_modified_header: false,
            has_body: false,
        });
    }

    /// The file being built, opening an unnamed one for headerless input.
    /// Must not reset the running hunk.
    fn current(&mut self) -> &mut FileBuilder {
        self.current.get_or_insert_with(|| FileBuilder {
            diff: FileDiff::new("", ""),
            saw_modified_header: false,
            has_body: false,
        })
    }

    fn push_header(&mut self, line_type: LineType, line: &str) {
        self.current().diff.lines.push(DiffLine {
            line_type,
            content: line.to_string(),
            old_line_number: None,
            new_line_number: None,
        });
    }

    fn push_body(&mut self, line_type: LineType, line: &str) {
        let content = if line.is_empty() { "" } else { &line[1..] };
        let hunk = self.hunk.get_or_insert_with(Hunk::implicit);
        let (old, new) = hunk.numbers(line_type);
        let builder = self.current();
        builder.has_body = true;
        builder.diff.lines.push(DiffLine {
            line_type,
            content: content.to_string(),
            old_line_number: old,
            new_line_number: new,
        });
    }

    fn mark_binary(&mut self) {
        let builder = self.current();
        builder.diff.is_binary = true;
        builder.diff.lines.clear();
        self.hunk = None;
    }

    fn feed(&mut self, line: &str) {
        if !self.in_properties {
            if let Some(hunk) = &self.hunk {
                if hunk.remaining.is_some() {
                    match hunk.classify(line) {
                        Some(line_type) => {
                            self.push_body(line_type, line);
                            return;
                        }
                        None => self.hunk = None,
                    }
                }
            }
        }
        self.feed_outside_hunk(line);
    }

    fn feed_outside_hunk(&mut self, line: &str) {
        if let Some(path) = line.strip_prefix("Index: ") {
            let path = path.trim();
            self.start_file(path, path);
            self.push_header(LineType::Header, line);
            return;
        }
        if let Some(rest) = line.strip_prefix("diff --git ") {
            let (original, modified) = split_git_paths(rest);
            self.start_file(&original, &modified);
            self.push_header(LineType::Header, line);
            return;
        }
        if self.current.as_ref().is_some_and(|b| b.diff.is_binary) {
            return;
        }
        if line.starts_with("Property changes on: ") {
            self.hunk = None;
            self.in_properties = true;
            self.push_header(LineType::Header, line);
            return;
        }
        if self.in_properties {
            self.push_header(LineType::Header, line);
            return;
        }
        if is_binary_marker(line) {
            self.mark_binary();
            return;
        }
        if line.len() >= 4 && line.bytes().all(|b| b == b'=') {
            self.push_header(LineType::Header, line);
            return;
        }
        if line == "---" || line.starts_with("--- ") {
            let starts_new = self
                .current
                .as_ref()
                .is_some_and(|b| b.saw_modified_header || b.has_body);
            if starts_new {
                self.start_file("", "");
            }
            self.hunk = None;
            let path = header_path(&line[3..]);
            let builder = self.current();
            builder.diff.original_path = path.clone();
            if builder.diff.modified_path.is_empty() {
                builder.diff.modified_path = path;
            }
            self.push_header(LineType::FileHeader, line);
            return;
        }
        if line == "+++" || line.starts_with("+++ ") {
            self.hunk = None;
            let path = header_path(&line[3..]);
            let builder = self.current();
            builder.diff.modified_path = path.clone();
            if builder.diff.original_path.is_empty() {
                builder.diff.original_path = path;
            }
            builder.saw_modified_header = true;
            self.push_header(LineType::FileHeader, line);
            return;
        }
        if line.starts_with("@@") {
            self.hunk = Some(match parse_hunk_header(line) {
                Some((old_start, old_count, new_start, new_count)) => Hunk {
                    old_line: old_start,
                    new_line: new_start,
                    remaining: Some((old_count, new_count)),
                },
                None => Hunk::implicit(),
            });
            self.push_header(LineType::Header, line);
            self.current().has_body = true;
            return;
        }

        match line.as_bytes().first() {
            Some(b'+') => self.push_body(LineType::Added, line),
            Some(b'-') => self.push_body(LineType::Removed, line),
            Some(b' ') => self.push_body(LineType::Context, line),
            Some(b'\\') => self.push_header(LineType::Header, line),
            None => {
                if self.hunk.is_some() {
                    self.push_body(LineType::Context, line);
                }
            }
            // 无法识别的行按上下文处理，不参与行号计算
            Some(_) => {
                self.current().diff.lines.push(DiffLine {
                    line_type: LineType::Context,
                    content: line.to_string(),
                    old_line_number: None,
                    new_line_number: None,
                });
            }
        }
    }
}

fn is_binary_marker(line: &str) -> bool {
    line.starts_with("Cannot display: file marked as a binary type")
        || (line.starts_with("Binary files ") && line.ends_with(" differ"))
        || line == "GIT binary patch"
}

/// `a.txt\t(revision 3)` -> `a.txt`
fn header_path(rest: &str) -> String {
    let rest = rest.trim_start();
    let path = rest.split('\t').next().unwrap_or(rest);
    path.trim_end().to_string()
}

fn split_git_paths(rest: &str) -> (String, String) {
    match rest.split_once(" b/") {
        Some((a, b)) => (a.trim_start_matches("a/").to_string(), b.to_string()),
        None => (rest.to_string(), rest.to_string()),
    }
}

/// `@@ -old_start[,old_count] +new_start[,new_count] @@`, counts default to 1.
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let caps = HUNK_HEADER.captures(line)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };
    Some((num(1, 1)?, num(2, 1)?, num(3, 1)?, num(4, 1)?))
}

/// Parse unified diff text (one or many files) into a single document.
/// Text that is not a diff at all yields context lines, never an error.
pub fn parse_unified_diff(text: &str) -> DiffDocument {
    let mut parser = DiffParser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    DiffDocument { files: parser.finish() }
}

/// Split a multi-file diff (e.g. `svn diff` of a directory) into one
/// document per file. Empty input gives an empty vector.
pub fn parse_multi_file_diff(text: &str) -> Vec<DiffDocument> {
    parse_unified_diff(text)
        .files
        .into_iter()
        .map(|file| DiffDocument { files: vec![file] })
        .collect()
}

/// Diff two full texts without running svn.
pub fn create_unified_diff(original: &str, modified: &str) -> DiffDocument {
    create_named_unified_diff(original, modified, "original", "modified")
}

/// Line-level LCS edit script between `original` and `modified`. A changed
/// line becomes a removal directly followed by an addition.
pub fn create_named_unified_diff(original: &str, modified: &str, original_name: &str, modified_name: &str) -> DiffDocument {
    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = modified.lines().collect();

    let mut file = FileDiff::new(original_name, modified_name);
    let header = |line_type: LineType, content: String| DiffLine {
        line_type,
        content,
        old_line_number: None,
        new_line_number: None,
    };
    file.lines.push(header(LineType::FileHeader, format!("--- {}", original_name)));
    file.lines.push(header(LineType::FileHeader, format!("+++ {}", modified_name)));

    if old.is_empty() && new.is_empty() {
        return DiffDocument { files: vec![file] };
    }

    let start = |len: usize| if len == 0 { 0 } else { 1 };
    file.lines.push(header(
        LineType::Header,
        format!("@@ -{},{} +{},{} @@", start(old.len()), old.len(), start(new.len()), new.len()),
    ));

    let context = |old_index: usize, new_index: usize| DiffLine {
        line_type: LineType::Context,
        content: old[old_index].to_string(),
        old_line_number: Some(old_index as u32 + 1),
        new_line_number: Some(new_index as u32 + 1),
    };
    let removed = |old_index: usize| DiffLine {
        line_type: LineType::Removed,
        content: old[old_index].to_string(),
        old_line_number: Some(old_index as u32 + 1),
        new_line_number: None,
    };
    let added = |new_index: usize| DiffLine {
        line_type: LineType::Added,
        content: new[new_index].to_string(),
        old_line_number: None,
        new_line_number: Some(new_index as u32 + 1),
    };

    for op in capture_diff_slices(Algorithm::Lcs, &old, &new) {
        match op {
            DiffOp::Equal { old_index, new_index, len } => {
                file.lines.extend((0..len).map(|i| context(old_index + i, new_index + i)));
            }
            DiffOp::Delete { old_index, old_len, .. } => {
                file.lines.extend((old_index..old_index + old_len).map(removed));
            }
            DiffOp::Insert { new_index, new_len, .. } => {
                file.lines.extend((new_index..new_index + new_len).map(added));
            }
            DiffOp::Replace { old_index, old_len, new_index, new_len } => {
                file.lines.extend((old_index..old_index + old_len).map(removed));
                file.lines.extend((new_index..new_index + new_len).map(added));
            }
        }
    }

    file.diff_type = DiffType::Unified;
    DiffDocument { files: vec![file] }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVN_DIFF: &str = "Index: src/main.c
===================================================================
--- src/main.c\t(revision 41)
+++ src/main.c\t(working copy)
@@ -10,4 +10,5 @@
 int main(void)
 {
-    return 1;
+    puts(\"hi\");
+    return 0;
 }
Index: docs/logo.png
===================================================================
Cannot display: file marked as a binary type.
svn:mime-type = application/octet-stream
Index: README
===================================================================
--- README\t(revision 41)
+++ README\t(working copy)
@@ -1 +1 @@
-old title
+new title

Property changes on: README
___________________________________________________________________
Added: svn:eol-style
## -0,0 +1 ##
+native
";

    fn rescan(doc: &DiffDocument) -> (usize, usize) {
        let added = doc.lines().filter(|l| l.line_type == LineType::Added).count();
        let removed = doc.lines().filter(|l| l.line_type == LineType::Removed).count();
        (added, removed)
    }

    #[test]
    fn test_headerless_body_counts() {
        let doc = parse_unified_diff("+line1\n+line2\n-removed\n context");
        assert_eq!(doc.addition_count(), 2);
        assert_eq!(doc.deletion_count(), 1);
    }

    fn numbered(doc: &DiffDocument) -> Vec<(LineType, Option<u32>, Option<u32>)> {
        doc.lines()
            .filter(|l| matches!(l.line_type, LineType::Context | LineType::Added | LineType::Removed))
            .map(|l| (l.line_type, l.old_line_number, l.new_line_number))
            .collect()
    }

    #[test]
    fn test_bare_hunk_numbers_from_its_header() {
        let doc = parse_unified_diff("@@ -10,2 +10,2 @@\n a\n-b\n+c\n");
        assert_eq!(
            numbered(&doc),
            vec![
                (LineType::Context, Some(10), Some(10)),
                (LineType::Removed, Some(11), None),
                (LineType::Added, None, Some(11)),
            ]
        );
    }

    #[test]
    fn test_headerless_body_is_numbered_from_one() {
        let doc = parse_unified_diff("+x\n+y");
        assert_eq!(
            numbered(&doc),
            vec![(LineType::Added, None, Some(1)), (LineType::Added, None, Some(2))]
        );

        let doc = parse_unified_diff("+line1\n+line2\n-removed\n context");
        assert_eq!(
            numbered(&doc),
            vec![
                (LineType::Added, None, Some(1)),
                (LineType::Added, None, Some(2)),
                (LineType::Removed, Some(1), None),
                (LineType::Context, Some(2), Some(3)),
            ]
        );
    }

    #[test]
    fn test_bare_hunk_counts_keep_dash_lines_in_body() {
        let doc = parse_unified_diff("@@ -1,2 +1,1 @@\n a\n--- dashes");
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.deletion_count(), 1);
        let last = doc.files[0].lines.last().unwrap();
        assert_eq!(last.line_type, LineType::Removed);
        assert_eq!(last.content, "-- dashes");
        assert_eq!(last.old_line_number, Some(2));
    }

    #[test]
    fn test_context_only_diff_has_no_changes() {
        for text in [" a\n b\n c", "@@ -1,3 +1,3 @@\n a\n b\n c\n", " only"] {
            let doc = parse_unified_diff(text);
            assert_eq!(doc.addition_count(), 0, "{:?}", text);
            assert_eq!(doc.deletion_count(), 0, "{:?}", text);
        }
    }

    #[test]
    fn test_empty_multi_file_diff_is_empty() {
        assert!(parse_multi_file_diff("").is_empty());
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn test_svn_multi_file_diff() {
        let docs = parse_multi_file_diff(SVN_DIFF);
        assert_eq!(docs.len(), 3);

        let main = &docs[0].files[0];
        assert_eq!(main.original_path, "src/main.c");
        assert_eq!(main.modified_path, "src/main.c");
        assert_eq!(main.diff_type, DiffType::Unified);
        assert_eq!(main.addition_count(), 2);
        assert_eq!(main.deletion_count(), 1);

        let logo = &docs[1].files[0];
        assert!(logo.is_binary);
        assert_eq!(logo.diff_type, DiffType::Binary);
        assert!(logo.lines.is_empty());
        assert_eq!(logo.display_path(), "docs/logo.png");

        // property values are headers, not additions
        let readme = &docs[2].files[0];
        assert_eq!(readme.addition_count(), 1);
        assert_eq!(readme.deletion_count(), 1);
        assert!(readme.lines.iter().any(|l| l.content == "+native" && l.line_type == LineType::Header));
    }

    #[test]
    fn test_line_numbers_follow_hunk_header() {
        let doc = parse_unified_diff(SVN_DIFF);
        let main = &doc.files[0];
        let body: Vec<&DiffLine> = main
            .lines
            .iter()
            .filter(|l| matches!(l.line_type, LineType::Context | LineType::Added | LineType::Removed))
            .collect();
        let numbers: Vec<(Option<u32>, Option<u32>)> = body.iter().map(|l| (l.old_line_number, l.new_line_number)).collect();
        assert_eq!(
            numbers,
            vec![
                (Some(10), Some(10)),
                (Some(11), Some(11)),
                (Some(12), None),
                (None, Some(12)),
                (None, Some(13)),
                (Some(13), Some(14)),
            ]
        );
        assert!(main
            .lines
            .iter()
            .filter(|l| matches!(l.line_type, LineType::Header | LineType::FileHeader))
            .all(|l| l.old_line_number.is_none() && l.new_line_number.is_none()));
    }

    #[test]
    fn test_triple_plus_inside_hunk_is_body() {
        let text = "--- a\n+++ b\n@@ -1,1 +1,2 @@\n keep\n+++ not a header\n";
        let doc = parse_unified_diff(text);
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.addition_count(), 1);
        assert!(doc.lines().any(|l| l.line_type == LineType::Added && l.content == "++ not a header"));
    }

    #[test]
    fn test_headers_without_index_split_files() {
        let text = "--- a.txt\n+++ a.txt\n@@ -1 +1 @@\n-x\n+y\n--- b.txt\n+++ b.txt\n@@ -1,0 +1,1 @@\n+z\n\\ No newline at end of file\n";
        let docs = parse_multi_file_diff(text);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].files[0].original_path, "b.txt");
        assert_eq!(docs[1].addition_count(), 1);
        assert_eq!(docs[1].deletion_count(), 0);
        assert!(docs[1].lines().any(|l| l.line_type == LineType::Header && l.content.starts_with('\\')));
    }

    #[test]
    fn test_unrecognized_lines_are_tolerated() {
        let doc = parse_unified_diff("@@ -1,1 +1,1 @@\n-a\n+b\n?? stray\nsome text");
        assert_eq!(doc.addition_count(), 1);
        assert_eq!(doc.deletion_count(), 1);
        let stray = doc.lines().find(|l| l.content == "?? stray").unwrap();
        assert_eq!(stray.line_type, LineType::Context);
        assert_eq!(stray.old_line_number, None);
    }

    #[test]
    fn test_git_binary_marker() {
        let text = "diff --git a/img.png b/img.png\nindex 1..2 100644\nBinary files a/img.png and b/img.png differ\n";
        let docs = parse_multi_file_diff(text);
        assert_eq!(docs.len(), 1);
        let file = &docs[0].files[0];
        assert!(file.is_binary);
        assert!(file.lines.is_empty());
        assert_eq!(file.modified_path, "img.png");
    }

    #[test]
    fn test_create_removed_line_only() {
        let doc = create_unified_diff("line1\nline2", "line1");
        assert!(doc.deletion_count() > 0);
        assert_eq!(doc.addition_count(), 0);
    }

    #[test]
    fn test_created_counts_match_lines() {
        let pairs = [
            ("", ""),
            ("", "a\nb"),
            ("a\nb", ""),
            ("a\nb\nc", "a\nB\nc"),
            ("one\ntwo\nthree\nfour", "zero\none\nthree\nfour\nfive"),
            ("x\nx\nx", "x\ny\nx\ny"),
            ("same\r\ntext\r\n", "same\ntext\n"),
        ];
        for (old, new) in pairs {
            let doc = create_unified_diff(old, new);
            assert_eq!(rescan(&doc), (doc.addition_count(), doc.deletion_count()), "{:?} -> {:?}", old, new);

            // 重新解析渲染结果得到相同的统计
            let reparsed = parse_unified_diff(&doc.files[0].to_unified_string());
            assert_eq!(reparsed.addition_count(), doc.addition_count());
            assert_eq!(reparsed.deletion_count(), doc.deletion_count());
        }
    }

    #[test]
    fn test_changed_line_is_removal_then_addition() {
        let doc = create_unified_diff("a\nb\nc", "a\nB\nc");
        let body: Vec<(LineType, &str)> = doc
            .lines()
            .filter(|l| matches!(l.line_type, LineType::Context | LineType::Added | LineType::Removed))
            .map(|l| (l.line_type, l.content.as_str()))
            .collect();
        assert_eq!(
            body,
            vec![
                (LineType::Context, "a"),
                (LineType::Removed, "b"),
                (LineType::Added, "B"),
                (LineType::Context, "c"),
            ]
        );
    }

    #[test]
    fn test_identical_texts_have_no_changes() {
        for text in ["", "a\nb\nc", "same\n"] {
            let doc = create_named_unified_diff(text, text, "left.txt", "right.txt");
            assert!(!doc.is_empty());
            assert!(!doc.has_changes(), "{:?}", text);
        }
        assert!(create_unified_diff("a", "b").has_changes());
        assert!(create_unified_diff("", "new").has_changes());
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let old = "a\nb\na\nb\na";
        let new = "b\na\nb\na\nb";
        assert_eq!(create_unified_diff(old, new), create_unified_diff(old, new));
    }
}
