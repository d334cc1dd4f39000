//! ### svn blame

use roxmltree::Document;

use crate::core::xml::{attr_u64, child, child_text};

use super::models::SvnDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameLine {
    pub line_number: u64,
    /// 未提交的行没有版本号
    pub revision: Option<u64>,
    pub author: Option<String>,
    pub date: Option<SvnDate>,
    pub content: String,
}

/// Parse `svn blame --xml`. The XML form carries no line text;
/// see [`attach_contents`].
pub fn parse_blame_xml(doc: &Document<'_>) -> Vec<BlameLine> {
    let mut lines = Vec::new();
    for target in doc.root_element().children().filter(|n| n.has_tag_name("target")) {
        for entry in target.children().filter(|n| n.has_tag_name("entry")) {
            let Some(line_number) = attr_u64(entry, "line-number") else {
                continue;
            };
            let commit = child(entry, "commit");
            lines.push(BlameLine {
                line_number,
                revision: commit.and_then(|c| attr_u64(c, "revision")),
                author: commit.and_then(|c| child_text(c, "author")),
                date: commit.and_then(|c| child_text(c, "date")).map(|d| SvnDate::parse(&d)),
                content: String::new(),
            });
        }
    }
    lines
}

/// Fill line text from the file contents at the blamed revision.
pub fn attach_contents(lines: &mut [BlameLine], contents: &str) {
    let text: Vec<&str> = contents.lines().collect();
    for line in lines.iter_mut() {
        let index = line.line_number.saturating_sub(1) as usize;
        if let Some(content) = text.get(index) {
            line.content = content.to_string();
        }
    }
}

/// Parse plain `svn blame`: `   rev     author content`, `-` for uncommitted lines.
pub fn parse_blame_text(text: &str) -> Vec<BlameLine> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut parts = raw.trim_start().splitn(2, ' ');
        let (Some(revision), Some(rest)) = (parts.next(), parts.next()) else {
            continue;
        };
        let revision = match revision {
            "-" => None,
            r => match r.parse::<u64>() {
                Ok(r) => Some(r),
                Err(_) => continue,
            },
        };

        let rest = rest.trim_start();
        let (author, content) = match rest.split_once(' ') {
            Some((author, content)) => (author, content),
            None => (rest, ""),
        };
        lines.push(BlameLine {
            line_number: lines.len() as u64 + 1,
            revision,
            author: (author != "-").then(|| author.to_string()),
            date: None,
            content: content.to_string(),
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::xml::parse_xml;

    #[test]
    fn test_parse_blame_xml_and_attach() {
        let doc = parse_xml(
            r#"<blame><target path="a.txt">
<entry line-number="1"><commit revision="3"><author>alice</author><date>2024-03-01T10:00:00Z</date></commit></entry>
<entry line-number="2"></entry>
</target></blame>"#,
        )
        .unwrap();
        let mut lines = parse_blame_xml(&doc);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].revision, Some(3));
        assert_eq!(lines[1].revision, None);

        attach_contents(&mut lines, "fn main() {\n}\n");
        assert_eq!(lines[0].content, "fn main() {");
        assert_eq!(lines[1].content, "}");
    }

    #[test]
    fn test_parse_blame_text() {
        let text = "     3      alice fn main() {\n    12 bob_the_builder     println!(\"hi\");\n     -          - }\n";
        let lines = parse_blame_text(text);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].revision, Some(3));
        assert_eq!(lines[0].author.as_deref(), Some("alice"));
        assert_eq!(lines[0].content, "fn main() {");
        assert_eq!(lines[1].author.as_deref(), Some("bob_the_builder"));
        assert_eq!(lines[1].content, "    println!(\"hi\");");
        assert_eq!(lines[2].revision, None);
        assert_eq!(lines[2].author, None);
        assert_eq!(lines[2].line_number, 3);
    }
}
