//! 存放各种解析器共用的数据模型
//!

use chrono::{DateTime, FixedOffset};

/// 节点类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
    None,
    Unrecognized(String),
}

impl NodeKind {
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "file" => NodeKind::File,
            "dir" | "directory" => NodeKind::Dir,
            "none" | "" => NodeKind::None,
            _ => NodeKind::Unrecognized(token.to_string()),
        }
    }
}

/// svn 时间：XML 中是 RFC 3339，文本输出中是 `2024-03-01 10:00:00 +0800 (Fri, 01 Mar 2024)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnDate {
    pub raw: String,
    pub parsed: Option<DateTime<FixedOffset>>,
}

impl SvnDate {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = DateTime::parse_from_rfc3339(trimmed).ok().or_else(|| {
            // 去掉括号中的本地化日期
            let head = trimmed.split(" (").next().unwrap_or(trimmed);
            DateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S %z").ok()
        });

        SvnDate {
            raw: trimmed.to_string(),
            parsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_from_xml_and_text() {
        let xml = SvnDate::parse("2024-03-01T10:00:00.123456Z");
        assert!(xml.parsed.is_some());

        let text = SvnDate::parse("2024-03-01 18:00:00 +0800 (Fri, 01 Mar 2024)");
        assert_eq!(text.parsed, xml.parsed.map(|d| d - chrono::Duration::microseconds(123456)));

        let odd = SvnDate::parse("yesterday-ish");
        assert!(odd.parsed.is_none());
        assert_eq!(odd.raw, "yesterday-ish");
    }

    #[test]
    fn test_node_kind_keeps_unknown_tokens() {
        assert_eq!(NodeKind::parse("dir"), NodeKind::Dir);
        assert_eq!(NodeKind::parse("symlink"), NodeKind::Unrecognized("symlink".to_string()));
    }
}
