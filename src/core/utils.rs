//! ### SVN 工具函数
//!

use std::fmt::Display;

use chrono::{DateTime, Local};

use super::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Revision {
    Number(u64),
    Base,
    Committed,
    Prev,
    Working,
    Head,
}

impl Revision {
    /// 渲染为 svn 接受的版本号写法 (`5`, `HEAD`, ...)
    pub fn as_arg(&self) -> String {
        match self {
            Revision::Number(n) => n.to_string(),
            Revision::Head => "HEAD".to_string(),
            Revision::Base => "BASE".to_string(),
            Revision::Committed => "COMMITTED".to_string(),
            Revision::Prev => "PREV".to_string(),
            Revision::Working => "WORKING".to_string(),
        }
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Number(n) => write!(f, "r{}", n),
            other => write!(f, "{}", other.as_arg()),
        }
    }
}

/// 版本范围 `start:end`，end 为空时表示单个版本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRange {
    pub start: Revision,
    pub end: Option<Revision>,
}

impl RevisionRange {
    pub fn single(rev: Revision) -> Self {
        RevisionRange { start: rev, end: None }
    }

    pub fn between(start: Revision, end: Revision) -> Self {
        RevisionRange { start, end: Some(end) }
    }

    /// `-r<rev>` 或 `-r<start>:<end>`
    pub fn to_flag(&self) -> String {
        match &self.end {
            Some(end) => format!("-r{}:{}", self.start.as_arg(), end.as_arg()),
            None => format!("-r{}", self.start.as_arg()),
        }
    }
}

impl From<Revision> for RevisionRange {
    fn from(rev: Revision) -> Self {
        RevisionRange::single(rev)
    }
}

pub fn parse_revision_arg(input: &str) -> AppResult<Revision> {
    let s = input.trim();

    // 特殊处理关键字
    for (keyword, rev) in [
        ("HEAD", Revision::Head),
        ("BASE", Revision::Base),
        ("COMMITTED", Revision::Committed),
        ("PREV", Revision::Prev),
        ("WORKING", Revision::Working),
    ] {
        if s.eq_ignore_ascii_case(keyword) {
            return Ok(rev);
        }
    }

    let target_rev: u64 = match s.trim_start_matches(|c| c == 'r' || c == 'R').parse() {
        Ok(r) => r,
        Err(_) => {
            return Err(AppError::RevisionParse(input.to_string()));
        }
    };

    Ok(Revision::Number(target_rev))
}

/// 解析 `a:b` 形式的版本范围，也接受单个版本
pub fn parse_revision_range(input: &str) -> AppResult<RevisionRange> {
    match input.split_once(':') {
        Some((start, end)) => Ok(RevisionRange::between(parse_revision_arg(start)?, parse_revision_arg(end)?)),
        None => Ok(RevisionRange::single(parse_revision_arg(input)?)),
    }
}

/// Decode raw process output. UTF-8 is tried first, then a guessed legacy
/// encoding (svn on Windows writes in the console code page). Invalid
/// sequences are replaced instead of failing the whole line.
pub fn auto_decode(input: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(input) {
        return s.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(input, true);
    let encoding: &'static encoding_rs::Encoding = detector.guess(None, true);
    let (decoded, _, had_errors) = encoding.decode(input);

    if had_errors {
        log::debug!("output is not valid {}; decoded lossily", encoding.name());
    }

    decoded.into_owned()
}

/// 格式化相对时间显示
pub fn format_relative_time(time: &DateTime<chrono::FixedOffset>) -> String {
    let dt = time.with_timezone(&Local);
    let now = Local::now();
    let diff = now.signed_duration_since(dt);
    let secs = diff.num_seconds();

    if secs < 60 {
        "just now".to_string()
    }
    else if secs < 3600 {
        format!("{} mins ago", diff.num_minutes())
    }
    else if secs < 86400 {
        format!("{} hours ago", diff.num_hours())
    }
    else {
        dt.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_revision_arg() {
        assert_eq!(parse_revision_arg("100").unwrap(), Revision::Number(100));
        assert_eq!(parse_revision_arg(" r42 ").unwrap(), Revision::Number(42));
        assert_eq!(parse_revision_arg("head").unwrap(), Revision::Head);
        assert_eq!(parse_revision_arg("PREV").unwrap(), Revision::Prev);
        assert!(matches!(parse_revision_arg("abc"), Err(AppError::RevisionParse(_))));
    }

    #[test]
    fn test_revision_range_flag() {
        assert_eq!(RevisionRange::single(Revision::Number(7)).to_flag(), "-r7");
        assert_eq!(RevisionRange::between(Revision::Number(3), Revision::Head).to_flag(), "-r3:HEAD");
        assert_eq!(parse_revision_range("r10:r12").unwrap().to_flag(), "-r10:12");
        assert_eq!(Revision::Number(9).to_string(), "r9");
    }

    #[test]
    fn test_auto_decode_falls_back_for_legacy_bytes() {
        assert_eq!(auto_decode("状态 ok".as_bytes()), "状态 ok");
        // "修改" in GBK
        let gbk = [0xD0, 0xDE, 0xB8, 0xC4];
        assert!(!auto_decode(&gbk).is_empty());
    }
}
