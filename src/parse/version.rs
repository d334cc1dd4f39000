//! ### svn --version

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

static VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// 原始输出的第一行
    pub raw: String,
}

impl SvnVersion {
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl Display for SvnVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Accepts `1.14.2` (`--quiet`) and the banner `svn, version 1.14.2 (r1899510)`.
pub fn parse_version(output: &str) -> Option<SvnVersion> {
    let first = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let caps = VERSION.captures(first)?;
    Some(SvnVersion {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?,
        raw: first.to_string(),
    })
}
