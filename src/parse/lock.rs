//! Repository lock records.

use roxmltree::Node;

use crate::core::xml::child_text;

use super::models::SvnDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockInfo {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub created: Option<SvnDate>,
    pub expires: Option<SvnDate>,
}

impl LockInfo {
    /// From a `<lock>` element of `status`, `info` or `list` XML.
    pub fn from_xml(node: Node<'_, '_>) -> LockInfo {
        LockInfo {
            token: child_text(node, "token"),
            owner: child_text(node, "owner"),
            comment: child_text(node, "comment"),
            created: child_text(node, "created").map(|d| SvnDate::parse(&d)),
            expires: child_text(node, "expires").map(|d| SvnDate::parse(&d)),
        }
    }

    /// Apply one `Key: Value` pair of `svn info` text output.
    /// Returns false for keys that are not about locks.
    pub(crate) fn apply_info_field(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        match key {
            "Lock Token" => self.token = Some(value.to_string()),
            "Lock Owner" => self.owner = Some(value.to_string()),
            "Lock Created" => self.created = Some(SvnDate::parse(value)),
            "Lock Expires" => self.expires = Some(SvnDate::parse(value)),
            _ => return false,
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.owner.is_none() && self.created.is_none()
    }
}
