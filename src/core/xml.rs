//! roxmltree helpers shared by the `--xml` parsers.

use roxmltree::{Document, Node};

/// Parse svn's `--xml` output. Malformed or empty input yields `None`;
/// some sub-commands and old svn versions simply have no XML form.
pub fn parse_xml(text: &str) -> Option<Document<'_>> {
    if text.trim().is_empty() {
        return None;
    }
    match Document::parse(text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::debug!("output is not well-formed XML: {}", e);
            None
        }
    }
}

/// First direct child element with the given tag.
pub fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// Text of a direct child element, `None` if missing or empty.
pub fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|n| n.text())
        .map(|t| t.to_string())
        .filter(|t| !t.is_empty())
}

pub fn attr_u64(node: Node<'_, '_>, name: &str) -> Option<u64> {
    node.attribute(name).and_then(|v| v.trim().parse().ok())
}

pub fn attr_bool(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name) == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xml_rejects_garbage() {
        assert!(parse_xml("").is_none());
        assert!(parse_xml("svn: E200009: not xml").is_none());
        assert!(parse_xml("<log><logentry revision=\"1\"></log>").is_none());
    }

    #[test]
    fn test_child_helpers() {
        let doc = parse_xml(r#"<entry n="7" f="true"><name>a.txt</name><empty></empty></entry>"#).unwrap();
        let root = doc.root_element();
        assert_eq!(child_text(root, "name").as_deref(), Some("a.txt"));
        assert_eq!(child_text(root, "empty"), None);
        assert_eq!(attr_u64(root, "n"), Some(7));
        assert!(attr_bool(root, "f"));
        assert!(!attr_bool(root, "missing"));
    }
}
