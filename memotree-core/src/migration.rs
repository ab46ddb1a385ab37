//! Legacy document migration
//!
//! Earlier iterations of the app wrote tree documents in several shapes:
//! nodes without `children`, memo lists as plain `memo_ids`, sample trees
//! carrying only names. Everything read from disk goes through here and comes
//! out in the canonical [`Node`] shape.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Result;
use crate::node::{generate_key, MemoRef, Node, DEFAULT_NODE_NAME, ROOT_KEY};

/// Node as found on disk, every field optional
#[derive(Debug, Default, Deserialize)]
struct RawNode {
    key: Option<String>,
    name: Option<String>,
    children: Option<Vec<RawNode>>,
    memos: Option<Vec<MemoRef>>,
    memo_ids: Option<Vec<String>>,
}

impl RawNode {
    fn is_blank(&self) -> bool {
        self.key.is_none()
            && self.name.is_none()
            && self.children.is_none()
            && self.memos.is_none()
            && self.memo_ids.is_none()
    }
}

/// What had to be repaired while reading a document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Nodes that had no key (or a duplicate one) and received a fresh key
    pub generated_keys: usize,
    /// Memo references converted from `memo_ids`
    pub converted_memo_ids: usize,
    /// Memo references dropped because the id was already attached
    pub dropped_duplicate_memos: usize,
    /// Nodes that had no name
    pub defaulted_names: usize,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a tree document in any known shape.
///
/// `null` and `{}` both mean "no tree".
pub fn parse_tree(json: &str) -> Result<(Option<Node>, MigrationReport)> {
    let raw: Option<RawNode> = serde_json::from_str(json)?;
    let mut report = MigrationReport::default();
    let tree = match raw {
        Some(raw) if !raw.is_blank() => {
            let mut seen = HashSet::new();
            Some(convert(raw, true, &mut seen, &mut report))
        }
        _ => None,
    };

    if !report.is_clean() {
        log::debug!("Migrated legacy tree document: {:?}", report);
    }
    Ok((tree, report))
}

fn convert(
    raw: RawNode,
    is_root: bool,
    seen: &mut HashSet<String>,
    report: &mut MigrationReport,
) -> Node {
    let key = match raw.key {
        Some(key) if !seen.contains(&key) => key,
        None if is_root => ROOT_KEY.to_string(),
        _ => {
            report.generated_keys += 1;
            generate_key()
        }
    };
    seen.insert(key.clone());

    let name = raw.name.unwrap_or_else(|| {
        report.defaulted_names += 1;
        DEFAULT_NODE_NAME.to_string()
    });

    let mut memos: Vec<MemoRef> = Vec::new();
    for memo in raw.memos.unwrap_or_default() {
        if memos.iter().any(|m| m.id == memo.id) {
            report.dropped_duplicate_memos += 1;
        } else {
            memos.push(memo);
        }
    }
    for id in raw.memo_ids.unwrap_or_default() {
        if memos.iter().any(|m| m.id == id) {
            report.dropped_duplicate_memos += 1;
        } else {
            report.converted_memo_ids += 1;
            memos.push(MemoRef::new(id));
        }
    }

    let children = raw
        .children
        .unwrap_or_default()
        .into_iter()
        .map(|child| convert(child, false, seen, report))
        .collect();

    Node {
        key,
        name,
        children,
        memos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_document_is_clean() {
        let json = r#"{
            "key": "root", "name": "Root",
            "children": [{ "key": "c1", "name": "Child", "children": [], "memos": [] }],
            "memos": [{ "id": "m1", "connected_node_id": "c1" }]
        }"#;
        let (tree, report) = parse_tree(json).unwrap();
        let tree = tree.unwrap();
        assert!(report.is_clean());
        assert_eq!(tree.children[0].key, "c1");
        assert_eq!(tree.memos[0], MemoRef::new("m1").with_target("c1"));
    }

    #[test]
    fn test_null_and_blank_mean_no_tree() {
        assert!(parse_tree("null").unwrap().0.is_none());
        assert!(parse_tree("{}").unwrap().0.is_none());
    }

    #[test]
    fn test_missing_children_and_memos() {
        let (tree, report) = parse_tree(r#"{ "key": "root", "name": "Root" }"#).unwrap();
        let tree = tree.unwrap();
        assert!(tree.children.is_empty());
        assert!(tree.memos.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_memo_ids_are_converted() {
        let json = r#"{
            "key": "root", "name": "Root",
            "memos": [{ "id": "a", "connected_node_id": null }],
            "memo_ids": ["a", "b"]
        }"#;
        let (tree, report) = parse_tree(json).unwrap();
        let tree = tree.unwrap();
        assert_eq!(tree.memos, vec![MemoRef::new("a"), MemoRef::new("b")]);
        assert_eq!(report.converted_memo_ids, 1);
        assert_eq!(report.dropped_duplicate_memos, 1);
    }

    #[test]
    fn test_name_only_sample_tree_gets_keys() {
        let json = r#"{
            "name": "Root",
            "children": [{ "name": "Child 1" }, { "name": "Child 2" }]
        }"#;
        let (tree, report) = parse_tree(json).unwrap();
        let tree = tree.unwrap();
        assert_eq!(tree.key, ROOT_KEY);
        assert_ne!(tree.children[0].key, tree.children[1].key);
        assert_eq!(report.generated_keys, 2);
    }

    #[test]
    fn test_duplicate_keys_are_rekeyed() {
        let json = r#"{
            "key": "root", "name": "Root",
            "children": [{ "key": "x", "name": "One" }, { "key": "x", "name": "Two" }]
        }"#;
        let (tree, report) = parse_tree(json).unwrap();
        let tree = tree.unwrap();
        assert_eq!(tree.children[0].key, "x");
        assert_ne!(tree.children[1].key, "x");
        assert_eq!(report.generated_keys, 1);
    }

    #[test]
    fn test_camel_case_target_is_accepted() {
        let json = r#"{ "key": "root", "name": "Root", "memos": [{ "id": "m", "connectedNodeId": "c" }] }"#;
        let (tree, _) = parse_tree(json).unwrap();
        assert_eq!(
            tree.unwrap().memos[0].connected_node_id.as_deref(),
            Some("c")
        );
    }
}
