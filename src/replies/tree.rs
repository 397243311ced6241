use serde::Serialize;

use crate::api::types::Status;

/// Top-level replies kept after sorting.
pub const MAX_TOP_LEVEL: usize = 2;
/// Nested replies kept under each top-level reply.
pub const MAX_NESTED: usize = 2;
/// Root reply plus one level of nesting.
pub const MAX_DEPTH: usize = 2;

/// A fetched status placed in the bounded reply preview.
///
/// Nested nodes never carry children of their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyNode {
    pub status: Status,
    pub nested: Vec<ReplyNode>,
}

impl ReplyNode {
    fn leaf(status: &Status) -> Self {
        Self {
            status: status.clone(),
            nested: Vec::new(),
        }
    }
}

/// Shape a flat descendant list into the reply preview for `subject_id`.
///
/// Direct replies get up to [`MAX_NESTED`] children in server order, are
/// sorted newest first (stable on equal timestamps) and cut to
/// [`MAX_TOP_LEVEL`].
pub fn build_reply_tree(descendants: &[Status], subject_id: &str) -> Vec<ReplyNode> {
    let mut nodes: Vec<ReplyNode> = children_of(descendants, subject_id)
        .map(|reply| ReplyNode {
            status: reply.clone(),
            nested: children_of(descendants, &reply.id)
                .take(MAX_NESTED)
                .map(ReplyNode::leaf)
                .collect(),
        })
        .collect();

    // `sort_by` is stable, so equal timestamps keep server order.
    nodes.sort_by(|a, b| b.status.created_at.cmp(&a.status.created_at));
    nodes.truncate(MAX_TOP_LEVEL);
    nodes
}

/// Direct replies to `parent`, in server order.
fn children_of<'a>(
    descendants: &'a [Status],
    parent: &'a str,
) -> impl Iterator<Item = &'a Status> + 'a {
    descendants
        .iter()
        .filter(move |s| s.in_reply_to_id.as_deref() == Some(parent))
}

/// Whether the "view all" link is needed to reach the remaining replies.
pub fn shows_view_all(total_replies: u64, materialized_top_level: usize) -> bool {
    total_replies > materialized_top_level as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::status;

    fn ids(nodes: &[ReplyNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.status.id.as_str()).collect()
    }

    #[test]
    fn newest_two_direct_replies_with_nested_children() {
        let d = vec![
            status("2", Some("1"), 10),
            status("3", Some("1"), 20),
            status("4", Some("2"), 15),
            status("5", Some("1"), 5),
        ];
        let tree = build_reply_tree(&d, "1");
        assert_eq!(ids(&tree), ["3", "2"]);
        assert!(tree[0].nested.is_empty());
        assert_eq!(ids(&tree[1].nested), ["4"]);
    }

    #[test]
    fn no_direct_replies_gives_empty_tree() {
        let d = vec![status("4", Some("2"), 15), status("9", None, 1)];
        assert!(build_reply_tree(&d, "1").is_empty());
        assert!(build_reply_tree(&[], "1").is_empty());
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let d = vec![
            status("a", Some("1"), 7),
            status("b", Some("1"), 7),
            status("c", Some("1"), 7),
        ];
        assert_eq!(ids(&build_reply_tree(&d, "1")), ["a", "b"]);
    }

    #[test]
    fn nested_children_are_capped_in_server_order() {
        let d = vec![
            status("2", Some("1"), 10),
            status("6", Some("2"), 30),
            status("4", Some("2"), 11),
            status("5", Some("2"), 12),
            status("7", Some("4"), 40),
        ];
        let tree = build_reply_tree(&d, "1");
        assert_eq!(ids(&tree[0].nested), ["6", "4"]);
        // Depth stays at two: the reply to 4 is not attached anywhere.
        assert!(tree[0].nested.iter().all(|n| n.nested.is_empty()));
    }

    #[test]
    fn every_node_points_at_its_parent() {
        let d: Vec<_> = (0..12)
            .map(|i| {
                let parent = if i % 3 == 0 { "1".to_string() } else { format!("r{}", i - i % 3) };
                status(&format!("r{i}"), Some(&parent), (i * 7 % 5) as i64)
            })
            .collect();
        let tree = build_reply_tree(&d, "1");
        assert!(tree.len() <= MAX_TOP_LEVEL);
        for node in &tree {
            assert_eq!(node.status.in_reply_to_id.as_deref(), Some("1"));
            assert!(node.nested.len() <= MAX_NESTED);
            for child in &node.nested {
                assert_eq!(child.status.in_reply_to_id.as_deref(), Some(node.status.id.as_str()));
            }
        }
        assert!(tree.windows(2).all(|w| w[0].status.created_at >= w[1].status.created_at));
    }

    #[test]
    fn children_of_borrows_from_both_inputs() {
        let d = vec![
            status("2", Some("1"), 10),
            status("3", Some("2"), 20),
            status("4", Some("1"), 5),
        ];
        let parent = String::from("1");
        let direct: Vec<&str> = children_of(&d, &parent).map(|s| s.id.as_str()).collect();
        assert_eq!(direct, ["2", "4"]);
        assert_eq!(children_of(&d, "3").count(), 0);
    }

    #[test]
    fn view_all_only_when_more_replies_exist() {
        assert!(shows_view_all(3, 2));
        assert!(!shows_view_all(2, 2));
        assert!(!shows_view_all(0, 0));
        assert!(shows_view_all(1, 0));
    }
}
