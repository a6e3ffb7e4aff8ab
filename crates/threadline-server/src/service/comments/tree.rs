//! Reply tree reconstruction over a page of comments.

use std::collections::HashMap;

use threadline_postgres::model::Comment;
use uuid::Uuid;

/// A comment together with its direct replies.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    /// The comment itself.
    pub comment: Comment,
    /// Replies in the order they appeared in the input.
    pub replies: Vec<CommentNode>,
}

/// Nests a flat, creation-ordered list of comments into reply trees.
///
/// A comment becomes a reply of its parent when the parent is part of the
/// same input; otherwise it is returned as a root. Input order is preserved
/// among roots and among the replies of each node. Self references and
/// parent cycles are broken by promoting the first comment reached to a root,
/// so every input comment appears exactly once in the output.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let index: HashMap<Uuid, usize> = comments
        .iter()
        .enumerate()
        .map(|(position, comment)| (comment.id, position))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();

    for (position, comment) in comments.iter().enumerate() {
        let parent = comment
            .parent_id
            .and_then(|parent_id| index.get(&parent_id).copied())
            .filter(|&parent| parent != position);

        match parent {
            Some(parent) => children[parent].push(position),
            None => roots.push(position),
        }
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut tree: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|root| assemble(root, &mut slots, &children))
        .collect();

    // Comments still unplaced hang off a parent cycle unreachable from any root.
    for position in 0..slots.len() {
        if let Some(node) = assemble(position, &mut slots, &children) {
            tree.push(node);
        }
    }

    tree
}

/// Moves the comment at `position` and its unplaced descendants into a node.
fn assemble(
    position: usize,
    slots: &mut [Option<Comment>],
    children: &[Vec<usize>],
) -> Option<CommentNode> {
    let comment = slots.get_mut(position)?.take()?;
    let replies = children[position]
        .iter()
        .filter_map(|&child| assemble(child, slots, children))
        .collect();

    Some(CommentNode { comment, replies })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use threadline_postgres::types::CommentStatus;

    use super::*;

    fn comment(id: u128, parent: Option<u128>) -> Comment {
        Comment {
            id: Uuid::from_u128(id),
            content: format!("comment {id}"),
            post_id: "p1".to_owned(),
            author_id: "author".to_owned(),
            author_name: "Author".to_owned(),
            author_avatar: None,
            parent_id: parent.map(Uuid::from_u128),
            depth: 0,
            likes: Vec::new(),
            like_count: 0,
            status: CommentStatus::Active,
            created_at: Timestamp::UNIX_EPOCH.into(),
            updated_at: Timestamp::UNIX_EPOCH.into(),
        }
    }

    fn shape(nodes: &[CommentNode]) -> Vec<(u128, Vec<u128>)> {
        nodes
            .iter()
            .map(|node| {
                let replies = node.replies.iter().map(|r| r.comment.id.as_u128()).collect();
                (node.comment.id.as_u128(), replies)
            })
            .collect()
    }

    fn subtree_len(node: &CommentNode) -> usize {
        1 + node.replies.iter().map(subtree_len).sum::<usize>()
    }

    #[test]
    fn nests_replies_in_input_order() {
        let a = comment(1, None);
        let b = comment(2, None);
        let c = comment(3, Some(1));
        let d = comment(4, Some(3));

        let tree = build_tree(vec![a, b, c, d]);

        assert_eq!(shape(&tree), vec![(1, vec![3]), (2, vec![])]);
        assert_eq!(shape(&tree[0].replies), vec![(3, vec![4])]);
        assert!(tree[0].replies[0].replies[0].replies.is_empty());
        assert_eq!(subtree_len(&tree[0]), 3);
    }

    #[test]
    fn siblings_keep_their_order() {
        let tree = build_tree(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(1)),
            comment(4, Some(1)),
        ]);

        assert_eq!(shape(&tree), vec![(1, vec![2, 3, 4])]);
    }

    #[test]
    fn orphans_become_roots() {
        let tree = build_tree(vec![comment(1, None), comment(2, Some(99)), comment(3, Some(2))]);

        assert_eq!(shape(&tree), vec![(1, vec![]), (2, vec![3])]);
    }

    #[test]
    fn self_reference_becomes_root() {
        let tree = build_tree(vec![comment(1, Some(1))]);

        assert_eq!(shape(&tree), vec![(1, vec![])]);
    }

    #[test]
    fn parent_cycles_do_not_lose_comments() {
        let tree = build_tree(vec![comment(1, None), comment(2, Some(3)), comment(3, Some(2))]);

        let total: usize = tree.iter().map(subtree_len).sum();
        assert_eq!(total, 3);
        assert_eq!(shape(&tree), vec![(1, vec![]), (2, vec![3])]);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        assert!(build_tree(Vec::new()).is_empty());
    }
}
