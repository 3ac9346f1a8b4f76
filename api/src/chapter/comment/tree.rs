use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::{CommentNode, CommentRecord};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Oldest,
    Newest,
}

/// Turns the flat rows of one chapter into a forest of threaded comments.
///
/// Roots are the rows without a parent, or whose parent is not part of
/// `records`. Soft-deleted rows stay where they are, children included. Roots
/// and every `children` list keep the relative order of `records`; nothing is
/// sorted here.
///
/// Rows that can never reach a root (a row that is its own parent, or a
/// `parent_id` cycle) are cut from their parent and promoted to roots, so the
/// result is always a finite forest holding every row exactly once.
pub fn build_comment_tree(records: Vec<CommentRecord>) -> Vec<CommentNode> {
    let len = records.len();

    // First pass: every row gets a slot before any edge is drawn, so a reply
    // may come before its parent in `records`.
    let mut index = HashMap::<i32, usize>::with_capacity(len);
    for (i, record) in records.iter().enumerate() {
        index.entry(record.id).or_insert(i);
    }

    // Second pass: resolve parents and attach in input order.
    let mut parents: Vec<Option<usize>> = records
        .iter()
        .map(|r| r.parent_id.and_then(|p| index.get(&p).copied()))
        .collect();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (i, parent) in parents.iter().enumerate() {
        if let Some(parent) = parent {
            children[*parent].push(i);
        }
    }

    let mut visited = vec![false; len];
    let mut preorder = Vec::with_capacity(len);
    for i in 0..len {
        if parents[i].is_none() {
            walk(i, &children, &mut visited, &mut preorder);
        }
    }

    // Whatever is left is a cycle or hangs off one. Climb until a row repeats:
    // that row is on the cycle, and cutting it frees the rest.
    for i in 0..len {
        if visited[i] {
            continue;
        }
        let mut seen = HashSet::new();
        let mut member = i;
        while seen.insert(member) {
            match parents[member] {
                Some(parent) if !visited[parent] => member = parent,
                _ => break,
            }
        }
        if let Some(parent) = parents[member].take() {
            children[parent].retain(|&c| c != member);
        }
        tracing::warn!(
            comment_id = records[member].id,
            parent_id = ?records[member].parent_id,
            "Comment is part of a parent cycle, promoting it to a root"
        );
        walk(member, &children, &mut visited, &mut preorder);
    }

    // Descendants come after their ancestors in preorder, so walking it
    // backwards finishes every child before its parent needs it.
    let mut rows: Vec<Option<CommentRecord>> = records.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode>> = (0..len).map(|_| None).collect();
    for &i in preorder.iter().rev() {
        let Some(comment) = rows[i].take() else {
            continue;
        };
        let kids = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[i] = Some(CommentNode {
            comment,
            children: kids,
        });
    }

    (0..len)
        .filter(|&i| parents[i].is_none())
        .filter_map(|i| built[i].take())
        .collect()
}

fn walk(start: usize, children: &[Vec<usize>], visited: &mut [bool], preorder: &mut Vec<usize>) {
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        preorder.push(i);
        stack.extend(children[i].iter().rev());
    }
}

/// Total number of nodes in a forest, roots included.
pub fn count_nodes(forest: &[CommentNode]) -> usize {
    forest.len() + forest.iter().map(CommentNode::reply_count).sum::<usize>()
}

/// Re-sorts every level of the forest by creation time.
pub fn sort_tree(forest: &mut [CommentNode], order: SortOrder) {
    let mut stack: Vec<&mut [CommentNode]> = vec![forest];
    while let Some(level) = stack.pop() {
        match order {
            SortOrder::Oldest => {
                level.sort_by_key(|c| (c.comment.created_at, c.comment.id));
            }
            SortOrder::Newest => {
                level.sort_by(|a, b| {
                    (b.comment.created_at, b.comment.id).cmp(&(a.comment.created_at, a.comment.id))
                });
            }
        }
        for node in level {
            stack.push(&mut node.children);
        }
    }
}

/// Blanks the content of soft-deleted comments, keeping them and their replies
/// in the tree.
pub fn redact_deleted(forest: &mut [CommentNode]) {
    let mut stack: Vec<&mut CommentNode> = forest.iter_mut().collect();
    while let Some(node) = stack.pop() {
        if node.is_deleted() {
            node.comment.content.clear();
        }
        stack.extend(node.children.iter_mut());
    }
}
