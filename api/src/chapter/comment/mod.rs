pub mod create;
pub mod delete;
pub mod get;
pub mod patch;
pub mod store;
pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CONTENT_CHARS: usize = 5000;

/// Trims the comment body and checks its length.
pub fn clean_content(content: &str) -> Result<String, &'static str> {
    let content = content.trim();

    if content.is_empty() {
        return Err("No content provided");
    }

    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err("Content too long (max 5000 characters)");
    }

    Ok(content.to_string())
}

// The flat row as the store returns it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub user_name: String,
    pub user_image: Option<String>,
    pub chapter_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// The nested model that will be returned to the client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: CommentRecord,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(comment: CommentRecord) -> Self {
        CommentNode {
            comment,
            children: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.comment.deleted_at.is_some()
    }

    /// Number of descendants below this node, at any depth.
    pub fn reply_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CommentNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// The derived drop would recurse once per reply level
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}


#[cfg(test)]
mod test {
    use super::fixtures::{base_time, record};
    use super::*;

    #[test]
    fn test_node_serializes_flat_with_children() {
        let mut node = CommentNode::new(record(1, None, 0));
        node.children.push(CommentNode::new(record(2, Some(1), 1)));

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["parentId"], serde_json::Value::Null);
        assert_eq!(value["chapterId"], 7);
        assert_eq!(value["userName"], "Reader 2");
        assert!(value.get("comment").is_none());
        assert_eq!(value["children"][0]["parentId"], 1);
        assert_eq!(value["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_reply_count_counts_all_descendants() {
        let mut grandchild = CommentNode::new(record(3, Some(2), 2));
        grandchild.children.push(CommentNode::new(record(4, Some(3), 3)));
        let mut child = CommentNode::new(record(2, Some(1), 1));
        child.children.push(grandchild);
        let mut root = CommentNode::new(record(1, None, 0));
        root.children.push(child);
        root.children.push(CommentNode::new(record(5, Some(1), 4)));

        assert_eq!(root.reply_count(), 4);
        assert_eq!(root.children[1].reply_count(), 0);
    }

    #[test]
    fn test_clean_content() {
        assert_eq!(clean_content("  nice panel  "), Ok("nice panel".to_string()));
        assert_eq!(clean_content(" \n "), Err("No content provided"));
        assert!(clean_content(&"a".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert_eq!(
            clean_content(&"é".repeat(MAX_CONTENT_CHARS + 1)),
            Err("Content too long (max 5000 characters)")
        );
    }

    #[test]
    fn test_is_deleted() {
        let mut r = record(1, None, 0);
        assert!(!CommentNode::new(r.clone()).is_deleted());
        r.deleted_at = Some(base_time());
        assert!(CommentNode::new(r).is_deleted());
    }
}
