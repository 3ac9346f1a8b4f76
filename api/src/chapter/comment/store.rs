use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::identity::Identity;

use super::CommentRecord;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Comment `{0}` not found")]
    NotFound(i32),

    #[error("You're replying to comment `{0}` which does not exist")]
    ParentNotFound(i32),

    #[error("You're replying to comment `{0}` which does not belong to this chapter")]
    ParentInOtherChapter(i32),

    #[error("Comment `{0}` has been deleted and can't be replied to")]
    ParentDeleted(i32),

    #[error("Replies can't be nested more than {MAX_REPLY_DEPTH} levels deep")]
    TooDeep,

    #[error("You are not the owner of this comment")]
    NotOwner,

    #[error("Comment `{0}` has been deleted")]
    Deleted(i32),
}

/// Deepest reply level a new comment may sit at, top-level comments being 0.
pub const MAX_REPLY_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub chapter_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
}

#[derive(Default)]
struct Inner {
    comments: BTreeMap<i32, CommentRecord>,
    last_id: i32,
}

impl Inner {
    // Stored rows are never deeper than MAX_REPLY_DEPTH, so this stays short
    fn depth(&self, id: i32) -> usize {
        let mut depth = 0;
        let mut parent_id = self.comments.get(&id).and_then(|c| c.parent_id);
        while let Some(id) = parent_id {
            depth += 1;
            parent_id = self.comments.get(&id).and_then(|c| c.parent_id);
        }
        depth
    }
}

/// In-memory comment rows. Deletion is soft only: rows are never removed.
#[derive(Default)]
pub struct CommentStore {
    inner: RwLock<Inner>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row of the chapter, soft-deleted ones included, oldest first.
    pub async fn list_by_chapter(&self, chapter_id: i32) -> Vec<CommentRecord> {
        let inner = self.inner.read().await;
        let mut rows: Vec<CommentRecord> = inner
            .comments
            .values()
            .filter(|c| c.chapter_id == chapter_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| (c.created_at, c.id));
        rows
    }

    pub async fn get(&self, id: i32) -> Result<CommentRecord, StoreError> {
        self.inner
            .read()
            .await
            .comments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Parents must already exist, so a new row can never close a cycle.
    pub async fn create(
        &self,
        author: &Identity,
        comment: NewComment,
    ) -> Result<CommentRecord, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(parent_id) = comment.parent_id {
            let parent = inner
                .comments
                .get(&parent_id)
                .ok_or(StoreError::ParentNotFound(parent_id))?;
            if parent.chapter_id != comment.chapter_id {
                return Err(StoreError::ParentInOtherChapter(parent_id));
            }
            if parent.deleted_at.is_some() {
                return Err(StoreError::ParentDeleted(parent_id));
            }
            if inner.depth(parent_id) + 1 > MAX_REPLY_DEPTH {
                return Err(StoreError::TooDeep);
            }
        }

        inner.last_id += 1;
        let now = Utc::now();
        let record = CommentRecord {
            id: inner.last_id,
            content: comment.content,
            user_id: author.id,
            user_name: author.name.clone(),
            user_image: author.image.clone(),
            chapter_id: comment.chapter_id,
            parent_id: comment.parent_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.comments.insert(record.id, record.clone());

        tracing::info!(
            comment_id = record.id,
            chapter_id = record.chapter_id,
            parent_id = ?record.parent_id,
            user_id = record.user_id,
            "Comment created"
        );

        Ok(record)
    }

    pub async fn update_content(
        &self,
        user_id: i32,
        id: i32,
        content: String,
    ) -> Result<CommentRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let comment = inner.comments.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if comment.user_id != user_id {
            return Err(StoreError::NotOwner);
        }
        if comment.deleted_at.is_some() {
            return Err(StoreError::Deleted(id));
        }

        comment.content = content;
        comment.updated_at = Utc::now();

        Ok(comment.clone())
    }

    /// Marks the row as deleted. Deleting twice keeps the first timestamp.
    pub async fn soft_delete(&self, user_id: i32, id: i32) -> Result<CommentRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let comment = inner.comments.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if comment.user_id != user_id {
            return Err(StoreError::NotOwner);
        }

        if comment.deleted_at.is_none() {
            comment.deleted_at = Some(Utc::now());
            tracing::info!(comment_id = id, user_id, "Comment soft-deleted");
        }

        Ok(comment.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reader(id: i32) -> Identity {
        Identity {
            id,
            name: format!("Reader {}", id),
            image: None,
        }
    }

    fn new_comment(chapter_id: i32, parent_id: Option<i32>, content: &str) -> NewComment {
        NewComment {
            chapter_id,
            parent_id,
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_chapter() {
        let store = CommentStore::new();
        let author = reader(1);

        let first = store.create(&author, new_comment(7, None, "first")).await.unwrap();
        let reply = store
            .create(&author, new_comment(7, Some(first.id), "reply"))
            .await
            .unwrap();
        store.create(&author, new_comment(8, None, "elsewhere")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(reply.parent_id, Some(first.id));
        assert_eq!(reply.user_name, "Reader 1");
        assert_eq!(first.created_at, first.updated_at);

        let rows = store.list_by_chapter(7).await;
        assert_eq!(rows.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.get(3).await.unwrap().chapter_id, 8);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_parents() {
        let store = CommentStore::new();
        let author = reader(1);
        let other = store.create(&author, new_comment(8, None, "other")).await.unwrap();
        let gone = store.create(&author, new_comment(7, None, "gone")).await.unwrap();
        store.soft_delete(author.id, gone.id).await.unwrap();

        assert_eq!(
            store.create(&author, new_comment(7, Some(42), "x")).await,
            Err(StoreError::ParentNotFound(42))
        );
        assert_eq!(
            store.create(&author, new_comment(7, Some(other.id), "x")).await,
            Err(StoreError::ParentInOtherChapter(other.id))
        );
        assert_eq!(
            store.create(&author, new_comment(7, Some(gone.id), "x")).await,
            Err(StoreError::ParentDeleted(gone.id))
        );
        assert_eq!(store.list_by_chapter(7).await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_limits_reply_depth() {
        let store = CommentStore::new();
        let author = reader(1);

        let mut parent = None;
        for _ in 0..=MAX_REPLY_DEPTH {
            let comment = store
                .create(&author, new_comment(7, parent, "deeper"))
                .await
                .unwrap();
            parent = Some(comment.id);
        }

        assert_eq!(
            store.create(&author, new_comment(7, parent, "too deep")).await,
            Err(StoreError::TooDeep)
        );
        assert_eq!(store.list_by_chapter(7).await.len(), MAX_REPLY_DEPTH + 1);

        // Siblings higher up are still fine
        let first = store.list_by_chapter(7).await[0].id;
        assert!(store.create(&author, new_comment(7, Some(first), "ok")).await.is_ok());
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let store = CommentStore::new();
        let author = reader(1);
        let root = store.create(&author, new_comment(7, None, "root")).await.unwrap();
        store
            .create(&reader(2), new_comment(7, Some(root.id), "reply"))
            .await
            .unwrap();

        assert_eq!(
            store.soft_delete(2, root.id).await,
            Err(StoreError::NotOwner)
        );

        let deleted = store.soft_delete(author.id, root.id).await.unwrap();
        let again = store.soft_delete(author.id, root.id).await.unwrap();
        assert!(deleted.deleted_at.is_some());
        assert_eq!(deleted.deleted_at, again.deleted_at);
        assert_eq!(deleted.content, "root");

        let rows = store.list_by_chapter(7).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(
            store.soft_delete(author.id, 99).await,
            Err(StoreError::NotFound(99))
        );
    }

    #[tokio::test]
    async fn test_update_content() {
        let store = CommentStore::new();
        let author = reader(1);
        let comment = store.create(&author, new_comment(7, None, "typo")).await.unwrap();

        assert_eq!(
            store.update_content(2, comment.id, "hijack".into()).await,
            Err(StoreError::NotOwner)
        );

        let updated = store
            .update_content(author.id, comment.id, "fixed".into())
            .await
            .unwrap();
        assert_eq!(updated.content, "fixed");
        assert!(updated.updated_at >= comment.updated_at);
        assert_eq!(updated.created_at, comment.created_at);

        store.soft_delete(author.id, comment.id).await.unwrap();
        assert_eq!(
            store.update_content(author.id, comment.id, "again".into()).await,
            Err(StoreError::Deleted(comment.id))
        );
    }
}
