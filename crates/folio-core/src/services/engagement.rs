//! Mutation engine for the sub-structures embedded in a blog: comments and likes.
//!
//! Each operation loads the whole blog, mutates it in memory and persists the whole
//! aggregate, except the view counter, which stores advance on their own. There is no locking between the read and the write, so two concurrent
//! mutations of the same blog can lose one update. Because the like count is derived
//! from the liked-by set, a lost update can never leave the two out of step.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Blog, Comment, LikeDirection};
use crate::error::DomainError;
use crate::ports::BlogRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub likes: u64,
    pub direction: LikeDirection,
}

#[derive(Clone)]
pub struct EngagementService {
    blogs: Arc<dyn BlogRepository>,
}

impl EngagementService {
    pub fn new(blogs: Arc<dyn BlogRepository>) -> Self {
        Self { blogs }
    }

    /// Add a comment at the head of the blog's comment list.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        blog_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let mut blog = self.load(blog_id).await?;
        let comment = Comment::new(actor, text)?;

        blog.add_comment(comment.clone());
        self.blogs.update(blog).await?;

        tracing::info!(blog_id = %blog_id, comment_id = %comment.id, user_id = %actor.id, "Comment added");
        Ok(comment)
    }

    /// Remove a comment. Only its author or an admin may do so.
    pub async fn delete_comment(
        &self,
        actor: &Actor,
        blog_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let mut blog = self.load(blog_id).await?;
        let owner = blog
            .comment(comment_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?
            .user;

        if !actor.can_manage(owner) {
            tracing::warn!(blog_id = %blog_id, comment_id = %comment_id, user_id = %actor.id, "Comment deletion refused");
            return Err(DomainError::Forbidden(
                "Not authorized to delete this comment".to_string(),
            ));
        }

        let removed = blog
            .remove_comment(comment_id)
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?;
        self.blogs.update(blog).await?;

        tracing::info!(blog_id = %blog_id, comment_id = %comment_id, user_id = %actor.id, "Comment deleted");
        Ok(removed)
    }

    /// Like the blog, or take the like back if the actor already liked it.
    pub async fn toggle_like(
        &self,
        actor: &Actor,
        blog_id: Uuid,
    ) -> Result<LikeOutcome, DomainError> {
        let mut blog = self.load(blog_id).await?;
        let direction = blog.toggle_like(actor.id);
        let saved = self.blogs.update(blog).await?;

        tracing::debug!(blog_id = %blog_id, user_id = %actor.id, ?direction, "Like toggled");
        Ok(LikeOutcome {
            likes: saved.likes(),
            direction,
        })
    }

    async fn load(&self, blog_id: Uuid) -> Result<Blog, DomainError> {
        self.blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| DomainError::blog_not_found(blog_id))
    }
}
