use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Actor;
use crate::error::DomainError;

pub const TITLE_MAX_CHARS: usize = 150;
pub const COMMENT_MAX_CHARS: usize = 500;

/// Blog entity - a post together with its embedded comments and likes.
///
/// The blog is an aggregate: comments and the liked-by set live inside it and are
/// always persisted as part of the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    /// Owner; never changes after creation.
    pub author: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub liked_by: Vec<Uuid>,
    pub views: u64,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment sub-document, addressable only through its parent blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    /// Copied from the author at write time; not refreshed on rename.
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a blog.
#[derive(Debug, Clone, Default)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
}

/// Partial update; `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeDirection {
    Liked,
    Unliked,
}

impl Blog {
    /// Create a new blog owned by `author`.
    pub fn new(author: Uuid, draft: BlogDraft) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author,
            title: validate_title(&draft.title)?,
            content: validate_content(draft.content)?,
            category: validate_category(&draft.category)?,
            tags: draft.tags,
            cover_image: draft.cover_image,
            liked_by: Vec::new(),
            views: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Validation happens before any field is touched.
    pub fn apply(&mut self, changes: BlogChanges) -> Result<(), DomainError> {
        let title = changes.title.as_deref().map(validate_title).transpose()?;
        let content = changes.content.map(validate_content).transpose()?;
        let category = changes
            .category
            .as_deref()
            .map(validate_category)
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if changes.cover_image.is_some() {
            self.cover_image = changes.cover_image;
        }
        self.touch();
        Ok(())
    }

    /// Like count, derived from the liked-by set so the two can never disagree.
    pub fn likes(&self) -> u64 {
        self.liked_by.len() as u64
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.liked_by.contains(&user)
    }

    /// Add the user to the liked-by set, or remove them if already present.
    pub fn toggle_like(&mut self, user: Uuid) -> LikeDirection {
        let direction = match self.liked_by.iter().position(|id| *id == user) {
            Some(index) => {
                self.liked_by.remove(index);
                LikeDirection::Unliked
            }
            None => {
                self.liked_by.push(user);
                LikeDirection::Liked
            }
        };
        self.touch();
        direction
    }

    /// Insert at the head so comments stay newest-first.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
        self.touch();
    }

    pub fn comment(&self, id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn remove_comment(&mut self, id: Uuid) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == id)?;
        let removed = self.comments.remove(index);
        self.touch();
        Some(removed)
    }

    /// True when any of the blog's tags is in `tags` (exact, case-sensitive).
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Comment {
    /// Build a comment authored by `actor`, stamped now.
    pub fn new(actor: &Actor, text: &str) -> Result<Self, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation(
                "Comment text is required".to_string(),
            ));
        }
        if text.chars().count() > COMMENT_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "Comment cannot exceed {COMMENT_MAX_CHARS} characters"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user: actor.id,
            username: actor.username.clone(),
            text: text.to_string(),
            created_at: Utc::now(),
        })
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "Title cannot exceed {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: String) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    Ok(content)
}

fn validate_category(category: &str) -> Result<String, DomainError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(DomainError::Validation("Category is required".to_string()));
    }
    Ok(category.to_string())
}
