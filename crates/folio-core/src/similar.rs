//! Similarity selector - related blogs by category or tag overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Blog;

/// Maximum number of related blogs returned.
pub const SIMILAR_LIMIT: usize = 5;

/// Which blogs count as related to a source blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedFilter {
    pub exclude: Uuid,
    pub category: String,
    pub tags: Vec<String>,
}

impl RelatedFilter {
    pub fn for_blog(source: &Blog) -> Self {
        Self {
            exclude: source.id,
            category: source.category.clone(),
            tags: source.tags.clone(),
        }
    }

    /// Same category OR at least one shared tag, never the source itself.
    pub fn matches(&self, candidate: &Blog) -> bool {
        candidate.id != self.exclude
            && (candidate.category == self.category || candidate.has_any_tag(&self.tags))
    }
}

/// Projection of a related blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarBlog {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub views: u64,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub cover_image: Option<String>,
    pub author: Uuid,
}

impl From<&Blog> for SimilarBlog {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            category: blog.category.clone(),
            tags: blog.tags.clone(),
            views: blog.views,
            likes: blog.likes(),
            created_at: blog.created_at,
            cover_image: blog.cover_image.clone(),
            author: blog.author,
        }
    }
}

/// Pick up to `limit` related blogs, most viewed first. Ties keep input order.
pub fn select_similar<'a, I>(filter: &RelatedFilter, candidates: I, limit: usize) -> Vec<Blog>
where
    I: IntoIterator<Item = &'a Blog>,
{
    let mut related: Vec<&Blog> = candidates
        .into_iter()
        .filter(|candidate| filter.matches(candidate))
        .collect();
    related.sort_by(|a, b| b.views.cmp(&a.views));
    related.into_iter().take(limit).cloned().collect()
}
