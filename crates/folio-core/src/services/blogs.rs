//! Blog lifecycle: listing, reading, writing and related-blog lookup.

use std::sync::Arc;

use uuid::Uuid;

use super::authors::{Authored, attach, author_directory};
use crate::domain::{Actor, AuthorSummary, Blog, BlogChanges, BlogDraft, merge_categories};
use crate::error::DomainError;
use crate::ports::{BlogRepository, UserRepository};
use crate::query::{BlogQuery, BlogQueryParams, PageMeta};
use crate::similar::{RelatedFilter, SIMILAR_LIMIT, SimilarBlog};

/// A page of blogs with their authors, plus pagination metadata.
#[derive(Debug, Clone)]
pub struct BlogListing {
    pub blogs: Vec<Authored<Blog>>,
    pub meta: PageMeta,
}

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    /// Filter, sort and paginate. Read-only.
    pub async fn list(&self, params: &BlogQueryParams) -> Result<BlogListing, DomainError> {
        let query = BlogQuery::from_params(params)?;
        tracing::debug!(?query, "Listing blogs");

        let page = self.blogs.find_page(&query).await?;
        let directory =
            author_directory(self.users.as_ref(), page.blogs.iter().map(|b| b.author)).await?;

        Ok(BlogListing {
            blogs: attach(page.blogs, &directory, |b| b.author),
            meta: PageMeta::new(query.page, page.total),
        })
    }

    /// Fetch a blog for reading; every read counts as a view.
    pub async fn get(&self, id: Uuid) -> Result<Authored<Blog>, DomainError> {
        let blog = self
            .blogs
            .increment_views(id)
            .await?
            .ok_or_else(|| DomainError::blog_not_found(id))?;
        self.with_author(blog).await
    }

    /// The actor becomes the author.
    pub async fn create(
        &self,
        actor: &Actor,
        draft: BlogDraft,
    ) -> Result<Authored<Blog>, DomainError> {
        let blog = Blog::new(actor.id, draft)?;
        let saved = self.blogs.create(blog).await?;

        tracing::info!(blog_id = %saved.id, author_id = %actor.id, "Blog created");
        Ok(Authored {
            item: saved,
            author: Some(AuthorSummary {
                id: actor.id,
                username: actor.username.clone(),
            }),
        })
    }

    /// Owner or admin only. The author never changes.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Authored<Blog>, DomainError> {
        let mut blog = self.load(id).await?;
        if !actor.can_manage(blog.author) {
            return Err(DomainError::Forbidden(
                "Not authorized to update this blog".to_string(),
            ));
        }

        blog.apply(changes)?;
        let saved = self.blogs.update(blog).await?;

        tracing::info!(blog_id = %id, user_id = %actor.id, "Blog updated");
        self.with_author(saved).await
    }

    /// Owner or admin only.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        let blog = self.load(id).await?;
        if !actor.can_manage(blog.author) {
            tracing::warn!(blog_id = %id, user_id = %actor.id, "Blog deletion refused");
            return Err(DomainError::Forbidden(
                "Not authorized to delete this blog".to_string(),
            ));
        }

        self.blogs.delete(id).await?;
        tracing::info!(blog_id = %id, user_id = %actor.id, "Blog deleted");
        Ok(())
    }

    /// Up to five other blogs sharing the category or a tag, most viewed first.
    pub async fn similar(&self, id: Uuid) -> Result<Vec<Authored<SimilarBlog>>, DomainError> {
        let source = self.load(id).await?;
        let related = self
            .blogs
            .find_related(&RelatedFilter::for_blog(&source), SIMILAR_LIMIT)
            .await?;
        let directory =
            author_directory(self.users.as_ref(), related.iter().map(|b| b.author)).await?;

        let projected = related.iter().map(SimilarBlog::from).collect();
        Ok(attach(projected, &directory, |s| s.author))
    }

    /// Default categories merged with every category in use.
    pub async fn categories(&self) -> Result<Vec<String>, DomainError> {
        let in_use = self.blogs.categories().await?;
        Ok(merge_categories(in_use))
    }

    async fn with_author(&self, blog: Blog) -> Result<Authored<Blog>, DomainError> {
        let directory = author_directory(self.users.as_ref(), [blog.author]).await?;
        let author = directory.get(&blog.author).cloned();

        Ok(Authored { item: blog, author })
    }

    async fn load(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::blog_not_found(id))
    }
}
