use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, User};
use crate::error::RepoError;
use crate::query::{BlogPage, BlogQuery};
use crate::similar::RelatedFilter;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Replace an existing entity as a whole. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup used to resolve blog authors. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}

/// Blog repository. Blogs are stored as whole aggregates, comments included.
///
/// `update` writes every field except `views`, which only moves through
/// `increment_views`; the returned blog carries the stored view count.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, Uuid> {
    /// One page of blogs matching the query, plus the total match count.
    async fn find_page(&self, query: &BlogQuery) -> Result<BlogPage, RepoError>;

    /// Every blog in store order (oldest first).
    async fn find_all(&self) -> Result<Vec<Blog>, RepoError>;

    /// Up to `limit` related blogs, most viewed first.
    async fn find_related(
        &self,
        filter: &RelatedFilter,
        limit: usize,
    ) -> Result<Vec<Blog>, RepoError>;

    /// Atomically add one view and return the updated blog.
    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;

    /// Distinct categories currently in use.
    async fn categories(&self) -> Result<Vec<String>, RepoError>;
}
