//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Blogs are kept in insertion order, which is the store order listings and the
//! dashboard rely on for tie-breaking.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{Blog, User};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, BlogRepository, UserRepository};
use folio_core::query::{BlogPage, BlogQuery};
use folio_core::similar::{RelatedFilter, select_similar};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already exists".to_string()));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.users.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryBlogRepository {
    blogs: RwLock<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Blog, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let blogs = self.blogs.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut blogs = self.blogs.write().await;
        if blogs.iter().any(|b| b.id == blog.id) {
            return Err(RepoError::Constraint("blog already exists".to_string()));
        }
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn update(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut blogs = self.blogs.write().await;
        let slot = blogs
            .iter_mut()
            .find(|b| b.id == blog.id)
            .ok_or(RepoError::NotFound)?;
        *slot = Blog {
            views: slot.views,
            ..blog
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        if blogs.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_page(&self, query: &BlogQuery) -> Result<BlogPage, RepoError> {
        let blogs = self.blogs.read().await;
        Ok(query.run(blogs.iter()))
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        Ok(self.blogs.read().await.clone())
    }

    async fn find_related(
        &self,
        filter: &RelatedFilter,
        limit: usize,
    ) -> Result<Vec<Blog>, RepoError> {
        let blogs = self.blogs.read().await;
        Ok(select_similar(filter, blogs.iter(), limit))
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let mut blogs = self.blogs.write().await;
        Ok(blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            blog.views = blog.views.saturating_add(1);
            blog.clone()
        }))
    }

    async fn categories(&self) -> Result<Vec<String>, RepoError> {
        let blogs = self.blogs.read().await;
        let mut categories: Vec<String> = blogs.iter().map(|b| b.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}
