//! Core services driven end to end over the in-memory repositories.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use folio_core::DomainError;
use folio_core::domain::{Actor, Blog, BlogChanges, BlogDraft, LikeDirection, User};
use folio_core::error::RepoError;
use folio_core::ports::{AuthError, BaseRepository, BlogRepository, TokenService};
use folio_core::query::{BlogPage, BlogQuery, BlogQueryParams};
use folio_core::similar::RelatedFilter;
use folio_core::services::{
    AccountService, BlogService, DashboardService, EngagementService, Registration,
};
use folio_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

struct Harness {
    users: Arc<InMemoryUserRepository>,
    blogs: Arc<InMemoryBlogRepository>,
    blog_service: BlogService,
    engagement: EngagementService,
    dashboard: DashboardService,
    accounts: AccountService,
    tokens: Arc<JwtTokenService>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let blogs = Arc::new(InMemoryBlogRepository::new());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "integration-secret".to_string(),
        ..JwtConfig::default()
    }));
    let passwords = Arc::new(Argon2PasswordService::with_params(64, 1, 1).unwrap());

    Harness {
        blog_service: BlogService::new(blogs.clone(), users.clone()),
        engagement: EngagementService::new(blogs.clone()),
        dashboard: DashboardService::new(blogs.clone(), users.clone()),
        accounts: AccountService::new(users.clone(), passwords, tokens.clone()),
        users,
        blogs,
        tokens,
    }
}

fn actor(user: &User) -> Actor {
    Actor {
        id: user.id,
        username: user.username.clone(),
        is_admin: user.is_admin,
    }
}

fn draft(title: &str, category: &str, tags: &[&str]) -> BlogDraft {
    BlogDraft {
        title: title.to_string(),
        content: format!("{title} body"),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        cover_image: None,
    }
}

async fn member(h: &Harness, name: &str) -> User {
    h.users
        .create(User::new(
            name.to_string(),
            format!("{name}@example.com"),
            "hash".to_string(),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_then_login() {
    let h = harness();

    let user = h
        .accounts
        .register(Registration {
            username: " alice ".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password_hash, "secret1");
    assert!(!user.is_admin);

    let session = h.accounts.login("alice@example.com", "secret1").await.unwrap();
    let claims = h.tokens.validate_token(&session.token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(session.expires_in, 24 * 3600);

    let profile = h.accounts.profile(user.id).await.unwrap();
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let h = harness();
    let first = Registration {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret1".to_string(),
    };
    h.accounts.register(first.clone()).await.unwrap();

    let same_email = Registration {
        username: "alicia".to_string(),
        ..first.clone()
    };
    match h.accounts.register(same_email).await {
        Err(DomainError::Duplicate(msg)) => assert_eq!(msg, "Email already exists."),
        other => panic!("unexpected: {other:?}"),
    }

    let same_name = Registration {
        email: "other@example.com".to_string(),
        ..first
    };
    match h.accounts.register(same_name).await {
        Err(DomainError::Duplicate(msg)) => assert_eq!(msg, "Username already exists."),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    h.accounts
        .register(Registration {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    for (email, password) in [("bob@example.com", "wrong!"), ("nobody@example.com", "secret1")] {
        assert!(matches!(
            h.accounts.login(email, password).await,
            Err(DomainError::Auth(AuthError::InvalidCredentials))
        ));
    }
}

#[tokio::test]
async fn test_listing_paginates_and_resolves_authors() {
    let h = harness();
    let alice = member(&h, "alice").await;
    for i in 0..12 {
        h.blog_service
            .create(&actor(&alice), draft(&format!("Post {i}"), "Design", &[]))
            .await
            .unwrap();
    }

    let params = BlogQueryParams {
        page: Some("2".to_string()),
        limit: Some("5".to_string()),
        ..Default::default()
    };
    let listing = h.blog_service.list(&params).await.unwrap();

    assert_eq!(listing.blogs.len(), 5);
    assert_eq!(listing.meta.current_page, 2);
    assert_eq!(listing.meta.total_pages, 3);
    assert_eq!(listing.meta.total_blogs, 12);
    let author = listing.blogs[0].author.as_ref().unwrap();
    assert_eq!(author.username, "alice");
}

#[tokio::test]
async fn test_get_counts_views() {
    let h = harness();
    let alice = member(&h, "alice").await;
    let blog = h
        .blog_service
        .create(&actor(&alice), draft("Counted", "Design", &[]))
        .await
        .unwrap()
        .item;

    h.blog_service.get(blog.id).await.unwrap();
    let read = h.blog_service.get(blog.id).await.unwrap();

    assert_eq!(read.item.views, 2);
    assert_eq!(read.item.updated_at, blog.updated_at);
    assert!(matches!(
        h.blog_service.get(Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_and_delete_require_owner_or_admin() {
    let h = harness();
    let alice = member(&h, "alice").await;
    let mallory = member(&h, "mallory").await;
    let admin = actor(&member(&h, "root").await.promote_to_admin());
    let blog = h
        .blog_service
        .create(&actor(&alice), draft("Mine", "Design", &[]))
        .await
        .unwrap()
        .item;

    let changes = BlogChanges {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        h.blog_service.update(&actor(&mallory), blog.id, changes.clone()).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        h.blog_service.delete(&actor(&mallory), blog.id).await,
        Err(DomainError::Forbidden(_))
    ));
    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mine");

    let updated = h.blog_service.update(&admin, blog.id, changes).await.unwrap();
    assert_eq!(updated.item.title, "Hijacked");
    assert_eq!(updated.item.author, alice.id);
    assert_eq!(updated.author.unwrap().username, "alice");

    h.blog_service.delete(&actor(&alice), blog.id).await.unwrap();
    assert!(h.blogs.find_by_id(blog.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_toggle_like_parity() {
    let h = harness();
    let alice = member(&h, "alice").await;
    let bob = actor(&member(&h, "bob").await);
    let blog = h
        .blog_service
        .create(&actor(&alice), draft("Likeable", "Design", &[]))
        .await
        .unwrap()
        .item;

    let first = h.engagement.toggle_like(&bob, blog.id).await.unwrap();
    assert_eq!(first.direction, LikeDirection::Liked);
    assert_eq!(first.likes, 1);

    let second = h.engagement.toggle_like(&bob, blog.id).await.unwrap();
    assert_eq!(second.direction, LikeDirection::Unliked);
    assert_eq!(second.likes, 0);

    h.engagement.toggle_like(&bob, blog.id).await.unwrap();
    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.liked_by, vec![bob.id]);
    assert_eq!(stored.likes(), 1);
}

#[tokio::test]
async fn test_comments_newest_first_and_author_or_admin_delete() {
    let h = harness();
    let alice = actor(&member(&h, "alice").await);
    let bob = actor(&member(&h, "bob").await);
    let blog = h
        .blog_service
        .create(&alice, draft("Discussed", "Design", &[]))
        .await
        .unwrap()
        .item;

    let c1 = h.engagement.add_comment(&bob, blog.id, "first").await.unwrap();
    let c2 = h.engagement.add_comment(&alice, blog.id, "second").await.unwrap();
    let c3 = h.engagement.add_comment(&bob, blog.id, "third").await.unwrap();

    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    let ids: Vec<Uuid> = stored.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c3.id, c2.id, c1.id]);

    assert!(matches!(
        h.engagement.delete_comment(&bob, blog.id, c2.id).await,
        Err(DomainError::Forbidden(_))
    ));
    let unchanged = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(unchanged.comments.len(), 3);

    h.engagement.delete_comment(&bob, blog.id, c1.id).await.unwrap();
    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    let ids: Vec<Uuid> = stored.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c3.id, c2.id]);

    // The blog author has no say over other people's comments; an admin does.
    assert!(matches!(
        h.engagement.delete_comment(&alice, blog.id, c3.id).await,
        Err(DomainError::Forbidden(_))
    ));
    let admin = actor(&member(&h, "root").await.promote_to_admin());
    h.engagement.delete_comment(&admin, blog.id, c3.id).await.unwrap();
    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    let ids: Vec<Uuid> = stored.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![c2.id]);
}

/// Counts a view right after every read, as a GET racing a mutation would.
struct ViewDuringRead(Arc<InMemoryBlogRepository>);

#[async_trait]
impl BaseRepository<Blog, Uuid> for ViewDuringRead {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let read = self.0.find_by_id(id).await?;
        self.0.increment_views(id).await?;
        Ok(read)
    }

    async fn create(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.0.create(blog).await
    }

    async fn update(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.0.update(blog).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl BlogRepository for ViewDuringRead {
    async fn find_page(&self, query: &BlogQuery) -> Result<BlogPage, RepoError> {
        self.0.find_page(query).await
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        self.0.find_all().await
    }

    async fn find_related(
        &self,
        filter: &RelatedFilter,
        limit: usize,
    ) -> Result<Vec<Blog>, RepoError> {
        self.0.find_related(filter, limit).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.0.increment_views(id).await
    }

    async fn categories(&self) -> Result<Vec<String>, RepoError> {
        self.0.categories().await
    }
}

#[tokio::test]
async fn test_engagement_writes_never_roll_back_views() {
    let h = harness();
    let alice = actor(&member(&h, "alice").await);
    let bob = actor(&member(&h, "bob").await);
    let blog = h
        .blog_service
        .create(&alice, draft("Busy", "Design", &[]))
        .await
        .unwrap()
        .item;
    let engagement = EngagementService::new(Arc::new(ViewDuringRead(h.blogs.clone())));

    let comment = engagement.add_comment(&bob, blog.id, "hello").await.unwrap();
    engagement.toggle_like(&bob, blog.id).await.unwrap();
    engagement
        .delete_comment(&bob, blog.id, comment.id)
        .await
        .unwrap();

    let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 3);
    assert_eq!(stored.likes(), 1);
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn test_similar_blogs_by_category_or_tag() {
    let h = harness();
    let alice = actor(&member(&h, "alice").await);
    let a = h
        .blog_service
        .create(&alice, draft("A", "c1", &["x", "y"]))
        .await
        .unwrap()
        .item;
    let b = h
        .blog_service
        .create(&alice, draft("B", "c2", &["y"]))
        .await
        .unwrap()
        .item;
    let c = h
        .blog_service
        .create(&alice, draft("C", "c1", &["z"]))
        .await
        .unwrap()
        .item;
    h.blog_service
        .create(&alice, draft("D", "c3", &["q"]))
        .await
        .unwrap();
    for _ in 0..3 {
        h.blogs.increment_views(c.id).await.unwrap();
    }
    h.blogs.increment_views(b.id).await.unwrap();

    let similar = h.blog_service.similar(a.id).await.unwrap();
    let ids: Vec<Uuid> = similar.iter().map(|s| s.item.id).collect();

    assert_eq!(ids, vec![c.id, b.id]);
    assert_eq!(similar[0].author.as_ref().unwrap().username, "alice");
}

#[tokio::test]
async fn test_categories_merge_defaults() {
    let h = harness();
    let alice = actor(&member(&h, "alice").await);
    h.blog_service
        .create(&alice, draft("Cooking", "Food", &[]))
        .await
        .unwrap();

    let categories = h.blog_service.categories().await.unwrap();

    assert!(categories.contains(&"Food".to_string()));
    assert!(categories.contains(&"Design".to_string()));
    assert_eq!(categories.len(), 7);
}

#[tokio::test]
async fn test_dashboard_over_empty_store() {
    let h = harness();
    member(&h, "alice").await;

    let report = h.dashboard.report().await.unwrap();

    assert_eq!(report.stats.overview.total_blogs, 0);
    assert_eq!(report.stats.overview.total_users, 1);
    assert!(report.stats.top_by_views.is_empty());
    assert!(report.stats.categories.is_empty());
    assert!(report.authors.is_empty());
}

#[tokio::test]
async fn test_dashboard_resolves_ranked_authors() {
    let h = harness();
    let alice = actor(&member(&h, "alice").await);
    let blog = h
        .blog_service
        .create(&alice, draft("Popular", "Design", &["ui"]))
        .await
        .unwrap()
        .item;
    h.blogs.increment_views(blog.id).await.unwrap();

    let report = h.dashboard.report().await.unwrap();

    assert_eq!(report.stats.overview.total_views, 1);
    assert_eq!(report.authors[&alice.id].username, "alice");
    assert_eq!(report.stats.tags[0].key, "ui");
}
