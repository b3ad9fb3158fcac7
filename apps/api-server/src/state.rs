//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use folio_core::ports::{BlogRepository, Cache, PasswordService, TokenService, UserRepository};
use folio_core::services::{AccountService, BlogService, DashboardService, EngagementService};
use folio_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryCache, InMemoryUserRepository,
    JwtTokenService,
};

#[cfg(feature = "rate-limit")]
use folio_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use folio_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub blogs: BlogService,
    pub engagement: EngagementService,
    pub dashboard: DashboardService,
    pub tokens: Arc<dyn TokenService>,
    pub cache: Arc<dyn Cache>,
    pub dashboard_cache_ttl: Duration,
    /// `None` when the limiter could not be built; requests then pass.
    #[cfg(feature = "rate-limit")]
    pub auth_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the state, on PostgreSQL when configured and reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, blogs) = repositories(config).await;
        Self::with_repositories(config, users, blogs)
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        let (users, blogs) = in_memory_repositories();
        Self::with_repositories(config, users, blogs)
    }

    pub fn with_repositories(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
    ) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "rate-limit")]
        let auth_limiter = match InMemoryRateLimiter::new(&config.rate_limit) {
            Ok(limiter) => Some(Arc::new(limiter) as Arc<dyn RateLimiter>),
            Err(e) => {
                tracing::error!(error = %e, "Rate limiter disabled");
                None
            }
        };

        tracing::info!("Application state initialized");

        Self {
            accounts: AccountService::new(users.clone(), passwords, tokens.clone()),
            blogs: BlogService::new(blogs.clone(), users.clone()),
            engagement: EngagementService::new(blogs.clone()),
            dashboard: DashboardService::new(blogs, users),
            tokens,
            cache: Arc::new(InMemoryCache::new()),
            dashboard_cache_ttl: config.dashboard_cache_ttl,
            #[cfg(feature = "rate-limit")]
            auth_limiter,
        }
    }
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn BlogRepository>);

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryBlogRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    use folio_infra::database::{PostgresBlogRepository, PostgresUserRepository, connect};
    use migration::MigratorTrait;

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    let conn = match connect(db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            return in_memory_repositories();
        }
    };

    if let Err(e) = migration::Migrator::up(&conn, None).await {
        tracing::error!(error = %e, "Migrations failed. Using in-memory fallback.");
        return in_memory_repositories();
    }

    (
        Arc::new(PostgresUserRepository::new(conn.clone())),
        Arc::new(PostgresBlogRepository::new(conn)),
    )
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}
