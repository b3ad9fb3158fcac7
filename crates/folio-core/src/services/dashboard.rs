use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::authors::author_directory;
use crate::domain::AuthorSummary;
use crate::error::DomainError;
use crate::ports::{BlogRepository, UserRepository};
use crate::stats::DashboardStats;

/// Dashboard statistics together with the authors of the ranked blogs.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    pub authors: HashMap<Uuid, AuthorSummary>,
}

#[derive(Clone)]
pub struct DashboardService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl DashboardService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    pub async fn report(&self) -> Result<DashboardReport, DomainError> {
        let blogs = self.blogs.find_all().await?;
        let total_users = self.users.count().await?;

        let stats = DashboardStats::compute(&blogs, total_users, Utc::now());
        let authors = author_directory(self.users.as_ref(), stats.author_ids()).await?;

        tracing::debug!(
            total_blogs = stats.overview.total_blogs,
            total_users,
            "Dashboard statistics computed"
        );
        Ok(DashboardReport { stats, authors })
    }
}
