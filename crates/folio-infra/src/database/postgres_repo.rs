//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use folio_core::domain::{Blog, User};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, BlogRepository, UserRepository};
use folio_core::query::{BlogFilter, BlogPage, BlogQuery, SortField, SortOrder};
use folio_core::similar::RelatedFilter;

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.find('@') {
            Some(at_pos) => {
                let (local, domain) = email.split_at(at_pos);
                match local.chars().next() {
                    Some(first) if local.len() > 1 => format!("{first}***{domain}"),
                    _ => format!("***{domain}"),
                }
            }
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find().count(&self.db).await.map_err(map_db_err)
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_page(&self, query: &BlogQuery) -> Result<BlogPage, RepoError> {
        let select = listing_select(&query.filter);

        let total = select.clone().count(&self.db).await.map_err(map_db_err)?;

        let order = match query.sort.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let models = select
            .order_by(sort_column(query.sort.field), order)
            .order_by_asc(blog::Column::CreatedAt)
            .offset(query.page.skip())
            .limit(query.page.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(BlogPage {
            blogs: models.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn find_all(&self) -> Result<Vec<Blog>, RepoError> {
        let models = BlogEntity::find()
            .order_by_asc(blog::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_related(
        &self,
        filter: &RelatedFilter,
        limit: usize,
    ) -> Result<Vec<Blog>, RepoError> {
        let mut overlap = Condition::any().add(blog::Column::Category.eq(filter.category.as_str()));
        if !filter.tags.is_empty() {
            overlap = overlap.add(any_tag(&filter.tags));
        }

        let models = BlogEntity::find()
            .filter(blog::Column::Id.ne(filter.exclude))
            .filter(overlap)
            .order_by_desc(blog::Column::Views)
            .order_by_asc(blog::Column::CreatedAt)
            .limit(u64::try_from(limit).unwrap_or(u64::MAX))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let result = BlogEntity::update_many()
            .col_expr(
                blog::Column::Views,
                Expr::col(blog::Column::Views).add(1),
            )
            .filter(blog::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        <Self as BaseRepository<Blog, Uuid>>::find_by_id(self, id).await
    }

    async fn categories(&self) -> Result<Vec<String>, RepoError> {
        BlogEntity::find()
            .select_only()
            .column(blog::Column::Category)
            .distinct()
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

/// All blogs, narrowed by `filter` when it has any clause.
pub(crate) fn listing_select(filter: &BlogFilter) -> Select<BlogEntity> {
    let select = BlogEntity::find();
    if filter.is_empty() {
        select
    } else {
        select.filter(filter_condition(filter))
    }
}

/// Translate a listing filter into a WHERE condition. Present clauses are ANDed.
pub(crate) fn filter_condition(filter: &BlogFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(blog::Column::Title).ilike(pattern.clone()))
                .add(Expr::col(blog::Column::Content).ilike(pattern)),
        );
    }
    if let Some(category) = &filter.category {
        condition = condition.add(blog::Column::Category.eq(category.as_str()));
    }
    if !filter.tags.is_empty() {
        condition = condition.add(any_tag(&filter.tags));
    }
    if let Some(author) = filter.author {
        condition = condition.add(blog::Column::AuthorId.eq(author));
    }

    condition
}

/// Blog carries at least one of `tags`.
fn any_tag(tags: &[String]) -> Condition {
    tags.iter().fold(Condition::any(), |any, tag| {
        any.add(Expr::col(blog::Column::Tags).contains(Expr::val(serde_json::json!([tag]))))
    })
}

fn sort_column(field: SortField) -> blog::Column {
    match field {
        SortField::CreatedAt => blog::Column::CreatedAt,
        SortField::UpdatedAt => blog::Column::UpdatedAt,
        SortField::Views => blog::Column::Views,
        SortField::Likes => blog::Column::Likes,
        SortField::Title => blog::Column::Title,
    }
}

/// Search text is literal; LIKE wildcards in it are escaped.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
