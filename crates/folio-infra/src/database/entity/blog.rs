//! Blog entity for SeaORM.
//!
//! Tags, likes and comments are stored as JSONB columns on the blog row so the
//! aggregate is always read and written as one document.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, NotSet, Set};
use serde::{Deserialize, Serialize};

use folio_core::domain::{Blog, Comment};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TagList(pub Vec<String>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct UserIdList(pub Vec<Uuid>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CommentList(pub Vec<Comment>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: TagList,
    pub cover_image: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub liked_by: UserIdList,
    /// Mirror of `liked_by` length, kept for ordering.
    pub likes: i64,
    pub views: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: CommentList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Blog {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author: model.author_id,
            title: model.title,
            content: model.content,
            category: model.category,
            tags: model.tags.0,
            cover_image: model.cover_image,
            liked_by: model.liked_by.0,
            views: model.views.max(0) as u64,
            comments: model.comments.0,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// `views` is left unset: inserts take the column default and whole-row updates
/// never overwrite a concurrent increment.
impl From<Blog> for ActiveModel {
    fn from(blog: Blog) -> Self {
        let likes = i64::try_from(blog.likes()).unwrap_or(i64::MAX);
        Self {
            id: Set(blog.id),
            author_id: Set(blog.author),
            title: Set(blog.title),
            content: Set(blog.content),
            category: Set(blog.category),
            tags: Set(TagList(blog.tags)),
            cover_image: Set(blog.cover_image),
            liked_by: Set(UserIdList(blog.liked_by)),
            likes: Set(likes),
            views: NotSet,
            comments: Set(CommentList(blog.comments)),
            created_at: Set(blog.created_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
