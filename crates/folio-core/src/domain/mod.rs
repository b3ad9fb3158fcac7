//! Domain entities - the core business objects.

mod blog;
mod category;
mod user;

pub use blog::{
    Blog, BlogChanges, BlogDraft, COMMENT_MAX_CHARS, Comment, LikeDirection, TITLE_MAX_CHARS,
};
pub use category::{DEFAULT_CATEGORIES, merge_categories};
pub use user::{Actor, AuthorSummary, User};
