//! Domain values to wire DTOs and back.

use std::collections::HashMap;

use uuid::Uuid;

use folio_core::domain::{AuthorSummary, Blog, BlogChanges, BlogDraft, Comment, User};
use folio_core::query::PageMeta;
use folio_core::services::{Authored, DashboardReport};
use folio_core::similar::SimilarBlog;
use folio_core::stats::{BlogDigest, Bucket, MonthCount};
use folio_shared::dto::{
    AuthorResponse, BlogDigestResponse, BlogResponse, CommentResponse, CountResponse,
    CreateBlogRequest, DashboardResponse, MonthCountResponse, OverviewResponse,
    PaginationResponse, SimilarAuthorResponse, SimilarBlogResponse, UpdateBlogRequest,
    UserResponse,
};

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        is_admin: user.is_admin,
        created_at: user.created_at,
    }
}

fn author_response(author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        user: comment.user,
        username: comment.username,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub fn blog_response(authored: Authored<Blog>) -> BlogResponse {
    let Authored { item: blog, author } = authored;
    BlogResponse {
        id: blog.id,
        likes: blog.likes(),
        title: blog.title,
        content: blog.content,
        author: author.map(author_response),
        category: blog.category,
        tags: blog.tags,
        cover_image: blog.cover_image,
        liked_by: blog.liked_by,
        views: blog.views,
        comments: blog.comments.into_iter().map(comment_response).collect(),
        created_at: blog.created_at,
        updated_at: blog.updated_at,
    }
}

pub fn pagination(meta: PageMeta) -> PaginationResponse {
    PaginationResponse {
        current_page: meta.current_page,
        total_pages: meta.total_pages,
        total_blogs: meta.total_blogs,
        limit: meta.limit,
    }
}

pub fn similar_response(authored: Authored<SimilarBlog>) -> SimilarBlogResponse {
    let Authored { item, author } = authored;
    SimilarBlogResponse {
        id: item.id,
        title: item.title,
        category: item.category,
        tags: item.tags,
        views: item.views,
        likes: item.likes,
        created_at: item.created_at,
        cover_image: item.cover_image,
        author: author.map(|a| SimilarAuthorResponse {
            username: a.username,
        }),
    }
}

pub fn blog_draft(req: CreateBlogRequest) -> BlogDraft {
    BlogDraft {
        title: req.title,
        content: req.content,
        category: req.category,
        tags: req.tags,
        cover_image: req.cover_image,
    }
}

pub fn blog_changes(req: UpdateBlogRequest) -> BlogChanges {
    BlogChanges {
        title: req.title,
        content: req.content,
        category: req.category,
        tags: req.tags,
        cover_image: req.cover_image,
    }
}

pub fn dashboard_response(report: DashboardReport) -> DashboardResponse {
    let DashboardReport { stats, authors } = report;
    let digest = |d: BlogDigest| digest_response(d, &authors);

    DashboardResponse {
        overview: OverviewResponse {
            total_blogs: stats.overview.total_blogs,
            total_users: stats.overview.total_users,
            total_views: stats.overview.total_views,
            total_likes: stats.overview.total_likes,
        },
        top_blogs_by_views: stats.top_by_views.into_iter().map(digest).collect(),
        top_blogs_by_likes: stats.top_by_likes.into_iter().map(digest).collect(),
        recent_blogs: stats.recent.into_iter().map(digest).collect(),
        category_distribution: stats.categories.into_iter().map(count_response).collect(),
        tags_distribution: stats.tags.into_iter().map(count_response).collect(),
        blogs_per_month: stats.per_month.into_iter().map(month_response).collect(),
    }
}

fn digest_response(digest: BlogDigest, authors: &HashMap<Uuid, AuthorSummary>) -> BlogDigestResponse {
    BlogDigestResponse {
        id: digest.id,
        author: authors.get(&digest.author).cloned().map(author_response),
        title: digest.title,
        views: digest.views,
        likes: digest.likes,
        created_at: digest.created_at,
    }
}

fn count_response(bucket: Bucket) -> CountResponse {
    CountResponse {
        name: bucket.key,
        count: bucket.count,
    }
}

fn month_response(month: MonthCount) -> MonthCountResponse {
    MonthCountResponse {
        year: month.year,
        month: month.month,
        count: month.count,
    }
}
