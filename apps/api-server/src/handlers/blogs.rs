//! Blog handlers: listing, reading, writing and related lookups.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::query::BlogQueryParams;
use folio_shared::dto::{BlogListResponse, CreateBlogRequest, MessageResponse, UpdateBlogRequest};

use super::dashboard;
use super::mappers::{blog_changes, blog_draft, blog_response, pagination, similar_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/blogs and GET /api/blogs/search
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<BlogQueryParams>,
) -> AppResult<HttpResponse> {
    let listing = state.blogs.list(&query).await?;

    Ok(HttpResponse::Ok().json(BlogListResponse {
        blogs: listing.blogs.into_iter().map(blog_response).collect(),
        pagination: pagination(listing.meta),
    }))
}

/// GET /api/blogs/categories
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.blogs.categories().await?))
}

/// GET /api/blogs/{id} - counts as a view.
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let blog = state.blogs.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(blog_response(blog)))
}

/// GET /api/blogs/{id}/similar
pub async fn similar(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let related = state.blogs.similar(path.into_inner()).await?;

    let body: Vec<_> = related.into_iter().map(similar_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/blogs
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .create(&identity.actor(), blog_draft(body.into_inner()))
        .await?;
    dashboard::invalidate(&state).await;

    Ok(HttpResponse::Created().json(blog_response(blog)))
}

/// PUT /api/blogs/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .update(
            &identity.actor(),
            path.into_inner(),
            blog_changes(body.into_inner()),
        )
        .await?;
    dashboard::invalidate(&state).await;

    Ok(HttpResponse::Ok().json(blog_response(blog)))
}

/// DELETE /api/blogs/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .blogs
        .delete(&identity.actor(), path.into_inner())
        .await?;
    dashboard::invalidate(&state).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted successfully")))
}
