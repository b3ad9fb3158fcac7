//! Comment and like handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::domain::LikeDirection;
use folio_shared::dto::{
    CommentCreatedResponse, CreateCommentRequest, LikeResponse, MessageResponse,
};

use super::mappers::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/blogs/{blogId}/comments
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .engagement
        .add_comment(&identity.actor(), path.into_inner(), &body.text)
        .await?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        message: "Comment added successfully".to_string(),
        comment: comment_response(comment),
    }))
}

/// DELETE /api/blogs/{blogId}/comments/{commentId}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();
    state
        .engagement
        .delete_comment(&identity.actor(), blog_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}

/// POST /api/blogs/{blogId}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .engagement
        .toggle_like(&identity.actor(), path.into_inner())
        .await?;

    let (message, liked) = match outcome.direction {
        LikeDirection::Liked => ("Liked", true),
        LikeDirection::Unliked => ("Unliked", false),
    };
    Ok(HttpResponse::Ok().json(LikeResponse {
        message: message.to_string(),
        liked,
        likes: outcome.likes,
    }))
}
