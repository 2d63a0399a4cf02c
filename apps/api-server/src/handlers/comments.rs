//! Comment handlers - same ownership and toggle rules as posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::NewComment;
use quill_shared::dto::{CreateCommentRequest, MessageResponse, UpdateCommentRequest};

use crate::handlers::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let created = state
        .content
        .create_comment(
            identity.user_id,
            NewComment {
                post_id: req.post_id,
                content: req.content,
                parent_id: req.parent_comment_id,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(comment_response(created)))
}

/// GET /api/comments/post/{post_id}
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.content.list_comments(path.into_inner()).await?;
    let body: Vec<_> = comments.into_iter().map(comment_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/comments/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let updated = state
        .content
        .update_comment(path.into_inner(), identity.user_id, body.into_inner().content)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(updated)))
}

/// DELETE /api/comments/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .content
        .delete_comment(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment removed")))
}

/// PUT /api/comments/like/{id}
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .content
        .like_comment(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}
