//! Post handlers - ownership-aware CRUD plus the like toggle.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_core::service::{NewPost, PostPatch};
use quill_shared::dto::{CreatePostRequest, MessageResponse, UpdatePostRequest};

use crate::handlers::post_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_status(raw: Option<String>) -> AppResult<Option<PostStatus>> {
    raw.map(|s| s.parse::<PostStatus>().map_err(AppError::Validation))
        .transpose()
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let created = state
        .content
        .create_post(
            identity.user_id,
            NewPost {
                title: req.title,
                content: req.content,
                tags: req.tags,
                cover_image: req.cover_image,
                status: parse_status(req.status)?,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post_response(created)))
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.content.list_posts().await?;
    let body: Vec<_> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.content.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let patch = PostPatch {
        title: req.title,
        content: req.content,
        tags: req.tags,
        cover_image: req.cover_image,
        status: parse_status(req.status)?,
    };
    let updated = state
        .content
        .update_post(path.into_inner(), identity.user_id, patch)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(updated)))
}

/// DELETE /api/posts/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .content
        .delete_post(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed")))
}

/// PUT /api/posts/like/{id}
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .content
        .like_post(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}
