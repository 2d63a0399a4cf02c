//! User profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::ProfilePatch;
use quill_shared::dto::{MessageResponse, ProfilePictureRequest, UpdateProfileRequest};

use crate::handlers::{post_response, profile_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users/profile/{id}
pub async fn profile(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let profile = state.identity.get_profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile_response(profile)))
}

/// PUT /api/users/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .identity
        .update_profile(
            identity.user_id,
            ProfilePatch {
                username: req.username,
                email: req.email,
                bio: req.bio,
                profile_picture: req.profile_picture,
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Profile updated successfully")))
}

/// PUT /api/users/profile-picture
pub async fn profile_picture(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfilePictureRequest>,
) -> AppResult<HttpResponse> {
    state
        .identity
        .set_profile_picture(identity.user_id, &body.into_inner().image_url)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Profile picture updated successfully")))
}

/// GET /api/users/posts/{user_id}
pub async fn posts_by_author(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.content.posts_by_author(path.into_inner()).await?;
    let body: Vec<_> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}
