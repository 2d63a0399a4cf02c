//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::ports::TokenService;
use quill_core::service::NewAccount;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::handlers::profile_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .identity
        .register(NewAccount {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    tracing::info!(user = %session.profile.username, "account registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state.identity.authenticate(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state.identity.get_profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(profile_response(profile)))
}
