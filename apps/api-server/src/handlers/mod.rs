//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod users;


use actix_web::web;

use quill_core::service::{CommentWithAuthor, PostWithAuthor};
use quill_shared::dto::{AuthorResponse, CommentResponse, PostResponse, ProfileResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    // Registered before /{id} so "like" is not parsed as a post id.
                    .route("/like/{id}", web::put().to(posts::like))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::remove)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/post/{post_id}", web::get().to(comments::list_for_post))
                    .route("/like/{id}", web::put().to(comments::like))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::delete().to(comments::remove)),
            )
            .service(
                web::scope("/users")
                    .route("/profile/{id}", web::get().to(users::profile))
                    .route("/profile", web::put().to(users::update_profile))
                    .route("/profile-picture", web::put().to(users::profile_picture))
                    .route("/posts/{user_id}", web::get().to(users::posts_by_author)),
            ),
    );
}

pub(crate) fn post_response(resolved: PostWithAuthor) -> PostResponse {
    let PostWithAuthor { post, author } = resolved;
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: AuthorResponse {
            id: author.id,
            username: author.username,
        },
        cover_image: post.cover_image,
        tags: post.tags,
        like_count: post.likes.len(),
        likes: post.likes,
        status: post.status.to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub(crate) fn comment_response(resolved: CommentWithAuthor) -> CommentResponse {
    let CommentWithAuthor { comment, author } = resolved;
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        author: AuthorResponse {
            id: author.id,
            username: author.username,
        },
        parent_comment_id: comment.parent_id,
        like_count: comment.likes.len(),
        likes: comment.likes,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub(crate) fn profile_response(profile: quill_core::domain::Profile) -> ProfileResponse {
    ProfileResponse {
        id: profile.id,
        username: profile.username,
        email: profile.email,
        bio: profile.bio,
        profile_picture: profile.profile_picture,
        created_at: profile.created_at,
    }
}
