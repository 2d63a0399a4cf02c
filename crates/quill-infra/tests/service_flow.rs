//! End-to-end service tests: the real `ContentService` and `IdentityService`
//! wired against the in-memory stores, Argon2 hashing and JWT issuance.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::PostStatus;
use quill_core::ports::{PostRepository, TokenService};
use quill_core::service::{
    ContentService, IdentityService, NewAccount, NewComment, NewPost, PostPatch, ProfilePatch,
};
use quill_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use quill_infra::database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
};

struct Harness {
    identity: IdentityService,
    content: ContentService,
    tokens: Arc<JwtTokenService>,
    posts: Arc<InMemoryPostRepository>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "service-test-secret".into(),
        expiration_hours: 1,
        issuer: "quill-test".into(),
    }));
    let passwords = Arc::new(Argon2PasswordService::new());

    Harness {
        identity: IdentityService::new(users.clone(), passwords, tokens.clone()),
        content: ContentService::new(users, posts.clone(), comments),
        tokens,
        posts,
    }
}

fn new_account(username: &str, email: &str, password: &str) -> NewAccount {
    NewAccount {
        username: username.into(),
        email: email.into(),
        password: password.into(),
    }
}

fn new_post(title: &str, content: &str) -> NewPost {
    NewPost {
        title: title.into(),
        content: content.into(),
        tags: vec![],
        cover_image: None,
        status: None,
    }
}

async fn register(h: &Harness, username: &str) -> Uuid {
    let session = h
        .identity
        .register(new_account(username, &format!("{username}@x.com"), "secret1"))
        .await
        .unwrap();
    session.profile.id
}

#[tokio::test]
async fn register_then_login() {
    let h = harness();

    let session = h
        .identity
        .register(new_account("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();
    let claims = h.tokens.verify(&session.token).unwrap();
    assert_eq!(claims.user_id, session.profile.id);
    assert_eq!(claims.username, "alice");

    let login = h.identity.authenticate("alice@x.com", "secret1").await.unwrap();
    assert_eq!(login.profile.id, session.profile.id);

    let err = h
        .identity
        .authenticate("alice@x.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = harness();
    register(&h, "alice").await;

    let same_username = h
        .identity
        .register(new_account("alice", "other@x.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(same_username, DomainError::Conflict(_)));

    let same_email = h
        .identity
        .register(new_account("alicia", "alice@x.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(same_email, DomainError::Conflict(_)));
}

#[tokio::test]
async fn registration_validation() {
    let h = harness();

    let cases = [
        new_account("ab", "ok@x.com", "secret1"),
        new_account("alice", "not-an-email", "secret1"),
        new_account("alice", "ok@x.com", "12345"),
    ];
    for input in cases {
        let err = h.identity.register(input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}

#[tokio::test]
async fn only_the_author_may_update_or_delete() {
    let h = harness();
    let alice = register(&h, "alice").await;
    let bob = register(&h, "bob").await;

    let created = h
        .content
        .create_post(alice, new_post("Hello", "World content here"))
        .await
        .unwrap();
    assert_eq!(created.author.username, "alice");

    let listed = h.content.list_posts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].post.id, created.post.id);

    let patch = PostPatch {
        title: Some("Hijacked".into()),
        ..Default::default()
    };
    let err = h
        .content
        .update_post(created.post.id, bob, patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = h
        .content
        .delete_post(created.post.id, bob)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let updated = h
        .content
        .update_post(created.post.id, alice, patch)
        .await
        .unwrap();
    assert_eq!(updated.post.title, "Hijacked");
    assert!(updated.post.updated_at >= created.post.updated_at);
}

#[tokio::test]
async fn drafts_are_hidden_from_listings_but_fetchable_by_id() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let mut input = new_post("Draft post", "Not ready for the world");
    input.status = Some(PostStatus::Draft);
    let draft = h.content.create_post(alice, input).await.unwrap();

    assert!(h.content.list_posts().await.unwrap().is_empty());
    assert!(h.content.posts_by_author(alice).await.unwrap().is_empty());
    assert_eq!(
        h.content.get_post(draft.post.id).await.unwrap().post.status,
        PostStatus::Draft
    );

    // Publishing is a one-way door.
    let publish = PostPatch {
        status: Some(PostStatus::Published),
        ..Default::default()
    };
    h.content
        .update_post(draft.post.id, alice, publish)
        .await
        .unwrap();
    assert_eq!(h.content.list_posts().await.unwrap().len(), 1);

    let unpublish = PostPatch {
        status: Some(PostStatus::Draft),
        ..Default::default()
    };
    let err = h
        .content
        .update_post(draft.post.id, alice, unpublish)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn post_validation_limits() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let err = h
        .content
        .create_post(alice, new_post("Hi", "World content here"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = h
        .content
        .create_post(alice, new_post("Hello", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn like_toggle_scenario() {
    let h = harness();
    let alice = register(&h, "alice").await;
    let bob = register(&h, "bob").await;

    let post = h
        .content
        .create_post(alice, new_post("Hello", "World content here"))
        .await
        .unwrap()
        .post;

    let liked = h.content.like_post(post.id, alice).await.unwrap();
    assert_eq!(liked.post.likes, vec![alice]);

    let unliked = h.content.like_post(post.id, alice).await.unwrap();
    assert!(unliked.post.likes.is_empty());

    let bob_liked = h.content.like_post(post.id, bob).await.unwrap();
    assert_eq!(bob_liked.post.likes, vec![bob]);

    let err = h.content.like_post(Uuid::new_v4(), bob).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn comments_require_an_existing_post() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let err = h
        .content
        .create_comment(
            alice,
            NewComment {
                post_id: Uuid::new_v4(),
                content: "orphan".into(),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn comment_lifecycle_with_threading() {
    let h = harness();
    let alice = register(&h, "alice").await;
    let bob = register(&h, "bob").await;

    let post = h
        .content
        .create_post(alice, new_post("Hello", "World content here"))
        .await
        .unwrap()
        .post;

    let root = h
        .content
        .create_comment(
            bob,
            NewComment {
                post_id: post.id,
                content: "First!".into(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let reply = h
        .content
        .create_comment(
            alice,
            NewComment {
                post_id: post.id,
                content: "Thanks for reading".into(),
                parent_id: Some(root.comment.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.comment.parent_id, Some(root.comment.id));

    let listed = h.content.list_comments(post.id).await.unwrap();
    assert_eq!(listed.len(), 2);

    // Ownership guard applies to comments too.
    let err = h
        .content
        .update_comment(root.comment.id, alice, "edited".into())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let edited = h
        .content
        .update_comment(root.comment.id, bob, "First! (edited)".into())
        .await
        .unwrap();
    assert_eq!(edited.comment.content, "First! (edited)");

    let liked = h.content.like_comment(root.comment.id, alice).await.unwrap();
    assert_eq!(liked.comment.likes, vec![alice]);

    h.content.delete_comment(root.comment.id, bob).await.unwrap();
    assert_eq!(h.content.list_comments(post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_post_leaves_its_comments_behind() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let post = h
        .content
        .create_post(alice, new_post("Hello", "World content here"))
        .await
        .unwrap()
        .post;
    h.content
        .create_comment(
            alice,
            NewComment {
                post_id: post.id,
                content: "note to self".into(),
                parent_id: None,
            },
        )
        .await
        .unwrap();

    h.content.delete_post(post.id, alice).await.unwrap();

    let err = h.content.get_post(post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    // No cascade: the comment stays addressable under the dead post id.
    assert_eq!(h.content.list_comments(post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn profile_update_and_credential_rotation() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let profile = h
        .identity
        .update_profile(
            alice,
            ProfilePatch {
                bio: Some("writes about Rust".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.bio.as_deref(), Some("writes about Rust"));

    // Wrong current password: rotation refused, stored credential untouched.
    let err = h
        .identity
        .update_profile(
            alice,
            ProfilePatch {
                current_password: Some("wrong".into()),
                new_password: Some("newsecret".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
    h.identity
        .authenticate("alice@x.com", "secret1")
        .await
        .unwrap();

    // Half a rotation request is a validation error.
    let err = h
        .identity
        .update_profile(
            alice,
            ProfilePatch {
                new_password: Some("newsecret".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let ok = h
        .identity
        .update_profile(
            alice,
            ProfilePatch {
                current_password: Some("secret1".into()),
                new_password: Some("newsecret".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(ok.is_ok());
    h.identity
        .authenticate("alice@x.com", "newsecret")
        .await
        .unwrap();
    assert!(
        h.identity
            .authenticate("alice@x.com", "secret1")
            .await
            .is_err()
    );
}

#[tokio::test]
async fn profile_rename_checks_uniqueness() {
    let h = harness();
    let alice = register(&h, "alice").await;
    register(&h, "bob").await;

    let err = h
        .identity
        .update_profile(
            alice,
            ProfilePatch {
                username: Some("bob".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Re-submitting your own username is not a conflict.
    h.identity
        .update_profile(
            alice,
            ProfilePatch {
                username: Some("alice".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn profile_picture_accepts_only_urls() {
    let h = harness();
    let alice = register(&h, "alice").await;

    let err = h
        .identity
        .set_profile_picture(alice, "not a url")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let profile = h
        .identity
        .set_profile_picture(alice, "https://img.example.com/alice.png")
        .await
        .unwrap();
    assert_eq!(
        profile.profile_picture.as_deref(),
        Some("https://img.example.com/alice.png")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_keep_set_semantics() {
    let h = harness();
    let alice = register(&h, "alice").await;
    let post = h
        .content
        .create_post(alice, new_post("Hello", "World content here"))
        .await
        .unwrap()
        .post;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let posts = Arc::clone(&h.posts);
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            posts.toggle_like(post_id, alice).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let final_post = h.content.get_post(post.id).await.unwrap().post;
    let count = final_post.likes.iter().filter(|id| **id == alice).count();
    // 25 toggles: the like stands, exactly once.
    assert_eq!(count, 1);
}
