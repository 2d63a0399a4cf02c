use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus, User};
use quill_core::ports::{BaseRepository, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

#[tokio::test]
async fn find_post_by_id_maps_the_row_into_the_domain() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let liker = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            title: "Test Post".to_owned(),
            content: "Content long enough".to_owned(),
            cover_image: None,
            tags: vec!["rust".to_owned()],
            likes: vec![liker],
            status: "published".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.likes, vec![liker]);
}

#[tokio::test]
async fn updating_a_post_leaves_the_likes_column_to_the_toggle() {
    let liker = Uuid::new_v4();
    let now = chrono::Utc::now();
    let stored = post::Model {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        content: "Content long enough".to_owned(),
        cover_image: None,
        tags: vec![],
        likes: vec![liker],
        status: "published".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    };
    let renamed = post::Model {
        title: "Renamed".to_owned(),
        ..stored.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![stored.clone()], vec![renamed]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    // An editor's copy fetched before the like landed.
    let mut edited: Post = stored.into();
    edited.title = "Renamed".to_owned();
    edited.likes.clear();
    repo.save(edited).await.unwrap();

    let log = repo.db.into_transaction_log();
    let update = format!("{:?}", log.last().unwrap());
    assert!(update.contains("UPDATE"));
    assert!(!update.contains("\"likes\""), "update wrote likes: {update}");
}

#[tokio::test]
async fn find_user_by_email_maps_the_row_into_the_domain() {
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: user_id,
            username: "alice".to_owned(),
            email: "alice@x.com".to_owned(),
            password_hash: "$argon2$fake".to_owned(),
            bio: None,
            profile_picture: None,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result: Option<User> = repo.find_by_email("alice@x.com").await.unwrap();

    let user = result.unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.username, "alice");
}
