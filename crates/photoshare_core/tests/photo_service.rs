use photoshare_core::db::open_db_in_memory;
use photoshare_core::{
    CascadeSummary, NewComment, NewPost, NewUser, Page, PostId, Record, ServiceError,
    SqlitePhotoService,
};
use serde_json::Value;

#[test]
fn register_publish_delete_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let post = service
        .publish_post(&NewPost::new(alice.id, "img.png"))
        .unwrap();

    let summary = service.delete_user(alice.id).unwrap();
    assert_eq!(summary.posts, 1);

    let err = service.get_post(post.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "posts",
            ..
        }
    ));
}

#[test]
fn post_detail_collects_comments_and_likes() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let bob = service
        .register_user(&NewUser::new("bob", "bob@example.com", "pw"))
        .unwrap();
    let post = service
        .publish_post(&NewPost::new(alice.id, "img.png"))
        .unwrap();
    service
        .comment_on_post(&NewComment::new(bob.id, post.id, "great shot"))
        .unwrap();
    service
        .comment_on_post(&NewComment::new(alice.id, post.id, "thanks"))
        .unwrap();
    service.like_post(bob.id, post.id).unwrap();

    let detail = service.post_detail(post.id, Page::default()).unwrap();
    assert_eq!(detail.post, post);
    assert_eq!(detail.comments.len(), 2);
    assert_eq!(detail.like_count, 1);

    let snapshot = Value::Object(detail.serialize());
    assert_eq!(snapshot["like_count"], 1);
    assert_eq!(snapshot["comments"][0]["content"], "great shot");
    assert_eq!(snapshot["comments"][1]["user_id"], alice.id.get());
    assert_eq!(snapshot["image_url"], "img.png");
}

#[test]
fn post_detail_for_missing_post_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let err = service.post_detail(PostId(5), Page::default()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: "posts",
            id: 5
        }
    ));
}

#[test]
fn duplicate_registration_passes_constraint_error_through() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let err = service
        .register_user(&NewUser::new("alice", "other@example.com", "pw"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert!(err.is_constraint_violation());
}

#[test]
fn unlike_and_delete_post_report_cascade() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let post = service
        .publish_post(&NewPost::new(alice.id, "img.png"))
        .unwrap();
    let like = service.like_post(alice.id, post.id).unwrap();
    service.like_post(alice.id, post.id).unwrap();
    service
        .comment_on_post(&NewComment::new(alice.id, post.id, "hi"))
        .unwrap();

    service.unlike(like.id).unwrap();
    assert!(matches!(
        service.unlike(like.id),
        Err(ServiceError::NotFound {
            entity: "likes",
            ..
        })
    ));

    let summary = service.delete_post(post.id).unwrap();
    assert_eq!(
        summary,
        CascadeSummary {
            posts: 0,
            comments: 1,
            likes: 1
        }
    );
    assert!(service.posts_by(alice.id, Page::default()).unwrap().is_empty());
    assert_eq!(service.get_user(alice.id).unwrap().serialize()["username"], "alice");
}

#[test]
fn recent_posts_spans_all_authors() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let bob = service
        .register_user(&NewUser::new("bob", "bob@example.com", "pw"))
        .unwrap();
    service
        .publish_post(&NewPost::new(alice.id, "a.png"))
        .unwrap();
    service.publish_post(&NewPost::new(bob.id, "b.png")).unwrap();

    assert_eq!(service.recent_posts(Page::default()).unwrap().len(), 2);
    assert_eq!(service.recent_posts(Page::new(1, 0)).unwrap().len(), 1);
}

#[test]
fn post_detail_reads_rows_written_outside_the_model() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let post = service
        .publish_post(&NewPost::new(alice.id, "img.png"))
        .unwrap();

    let tab_only = conn.execute(
        "INSERT INTO comments (content, user_id, post_id) VALUES ('\t', ?1, ?2);",
        rusqlite::params![alice.id, post.id],
    );
    assert!(tab_only.is_err());

    conn.execute(
        "INSERT INTO comments (content, user_id, post_id) VALUES ('\u{00A0}', ?1, ?2);",
        rusqlite::params![alice.id, post.id],
    )
    .unwrap();

    let detail = service.post_detail(post.id, Page::default()).unwrap();
    assert_eq!(detail.comments.len(), 1);
}

#[test]
fn user_activity_is_listed_across_posts() {
    let conn = open_db_in_memory().unwrap();
    let service = SqlitePhotoService::try_from_connection(&conn).unwrap();

    let alice = service
        .register_user(&NewUser::new("alice", "alice@example.com", "pw"))
        .unwrap();
    let bob = service
        .register_user(&NewUser::new("bob", "bob@example.com", "pw"))
        .unwrap();
    let first = service
        .publish_post(&NewPost::new(alice.id, "a.png"))
        .unwrap();
    let second = service.publish_post(&NewPost::new(bob.id, "b.png")).unwrap();

    for post_id in [first.id, second.id] {
        service
            .comment_on_post(&NewComment::new(bob.id, post_id, "nice"))
            .unwrap();
        service.like_post(bob.id, post_id).unwrap();
    }

    let comments = service.comments_by(bob.id, Page::default()).unwrap();
    let likes = service.likes_by(bob.id, Page::default()).unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(likes.len(), 2);
    assert!(comments.iter().all(|c| c.user_id == bob.id));
    assert!(service.likes_by(alice.id, Page::default()).unwrap().is_empty());

    service.delete_user(bob.id).unwrap();
    assert!(service.comments_by(bob.id, Page::default()).unwrap().is_empty());
}
