//! Integration tests for the posts and comments vertical slices
//!
//! - Feed ordering
//! - Ownership checks on delete
//! - Like toggles on posts and comments
//! - Concurrent toggles do not lose updates


use devconnector_core::{types::*, CoreError, StorageContext};
use devconnector_storage::SqliteStorageContext;
use std::sync::Arc;
use test_helpers::*;

#[tokio::test]
async fn test_create_post_starts_empty() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada").await;
    let post = create_test_post(pool, &user, "hello").await;

    assert_eq!(post.text, "hello");
    assert_eq!(post.user, user.id);
    assert_eq!(post.name, "Ada");
    assert!(post.likes.is_empty());
    assert!(post.comments.is_empty());
}

#[tokio::test]
async fn test_feed_most_recent_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada").await;
    create_test_post(pool, &user, "first").await;
    create_test_post(pool, &user, "second").await;
    create_test_post(pool, &user, "third").await;

    let posts = devconnector_storage::posts::get_all(pool).await.unwrap();
    let texts: Vec<_> = posts.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_delete_post_by_non_owner_fails() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let grace = create_test_user(pool, "Grace").await;
    let post = create_test_post(pool, &ada, "mine").await;

    let err = devconnector_storage::posts::delete(pool, &post.id, &grace.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    let still_there = devconnector_storage::posts::get_by_id(pool, &post.id)
        .await
        .unwrap();
    assert_eq!(still_there, Some(post.clone()));

    devconnector_storage::posts::delete(pool, &post.id, &ada.id)
        .await
        .expect("owner can delete");
    assert!(devconnector_storage::posts::get_by_id(pool, &post.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_missing_post() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada").await;
    let err = devconnector_storage::posts::delete(pool, &PostId::generate(), &user.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "post"));
}

#[tokio::test]
async fn test_toggle_like_twice_restores_likes() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let grace = create_test_user(pool, "Grace").await;
    let post = create_test_post(pool, &ada, "like me").await;

    devconnector_storage::posts::toggle_like(pool, &post.id, &ada.id)
        .await
        .unwrap();
    let liked = devconnector_storage::posts::toggle_like(pool, &post.id, &grace.id)
        .await
        .unwrap();

    assert_eq!(liked.likes.len(), 2);
    assert_eq!(liked.likes[0].user, grace.id);
    assert!(liked_by(&liked.likes, &ada.id));

    let unliked = devconnector_storage::posts::toggle_like(pool, &post.id, &grace.id)
        .await
        .unwrap();
    assert_eq!(unliked.likes, vec![Like { user: ada.id.clone() }]);
}

#[tokio::test]
async fn test_toggle_like_missing_post() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada").await;
    let err = devconnector_storage::posts::toggle_like(pool, &PostId::generate(), &user.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "post"));
}

#[tokio::test]
async fn test_concurrent_likes_are_not_lost() {
    let test_db = TestDb::new().await;
    let storage = Arc::new(SqliteStorageContext::new(test_db.pool().clone()));

    let author = create_test_user(&test_db.pool, "Author").await;
    let post = create_test_post(&test_db.pool, &author, "popular").await;

    let mut likers = Vec::new();
    for i in 0..8 {
        likers.push(create_test_user(&test_db.pool, &format!("Fan{i}")).await);
    }

    let handles: Vec<_> = likers
        .iter()
        .map(|liker| {
            let storage = Arc::clone(&storage);
            let post_id = post.id.clone();
            let user_id = liker.id.clone();
            tokio::spawn(async move { storage.toggle_post_like(&post_id, &user_id).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = storage.get_post(&post.id).await.unwrap().unwrap();
    assert_eq!(post.likes.len(), 8);
    for liker in &likers {
        assert!(liked_by(&post.likes, &liker.id));
    }
}

#[tokio::test]
async fn test_comments_most_recent_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let grace = create_test_user(pool, "Grace").await;
    let post = create_test_post(pool, &ada, "discuss").await;

    create_test_comment(pool, &post.id, &grace, "first!").await;
    let post = create_test_comment(pool, &post.id, &ada, "reply").await;

    assert_eq!(post.comments.len(), 2);
    assert_eq!(post.comments[0].text, "reply");
    assert_eq!(post.comments[1].name, "Grace");
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada").await;
    let err = devconnector_storage::comments::add(
        pool,
        &PostId::generate(),
        CreateComment {
            user: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            text: "orphan".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "post"));
}

#[tokio::test]
async fn test_delete_comment_checks_author() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let grace = create_test_user(pool, "Grace").await;
    let post = create_test_post(pool, &ada, "discuss").await;
    let post = create_test_comment(pool, &post.id, &grace, "grace's comment").await;
    let comment_id = post.comments[0].id.clone();

    // The post's author does not own the comment
    let err = devconnector_storage::comments::delete(pool, &post.id, &comment_id, &ada.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    let unchanged = devconnector_storage::posts::get_by_id(pool, &post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.comments.len(), 1);

    let post = devconnector_storage::comments::delete(pool, &post.id, &comment_id, &grace.id)
        .await
        .unwrap();
    assert!(post.comments.is_empty());
}

#[tokio::test]
async fn test_delete_missing_comment() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let post = create_test_post(pool, &ada, "quiet").await;

    let err =
        devconnector_storage::comments::delete(pool, &post.id, &CommentId::generate(), &ada.id)
            .await
            .unwrap_err();
    assert!(is_not_found(&err, "comment"));

    let err = devconnector_storage::comments::delete(
        pool,
        &PostId::generate(),
        &CommentId::generate(),
        &ada.id,
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "post"));
}

#[tokio::test]
async fn test_toggle_comment_like() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let grace = create_test_user(pool, "Grace").await;
    let post = create_test_post(pool, &ada, "discuss").await;
    let post = create_test_comment(pool, &post.id, &grace, "nice").await;
    let comment_id = post.comments[0].id.clone();

    let post = devconnector_storage::comments::toggle_like(pool, &post.id, &comment_id, &ada.id)
        .await
        .unwrap();
    let comment = post.comment(&comment_id).unwrap();
    assert!(liked_by(&comment.likes, &ada.id));
    assert!(post.likes.is_empty());

    let post = devconnector_storage::comments::toggle_like(pool, &post.id, &comment_id, &ada.id)
        .await
        .unwrap();
    assert!(post.comment(&comment_id).unwrap().likes.is_empty());
}

#[tokio::test]
async fn test_comment_like_scoped_to_post() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let ada = create_test_user(pool, "Ada").await;
    let first = create_test_post(pool, &ada, "first").await;
    let second = create_test_post(pool, &ada, "second").await;
    let first = create_test_comment(pool, &first.id, &ada, "on first").await;
    let comment_id = first.comments[0].id.clone();

    let err =
        devconnector_storage::comments::toggle_like(pool, &second.id, &comment_id, &ada.id)
            .await
            .unwrap_err();
    assert!(is_not_found(&err, "comment"));
}
