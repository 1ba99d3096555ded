//! Comments on posts and comment likes

use crate::posts::{self, NOT_AUTHORIZED};
use chrono::Utc;
use devconnector_core::{
    error::Result,
    types::{CommentId, CreateComment, Post, PostId, UserId},
    CoreError,
};
use sqlx::SqlitePool;

/// Add a comment to a post
pub async fn add(pool: &SqlitePool, post_id: &PostId, comment: CreateComment) -> Result<Post> {
    let id = CommentId::generate();

    let inserted = sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, user_id, name, avatar, text, created_at)
        SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
        WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?2)
        "#,
    )
    .bind(&id)
    .bind(post_id)
    .bind(&comment.user)
    .bind(&comment.name)
    .bind(&comment.avatar)
    .bind(&comment.text)
    .bind(Utc::now())
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(CoreError::not_found("post", post_id.as_str()));
    }

    tracing::debug!(post_id = %post_id, comment_id = %id, "Comment added");

    posts::fetch(pool, post_id).await
}

/// Delete a comment written by `user`
pub async fn delete(
    pool: &SqlitePool,
    post_id: &PostId,
    comment_id: &CommentId,
    user: &UserId,
) -> Result<Post> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM comments WHERE id = ? AND post_id = ? AND user_id = ?")
        .bind(comment_id)
        .bind(post_id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        let err = if !posts::exists(&mut *tx, post_id).await? {
            CoreError::not_found("post", post_id.as_str())
        } else if !comment_exists(&mut tx, post_id, comment_id).await? {
            CoreError::not_found("comment", comment_id.as_str())
        } else {
            CoreError::permission_denied(NOT_AUTHORIZED)
        };
        tx.rollback().await?;
        return Err(err);
    }

    tx.commit().await?;

    posts::fetch(pool, post_id).await
}

/// Like the comment if `user` has not, otherwise remove their like
pub async fn toggle_like(
    pool: &SqlitePool,
    post_id: &PostId,
    comment_id: &CommentId,
    user: &UserId,
) -> Result<Post> {
    let mut tx = pool.begin().await?;

    // The comment must belong to the post named in the request.
    let removed = sqlx::query(
        r#"
        DELETE FROM comment_likes
        WHERE user_id = ?1
          AND comment_id = (SELECT id FROM comments WHERE id = ?2 AND post_id = ?3)
        "#,
    )
    .bind(user)
    .bind(comment_id)
    .bind(post_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if removed == 0 {
        let inserted = sqlx::query(
            r#"
            INSERT INTO comment_likes (comment_id, user_id)
            SELECT id, ?1 FROM comments WHERE id = ?2 AND post_id = ?3
            "#,
        )
        .bind(user)
        .bind(comment_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            let err = if posts::exists(&mut *tx, post_id).await? {
                CoreError::not_found("comment", comment_id.as_str())
            } else {
                CoreError::not_found("post", post_id.as_str())
            };
            tx.rollback().await?;
            return Err(err);
        }
    }

    tx.commit().await?;

    posts::fetch(pool, post_id).await
}

async fn comment_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    post_id: &PostId,
    comment_id: &CommentId,
) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM comments WHERE id = ? AND post_id = ?")
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}
