//! Posts and post likes

use chrono::Utc;
use devconnector_core::{
    error::Result,
    types::{Comment, CommentId, CreatePost, Like, Post, PostId, UserId},
    CoreError,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;

pub(crate) const NOT_AUTHORIZED: &str = "User not authorized";

fn post_from_row(row: &SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        user: row.try_get("user_id")?,
        name: row.try_get("name")?,
        avatar: row.try_get("avatar")?,
        text: row.try_get("text")?,
        likes: Vec::new(),
        comments: Vec::new(),
        date: row.try_get("created_at")?,
    })
}

fn comment_from_row(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        user: row.try_get("user_id")?,
        name: row.try_get("name")?,
        avatar: row.try_get("avatar")?,
        text: row.try_get("text")?,
        likes: Vec::new(),
        date: row.try_get("created_at")?,
    })
}

/// Load posts with likes and comments assembled, most recent first
///
/// With `only` set, just that post is loaded.
pub(crate) async fn load(pool: &SqlitePool, only: Option<&PostId>) -> Result<Vec<Post>> {
    let post_rows = sqlx::query(
        r#"
        SELECT id, user_id, name, avatar, text, created_at
        FROM posts
        WHERE (?1 IS NULL OR id = ?1)
        ORDER BY seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    if post_rows.is_empty() {
        return Ok(Vec::new());
    }

    let like_rows = sqlx::query(
        r#"
        SELECT post_id, user_id
        FROM post_likes
        WHERE (?1 IS NULL OR post_id = ?1)
        ORDER BY seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let comment_rows = sqlx::query(
        r#"
        SELECT id, post_id, user_id, name, avatar, text, created_at
        FROM comments
        WHERE (?1 IS NULL OR post_id = ?1)
        ORDER BY seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let comment_like_rows = sqlx::query(
        r#"
        SELECT cl.comment_id, cl.user_id
        FROM comment_likes cl
        INNER JOIN comments c ON c.id = cl.comment_id
        WHERE (?1 IS NULL OR c.post_id = ?1)
        ORDER BY cl.seq DESC
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let mut comment_likes: HashMap<CommentId, Vec<Like>> = HashMap::new();
    for row in &comment_like_rows {
        let comment_id: CommentId = row.try_get("comment_id")?;
        comment_likes.entry(comment_id).or_default().push(Like {
            user: row.try_get("user_id")?,
        });
    }

    let mut comments: HashMap<PostId, Vec<Comment>> = HashMap::new();
    for row in &comment_rows {
        let post_id: PostId = row.try_get("post_id")?;
        let mut comment = comment_from_row(row)?;
        comment.likes = comment_likes.remove(&comment.id).unwrap_or_default();
        comments.entry(post_id).or_default().push(comment);
    }

    let mut likes: HashMap<PostId, Vec<Like>> = HashMap::new();
    for row in &like_rows {
        let post_id: PostId = row.try_get("post_id")?;
        likes.entry(post_id).or_default().push(Like {
            user: row.try_get("user_id")?,
        });
    }

    post_rows
        .iter()
        .map(|row| {
            let mut post = post_from_row(row)?;
            post.likes = likes.remove(&post.id).unwrap_or_default();
            post.comments = comments.remove(&post.id).unwrap_or_default();
            Ok(post)
        })
        .collect()
}

/// The post, or `NotFound("post")`
pub(crate) async fn fetch(pool: &SqlitePool, id: &PostId) -> Result<Post> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("post", id.as_str()))
}

/// Whether a post with this id exists
pub(crate) async fn exists<'e, E>(executor: E, id: &PostId) -> Result<bool>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let row = sqlx::query("SELECT 1 FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Get all posts, most recent first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Post>> {
    load(pool, None).await
}

/// Get post by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PostId) -> Result<Option<Post>> {
    Ok(load(pool, Some(id)).await?.into_iter().next())
}

/// Create a new post
pub async fn create(pool: &SqlitePool, post: CreatePost) -> Result<Post> {
    let id = PostId::generate();

    sqlx::query(
        "INSERT INTO posts (id, user_id, name, avatar, text, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&post.user)
    .bind(&post.name)
    .bind(&post.avatar)
    .bind(&post.text)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    tracing::debug!(post_id = %id, user_id = %post.user, "Post created");

    fetch(pool, &id).await
}

/// Delete a post owned by `user`
///
/// A post owned by someone else is left untouched and reported as
/// `PermissionDenied`.
pub async fn delete(pool: &SqlitePool, id: &PostId, user: &UserId) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM posts WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        if exists(pool, id).await? {
            return Err(CoreError::permission_denied(NOT_AUTHORIZED));
        }
        return Err(CoreError::not_found("post", id.as_str()));
    }

    Ok(())
}

/// Like the post if `user` has not, otherwise remove their like
pub async fn toggle_like(pool: &SqlitePool, id: &PostId, user: &UserId) -> Result<Post> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        let inserted = sqlx::query(
            "INSERT INTO post_likes (post_id, user_id)
             SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?1)",
        )
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Err(CoreError::not_found("post", id.as_str()));
        }
    }

    tx.commit().await?;

    fetch(pool, id).await
}
