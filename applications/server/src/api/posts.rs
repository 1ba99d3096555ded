/// Post, comment and like API routes
use crate::{
    extract::{ApiJson, ApiPath},
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use devconnector_core::{
    validation::PostInput, CommentId, CreateComment, CreatePost, Post, PostId, StorageContext,
};
use serde_json::{json, Value};

/// GET /api/posts/test
pub async fn test() -> Json<Value> {
    Json(json!({ "msg": "Posts Works" }))
}

/// GET /api/posts
pub async fn list_posts(State(app_state): State<AppState>) -> Result<Json<Vec<Post>>> {
    let posts = app_state.db.get_all_posts().await?;
    Ok(Json(posts))
}

/// GET /api/posts/:post_id
pub async fn get_post(
    State(app_state): State<AppState>,
    ApiPath(post_id): ApiPath<String>,
) -> Result<Json<Post>> {
    app_state
        .db
        .get_post(&PostId::new(post_id))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::missing("post"))
}

/// POST /api/posts
pub async fn create_post(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<PostInput>,
) -> Result<Json<Post>> {
    let text = req.into_text()?;
    let author = user.identity();

    let post = app_state
        .db
        .create_post(CreatePost {
            user: author.id.clone(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            text,
        })
        .await?;

    Ok(Json(post))
}

/// DELETE /api/posts/:post_id
pub async fn delete_post(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(post_id): ApiPath<String>,
) -> Result<Json<Value>> {
    app_state
        .db
        .delete_post(&PostId::new(post_id), user.user_id())
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/posts/like/:post_id
///
/// Likes the post, or removes the caller's like if they already liked it.
pub async fn toggle_like(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(post_id): ApiPath<String>,
) -> Result<Json<Post>> {
    let post = app_state
        .db
        .toggle_post_like(&PostId::new(post_id), user.user_id())
        .await?;
    Ok(Json(post))
}

/// POST /api/posts/comment/:post_id
pub async fn add_comment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(post_id): ApiPath<String>,
    ApiJson(req): ApiJson<PostInput>,
) -> Result<Json<Post>> {
    let text = req.into_text()?;
    let author = user.identity();

    let post = app_state
        .db
        .add_comment(
            &PostId::new(post_id),
            CreateComment {
                user: author.id.clone(),
                name: author.name.clone(),
                avatar: author.avatar.clone(),
                text,
            },
        )
        .await?;

    Ok(Json(post))
}

/// DELETE /api/posts/comment/:post_id/:comment_id
pub async fn delete_comment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath((post_id, comment_id)): ApiPath<(String, String)>,
) -> Result<Json<Post>> {
    let post = app_state
        .db
        .delete_comment(
            &PostId::new(post_id),
            &CommentId::new(comment_id),
            user.user_id(),
        )
        .await?;
    Ok(Json(post))
}

/// POST /api/posts/comment/like/:post_id/:comment_id
pub async fn toggle_comment_like(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath((post_id, comment_id)): ApiPath<(String, String)>,
) -> Result<Json<Post>> {
    let post = app_state
        .db
        .toggle_comment_like(
            &PostId::new(post_id),
            &CommentId::new(comment_id),
            user.user_id(),
        )
        .await?;
    Ok(Json(post))
}
