/// API route modules
pub mod health;
pub mod posts;
pub mod profile;
pub mod users;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};

/// All `/api` routes with the auth gate applied to the protected set
pub fn routes(app_state: &AppState) -> Router<AppState> {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        // Users
        .route("/users/test", get(users::test))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        // Profiles
        .route("/profile/test", get(profile::test))
        .route("/profile/all", get(profile::list_profiles))
        .route("/profile/handle/:handle", get(profile::by_handle))
        .route("/profile/user/:user_id", get(profile::by_user))
        .route(
            "/profile/github/:username/:count/:sort",
            get(profile::github_repos),
        )
        // Posts
        .route("/posts/test", get(posts::test))
        .route("/posts", get(posts::list_posts))
        .route("/posts/:post_id", get(posts::get_post));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Users
        .route("/users/current", get(users::current))
        // Profiles
        .route("/profile", get(profile::current))
        .route("/profile", post(profile::upsert_profile))
        .route("/profile", delete(profile::delete_account))
        .route("/profile/experience", post(profile::add_experience))
        .route(
            "/profile/experience/:exp_id",
            delete(profile::delete_experience),
        )
        .route("/profile/education", post(profile::add_education))
        .route(
            "/profile/education/:edu_id",
            delete(profile::delete_education),
        )
        // Posts
        .route("/posts", post(posts::create_post))
        .route("/posts/:post_id", delete(posts::delete_post))
        .route("/posts/like/:post_id", post(posts::toggle_like))
        // Comments
        .route("/posts/comment/:post_id", post(posts::add_comment))
        .route(
            "/posts/comment/:post_id/:comment_id",
            delete(posts::delete_comment),
        )
        .route(
            "/posts/comment/like/:post_id/:comment_id",
            post(posts::toggle_comment_like),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
