use crate::{comments, create_pool, posts, profiles, run_migrations, users, StorageError};
use async_trait::async_trait;
use devconnector_core::{error::Result, storage::StorageContext, types::*};
use sqlx::SqlitePool;

/// Storage context backed by `SQLite`
#[derive(Clone)]
pub struct SqliteStorageContext {
    pool: SqlitePool,
}

impl SqliteStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) and migrate the database at `database_url`
    pub async fn connect(database_url: &str) -> std::result::Result<Self, StorageError> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Round-trip a trivial query to check the database is reachable
    pub async fn ping(&self) -> std::result::Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageContext for SqliteStorageContext {
    // Users
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        users::find_by_email(&self.pool, email).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn delete_account(&self, id: &UserId) -> Result<()> {
        users::delete_account(&self.pool, id).await
    }

    // Profiles
    async fn get_profile_by_user(&self, user_id: &UserId) -> Result<Option<Profile>> {
        profiles::get_by_user(&self.pool, user_id).await
    }

    async fn get_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>> {
        profiles::get_by_handle(&self.pool, handle).await
    }

    async fn get_all_profiles(&self) -> Result<Vec<Profile>> {
        profiles::get_all(&self.pool).await
    }

    async fn upsert_profile(&self, user_id: &UserId, patch: ProfilePatch) -> Result<Profile> {
        profiles::upsert(&self.pool, user_id, patch).await
    }

    async fn add_experience(&self, user_id: &UserId, entry: NewExperience) -> Result<Profile> {
        profiles::add_experience(&self.pool, user_id, entry).await
    }

    async fn remove_experience(&self, user_id: &UserId, entry_id: &EntryId) -> Result<Profile> {
        profiles::remove_experience(&self.pool, user_id, entry_id).await
    }

    async fn add_education(&self, user_id: &UserId, entry: NewEducation) -> Result<Profile> {
        profiles::add_education(&self.pool, user_id, entry).await
    }

    async fn remove_education(&self, user_id: &UserId, entry_id: &EntryId) -> Result<Profile> {
        profiles::remove_education(&self.pool, user_id, entry_id).await
    }

    // Posts
    async fn get_all_posts(&self) -> Result<Vec<Post>> {
        posts::get_all(&self.pool).await
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        posts::get_by_id(&self.pool, id).await
    }

    async fn create_post(&self, post: CreatePost) -> Result<Post> {
        posts::create(&self.pool, post).await
    }

    async fn delete_post(&self, id: &PostId, user_id: &UserId) -> Result<()> {
        posts::delete(&self.pool, id, user_id).await
    }

    async fn toggle_post_like(&self, id: &PostId, user_id: &UserId) -> Result<Post> {
        posts::toggle_like(&self.pool, id, user_id).await
    }

    // Comments
    async fn add_comment(&self, post_id: &PostId, comment: CreateComment) -> Result<Post> {
        comments::add(&self.pool, post_id, comment).await
    }

    async fn delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<Post> {
        comments::delete(&self.pool, post_id, comment_id, user_id).await
    }

    async fn toggle_comment_like(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<Post> {
        comments::toggle_like(&self.pool, post_id, comment_id, user_id).await
    }
}
