//! Storage trait for DevConnector records

use crate::error::Result;
use crate::types::{
    CommentId, CreateComment, CreatePost, CreateUser, EntryId, NewEducation, NewExperience,
    Post, PostId, Profile, ProfilePatch, User, UserId,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Every mutating operation is a single atomic unit: implementations must not
/// let two concurrent calls interleave between their read and their write.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user; fails with `Duplicate` when the email is taken
    async fn create_user(&self, user: CreateUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Find user by (normalized) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Delete a user together with their profile
    async fn delete_account(&self, id: &UserId) -> Result<()>;

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Get the profile owned by a user
    async fn get_profile_by_user(&self, user_id: &UserId) -> Result<Option<Profile>>;

    /// Get a profile by its public handle
    async fn get_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>>;

    /// Get all profiles
    async fn get_all_profiles(&self) -> Result<Vec<Profile>>;

    /// Create the user's profile or merge the patch onto the existing one
    async fn upsert_profile(&self, user_id: &UserId, patch: ProfilePatch) -> Result<Profile>;

    /// Add an experience entry at the front of the list
    async fn add_experience(&self, user_id: &UserId, entry: NewExperience) -> Result<Profile>;

    /// Remove an experience entry; `NotFound` if it is not on this profile
    async fn remove_experience(&self, user_id: &UserId, entry_id: &EntryId) -> Result<Profile>;

    /// Add an education entry at the front of the list
    async fn add_education(&self, user_id: &UserId, entry: NewEducation) -> Result<Profile>;

    /// Remove an education entry; `NotFound` if it is not on this profile
    async fn remove_education(&self, user_id: &UserId, entry_id: &EntryId) -> Result<Profile>;

    // ========================================================================
    // Posts
    // ========================================================================

    /// Get all posts, most recent first
    async fn get_all_posts(&self) -> Result<Vec<Post>>;

    /// Get post by ID
    async fn get_post(&self, id: &PostId) -> Result<Option<Post>>;

    /// Create a new post
    async fn create_post(&self, post: CreatePost) -> Result<Post>;

    /// Delete a post owned by `user_id`
    async fn delete_post(&self, id: &PostId, user_id: &UserId) -> Result<()>;

    /// Like the post if `user_id` has not, otherwise remove the like
    async fn toggle_post_like(&self, id: &PostId, user_id: &UserId) -> Result<Post>;

    // ========================================================================
    // Comments
    // ========================================================================

    /// Add a comment at the front of the post's comment list
    async fn add_comment(&self, post_id: &PostId, comment: CreateComment) -> Result<Post>;

    /// Remove a comment authored by `user_id`
    async fn delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<Post>;

    /// Like the comment if `user_id` has not, otherwise remove the like
    async fn toggle_comment_like(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<Post>;
}
