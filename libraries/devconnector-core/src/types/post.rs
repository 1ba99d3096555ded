/// Post, comment and like domain types
use super::ids::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single like, keyed by the user who gave it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: UserId,
}

/// Post on the shared feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,

    /// Author
    pub user: UserId,

    /// Author name and avatar as they were when the post was written
    pub name: String,
    pub avatar: String,

    pub text: String,

    /// Most recent first, at most one per user
    pub likes: Vec<Like>,

    /// Most recent first
    pub comments: Vec<Comment>,

    pub date: DateTime<Utc>,
}

/// Comment embedded in a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user: UserId,
    pub name: String,
    pub avatar: String,
    pub text: String,

    /// Most recent first, at most one per user
    pub likes: Vec<Like>,

    pub date: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub user: UserId,
    pub name: String,
    pub avatar: String,
    pub text: String,
}

/// Input for adding a comment to a post
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub user: UserId,
    pub name: String,
    pub avatar: String,
    pub text: String,
}
