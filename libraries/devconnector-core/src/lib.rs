//! DevConnector Core
//!
//! Storage-agnostic domain types, validation, and error handling for the
//! DevConnector server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Profile`, `Post`, `Comment`, etc.
//! - **Validation**: pure validators returning a field → message map
//! - **Storage Trait**: `StorageContext`, implemented by `devconnector-storage`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use devconnector_core::validation::{validate_register, RegisterInput};
//!
//! let input = RegisterInput {
//!     name: Some("Ada".into()),
//!     email: Some("ada@example.com".into()),
//!     password: Some("secret12".into()),
//!     password2: None,
//! };
//!
//! let validation = validate_register(&input);
//! assert!(validation.is_valid);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use storage::StorageContext;

pub use types::{
    // Identifiers
    CommentId, EntryId, PostId, ProfileId, UserId,
    // Users
    CreateUser, User, UserSummary,
    // Profiles
    Education, Experience, NewEducation, NewExperience, Profile, ProfilePatch, Social,
    // Posts
    Comment, CreateComment, CreatePost, Like, Post,
};
