mod ids;
mod post;
mod profile;
mod user;

pub use ids::{CommentId, EntryId, PostId, ProfileId, UserId};
pub use post::{Comment, CreateComment, CreatePost, Like, Post};
pub use profile::{
    split_skills, with_https, Education, Experience, NewEducation, NewExperience, Profile,
    ProfilePatch, Social,
};
pub use user::{avatar_url, normalize_email, CreateUser, User, UserSummary};
