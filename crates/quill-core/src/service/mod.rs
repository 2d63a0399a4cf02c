//! Application services - orchestration of stores, guards and toggles.

mod content;
mod identity;

pub use content::{
    CommentWithAuthor, ContentService, NewComment, NewPost, PostPatch, PostWithAuthor,
};
pub use identity::{IdentityService, NewAccount, ProfilePatch, Session};
