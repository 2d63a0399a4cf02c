//! Domain entities - the core business objects.

mod comment;
pub mod like;
mod post;
mod user;

pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use user::{AuthorRef, Profile, User};
