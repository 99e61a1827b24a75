//! Core domain model for the PeriConecta feed.
//!
//! Users, posts and likes, the validated value objects they are built from,
//! and the error types shared by every layer above.

pub mod errors;
pub mod like;
pub mod post;
pub mod user;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, RepositoryError};
pub use like::{Like, LikeChange, NewLike};
pub use post::{NewPost, Post, PostDetails};
pub use user::{Author, NewUser, User, UserProfile};
pub use value_objects::*;
