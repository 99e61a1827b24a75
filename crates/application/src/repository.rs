//! Record store contract.
//!
//! Implementations must enforce unique `email`, unique `alias` and unique
//! `(user_id, post_id)` for likes, reporting violations as
//! [`RepositoryError::Conflict`].

use async_trait::async_trait;
use domain::{
    Like, LikeChange, NewLike, NewPost, NewUser, Post, PostDetails, PostId, RepositoryError,
    User, UserAlias, UserEmail, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_alias(&self, alias: &UserAlias) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError>;
    async fn exists_by_email_or_alias(
        &self,
        email: &UserEmail,
        alias: &UserAlias,
    ) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Stores a post with a zero like counter. `NotFound` if the author does not exist.
    async fn create(&self, post: NewPost) -> Result<Post, RepositoryError>;
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError>;
    async fn find_details(&self, id: PostId) -> Result<Option<PostDetails>, RepositoryError>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<PostDetails>, RepositoryError>;
    /// Newest first.
    async fn list_by_author(&self, author: UserId) -> Result<Vec<PostDetails>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find(&self, post_id: PostId, user_id: UserId)
        -> Result<Option<Like>, RepositoryError>;

    /// Inserts the like and increments the post counter in a single transaction.
    ///
    /// Returns `Conflict` when the pair already exists and `NotFound` when the
    /// post is gone; in both cases nothing is written.
    async fn create_and_increment(&self, like: NewLike) -> Result<LikeChange, RepositoryError>;

    /// Deletes the like and decrements the post counter in a single transaction.
    ///
    /// Returns `NotFound` when the like no longer exists; the counter is left untouched.
    async fn remove_and_decrement(&self, like: &Like) -> Result<LikeChange, RepositoryError>;
}
