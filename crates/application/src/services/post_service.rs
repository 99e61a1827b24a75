use std::sync::Arc;

use domain::{
    DomainError, NewLike, NewPost, Post, PostContent, PostDetails, PostId, RepositoryError,
    UserId,
};

use crate::{
    broadcaster::{LikeEvent, LikeEventBroadcaster},
    clock::Clock,
    dto::{MessageResponse, LIKE_ADDED_MESSAGE, LIKE_REMOVED_MESSAGE},
    error::ApplicationError,
    repository::{LikeRepository, PostRepository, UserRepository},
};

/// How a failed realtime notification affects the like/unlike outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Log and report success; the write is already committed.
    #[default]
    BestEffort,
    /// Fail the request with the broadcast error.
    Strict,
}

impl NotifyPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::BestEffort
        }
    }
}

pub struct PostServiceDependencies {
    pub post_repository: Arc<dyn PostRepository>,
    pub like_repository: Arc<dyn LikeRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
    pub broadcaster: Arc<dyn LikeEventBroadcaster>,
    pub notify_policy: NotifyPolicy,
}

pub struct PostService {
    deps: PostServiceDependencies,
}

impl PostService {
    pub fn new(deps: PostServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(&self, content: String, author: UserId) -> Result<Post, ApplicationError> {
        let content = PostContent::new(content)?;
        let post = NewPost::new(content, author, self.deps.clock.now());

        let stored = match self.deps.post_repository.create(post).await {
            Ok(stored) => stored,
            Err(RepositoryError::NotFound) => return Err(DomainError::UserNotFound.into()),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(post_id = %stored.id, user_id = %author, "post created");
        Ok(stored)
    }

    pub async fn find_all(&self) -> Result<Vec<PostDetails>, ApplicationError> {
        let posts = self.deps.post_repository.list_all().await?;
        tracing::debug!(count = posts.len(), "listed posts");
        Ok(posts)
    }

    pub async fn find_my_posts(&self, author: UserId) -> Result<Vec<PostDetails>, ApplicationError> {
        let posts = self.deps.post_repository.list_by_author(author).await?;
        tracing::debug!(user_id = %author, count = posts.len(), "listed own posts");
        Ok(posts)
    }

    pub async fn find_one(&self, id: PostId) -> Result<PostDetails, ApplicationError> {
        self.deps
            .post_repository
            .find_details(id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound.into())
    }

    pub async fn like_post(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApplicationError> {
        self.ensure_post_exists(post_id).await?;

        if self
            .deps
            .like_repository
            .find(post_id, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyLiked.into());
        }

        let liker = self
            .deps
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        let like = NewLike::new(post_id, user_id, self.deps.clock.now());
        let change = match self.deps.like_repository.create_and_increment(like).await {
            Ok(change) => change,
            // Lost a race against a concurrent like from the same user.
            Err(RepositoryError::Conflict) => return Err(DomainError::AlreadyLiked.into()),
            Err(RepositoryError::NotFound) => return Err(DomainError::PostNotFound.into()),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(
            post_id = %post_id,
            user_id = %user_id,
            likes_count = change.likes_count,
            "post liked"
        );

        let now = self.deps.clock.now();
        self.notify([
            LikeEvent::like_added(&change.like, liker.profile(), now),
            LikeEvent::count_update(post_id, change.likes_count, now),
        ])
        .await?;

        Ok(MessageResponse::new(LIKE_ADDED_MESSAGE))
    }

    pub async fn unlike_post(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<MessageResponse, ApplicationError> {
        self.ensure_post_exists(post_id).await?;

        let like = self
            .deps
            .like_repository
            .find(post_id, user_id)
            .await?
            .ok_or(DomainError::LikeNotFound)?;

        let change = match self.deps.like_repository.remove_and_decrement(&like).await {
            Ok(change) => change,
            Err(RepositoryError::NotFound) => return Err(DomainError::LikeNotFound.into()),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(
            post_id = %post_id,
            user_id = %user_id,
            likes_count = change.likes_count,
            "post unliked"
        );

        let now = self.deps.clock.now();
        self.notify([
            LikeEvent::like_removed(post_id, user_id, now),
            LikeEvent::count_update(post_id, change.likes_count, now),
        ])
        .await?;

        Ok(MessageResponse::new(LIKE_REMOVED_MESSAGE))
    }

    async fn ensure_post_exists(&self, post_id: PostId) -> Result<(), ApplicationError> {
        self.deps
            .post_repository
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;
        Ok(())
    }

    /// Sends every event in order. Under [`NotifyPolicy::Strict`] the first
    /// failure is returned after the remaining events have been attempted.
    async fn notify<const N: usize>(&self, events: [LikeEvent; N]) -> Result<(), ApplicationError> {
        let mut first_error = None;
        for event in events {
            let name = event.name();
            let post_id = event.post_id();
            if let Err(err) = self.deps.broadcaster.broadcast(event).await {
                tracing::warn!(
                    event = name,
                    post_id = %post_id,
                    error = %err,
                    "like persisted but realtime notification failed"
                );
                first_error.get_or_insert(err);
            }
        }

        match (self.deps.notify_policy, first_error) {
            (NotifyPolicy::Strict, Some(err)) => Err(err.into()),
            _ => Ok(()),
        }
    }
}
