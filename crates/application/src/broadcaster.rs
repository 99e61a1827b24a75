use async_trait::async_trait;
use domain::{Like, LikeId, PostId, Timestamp, UserId, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Realtime events pushed to every connected listener.
///
/// Serialized as `{"event": "likeAdded", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum LikeEvent {
    LikeAdded(LikeAdded),
    LikeRemoved(LikeRemoved),
    LikeCountUpdate(LikeCountUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeAdded {
    pub post_id: PostId,
    pub like: LikeSnapshot,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSnapshot {
    pub id: LikeId,
    pub user: UserProfile,
    pub post_id: PostId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRemoved {
    pub post_id: PostId,
    pub user_id: UserId,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCountUpdate {
    pub post_id: PostId,
    pub like_count: i64,
    pub timestamp: Timestamp,
}

impl LikeEvent {
    pub fn like_added(like: &Like, user: UserProfile, timestamp: Timestamp) -> Self {
        Self::LikeAdded(LikeAdded {
            post_id: like.post_id,
            like: LikeSnapshot {
                id: like.id,
                user,
                post_id: like.post_id,
                created_at: like.created_at,
            },
            timestamp,
        })
    }

    pub fn like_removed(post_id: PostId, user_id: UserId, timestamp: Timestamp) -> Self {
        Self::LikeRemoved(LikeRemoved {
            post_id,
            user_id,
            timestamp,
        })
    }

    pub fn count_update(post_id: PostId, like_count: i64, timestamp: Timestamp) -> Self {
        Self::LikeCountUpdate(LikeCountUpdate {
            post_id,
            like_count,
            timestamp,
        })
    }

    pub fn post_id(&self) -> PostId {
        match self {
            Self::LikeAdded(event) => event.post_id,
            Self::LikeRemoved(event) => event.post_id,
            Self::LikeCountUpdate(event) => event.post_id,
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LikeAdded(_) => "likeAdded",
            Self::LikeRemoved(_) => "likeRemoved",
            Self::LikeCountUpdate(_) => "likeCountUpdate",
        }
    }
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    Failed(String),
}

impl BroadcastError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Fire-and-forget fan-out to all listeners. No acknowledgement, no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeEventBroadcaster: Send + Sync {
    async fn broadcast(&self, event: LikeEvent) -> Result<(), BroadcastError>;
}
