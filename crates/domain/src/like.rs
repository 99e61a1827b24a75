use crate::value_objects::{LikeId, PostId, Timestamp, UserId};

/// At most one like exists per `(user_id, post_id)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLike {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: Timestamp,
}

impl NewLike {
    pub fn new(post_id: PostId, user_id: UserId, created_at: Timestamp) -> Self {
        Self {
            user_id,
            post_id,
            created_at,
        }
    }
}

/// Result of a like/unlike write: the row touched and the counter after the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeChange {
    pub like: Like,
    pub likes_count: i64,
}
