use crate::like::Like;
use crate::user::Author;
use crate::value_objects::{PostContent, PostId, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content: PostContent,
    pub user_id: UserId,
    /// Cached cardinality of the post's likes; only the like toggle writes it.
    pub likes_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: PostContent,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

impl NewPost {
    pub fn new(content: PostContent, user_id: UserId, created_at: Timestamp) -> Self {
        Self {
            content,
            user_id,
            created_at,
        }
    }
}

/// A post joined with its author and likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetails {
    pub post: Post,
    pub author: Author,
    pub likes: Vec<Like>,
}
