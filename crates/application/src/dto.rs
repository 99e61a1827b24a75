use chrono::NaiveDate;
use domain::{Author, Like, LikeId, Post, PostDetails, PostId, Timestamp, User, UserId};
use serde::{Deserialize, Serialize};

pub const LIKE_ADDED_MESSAGE: &str = "Like agregado exitosamente";
pub const LIKE_REMOVED_MESSAGE: &str = "Like removido exitosamente";

/// Plain acknowledgement returned by the like toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: PostId,
    pub content: String,
    pub user_id: UserId,
    pub likes_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Post> for PostDto {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            content: post.content.as_str().to_owned(),
            user_id: post.user_id,
            likes_count: post.likes_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    pub id: LikeId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: Timestamp,
}

impl From<&Like> for LikeDto {
    fn from(like: &Like) -> Self {
        Self {
            id: like.id,
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: like.created_at,
        }
    }
}

/// A post as listed by the feed: the row itself, its author and its likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailsDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub user: Author,
    pub likes: Vec<LikeDto>,
}

impl From<&PostDetails> for PostDetailsDto {
    fn from(details: &PostDetails) -> Self {
        Self {
            post: PostDto::from(&details.post),
            user: details.author.clone(),
            likes: details.likes.iter().map(LikeDto::from).collect(),
        }
    }
}

/// User summary returned alongside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDto {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
    pub birth_date: NaiveDate,
}

impl From<&User> for AuthUserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.as_str().to_owned(),
            last_name: user.last_name.as_str().to_owned(),
            alias: user.alias.as_str().to_owned(),
            birth_date: user.birth_date,
        }
    }
}

/// Registration input as received from the client, before validation.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
    pub birth_date: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}
