use std::collections::HashMap;
use std::sync::Arc;

use application::repository::{LikeRepository, PostRepository, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Author, Like, LikeChange, LikeId, NewLike, NewPost, NewUser, PasswordHash, PersonName, Post,
    PostContent, PostDetails, PostId, RepositoryError, User, UserAlias, UserEmail, UserId,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

/// Unique violations become `Conflict`, foreign key violations `NotFound`.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict;
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, alias, birth_date, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    alias: String,
    birth_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let email = UserEmail::parse(value.email).map_err(|err| invalid_data(err.to_string()))?;
        let password =
            PasswordHash::new(value.password_hash).map_err(|err| invalid_data(err.to_string()))?;
        let first_name = PersonName::parse("firstName", value.first_name)
            .map_err(|err| invalid_data(err.to_string()))?;
        let last_name = PersonName::parse("lastName", value.last_name)
            .map_err(|err| invalid_data(err.to_string()))?;
        let alias = UserAlias::parse(value.alias).map_err(|err| invalid_data(err.to_string()))?;

        Ok(User {
            id: UserId::new(value.id),
            email,
            password,
            first_name,
            last_name,
            alias,
            birth_date: value.birth_date,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PostRecord {
    id: i64,
    content: String,
    user_id: i64,
    likes_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRecord> for Post {
    type Error = RepositoryError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        let content =
            PostContent::new(value.content).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Post {
            id: PostId::new(value.id),
            content,
            user_id: UserId::new(value.user_id),
            likes_count: value.likes_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// A post row joined with the columns of its author projection.
#[derive(Debug, FromRow)]
struct PostWithAuthorRecord {
    #[sqlx(flatten)]
    post: PostRecord,
    author_first_name: String,
    author_last_name: String,
    author_alias: String,
}

#[derive(Debug, FromRow)]
struct LikeRecord {
    id: i64,
    user_id: i64,
    post_id: i64,
    created_at: DateTime<Utc>,
}

impl From<LikeRecord> for Like {
    fn from(value: LikeRecord) -> Self {
        Like {
            id: LikeId::new(value.id),
            user_id: UserId::new(value.user_id),
            post_id: PostId::new(value.post_id),
            created_at: value.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, alias, birth_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.alias.as_str())
        .bind(user.birth_date)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_alias(&self, alias: &UserAlias) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE alias = $1"
        ))
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn exists_by_email_or_alias(
        &self,
        email: &UserEmail,
        alias: &UserAlias,
    ) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 OR alias = $2)",
        )
        .bind(email.as_str())
        .bind(alias.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)
    }
}

const POST_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.content, p.user_id, p.likes_count, p.created_at, p.updated_at,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           u.alias AS author_alias
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches likes to already-joined post rows, keeping their order.
    async fn with_likes(
        &self,
        records: Vec<PostWithAuthorRecord>,
    ) -> Result<Vec<PostDetails>, RepositoryError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = records.iter().map(|record| record.post.id).collect();
        let like_records = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM likes
            WHERE post_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let mut likes_by_post: HashMap<i64, Vec<Like>> = HashMap::new();
        for record in like_records {
            likes_by_post
                .entry(record.post_id)
                .or_default()
                .push(Like::from(record));
        }

        records
            .into_iter()
            .map(|record| {
                let author = Author {
                    id: UserId::new(record.post.user_id),
                    first_name: record.author_first_name,
                    last_name: record.author_last_name,
                    alias: record.author_alias,
                };
                let likes = likes_by_post.remove(&record.post.id).unwrap_or_default();
                Ok(PostDetails {
                    post: Post::try_from(record.post)?,
                    author,
                    likes,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepositoryError> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (content, user_id, likes_count, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $3)
            RETURNING id, content, user_id, likes_count, created_at, updated_at
            "#,
        )
        .bind(post.content.as_str())
        .bind(post.user_id.value())
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Post::try_from(record)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, content, user_id, likes_count, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(Post::try_from).transpose()
    }

    async fn find_details(&self, id: PostId) -> Result<Option<PostDetails>, RepositoryError> {
        let record = sqlx::query_as::<_, PostWithAuthorRecord>(&format!(
            "{POST_WITH_AUTHOR} WHERE p.id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        let Some(record) = record else {
            return Ok(None);
        };
        Ok(self.with_likes(vec![record]).await?.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<PostDetails>, RepositoryError> {
        let records = sqlx::query_as::<_, PostWithAuthorRecord>(&format!(
            "{POST_WITH_AUTHOR} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.with_likes(records).await
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<PostDetails>, RepositoryError> {
        let records = sqlx::query_as::<_, PostWithAuthorRecord>(&format!(
            "{POST_WITH_AUTHOR} WHERE p.user_id = $1 ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(author.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        self.with_likes(records).await
    }
}

#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of like rows for `post_id`, for checking the cached
    /// `likes_count` against the source of truth.
    pub async fn count_for_post(&self, post_id: PostId) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn find(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Option<Like>, RepositoryError> {
        let record = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM likes
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(Like::from))
    }

    async fn create_and_increment(&self, like: NewLike) -> Result<LikeChange, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let record = sqlx::query_as::<_, LikeRecord>(
            r#"
            INSERT INTO likes (user_id, post_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(like.user_id.value())
        .bind(like.post_id.value())
        .bind(like.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        let likes_count = sqlx::query_scalar::<_, i64>(
            "UPDATE posts SET likes_count = likes_count + 1 WHERE id = $1 RETURNING likes_count",
        )
        .bind(like.post_id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(LikeChange {
            like: Like::from(record),
            likes_count,
        })
    }

    async fn remove_and_decrement(&self, like: &Like) -> Result<LikeChange, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let record = sqlx::query_as::<_, LikeRecord>(
            "DELETE FROM likes WHERE id = $1 RETURNING id, user_id, post_id, created_at",
        )
        .bind(like.id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        let likes_count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts SET likes_count = GREATEST(likes_count - 1, 0)
            WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(record.post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(LikeChange {
            like: Like::from(record),
            likes_count,
        })
    }
}

#[derive(Clone)]
pub struct PgStorage {
    pub pool: PgPool,
    pub user_repository: Arc<PgUserRepository>,
    pub post_repository: Arc<PgPostRepository>,
    pub like_repository: Arc<PgLikeRepository>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            post_repository: Arc::new(PgPostRepository::new(pool.clone())),
            like_repository: Arc::new(PgLikeRepository::new(pool.clone())),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
