//! In-memory record store.
//!
//! Mirrors the PostgreSQL schema's constraints (unique email, unique alias,
//! unique `(user_id, post_id)`, cascading deletes) so services and HTTP flows
//! can be exercised without a database. Every write takes the single state
//! lock, which makes like + counter updates atomic the same way a transaction
//! does.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    Like, LikeChange, LikeId, NewLike, NewPost, NewUser, Post, PostDetails, PostId,
    RepositoryError, User, UserAlias, UserEmail, UserId,
};
use tokio::sync::RwLock;

use crate::repository::{LikeRepository, PostRepository, UserRepository};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    likes: BTreeMap<LikeId, Like>,
    next_user_id: i64,
    next_post_id: i64,
    next_like_id: i64,
}

impl MemoryState {
    fn details(&self, post: &Post) -> Result<PostDetails, RepositoryError> {
        let author = self
            .users
            .get(&post.user_id)
            .ok_or_else(|| RepositoryError::storage(format!("post {} has no author", post.id)))?
            .author();
        let likes = self
            .likes
            .values()
            .filter(|like| like.post_id == post.id)
            .cloned()
            .collect();
        Ok(PostDetails {
            post: post.clone(),
            author,
            likes,
        })
    }

    fn newest_first<'a>(
        &self,
        posts: impl Iterator<Item = &'a Post>,
    ) -> Result<Vec<PostDetails>, RepositoryError> {
        let mut posts: Vec<&Post> = posts.collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts.into_iter().map(|post| self.details(post)).collect()
    }

    fn find_like(&self, post_id: PostId, user_id: UserId) -> Option<&Like> {
        self.likes
            .values()
            .find(|like| like.post_id == post_id && like.user_id == user_id)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored like rows for `post_id`, for checking the cached
    /// `likes_count` against the source of truth.
    pub async fn count_for_post(&self, post_id: PostId) -> Result<i64, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .likes
            .values()
            .filter(|like| like.post_id == post_id)
            .count() as i64)
    }

    /// Removes a user together with their posts and likes, the way the
    /// relational cascade does. Not part of the repository contract.
    pub async fn delete_user(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.users.remove(&id).ok_or(RepositoryError::NotFound)?;
        let owned: Vec<PostId> = state
            .posts
            .values()
            .filter(|post| post.user_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in &owned {
            state.posts.remove(post_id);
        }
        state
            .likes
            .retain(|_, like| like.user_id != id && !owned.contains(&like.post_id));
        Self::recount(&mut state);
        Ok(())
    }

    /// Removes a post together with its likes. Not part of the repository
    /// contract.
    pub async fn delete_post(&self, id: PostId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.posts.remove(&id).ok_or(RepositoryError::NotFound)?;
        state.likes.retain(|_, like| like.post_id != id);
        Ok(())
    }

    // Likes removed by a user cascade must also leave the cached counters.
    fn recount(state: &mut MemoryState) {
        let mut counts: BTreeMap<PostId, i64> = BTreeMap::new();
        for like in state.likes.values() {
            *counts.entry(like.post_id).or_default() += 1;
        }
        for post in state.posts.values_mut() {
            post.likes_count = counts.get(&post.id).copied().unwrap_or(0);
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        let taken = state
            .users
            .values()
            .any(|existing| existing.email == user.email || existing.alias == user.alias);
        if taken {
            return Err(RepositoryError::Conflict);
        }

        state.next_user_id += 1;
        let stored = User {
            id: UserId::new(state.next_user_id),
            email: user.email,
            password: user.password,
            first_name: user.first_name,
            last_name: user.last_name,
            alias: user.alias,
            birth_date: user.birth_date,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        state.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_alias(&self, alias: &UserAlias) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.alias == alias).cloned())
    }

    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email_or_alias(
        &self,
        email: &UserEmail,
        alias: &UserAlias,
    ) -> Result<bool, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|u| &u.email == email || &u.alias == alias))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.state.read().await.users.len() as i64)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&post.user_id) {
            return Err(RepositoryError::NotFound);
        }

        state.next_post_id += 1;
        let stored = Post {
            id: PostId::new(state.next_post_id),
            content: post.content,
            user_id: post.user_id,
            likes_count: 0,
            created_at: post.created_at,
            updated_at: post.created_at,
        };
        state.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn find_details(&self, id: PostId) -> Result<Option<PostDetails>, RepositoryError> {
        let state = self.state.read().await;
        state.posts.get(&id).map(|post| state.details(post)).transpose()
    }

    async fn list_all(&self) -> Result<Vec<PostDetails>, RepositoryError> {
        let state = self.state.read().await;
        state.newest_first(state.posts.values())
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<PostDetails>, RepositoryError> {
        let state = self.state.read().await;
        state.newest_first(state.posts.values().filter(|post| post.user_id == author))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn find(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Option<Like>, RepositoryError> {
        Ok(self.state.read().await.find_like(post_id, user_id).cloned())
    }

    async fn create_and_increment(&self, like: NewLike) -> Result<LikeChange, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&like.post_id) || !state.users.contains_key(&like.user_id) {
            return Err(RepositoryError::NotFound);
        }
        if state.find_like(like.post_id, like.user_id).is_some() {
            return Err(RepositoryError::Conflict);
        }

        state.next_like_id += 1;
        let stored = Like {
            id: LikeId::new(state.next_like_id),
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: like.created_at,
        };
        state.likes.insert(stored.id, stored.clone());

        let post = state
            .posts
            .get_mut(&like.post_id)
            .ok_or(RepositoryError::NotFound)?;
        post.likes_count += 1;

        Ok(LikeChange {
            likes_count: post.likes_count,
            like: stored,
        })
    }

    async fn remove_and_decrement(&self, like: &Like) -> Result<LikeChange, RepositoryError> {
        let mut state = self.state.write().await;
        let removed = state.likes.remove(&like.id).ok_or(RepositoryError::NotFound)?;

        let post = state
            .posts
            .get_mut(&removed.post_id)
            .ok_or(RepositoryError::NotFound)?;
        post.likes_count = (post.likes_count - 1).max(0);

        Ok(LikeChange {
            likes_count: post.likes_count,
            like: removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{at, insert_post, insert_user};
    use domain::{NewLike, PasswordHash, PersonName};

    #[tokio::test]
    async fn duplicate_email_or_alias_conflicts() {
        let store = InMemoryStore::new();
        let existing = insert_user(&store, "anam").await;

        let mut duplicate = NewUser {
            email: existing.email.clone(),
            password: PasswordHash::new("plain:x").unwrap(),
            first_name: PersonName::parse("firstName", "Otra").unwrap(),
            last_name: PersonName::parse("lastName", "Persona").unwrap(),
            alias: UserAlias::parse("otra").unwrap(),
            birth_date: existing.birth_date,
            created_at: at(),
        };
        assert_eq!(
            UserRepository::create(&store, duplicate.clone()).await,
            Err(RepositoryError::Conflict)
        );

        duplicate.email = UserEmail::parse("otra@example.com").unwrap();
        duplicate.alias = existing.alias.clone();
        assert_eq!(
            UserRepository::create(&store, duplicate).await,
            Err(RepositoryError::Conflict)
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn likes_require_existing_rows() {
        let store = InMemoryStore::new();
        let user = insert_user(&store, "anam").await;

        let missing_post = store
            .create_and_increment(NewLike::new(PostId::new(5), user.id, at()))
            .await;
        assert_eq!(missing_post, Err(RepositoryError::NotFound));

        let missing_author = PostRepository::create(
            &store,
            NewPost::new(
                domain::PostContent::new("hola").unwrap(),
                UserId::new(99),
                at(),
            ),
        )
        .await;
        assert_eq!(missing_author, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_and_recounts() {
        let store = InMemoryStore::new();
        let juan = insert_user(&store, "juanp").await;
        let ana = insert_user(&store, "anam").await;
        let juans = insert_post(&store, &juan, "de juan").await;
        let anas = insert_post(&store, &ana, "de ana").await;
        store
            .create_and_increment(NewLike::new(juans.id, ana.id, at()))
            .await
            .unwrap();
        store
            .create_and_increment(NewLike::new(anas.id, juan.id, at()))
            .await
            .unwrap();

        store.delete_user(ana.id).await.unwrap();

        assert!(PostRepository::find_by_id(&store, anas.id)
            .await
            .unwrap()
            .is_none());
        let remaining = PostRepository::find_by_id(&store, juans.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remaining.likes_count, 0);
        assert_eq!(store.count_for_post(juans.id).await.unwrap(), 0);
        assert_eq!(store.delete_user(ana.id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn deleting_a_post_drops_its_likes() {
        let store = InMemoryStore::new();
        let juan = insert_user(&store, "juanp").await;
        let post = insert_post(&store, &juan, "hola").await;
        store
            .create_and_increment(NewLike::new(post.id, juan.id, at()))
            .await
            .unwrap();

        store.delete_post(post.id).await.unwrap();

        assert_eq!(store.count_for_post(post.id).await.unwrap(), 0);
        assert!(store.find(post.id, juan.id).await.unwrap().is_none());
    }
}
