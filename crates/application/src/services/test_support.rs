//! Shared fixtures for service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::TimeZone;
use domain::{
    NewPost, NewUser, PasswordHash, PersonName, Post, PostContent, Timestamp, User, UserAlias,
    UserEmail,
};

use crate::{
    broadcaster::{BroadcastError, LikeEvent, LikeEventBroadcaster},
    clock::FixedClock,
    memory::InMemoryStore,
    password::{PasswordHasher, PasswordHasherError},
    repository::{PostRepository, UserRepository},
};

pub fn at() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(at()))
}

/// Reversible "hash" so tests do not pay for bcrypt.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("plain:{plaintext}"))
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("plain:{plaintext}"))
    }
}

#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<LikeEvent>>,
}

impl RecordingBroadcaster {
    pub fn events(&self) -> Vec<LikeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(LikeEvent::name).collect()
    }
}

#[async_trait]
impl LikeEventBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, event: LikeEvent) -> Result<(), BroadcastError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub async fn insert_user(store: &InMemoryStore, alias: &str) -> User {
    UserRepository::create(
        store,
        NewUser {
            email: UserEmail::parse(format!("{alias}@example.com")).unwrap(),
            password: PasswordHash::new("plain:123456").unwrap(),
            first_name: PersonName::parse("firstName", "Test").unwrap(),
            last_name: PersonName::parse("lastName", alias).unwrap(),
            alias: UserAlias::parse(alias).unwrap(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: at(),
        },
    )
    .await
    .unwrap()
}

pub async fn insert_post(store: &InMemoryStore, author: &User, body: &str) -> Post {
    PostRepository::create(
        store,
        NewPost::new(PostContent::new(body).unwrap(), author.id, at()),
    )
    .await
    .unwrap()
}
