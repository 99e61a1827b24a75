use chrono::NaiveDate;

use crate::value_objects::{PasswordHash, PersonName, Timestamp, UserAlias, UserEmail, UserId};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    #[serde(skip_serializing)] // never leaves the server
    pub password: PasswordHash,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub alias: UserAlias,
    pub birth_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Public projection, safe to expose to any authenticated caller.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.as_str().to_owned(),
            last_name: self.last_name.as_str().to_owned(),
            alias: self.alias.as_str().to_owned(),
            birth_date: self.birth_date,
            email: self.email.as_str().to_owned(),
        }
    }

    /// Projection embedded in posts and like events.
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            first_name: self.first_name.as_str().to_owned(),
            last_name: self.last_name.as_str().to_owned(),
            alias: self.alias.as_str().to_owned(),
        }
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: UserEmail,
    pub password: PasswordHash,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub alias: UserAlias,
    pub birth_date: NaiveDate,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
    pub birth_date: NaiveDate,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub alias: String,
}
