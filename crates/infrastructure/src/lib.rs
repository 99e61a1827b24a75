//! Infrastructure adapters.
//!
//! PostgreSQL repositories, embedded migrations, bcrypt hashing and the
//! in-process like event broadcaster.

pub mod broadcast;
pub mod builder;
pub mod migrations;
pub mod password;
pub mod repository;

pub use broadcast::LocalLikeBroadcaster;
pub use builder::{Infrastructure, InfrastructureError};
pub use migrations::MIGRATOR;
pub use password::BcryptPasswordHasher;
pub use repository::{
    create_pg_pool, PgLikeRepository, PgPostRepository, PgStorage, PgUserRepository,
};
