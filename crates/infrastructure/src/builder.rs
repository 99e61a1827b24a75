use std::sync::Arc;

use application::{LikeRepository, PasswordHasher, PostRepository, UserRepository};
use config::AppConfig;
use thiserror::Error;

use crate::{
    broadcast::LocalLikeBroadcaster,
    migrations::MIGRATOR,
    password::BcryptPasswordHasher,
    repository::{create_pg_pool, PgStorage},
};

#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Concrete adapters wired from configuration.
#[derive(Clone)]
pub struct Infrastructure {
    pub storage: Arc<PgStorage>,
    pub password_hasher: Arc<BcryptPasswordHasher>,
    pub broadcaster: Arc<LocalLikeBroadcaster>,
}

impl Infrastructure {
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            "database pool ready"
        );

        if config.database.run_migrations {
            MIGRATOR.run(&pool).await?;
            tracing::info!("database migrations applied");
        }

        Ok(Self {
            storage: Arc::new(PgStorage::new(pool)),
            password_hasher: Arc::new(BcryptPasswordHasher::new(config.auth.bcrypt_cost)),
            broadcaster: Arc::new(LocalLikeBroadcaster::new(config.broadcast.capacity)),
        })
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.storage.user_repository.clone()
    }

    pub fn post_repository(&self) -> Arc<dyn PostRepository> {
        self.storage.post_repository.clone()
    }

    pub fn like_repository(&self) -> Arc<dyn LikeRepository> {
        self.storage.like_repository.clone()
    }

    pub fn password_hasher_trait(&self) -> Arc<dyn PasswordHasher> {
        self.password_hasher.clone()
    }
}
